//! Deterministic marble transit simulation
//!
//! All board logic lives here. This module must be pure and deterministic:
//! - Discrete ticks only, no timers
//! - Stable iteration order (by marble ID)
//! - Every command validates before it mutates
//! - No rendering or platform dependencies

pub mod command;
pub mod component;
pub mod error;
pub mod gears;
pub mod grid;
pub mod state;
pub mod tick;
pub mod transition;
pub mod validate;

pub use command::{Command, Response, ScriptError, parse_script};
pub use component::{
    Boundary, ComponentKind, Direction, LauncherSide, MarbleColor, Orientation, Part,
};
pub use error::{EngineError, GridError};
pub use gears::{find_connected_group, flip_group};
pub use grid::{Cell, Coord, Grid};
pub use state::{
    AbsorbReason, BoardState, CellView, Marble, MarbleState, MarbleSupply, MarbleView, Snapshot,
};
pub use tick::{AbsorbEvent, ExitEvent, TickReport, run_until_settled, tick};
pub use transition::{Mutation, Terminal, Transition, transition};
pub use validate::{MatchMode, can_place, is_challenge_satisfied};
