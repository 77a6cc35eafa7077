//! Tumble Sim - a marble-computer board simulator
//!
//! Core modules:
//! - `sim`: Deterministic simulation (grid, components, gear trains, ticks)
//! - `challenges`: Built-in and file-based challenges
//! - `settings`: Simulator settings
//! - `persistence`: Versioned board save files
//! - `platform`: Browser binding

pub mod challenges;
pub mod persistence;
pub mod platform;
pub mod settings;
pub mod sim;

pub use challenges::Challenge;
pub use persistence::{PersistError, SaveFile};
pub use settings::Settings;
pub use sim::{BoardState, Command, EngineError, Response};

/// Board configuration constants
pub mod consts {
    use crate::sim::Coord;

    /// Reference board dimensions
    pub const BOARD_ROWS: usize = 17;
    pub const BOARD_COLS: usize = 15;
    /// Marbles stepping below this row leave the board
    pub const LAST_PLAYABLE_ROW: usize = 11;

    /// Launcher entry cells
    pub const LEFT_ENTRY: Coord = Coord::new(1, 3);
    pub const RIGHT_ENTRY: Coord = Coord::new(1, 11);

    /// Lever decorations on the bottom border
    pub const BLUE_LEVER_COL: usize = 6;
    pub const RED_LEVER_COL: usize = 8;

    /// Supply for a fresh board
    pub const DEFAULT_RED_MARBLES: u32 = 8;
    pub const DEFAULT_BLUE_MARBLES: u32 = 8;

    /// Tick cap for `run` without an explicit limit
    pub const DEFAULT_MAX_TICKS: u64 = 1_000;
}
