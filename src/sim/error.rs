//! Engine error taxonomy
//!
//! Every variant is recoverable: the command that produced it left the board
//! untouched.

use thiserror::Error;

use super::component::{ComponentKind, LauncherSide, MarbleColor, Part};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("coordinate ({x}, {y}) is outside the board")]
    OutOfBounds { x: usize, y: usize },

    #[error("cannot place {part} on {target} at ({x}, {y})")]
    InvalidPlacement {
        part: Part,
        target: ComponentKind,
        x: usize,
        y: usize,
    },

    #[error("{side} launcher entry is still occupied")]
    LauncherBusy { side: LauncherSide },

    #[error("no {color} marbles left")]
    SupplyExhausted { color: MarbleColor },

    #[error("no part to remove at ({x}, {y})")]
    NothingToRemove { x: usize, y: usize },

    #[error("component at ({x}, {y}) cannot be toggled")]
    NotToggleable { x: usize, y: usize },
}

/// A grid whose fields disagree with each other, usually from a hand-edited
/// save file
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GridError {
    #[error("grid of {rows}x{cols} cells is too large")]
    TooLarge { rows: usize, cols: usize },

    #[error("grid is {rows}x{cols} but holds {cells} cells")]
    CellCount {
        rows: usize,
        cols: usize,
        cells: usize,
    },

    #[error("{side} entry ({x}, {y}) is outside the board")]
    EntryOutOfBounds {
        side: LauncherSide,
        x: usize,
        y: usize,
    },

    #[error("last playable row {row} is outside a {rows}-row board")]
    PlayableRowOutOfBounds { row: usize, rows: usize },
}
