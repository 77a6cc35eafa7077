//! Board save files
//!
//! Features:
//! - Versioned JSON envelope around the full board state
//! - Write to a temp file, then rename over the save
//! - Version check on load
//! - Grid shape check on load, before the engine touches the board

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::sim::{BoardState, GridError};

/// Current save format version
pub const SAVE_VERSION: u32 = 1;

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed json: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unsupported save version {found} (expected {expected})")]
    UnsupportedVersion { found: u32, expected: u32 },

    #[error("invalid {which} grid: {source}")]
    InvalidGrid {
        which: &'static str,
        source: GridError,
    },
}

/// Versioned envelope around a board
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveFile {
    pub version: u32,
    pub state: BoardState,
}

impl SaveFile {
    pub fn new(state: BoardState) -> Self {
        Self {
            version: SAVE_VERSION,
            state,
        }
    }

    pub fn to_json(&self) -> Result<String, PersistError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self, PersistError> {
        // Peek at the version first so a future layout reports a version error
        // rather than a field mismatch
        #[derive(Deserialize)]
        struct Header {
            version: u32,
        }
        let header: Header = serde_json::from_str(json)?;
        if header.version != SAVE_VERSION {
            return Err(PersistError::UnsupportedVersion {
                found: header.version,
                expected: SAVE_VERSION,
            });
        }
        let save: SaveFile = serde_json::from_str(json)?;
        save.validate()?;
        Ok(save)
    }

    fn validate(&self) -> Result<(), PersistError> {
        for (which, grid) in [
            ("current", &self.state.grid),
            ("initial", &self.state.initial_grid),
        ] {
            grid.validate()
                .map_err(|source| PersistError::InvalidGrid { which, source })?;
        }
        Ok(())
    }
}

/// Write `state` to `path`
pub fn save(state: &BoardState, path: &Path) -> Result<(), PersistError> {
    let json = SaveFile::new(state.clone()).to_json()?;
    let tmp = path.with_extension("tmp");
    std::fs::write(&tmp, json)?;
    std::fs::rename(&tmp, path)?;
    log::info!("Saved board to {}", path.display());
    Ok(())
}

/// Read a board back from `path`
pub fn load(path: &Path) -> Result<BoardState, PersistError> {
    let json = std::fs::read_to_string(path)?;
    let save = SaveFile::from_json(&json)?;
    log::info!(
        "Loaded board from {} (tick {})",
        path.display(),
        save.state.time_ticks
    );
    Ok(save.state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{MarbleColor, Part, tick};

    fn busy_board() -> BoardState {
        let mut state = BoardState::new();
        state.place(Part::BitLeft, 4, 2).unwrap();
        state.place(Part::GearBitRight, 7, 5).unwrap();
        state.launch(MarbleColor::Red).unwrap();
        tick(&mut state);
        tick(&mut state);
        state
    }

    #[test]
    fn test_json_round_trip_resumes_mid_flight() {
        let state = busy_board();
        let json = SaveFile::new(state.clone()).to_json().unwrap();
        let loaded = SaveFile::from_json(&json).unwrap();
        assert_eq!(loaded.state, state);
        assert_eq!(loaded.state.in_flight(), 1);
    }

    #[test]
    fn test_rejects_other_versions() {
        let mut value = serde_json::to_value(SaveFile::new(BoardState::new())).unwrap();
        value["version"] = serde_json::json!(99);
        let err = SaveFile::from_json(&value.to_string()).unwrap_err();
        assert!(matches!(
            err,
            PersistError::UnsupportedVersion {
                found: 99,
                expected: SAVE_VERSION
            }
        ));
    }

    #[test]
    fn test_rejects_garbage() {
        assert!(matches!(
            SaveFile::from_json("[1, 2"),
            Err(PersistError::Json(_))
        ));
    }

    /// Serialized board with one grid field overwritten
    fn tampered(grid: &str, field: &str, value: serde_json::Value) -> String {
        let mut json = serde_json::to_value(SaveFile::new(busy_board())).unwrap();
        json["state"][grid][field] = value;
        json.to_string()
    }

    #[test]
    fn test_rejects_grid_without_cells() {
        let json = tampered("grid", "cells", serde_json::json!([]));
        let err = SaveFile::from_json(&json).unwrap_err();
        assert!(matches!(
            err,
            PersistError::InvalidGrid {
                which: "current",
                source: GridError::CellCount { cells: 0, .. }
            }
        ));
    }

    #[test]
    fn test_rejects_oversized_initial_grid() {
        let json = tampered("initial_grid", "rows", serde_json::json!(1u64 << 63));
        let err = SaveFile::from_json(&json).unwrap_err();
        assert!(matches!(
            err,
            PersistError::InvalidGrid {
                which: "initial",
                source: GridError::TooLarge { .. }
            }
        ));
    }

    #[test]
    fn test_rejects_entry_off_board() {
        let json = tampered("grid", "left_entry", serde_json::json!({"row": 40, "col": 3}));
        assert!(matches!(
            SaveFile::from_json(&json),
            Err(PersistError::InvalidGrid {
                source: GridError::EntryOutOfBounds { .. },
                ..
            })
        ));

        let json = tampered("grid", "last_playable_row", serde_json::json!(17));
        assert!(matches!(
            SaveFile::from_json(&json),
            Err(PersistError::InvalidGrid {
                source: GridError::PlayableRowOutOfBounds { row: 17, rows: 17 },
                ..
            })
        ));
    }

    #[test]
    fn test_save_and_load_file() {
        let path = std::env::temp_dir().join(format!("tumble-sim-save-{}.json", std::process::id()));
        let state = busy_board();
        save(&state, &path).unwrap();
        assert_eq!(load(&path).unwrap(), state);
        let _ = std::fs::remove_file(&path);

        assert!(matches!(load(&path), Err(PersistError::Io(_))));
    }
}
