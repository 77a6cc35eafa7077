//! Simulator settings
//!
//! Stored as a small JSON file next to save files. Missing or malformed
//! files fall back to defaults.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::persistence::PersistError;
use crate::sim::{LauncherSide, MarbleSupply, MatchMode};

/// Simulator settings/preferences
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Board ===
    /// Red marbles in the supply for a fresh board
    pub red_marbles: u32,
    /// Blue marbles in the supply for a fresh board
    pub blue_marbles: u32,
    /// Launcher active on a fresh board
    pub launcher: LauncherSide,

    // === Simulation ===
    /// Tick cap for `run` commands without their own limit
    pub max_ticks: u64,
    /// How challenge output is compared
    pub match_mode: MatchMode,

    // === Diagnostics ===
    /// Default log level when `RUST_LOG` is unset
    pub log_level: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            red_marbles: DEFAULT_RED_MARBLES,
            blue_marbles: DEFAULT_BLUE_MARBLES,
            launcher: LauncherSide::Left,

            max_ticks: DEFAULT_MAX_TICKS,
            match_mode: MatchMode::Contains,

            log_level: "info".to_string(),
        }
    }
}

impl Settings {
    /// Supply a fresh board starts with
    pub fn supply(&self) -> MarbleSupply {
        MarbleSupply::new(self.red_marbles, self.blue_marbles)
    }

    /// Parsed log level, `Info` when unrecognised
    pub fn log_filter(&self) -> log::LevelFilter {
        self.log_level.parse().unwrap_or(log::LevelFilter::Info)
    }

    pub fn from_json(json: &str) -> Result<Self, PersistError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String, PersistError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load settings from `path`, falling back to defaults
    pub fn load(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(json) => match Self::from_json(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings from {}", path.display());
                    return settings;
                }
                Err(e) => log::warn!("Ignoring settings in {}: {e}", path.display()),
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => log::warn!("Could not read {}: {e}", path.display()),
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to `path`
    pub fn save(&self, path: &Path) -> Result<(), PersistError> {
        std::fs::write(path, self.to_json()?)?;
        log::info!("Settings saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.supply(), MarbleSupply::new(8, 8));
        assert_eq!(settings.launcher, LauncherSide::Left);
        assert_eq!(settings.match_mode, MatchMode::Contains);
        assert_eq!(settings.log_filter(), log::LevelFilter::Info);
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let settings =
            Settings::from_json(r#"{"red_marbles": 3, "match_mode": "exact", "log_level": "debug"}"#)
                .unwrap();
        assert_eq!(settings.red_marbles, 3);
        assert_eq!(settings.blue_marbles, DEFAULT_BLUE_MARBLES);
        assert_eq!(settings.match_mode, MatchMode::Exact);
        assert_eq!(settings.log_filter(), log::LevelFilter::Debug);
    }

    #[test]
    fn test_bad_json_is_error() {
        assert!(matches!(
            Settings::from_json("{ nope"),
            Err(PersistError::Json(_))
        ));
    }

    #[test]
    fn test_load_missing_falls_back() {
        let path = std::env::temp_dir().join("tumble-sim-missing-settings.json");
        let _ = std::fs::remove_file(&path);
        assert_eq!(Settings::load(&path), Settings::default());
    }

    #[test]
    fn test_save_then_load() {
        let path = std::env::temp_dir().join(format!(
            "tumble-sim-settings-{}.json",
            std::process::id()
        ));
        let settings = Settings {
            launcher: LauncherSide::Right,
            max_ticks: 40,
            ..Default::default()
        };
        settings.save(&path).unwrap();
        assert_eq!(Settings::load(&path), settings);
        let _ = std::fs::remove_file(&path);
    }
}
