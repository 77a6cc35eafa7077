//! Plain-data command boundary
//!
//! Editors, scripts and the browser binding drive a board through these
//! serde types. Each command either applies fully or returns an
//! [`EngineError`] with the board untouched.

use serde::{Deserialize, Serialize};

use super::component::{LauncherSide, MarbleColor, Part};
use super::error::EngineError;
use super::state::{BoardState, Snapshot};
use super::tick::{TickReport, run_until_settled, tick};
use crate::consts::DEFAULT_MAX_TICKS;

/// A single board command, tagged by `op`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Command {
    Place {
        kind: Part,
        x: usize,
        y: usize,
    },
    Remove {
        x: usize,
        y: usize,
    },
    Toggle {
        x: usize,
        y: usize,
    },
    SetLauncher {
        side: LauncherSide,
    },
    Launch {
        color: MarbleColor,
    },
    Tick,
    /// Tick until settled
    Run {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        max_ticks: Option<u64>,
    },
    Reset,
    Snapshot,
    Output,
}

/// Result of a successful command
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "response", rename_all = "snake_case")]
pub enum Response {
    Ack,
    Launched {
        id: u32,
    },
    Ticked {
        report: TickReport,
        snapshot: Box<Snapshot>,
    },
    Snapshot {
        snapshot: Box<Snapshot>,
    },
    Output {
        output: Vec<MarbleColor>,
    },
}

impl BoardState {
    /// Apply one command
    pub fn apply(&mut self, command: &Command) -> Result<Response, EngineError> {
        match *command {
            Command::Place { kind, x, y } => self.place(kind, x, y).map(|_| Response::Ack),
            Command::Remove { x, y } => self.remove(x, y).map(|_| Response::Ack),
            Command::Toggle { x, y } => self.toggle(x, y).map(|_| Response::Ack),
            Command::SetLauncher { side } => {
                self.set_launcher(side);
                Ok(Response::Ack)
            }
            Command::Launch { color } => self.launch(color).map(|id| Response::Launched { id }),
            Command::Tick => {
                let report = tick(self);
                Ok(self.ticked(report))
            }
            Command::Run { max_ticks } => {
                let report = run_until_settled(self, max_ticks.unwrap_or(DEFAULT_MAX_TICKS));
                Ok(self.ticked(report))
            }
            Command::Reset => {
                self.reset();
                Ok(Response::Ack)
            }
            Command::Snapshot => Ok(Response::Snapshot {
                snapshot: Box::new(self.snapshot()),
            }),
            Command::Output => Ok(Response::Output {
                output: self.output.clone(),
            }),
        }
    }

    fn ticked(&self, report: TickReport) -> Response {
        Response::Ticked {
            report,
            snapshot: Box::new(self.snapshot()),
        }
    }

    /// Apply commands in order, stopping at the first failure.
    ///
    /// On failure the error carries the index of the offending command;
    /// commands before it stay applied.
    pub fn run_script(&mut self, commands: &[Command]) -> Result<Vec<Response>, ScriptError> {
        let mut responses = Vec::with_capacity(commands.len());
        for (index, command) in commands.iter().enumerate() {
            match self.apply(command) {
                Ok(response) => responses.push(response),
                Err(source) => {
                    log::warn!("Script stopped at command {index}: {source}");
                    return Err(ScriptError { index, source });
                }
            }
        }
        Ok(responses)
    }
}

/// A script command that failed
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("command {index} failed: {source}")]
pub struct ScriptError {
    pub index: usize,
    #[source]
    pub source: EngineError,
}

/// Parse a JSON array of commands
pub fn parse_script(json: &str) -> Result<Vec<Command>, serde_json::Error> {
    serde_json::from_str(json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::component::ComponentKind;
    use crate::sim::grid::Coord;

    #[test]
    fn test_parse_commands() {
        let script = parse_script(
            r#"[
                {"op": "place", "kind": "bit_left", "x": 4, "y": 2},
                {"op": "set_launcher", "side": "right"},
                {"op": "launch", "color": "red"},
                {"op": "tick"},
                {"op": "run"},
                {"op": "run", "max_ticks": 5},
                {"op": "toggle", "x": 4, "y": 2},
                {"op": "remove", "x": 4, "y": 2},
                {"op": "reset"},
                {"op": "snapshot"},
                {"op": "output"}
            ]"#,
        )
        .unwrap();

        assert_eq!(script.len(), 11);
        assert_eq!(
            script[0],
            Command::Place {
                kind: Part::BitLeft,
                x: 4,
                y: 2
            }
        );
        assert_eq!(
            script[1],
            Command::SetLauncher {
                side: LauncherSide::Right
            }
        );
        assert_eq!(script[4], Command::Run { max_ticks: None });
        assert_eq!(script[5], Command::Run { max_ticks: Some(5) });
    }

    #[test]
    fn test_parse_rejects_unknown() {
        assert!(parse_script(r#"[{"op": "explode"}]"#).is_err());
        assert!(parse_script(r#"[{"op": "place", "kind": "warp", "x": 1, "y": 1}]"#).is_err());
    }

    #[test]
    fn test_apply_script() {
        let mut state = BoardState::new();
        let script = parse_script(
            r#"[
                {"op": "place", "kind": "ramp_right", "x": 4, "y": 2},
                {"op": "launch", "color": "blue"},
                {"op": "run"},
                {"op": "output"}
            ]"#,
        )
        .unwrap();

        let responses = state.run_script(&script).unwrap();
        assert_eq!(responses[0], Response::Ack);
        assert_eq!(responses[1], Response::Launched { id: 0 });
        match &responses[2] {
            Response::Ticked { report, snapshot } => {
                assert_eq!(report.exited.len(), 1);
                assert!(snapshot.marbles.is_empty());
            }
            other => panic!("unexpected response {other:?}"),
        }
        assert_eq!(
            responses[3],
            Response::Output {
                output: vec![MarbleColor::Blue]
            }
        );
    }

    #[test]
    fn test_script_stops_at_first_error() {
        let mut state = BoardState::new();
        let script = vec![
            Command::Place {
                kind: Part::Crossover,
                x: 6,
                y: 2,
            },
            Command::Place {
                kind: Part::Gear,
                x: 6,
                y: 4,
            },
            Command::Launch {
                color: MarbleColor::Red,
            },
        ];

        let err = state.run_script(&script).unwrap_err();
        assert_eq!(err.index, 1);
        assert!(matches!(err.source, EngineError::InvalidPlacement { .. }));
        assert_eq!(
            state.grid.kind(Coord::new(2, 6)),
            Some(ComponentKind::Crossover)
        );
        assert!(state.marbles.is_empty());
    }

    #[test]
    fn test_response_json_shape() {
        let json = serde_json::to_value(Response::Launched { id: 3 }).unwrap();
        assert_eq!(json["response"], "launched");
        assert_eq!(json["id"], 3);

        let mut state = BoardState::new();
        let response = state.apply(&Command::Snapshot).unwrap();
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["response"], "snapshot");
        assert_eq!(json["snapshot"]["rows"], 17);
    }
}
