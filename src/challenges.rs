//! Challenge catalogue
//!
//! A challenge is a preset board plus the marble sequence its output log must
//! produce. Built-in challenges ship with the crate; more can be loaded from
//! JSON files with the same shape.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::persistence::PersistError;
use crate::sim::{
    BoardState, EngineError, Grid, LauncherSide, MarbleColor, MarbleSupply, MatchMode, Part,
};

/// A part fixed on the board before the player starts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Placement {
    pub kind: Part,
    pub x: usize,
    pub y: usize,
}

/// A single challenge
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Challenge {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Goals shown to the player
    #[serde(default)]
    pub objectives: Vec<String>,
    pub red_marbles: u32,
    pub blue_marbles: u32,
    #[serde(default)]
    pub launcher: LauncherSide,
    /// Preset parts
    #[serde(default)]
    pub placements: Vec<Placement>,
    /// Sequence the output log must produce
    pub expected: Vec<MarbleColor>,
}

impl Challenge {
    /// Reference board with the preset parts in place. `reset` returns to it.
    pub fn build(&self) -> Result<BoardState, EngineError> {
        let supply = MarbleSupply::new(self.red_marbles, self.blue_marbles);
        let mut state = BoardState::with_grid(Grid::reference(), supply);
        state.set_launcher(self.launcher);
        for p in &self.placements {
            state.place(p.kind, p.x, p.y)?;
        }
        state.checkpoint();
        log::info!("Built challenge {} ({})", self.id, self.name);
        Ok(state)
    }

    pub fn is_satisfied(&self, output: &[MarbleColor], mode: MatchMode) -> bool {
        mode.matches(output, &self.expected)
    }

    pub fn from_json(json: &str) -> Result<Self, PersistError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a challenge file
    pub fn load(path: &Path) -> Result<Self, PersistError> {
        let challenge = Self::from_json(&std::fs::read_to_string(path)?)?;
        log::info!("Loaded challenge {} from {}", challenge.id, path.display());
        Ok(challenge)
    }
}

fn place(kind: Part, x: usize, y: usize) -> Placement {
    Placement { kind, x, y }
}

fn lines(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// Challenges that ship with the simulator
pub fn builtin() -> Vec<Challenge> {
    use MarbleColor::{Blue, Red};

    vec![
        Challenge {
            id: "default".to_string(),
            name: "Free Play".to_string(),
            description: "Empty board with a full supply.".to_string(),
            objectives: Vec::new(),
            red_marbles: 8,
            blue_marbles: 8,
            launcher: LauncherSide::Left,
            placements: Vec::new(),
            expected: Vec::new(),
        },
        Challenge {
            id: "1".to_string(),
            name: "Basic Ramp".to_string(),
            description: "An interceptor sits on the drop line. Route every blue marble around it and out of the board.".to_string(),
            objectives: lines(&["Steer marbles past the interceptor", "Get three blue marbles out"]),
            red_marbles: 0,
            blue_marbles: 3,
            launcher: LauncherSide::Left,
            placements: vec![place(Part::Interceptor, 6, 4)],
            expected: vec![Blue, Blue, Blue],
        },
        Challenge {
            id: "2".to_string(),
            name: "Bit Manipulation".to_string(),
            description: "The bit below the launcher sends every other marble into the wall. Catch those marbles too.".to_string(),
            objectives: lines(&["Watch the bit flip on each marble", "Get four blue marbles out"]),
            red_marbles: 0,
            blue_marbles: 4,
            launcher: LauncherSide::Left,
            placements: vec![place(Part::BitLeft, 4, 2)],
            expected: vec![Blue, Blue, Blue, Blue],
        },
        Challenge {
            id: "3".to_string(),
            name: "Gear Train".to_string(),
            description: "Two gear bits share a gear. Every crossing turns the whole train.".to_string(),
            objectives: lines(&["Flip the train with a marble", "Get three red marbles out"]),
            red_marbles: 3,
            blue_marbles: 0,
            launcher: LauncherSide::Left,
            placements: vec![
                place(Part::GearBitLeft, 5, 3),
                place(Part::Gear, 6, 3),
                place(Part::GearBitLeft, 7, 3),
            ],
            expected: vec![Red, Red, Red],
        },
        Challenge {
            id: "4".to_string(),
            name: "Multiple Paths".to_string(),
            description: "Interceptors guard both drop lines. Find the route through the crossover that reaches the bottom.".to_string(),
            objectives: lines(&["Pick the launcher with an open route", "Get red, blue, red, blue out"]),
            red_marbles: 2,
            blue_marbles: 2,
            launcher: LauncherSide::Left,
            placements: vec![
                place(Part::Interceptor, 2, 4),
                place(Part::Crossover, 6, 6),
                place(Part::Interceptor, 8, 6),
                place(Part::Interceptor, 2, 10),
            ],
            expected: vec![Red, Blue, Red, Blue],
        },
        Challenge {
            id: "5".to_string(),
            name: "Logic Gate".to_string(),
            description: "One gear train spans both drop lines. A marble from one side opens the gate for the other.".to_string(),
            objectives: lines(&["Alternate the launchers", "Get red, blue, red, blue out"]),
            red_marbles: 2,
            blue_marbles: 2,
            launcher: LauncherSide::Right,
            placements: vec![
                place(Part::GearBitLeft, 5, 3),
                place(Part::Gear, 6, 3),
                place(Part::Gear, 7, 3),
                place(Part::Gear, 8, 3),
                place(Part::GearBitLeft, 9, 3),
                place(Part::RampRight, 6, 4),
                place(Part::RampLeft, 8, 4),
                place(Part::Crossover, 6, 6),
            ],
            expected: vec![Red, Blue, Red, Blue],
        },
    ]
}

/// Look up a built-in challenge by id
pub fn find(id: &str) -> Option<Challenge> {
    builtin().into_iter().find(|c| c.id == id)
}
