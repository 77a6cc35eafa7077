//! Board state and core simulation types
//!
//! Everything a save file needs to resume a board lives here: the grid, the
//! marbles in flight, the supply, the output log and the layout `reset`
//! returns to.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::component::{ComponentKind, Direction, LauncherSide, MarbleColor, Part};
use super::error::EngineError;
use super::gears;
use super::grid::{Coord, Grid};
use super::transition::Terminal;
use super::validate::can_place;
use crate::consts::*;

/// Why a marble left play without exiting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AbsorbReason {
    /// Caught by an interceptor
    Intercepted,
    /// Ran into a dead cell, border, lever or the side of the board
    Blocked,
    /// Landed on a cell another marble already holds
    Collision,
}

impl From<Terminal> for AbsorbReason {
    fn from(t: Terminal) -> Self {
        match t {
            Terminal::Intercepted => AbsorbReason::Intercepted,
            Terminal::Blocked => AbsorbReason::Blocked,
        }
    }
}

/// Marble lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarbleState {
    InFlight,
    Absorbed(AbsorbReason),
    /// Left through the bottom and got logged
    Exited,
}

/// A marble entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Marble {
    pub id: u32,
    pub color: MarbleColor,
    pub row: usize,
    pub col: usize,
    pub direction: Direction,
    pub state: MarbleState,
}

impl Marble {
    pub fn new(id: u32, color: MarbleColor, at: Coord, direction: Direction) -> Self {
        Self {
            id,
            color,
            row: at.row,
            col: at.col,
            direction,
            state: MarbleState::InFlight,
        }
    }

    #[inline]
    pub fn coord(&self) -> Coord {
        Coord::new(self.row, self.col)
    }

    #[inline]
    pub fn is_moving(&self) -> bool {
        self.state == MarbleState::InFlight
    }
}

/// Marbles left to launch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarbleSupply {
    pub red: u32,
    pub blue: u32,
}

impl Default for MarbleSupply {
    fn default() -> Self {
        Self {
            red: DEFAULT_RED_MARBLES,
            blue: DEFAULT_BLUE_MARBLES,
        }
    }
}

impl MarbleSupply {
    pub fn new(red: u32, blue: u32) -> Self {
        Self { red, blue }
    }

    pub fn remaining(&self, color: MarbleColor) -> u32 {
        match color {
            MarbleColor::Red => self.red,
            MarbleColor::Blue => self.blue,
        }
    }

    /// Take one marble of `color`; false when none are left
    pub fn take(&mut self, color: MarbleColor) -> bool {
        let slot = match color {
            MarbleColor::Red => &mut self.red,
            MarbleColor::Blue => &mut self.blue,
        };
        if *slot == 0 {
            return false;
        }
        *slot -= 1;
        true
    }
}

/// Complete board state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardState {
    pub grid: Grid,
    /// Layout restored by `reset`
    pub initial_grid: Grid,
    /// In-flight marbles, launch order
    pub marbles: Vec<Marble>,
    pub supply: MarbleSupply,
    pub initial_supply: MarbleSupply,
    pub launcher: LauncherSide,
    pub initial_launcher: LauncherSide,
    /// Colors of exited marbles, in exit order
    pub output: Vec<MarbleColor>,
    pub time_ticks: u64,
    next_id: u32,
}

impl Default for BoardState {
    fn default() -> Self {
        Self::new()
    }
}

impl BoardState {
    /// Reference board with the default supply
    pub fn new() -> Self {
        Self::with_grid(Grid::reference(), MarbleSupply::default())
    }

    pub fn with_grid(mut grid: Grid, supply: MarbleSupply) -> Self {
        grid.clear_occupancy();
        Self {
            initial_grid: grid.clone(),
            grid,
            marbles: Vec::new(),
            supply,
            initial_supply: supply,
            launcher: LauncherSide::default(),
            initial_launcher: LauncherSide::default(),
            output: Vec::new(),
            time_ticks: 0,
            next_id: 0,
        }
    }

    /// Make the current layout, supply and launcher the ones `reset` returns to
    pub fn checkpoint(&mut self) {
        let mut grid = self.grid.clone();
        grid.clear_occupancy();
        self.initial_grid = grid;
        self.initial_supply = self.supply;
        self.initial_launcher = self.launcher;
    }

    /// Get next marble ID
    pub fn next_marble_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn cell_kind(&self, x: usize, y: usize) -> Result<ComponentKind, EngineError> {
        self.grid
            .kind(Coord::from_xy(x, y))
            .ok_or(EngineError::OutOfBounds { x, y })
    }

    /// Put a part on the board. Gear pieces are aligned with the train they join.
    pub fn place(&mut self, part: Part, x: usize, y: usize) -> Result<(), EngineError> {
        let target = self.cell_kind(x, y)?;
        if !can_place(part, target) {
            log::warn!("Rejected {part} on {target} at ({x}, {y})");
            return Err(EngineError::InvalidPlacement { part, target, x, y });
        }

        let at = Coord::from_xy(x, y);
        self.grid.set(at, part.kind())?;
        if part.is_gear_family() {
            gears::reconcile(&mut self.grid, at);
        }
        log::info!("Placed {part} at ({x}, {y})");
        Ok(())
    }

    /// Take a part off the board, restoring the slot underneath
    pub fn remove(&mut self, x: usize, y: usize) -> Result<(), EngineError> {
        let part = self
            .cell_kind(x, y)?
            .as_part()
            .ok_or(EngineError::NothingToRemove { x, y })?;
        self.grid.set(Coord::from_xy(x, y), part.slot())?;
        log::info!("Removed {part} from ({x}, {y})");
        Ok(())
    }

    /// Flip a bit by hand. Gear bits take their whole train with them.
    pub fn toggle(&mut self, x: usize, y: usize) -> Result<(), EngineError> {
        let at = Coord::from_xy(x, y);
        match self.cell_kind(x, y)? {
            ComponentKind::Bit(o) => self.grid.set(at, ComponentKind::Bit(o.flipped()))?,
            ComponentKind::GearBit(_) => {
                gears::flip_group(&mut self.grid, at);
            }
            _ => return Err(EngineError::NotToggleable { x, y }),
        }
        log::debug!("Toggled ({x}, {y})");
        Ok(())
    }

    pub fn set_launcher(&mut self, side: LauncherSide) {
        if self.launcher != side {
            log::info!("Launcher set to {side}");
        }
        self.launcher = side;
    }

    /// Spawn a marble at the active launcher's entry. Returns its id.
    pub fn launch(&mut self, color: MarbleColor) -> Result<u32, EngineError> {
        let side = self.launcher;
        let entry = self.grid.entry(side);
        if self.grid.is_occupied(entry) {
            return Err(EngineError::LauncherBusy { side });
        }
        if !self.supply.take(color) {
            return Err(EngineError::SupplyExhausted { color });
        }

        let id = self.next_marble_id();
        self.marbles
            .push(Marble::new(id, color, entry, side.entry_direction()));
        self.grid.set_occupied(entry, true);
        log::info!(
            "Launched {color} marble #{id} from {side} ({} left)",
            self.supply.remaining(color)
        );
        Ok(id)
    }

    /// Back to the initial layout: no marbles, empty log, full supply
    pub fn reset(&mut self) {
        self.grid = self.initial_grid.clone();
        self.marbles.clear();
        self.output.clear();
        self.supply = self.initial_supply;
        self.launcher = self.initial_launcher;
        self.time_ticks = 0;
        self.next_id = 0;
        log::info!("Board reset");
    }

    pub fn output(&self) -> &[MarbleColor] {
        &self.output
    }

    /// Number of marbles still moving
    pub fn in_flight(&self) -> usize {
        self.marbles.iter().filter(|m| m.is_moving()).count()
    }

    /// Ensure marbles are sorted by ID for deterministic iteration
    pub fn normalize_order(&mut self) {
        self.marbles.sort_by_key(|m| m.id);
    }

    pub fn snapshot(&self) -> Snapshot {
        let mut cells: Vec<Vec<CellView>> = (0..self.grid.rows)
            .map(|row| {
                self.grid
                    .row(row)
                    .iter()
                    .map(|cell| CellView {
                        kind: cell.kind,
                        occupied: cell.occupied,
                        marble: None,
                    })
                    .collect()
            })
            .collect();

        let mut marbles = Vec::with_capacity(self.marbles.len());
        for m in self.marbles.iter().filter(|m| m.is_moving()) {
            if let Some(view) = cells.get_mut(m.row).and_then(|r| r.get_mut(m.col)) {
                view.marble = Some(m.color);
            }
            marbles.push(MarbleView {
                id: m.id,
                color: m.color,
                row: m.row,
                col: m.col,
                direction: m.direction,
            });
        }

        Snapshot {
            rows: self.grid.rows,
            cols: self.grid.cols,
            tick: self.time_ticks,
            cells,
            marbles,
            red_remaining: self.supply.red,
            blue_remaining: self.supply.blue,
            launcher: self.launcher,
            output: self.output.clone(),
        }
    }
}

/// One cell as seen from outside
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellView {
    pub kind: ComponentKind,
    pub occupied: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub marble: Option<MarbleColor>,
}

/// One in-flight marble as seen from outside
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarbleView {
    pub id: u32,
    pub color: MarbleColor,
    pub row: usize,
    pub col: usize,
    pub direction: Direction,
}

/// Plain-data picture of the whole board
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub rows: usize,
    pub cols: usize,
    pub tick: u64,
    pub cells: Vec<Vec<CellView>>,
    pub marbles: Vec<MarbleView>,
    pub red_remaining: u32,
    pub blue_remaining: u32,
    pub launcher: LauncherSide,
    pub output: Vec<MarbleColor>,
}

impl fmt::Display for Snapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in &self.cells {
            let line: String = row
                .iter()
                .map(|cell| cell.marble.map_or(cell.kind.glyph(), |c| c.glyph()))
                .collect();
            writeln!(f, "{line}")?;
        }
        let output: Vec<&str> = self.output.iter().map(|c| c.as_str()).collect();
        writeln!(
            f,
            "tick {} | launcher {} | red {} | blue {} | output [{}]",
            self.tick,
            self.launcher,
            self.red_remaining,
            self.blue_remaining,
            output.join(", ")
        )
    }
}
