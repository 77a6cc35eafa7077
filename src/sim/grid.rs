//! Board grid
//!
//! Row-major matrix of cells. Each cell holds exactly one component kind and
//! an occupancy flag; at most one marble sits on a cell at a time.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::component::{Boundary, ComponentKind, LauncherSide, MarbleColor};
use super::error::{EngineError, GridError};
use crate::consts::*;

/// Grid position, origin top-left. Commands use `x = col`, `y = row`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Coord {
    pub row: usize,
    pub col: usize,
}

impl Coord {
    #[inline]
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Build from command-style `(x, y)`
    #[inline]
    pub const fn from_xy(x: usize, y: usize) -> Self {
        Self { row: y, col: x }
    }

    /// Orthogonal neighbours that don't underflow. Upper bounds are left to the grid.
    pub fn neighbours(&self) -> impl Iterator<Item = Coord> + '_ {
        let up = self.row.checked_sub(1).map(|row| Coord::new(row, self.col));
        let left = self.col.checked_sub(1).map(|col| Coord::new(self.row, col));
        let down = Some(Coord::new(self.row + 1, self.col));
        let right = Some(Coord::new(self.row, self.col + 1));
        [up, down, left, right].into_iter().flatten()
    }
}

/// A single board cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    pub kind: ComponentKind,
    #[serde(default)]
    pub occupied: bool,
}

impl Cell {
    pub const fn new(kind: ComponentKind) -> Self {
        Self {
            kind,
            occupied: false,
        }
    }
}

/// The board: fixed dimensions, launcher entries and the cell matrix
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid {
    pub rows: usize,
    pub cols: usize,
    /// A marble stepping past this row exits the board
    pub last_playable_row: usize,
    pub left_entry: Coord,
    pub right_entry: Coord,
    cells: Vec<Cell>,
}

impl Grid {
    /// Standard 17x15 board with borders, launch chutes, funnel and levers
    pub fn reference() -> Self {
        let rows = BOARD_ROWS;
        let cols = BOARD_COLS;
        let last_col = cols - 1;
        let mut cells = Vec::with_capacity(rows * cols);

        for row in 0..rows {
            for col in 0..cols {
                let kind = if row == 0 {
                    match col {
                        0 => ComponentKind::Boundary(Boundary::CornerLeft),
                        c if c == last_col => ComponentKind::Boundary(Boundary::CornerRight),
                        _ => ComponentKind::Boundary(Boundary::Horizontal),
                    }
                } else if row <= LAST_PLAYABLE_ROW {
                    if col == 0 || col == last_col {
                        ComponentKind::Boundary(Boundary::Vertical)
                    } else if row == 1 && (col <= 2 || col >= last_col - 2) {
                        // Launch chutes
                        ComponentKind::Invalid
                    } else if row % 2 == 1 {
                        ComponentKind::GraySpace
                    } else {
                        ComponentKind::Empty
                    }
                } else if row < rows - 1 {
                    let inset = row - LAST_PLAYABLE_ROW;
                    if col == 0 || col == last_col {
                        ComponentKind::Boundary(Boundary::Vertical)
                    } else if col == inset {
                        ComponentKind::Boundary(Boundary::DiagonalLeft)
                    } else if col == last_col - inset {
                        ComponentKind::Boundary(Boundary::DiagonalRight)
                    } else {
                        ComponentKind::Invalid
                    }
                } else if col == BLUE_LEVER_COL {
                    ComponentKind::Lever(MarbleColor::Blue)
                } else if col == RED_LEVER_COL {
                    ComponentKind::Lever(MarbleColor::Red)
                } else {
                    ComponentKind::Boundary(Boundary::Horizontal)
                };
                cells.push(Cell::new(kind));
            }
        }

        Self {
            rows,
            cols,
            last_playable_row: LAST_PLAYABLE_ROW,
            left_entry: LEFT_ENTRY,
            right_entry: RIGHT_ENTRY,
            cells,
        }
    }

    /// Borderless all-`empty` board, handy for isolated rule tests
    pub fn open(rows: usize, cols: usize) -> Self {
        let rows = rows.max(1);
        let cols = cols.max(3);
        Self {
            rows,
            cols,
            last_playable_row: rows - 1,
            left_entry: Coord::new(0, 1),
            right_entry: Coord::new(0, cols - 2),
            cells: vec![Cell::new(ComponentKind::Empty); rows * cols],
        }
    }

    /// Check that the size fields, cell matrix and entries agree. Grids
    /// built here always do; deserialized ones may not.
    pub fn validate(&self) -> Result<(), GridError> {
        let (rows, cols) = (self.rows, self.cols);
        let size = rows
            .checked_mul(cols)
            .ok_or(GridError::TooLarge { rows, cols })?;
        if size != self.cells.len() {
            return Err(GridError::CellCount {
                rows,
                cols,
                cells: self.cells.len(),
            });
        }
        if self.last_playable_row >= rows {
            return Err(GridError::PlayableRowOutOfBounds {
                row: self.last_playable_row,
                rows,
            });
        }
        for side in [LauncherSide::Left, LauncherSide::Right] {
            let entry = self.entry(side);
            if !self.contains(entry) {
                return Err(GridError::EntryOutOfBounds {
                    side,
                    x: entry.col,
                    y: entry.row,
                });
            }
        }
        Ok(())
    }

    #[inline]
    pub fn contains(&self, coord: Coord) -> bool {
        coord.row < self.rows && coord.col < self.cols
    }

    #[inline]
    fn index(&self, coord: Coord) -> Option<usize> {
        self.contains(coord)
            .then_some(coord.row * self.cols + coord.col)
    }

    pub fn get(&self, coord: Coord) -> Option<&Cell> {
        self.index(coord).and_then(|i| self.cells.get(i))
    }

    fn get_mut(&mut self, coord: Coord) -> Option<&mut Cell> {
        self.index(coord).and_then(|i| self.cells.get_mut(i))
    }

    /// Kind at `coord`, if in bounds
    #[inline]
    pub fn kind(&self, coord: Coord) -> Option<ComponentKind> {
        self.get(coord).map(|cell| cell.kind)
    }

    /// Re-kind a cell. Occupancy is left alone.
    pub fn set(&mut self, coord: Coord, kind: ComponentKind) -> Result<(), EngineError> {
        let cell = self.get_mut(coord).ok_or(EngineError::OutOfBounds {
            x: coord.col,
            y: coord.row,
        })?;
        cell.kind = kind;
        Ok(())
    }

    /// Re-kind a cell whose coordinate came from this grid. Out-of-range
    /// coordinates are ignored.
    pub(crate) fn replace(&mut self, coord: Coord, kind: ComponentKind) {
        if let Some(cell) = self.get_mut(coord) {
            cell.kind = kind;
        }
    }

    pub fn is_occupied(&self, coord: Coord) -> bool {
        self.get(coord).is_some_and(|cell| cell.occupied)
    }

    /// Out-of-range coordinates are ignored
    pub fn set_occupied(&mut self, coord: Coord, occupied: bool) {
        if let Some(cell) = self.get_mut(coord) {
            cell.occupied = occupied;
        }
    }

    /// Drop every occupancy flag
    pub fn clear_occupancy(&mut self) {
        for cell in &mut self.cells {
            cell.occupied = false;
        }
    }

    pub fn entry(&self, side: LauncherSide) -> Coord {
        match side {
            LauncherSide::Left => self.left_entry,
            LauncherSide::Right => self.right_entry,
        }
    }

    /// Cells of one row, left to right
    pub fn row(&self, row: usize) -> &[Cell] {
        if row >= self.rows {
            return &[];
        }
        self.cells
            .get(row * self.cols..(row + 1) * self.cols)
            .unwrap_or(&[])
    }

    /// All coordinates, row-major
    pub fn coords(&self) -> impl Iterator<Item = Coord> + '_ {
        (0..self.rows).flat_map(move |row| (0..self.cols).map(move |col| Coord::new(row, col)))
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..self.rows {
            let line: String = self.row(row).iter().map(|cell| cell.kind.glyph()).collect();
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::component::Orientation;

    #[test]
    fn test_reference_dimensions() {
        let grid = Grid::reference();
        assert_eq!(grid.rows, 17);
        assert_eq!(grid.cols, 15);
        assert_eq!(grid.last_playable_row, 11);
        assert_eq!(grid.coords().count(), 17 * 15);
    }

    #[test]
    fn test_reference_topology() {
        let grid = Grid::reference();
        let kind = |row, col| grid.kind(Coord::new(row, col)).unwrap();

        assert_eq!(kind(0, 0), ComponentKind::Boundary(Boundary::CornerLeft));
        assert_eq!(kind(0, 14), ComponentKind::Boundary(Boundary::CornerRight));
        assert_eq!(kind(0, 7), ComponentKind::Boundary(Boundary::Horizontal));
        assert_eq!(kind(5, 0), ComponentKind::Boundary(Boundary::Vertical));
        assert_eq!(kind(1, 1), ComponentKind::Invalid);
        assert_eq!(kind(1, 13), ComponentKind::Invalid);
        assert_eq!(kind(1, 3), ComponentKind::GraySpace);
        assert_eq!(kind(2, 4), ComponentKind::Empty);
        assert_eq!(kind(3, 5), ComponentKind::GraySpace);
        assert_eq!(kind(11, 7), ComponentKind::GraySpace);
        assert_eq!(kind(12, 1), ComponentKind::Boundary(Boundary::DiagonalLeft));
        assert_eq!(kind(12, 13), ComponentKind::Boundary(Boundary::DiagonalRight));
        assert_eq!(kind(15, 4), ComponentKind::Boundary(Boundary::DiagonalLeft));
        assert_eq!(kind(14, 7), ComponentKind::Invalid);
        assert_eq!(kind(16, 6), ComponentKind::Lever(MarbleColor::Blue));
        assert_eq!(kind(16, 8), ComponentKind::Lever(MarbleColor::Red));
    }

    #[test]
    fn test_set_out_of_bounds() {
        let mut grid = Grid::reference();
        let before = grid.clone();
        let err = grid
            .set(Coord::new(17, 2), ComponentKind::Gear)
            .unwrap_err();
        assert_eq!(err, EngineError::OutOfBounds { x: 2, y: 17 });
        assert_eq!(grid, before);
        assert!(grid.get(Coord::new(0, 15)).is_none());
    }

    #[test]
    fn test_set_and_occupancy() {
        let mut grid = Grid::open(4, 4);
        let at = Coord::new(2, 1);
        grid.set(at, ComponentKind::Bit(Orientation::Left)).unwrap();
        assert_eq!(grid.kind(at), Some(ComponentKind::Bit(Orientation::Left)));

        assert!(!grid.is_occupied(at));
        grid.set_occupied(at, true);
        assert!(grid.is_occupied(at));
        grid.clear_occupancy();
        assert!(!grid.is_occupied(at));
    }

    #[test]
    fn test_replace_ignores_out_of_range() {
        let mut grid = Grid::open(3, 3);
        let before = grid.clone();
        grid.replace(Coord::new(3, 0), ComponentKind::Gear);
        assert_eq!(grid, before);
        grid.replace(Coord::new(1, 1), ComponentKind::Crossover);
        assert_eq!(grid.kind(Coord::new(1, 1)), Some(ComponentKind::Crossover));
    }

    #[test]
    fn test_built_grids_validate() {
        assert_eq!(Grid::reference().validate(), Ok(()));
        assert_eq!(Grid::open(1, 1).validate(), Ok(()));
    }

    #[test]
    fn test_validate_rejects_mismatched_fields() {
        let mut grid = Grid::open(3, 3);
        grid.cells.clear();
        assert_eq!(
            grid.validate(),
            Err(GridError::CellCount {
                rows: 3,
                cols: 3,
                cells: 0
            })
        );

        let mut grid = Grid::open(3, 3);
        grid.rows = usize::MAX;
        grid.cols = 2;
        assert!(matches!(grid.validate(), Err(GridError::TooLarge { .. })));

        let mut grid = Grid::open(3, 3);
        grid.last_playable_row = 3;
        assert_eq!(
            grid.validate(),
            Err(GridError::PlayableRowOutOfBounds { row: 3, rows: 3 })
        );

        let mut grid = Grid::open(3, 3);
        grid.right_entry = Coord::new(0, 3);
        assert_eq!(
            grid.validate(),
            Err(GridError::EntryOutOfBounds {
                side: LauncherSide::Right,
                x: 3,
                y: 0
            })
        );
    }

    #[test]
    fn test_render_ascii() {
        let text = Grid::reference().to_string();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 17);
        assert_eq!(lines[0], "*-------------*");
        assert_eq!(lines[1], "|##,,,,,,,,,##|");
        assert_eq!(lines[2], "|.............|");
        assert_eq!(lines[16], "------b-r------");
    }
}
