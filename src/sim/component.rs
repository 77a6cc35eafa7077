//! Component vocabulary for the board
//!
//! Everything that can sit in a grid cell, plus the small value types that
//! travel with marbles (color, direction) and the placeable part list used by
//! commands. Wire tags follow the snake_case names used by board snapshots.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Which way a bistable part (or a ramp) points
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Orientation {
    Left,
    Right,
}

impl Orientation {
    /// The opposite orientation
    #[inline]
    pub fn flipped(self) -> Self {
        match self {
            Orientation::Left => Orientation::Right,
            Orientation::Right => Orientation::Left,
        }
    }

    /// Travel direction a marble takes when this orientation routes it
    #[inline]
    pub fn direction(self) -> Direction {
        match self {
            Orientation::Left => Direction::DownLeft,
            Orientation::Right => Direction::DownRight,
        }
    }
}

/// Diagonal travel vector. Every step moves one row down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    DownLeft,
    DownRight,
}

impl Direction {
    /// Column offset applied by one step
    #[inline]
    pub fn col_delta(self) -> isize {
        match self {
            Direction::DownLeft => -1,
            Direction::DownRight => 1,
        }
    }
}

/// Marble color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarbleColor {
    Red,
    Blue,
}

impl MarbleColor {
    pub fn as_str(&self) -> &'static str {
        match self {
            MarbleColor::Red => "red",
            MarbleColor::Blue => "blue",
        }
    }

    /// Glyph used when a marble sits on a cell
    pub fn glyph(&self) -> char {
        match self {
            MarbleColor::Red => 'R',
            MarbleColor::Blue => 'B',
        }
    }
}

impl fmt::Display for MarbleColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Launcher side at the top of the board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LauncherSide {
    #[default]
    Left,
    Right,
}

impl LauncherSide {
    pub fn as_str(&self) -> &'static str {
        match self {
            LauncherSide::Left => "left",
            LauncherSide::Right => "right",
        }
    }

    /// Direction a freshly launched marble starts with
    pub fn entry_direction(&self) -> Direction {
        match self {
            LauncherSide::Left => Direction::DownRight,
            LauncherSide::Right => Direction::DownLeft,
        }
    }
}

impl fmt::Display for LauncherSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Non-interactive boundary decoration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Boundary {
    Horizontal,
    Vertical,
    DiagonalLeft,
    DiagonalRight,
    CornerLeft,
    CornerRight,
}

/// What occupies a grid cell.
///
/// Bit-family kinds carry their orientation as a field, so flipping a bit
/// is `Bit(o)` -> `Bit(o.flipped())`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum ComponentKind {
    /// Part slot
    Empty,
    /// Gear-only slot
    GraySpace,
    Ramp(Orientation),
    Bit(Orientation),
    Crossover,
    Interceptor,
    Gear,
    GearBit(Orientation),
    Invalid,
    Boundary(Boundary),
    /// Launch trigger decoration; never part of a marble path
    Lever(MarbleColor),
}

impl ComponentKind {
    /// Every kind, in tag order. Used for parsing and tests.
    pub const ALL: [ComponentKind; 20] = [
        ComponentKind::Empty,
        ComponentKind::GraySpace,
        ComponentKind::Ramp(Orientation::Left),
        ComponentKind::Ramp(Orientation::Right),
        ComponentKind::Bit(Orientation::Left),
        ComponentKind::Bit(Orientation::Right),
        ComponentKind::Crossover,
        ComponentKind::Interceptor,
        ComponentKind::Gear,
        ComponentKind::GearBit(Orientation::Left),
        ComponentKind::GearBit(Orientation::Right),
        ComponentKind::Invalid,
        ComponentKind::Boundary(Boundary::Horizontal),
        ComponentKind::Boundary(Boundary::Vertical),
        ComponentKind::Boundary(Boundary::DiagonalLeft),
        ComponentKind::Boundary(Boundary::DiagonalRight),
        ComponentKind::Boundary(Boundary::CornerLeft),
        ComponentKind::Boundary(Boundary::CornerRight),
        ComponentKind::Lever(MarbleColor::Blue),
        ComponentKind::Lever(MarbleColor::Red),
    ];

    pub fn as_str(&self) -> &'static str {
        use Orientation::{Left, Right};
        match self {
            ComponentKind::Empty => "empty",
            ComponentKind::GraySpace => "gray_space",
            ComponentKind::Ramp(Left) => "ramp_left",
            ComponentKind::Ramp(Right) => "ramp_right",
            ComponentKind::Bit(Left) => "bit_left",
            ComponentKind::Bit(Right) => "bit_right",
            ComponentKind::Crossover => "crossover",
            ComponentKind::Interceptor => "interceptor",
            ComponentKind::Gear => "gear",
            ComponentKind::GearBit(Left) => "gear_bit_left",
            ComponentKind::GearBit(Right) => "gear_bit_right",
            ComponentKind::Invalid => "invalid",
            ComponentKind::Boundary(Boundary::Horizontal) => "border_horizontal",
            ComponentKind::Boundary(Boundary::Vertical) => "border_vertical",
            ComponentKind::Boundary(Boundary::DiagonalLeft) => "border_diagonal_left",
            ComponentKind::Boundary(Boundary::DiagonalRight) => "border_diagonal_right",
            ComponentKind::Boundary(Boundary::CornerLeft) => "corner_left",
            ComponentKind::Boundary(Boundary::CornerRight) => "corner_right",
            ComponentKind::Lever(MarbleColor::Blue) => "lever_blue",
            ComponentKind::Lever(MarbleColor::Red) => "lever_red",
        }
    }

    pub fn from_tag(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.as_str() == s)
    }

    /// Single-character glyph for ASCII board dumps
    pub fn glyph(&self) -> char {
        use Orientation::{Left, Right};
        match self {
            ComponentKind::Empty => '.',
            ComponentKind::GraySpace => ',',
            ComponentKind::Ramp(Left) => '\\',
            ComponentKind::Ramp(Right) => '/',
            ComponentKind::Bit(Left) => '<',
            ComponentKind::Bit(Right) => '>',
            ComponentKind::Crossover => '+',
            ComponentKind::Interceptor => 'X',
            ComponentKind::Gear => 'o',
            ComponentKind::GearBit(Left) => '[',
            ComponentKind::GearBit(Right) => ']',
            ComponentKind::Invalid => '#',
            ComponentKind::Boundary(Boundary::Horizontal) => '-',
            ComponentKind::Boundary(Boundary::Vertical) => '|',
            ComponentKind::Boundary(Boundary::DiagonalLeft) => '(',
            ComponentKind::Boundary(Boundary::DiagonalRight) => ')',
            ComponentKind::Boundary(Boundary::CornerLeft | Boundary::CornerRight) => '*',
            ComponentKind::Lever(MarbleColor::Blue) => 'b',
            ComponentKind::Lever(MarbleColor::Red) => 'r',
        }
    }

    /// Gear, or a gear bit of either orientation
    #[inline]
    pub fn is_gear_family(&self) -> bool {
        matches!(self, ComponentKind::Gear | ComponentKind::GearBit(_))
    }

    /// Cells a marble can never enter: dead cells, borders and levers
    #[inline]
    pub fn blocks_transit(&self) -> bool {
        matches!(
            self,
            ComponentKind::Invalid | ComponentKind::Boundary(_) | ComponentKind::Lever(_)
        )
    }

    /// The part this kind was placed as, if any
    pub fn as_part(&self) -> Option<Part> {
        use Orientation::{Left, Right};
        match self {
            ComponentKind::Ramp(Left) => Some(Part::RampLeft),
            ComponentKind::Ramp(Right) => Some(Part::RampRight),
            ComponentKind::Bit(Left) => Some(Part::BitLeft),
            ComponentKind::Bit(Right) => Some(Part::BitRight),
            ComponentKind::Crossover => Some(Part::Crossover),
            ComponentKind::Interceptor => Some(Part::Interceptor),
            ComponentKind::Gear => Some(Part::Gear),
            ComponentKind::GearBit(Left) => Some(Part::GearBitLeft),
            ComponentKind::GearBit(Right) => Some(Part::GearBitRight),
            _ => None,
        }
    }
}

impl fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<ComponentKind> for String {
    fn from(kind: ComponentKind) -> Self {
        kind.as_str().to_string()
    }
}

impl TryFrom<String> for ComponentKind {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        ComponentKind::from_tag(&value).ok_or_else(|| format!("unknown component kind '{value}'"))
    }
}

/// Items a player can put on the board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Part {
    RampLeft,
    RampRight,
    BitLeft,
    BitRight,
    Crossover,
    Interceptor,
    Gear,
    GearBitLeft,
    GearBitRight,
}

impl Part {
    pub const ALL: [Part; 9] = [
        Part::RampLeft,
        Part::RampRight,
        Part::BitLeft,
        Part::BitRight,
        Part::Crossover,
        Part::Interceptor,
        Part::Gear,
        Part::GearBitLeft,
        Part::GearBitRight,
    ];

    /// Grid kind this part becomes once placed
    pub fn kind(&self) -> ComponentKind {
        use Orientation::{Left, Right};
        match self {
            Part::RampLeft => ComponentKind::Ramp(Left),
            Part::RampRight => ComponentKind::Ramp(Right),
            Part::BitLeft => ComponentKind::Bit(Left),
            Part::BitRight => ComponentKind::Bit(Right),
            Part::Crossover => ComponentKind::Crossover,
            Part::Interceptor => ComponentKind::Interceptor,
            Part::Gear => ComponentKind::Gear,
            Part::GearBitLeft => ComponentKind::GearBit(Left),
            Part::GearBitRight => ComponentKind::GearBit(Right),
        }
    }

    #[inline]
    pub fn is_gear_family(&self) -> bool {
        self.kind().is_gear_family()
    }

    /// Slot kind the part sits on, restored when it is removed
    pub fn slot(&self) -> ComponentKind {
        if self.is_gear_family() {
            ComponentKind::GraySpace
        } else {
            ComponentKind::Empty
        }
    }
}

impl fmt::Display for Part {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.kind().as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_tags_round_trip() {
        for kind in ComponentKind::ALL {
            assert_eq!(ComponentKind::from_tag(kind.as_str()), Some(kind));
        }
        assert_eq!(ComponentKind::from_tag("ball_red"), None);
    }

    #[test]
    fn test_kind_serializes_as_tag() {
        let json = serde_json::to_string(&ComponentKind::GearBit(Orientation::Left)).unwrap();
        assert_eq!(json, "\"gear_bit_left\"");
        let kind: ComponentKind = serde_json::from_str("\"border_diagonal_right\"").unwrap();
        assert_eq!(kind, ComponentKind::Boundary(Boundary::DiagonalRight));
        assert!(serde_json::from_str::<ComponentKind>("\"warp_drive\"").is_err());
    }

    #[test]
    fn test_part_slots() {
        for part in Part::ALL {
            assert_eq!(part.kind().as_part(), Some(part));
            let expected = if part.is_gear_family() {
                ComponentKind::GraySpace
            } else {
                ComponentKind::Empty
            };
            assert_eq!(part.slot(), expected);
        }
    }

    #[test]
    fn test_orientation_flip() {
        assert_eq!(Orientation::Left.flipped(), Orientation::Right);
        assert_eq!(Orientation::Right.flipped().flipped(), Orientation::Right);
        assert_eq!(Orientation::Left.direction(), Direction::DownLeft);
        assert_eq!(Direction::DownRight.col_delta(), 1);
    }
}
