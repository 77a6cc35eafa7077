//! Component transition table
//!
//! Pure mapping from (component, incoming direction) to what happens to the
//! marble and what the component should turn into. Nothing here touches the
//! grid; the tick applies the returned mutation.

use serde::{Deserialize, Serialize};

use super::component::{ComponentKind, Direction};

/// Why a marble stopped on a cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Terminal {
    /// Caught by an interceptor
    Intercepted,
    /// Hit a dead cell, border or lever
    Blocked,
}

/// Side effect on the cell being crossed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mutation {
    None,
    /// Re-kind just this cell
    Replace(ComponentKind),
    /// Invert every gear bit in the train through this cell
    FlipGearTrain,
}

/// Result of evaluating one cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Pass {
        outgoing: Direction,
        mutation: Mutation,
    },
    Terminal(Terminal),
}

impl Transition {
    #[inline]
    fn pass(outgoing: Direction) -> Self {
        Transition::Pass {
            outgoing,
            mutation: Mutation::None,
        }
    }
}

/// Evaluate the cell a marble currently sits on
pub fn transition(kind: ComponentKind, incoming: Direction) -> Transition {
    match kind {
        ComponentKind::Empty
        | ComponentKind::GraySpace
        | ComponentKind::Gear
        | ComponentKind::Crossover => Transition::pass(incoming),
        ComponentKind::Ramp(o) => Transition::pass(o.direction()),
        ComponentKind::Bit(o) => Transition::Pass {
            outgoing: o.direction(),
            mutation: Mutation::Replace(ComponentKind::Bit(o.flipped())),
        },
        ComponentKind::GearBit(o) => Transition::Pass {
            outgoing: o.direction(),
            mutation: Mutation::FlipGearTrain,
        },
        ComponentKind::Interceptor => Transition::Terminal(Terminal::Intercepted),
        ComponentKind::Invalid | ComponentKind::Boundary(_) | ComponentKind::Lever(_) => {
            Transition::Terminal(Terminal::Blocked)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::component::{Boundary, MarbleColor, Orientation};

    const BOTH: [Direction; 2] = [Direction::DownLeft, Direction::DownRight];

    #[test]
    fn test_pass_through_kinds_keep_direction() {
        for kind in [
            ComponentKind::Empty,
            ComponentKind::GraySpace,
            ComponentKind::Gear,
            ComponentKind::Crossover,
        ] {
            for dir in BOTH {
                assert_eq!(transition(kind, dir), Transition::pass(dir), "{kind}");
            }
        }
    }

    #[test]
    fn test_ramps_ignore_incoming() {
        for dir in BOTH {
            assert_eq!(
                transition(ComponentKind::Ramp(Orientation::Left), dir),
                Transition::pass(Direction::DownLeft)
            );
            assert_eq!(
                transition(ComponentKind::Ramp(Orientation::Right), dir),
                Transition::pass(Direction::DownRight)
            );
        }
    }

    #[test]
    fn test_bit_routes_then_flips() {
        let t = transition(ComponentKind::Bit(Orientation::Left), Direction::DownRight);
        assert_eq!(
            t,
            Transition::Pass {
                outgoing: Direction::DownLeft,
                mutation: Mutation::Replace(ComponentKind::Bit(Orientation::Right)),
            }
        );
        let t = transition(ComponentKind::Bit(Orientation::Right), Direction::DownLeft);
        assert_eq!(
            t,
            Transition::Pass {
                outgoing: Direction::DownRight,
                mutation: Mutation::Replace(ComponentKind::Bit(Orientation::Left)),
            }
        );
    }

    #[test]
    fn test_gear_bit_flips_train() {
        let t = transition(ComponentKind::GearBit(Orientation::Right), Direction::DownLeft);
        assert_eq!(
            t,
            Transition::Pass {
                outgoing: Direction::DownRight,
                mutation: Mutation::FlipGearTrain,
            }
        );
    }

    #[test]
    fn test_terminals() {
        for dir in BOTH {
            assert_eq!(
                transition(ComponentKind::Interceptor, dir),
                Transition::Terminal(Terminal::Intercepted)
            );
            for kind in [
                ComponentKind::Invalid,
                ComponentKind::Boundary(Boundary::Vertical),
                ComponentKind::Boundary(Boundary::DiagonalRight),
                ComponentKind::Lever(MarbleColor::Red),
            ] {
                assert_eq!(transition(kind, dir), Transition::Terminal(Terminal::Blocked));
            }
        }
    }
}
