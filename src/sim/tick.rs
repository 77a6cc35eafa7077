//! Discrete simulation tick
//!
//! Advances every in-flight marble by one cell, in launch order. A marble
//! first resolves the cell it sits on (routing, bit flips, gear trains), then
//! steps one row down and one column sideways.

use serde::{Deserialize, Serialize};

use super::component::{Direction, MarbleColor};
use super::gears;
use super::grid::Coord;
use super::state::{AbsorbReason, BoardState, MarbleState};
use super::transition::{Mutation, Transition, transition};

/// A marble that left through the bottom
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExitEvent {
    pub id: u32,
    pub color: MarbleColor,
}

/// A marble removed without being logged
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbsorbEvent {
    pub id: u32,
    pub color: MarbleColor,
    pub reason: AbsorbReason,
    pub row: usize,
    pub col: usize,
}

/// What happened during one or more ticks
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickReport {
    pub ticks: u64,
    pub exited: Vec<ExitEvent>,
    pub absorbed: Vec<AbsorbEvent>,
}

impl TickReport {
    pub fn merge(&mut self, other: TickReport) {
        self.ticks += other.ticks;
        self.exited.extend(other.exited);
        self.absorbed.extend(other.absorbed);
    }
}

/// Where a marble ends up after this tick
enum Step {
    Move { next: Coord, direction: Direction },
    Exited,
    Absorbed(AbsorbReason),
}

/// Advance the board by one step
pub fn tick(state: &mut BoardState) -> TickReport {
    state.normalize_order();
    let mut report = TickReport {
        ticks: 1,
        ..Default::default()
    };

    for i in 0..state.marbles.len() {
        let marble = state.marbles[i];
        if !marble.is_moving() {
            continue;
        }
        let at = marble.coord();

        let outcome = match state.grid.kind(at).map(|k| transition(k, marble.direction)) {
            Some(Transition::Pass { outgoing, mutation }) => {
                match mutation {
                    Mutation::None => {}
                    Mutation::Replace(kind) => state.grid.replace(at, kind),
                    Mutation::FlipGearTrain => {
                        gears::flip_group(&mut state.grid, at);
                    }
                }
                step(state, at, outgoing)
            }
            Some(Transition::Terminal(t)) => Step::Absorbed(t.into()),
            None => Step::Absorbed(AbsorbReason::Blocked),
        };

        state.grid.set_occupied(at, false);
        let m = &mut state.marbles[i];
        match outcome {
            Step::Move { next, direction } => {
                state.grid.set_occupied(next, true);
                m.row = next.row;
                m.col = next.col;
                m.direction = direction;
            }
            Step::Exited => {
                m.state = MarbleState::Exited;
                state.output.push(m.color);
                log::info!("Marble #{} ({}) exited", m.id, m.color);
                report.exited.push(ExitEvent {
                    id: m.id,
                    color: m.color,
                });
            }
            Step::Absorbed(reason) => {
                m.state = MarbleState::Absorbed(reason);
                log::debug!(
                    "Marble #{} ({}) absorbed at ({}, {}): {:?}",
                    m.id,
                    m.color,
                    at.col,
                    at.row,
                    reason
                );
                report.absorbed.push(AbsorbEvent {
                    id: m.id,
                    color: m.color,
                    reason,
                    row: at.row,
                    col: at.col,
                });
            }
        }
    }

    state.marbles.retain(|m| m.is_moving());
    state.time_ticks += 1;
    report
}

/// Resolve the diagonal step out of `at`
fn step(state: &BoardState, at: Coord, direction: Direction) -> Step {
    let grid = &state.grid;
    let next_row = at.row + 1;
    if next_row > grid.last_playable_row {
        return Step::Exited;
    }

    let Some(next_col) = at
        .col
        .checked_add_signed(direction.col_delta())
        .filter(|&col| col < grid.cols)
    else {
        return Step::Absorbed(AbsorbReason::Blocked);
    };

    let next = Coord::new(next_row, next_col);
    match grid.get(next) {
        None => Step::Absorbed(AbsorbReason::Blocked),
        Some(cell) if cell.kind.blocks_transit() => Step::Absorbed(AbsorbReason::Blocked),
        Some(cell) if cell.occupied => Step::Absorbed(AbsorbReason::Collision),
        Some(_) => Step::Move { next, direction },
    }
}

/// Tick until nothing is in flight or `max_ticks` steps have run
pub fn run_until_settled(state: &mut BoardState, max_ticks: u64) -> TickReport {
    let mut report = TickReport::default();
    while state.in_flight() > 0 && report.ticks < max_ticks {
        report.merge(tick(state));
    }
    if state.in_flight() > 0 {
        log::warn!(
            "{} marble(s) still in flight after {} ticks",
            state.in_flight(),
            max_ticks
        );
    }
    report
}
