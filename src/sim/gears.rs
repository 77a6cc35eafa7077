//! Gear trains
//!
//! A gear train is every gear and gear bit reachable from a seed through
//! orthogonal neighbours. Trains are rediscovered on demand and never stored.
//! All gear bits in a train share one orientation, so flips are group-wide
//! inversions.

use std::collections::VecDeque;

use super::component::{ComponentKind, Orientation};
use super::grid::{Coord, Grid};

/// Coordinates of the train containing `seed`, row-major.
///
/// Empty when the seed is out of bounds or not a gear-family cell.
pub fn find_connected_group(grid: &Grid, seed: Coord) -> Vec<Coord> {
    let is_gear = |c: Coord| grid.kind(c).is_some_and(|k| k.is_gear_family());
    if !is_gear(seed) {
        return Vec::new();
    }

    let mut visited = vec![false; grid.rows * grid.cols];
    let idx = |c: Coord| c.row * grid.cols + c.col;
    let mut queue = VecDeque::new();
    let mut group = Vec::new();

    visited[idx(seed)] = true;
    queue.push_back(seed);

    while let Some(at) = queue.pop_front() {
        group.push(at);
        for next in at.neighbours() {
            if !grid.contains(next) || visited[idx(next)] {
                continue;
            }
            if is_gear(next) {
                visited[idx(next)] = true;
                queue.push_back(next);
            }
        }
    }

    group.sort();
    group
}

/// Invert every gear bit in the train through `seed`. Returns how many bits
/// flipped.
pub fn flip_group(grid: &mut Grid, seed: Coord) -> usize {
    let group = find_connected_group(grid, seed);
    let mut flipped = 0;
    for at in group {
        if let Some(ComponentKind::GearBit(o)) = grid.kind(at) {
            grid.replace(at, ComponentKind::GearBit(o.flipped()));
            flipped += 1;
        }
    }
    if flipped > 0 {
        log::debug!(
            "Gear train at ({}, {}) flipped {} bit(s)",
            seed.col,
            seed.row,
            flipped
        );
    }
    flipped
}

/// Align a freshly placed gear piece with the train it joined.
///
/// Counts the gear bits already in the train (the new cell excluded). When
/// there are any, the majority orientation wins, ties going to `Right`, and
/// every gear bit of the train is set to it. Returns the applied orientation,
/// or `None` when the train had no prior gear bits.
pub fn reconcile(grid: &mut Grid, placed: Coord) -> Option<Orientation> {
    let group = find_connected_group(grid, placed);

    let (mut left, mut right) = (0usize, 0usize);
    for &at in group.iter().filter(|&&at| at != placed) {
        match grid.kind(at) {
            Some(ComponentKind::GearBit(Orientation::Left)) => left += 1,
            Some(ComponentKind::GearBit(Orientation::Right)) => right += 1,
            _ => {}
        }
    }
    if left + right == 0 {
        return None;
    }

    let consensus = if left > right {
        Orientation::Left
    } else {
        Orientation::Right
    };

    for at in group {
        if matches!(grid.kind(at), Some(ComponentKind::GearBit(_))) {
            grid.replace(at, ComponentKind::GearBit(consensus));
        }
    }
    log::debug!(
        "Gear train through ({}, {}) aligned {:?} ({} left / {} right)",
        placed.col,
        placed.row,
        consensus,
        left,
        right
    );
    Some(consensus)
}

/// Gear bit orientations in a train, row-major
pub fn orientations(grid: &Grid, seed: Coord) -> Vec<Orientation> {
    find_connected_group(grid, seed)
        .into_iter()
        .filter_map(|at| match grid.kind(at) {
            Some(ComponentKind::GearBit(o)) => Some(o),
            _ => None,
        })
        .collect()
}
