#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic pursuit system that walks the player down the distance field.

use wavefront_chase_core::{
    BoardDimensions, CellCoord, Command, Direction, DistanceFieldView, Event,
};

/// Pure system that reacts to enemy moves by emitting one player step.
#[derive(Debug, Default)]
pub struct Pursuit;

impl Pursuit {
    /// Consumes world events and immutable views to emit a player step command.
    ///
    /// The player only moves once the enemy has advanced within the tick; the
    /// field handed in is the one captured when the tick opened.
    pub fn handle(
        &mut self,
        events: &[Event],
        player: CellCoord,
        navigation_view: &DistanceFieldView<'_>,
        out: &mut Vec<Command>,
    ) {
        if !events
            .iter()
            .any(|event| matches!(event, Event::EnemyAdvanced { .. }))
        {
            return;
        }

        let Some(next_cell) = step(navigation_view.dimensions(), player, navigation_view) else {
            return;
        };

        if let Some(direction) = Direction::between(player, next_cell) {
            out.push(Command::StepPlayer { direction });
        }
    }
}

/// Picks the neighbor of `player` with the smallest field value.
///
/// Neighbors are scanned North, West, South, East and only a strictly smaller
/// value replaces the current best, so ties resolve to the earliest scanned
/// neighbor. The player always moves, even when every neighbor is farther
/// from the reference than its own cell. Returns `None` only when the board
/// has no neighbor to move to.
#[must_use]
pub fn step(
    dimensions: BoardDimensions,
    player: CellCoord,
    field: &DistanceFieldView<'_>,
) -> Option<CellCoord> {
    let mut best: Option<Candidate> = None;

    for neighbor in scan_order(player, dimensions) {
        let Some(distance) = field.distance(neighbor) else {
            continue;
        };

        let candidate = Candidate {
            cell: neighbor,
            distance,
        };
        best = Some(match best {
            None => candidate,
            Some(existing) => {
                if candidate.is_better_than(existing) {
                    candidate
                } else {
                    existing
                }
            }
        });
    }

    best.map(|candidate| candidate.cell)
}

#[derive(Clone, Copy, Debug)]
struct Candidate {
    cell: CellCoord,
    distance: u32,
}

impl Candidate {
    fn is_better_than(self, other: Candidate) -> bool {
        self.distance < other.distance
    }
}

/// For each offset -1 then +1: the vertical neighbor first, then the horizontal one.
fn scan_order(cell: CellCoord, dimensions: BoardDimensions) -> NeighborIter {
    let mut neighbors = NeighborIter::default();

    for direction in [
        Direction::North,
        Direction::West,
        Direction::South,
        Direction::East,
    ] {
        if let Some(neighbor) = dimensions.neighbor(cell, direction) {
            neighbors.push(neighbor);
        }
    }

    neighbors
}

#[derive(Clone, Debug, Default)]
struct NeighborIter {
    buffer: [Option<CellCoord>; 4],
    len: usize,
    cursor: usize,
}

impl NeighborIter {
    fn push(&mut self, cell: CellCoord) {
        if self.len < self.buffer.len() {
            self.buffer[self.len] = Some(cell);
            self.len += 1;
        }
    }
}

impl Iterator for NeighborIter {
    type Item = CellCoord;

    fn next(&mut self) -> Option<Self::Item> {
        if self.cursor >= self.len {
            return None;
        }

        let value = self.buffer[self.cursor];
        self.cursor += 1;
        value
    }
}
