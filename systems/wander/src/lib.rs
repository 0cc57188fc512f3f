#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Seeded wander system that proposes constrained random enemy steps.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use wavefront_chase_core::{
    BoardDimensions, CellCoord, Command, Direction, Event, MoveHistory, SimulationError,
};

const DEFAULT_RNG_SEED: u64 = 0x5eed_0fe7_e37a_1c42;

/// Configuration parameters required to construct the wander system.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Config {
    rng_seed: u64,
}

impl Config {
    /// Creates a new configuration using the provided seed.
    #[must_use]
    pub const fn new(rng_seed: u64) -> Self {
        Self { rng_seed }
    }

    /// Seed feeding the enemy's random source.
    #[must_use]
    pub const fn rng_seed(&self) -> u64 {
        self.rng_seed
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(DEFAULT_RNG_SEED)
    }
}

/// Pure system that answers each opened tick with one enemy step command.
#[derive(Debug)]
pub struct Wander {
    rng: ChaCha8Rng,
}

impl Wander {
    /// Creates a new wander system using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(config.rng_seed),
        }
    }

    /// Consumes world events and the enemy's state to emit a step command.
    ///
    /// Nothing is emitted unless the events contain a newly opened tick.
    pub fn handle(
        &mut self,
        events: &[Event],
        dimensions: BoardDimensions,
        enemy: CellCoord,
        history: MoveHistory,
        out: &mut Vec<Command>,
    ) -> Result<(), SimulationError> {
        if !events
            .iter()
            .any(|event| matches!(event, Event::TimeAdvanced { .. }))
        {
            return Ok(());
        }

        let direction = choose_direction(dimensions, enemy, history, &mut self.rng)?;
        out.push(Command::StepEnemy { direction });
        Ok(())
    }
}

/// Advances the enemy by one uniformly chosen legal step.
///
/// Returns the enemy's new cell together with the history recording the move.
/// Fails with [`SimulationError::NoLegalMove`] when the board edges and the
/// reversal rule rule out every direction, e.g. on a 1x1 board.
pub fn step<R>(
    dimensions: BoardDimensions,
    enemy: CellCoord,
    history: MoveHistory,
    rng: &mut R,
) -> Result<(CellCoord, MoveHistory), SimulationError>
where
    R: Rng + ?Sized,
{
    let direction = choose_direction(dimensions, enemy, history, rng)?;
    let next = dimensions
        .neighbor(enemy, direction)
        .ok_or(SimulationError::NoLegalMove {
            cell: enemy,
            history,
        })?;
    Ok((next, MoveHistory::after(direction)))
}

/// Enumerates the directions the enemy may take from `enemy`.
///
/// A direction is legal when it keeps the enemy on the board and does not
/// reverse the previous move. Directions are yielded in canonical order.
pub fn legal_directions(
    dimensions: BoardDimensions,
    enemy: CellCoord,
    history: MoveHistory,
) -> LegalDirections {
    let mut legal = LegalDirections::default();
    for direction in Direction::ALL {
        if history.forbids(direction) {
            continue;
        }
        if dimensions.neighbor(enemy, direction).is_none() {
            continue;
        }
        legal.push(direction);
    }
    legal
}

fn choose_direction<R>(
    dimensions: BoardDimensions,
    enemy: CellCoord,
    history: MoveHistory,
    rng: &mut R,
) -> Result<Direction, SimulationError>
where
    R: Rng + ?Sized,
{
    let legal = legal_directions(dimensions, enemy, history);
    if legal.is_empty() {
        return Err(SimulationError::NoLegalMove {
            cell: enemy,
            history,
        });
    }

    let choice = rng.gen_range(0..legal.len());
    legal
        .get(choice)
        .ok_or(SimulationError::NoLegalMove {
            cell: enemy,
            history,
        })
}

/// Fixed-capacity set of legal directions in canonical order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LegalDirections {
    buffer: [Option<Direction>; 4],
    len: usize,
    cursor: usize,
}

impl LegalDirections {
    fn push(&mut self, direction: Direction) {
        if self.len < self.buffer.len() {
            self.buffer[self.len] = Some(direction);
            self.len += 1;
        }
    }

    /// Number of legal directions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Reports whether the enemy is boxed in.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Legal direction at the provided position.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<Direction> {
        if index >= self.len {
            return None;
        }
        self.buffer[index]
    }
}

impl Iterator for LegalDirections {
    type Item = Direction;

    fn next(&mut self) -> Option<Self::Item> {
        if self.cursor >= self.len {
            return None;
        }

        let value = self.buffer[self.cursor];
        self.cursor += 1;
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dimensions(width: i64, height: i64) -> BoardDimensions {
        BoardDimensions::try_new(width, height).expect("valid dimensions")
    }

    #[test]
    fn corner_without_history_offers_two_moves() {
        let board = dimensions(2, 2);
        let legal: Vec<_> =
            legal_directions(board, CellCoord::new(1, 1), MoveHistory::empty()).collect();

        assert_eq!(legal, vec![Direction::North, Direction::West]);
    }

    #[test]
    fn reversal_is_excluded() {
        let board = dimensions(3, 3);
        let legal: Vec<_> = legal_directions(
            board,
            CellCoord::new(1, 1),
            MoveHistory::after(Direction::East),
        )
        .collect();

        assert_eq!(
            legal,
            vec![Direction::North, Direction::South, Direction::East]
        );
    }

    #[test]
    fn single_cell_board_has_no_legal_move() {
        let board = dimensions(1, 1);
        let mut rng = ChaCha8Rng::seed_from_u64(7);

        let result = step(board, CellCoord::new(0, 0), MoveHistory::empty(), &mut rng);

        assert_eq!(
            result,
            Err(SimulationError::NoLegalMove {
                cell: CellCoord::new(0, 0),
                history: MoveHistory::empty(),
            })
        );
    }

    #[test]
    fn pinned_enemy_in_single_column_is_boxed_in() {
        let board = dimensions(1, 3);
        let history = MoveHistory::after(Direction::North);

        assert!(legal_directions(board, CellCoord::new(0, 0), history).is_empty());
    }

    #[test]
    fn single_row_forces_westward_walk() {
        let board = dimensions(5, 1);
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let mut cell = board.enemy_start();
        let mut history = MoveHistory::empty();

        for expected_column in (0..4).rev() {
            let (next, next_history) = step(board, cell, history, &mut rng).expect("legal move");
            assert_eq!(next, CellCoord::new(0, expected_column));
            assert_eq!(next_history, MoveHistory::after(Direction::West));
            cell = next;
            history = next_history;
        }
    }

    #[test]
    fn choices_are_uniform_across_legal_directions() {
        let board = dimensions(3, 3);
        let center = CellCoord::new(1, 1);
        let mut rng = ChaCha8Rng::seed_from_u64(0x1234_5678);
        let mut counts = [0_u32; 4];

        for _ in 0..4_000 {
            let (next, _) = step(board, center, MoveHistory::empty(), &mut rng).expect("legal");
            let direction = Direction::between(center, next).expect("single step");
            let slot = Direction::ALL
                .iter()
                .position(|candidate| *candidate == direction)
                .expect("known direction");
            counts[slot] += 1;
        }

        for count in counts {
            assert!(
                (800..1_200).contains(&count),
                "direction counts skewed: {counts:?}"
            );
        }
    }

    #[test]
    fn handle_ignores_batches_without_tick() {
        let mut wander = Wander::new(Config::default());
        let mut commands = Vec::new();

        wander
            .handle(
                &[],
                dimensions(3, 3),
                CellCoord::new(2, 2),
                MoveHistory::empty(),
                &mut commands,
            )
            .expect("no error");

        assert!(commands.is_empty());
    }
}
