#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Wavefront Chase engine.
//!
//! This crate defines the message surface that connects the simulation
//! driver, the authoritative world, and pure systems. Drivers submit
//! [`Command`] values describing desired mutations, the world executes those
//! commands via its `apply` entry point, and then broadcasts [`Event`] values
//! for systems to react to deterministically. Systems consume event streams,
//! query immutable snapshots, and respond exclusively with new command batches.

use std::{borrow::Cow, fmt};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Resets the board to the provided dimensions with both agents at their start cells.
    ConfigureBoard {
        /// Size of the board measured in cells.
        dimensions: BoardDimensions,
    },
    /// Opens a new tick and rebuilds the distance field from the enemy's current cell.
    Tick,
    /// Requests that the enemy advance a single step in the specified direction.
    StepEnemy {
        /// Direction of travel for the attempted step.
        direction: Direction,
    },
    /// Requests that the player advance a single step in the specified direction.
    StepPlayer {
        /// Direction of travel for the attempted step.
        direction: Direction,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// Confirms that the board was (re)configured.
    BoardConfigured {
        /// Size of the configured board.
        dimensions: BoardDimensions,
        /// Cell the player starts from.
        player: CellCoord,
        /// Cell the enemy starts from.
        enemy: CellCoord,
    },
    /// Indicates that a new tick opened and the distance field was rebuilt.
    TimeAdvanced {
        /// One-based index of the tick that just opened.
        tick: u64,
    },
    /// Confirms that the enemy moved between two cells.
    EnemyAdvanced {
        /// Cell the enemy occupied before moving.
        from: CellCoord,
        /// Cell the enemy occupies after moving.
        to: CellCoord,
        /// Direction recorded in the move history.
        direction: Direction,
    },
    /// Confirms that the player moved between two cells.
    PlayerAdvanced {
        /// Cell the player occupied before moving.
        from: CellCoord,
        /// Cell the player occupies after moving.
        to: CellCoord,
        /// Direction of the step.
        direction: Direction,
    },
    /// Announces that the player reached a cell adjacent to the enemy.
    EnemyCaught {
        /// Tick during which the capture happened.
        tick: u64,
        /// Final cell of the player.
        player: CellCoord,
        /// Final cell of the enemy.
        enemy: CellCoord,
    },
    /// Reports that a step request was refused by the world.
    StepRejected {
        /// Agent the step was requested for.
        agent: Agent,
        /// Requested direction.
        direction: Direction,
        /// Specific reason the step failed.
        reason: StepError,
    },
}

/// The two agents inhabiting the board.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Agent {
    /// The pursuer that follows the distance field.
    Player,
    /// The pursued agent that wanders randomly.
    Enemy,
}

impl fmt::Display for Agent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Player => f.write_str("player"),
            Self::Enemy => f.write_str("enemy"),
        }
    }
}

/// Cardinal movement directions available to both agents.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Movement toward decreasing row indices.
    North,
    /// Movement toward increasing row indices.
    South,
    /// Movement toward decreasing column indices.
    West,
    /// Movement toward increasing column indices.
    East,
}

impl Direction {
    /// Every direction in canonical order.
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::South,
        Direction::West,
        Direction::East,
    ];

    /// Direction that undoes a step taken in `self`.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::North => Self::South,
            Self::South => Self::North,
            Self::West => Self::East,
            Self::East => Self::West,
        }
    }

    /// Resolves the direction of a single orthogonal step between two cells.
    #[must_use]
    pub fn between(from: CellCoord, to: CellCoord) -> Option<Self> {
        let column_diff = from.column().abs_diff(to.column());
        let row_diff = from.row().abs_diff(to.row());
        if column_diff + row_diff != 1 {
            return None;
        }

        if column_diff == 1 {
            if to.column() > from.column() {
                Some(Self::East)
            } else {
                Some(Self::West)
            }
        } else if to.row() > from.row() {
            Some(Self::South)
        } else {
            Some(Self::North)
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::North => "north",
            Self::South => "south",
            Self::West => "west",
            Self::East => "east",
        };
        f.write_str(name)
    }
}

/// Last move taken by the enemy, used to forbid immediate reversals.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MoveHistory {
    last: Option<Direction>,
}

impl MoveHistory {
    /// History of an agent that has not moved yet.
    #[must_use]
    pub const fn empty() -> Self {
        Self { last: None }
    }

    /// History recording `direction` as the most recent move.
    #[must_use]
    pub const fn after(direction: Direction) -> Self {
        Self {
            last: Some(direction),
        }
    }

    /// Most recent move, if any.
    #[must_use]
    pub const fn last(&self) -> Option<Direction> {
        self.last
    }

    /// Reports whether taking `direction` would reverse the previous move.
    #[must_use]
    pub fn forbids(&self, direction: Direction) -> bool {
        self.last.map_or(false, |last| last.opposite() == direction)
    }
}

impl fmt::Display for MoveHistory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.last {
            Some(direction) => write!(f, "last move {direction}"),
            None => f.write_str("no previous move"),
        }
    }
}

/// Location of a single grid cell expressed as row and column coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    row: u32,
    column: u32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(row: u32, column: u32) -> Self {
        Self { row, column }
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Computes the Manhattan distance between two cell coordinates.
    #[must_use]
    pub fn manhattan_distance(self, other: CellCoord) -> u32 {
        self.column().abs_diff(other.column()) + self.row().abs_diff(other.row())
    }

    /// Reports whether `other` lies within one orthogonal step (or on the same cell).
    #[must_use]
    pub fn is_adjacent_to(self, other: CellCoord) -> bool {
        self.manhattan_distance(other) <= 1
    }
}

impl fmt::Display for CellCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.column)
    }
}

/// Validated size of the rectangular board.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BoardDimensions {
    columns: u32,
    rows: u32,
}

impl BoardDimensions {
    /// Validates the requested width and height.
    ///
    /// Both values must be strictly positive and the resulting cell count must
    /// be addressable on the host.
    pub fn try_new(width: i64, height: i64) -> Result<Self, SimulationError> {
        let invalid = SimulationError::InvalidDimensions { width, height };
        if width <= 0 || height <= 0 {
            return Err(invalid);
        }

        let columns = u32::try_from(width).map_err(|_| invalid.clone())?;
        let rows = u32::try_from(height).map_err(|_| invalid.clone())?;
        let dimensions = Self { columns, rows };
        if dimensions.checked_cell_count().is_none() {
            return Err(invalid);
        }

        Ok(dimensions)
    }

    /// Number of columns (board width).
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Number of rows (board height).
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Total number of cells on the board.
    #[must_use]
    pub fn cell_count(&self) -> usize {
        self.checked_cell_count().unwrap_or(0)
    }

    /// Reports whether the cell lies on the board.
    #[must_use]
    pub const fn contains(&self, cell: CellCoord) -> bool {
        cell.row() < self.rows && cell.column() < self.columns
    }

    /// Row-major offset of the cell, if it lies on the board.
    #[must_use]
    pub fn index(&self, cell: CellCoord) -> Option<usize> {
        if !self.contains(cell) {
            return None;
        }

        let row = usize::try_from(cell.row()).ok()?;
        let column = usize::try_from(cell.column()).ok()?;
        let width = usize::try_from(self.columns).ok()?;
        row.checked_mul(width)?.checked_add(column)
    }

    /// Cell reached by stepping once in `direction`, if it stays on the board.
    #[must_use]
    pub fn neighbor(&self, cell: CellCoord, direction: Direction) -> Option<CellCoord> {
        let next = match direction {
            Direction::North => CellCoord::new(cell.row().checked_sub(1)?, cell.column()),
            Direction::South => CellCoord::new(cell.row().checked_add(1)?, cell.column()),
            Direction::West => CellCoord::new(cell.row(), cell.column().checked_sub(1)?),
            Direction::East => CellCoord::new(cell.row(), cell.column().checked_add(1)?),
        };

        self.contains(next).then_some(next)
    }

    /// Start cell of the player: the top-left corner.
    #[must_use]
    pub const fn player_start(&self) -> CellCoord {
        CellCoord::new(0, 0)
    }

    /// Start cell of the enemy: the bottom-right corner.
    #[must_use]
    pub const fn enemy_start(&self) -> CellCoord {
        CellCoord::new(self.rows.saturating_sub(1), self.columns.saturating_sub(1))
    }

    fn checked_cell_count(&self) -> Option<usize> {
        let columns = usize::try_from(self.columns).ok()?;
        let rows = usize::try_from(self.rows).ok()?;
        columns.checked_mul(rows)
    }
}

impl fmt::Display for BoardDimensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.columns, self.rows)
    }
}

/// Marker describing what occupies a cell.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Occupant {
    /// Nothing occupies the cell.
    #[default]
    Empty,
    /// The player stands on the cell.
    Player,
    /// The enemy stands on the cell.
    Enemy,
}

/// Read-only view into a dense distance field.
#[derive(Clone, Debug)]
pub struct DistanceFieldView<'a> {
    distances: Cow<'a, [u32]>,
    dimensions: BoardDimensions,
}

impl<'a> DistanceFieldView<'a> {
    /// Captures a view backed by a borrowed row-major distance slice.
    #[must_use]
    pub fn new(distances: &'a [u32], dimensions: BoardDimensions) -> Self {
        Self {
            distances: Cow::Borrowed(distances),
            dimensions,
        }
    }

    /// Captures a view that owns its row-major distances.
    #[must_use]
    pub fn from_owned(
        distances: Vec<u32>,
        dimensions: BoardDimensions,
    ) -> DistanceFieldView<'static> {
        DistanceFieldView {
            distances: Cow::Owned(distances),
            dimensions,
        }
    }

    /// Distance stored for the provided cell, if it lies within the field.
    #[must_use]
    pub fn distance(&self, cell: CellCoord) -> Option<u32> {
        self.dimensions
            .index(cell)
            .and_then(|index| self.distances.get(index).copied())
    }

    /// Dense distances stored in row-major order.
    #[must_use]
    pub fn cells(&self) -> &[u32] {
        &self.distances
    }

    /// Dimensions of the board the field was computed for.
    #[must_use]
    pub const fn dimensions(&self) -> BoardDimensions {
        self.dimensions
    }
}

/// Read-only view into the dense occupancy grid.
#[derive(Clone, Copy, Debug)]
pub struct OccupancyView<'a> {
    cells: &'a [Occupant],
    dimensions: BoardDimensions,
}

impl<'a> OccupancyView<'a> {
    /// Captures a new occupancy view backed by the provided cell slice.
    #[must_use]
    pub fn new(cells: &'a [Occupant], dimensions: BoardDimensions) -> Self {
        Self { cells, dimensions }
    }

    /// Returns the marker stored for the provided cell, if it lies on the board.
    #[must_use]
    pub fn occupant(&self, cell: CellCoord) -> Option<Occupant> {
        self.dimensions
            .index(cell)
            .and_then(|index| self.cells.get(index).copied())
    }

    /// Returns an iterator over all cells in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = Occupant> + 'a {
        self.cells.iter().copied()
    }

    /// Returns an iterator over the board rows, top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &'a [Occupant]> + 'a {
        let width = usize::try_from(self.dimensions.columns()).unwrap_or(1).max(1);
        self.cells.chunks(width)
    }

    /// Provides the dimensions of the underlying occupancy grid.
    #[must_use]
    pub const fn dimensions(&self) -> BoardDimensions {
        self.dimensions
    }
}

/// Reasons the world may refuse a step request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Error)]
pub enum StepError {
    /// The step would leave the board.
    #[error("step leaves the board")]
    OutOfBounds,
    /// The step would reverse the enemy's previous move.
    #[error("step reverses the previous move")]
    Reversal,
    /// The chase already ended; agents no longer move.
    #[error("the enemy was already caught")]
    AlreadyCaught,
}

/// Errors surfaced by the simulation engine.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum SimulationError {
    /// Width or height was not a positive, addressable size.
    #[error("board dimensions must be positive (received {width}x{height})")]
    InvalidDimensions {
        /// Requested width.
        width: i64,
        /// Requested height.
        height: i64,
    },
    /// A tick was requested after the chase ended.
    #[error("simulation already terminated; no further ticks may be issued")]
    AlreadyTerminated,
    /// The enemy is boxed in by the board edges and its move history.
    #[error("enemy at {cell} has no legal move ({history})")]
    NoLegalMove {
        /// Cell the enemy is stuck on.
        cell: CellCoord,
        /// History that rules out the only in-bounds direction.
        history: MoveHistory,
    },
    /// The world refused a step proposed by one of the systems.
    #[error("{agent} step {direction} rejected: {reason}")]
    StepRejected {
        /// Agent the step was proposed for.
        agent: Agent,
        /// Proposed direction.
        direction: Direction,
        /// Reason reported by the world.
        reason: StepError,
    },
}
