#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Tick orchestration for Wavefront Chase.
//!
//! A [`Simulation`] owns the authoritative world together with the wander and
//! pursuit systems. Each [`Simulation::tick`] opens a tick (rebuilding the
//! distance field from the enemy's cell), lets the enemy take one constrained
//! random step, and then lets the player descend the field captured before the
//! enemy moved. The chase ends once the two agents are adjacent.

use log::{debug, info};
use wavefront_chase_core::{
    BoardDimensions, CellCoord, Command, Event, MoveHistory, Occupant, OccupancyView,
    SimulationError,
};
use wavefront_chase_system_pursuit::Pursuit;
use wavefront_chase_system_wander::{self as wander, Wander};
use wavefront_chase_world::{self as world, query, World};

/// Construction parameters for a [`Simulation`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Config {
    width: i64,
    height: i64,
    rng_seed: u64,
}

impl Config {
    /// Creates a configuration for a board of the requested size.
    ///
    /// The size is validated when the simulation is constructed.
    #[must_use]
    pub fn new(width: i64, height: i64) -> Self {
        Self {
            width,
            height,
            rng_seed: wander::Config::default().rng_seed(),
        }
    }

    /// Replaces the seed feeding the enemy's random walk.
    #[must_use]
    pub const fn with_seed(mut self, rng_seed: u64) -> Self {
        self.rng_seed = rng_seed;
        self
    }

    /// Requested board width.
    #[must_use]
    pub const fn width(&self) -> i64 {
        self.width
    }

    /// Requested board height.
    #[must_use]
    pub const fn height(&self) -> i64 {
        self.height
    }

    /// Seed feeding the enemy's random walk.
    #[must_use]
    pub const fn rng_seed(&self) -> u64 {
        self.rng_seed
    }
}

/// Lifecycle of a chase.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SimulationState {
    /// The agents are apart; ticks may be issued.
    Running,
    /// The player is adjacent to the enemy; no further ticks are accepted.
    Terminated,
}

/// Single pursuit on one board.
#[derive(Debug)]
pub struct Simulation {
    world: World,
    wander: Wander,
    pursuit: Pursuit,
}

impl Simulation {
    /// Builds a simulation with the player top-left and the enemy bottom-right.
    ///
    /// Fails with [`SimulationError::InvalidDimensions`] when either side is
    /// not strictly positive.
    pub fn new(config: Config) -> Result<Self, SimulationError> {
        let dimensions = BoardDimensions::try_new(config.width, config.height)?;
        info!(
            "starting chase on {dimensions} board with seed {:#x}",
            config.rng_seed
        );

        Ok(Self {
            world: World::new(dimensions),
            wander: Wander::new(wander::Config::new(config.rng_seed)),
            pursuit: Pursuit::default(),
        })
    }

    /// Advances both agents by one step and returns the events the tick produced.
    ///
    /// Fails with [`SimulationError::AlreadyTerminated`] once the chase ended,
    /// leaving the board untouched.
    pub fn tick(&mut self) -> Result<Vec<Event>, SimulationError> {
        if self.is_terminal() {
            return Err(SimulationError::AlreadyTerminated);
        }

        let mut log = Vec::new();
        let mut events = Vec::new();
        world::apply(&mut self.world, Command::Tick, &mut events);
        debug!("tick {} opened", query::tick_index(&self.world));

        let mut commands = Vec::new();
        self.wander.handle(
            &events,
            query::dimensions(&self.world),
            query::enemy(&self.world),
            query::move_history(&self.world),
            &mut commands,
        )?;
        log.append(&mut events);
        self.dispatch(&mut commands, &mut events)?;

        self.pursuit.handle(
            &events,
            query::player(&self.world),
            &query::distance_field_view(&self.world),
            &mut commands,
        );
        log.append(&mut events);
        self.dispatch(&mut commands, &mut events)?;
        log.append(&mut events);

        Ok(log)
    }

    fn dispatch(
        &mut self,
        commands: &mut Vec<Command>,
        out_events: &mut Vec<Event>,
    ) -> Result<(), SimulationError> {
        for command in commands.drain(..) {
            world::apply(&mut self.world, command, out_events);
        }

        match out_events
            .iter()
            .find(|event| matches!(event, Event::StepRejected { .. }))
        {
            Some(Event::StepRejected {
                agent,
                direction,
                reason,
            }) => Err(SimulationError::StepRejected {
                agent: *agent,
                direction: *direction,
                reason: *reason,
            }),
            _ => Ok(()),
        }
    }

    /// Reports whether the player is within one step of the enemy.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        query::is_caught(&self.world)
    }

    /// Current lifecycle state.
    #[must_use]
    pub fn state(&self) -> SimulationState {
        if self.is_terminal() {
            SimulationState::Terminated
        } else {
            SimulationState::Running
        }
    }

    /// Marker stored for the cell at `row`, `column`, if it lies on the board.
    #[must_use]
    pub fn occupancy_at(&self, row: u32, column: u32) -> Option<Occupant> {
        query::occupant(&self.world, CellCoord::new(row, column))
    }

    /// Read-only snapshot of every cell for renderers.
    #[must_use]
    pub fn occupancy_view(&self) -> OccupancyView<'_> {
        query::occupancy_view(&self.world)
    }

    /// Size of the board.
    #[must_use]
    pub fn dimensions(&self) -> BoardDimensions {
        query::dimensions(&self.world)
    }

    /// Cell currently occupied by the player.
    #[must_use]
    pub fn player(&self) -> CellCoord {
        query::player(&self.world)
    }

    /// Cell currently occupied by the enemy.
    #[must_use]
    pub fn enemy(&self) -> CellCoord {
        query::enemy(&self.world)
    }

    /// Enemy's most recent move.
    #[must_use]
    pub fn move_history(&self) -> MoveHistory {
        query::move_history(&self.world)
    }

    /// Number of ticks processed so far.
    #[must_use]
    pub fn tick_index(&self) -> u64 {
        query::tick_index(&self.world)
    }
}
