#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative board state management for Wavefront Chase.

pub mod wavefront;

use log::{debug, info, warn};
use wavefront_chase_core::{
    Agent, BoardDimensions, CellCoord, Command, Direction, Event, MoveHistory, Occupant,
    OccupancyView, StepError,
};

pub use wavefront::DistanceField;

/// Represents the authoritative Wavefront Chase board.
#[derive(Debug)]
pub struct World {
    dimensions: BoardDimensions,
    player: CellCoord,
    enemy: CellCoord,
    history: MoveHistory,
    occupancy: OccupancyGrid,
    field: DistanceField,
    tick_index: u64,
    caught: bool,
}

impl World {
    /// Creates a new board with both agents placed on their start corners.
    #[must_use]
    pub fn new(dimensions: BoardDimensions) -> Self {
        let player = dimensions.player_start();
        let enemy = dimensions.enemy_start();
        let mut occupancy = OccupancyGrid::new(dimensions);
        occupancy.fill_with(player, enemy);

        Self {
            dimensions,
            player,
            enemy,
            history: MoveHistory::empty(),
            occupancy,
            field: DistanceField::compute(dimensions, enemy),
            tick_index: 0,
            caught: player.is_adjacent_to(enemy),
        }
    }

    fn reset(&mut self, dimensions: BoardDimensions) {
        *self = Self::new(dimensions);
    }

    fn open_tick(&mut self, out_events: &mut Vec<Event>) {
        if self.caught {
            warn!("tick requested after the enemy was caught; ignoring");
            return;
        }

        self.tick_index = self.tick_index.saturating_add(1);
        self.field.rebuild(self.dimensions, self.enemy);
        out_events.push(Event::TimeAdvanced {
            tick: self.tick_index,
        });
    }

    fn step_enemy(&mut self, direction: Direction, out_events: &mut Vec<Event>) {
        if self.caught {
            reject(Agent::Enemy, direction, StepError::AlreadyCaught, out_events);
            return;
        }
        if self.history.forbids(direction) {
            reject(Agent::Enemy, direction, StepError::Reversal, out_events);
            return;
        }
        let Some(to) = self.dimensions.neighbor(self.enemy, direction) else {
            reject(Agent::Enemy, direction, StepError::OutOfBounds, out_events);
            return;
        };

        let from = self.enemy;
        self.occupancy.vacate(from);
        self.occupancy.mark(to, Occupant::Enemy);
        self.enemy = to;
        self.history = MoveHistory::after(direction);
        debug!("tick {}: enemy {from} -> {to} ({direction})", self.tick_index);
        out_events.push(Event::EnemyAdvanced {
            from,
            to,
            direction,
        });
    }

    fn step_player(&mut self, direction: Direction, out_events: &mut Vec<Event>) {
        if self.caught {
            reject(Agent::Player, direction, StepError::AlreadyCaught, out_events);
            return;
        }
        let Some(to) = self.dimensions.neighbor(self.player, direction) else {
            reject(Agent::Player, direction, StepError::OutOfBounds, out_events);
            return;
        };

        let from = self.player;
        self.occupancy.vacate(from);
        self.occupancy.mark(to, Occupant::Player);
        self.player = to;
        debug!("tick {}: player {from} -> {to} ({direction})", self.tick_index);
        out_events.push(Event::PlayerAdvanced {
            from,
            to,
            direction,
        });

        if self.player.is_adjacent_to(self.enemy) {
            self.caught = true;
            info!(
                "enemy caught at tick {}: player {}, enemy {}",
                self.tick_index, self.player, self.enemy
            );
            out_events.push(Event::EnemyCaught {
                tick: self.tick_index,
                player: self.player,
                enemy: self.enemy,
            });
        }
    }
}

fn reject(agent: Agent, direction: Direction, reason: StepError, out_events: &mut Vec<Event>) {
    warn!("{agent} step {direction} rejected: {reason}");
    out_events.push(Event::StepRejected {
        agent,
        direction,
        reason,
    });
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::ConfigureBoard { dimensions } => {
            world.reset(dimensions);
            out_events.push(Event::BoardConfigured {
                dimensions,
                player: world.player,
                enemy: world.enemy,
            });

            if world.caught {
                out_events.push(Event::EnemyCaught {
                    tick: world.tick_index,
                    player: world.player,
                    enemy: world.enemy,
                });
            }
        }
        Command::Tick => world.open_tick(out_events),
        Command::StepEnemy { direction } => world.step_enemy(direction, out_events),
        Command::StepPlayer { direction } => world.step_player(direction, out_events),
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use super::World;
    use wavefront_chase_core::{
        BoardDimensions, CellCoord, DistanceFieldView, MoveHistory, Occupant, OccupancyView,
    };

    /// Size of the board.
    #[must_use]
    pub fn dimensions(world: &World) -> BoardDimensions {
        world.dimensions
    }

    /// Cell currently occupied by the player.
    #[must_use]
    pub fn player(world: &World) -> CellCoord {
        world.player
    }

    /// Cell currently occupied by the enemy.
    #[must_use]
    pub fn enemy(world: &World) -> CellCoord {
        world.enemy
    }

    /// Enemy's most recent move.
    #[must_use]
    pub fn move_history(world: &World) -> MoveHistory {
        world.history
    }

    /// Number of ticks opened since the board was configured.
    #[must_use]
    pub fn tick_index(world: &World) -> u64 {
        world.tick_index
    }

    /// Reports whether the chase has ended.
    #[must_use]
    pub fn is_caught(world: &World) -> bool {
        world.caught
    }

    /// Marker stored for a single cell, if it lies on the board.
    #[must_use]
    pub fn occupant(world: &World, cell: CellCoord) -> Option<Occupant> {
        world.occupancy.view().occupant(cell)
    }

    /// Exposes a read-only view of the dense occupancy grid.
    #[must_use]
    pub fn occupancy_view(world: &World) -> OccupancyView<'_> {
        world.occupancy.view()
    }

    /// Distance field captured when the current tick opened.
    ///
    /// The field is seeded from the enemy's cell before it moved, so it lags
    /// the enemy by one step once the enemy has advanced within the tick.
    #[must_use]
    pub fn distance_field_view(world: &World) -> DistanceFieldView<'_> {
        world.field.view()
    }
}

#[derive(Clone, Debug)]
struct OccupancyGrid {
    dimensions: BoardDimensions,
    cells: Vec<Occupant>,
}

impl OccupancyGrid {
    fn new(dimensions: BoardDimensions) -> Self {
        Self {
            dimensions,
            cells: vec![Occupant::Empty; dimensions.cell_count()],
        }
    }

    fn fill_with(&mut self, player: CellCoord, enemy: CellCoord) {
        self.cells.fill(Occupant::Empty);
        self.mark(enemy, Occupant::Enemy);
        self.mark(player, Occupant::Player);
    }

    fn mark(&mut self, cell: CellCoord, occupant: Occupant) {
        if let Some(index) = self.dimensions.index(cell) {
            if let Some(slot) = self.cells.get_mut(index) {
                *slot = occupant;
            }
        }
    }

    fn vacate(&mut self, cell: CellCoord) {
        self.mark(cell, Occupant::Empty);
    }

    fn view(&self) -> OccupancyView<'_> {
        OccupancyView::new(&self.cells, self.dimensions)
    }
}
