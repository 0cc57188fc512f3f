use std::collections::HashSet;

use wavefront_chase_core::{CellCoord, Direction, Event, Occupant, SimulationError};
use wavefront_chase_simulation::{Config, Simulation, SimulationState};

const TICK_LIMIT: u64 = 100_000;

#[test]
fn two_by_two_board_ends_within_two_ticks() {
    let mut first_moves = HashSet::new();

    for seed in 0..64 {
        let mut simulation =
            Simulation::new(Config::new(2, 2).with_seed(seed)).expect("valid dimensions");
        assert_eq!(simulation.player(), CellCoord::new(0, 0));
        assert_eq!(simulation.enemy(), CellCoord::new(1, 1));
        assert_eq!(simulation.player().manhattan_distance(simulation.enemy()), 2);
        assert!(!simulation.is_terminal());

        let events = simulation.tick().expect("first tick");
        let first_move = enemy_direction(&events).expect("enemy moved");
        let _ = first_moves.insert(first_move);
        assert_eq!(simulation.player(), CellCoord::new(1, 0), "south wins the tie");

        match first_move {
            Direction::West => {
                assert!(simulation.is_terminal(), "seed {seed}");
                assert_eq!(simulation.enemy(), simulation.player());
            }
            Direction::North => {
                assert_eq!(simulation.enemy(), CellCoord::new(0, 1));
                assert!(!simulation.is_terminal(), "seed {seed}");

                let _ = simulation.tick().expect("second tick");
                assert_eq!(simulation.enemy(), CellCoord::new(0, 0));
                assert_eq!(simulation.player(), CellCoord::new(0, 0));
                assert!(simulation.is_terminal(), "seed {seed}");
            }
            other => panic!("illegal first move {other} from the bottom-right corner"),
        }

        assert_eq!(simulation.tick(), Err(SimulationError::AlreadyTerminated));
    }

    assert_eq!(
        first_moves,
        HashSet::from([Direction::North, Direction::West]),
        "both legal first moves should be exercised across seeds"
    );
}

#[test]
fn single_row_board_follows_expected_trace() {
    for seed in [1, 7, 0xfeed] {
        let mut simulation =
            Simulation::new(Config::new(5, 1).with_seed(seed)).expect("valid dimensions");
        let mut trace = Vec::new();

        while !simulation.is_terminal() {
            let _ = simulation.tick().expect("tick");
            trace.push(simulation.player());
        }

        assert_eq!(trace, vec![CellCoord::new(0, 1), CellCoord::new(0, 2)]);
        assert_eq!(simulation.enemy(), CellCoord::new(0, 2));
        assert_eq!(simulation.occupancy_at(0, 2), Some(Occupant::Player));
        assert_eq!(non_empty_cells(&simulation), 1);
        assert_eq!(simulation.state(), SimulationState::Terminated);
    }
}

#[test]
fn construction_validates_dimensions() {
    assert!(matches!(
        Simulation::new(Config::new(0, 5)),
        Err(SimulationError::InvalidDimensions {
            width: 0,
            height: 5
        })
    ));
    assert!(matches!(
        Simulation::new(Config::new(5, -1)),
        Err(SimulationError::InvalidDimensions {
            width: 5,
            height: -1
        })
    ));
}

#[test]
fn invariants_hold_on_every_tick() {
    for (width, height) in [(2, 3), (4, 4), (7, 3), (9, 9)] {
        for seed in 0..24 {
            let mut simulation = Simulation::new(Config::new(width, height).with_seed(seed))
                .expect("valid dimensions");
            let dimensions = simulation.dimensions();
            let mut previous: Option<Direction> = None;

            while !simulation.is_terminal() {
                assert!(
                    simulation.tick_index() < TICK_LIMIT,
                    "chase on {dimensions} with seed {seed} did not end"
                );
                let events = simulation.tick().expect("tick");

                let direction = enemy_direction(&events).expect("enemy moves every tick");
                if let Some(last) = previous {
                    assert_ne!(direction, last.opposite(), "enemy reversed");
                }
                previous = Some(direction);

                let player = simulation.player();
                let enemy = simulation.enemy();
                assert!(dimensions.contains(player));
                assert!(dimensions.contains(enemy));
                assert_eq!(simulation.is_terminal(), player.is_adjacent_to(enemy));
                assert_eq!(
                    simulation.occupancy_at(player.row(), player.column()),
                    Some(Occupant::Player)
                );
                if player == enemy {
                    assert_eq!(non_empty_cells(&simulation), 1);
                } else {
                    assert_eq!(
                        simulation.occupancy_at(enemy.row(), enemy.column()),
                        Some(Occupant::Enemy)
                    );
                    assert_eq!(non_empty_cells(&simulation), 2);
                }
            }

            let terminal = simulation.is_terminal();
            assert_eq!(simulation.is_terminal(), terminal, "predicate is idempotent");
        }
    }
}

#[test]
fn identical_seeds_replay_identically() {
    let first = replay(Config::new(8, 6).with_seed(0x42f0_e1eb_d4a5_3c21));
    let second = replay(Config::new(8, 6).with_seed(0x42f0_e1eb_d4a5_3c21));

    assert_eq!(first, second, "replay diverged between runs");
    assert!(matches!(first.last(), Some(Event::EnemyCaught { .. })));
}

fn replay(config: Config) -> Vec<Event> {
    let mut simulation = Simulation::new(config).expect("valid dimensions");
    let mut log = Vec::new();
    while !simulation.is_terminal() {
        log.extend(simulation.tick().expect("tick"));
    }
    log
}

fn enemy_direction(events: &[Event]) -> Option<Direction> {
    events.iter().find_map(|event| match event {
        Event::EnemyAdvanced { direction, .. } => Some(*direction),
        _ => None,
    })
}

fn non_empty_cells(simulation: &Simulation) -> usize {
    simulation
        .occupancy_view()
        .iter()
        .filter(|occupant| *occupant != Occupant::Empty)
        .count()
}
