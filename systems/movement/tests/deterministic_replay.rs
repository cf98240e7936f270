use std::time::Duration;

use nightfield_core::{CellCoord, Command, EnemySnapshot, Event, GameConfig};
use nightfield_system_movement::{Config, Movement};
use nightfield_world::{self as world, query, World};

#[test]
fn deterministic_replay_produces_identical_logs() {
    let first = replay(0x0dd_5eed);
    let second = replay(0x0dd_5eed);

    assert_eq!(first.events, second.events, "replay diverged between runs");
    assert_eq!(first.enemies, second.enemies);
    assert!(
        first
            .events
            .iter()
            .any(|event| matches!(event, Event::PlantKilled { .. })),
        "the scripted wave should reach a plant"
    );
}

struct ReplayOutcome {
    events: Vec<Event>,
    enemies: Vec<EnemySnapshot>,
}

fn replay(seed: u64) -> ReplayOutcome {
    let mut world = World::new(&GameConfig {
        columns: 8,
        rows: 8,
        tile_length: 1.0,
        initial_seeds: 1,
        ..GameConfig::default()
    });
    let mut movement = Movement::new(Config::new(1.0, seed));
    let mut log = Vec::new();

    for command in scripted_commands() {
        let mut events = Vec::new();
        world::apply(&mut world, command, &mut events);

        let mut commands = Vec::new();
        movement.handle(&events, &query::enemy_view(&world), &mut commands);
        for command in commands {
            world::apply(&mut world, command, &mut events);
        }

        let mut routes = Vec::new();
        movement.route(
            &events,
            &query::enemy_view(&world),
            |cell| query::nearest_plant(&world, cell),
            &mut routes,
        );
        for command in routes {
            world::apply(&mut world, command, &mut events);
        }
        log.extend(events);
    }

    ReplayOutcome {
        events: log,
        enemies: query::enemy_view(&world).into_vec(),
    }
}

fn scripted_commands() -> Vec<Command> {
    let mut commands = vec![
        Command::ActivateTile {
            cell: CellCoord::new(4, 4),
        },
        Command::SpawnEnemy {
            cell: CellCoord::new(0, 0),
        },
        Command::SpawnEnemy {
            cell: CellCoord::new(7, 0),
        },
        Command::SpawnEnemy {
            cell: CellCoord::new(0, 7),
        },
    ];
    commands.extend((0..80).map(|_| Command::Tick {
        dt: Duration::from_millis(250),
    }));
    commands
}
