use std::time::Duration;

use nightfield_core::{
    CellCoord, ConfigError, EnemyState, Event, GameConfig, GridError, Phase, PlacementError,
    StatsReport, WeaponKind,
};
use nightfield_session::{Presenter, Session, VisualHandle, VisualKind};
use nightfield_world::query;

const FRAME: Duration = Duration::from_millis(100);

#[derive(Clone, Debug, PartialEq)]
enum Call {
    Spawn(VisualKind, CellCoord, VisualHandle),
    Despawn(VisualHandle),
    Stats(StatsReport),
    Weapon(WeaponKind, CellCoord),
}

#[derive(Debug, Default)]
struct RecordingPresenter {
    next_handle: u64,
    calls: Vec<Call>,
}

impl RecordingPresenter {
    fn last_stats(&self) -> Option<StatsReport> {
        self.calls.iter().rev().find_map(|call| match call {
            Call::Stats(stats) => Some(*stats),
            _ => None,
        })
    }

    fn spawned(&self, kind: VisualKind) -> usize {
        self.calls
            .iter()
            .filter(|call| matches!(call, Call::Spawn(spawned, ..) if *spawned == kind))
            .count()
    }

    fn despawned(&self) -> usize {
        self.calls
            .iter()
            .filter(|call| matches!(call, Call::Despawn(_)))
            .count()
    }
}

impl Presenter for RecordingPresenter {
    fn spawn_visual(&mut self, kind: VisualKind, cell: CellCoord) -> VisualHandle {
        let handle = VisualHandle::new(self.next_handle);
        self.next_handle += 1;
        self.calls.push(Call::Spawn(kind, cell, handle));
        handle
    }

    fn despawn_visual(&mut self, handle: VisualHandle) {
        self.calls.push(Call::Despawn(handle));
    }

    fn report_stats(&mut self, stats: StatsReport) {
        self.calls.push(Call::Stats(stats));
    }

    fn request_weapon_effect(&mut self, weapon: WeaponKind, cell: CellCoord) {
        self.calls.push(Call::Weapon(weapon, cell));
    }
}

fn config() -> GameConfig {
    GameConfig {
        columns: 9,
        rows: 9,
        night_duration_secs: 10.0,
        straggler_chance: 0.0,
        ..GameConfig::default()
    }
}

fn session(config: GameConfig) -> Session<RecordingPresenter> {
    Session::new(config, RecordingPresenter::default()).expect("valid config")
}

/// Ticks whole frames until the night is over; returns every event seen.
fn run_night(session: &mut Session<RecordingPresenter>) -> Vec<Event> {
    assert_eq!(query::phase(session.world()), Phase::Night);
    let mut events = Vec::new();
    for _ in 0..1_000 {
        session.tick(FRAME);
        events.extend_from_slice(session.last_events());
        if query::phase(session.world()) != Phase::Night {
            break;
        }
    }
    events
}

#[test]
fn plant_then_extract_on_a_nine_by_nine_board() {
    let mut session = session(config());
    let cell = CellCoord::new(4, 4);
    assert_eq!(
        session.presenter().last_stats(),
        Some(StatsReport {
            cycle: 1,
            plants: 0,
            seeds: 1,
            extracted: 0
        })
    );

    session.on_tile_activated(cell).expect("cell on board");
    assert_eq!(
        query::entity_at(session.world(), cell).map(|cell| cell.plant().is_some()),
        Ok(true)
    );
    assert_eq!(query::nearest_plant(session.world(), cell), Some(cell));
    assert_eq!(session.presenter().spawned(VisualKind::Plant), 1);

    session.advance_phase();
    session.on_tile_activated(cell).expect("cell on board");

    assert_eq!(
        session.presenter().last_stats(),
        Some(StatsReport {
            cycle: 1,
            plants: 0,
            seeds: 2,
            extracted: 1
        })
    );
    assert_eq!(session.presenter().despawned(), 1);
}

#[test]
fn activation_outside_the_board_is_an_error() {
    let mut session = session(config());
    let calls_before = session.presenter().calls.len();

    let result = session.on_tile_activated(CellCoord::new(9, 0));

    assert_eq!(
        result,
        Err(GridError::OutOfBounds {
            cell: CellCoord::new(9, 0),
            columns: 9,
            rows: 9,
        })
    );
    assert_eq!(session.presenter().calls.len(), calls_before);
    assert_eq!(query::economy(session.world()).seeds, 1);
}

#[test]
fn invalid_configuration_is_rejected() {
    let result = Session::new(
        GameConfig {
            columns: 0,
            ..GameConfig::default()
        },
        RecordingPresenter::default(),
    );
    assert!(matches!(result, Err(ConfigError::EmptyGrid { .. })));
}

#[test]
fn phases_follow_dawn_day_night() {
    let mut session = session(config());
    assert_eq!(query::phase(session.world()), Phase::Dawn);

    session.advance_phase();
    assert_eq!(query::phase(session.world()), Phase::Day);
    session.advance_phase();
    assert_eq!(query::phase(session.world()), Phase::Night);
    session.advance_phase();
    assert_eq!(query::phase(session.world()), Phase::Night);

    let events = run_night(&mut session);
    assert!(events.contains(&Event::PhaseChanged {
        phase: Phase::Dawn,
        cycle: 2
    }));
    assert_eq!(query::cycle(session.world()), 2);
}

#[test]
fn night_without_seeds_ends_at_day() {
    let mut session = session(config());
    session
        .on_tile_activated(CellCoord::new(8, 8))
        .expect("cell on board");
    session.advance_phase();
    session.advance_phase();

    let _ = run_night(&mut session);

    assert_eq!(query::phase(session.world()), Phase::Day);
    assert_eq!(query::cycle(session.world()), 2);
}

#[test]
fn each_ten_second_night_has_exactly_one_burst() {
    let mut session = session(config());
    let limit = query::enemy_limit(session.world());
    assert_eq!(limit, 18);

    for (cycle, expected) in [(1, 18), (2, 0)] {
        session.advance_phase();
        session.advance_phase();
        let events = run_night(&mut session);

        let spawned = events
            .iter()
            .filter(|event| matches!(event, Event::EnemySpawned { .. }))
            .count();
        assert_eq!(spawned, expected, "cycle {cycle}");
        assert_eq!(query::active_enemies(session.world()), 18, "cycle {cycle}");
    }

    assert_eq!(query::enemy_limit(session.world()), limit);
    assert_eq!(session.presenter().spawned(VisualKind::Enemy), 18);
    assert_eq!(session.presenter().despawned(), 0);
}

#[test]
fn raised_limit_lets_the_next_night_burst_again() {
    let mut session = session(config());
    session.advance_phase();
    session.advance_phase();
    let _ = run_night(&mut session);
    assert_eq!(query::active_enemies(session.world()), 18);

    let cell = CellCoord::new(4, 4);
    session.on_tile_activated(cell).expect("cell on board");
    session.advance_phase();
    session.on_tile_activated(cell).expect("cell on board");
    assert_eq!(query::enemy_limit(session.world()), 58);

    session.advance_phase();
    let events = run_night(&mut session);
    let spawned = events
        .iter()
        .filter(|event| matches!(event, Event::EnemySpawned { .. }))
        .count();
    assert_eq!(spawned, 40);
    assert_eq!(query::active_enemies(session.world()), 58);
}

#[test]
fn dawn_planting_on_an_enemy_cell_is_infested() {
    let mut session = session(config());
    session.advance_phase();
    session.advance_phase();
    let _ = run_night(&mut session);
    assert_eq!(query::phase(session.world()), Phase::Dawn);

    let cell = query::enemy_view(session.world())
        .iter()
        .map(|enemy| enemy.occupied)
        .next()
        .expect("the wave outlives the night");
    session.on_tile_activated(cell).expect("cell on board");

    assert_eq!(
        session.last_events(),
        &[Event::PlantPlacementRejected {
            cell,
            reason: PlacementError::Infested
        }]
    );
    assert_eq!(query::economy(session.world()).seeds, 1);
    assert!(query::plants(session.world()).is_empty());
}

#[test]
fn enemies_stand_in_exactly_one_horde() {
    let mut session = session(config());
    session
        .on_tile_activated(CellCoord::new(5, 5))
        .expect("cell on board");
    session.advance_phase();
    session.advance_phase();

    let mut checked = 0;
    for _ in 0..100 {
        session.tick(FRAME);
        for enemy in query::enemy_view(session.world()).iter() {
            assert_eq!(
                query::cells_holding(session.world(), enemy.id),
                vec![enemy.occupied],
                "enemy {} occupancy",
                enemy.id.get()
            );
            checked += 1;
        }
    }
    assert!(checked > 0, "the burst should have spawned enemies");
}

#[test]
fn extract_and_replant_keeps_the_history_size() {
    let mut session = session(config());
    let cell = CellCoord::new(2, 3);
    session.on_tile_activated(cell).expect("cell on board");
    let before = query::plants(session.world()).len();

    session.advance_phase();
    session.on_tile_activated(cell).expect("cell on board");
    assert!(query::plants(session.world()).is_empty());

    session.advance_phase();
    let _ = run_night(&mut session);
    assert_eq!(query::phase(session.world()), Phase::Dawn);
    session.on_tile_activated(cell).expect("cell on board");

    let plants = query::plants(session.world());
    assert_eq!(plants.len(), before);
    assert_eq!(plants[0].planted_cycle, 2);
}

#[test]
fn armed_weapon_fires_at_night() {
    let mut session = session(config());
    session.advance_phase();
    session.advance_phase();
    let cell = CellCoord::new(3, 1);

    session.on_tile_activated(cell).expect("cell on board");
    session.select_weapon(Some(WeaponKind::Spray));
    session.on_tile_activated(cell).expect("cell on board");

    let fired: Vec<&Call> = session
        .presenter()
        .calls
        .iter()
        .filter(|call| matches!(call, Call::Weapon(..)))
        .collect();
    assert_eq!(fired, vec![&Call::Weapon(WeaponKind::Spray, cell)]);
}

#[test]
fn retargeting_without_plants_leaves_enemies_idle() {
    let mut session = session(config());
    session.advance_phase();
    session.advance_phase();
    for _ in 0..80 {
        session.tick(FRAME);
    }
    assert!(query::active_enemies(session.world()) > 0);

    session.retarget_idle_enemies();

    assert!(session.last_events().is_empty());
    assert!(query::enemy_view(session.world())
        .iter()
        .all(|enemy| enemy.state == EnemyState::Idle));
}

#[test]
fn idle_survivors_hunt_a_dawn_plant_after_retargeting() {
    let mut session = session(config());
    session.advance_phase();
    session.advance_phase();
    let _ = run_night(&mut session);
    assert_eq!(query::phase(session.world()), Phase::Dawn);

    let target = CellCoord::new(4, 4);
    session.on_tile_activated(target).expect("cell on board");
    session.retarget_idle_enemies();
    let routed = session
        .last_events()
        .iter()
        .filter(|event| {
            matches!(event, Event::EnemyRouted { destination, .. } if *destination == target)
        })
        .count();
    assert_eq!(query::active_enemies(session.world()), 18);
    assert_eq!(routed, 18);

    let mut killed = false;
    for _ in 0..400 {
        session.tick(FRAME);
        if session
            .last_events()
            .iter()
            .any(|event| matches!(event, Event::PlantKilled { cell, .. } if *cell == target))
        {
            killed = true;
            break;
        }
    }
    assert!(killed, "survivors should reach the plant during dawn");
    assert_eq!(query::phase(session.world()), Phase::Dawn);
    assert_eq!(query::economy(session.world()).seeds, 0);
}

#[test]
fn identical_sessions_replay_identically() {
    let play = || {
        let mut session = session(GameConfig {
            straggler_chance: 0.5,
            ..config()
        });
        session
            .on_tile_activated(CellCoord::new(3, 6))
            .expect("cell on board");
        session.advance_phase();
        session.advance_phase();
        let events = run_night(&mut session);
        (events, session.into_presenter().calls)
    };

    let (first_events, first_calls) = play();
    let (second_events, second_calls) = play();
    assert_eq!(first_events, second_events);
    assert_eq!(first_calls, second_calls);
}
