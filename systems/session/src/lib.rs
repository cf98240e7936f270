#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Game session that owns the world, drives the pure systems once per frame
//! and forwards the outcome to a presentation layer.

use std::{collections::BTreeMap, time::Duration};

use nightfield_core::{
    CellCoord, Command, ConfigError, Event, GameConfig, GridError, PlantId, StatsReport,
    WeaponKind,
};
use nightfield_system_movement::{self as movement, Movement};
use nightfield_system_spawning::{self as spawning, Spawning};
use nightfield_world::{self as world, query, World};
use tracing::{debug, info};

/// Kind of object a visual represents.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum VisualKind {
    /// A plant growing on a tile.
    Plant,
    /// An enemy walking across the board.
    Enemy,
}

/// Opaque handle allocated by a [`Presenter`] for a spawned visual.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VisualHandle(u64);

impl VisualHandle {
    /// Creates a new handle with the provided numeric value.
    #[must_use]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the handle.
    #[must_use]
    pub const fn get(&self) -> u64 {
        self.0
    }
}

/// Presentation layer notified about everything the player should see.
pub trait Presenter {
    /// Creates a visual for an object that appeared on `cell`.
    fn spawn_visual(&mut self, kind: VisualKind, cell: CellCoord) -> VisualHandle;

    /// Removes a visual previously returned by [`Presenter::spawn_visual`].
    fn despawn_visual(&mut self, handle: VisualHandle);

    /// Receives the counters after every state change.
    fn report_stats(&mut self, stats: StatsReport);

    /// Plays the effect of a weapon fired at `cell`.
    fn request_weapon_effect(&mut self, weapon: WeaponKind, cell: CellCoord);
}

/// Explicit game session; one instance per game.
#[derive(Debug)]
pub struct Session<P> {
    world: World,
    spawning: Spawning,
    movement: Movement,
    presenter: P,
    plant_visuals: BTreeMap<PlantId, VisualHandle>,
    last_events: Vec<Event>,
}

impl<P: Presenter> Session<P> {
    /// Validates `config` and starts a session at dawn of the first cycle.
    pub fn new(config: GameConfig, presenter: P) -> Result<Self, ConfigError> {
        config.validate()?;

        let world = World::new(&config);
        info!(
            banner = query::welcome_banner(&world),
            columns = config.columns,
            rows = config.rows,
            "session started"
        );
        let mut session = Self {
            world,
            spawning: Spawning::new(spawning::Config::from(&config)),
            movement: Movement::new(movement::Config::new(
                config.tile_length,
                config.rng_seed.rotate_left(32),
            )),
            presenter,
            plant_visuals: BTreeMap::new(),
            last_events: Vec::new(),
        };
        session.presenter.report_stats(query::stats(&session.world));
        Ok(session)
    }

    /// Advances the simulation by one frame.
    ///
    /// The world tick runs first, then spawning, enemy movement and finally
    /// routing of every enemy that spawned or reached a cell centre.
    pub fn tick(&mut self, dt: Duration) {
        let mut events = Vec::new();
        world::apply(&mut self.world, Command::Tick { dt }, &mut events);

        let mut commands = Vec::new();
        self.spawning.handle(
            &events,
            query::night_clock(&self.world),
            query::enemy_limit(&self.world),
            query::active_enemies(&self.world),
            query::dimensions(&self.world),
            &mut commands,
        );
        if !commands.is_empty() {
            debug!(count = commands.len(), "spawning enemies");
        }
        self.apply_all(commands, &mut events);

        let mut commands = Vec::new();
        self.movement
            .handle(&events, &query::enemy_view(&self.world), &mut commands);
        self.apply_all(commands, &mut events);

        let mut commands = Vec::new();
        let world = &self.world;
        self.movement.route(
            &events,
            &query::enemy_view(world),
            |cell| query::nearest_plant(world, cell),
            &mut commands,
        );
        self.apply_all(commands, &mut events);

        self.publish(events);
    }

    /// Routes a tile activation according to the active phase.
    ///
    /// Rejected plantings and extractions surface as events; only
    /// coordinates outside the board are reported as errors.
    pub fn on_tile_activated(&mut self, cell: CellCoord) -> Result<(), GridError> {
        let _ = query::entity_at(&self.world, cell)?;
        self.submit(Command::ActivateTile { cell });
        Ok(())
    }

    /// Requests the player-initiated phase transition.
    pub fn advance_phase(&mut self) {
        self.submit(Command::AdvancePhase);
    }

    /// Arms or disarms the night weapon.
    pub fn select_weapon(&mut self, weapon: Option<WeaponKind>) {
        self.submit(Command::SelectWeapon { weapon });
    }

    /// Sends idle enemies after the nearest plant, if any exists.
    pub fn retarget_idle_enemies(&mut self) {
        let mut commands = Vec::new();
        let world = &self.world;
        self.movement.retarget(
            &query::enemy_view(world),
            |cell| query::nearest_plant(world, cell),
            &mut commands,
        );
        debug!(count = commands.len(), "retargeting idle enemies");

        let mut events = Vec::new();
        self.apply_all(commands, &mut events);
        self.publish(events);
    }

    /// Read-only access to the authoritative world.
    #[must_use]
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Presentation layer driven by the session.
    #[must_use]
    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    /// Events produced by the most recent inward call.
    #[must_use]
    pub fn last_events(&self) -> &[Event] {
        &self.last_events
    }

    /// Ends the session, handing back the presenter.
    #[must_use]
    pub fn into_presenter(self) -> P {
        self.presenter
    }

    fn submit(&mut self, command: Command) {
        let mut events = Vec::new();
        world::apply(&mut self.world, command, &mut events);
        self.publish(events);
    }

    fn apply_all(&mut self, commands: Vec<Command>, events: &mut Vec<Event>) {
        for command in commands {
            world::apply(&mut self.world, command, events);
        }
    }

    fn publish(&mut self, events: Vec<Event>) {
        for event in &events {
            match *event {
                Event::PlantPlaced { plant, cell, .. } => {
                    let handle = self.presenter.spawn_visual(VisualKind::Plant, cell);
                    let _ = self.plant_visuals.insert(plant, handle);
                }
                Event::PlantExtracted { plant, .. } | Event::PlantKilled { plant, .. } => {
                    if let Some(handle) = self.plant_visuals.remove(&plant) {
                        self.presenter.despawn_visual(handle);
                    }
                }
                Event::EnemySpawned { cell, .. } => {
                    let _ = self.presenter.spawn_visual(VisualKind::Enemy, cell);
                }
                Event::WeaponFired { weapon, cell } => {
                    self.presenter.request_weapon_effect(weapon, cell);
                }
                _ => {}
            }
        }

        self.presenter.report_stats(query::stats(&self.world));
        self.last_events = events;
    }
}
