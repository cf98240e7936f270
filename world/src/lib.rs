#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Nightfield.

use std::time::Duration;

use glam::Vec2;
use nightfield_core::{
    CellCoord, Command, EnemyId, EnemyState, Event, ExtractionError, GameConfig, Phase,
    PlacementError, PlantId, RemovalReason, WeaponKind, WELCOME_BANNER,
};
use tracing::{debug, info};

mod economy;
mod enemies;
mod grid;
mod phase;
mod plants;

pub use grid::{Cell, Horde};

use economy::Economy;
use enemies::EnemyRegistry;
use grid::Grid;
use phase::PhaseClock;
use plants::PlantRegistry;

/// Represents the authoritative Nightfield world state.
#[derive(Debug)]
pub struct World {
    banner: &'static str,
    tile_length: f32,
    enemy_speed: f32,
    grid: Grid,
    plants: PlantRegistry,
    enemies: EnemyRegistry,
    clock: PhaseClock,
    economy: Economy,
    weapon: Option<WeaponKind>,
}

impl World {
    /// Creates a world at dawn of the first cycle using the provided configuration.
    #[must_use]
    pub fn new(config: &GameConfig) -> Self {
        Self {
            banner: WELCOME_BANNER,
            tile_length: config.tile_length,
            enemy_speed: config.enemy_speed,
            grid: Grid::new(config.columns, config.rows),
            plants: PlantRegistry::new(),
            enemies: EnemyRegistry::new(),
            clock: PhaseClock::new(config.night_duration()),
            economy: Economy::new(config),
            weapon: None,
        }
    }

    fn tick(&mut self, dt: Duration, out_events: &mut Vec<Event>) {
        out_events.push(Event::TimeAdvanced { dt });

        let Some(phase) = self.clock.tick(dt, self.economy.seeds()) else {
            return;
        };

        info!(
            cycle = self.clock.cycle(),
            ?phase,
            survivors = self.enemies.len(),
            "night ended"
        );
        out_events.push(Event::PhaseChanged {
            phase,
            cycle: self.clock.cycle(),
        });
    }

    fn advance_phase(&mut self, out_events: &mut Vec<Event>) {
        match self.clock.advance() {
            Some(phase) => {
                info!(cycle = self.clock.cycle(), ?phase, "phase advanced");
                out_events.push(Event::PhaseChanged {
                    phase,
                    cycle: self.clock.cycle(),
                });
            }
            None => debug!("phase advance ignored during the night"),
        }
    }

    fn activate_tile(&mut self, cell: CellCoord, out_events: &mut Vec<Event>) {
        match self.clock.phase() {
            Phase::Dawn => self.place_plant(cell, out_events),
            Phase::Day => self.extract(cell, out_events),
            Phase::Night => match self.weapon {
                Some(weapon) => out_events.push(Event::WeaponFired { weapon, cell }),
                None => debug!(%cell, "night activation without an armed weapon"),
            },
        }
    }

    fn place_plant(&mut self, cell: CellCoord, out_events: &mut Vec<Event>) {
        let checked = if self.economy.seeds() == 0 {
            Err(PlacementError::NoSeeds)
        } else {
            self.grid.check_vacant(cell)
        };
        if let Err(reason) = checked {
            debug!(%cell, %reason, "plant placement rejected");
            out_events.push(Event::PlantPlacementRejected { cell, reason });
            return;
        }

        let cycle = self.clock.cycle();
        let plant = self.plants.insert(cell, cycle);
        if let Err(reason) = self.grid.set_plant(cell, plant) {
            let _ = self.plants.remove(plant);
            out_events.push(Event::PlantPlacementRejected { cell, reason });
            return;
        }
        self.economy.record_planting();
        out_events.push(Event::PlantPlaced { plant, cell, cycle });
    }

    fn extract(&mut self, cell: CellCoord, out_events: &mut Vec<Event>) {
        let reason = match self.grid.cell(cell).map(Cell::plant) {
            Err(_) => ExtractionError::OutOfBounds,
            Ok(None) => ExtractionError::NoPlant,
            Ok(Some(_)) => match self.remove_plant(cell, RemovalReason::Extracted) {
                Some((plant, age)) => {
                    out_events.push(Event::PlantExtracted { plant, cell, age });
                    return;
                }
                None => ExtractionError::NoPlant,
            },
        };
        debug!(%cell, %reason, "plant extraction rejected");
        out_events.push(Event::PlantExtractionRejected { cell, reason });
    }

    /// Clears the plant on `cell` from the board and the planting history.
    fn remove_plant(&mut self, cell: CellCoord, reason: RemovalReason) -> Option<(PlantId, u32)> {
        let plant = self.grid.take_plant(cell)?;
        let planted_cycle = self
            .plants
            .remove(plant)
            .map_or(self.clock.cycle(), |record| record.planted_cycle);
        let age = self.clock.cycle().saturating_sub(planted_cycle);
        match reason {
            RemovalReason::Extracted => self.economy.record_extraction(age),
            RemovalReason::Killed => self.economy.record_kill(),
        }
        Some((plant, age))
    }

    fn kill_plant(&mut self, cell: CellCoord, enemy: EnemyId, out_events: &mut Vec<Event>) {
        if let Some((plant, _)) = self.remove_plant(cell, RemovalReason::Killed) {
            debug!(%cell, enemy = enemy.get(), "plant killed");
            out_events.push(Event::PlantKilled { plant, cell, enemy });
        }
    }

    fn spawn_enemy(&mut self, cell: CellCoord, out_events: &mut Vec<Event>) {
        if !self.grid.contains(cell) {
            debug!(%cell, "spawn outside the board ignored");
            return;
        }

        let enemy = self.enemies.spawn(cell, self.tile_length, self.enemy_speed);
        out_events.push(Event::EnemySpawned { enemy, cell });
        self.kill_plant(cell, enemy, out_events);
        let _ = self.grid.join(cell, enemy);
    }

    fn move_enemy(&mut self, enemy_id: EnemyId, position: Vec2, out_events: &mut Vec<Event>) {
        let tile_length = self.tile_length;
        let Some(enemy) = self.enemies.get_mut(enemy_id) else {
            return;
        };
        if enemy.state != EnemyState::Traveling {
            return;
        }

        enemy.position = position;
        let intermediate = enemy.intermediate;
        if position != intermediate.center(tile_length) {
            return;
        }

        self.cross_boundary(enemy_id, out_events);
        if let Some(enemy) = self.enemies.get_mut(enemy_id) {
            enemy.state = EnemyState::AwaitingRoute;
        }
        out_events.push(Event::EnemyArrived {
            enemy: enemy_id,
            cell: intermediate,
        });
    }

    /// Moves the enemy's occupancy into its intermediate cell, at most once per leg.
    fn cross_boundary(&mut self, enemy_id: EnemyId, out_events: &mut Vec<Event>) {
        let Some(enemy) = self.enemies.get_mut(enemy_id) else {
            return;
        };
        if enemy.state != EnemyState::Traveling || enemy.crossed_boundary {
            return;
        }

        let from = enemy.occupied;
        let to = enemy.intermediate;
        enemy.occupied = to;
        enemy.crossed_boundary = true;

        self.kill_plant(to, enemy_id, out_events);
        let _ = self.grid.join(to, enemy_id);
        let _ = self.grid.leave(from, enemy_id);
        out_events.push(Event::EnemyCrossed {
            enemy: enemy_id,
            from,
            to,
        });
    }

    fn route_enemy(
        &mut self,
        enemy_id: EnemyId,
        destination: Option<CellCoord>,
        next: Option<CellCoord>,
        out_events: &mut Vec<Event>,
    ) {
        let in_bounds = next.is_some_and(|cell| self.grid.contains(cell));
        let Some(enemy) = self.enemies.get_mut(enemy_id) else {
            return;
        };
        if enemy.state == EnemyState::Traveling {
            debug!(enemy = enemy_id.get(), "route ignored for travelling enemy");
            return;
        }

        match (destination, next) {
            (Some(destination), Some(next)) => {
                if !in_bounds || enemy.intermediate.manhattan_distance(next) != 1 {
                    debug!(enemy = enemy_id.get(), %next, "route rejected: not an adjacent cell");
                    return;
                }
                enemy.begin_leg(destination, next);
                out_events.push(Event::EnemyRouted {
                    enemy: enemy_id,
                    destination,
                    next,
                });
            }
            _ => {
                enemy.idle();
                out_events.push(Event::EnemyIdled {
                    enemy: enemy_id,
                    cell: enemy.intermediate,
                });
            }
        }
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::Tick { dt } => world.tick(dt, out_events),
        Command::AdvancePhase => world.advance_phase(out_events),
        Command::ActivateTile { cell } => world.activate_tile(cell, out_events),
        Command::SelectWeapon { weapon } => {
            world.weapon = weapon;
            out_events.push(Event::WeaponSelected { weapon });
        }
        Command::SpawnEnemy { cell } => world.spawn_enemy(cell, out_events),
        Command::MoveEnemy { enemy, position } => world.move_enemy(enemy, position, out_events),
        Command::CrossBoundary { enemy } => world.cross_boundary(enemy, out_events),
        Command::RouteEnemy {
            enemy,
            destination,
            next,
        } => world.route_enemy(enemy, destination, next, out_events),
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use nightfield_core::{
        CellCoord, EconomySnapshot, EnemyId, EnemySnapshot, EnemyView, GridError, NightClock,
        Phase, PlantId, StatsReport, WeaponKind,
    };

    use super::{Cell, World};

    /// Retrieves the welcome banner that adapters may display to players.
    #[must_use]
    pub fn welcome_banner(world: &World) -> &'static str {
        world.banner
    }

    /// Number of columns and rows on the board.
    #[must_use]
    pub fn dimensions(world: &World) -> (u32, u32) {
        world.grid.dimensions()
    }

    /// Content of the cell at the provided coordinate.
    pub fn entity_at(world: &World, cell: CellCoord) -> Result<&Cell, GridError> {
        world.grid.cell(cell)
    }

    /// Closest plant to `from`; the earliest planted wins ties.
    #[must_use]
    pub fn nearest_plant(world: &World, from: CellCoord) -> Option<CellCoord> {
        world.plants.nearest(from)
    }

    /// Active phase of the cycle.
    #[must_use]
    pub fn phase(world: &World) -> Phase {
        world.clock.phase()
    }

    /// Current cycle counter, starting at one.
    #[must_use]
    pub fn cycle(world: &World) -> u32 {
        world.clock.cycle()
    }

    /// Countdown of the active night, if any.
    #[must_use]
    pub fn night_clock(world: &World) -> Option<NightClock> {
        world.clock.night()
    }

    /// Weapon currently armed for the night.
    #[must_use]
    pub fn weapon(world: &World) -> Option<WeaponKind> {
        world.weapon
    }

    /// Resource counters.
    #[must_use]
    pub fn economy(world: &World) -> EconomySnapshot {
        world.economy.snapshot()
    }

    /// Counters forwarded to the presentation layer.
    #[must_use]
    pub fn stats(world: &World) -> StatsReport {
        let economy = world.economy.snapshot();
        StatsReport {
            cycle: world.clock.cycle(),
            plants: economy.plants,
            seeds: economy.seeds,
            extracted: economy.extracted,
        }
    }

    /// Largest number of enemies the current nutrients can sustain.
    #[must_use]
    pub fn enemy_limit(world: &World) -> u32 {
        world.economy.enemy_limit()
    }

    /// Number of enemies on the board.
    #[must_use]
    pub fn active_enemies(world: &World) -> u32 {
        u32::try_from(world.enemies.len()).unwrap_or(u32::MAX)
    }

    /// Captures a read-only view of the enemies on the board.
    #[must_use]
    pub fn enemy_view(world: &World) -> EnemyView {
        let snapshots: Vec<EnemySnapshot> =
            world.enemies.iter().map(|enemy| enemy.snapshot()).collect();
        EnemyView::from_snapshots(snapshots)
    }

    /// Snapshot of a single enemy.
    #[must_use]
    pub fn enemy(world: &World, enemy: EnemyId) -> Option<EnemySnapshot> {
        world.enemies.get(enemy).map(|enemy| enemy.snapshot())
    }

    /// Cells whose horde contains the enemy. Holds exactly one cell for live enemies.
    #[must_use]
    pub fn cells_holding(world: &World, enemy: EnemyId) -> Vec<CellCoord> {
        world.grid.cells_holding(enemy)
    }

    /// Planting history in planting order.
    #[must_use]
    pub fn plants(world: &World) -> Vec<PlantSnapshot> {
        world
            .plants
            .iter()
            .map(|(id, record)| PlantSnapshot {
                id,
                cell: record.cell,
                planted_cycle: record.planted_cycle,
            })
            .collect()
    }

    /// Immutable representation of a planted plant.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct PlantSnapshot {
        /// Identifier allocated to the plant.
        pub id: PlantId,
        /// Cell holding the plant.
        pub cell: CellCoord,
        /// Cycle the plant was planted on.
        pub planted_cycle: u32,
    }
}
