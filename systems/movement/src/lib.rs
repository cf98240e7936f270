#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic movement system that walks enemies between cell centres and
//! picks their next orthogonal step towards the nearest plant.

use std::time::Duration;

use glam::Vec2;
use nightfield_core::{CellCoord, Command, EnemySnapshot, EnemyState, EnemyView, Event};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Configuration parameters required to construct the movement system.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    tile_length: f32,
    rng_seed: u64,
}

impl Config {
    /// Creates a new configuration using the board's tile length and a tie-break seed.
    #[must_use]
    pub const fn new(tile_length: f32, rng_seed: u64) -> Self {
        Self {
            tile_length,
            rng_seed,
        }
    }
}

/// Pure system that reacts to world events and emits movement commands.
#[derive(Debug)]
pub struct Movement {
    tile_length: f32,
    rng: ChaCha8Rng,
}

impl Movement {
    /// Creates a new movement system using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            tile_length: config.tile_length,
            rng: ChaCha8Rng::seed_from_u64(config.rng_seed),
        }
    }

    /// Advances every travelling enemy by the time carried in `events`.
    ///
    /// Emits a `CrossBoundary` once an enemy is half a tile away from the
    /// centre its leg started on, followed by the `MoveEnemy` update.
    pub fn handle(&mut self, events: &[Event], enemy_view: &EnemyView, out: &mut Vec<Command>) {
        let mut elapsed = Duration::ZERO;
        for event in events {
            if let Event::TimeAdvanced { dt } = event {
                elapsed = elapsed.saturating_add(*dt);
            }
        }
        if elapsed.is_zero() {
            return;
        }

        let half_tile = 0.5 * self.tile_length;
        for enemy in enemy_view.iter() {
            if enemy.state != EnemyState::Traveling {
                continue;
            }

            let target = enemy.intermediate.center(self.tile_length);
            let position = move_towards(
                enemy.position,
                target,
                enemy.speed * elapsed.as_secs_f32(),
            );

            let departed = position.distance_squared(enemy.previous.center(self.tile_length));
            if !enemy.crossed_boundary && departed >= half_tile * half_tile {
                out.push(Command::CrossBoundary { enemy: enemy.id });
            }
            out.push(Command::MoveEnemy {
                enemy: enemy.id,
                position,
            });
        }
    }

    /// Assigns the next leg to enemies that spawned or reached a cell centre.
    ///
    /// `nearest_plant` resolves the closest plant to a cell; it must observe
    /// the world after this tick's crossings have been applied.
    pub fn route<F>(
        &mut self,
        events: &[Event],
        enemy_view: &EnemyView,
        nearest_plant: F,
        out: &mut Vec<Command>,
    ) where
        F: Fn(CellCoord) -> Option<CellCoord>,
    {
        for event in events {
            let enemy = match event {
                Event::EnemySpawned { enemy, .. } | Event::EnemyArrived { enemy, .. } => *enemy,
                _ => continue,
            };
            let Some(snapshot) = enemy_view.get(enemy) else {
                continue;
            };
            if snapshot.state != EnemyState::AwaitingRoute {
                continue;
            }
            out.push(self.plan_leg(snapshot, &nearest_plant));
        }
    }

    /// Looks for a plant on behalf of every idle enemy.
    ///
    /// Enemies that still find nothing are left alone.
    pub fn retarget<F>(&mut self, enemy_view: &EnemyView, nearest_plant: F, out: &mut Vec<Command>)
    where
        F: Fn(CellCoord) -> Option<CellCoord>,
    {
        for enemy in enemy_view.iter() {
            if enemy.state != EnemyState::Idle || nearest_plant(enemy.intermediate).is_none() {
                continue;
            }
            out.push(self.plan_leg(enemy, &nearest_plant));
        }
    }

    fn plan_leg<F>(&mut self, enemy: &EnemySnapshot, nearest_plant: &F) -> Command
    where
        F: Fn(CellCoord) -> Option<CellCoord>,
    {
        let current = enemy.intermediate;
        let destination = enemy
            .destination
            .filter(|destination| *destination != current)
            .or_else(|| nearest_plant(current));
        let next =
            destination.and_then(|destination| next_step(current, destination, &mut self.rng));

        match (destination, next) {
            (Some(destination), Some(next)) => Command::RouteEnemy {
                enemy: enemy.id,
                destination: Some(destination),
                next: Some(next),
            },
            _ => Command::RouteEnemy {
                enemy: enemy.id,
                destination: None,
                next: None,
            },
        }
    }
}

/// Moves `from` towards `to` by at most `max_distance`, landing exactly on
/// `to` when it is within reach.
#[must_use]
pub fn move_towards(from: Vec2, to: Vec2, max_distance: f32) -> Vec2 {
    let delta = to - from;
    let distance = delta.length();
    if distance <= max_distance || distance <= f32::EPSILON {
        return to;
    }
    from + delta / distance * max_distance.max(0.0)
}

/// Picks the orthogonal neighbour of `from` that heads towards `to`.
///
/// The axis with the larger remaining distance wins; equal distances are
/// broken by `rng`. Returns `None` once `from == to`.
pub fn next_step<R: Rng>(from: CellCoord, to: CellCoord, rng: &mut R) -> Option<CellCoord> {
    let dx = i64::from(to.column()) - i64::from(from.column());
    let dy = i64::from(to.row()) - i64::from(from.row());
    if dx == 0 && dy == 0 {
        return None;
    }

    let horizontal = match dx.abs().cmp(&dy.abs()) {
        std::cmp::Ordering::Greater => true,
        std::cmp::Ordering::Less => false,
        std::cmp::Ordering::Equal => rng.gen_bool(0.5),
    };

    let (column, row) = if horizontal {
        (step(from.column(), dx), from.row())
    } else {
        (from.column(), step(from.row(), dy))
    };
    Some(CellCoord::new(column, row))
}

fn step(value: u32, delta: i64) -> u32 {
    if delta < 0 {
        value.saturating_sub(1)
    } else {
        value.saturating_add(1)
    }
}
