#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Nightfield engine.
//!
//! This crate defines the message surface that connects the session, the
//! authoritative world, and pure systems. The session submits [`Command`]
//! values describing desired mutations, the world executes those commands via
//! its `apply` entry point, and then broadcasts [`Event`] values for systems to
//! react to deterministically. Systems consume event streams, query immutable
//! snapshots, and respond exclusively with new command batches.

use std::{fmt, time::Duration};

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

mod config;

pub use config::{ConfigError, GameConfig, SpawnWindow};

/// Canonical banner emitted when the experience boots.
pub const WELCOME_BANNER: &str = "Welcome to Nightfield.";

/// Recurring phases of the day/night cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    /// Planting phase; seeds may be spent on empty tiles.
    Dawn,
    /// Harvest phase; planted tiles may be extracted.
    Day,
    /// Enemy wave phase driven by the night countdown.
    Night,
}

/// Weapons the player may arm during the night.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WeaponKind {
    /// Area spray applied to the activated tile and its neighbours.
    Spray,
}

/// Reasons a plant may leave the board.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RemovalReason {
    /// The player harvested the plant for resources.
    Extracted,
    /// An enemy destroyed the plant; no resources are awarded.
    Killed,
}

/// Lifecycle of an enemy agent's movement.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EnemyState {
    /// The enemy stands on a cell centre and waits for a new leg.
    AwaitingRoute,
    /// The enemy walks towards its intermediate cell.
    Traveling,
    /// No plant was reachable when the enemy last looked for one.
    Idle,
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Advances the simulation clock by the provided delta time.
    Tick {
        /// Duration of simulated time that elapsed since the previous tick.
        dt: Duration,
    },
    /// Requests the player-initiated phase transition (Dawn to Day, Day to Night).
    AdvancePhase,
    /// Routes a tile activation according to the active phase.
    ActivateTile {
        /// Tile that the player activated.
        cell: CellCoord,
    },
    /// Arms or disarms the night weapon.
    SelectWeapon {
        /// Weapon to arm, or `None` to disarm.
        weapon: Option<WeaponKind>,
    },
    /// Requests that a new enemy enter the board at the provided cell.
    SpawnEnemy {
        /// Border cell the enemy lands on.
        cell: CellCoord,
    },
    /// Updates the continuous position of a travelling enemy.
    MoveEnemy {
        /// Identifier of the enemy being moved.
        enemy: EnemyId,
        /// New position expressed in world units.
        position: Vec2,
    },
    /// Transfers an enemy's occupancy into its intermediate cell.
    CrossBoundary {
        /// Identifier of the enemy crossing into its intermediate cell.
        enemy: EnemyId,
    },
    /// Assigns a new leg to an enemy standing on a cell centre.
    RouteEnemy {
        /// Identifier of the enemy being routed.
        enemy: EnemyId,
        /// Final destination, or `None` when no plant is reachable.
        destination: Option<CellCoord>,
        /// Adjacent cell to walk to next, or `None` to go idle.
        next: Option<CellCoord>,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Duration of simulated time that elapsed in the tick.
        dt: Duration,
    },
    /// Announces that the cycle entered a new phase.
    PhaseChanged {
        /// Phase that became active.
        phase: Phase,
        /// Cycle counter after the transition.
        cycle: u32,
    },
    /// Confirms that a plant was placed on the board.
    PlantPlaced {
        /// Identifier allocated to the plant.
        plant: PlantId,
        /// Cell holding the plant.
        cell: CellCoord,
        /// Cycle the plant was planted on.
        cycle: u32,
    },
    /// Reports that a planting request was rejected.
    PlantPlacementRejected {
        /// Cell provided in the request.
        cell: CellCoord,
        /// Specific reason the placement failed.
        reason: PlacementError,
    },
    /// Confirms that the player harvested a plant.
    PlantExtracted {
        /// Identifier of the harvested plant.
        plant: PlantId,
        /// Cell the plant occupied.
        cell: CellCoord,
        /// Number of cycles the plant was alive.
        age: u32,
    },
    /// Reports that an extraction request was rejected.
    PlantExtractionRejected {
        /// Cell provided in the request.
        cell: CellCoord,
        /// Specific reason the extraction failed.
        reason: ExtractionError,
    },
    /// Confirms that an enemy destroyed a plant.
    PlantKilled {
        /// Identifier of the destroyed plant.
        plant: PlantId,
        /// Cell the plant occupied.
        cell: CellCoord,
        /// Enemy responsible for the kill.
        enemy: EnemyId,
    },
    /// Confirms that the armed weapon changed.
    WeaponSelected {
        /// Weapon now armed, if any.
        weapon: Option<WeaponKind>,
    },
    /// Announces that the armed weapon was fired at a tile.
    WeaponFired {
        /// Weapon that was fired.
        weapon: WeaponKind,
        /// Tile targeted by the player.
        cell: CellCoord,
    },
    /// Confirms that an enemy entered the board.
    EnemySpawned {
        /// Identifier assigned to the enemy.
        enemy: EnemyId,
        /// Cell the enemy landed on.
        cell: CellCoord,
    },
    /// Confirms that an enemy's occupancy moved between two cells.
    EnemyCrossed {
        /// Identifier of the enemy.
        enemy: EnemyId,
        /// Cell whose horde the enemy left.
        from: CellCoord,
        /// Cell whose horde the enemy joined.
        to: CellCoord,
    },
    /// Announces that an enemy reached the centre of its intermediate cell.
    EnemyArrived {
        /// Identifier of the enemy.
        enemy: EnemyId,
        /// Cell the enemy now stands on.
        cell: CellCoord,
    },
    /// Confirms that an enemy started a new leg.
    EnemyRouted {
        /// Identifier of the enemy.
        enemy: EnemyId,
        /// Final destination of the enemy.
        destination: CellCoord,
        /// Adjacent cell the enemy now walks to.
        next: CellCoord,
    },
    /// Announces that an enemy found nothing to walk to.
    EnemyIdled {
        /// Identifier of the enemy.
        enemy: EnemyId,
        /// Cell the enemy stands on.
        cell: CellCoord,
    },
}

/// Unique identifier assigned to a plant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PlantId(u32);

impl PlantId {
    /// Creates a new plant identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to an enemy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EnemyId(u32);

impl EnemyId {
    /// Creates a new enemy identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Location of a single grid cell expressed as column and row coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    column: u32,
    row: u32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Computes the Manhattan distance between two cell coordinates.
    #[must_use]
    pub fn manhattan_distance(self, other: CellCoord) -> u32 {
        self.column().abs_diff(other.column()) + self.row().abs_diff(other.row())
    }

    /// Position of the cell's anchor point in world units.
    #[must_use]
    pub fn center(self, tile_length: f32) -> Vec2 {
        Vec2::new(
            self.column as f32 * tile_length,
            self.row as f32 * tile_length,
        )
    }
}

impl fmt::Display for CellCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.column, self.row)
    }
}

/// Countdown state of an active night.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NightClock {
    remaining: Duration,
    duration: Duration,
}

impl NightClock {
    /// Captures a countdown with the provided remaining and total durations.
    #[must_use]
    pub const fn new(remaining: Duration, duration: Duration) -> Self {
        Self {
            remaining,
            duration,
        }
    }

    /// Time left before the night ends.
    #[must_use]
    pub const fn remaining(&self) -> Duration {
        self.remaining
    }

    /// Fraction of the night still remaining, in `0.0..=1.0`.
    #[must_use]
    pub fn fraction_remaining(&self) -> f32 {
        if self.duration.is_zero() {
            return 0.0;
        }
        self.remaining.as_secs_f32() / self.duration.as_secs_f32()
    }
}

/// Immutable representation of a single enemy's state used for queries.
#[derive(Clone, Debug, PartialEq)]
pub struct EnemySnapshot {
    /// Unique identifier assigned to the enemy.
    pub id: EnemyId,
    /// Continuous position in world units.
    pub position: Vec2,
    /// Cell the current leg started from.
    pub previous: CellCoord,
    /// Adjacent cell the current leg leads to.
    pub intermediate: CellCoord,
    /// Final destination, if any.
    pub destination: Option<CellCoord>,
    /// Cell whose horde currently holds the enemy.
    pub occupied: CellCoord,
    /// Movement speed in world units per second.
    pub speed: f32,
    /// Whether the occupancy transfer already happened on this leg.
    pub crossed_boundary: bool,
    /// Movement lifecycle state.
    pub state: EnemyState,
}

/// Read-only snapshot describing all enemies on the board.
#[derive(Clone, Debug, Default)]
pub struct EnemyView {
    snapshots: Vec<EnemySnapshot>,
}

impl EnemyView {
    /// Creates a new enemy view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<EnemySnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured enemy snapshots in deterministic order.
    pub fn iter(&self) -> impl Iterator<Item = &EnemySnapshot> {
        self.snapshots.iter()
    }

    /// Number of enemies captured by the view.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether the view holds no enemies.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Looks up the snapshot for a single enemy.
    #[must_use]
    pub fn get(&self, enemy: EnemyId) -> Option<&EnemySnapshot> {
        self.snapshots
            .binary_search_by_key(&enemy, |snapshot| snapshot.id)
            .ok()
            .and_then(|index| self.snapshots.get(index))
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<EnemySnapshot> {
        self.snapshots
    }
}

/// Resource counters tracked by the world.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EconomySnapshot {
    /// Seeds available for planting.
    pub seeds: u32,
    /// Plants currently on the board.
    pub plants: u32,
    /// Plants harvested so far.
    pub extracted: u32,
    /// Accumulated hydration.
    pub hydration: i32,
    /// Accumulated nutrients; bounds the size of each enemy wave.
    pub nutrients: f32,
}

/// Stats forwarded to the presentation layer after each update.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct StatsReport {
    /// Current cycle counter.
    pub cycle: u32,
    /// Plants currently on the board.
    pub plants: u32,
    /// Seeds available for planting.
    pub seeds: u32,
    /// Plants harvested so far.
    pub extracted: u32,
}

/// Errors raised when addressing cells outside the board.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Error)]
pub enum GridError {
    /// The coordinate lies outside `[0, columns) x [0, rows)`.
    #[error("cell {cell} lies outside the {columns}x{rows} grid")]
    OutOfBounds {
        /// Coordinate that was requested.
        cell: CellCoord,
        /// Number of columns on the board.
        columns: u32,
        /// Number of rows on the board.
        rows: u32,
    },
}

/// Reasons a planting request may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Error)]
pub enum PlacementError {
    /// The player has no seeds left.
    #[error("no seeds left")]
    NoSeeds,
    /// The requested cell lies outside the board.
    #[error("cell lies outside the board")]
    OutOfBounds,
    /// The requested cell already holds a plant.
    #[error("cell already holds a plant")]
    Occupied,
    /// Enemies currently stand on the requested cell.
    #[error("enemies stand on the cell")]
    Infested,
}

/// Reasons an extraction request may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Error)]
pub enum ExtractionError {
    /// The requested cell lies outside the board.
    #[error("cell lies outside the board")]
    OutOfBounds,
    /// The requested cell holds no plant.
    #[error("cell holds no plant")]
    NoPlant,
}
