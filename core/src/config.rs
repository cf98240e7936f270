//! Tunable parameters for a Nightfield session.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Band of the night countdown, expressed as fractions of the total duration.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SpawnWindow {
    /// Exclusive lower bound of the remaining-time fraction.
    pub lower: f32,
    /// Exclusive upper bound of the remaining-time fraction.
    pub upper: f32,
}

impl SpawnWindow {
    /// Creates a new window between the provided fractions.
    #[must_use]
    pub const fn new(lower: f32, upper: f32) -> Self {
        Self { lower, upper }
    }

    /// Reports whether the fraction lies strictly inside the window.
    #[must_use]
    pub fn contains(&self, fraction: f32) -> bool {
        fraction > self.lower && fraction < self.upper
    }
}

/// Complete configuration of a session, loadable from TOML.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GameConfig {
    /// Number of tile columns on the board.
    pub columns: u32,
    /// Number of tile rows on the board.
    pub rows: u32,
    /// Side length of a tile in world units.
    pub tile_length: f32,
    /// Length of each night in seconds.
    pub night_duration_secs: f32,
    /// Seeds available when the session starts.
    pub initial_seeds: u32,
    /// Hydration when the session starts.
    pub initial_hydration: i32,
    /// Nutrients when the session starts.
    pub initial_nutrients: f32,
    /// Seeds awarded per extracted plant.
    pub seed_ratio: u32,
    /// Nutrients required per enemy allowed on the board.
    pub nutrients_per_enemy: f32,
    /// Lower bound applied to hydration on extraction.
    pub hydration_floor: i32,
    /// Lower bound applied to the nutrient increment on extraction.
    pub nutrient_floor: f32,
    /// Nutrients gained per cycle a harvested plant was alive.
    pub nutrient_rate: f32,
    /// Enemy movement speed in world units per second.
    pub enemy_speed: f32,
    /// Countdown band in which the main wave spawns.
    pub burst_window: SpawnWindow,
    /// Countdown band in which a single straggler may spawn.
    pub straggler_window: SpawnWindow,
    /// Probability that the straggler spawns.
    pub straggler_chance: f64,
    /// Seed for every random decision made during the session.
    pub rng_seed: u64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            columns: 10,
            rows: 10,
            tile_length: 0.5,
            night_duration_secs: 3.0,
            initial_seeds: 1,
            initial_hydration: 10,
            initial_nutrients: 4.5,
            seed_ratio: 2,
            nutrients_per_enemy: 0.25,
            hydration_floor: 20,
            nutrient_floor: 10.0,
            nutrient_rate: 0.1,
            enemy_speed: 0.5,
            burst_window: SpawnWindow::new(0.22, 0.25),
            straggler_window: SpawnWindow::new(0.70, 0.75),
            straggler_chance: 0.4,
            rng_seed: 0x6e69_6768_7466_6c64,
        }
    }
}

impl GameConfig {
    /// Night length as a duration; invalid values collapse to zero.
    #[must_use]
    pub fn night_duration(&self) -> Duration {
        Duration::try_from_secs_f32(self.night_duration_secs).unwrap_or(Duration::ZERO)
    }

    /// Checks that every parameter describes a playable session.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.columns == 0 || self.rows == 0 {
            return Err(ConfigError::EmptyGrid {
                columns: self.columns,
                rows: self.rows,
            });
        }
        ensure_positive("tile_length", self.tile_length)?;
        ensure_positive("night_duration_secs", self.night_duration_secs)?;
        ensure_positive("enemy_speed", self.enemy_speed)?;
        ensure_positive("nutrients_per_enemy", self.nutrients_per_enemy)?;
        ensure_window("burst_window", self.burst_window)?;
        ensure_window("straggler_window", self.straggler_window)?;
        if !(0.0..=1.0).contains(&self.straggler_chance) {
            return Err(ConfigError::InvalidChance {
                value: self.straggler_chance,
            });
        }
        Ok(())
    }
}

fn ensure_positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NonPositive { field, value })
    }
}

fn ensure_window(field: &'static str, window: SpawnWindow) -> Result<(), ConfigError> {
    let ordered = window.lower < window.upper;
    let bounded = window.lower >= 0.0 && window.upper <= 1.0;
    if ordered && bounded {
        Ok(())
    } else {
        Err(ConfigError::InvalidWindow {
            field,
            lower: window.lower,
            upper: window.upper,
        })
    }
}

/// Reasons a configuration may be rejected.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum ConfigError {
    /// The board must contain at least one tile.
    #[error("grid must have at least one tile (received {columns}x{rows})")]
    EmptyGrid {
        /// Configured column count.
        columns: u32,
        /// Configured row count.
        rows: u32,
    },
    /// A quantity that must be strictly positive was not.
    #[error("{field} must be positive (received {value})")]
    NonPositive {
        /// Name of the offending field.
        field: &'static str,
        /// Value that failed validation.
        value: f32,
    },
    /// A spawn window is inverted or leaves `0.0..=1.0`.
    #[error("{field} must satisfy 0 <= lower < upper <= 1 (received {lower}..{upper})")]
    InvalidWindow {
        /// Name of the offending field.
        field: &'static str,
        /// Configured lower bound.
        lower: f32,
        /// Configured upper bound.
        upper: f32,
    },
    /// A probability lies outside `0.0..=1.0`.
    #[error("straggler_chance must lie within 0..=1 (received {value})")]
    InvalidChance {
        /// Value that failed validation.
        value: f64,
    },
}
