#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic spawning system responsible for emitting night wave spawn commands.

use nightfield_core::{CellCoord, Command, Event, GameConfig, NightClock, SpawnWindow};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::debug;

/// Configuration parameters required to construct the spawning system.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    burst_window: SpawnWindow,
    straggler_window: SpawnWindow,
    straggler_chance: f64,
    rng_seed: u64,
}

impl Config {
    /// Creates a new configuration using the provided windows, chance and seed.
    #[must_use]
    pub const fn new(
        burst_window: SpawnWindow,
        straggler_window: SpawnWindow,
        straggler_chance: f64,
        rng_seed: u64,
    ) -> Self {
        Self {
            burst_window,
            straggler_window,
            straggler_chance,
            rng_seed,
        }
    }
}

impl From<&GameConfig> for Config {
    fn from(config: &GameConfig) -> Self {
        Self::new(
            config.burst_window,
            config.straggler_window,
            config.straggler_chance,
            config.rng_seed,
        )
    }
}

/// Pure system that emits spawn commands while the night countdown runs.
#[derive(Debug)]
pub struct Spawning {
    burst_window: SpawnWindow,
    straggler_window: SpawnWindow,
    straggler_chance: f64,
    rng: ChaCha8Rng,
    burst_spent: bool,
    straggler_spent: bool,
}

impl Spawning {
    /// Creates a new spawning system using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            burst_window: config.burst_window,
            straggler_window: config.straggler_window,
            straggler_chance: config.straggler_chance.clamp(0.0, 1.0),
            rng: ChaCha8Rng::seed_from_u64(config.rng_seed),
            burst_spent: false,
            straggler_spent: false,
        }
    }

    /// Consumes events and the night countdown to emit spawn commands.
    ///
    /// `limit` is the number of enemies the current nutrients sustain and
    /// `active` the number already on the board.
    pub fn handle(
        &mut self,
        events: &[Event],
        night: Option<NightClock>,
        limit: u32,
        active: u32,
        dimensions: (u32, u32),
        out: &mut Vec<Command>,
    ) {
        let advanced = events
            .iter()
            .any(|event| matches!(event, Event::TimeAdvanced { .. }));

        // Both windows re-arm whenever no night is running.
        let Some(night) = night else {
            self.burst_spent = false;
            self.straggler_spent = false;
            return;
        };
        let (columns, rows) = dimensions;
        if !advanced || active >= limit || columns == 0 || rows == 0 {
            return;
        }

        let fraction = night.fraction_remaining();
        if !self.burst_spent && self.burst_window.contains(fraction) {
            self.burst_spent = true;
            let count = limit - active;
            debug!(count, fraction, "night burst");
            for _ in 0..count {
                let cell = self.border_cell(columns, rows);
                out.push(Command::SpawnEnemy { cell });
            }
        } else if !self.straggler_spent && self.straggler_window.contains(fraction) {
            self.straggler_spent = true;
            if self.rng.gen_bool(self.straggler_chance) {
                let cell = CellCoord::new(self.rng.gen_range(0..columns), 0);
                debug!(%cell, fraction, "straggler");
                out.push(Command::SpawnEnemy { cell });
            }
        }
    }

    /// Random cell on the top or left edge, each edge equally likely.
    fn border_cell(&mut self, columns: u32, rows: u32) -> CellCoord {
        if self.rng.gen_bool(0.5) {
            CellCoord::new(self.rng.gen_range(0..columns), 0)
        } else {
            CellCoord::new(0, self.rng.gen_range(0..rows))
        }
    }
}
