//! Dawn, day and night cycle driven by player commands and the night countdown.

use std::time::Duration;

use nightfield_core::{NightClock, Phase};

#[derive(Clone, Debug)]
pub(crate) struct PhaseClock {
    phase: Phase,
    cycle: u32,
    remaining: Duration,
    night_duration: Duration,
}

impl PhaseClock {
    /// Starts at dawn of the first cycle.
    pub(crate) fn new(night_duration: Duration) -> Self {
        Self {
            phase: Phase::Dawn,
            cycle: 1,
            remaining: night_duration,
            night_duration,
        }
    }

    pub(crate) fn phase(&self) -> Phase {
        self.phase
    }

    pub(crate) fn cycle(&self) -> u32 {
        self.cycle
    }

    /// Countdown of the active night, if the cycle is at night.
    pub(crate) fn night(&self) -> Option<NightClock> {
        (self.phase == Phase::Night).then(|| NightClock::new(self.remaining, self.night_duration))
    }

    /// Applies the player-initiated transition. Nights cannot be skipped.
    pub(crate) fn advance(&mut self) -> Option<Phase> {
        match self.phase {
            Phase::Dawn => self.phase = Phase::Day,
            Phase::Day => {
                self.phase = Phase::Night;
                self.remaining = self.night_duration;
            }
            Phase::Night => return None,
        }
        Some(self.phase)
    }

    /// Runs the night countdown. Returns the next phase once the night expires.
    pub(crate) fn tick(&mut self, dt: Duration, seeds: u32) -> Option<Phase> {
        if self.phase != Phase::Night {
            return None;
        }

        self.remaining = self.remaining.saturating_sub(dt);
        if !self.remaining.is_zero() {
            return None;
        }

        self.cycle = self.cycle.saturating_add(1);
        self.phase = if seeds > 0 { Phase::Dawn } else { Phase::Day };
        Some(self.phase)
    }
}
