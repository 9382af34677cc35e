//! Real-time clock pacer.
//!
//! Holds the emulated clock rate by sleeping until the wall-clock time
//! of the next cycle boundary. Pacing is cooperative: a machine that
//! falls behind catches up without sleeping rather than dropping
//! cycles.

use std::time::{Duration, Instant};

/// Paces emulated cycles against a monotonic host clock.
pub struct ClockPacer {
    /// Emulated clock frequency in Hz.
    frequency: f64,
    /// Seconds per emulated cycle.
    cycle_duration: f64,
    /// Cycles elapsed since the last reset.
    cycle_count: u64,
    /// Start of the pacing epoch.
    start: Instant,
}

impl ClockPacer {
    /// Create a pacer for the given frequency in Hz.
    ///
    /// Returns `None` for a non-positive frequency, which callers treat
    /// as "pacing disabled".
    #[must_use]
    pub fn new(frequency: f64) -> Option<Self> {
        if frequency <= 0.0 {
            return None;
        }
        Some(Self {
            frequency,
            cycle_duration: 1.0 / frequency,
            cycle_count: 0,
            start: Instant::now(),
        })
    }

    /// Sleep until the next cycle boundary and account for it.
    pub fn wait_next_cycle(&mut self) {
        let expected = (self.cycle_count + 1) as f64 * self.cycle_duration;
        let elapsed = self.start.elapsed().as_secs_f64();
        if expected > elapsed {
            std::thread::sleep(Duration::from_secs_f64(expected - elapsed));
        }
        self.cycle_count += 1;
    }

    /// Restart the pacing epoch.
    pub fn reset(&mut self) {
        self.cycle_count = 0;
        self.start = Instant::now();
    }

    /// Emulated frequency in Hz.
    #[must_use]
    pub fn frequency(&self) -> f64 {
        self.frequency
    }

    /// Cycles elapsed since the last reset.
    #[must_use]
    pub fn cycle_count(&self) -> u64 {
        self.cycle_count
    }

    /// Emulated time elapsed since the last reset, in seconds.
    #[must_use]
    pub fn elapsed_time(&self) -> f64 {
        self.cycle_count as f64 * self.cycle_duration
    }
}
