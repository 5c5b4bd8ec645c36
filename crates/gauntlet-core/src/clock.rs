//! Fixed-step driver.
//!
//! The simulation always advances in whole ticks of [`FIXED_DT`] seconds,
//! regardless of how often the host calls in. [`FixedClock`] accumulates
//! host frame time and reports how many ticks are owed.
//!
//! All engine timestamps are tick indices (`u64`). Configuration durations
//! are expressed in seconds and converted once with [`secs_to_ticks`], so
//! every in-engine comparison (buff expiry, cooldowns, invulnerability) is
//! exact integer arithmetic.
//!
//! # Example
//!
//! ```
//! use gauntlet_core::clock::{FixedClock, FIXED_DT};
//!
//! let mut clock = FixedClock::new();
//! assert_eq!(clock.consume(FIXED_DT * 2.5), 2);
//! // The remaining half tick carries over.
//! assert_eq!(clock.consume(FIXED_DT * 0.5), 1);
//! ```

use serde::{Deserialize, Serialize};

/// Logical tick rate in ticks per second.
pub const TICK_RATE: u32 = 60;

/// Fixed timestep for one tick (1/60 second = ~16.67ms).
pub const FIXED_DT: f32 = 1.0 / TICK_RATE as f32;

/// Upper bound on catch-up ticks returned for a single host frame.
pub const MAX_STEPS_PER_FRAME: u32 = 8;

/// Converts a duration in seconds to a whole number of ticks (rounded).
///
/// Negative and non-finite durations convert to zero ticks.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn secs_to_ticks(secs: f32) -> u64 {
    if !secs.is_finite() || secs <= 0.0 {
        return 0;
    }
    (secs * TICK_RATE as f32).round() as u64
}

/// Converts a tick count back into seconds.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn ticks_to_secs(ticks: u64) -> f32 {
    ticks as f32 * FIXED_DT
}

/// Accumulator that turns variable host frame time into fixed ticks.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FixedClock {
    accumulator: f32,
    max_steps: u32,
}

impl FixedClock {
    /// Creates a clock with the default catch-up limit.
    #[must_use]
    pub fn new() -> Self {
        Self::with_max_steps(MAX_STEPS_PER_FRAME)
    }

    /// Creates a clock that never reports more than `max_steps` ticks per frame.
    #[must_use]
    pub fn with_max_steps(max_steps: u32) -> Self {
        Self {
            accumulator: 0.0,
            max_steps: max_steps.max(1),
        }
    }

    /// Adds `frame_secs` of host time and returns the number of ticks to run.
    ///
    /// Negative or non-finite deltas are ignored. When the host falls behind
    /// by more than the catch-up limit, the excess time is dropped rather
    /// than replayed on later frames.
    pub fn consume(&mut self, frame_secs: f32) -> u32 {
        if !frame_secs.is_finite() || frame_secs <= 0.0 {
            return 0;
        }
        self.accumulator += frame_secs;

        let mut steps = 0;
        // Small epsilon so that exact multiples of FIXED_DT are not lost to rounding
        while self.accumulator + 1e-6 >= FIXED_DT && steps < self.max_steps {
            self.accumulator -= FIXED_DT;
            steps += 1;
        }
        if steps == self.max_steps {
            self.accumulator = self.accumulator.min(FIXED_DT);
        }
        self.accumulator = self.accumulator.max(0.0);
        steps
    }

    /// Returns the fraction of a tick currently accumulated (for interpolation).
    #[must_use]
    pub fn alpha(&self) -> f32 {
        (self.accumulator / FIXED_DT).clamp(0.0, 1.0)
    }

    /// Drops any accumulated partial tick.
    pub fn reset(&mut self) {
        self.accumulator = 0.0;
    }
}

impl Default for FixedClock {
    fn default() -> Self {
        Self::new()
    }
}
