//! Difficulty phases.
//!
//! A match is in the *early* phase while the remaining time is above the
//! threshold and in the *late* phase from then on. Everything in this module
//! is a pure function of the remaining time, so the same clock reading always
//! yields the same cap, interval, and kill value.
//!
//! ```
//! use gauntlet_core::phase::{Phase, PhaseTable};
//!
//! let table = PhaseTable::default();
//! assert_eq!(table.phase_at(120.0), Phase::Early);
//! assert_eq!(table.phase_at(60.0), Phase::Late);
//! assert_eq!(table.kill_points(120.0), 2);
//! assert_eq!(table.kill_points(30.0), 3);
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::clock::secs_to_ticks;

/// Difficulty phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Remaining time above the threshold.
    Early,
    /// Remaining time at or below the threshold.
    Late,
}

impl Phase {
    /// Phase for a remaining-time reading.
    #[must_use]
    pub fn from_remaining(remaining_secs: f32, threshold_secs: f32) -> Self {
        if remaining_secs > threshold_secs {
            Self::Early
        } else {
            Self::Late
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Early => write!(f, "early"),
            Self::Late => write!(f, "late"),
        }
    }
}

/// Tuning for one phase.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PhaseParams {
    /// Most live enemies allowed.
    pub max_enemies: usize,
    /// Minimum seconds between successful enemy spawns.
    pub spawn_interval_secs: f32,
    /// Points for a regular kill.
    pub kill_points: i32,
    /// Chance to pick the boss when none is alive. Ignored in the early phase.
    pub boss_chance: f32,
}

impl PhaseParams {
    /// Spawn interval in ticks.
    #[must_use]
    pub fn spawn_interval_ticks(&self) -> u64 {
        secs_to_ticks(self.spawn_interval_secs)
    }
}

/// Early and late tuning plus the threshold between them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PhaseTable {
    /// Remaining seconds at which the late phase begins.
    pub threshold_secs: f32,
    /// Early phase tuning.
    pub early: PhaseParams,
    /// Late phase tuning.
    pub late: PhaseParams,
}

impl PhaseTable {
    /// Phase for a remaining-time reading.
    #[must_use]
    pub fn phase_at(&self, remaining_secs: f32) -> Phase {
        Phase::from_remaining(remaining_secs, self.threshold_secs)
    }

    /// Tuning for a phase.
    #[must_use]
    pub fn params(&self, phase: Phase) -> &PhaseParams {
        match phase {
            Phase::Early => &self.early,
            Phase::Late => &self.late,
        }
    }

    /// Tuning in effect at a remaining-time reading.
    #[must_use]
    pub fn params_at(&self, remaining_secs: f32) -> &PhaseParams {
        self.params(self.phase_at(remaining_secs))
    }

    /// Points for a regular kill at a remaining-time reading.
    #[must_use]
    pub fn kill_points(&self, remaining_secs: f32) -> i32 {
        self.params_at(remaining_secs).kill_points
    }

    /// Effective boss chance: always zero in the early phase.
    #[must_use]
    pub fn boss_chance(&self, phase: Phase) -> f32 {
        match phase {
            Phase::Early => 0.0,
            Phase::Late => self.late.boss_chance,
        }
    }
}

impl Default for PhaseTable {
    fn default() -> Self {
        Self {
            threshold_secs: 60.0,
            early: PhaseParams {
                max_enemies: 4,
                spawn_interval_secs: 2.5,
                kill_points: 2,
                boss_chance: 0.0,
            },
            late: PhaseParams {
                max_enemies: 8,
                spawn_interval_secs: 1.5,
                kill_points: 3,
                boss_chance: 0.15,
            },
        }
    }
}
