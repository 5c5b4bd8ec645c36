//! Match lifecycle.
//!
//! ```text
//! Idle --start()--> Running --remaining <= 0--> Ended
//! ```
//!
//! Both transitions are one-way. A match that has ended stays ended; playing
//! again needs a fresh [`Simulation`](crate::simulation::Simulation).

use std::fmt;

use serde::{Deserialize, Serialize};

/// Lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchState {
    /// Waiting for an explicit start.
    #[default]
    Idle,
    /// Accepting input and ticking every stage.
    Running,
    /// Time ran out. Nothing mutates any more.
    Ended,
}

impl fmt::Display for MatchState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::Running => write!(f, "running"),
            Self::Ended => write!(f, "ended"),
        }
    }
}

/// Owner of the lifecycle state. Exactly one per match.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MatchStateMachine {
    state: MatchState,
}

impl MatchStateMachine {
    /// Creates a machine in [`MatchState::Idle`].
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state.
    #[must_use]
    pub const fn state(&self) -> MatchState {
        self.state
    }

    /// Returns `true` while the match accepts input.
    #[must_use]
    pub const fn is_running(&self) -> bool {
        matches!(self.state, MatchState::Running)
    }

    /// Moves `Idle` to `Running`. Ignored in any other state.
    ///
    /// Returns the transition taken, if any.
    pub fn start(&mut self) -> Option<(MatchState, MatchState)> {
        self.transition(MatchState::Idle, MatchState::Running)
    }

    /// Moves `Running` to `Ended` once `remaining_secs` reaches zero.
    ///
    /// Returns the transition taken, if any.
    pub fn observe_remaining(&mut self, remaining_secs: f32) -> Option<(MatchState, MatchState)> {
        if remaining_secs <= 0.0 {
            self.transition(MatchState::Running, MatchState::Ended)
        } else {
            None
        }
    }

    fn transition(&mut self, from: MatchState, to: MatchState) -> Option<(MatchState, MatchState)> {
        if self.state == from {
            self.state = to;
            Some((from, to))
        } else {
            None
        }
    }
}
