//! Score deltas and the local ledger.
//!
//! Every scoring occurrence produces exactly one [`ScoreEvent`] carrying a
//! signed integer delta, delivered once. With a [`ScoreSink`] installed the
//! event goes to the sink the moment it is recorded; otherwise it waits in an
//! outbox for hosts that prefer polling.
//!
//! The running total kept here is display bookkeeping only. It is clamped at
//! zero, but a penalty that hits the clamp is still emitted in full: the
//! match authority decides what the final score is.
//!
//! # Example
//!
//! ```
//! use gauntlet_core::score::{ScoreLedger, ScoreReason};
//!
//! let mut ledger = ScoreLedger::new();
//! ledger.record(10, 2, ScoreReason::EnemyKilled);
//! ledger.record(20, -5, ScoreReason::PlayerDeath);
//!
//! assert_eq!(ledger.total(), 0);
//! let deltas: Vec<i32> = ledger.drain().iter().map(|e| e.delta).collect();
//! assert_eq!(deltas, vec![2, -5]);
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

/// Why points changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreReason {
    /// A regular enemy was killed.
    EnemyKilled,
    /// The boss was killed.
    BossKilled,
    /// The player died.
    PlayerDeath,
    /// A throw hit a target.
    TargetHit,
    /// A throw hit a decoy.
    DecoyHit,
}

impl fmt::Display for ScoreReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EnemyKilled => write!(f, "enemy_killed"),
            Self::BossKilled => write!(f, "boss_killed"),
            Self::PlayerDeath => write!(f, "player_death"),
            Self::TargetHit => write!(f, "target_hit"),
            Self::DecoyHit => write!(f, "decoy_hit"),
        }
    }
}

/// One outbound score delta.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreEvent {
    /// Tick the delta was earned on.
    pub tick: u64,
    /// Signed point change.
    pub delta: i32,
    /// What caused it.
    pub reason: ScoreReason,
}

/// Receiver for score deltas, called as each delta is recorded.
pub trait ScoreSink: Send {
    /// Receives one delta.
    fn emit(&mut self, event: &ScoreEvent);
}

impl<F> ScoreSink for F
where
    F: FnMut(&ScoreEvent) + Send,
{
    fn emit(&mut self, event: &ScoreEvent) {
        self(event);
    }
}

/// Running total plus outbound deltas.
#[derive(Default)]
pub struct ScoreLedger {
    total: i64,
    outbox: Vec<ScoreEvent>,
    sink: Option<Box<dyn ScoreSink>>,
}

impl fmt::Debug for ScoreLedger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScoreLedger")
            .field("total", &self.total)
            .field("outbox", &self.outbox)
            .field("sink", &self.sink.as_ref().map(|_| "<sink>"))
            .finish()
    }
}

impl ScoreLedger {
    /// Creates an empty ledger with no sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Installs the receiver for future deltas, replacing any previous one.
    ///
    /// Deltas already queued stay in the outbox; later ones bypass it.
    pub fn set_sink(&mut self, sink: Box<dyn ScoreSink>) {
        self.sink = Some(sink);
    }

    /// Removes the receiver. Later deltas queue in the outbox again.
    pub fn clear_sink(&mut self) -> Option<Box<dyn ScoreSink>> {
        self.sink.take()
    }

    /// Records a delta, updates the display total, and hands the delta to the
    /// sink or, without one, to the outbox.
    pub fn record(&mut self, tick: u64, delta: i32, reason: ScoreReason) -> ScoreEvent {
        let event = ScoreEvent {
            tick,
            delta,
            reason,
        };
        self.total = (self.total + i64::from(delta)).max(0);
        match self.sink.as_mut() {
            Some(sink) => sink.emit(&event),
            None => self.outbox.push(event),
        }
        event
    }

    /// Display total, never negative.
    #[must_use]
    pub fn total(&self) -> i64 {
        self.total
    }

    /// Deltas recorded since the last drain.
    #[must_use]
    pub fn pending(&self) -> &[ScoreEvent] {
        &self.outbox
    }

    /// Drains queued deltas in recording order.
    pub fn drain(&mut self) -> Vec<ScoreEvent> {
        std::mem::take(&mut self.outbox)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[test]
    fn total_clamps_at_zero_but_penalty_is_emitted() {
        let mut ledger = ScoreLedger::new();
        let event = ledger.record(0, -5, ScoreReason::PlayerDeath);
        assert_eq!(event.delta, -5);
        assert_eq!(ledger.total(), 0);
        assert_eq!(ledger.pending().len(), 1);
    }

    #[test]
    fn total_accumulates() {
        let mut ledger = ScoreLedger::new();
        ledger.record(0, 2, ScoreReason::EnemyKilled);
        ledger.record(1, 15, ScoreReason::BossKilled);
        ledger.record(2, -6, ScoreReason::PlayerDeath);
        assert_eq!(ledger.total(), 11);
    }

    #[test]
    fn sink_receives_each_delta_immediately() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink_seen = Arc::clone(&seen);
        let mut ledger = ScoreLedger::new();
        ledger.set_sink(Box::new(move |e: &ScoreEvent| {
            sink_seen.lock().unwrap().push(e.delta);
        }));

        ledger.record(0, 3, ScoreReason::TargetHit);
        assert_eq!(*seen.lock().unwrap(), vec![3]);
        ledger.record(1, -2, ScoreReason::DecoyHit);
        assert_eq!(*seen.lock().unwrap(), vec![3, -2]);
    }

    #[test]
    fn sink_and_outbox_never_both_receive() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink_seen = Arc::clone(&seen);
        let mut ledger = ScoreLedger::new();
        ledger.record(0, 2, ScoreReason::EnemyKilled);
        ledger.set_sink(Box::new(move |e: &ScoreEvent| {
            sink_seen.lock().unwrap().push(e.delta);
        }));

        ledger.record(1, 3, ScoreReason::EnemyKilled);
        assert_eq!(*seen.lock().unwrap(), vec![3]);
        let queued: Vec<i32> = ledger.drain().iter().map(|e| e.delta).collect();
        assert_eq!(queued, vec![2]);

        assert!(ledger.clear_sink().is_some());
        ledger.record(2, -5, ScoreReason::PlayerDeath);
        assert_eq!(*seen.lock().unwrap(), vec![3]);
        assert_eq!(ledger.pending().len(), 1);
        assert_eq!(ledger.total(), 0);
    }

    #[test]
    fn drain_empties_outbox() {
        let mut ledger = ScoreLedger::new();
        ledger.record(0, 2, ScoreReason::EnemyKilled);
        assert_eq!(ledger.drain().len(), 1);
        assert!(ledger.drain().is_empty());
        assert_eq!(ledger.total(), 2);
    }
}
