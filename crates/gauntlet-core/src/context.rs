//! Per-match mutable state that is not an entity.
//!
//! A [`MatchContext`] is created with the match and passed explicitly to
//! every stage that needs the clock, counters, score ledger, event log or
//! random stream. Nothing here is global, so two matches never share state.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::event::{EventLog, MatchEvent};
use crate::score::{ScoreEvent, ScoreLedger, ScoreReason};

/// Kill streak bookkeeping.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Combo {
    /// Current streak length.
    pub count: u32,
    /// Tick of the most recent counted kill.
    pub last_kill_tick: Option<u64>,
}

impl Combo {
    /// Registers a kill on `tick`.
    ///
    /// The streak grows if the previous kill was at most `window_ticks` ago,
    /// and restarts at 1 otherwise.
    pub fn register_kill(&mut self, tick: u64, window_ticks: u64) -> u32 {
        let within = self
            .last_kill_tick
            .is_some_and(|last| tick.saturating_sub(last) <= window_ticks);
        self.count = if within && self.count > 0 {
            self.count + 1
        } else {
            1
        };
        self.last_kill_tick = Some(tick);
        self.count
    }

    /// Clears the streak after a death.
    pub fn reset(&mut self) {
        self.count = 0;
        self.last_kill_tick = None;
    }
}

/// Clock, counters, score and randomness for one match.
#[derive(Debug)]
pub struct MatchContext {
    /// Latest externally supplied remaining time in seconds.
    pub remaining: f32,
    /// Index of the tick being simulated.
    pub tick: u64,
    /// Enemies killed.
    pub kills: u32,
    /// Player deaths.
    pub deaths: u32,
    /// Kill streak.
    pub combo: Combo,
    /// Score deltas and display total.
    pub ledger: ScoreLedger,
    /// Match-local random stream.
    pub rng: ChaCha8Rng,
    /// Events recorded since the last drain.
    pub events: EventLog,
}

impl MatchContext {
    /// Creates a fresh context seeded with `seed`.
    #[must_use]
    pub fn new(seed: u64, remaining: f32) -> Self {
        Self {
            remaining,
            tick: 0,
            kills: 0,
            deaths: 0,
            combo: Combo::default(),
            ledger: ScoreLedger::new(),
            rng: ChaCha8Rng::seed_from_u64(seed),
            events: EventLog::new(),
        }
    }

    /// Records an event stamped with the current tick.
    pub fn emit(&mut self, event: MatchEvent) {
        self.events.push(self.tick, event);
    }

    /// Records a score delta on the current tick.
    pub fn score(&mut self, delta: i32, reason: ScoreReason) -> ScoreEvent {
        self.ledger.record(self.tick, delta, reason)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    mod combo_tests {
        use super::*;

        #[test]
        fn first_kill_starts_streak() {
            let mut combo = Combo::default();
            assert_eq!(combo.register_kill(100, 300), 1);
        }

        #[test]
        fn kill_within_window_extends() {
            let mut combo = Combo::default();
            combo.register_kill(0, 300);
            assert_eq!(combo.register_kill(300, 300), 2);
            assert_eq!(combo.register_kill(450, 300), 3);
        }

        #[test]
        fn gap_longer_than_window_restarts() {
            let mut combo = Combo::default();
            combo.register_kill(0, 300);
            combo.register_kill(100, 300);
            assert_eq!(combo.register_kill(401, 300), 1);
        }

        #[test]
        fn death_resets_to_zero() {
            let mut combo = Combo::default();
            combo.register_kill(0, 300);
            combo.register_kill(10, 300);
            combo.reset();
            assert_eq!(combo.count, 0);
            assert_eq!(combo.register_kill(20, 300), 1);
        }
    }

    #[test]
    fn same_seed_same_stream() {
        let mut a = MatchContext::new(7, 120.0);
        let mut b = MatchContext::new(7, 120.0);
        let xs: Vec<u32> = (0..8).map(|_| a.rng.gen()).collect();
        let ys: Vec<u32> = (0..8).map(|_| b.rng.gen()).collect();
        assert_eq!(xs, ys);
    }

    #[test]
    fn emit_stamps_current_tick() {
        let mut ctx = MatchContext::new(0, 120.0);
        ctx.tick = 42;
        ctx.emit(MatchEvent::PlayerDied {
            player: crate::entity::EntityId::new(0),
        });
        assert_eq!(ctx.events.records()[0].tick, 42);
    }
}
