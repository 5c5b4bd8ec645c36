//! Runs whole matches with a host-owned clock and collects summaries.

use std::sync::mpsc;

use serde::Serialize;
use tracing::debug;

use gauntlet_core::config::{MatchConfig, Variant};
use gauntlet_core::event::MatchEvent;
use gauntlet_core::score::{ScoreEvent, ScoreReason};
use gauntlet_core::simulation::Simulation;
use gauntlet_core::state::MatchState;
use gauntlet_core::telemetry::Telemetry;

use crate::autopilot::Autopilot;

/// Host-side timing for one match.
#[derive(Debug, Clone, Copy)]
pub struct RunOptions {
    /// Match length in seconds.
    pub duration_secs: f32,
    /// Host frame length in seconds.
    pub frame_secs: f32,
}

/// Score deltas grouped by reason, as the external authority would book them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ScoreBreakdown {
    pub enemy_killed: i64,
    pub boss_killed: i64,
    pub player_death: i64,
    pub target_hit: i64,
    pub decoy_hit: i64,
}

impl ScoreBreakdown {
    fn book(&mut self, event: &ScoreEvent) {
        let slot = match event.reason {
            ScoreReason::EnemyKilled => &mut self.enemy_killed,
            ScoreReason::BossKilled => &mut self.boss_killed,
            ScoreReason::PlayerDeath => &mut self.player_death,
            ScoreReason::TargetHit => &mut self.target_hit,
            ScoreReason::DecoyHit => &mut self.decoy_hit,
        };
        *slot += i64::from(event.delta);
    }

    /// Unclamped sum of every delta.
    #[must_use]
    pub fn total(&self) -> i64 {
        self.enemy_killed + self.boss_killed + self.player_death + self.target_hit + self.decoy_hit
    }
}

/// Outcome of one headless match.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchSummary {
    pub seed: u64,
    pub variant: Variant,
    pub ticks: u64,
    /// In-engine display score, floored at zero.
    pub score: i64,
    /// Deltas received through the score sink.
    pub ledger: ScoreBreakdown,
    pub kills: u32,
    pub deaths: u32,
    pub bosses_spawned: usize,
    pub pickups_collected: usize,
    pub projectiles_fired: usize,
    pub final_state: Telemetry,
}

/// Plays one full match with the autopilot.
///
/// The host clock advances by `frame_secs` per frame and the simulation
/// catches up through its fixed-step accumulator.
#[must_use]
pub fn run_match(config: &MatchConfig, seed: u64, options: RunOptions) -> MatchSummary {
    let boss_id = config.boss().map(|b| b.id.clone());
    let mut sim = Simulation::new(config.clone(), seed);
    let (tx, rx) = mpsc::channel();
    sim.set_score_sink(move |event: &ScoreEvent| {
        let _ = tx.send(*event);
    });
    sim.start();

    let mut pilot = Autopilot::new();
    let mut elapsed = 0.0f32;
    let mut bosses_spawned = 0;
    let mut pickups_collected = 0;
    let mut projectiles_fired = 0;
    let player = sim.player_id();

    while sim.state() == MatchState::Running {
        let remaining = (options.duration_secs - elapsed).max(0.0);
        let input = pilot.input(&sim);
        sim.advance(options.frame_secs, remaining, &input);
        elapsed += options.frame_secs;

        for record in sim.drain_events() {
            match record.event {
                MatchEvent::EnemySpawned { archetype, .. } if Some(&archetype) == boss_id.as_ref() => {
                    bosses_spawned += 1;
                }
                MatchEvent::PickupCollected { .. } => pickups_collected += 1,
                MatchEvent::ProjectileFired { shooter, .. } if shooter == player => {
                    projectiles_fired += 1;
                }
                _ => {}
            }
        }
    }

    let mut ledger = ScoreBreakdown::default();
    for event in rx.try_iter() {
        ledger.book(&event);
    }
    debug!(seed, score = sim.score(), authority = ledger.total(), "match summarized");

    MatchSummary {
        seed,
        variant: config.variant,
        ticks: sim.tick(),
        score: sim.score(),
        ledger,
        kills: sim.context().kills,
        deaths: sim.context().deaths,
        bosses_spawned,
        pickups_collected,
        projectiles_fired,
        final_state: sim.telemetry(),
    }
}

/// Aggregate over a batch of matches.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchSummary {
    pub matches: usize,
    pub mean_score: f64,
    pub best_score: i64,
    pub total_kills: u64,
    pub total_deaths: u64,
}

impl BatchSummary {
    /// Summarizes `results`; an empty batch reports zeros.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn from_results(results: &[MatchSummary]) -> Self {
        let total_score: i64 = results.iter().map(|r| r.score).sum();
        Self {
            matches: results.len(),
            mean_score: if results.is_empty() {
                0.0
            } else {
                total_score as f64 / results.len() as f64
            },
            best_score: results.iter().map(|r| r.score).max().unwrap_or(0),
            total_kills: results.iter().map(|r| u64::from(r.kills)).sum(),
            total_deaths: results.iter().map(|r| u64::from(r.deaths)).sum(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn short() -> RunOptions {
        RunOptions {
            duration_secs: 20.0,
            frame_secs: 1.0 / 30.0,
        }
    }

    #[test]
    fn match_ends_and_ledger_agrees_with_counters() {
        let summary = run_match(&MatchConfig::shooter(), 5, short());
        assert_eq!(summary.final_state.state, MatchState::Ended);
        assert!(summary.ticks >= 1_150 && summary.ticks <= 1_250);

        let death_penalty = i64::from(MatchConfig::shooter().player.death_penalty);
        assert_eq!(summary.ledger.player_death, death_penalty * i64::from(summary.deaths));
        assert!(summary.score >= 0);
        assert!(summary.score >= summary.ledger.total());
    }

    #[test]
    fn same_seed_same_summary() {
        let a = run_match(&MatchConfig::arena(), 9, short());
        let b = run_match(&MatchConfig::arena(), 9, short());
        assert_eq!(a, b);
    }

    #[test]
    fn batch_of_nothing_is_zero() {
        let batch = BatchSummary::from_results(&[]);
        assert_eq!(batch.matches, 0);
        assert_eq!(batch.best_score, 0);
        assert!(batch.mean_score.abs() < f64::EPSILON);
    }
}
