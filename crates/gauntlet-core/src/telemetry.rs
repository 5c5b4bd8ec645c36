//! Continuous match output for HUDs and headless runs.

use serde::{Deserialize, Serialize};

use crate::arena::Arena;
use crate::buff::BuffKind;
use crate::clock::ticks_to_secs;
use crate::context::MatchContext;
use crate::entity::{EntityTag, PlayerComponents, Stance};
use crate::phase::Phase;
use crate::state::MatchState;
use crate::weapon::WeaponId;

/// One active buff and its remaining time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BuffTimer {
    /// Buff kind.
    pub kind: BuffKind,
    /// Ticks until expiry.
    pub remaining_ticks: u64,
    /// Seconds until expiry.
    pub remaining_secs: f32,
}

/// Player-facing part of a snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerTelemetry {
    /// Current health.
    pub health: f32,
    /// Maximum health.
    pub max_health: f32,
    /// Equipped weapon.
    pub weapon: WeaponId,
    /// Remaining uses, `None` if unlimited.
    pub weapon_uses: Option<u32>,
    /// Active buffs in kind order.
    pub buffs: Vec<BuffTimer>,
    /// Shield pool, zero without a shield.
    pub shield_health: f32,
    /// Invulnerability ticks left.
    pub invulnerable_ticks: u64,
    /// Vertical motion state.
    pub stance: Stance,
}

impl PlayerTelemetry {
    fn capture(player: &PlayerComponents, tick: u64) -> Self {
        Self {
            health: player.health,
            max_health: player.max_health,
            weapon: player.weapon.id().clone(),
            weapon_uses: player.weapon.uses(),
            buffs: player
                .buffs
                .timers(tick)
                .into_iter()
                .map(|(kind, remaining_ticks)| BuffTimer {
                    kind,
                    remaining_ticks,
                    remaining_secs: ticks_to_secs(remaining_ticks),
                })
                .collect(),
            shield_health: player.buffs.shield_health(tick),
            invulnerable_ticks: player.invulnerability_remaining(tick),
            stance: player.stance,
        }
    }
}

/// Serializable snapshot of a match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Telemetry {
    /// Lifecycle state.
    pub state: MatchState,
    /// Difficulty phase for the current remaining time.
    pub phase: Phase,
    /// Next tick to be simulated.
    pub tick: u64,
    /// Remaining match time in seconds.
    pub remaining: f32,
    /// Display score, never below zero.
    pub score: i64,
    /// Enemies killed.
    pub kills: u32,
    /// Player deaths.
    pub deaths: u32,
    /// Current kill streak.
    pub combo: u32,
    /// Live enemies.
    pub enemies: usize,
    /// The player, if one exists.
    pub player: Option<PlayerTelemetry>,
}

impl Telemetry {
    pub(crate) fn capture(state: MatchState, phase: Phase, arena: &Arena, ctx: &MatchContext) -> Self {
        let player = arena
            .first_player()
            .and_then(|id| arena.get_live(id))
            .and_then(|e| e.as_player())
            .map(|p| PlayerTelemetry::capture(p, ctx.tick));
        Self {
            state,
            phase,
            tick: ctx.tick,
            remaining: ctx.remaining,
            score: ctx.ledger.total(),
            kills: ctx.kills,
            deaths: ctx.deaths,
            combo: ctx.combo.count,
            enemies: arena.live_count(EntityTag::Enemy),
            player,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buff::BuffConfig;
    use crate::entity::EntityInner;
    use glam::Vec2;

    #[test]
    fn snapshot_reports_buffs_and_serializes() {
        let mut arena = Arena::default();
        let mut player = PlayerComponents::new(Vec2::ZERO, 16.0, 20.0, WeaponId::new("fists"));
        player.buffs.apply(BuffKind::Shield, 0, &BuffConfig::default());
        arena.spawn(EntityInner::Player(player));
        let mut ctx = MatchContext::new(0, 90.0);
        ctx.tick = 60;

        let snapshot = Telemetry::capture(MatchState::Running, Phase::Early, &arena, &ctx);
        let player = snapshot.player.as_ref().unwrap();
        assert_eq!(player.buffs.len(), 1);
        assert_eq!(player.buffs[0].kind, BuffKind::Shield);
        assert_eq!(player.buffs[0].remaining_ticks, 14 * 60);
        assert!((player.shield_health - 10.0).abs() < 1e-6);

        let json = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(json["state"], "running");
        assert_eq!(json["player"]["weapon"], "fists");
    }
}
