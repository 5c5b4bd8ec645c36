//! Timed power-ups.
//!
//! A [`BuffSet`] lives on each player and records an absolute expiry tick per
//! active [`BuffKind`]. Effects are never baked into base stats: other stages
//! ask the set for a multiplier on the tick they care about, and get `1.0`
//! once the buff has lapsed.
//!
//! Expiry is exact. A buff acquired with expiry `T` is active on every tick
//! `< T` and inactive on every tick `>= T`, whether or not
//! [`BuffSystem::reconcile`] has run yet.
//!
//! Re-acquiring a buff refreshes its expiry instead of stacking. Picking up a
//! shield also resets the shield pool to its full value.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::arena::Arena;
use crate::clock::secs_to_ticks;
use crate::context::MatchContext;
use crate::entity::EntityTag;
use crate::event::MatchEvent;

/// Kind of timed modifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BuffKind {
    /// Multiplies outgoing damage.
    Damage,
    /// Multiplies movement speed.
    Speed,
    /// Divides weapon cooldowns.
    RapidFire,
    /// Adds a damage-absorbing pool.
    Shield,
}

impl BuffKind {
    /// Every buff kind, in display order.
    pub const ALL: [Self; 4] = [Self::Damage, Self::Speed, Self::RapidFire, Self::Shield];

    /// Stable lowercase name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Damage => "damage",
            Self::Speed => "speed",
            Self::RapidFire => "rapid_fire",
            Self::Shield => "shield",
        }
    }
}

impl fmt::Display for BuffKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BuffKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| format!("unknown buff `{s}`"))
    }
}

// =============================================================================
// Tuning
// =============================================================================

/// Duration and strength of a multiplier buff.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MultiplierTuning {
    /// How long the buff lasts.
    pub duration_secs: f32,
    /// Multiplier while active.
    pub multiplier: f32,
}

/// Duration and pool size of the shield.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShieldTuning {
    /// How long the shield lasts if not broken.
    pub duration_secs: f32,
    /// Pool size set on every pickup.
    pub health: f32,
}

/// Tuning for all buff kinds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BuffConfig {
    /// Damage boost.
    pub damage: MultiplierTuning,
    /// Speed boost.
    pub speed: MultiplierTuning,
    /// Rapid fire (cooldown divisor).
    pub rapid_fire: MultiplierTuning,
    /// Shield.
    pub shield: ShieldTuning,
}

impl BuffConfig {
    /// Duration in ticks for `kind`.
    #[must_use]
    pub fn duration_ticks(&self, kind: BuffKind) -> u64 {
        let secs = match kind {
            BuffKind::Damage => self.damage.duration_secs,
            BuffKind::Speed => self.speed.duration_secs,
            BuffKind::RapidFire => self.rapid_fire.duration_secs,
            BuffKind::Shield => self.shield.duration_secs,
        };
        secs_to_ticks(secs)
    }
}

impl Default for BuffConfig {
    fn default() -> Self {
        Self {
            damage: MultiplierTuning {
                duration_secs: 10.0,
                multiplier: 2.0,
            },
            speed: MultiplierTuning {
                duration_secs: 10.0,
                multiplier: 1.5,
            },
            rapid_fire: MultiplierTuning {
                duration_secs: 8.0,
                multiplier: 2.0,
            },
            shield: ShieldTuning {
                duration_secs: 15.0,
                health: 10.0,
            },
        }
    }
}

// =============================================================================
// BuffSet
// =============================================================================

/// Result of routing a hit through the shield.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Absorption {
    /// Damage soaked by the shield.
    pub absorbed: f32,
    /// Damage left over after the shield broke.
    pub overflow: f32,
    /// The shield reached zero and was removed.
    pub broken: bool,
}

/// Active buffs on one player.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BuffSet {
    expiries: BTreeMap<BuffKind, u64>,
    shield_health: f32,
}

impl BuffSet {
    /// Grants `kind` at tick `now`, replacing any existing instance.
    pub fn apply(&mut self, kind: BuffKind, now: u64, config: &BuffConfig) {
        self.expiries.insert(kind, now + config.duration_ticks(kind));
        if kind == BuffKind::Shield {
            self.shield_health = config.shield.health;
        }
    }

    /// Returns `true` if `kind` is in effect on `tick`.
    #[must_use]
    pub fn is_active(&self, kind: BuffKind, tick: u64) -> bool {
        self.expiries.get(&kind).is_some_and(|&expiry| tick < expiry)
    }

    /// Expiry tick of `kind`, if held.
    #[must_use]
    pub fn expiry(&self, kind: BuffKind) -> Option<u64> {
        self.expiries.get(&kind).copied()
    }

    /// Ticks left on `kind` as of `tick`, if active.
    #[must_use]
    pub fn remaining(&self, kind: BuffKind, tick: u64) -> Option<u64> {
        self.expiries
            .get(&kind)
            .filter(|&&expiry| tick < expiry)
            .map(|&expiry| expiry - tick)
    }

    /// Outgoing damage multiplier on `tick`.
    #[must_use]
    pub fn damage_multiplier(&self, tick: u64, config: &BuffConfig) -> f32 {
        self.multiplier(BuffKind::Damage, tick, config.damage.multiplier)
    }

    /// Movement speed multiplier on `tick`.
    #[must_use]
    pub fn speed_multiplier(&self, tick: u64, config: &BuffConfig) -> f32 {
        self.multiplier(BuffKind::Speed, tick, config.speed.multiplier)
    }

    /// Fire-rate multiplier on `tick` (cooldowns are divided by this).
    #[must_use]
    pub fn fire_rate_multiplier(&self, tick: u64, config: &BuffConfig) -> f32 {
        self.multiplier(BuffKind::RapidFire, tick, config.rapid_fire.multiplier)
    }

    fn multiplier(&self, kind: BuffKind, tick: u64, active: f32) -> f32 {
        if self.is_active(kind, tick) {
            active
        } else {
            1.0
        }
    }

    /// Shield pool on `tick`, zero when no shield is up.
    #[must_use]
    pub fn shield_health(&self, tick: u64) -> f32 {
        if self.is_active(BuffKind::Shield, tick) {
            self.shield_health
        } else {
            0.0
        }
    }

    /// Routes `damage` through the shield.
    ///
    /// Returns `None` if no shield is active on `tick`. A shield reduced to
    /// zero or below is removed and the remainder is reported as overflow.
    pub fn absorb(&mut self, damage: f32, tick: u64) -> Option<Absorption> {
        if !self.is_active(BuffKind::Shield, tick) {
            return None;
        }
        let damage = damage.max(0.0);
        let absorbed = damage.min(self.shield_health);
        self.shield_health -= damage;
        if self.shield_health <= 0.0 {
            let overflow = -self.shield_health;
            self.shield_health = 0.0;
            self.expiries.remove(&BuffKind::Shield);
            return Some(Absorption {
                absorbed,
                overflow,
                broken: true,
            });
        }
        Some(Absorption {
            absorbed,
            overflow: 0.0,
            broken: false,
        })
    }

    /// Removes every buff whose expiry is at or before `tick`.
    ///
    /// Returns the kinds that lapsed, in kind order.
    pub fn reconcile(&mut self, tick: u64) -> Vec<BuffKind> {
        let expired: Vec<BuffKind> = self
            .expiries
            .iter()
            .filter(|(_, &expiry)| tick >= expiry)
            .map(|(&kind, _)| kind)
            .collect();
        for kind in &expired {
            self.expiries.remove(kind);
            if *kind == BuffKind::Shield {
                self.shield_health = 0.0;
            }
        }
        expired
    }

    /// Active buffs and their remaining ticks as of `tick`.
    #[must_use]
    pub fn timers(&self, tick: u64) -> Vec<(BuffKind, u64)> {
        self.expiries
            .iter()
            .filter(|(_, &expiry)| tick < expiry)
            .map(|(&kind, &expiry)| (kind, expiry - tick))
            .collect()
    }

    /// Drops every buff.
    pub fn clear(&mut self) {
        self.expiries.clear();
        self.shield_health = 0.0;
    }
}

// =============================================================================
// BuffSystem
// =============================================================================

/// Stage that retires lapsed buffs on every player.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuffSystem;

impl BuffSystem {
    /// Creates the buff stage.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Removes buffs that expire on or before the current tick, recording a
    /// [`MatchEvent::BuffExpired`] for each.
    pub fn reconcile(&self, arena: &mut Arena, ctx: &mut MatchContext) {
        let tick = ctx.tick;
        for id in arena.live_ids(EntityTag::Player) {
            let Some(player) = arena.get_mut(id).and_then(|e| e.as_player_mut()) else {
                continue;
            };
            for kind in player.buffs.reconcile(tick) {
                debug!(player = %id, buff = %kind, tick, "buff expired");
                ctx.emit(MatchEvent::BuffExpired { player: id, kind });
            }
        }
    }
}
