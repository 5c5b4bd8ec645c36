//! Weapons: static specs, equipped state, and the charge/release model.
//!
//! A [`WeaponSpec`] is configuration. A [`WeaponState`] is what a player is
//! holding right now: which weapon, and how many uses are left (`None` for
//! the unlimited default weapon).
//!
//! # Uses
//!
//! Each successful attack with a limited weapon consumes one use. A weapon
//! at zero uses is *spent*: it stays equipped until the next attack attempt,
//! which swaps it for the default weapon before the attack resolves.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::clock::secs_to_ticks;

/// Name of a weapon, as used in configuration and pickup kinds.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WeaponId(String);

impl WeaponId {
    /// Creates a weapon id.
    #[must_use]
    pub fn new(id: &str) -> Self {
        Self(id.to_string())
    }

    /// Returns the id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for WeaponId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for WeaponId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

// =============================================================================
// Specs
// =============================================================================

/// Charge/release tuning for a ranged weapon.
///
/// Holding the attack input accumulates a charge fraction in `[0, 1]` over
/// `duration_secs`. Releasing below `min_fraction` fires nothing. Otherwise
/// the projectile's speed and damage are scaled by a multiplier that grows
/// linearly from `min_multiplier` (at zero charge) to `max_multiplier` (at
/// full charge).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChargeSpec {
    /// Time to reach full charge.
    pub duration_secs: f32,
    /// Minimum fraction required to fire at all.
    pub min_fraction: f32,
    /// Multiplier at zero charge.
    pub min_multiplier: f32,
    /// Multiplier at full charge.
    pub max_multiplier: f32,
}

impl ChargeSpec {
    /// Charge fraction reached after holding for `held_ticks`.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn fraction(&self, held_ticks: u64) -> f32 {
        let full = secs_to_ticks(self.duration_secs).max(1);
        (held_ticks as f32 / full as f32).min(1.0)
    }

    /// Speed/damage multiplier for a release at `fraction`, or `None` if the
    /// release is below the firing threshold.
    #[must_use]
    pub fn multiplier(&self, fraction: f32) -> Option<f32> {
        let fraction = fraction.clamp(0.0, 1.0);
        if fraction < self.min_fraction {
            return None;
        }
        Some(self.min_multiplier + (self.max_multiplier - self.min_multiplier) * fraction)
    }
}

/// How a weapon delivers damage.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WeaponKind {
    /// Instant strike against every enemy within `range` of the player.
    Melee {
        /// Strike radius measured from the player's center.
        range: f32,
    },
    /// Fires a projectile in the facing direction.
    Ranged {
        /// Projectile speed in arena units per second.
        projectile_speed: f32,
        /// Projectile collision radius.
        projectile_radius: f32,
        /// Charge/release tuning; `None` fires automatically while held.
        charge: Option<ChargeSpec>,
    },
}

/// Static description of a weapon.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeaponSpec {
    /// Weapon name.
    pub id: WeaponId,
    /// Base damage per hit.
    pub damage: f32,
    /// Minimum time between attacks (before rapid fire).
    pub cooldown_secs: f32,
    /// Uses granted on pickup; `None` means unlimited.
    pub uses: Option<u32>,
    /// Delivery.
    pub kind: WeaponKind,
}

impl WeaponSpec {
    /// Cooldown in ticks after applying a fire-rate multiplier.
    #[must_use]
    pub fn cooldown_ticks(&self, fire_rate_multiplier: f32) -> u64 {
        secs_to_ticks(self.cooldown_secs / fire_rate_multiplier.max(f32::EPSILON))
    }

    /// Returns the charge tuning, if this is a charge weapon.
    #[must_use]
    pub fn charge(&self) -> Option<&ChargeSpec> {
        match &self.kind {
            WeaponKind::Ranged {
                charge: Some(charge),
                ..
            } => Some(charge),
            _ => None,
        }
    }

    /// Returns `true` for melee weapons.
    #[must_use]
    pub fn is_melee(&self) -> bool {
        matches!(self.kind, WeaponKind::Melee { .. })
    }
}

// =============================================================================
// Equipped state
// =============================================================================

/// The weapon a player currently holds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeaponState {
    id: WeaponId,
    uses: Option<u32>,
}

impl WeaponState {
    /// A weapon with unlimited uses.
    #[must_use]
    pub fn unlimited(id: WeaponId) -> Self {
        Self { id, uses: None }
    }

    /// A weapon with `uses` remaining.
    #[must_use]
    pub fn limited(id: WeaponId, uses: u32) -> Self {
        Self {
            id,
            uses: Some(uses),
        }
    }

    /// Equips a fresh copy of `spec`.
    #[must_use]
    pub fn from_spec(spec: &WeaponSpec) -> Self {
        Self {
            id: spec.id.clone(),
            uses: spec.uses,
        }
    }

    /// Weapon name.
    #[must_use]
    pub fn id(&self) -> &WeaponId {
        &self.id
    }

    /// Remaining uses, `None` if unlimited.
    #[must_use]
    pub fn uses(&self) -> Option<u32> {
        self.uses
    }

    /// Returns `true` once a limited weapon has no uses left.
    #[must_use]
    pub fn is_spent(&self) -> bool {
        self.uses == Some(0)
    }

    /// Consumes one use after a successful attack.
    ///
    /// Unlimited weapons are unaffected. Returns `true` if this use left the
    /// weapon spent.
    pub fn consume(&mut self) -> bool {
        match &mut self.uses {
            Some(n) if *n > 0 => {
                *n -= 1;
                *n == 0
            }
            _ => false,
        }
    }

    /// Swaps a spent weapon for `default` at the start of an attack attempt.
    ///
    /// Returns `true` if the swap happened.
    pub fn revert_if_spent(&mut self, default: &WeaponId) -> bool {
        if self.is_spent() {
            *self = Self::unlimited(default.clone());
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bow_charge() -> ChargeSpec {
        ChargeSpec {
            duration_secs: 1.0,
            min_fraction: 0.25,
            min_multiplier: 0.5,
            max_multiplier: 1.5,
        }
    }

    mod charge_tests {
        use super::*;

        #[test]
        fn fraction_grows_linearly_and_caps() {
            let charge = bow_charge();
            assert_eq!(charge.fraction(0), 0.0);
            assert!((charge.fraction(30) - 0.5).abs() < 1e-6);
            assert_eq!(charge.fraction(60), 1.0);
            assert_eq!(charge.fraction(600), 1.0);
        }

        #[test]
        fn below_threshold_fires_nothing() {
            let charge = bow_charge();
            assert_eq!(charge.multiplier(0.1), None);
            assert_eq!(charge.multiplier(0.0), None);
        }

        #[test]
        fn full_charge_reaches_max_multiplier() {
            let charge = bow_charge();
            assert_eq!(charge.multiplier(1.0), Some(1.5));
        }

        #[test]
        fn threshold_is_inclusive() {
            let charge = bow_charge();
            let m = charge.multiplier(0.25).unwrap();
            assert!((m - 0.75).abs() < 1e-6);
        }
    }

    mod state_tests {
        use super::*;

        #[test]
        fn unlimited_never_spends() {
            let mut w = WeaponState::unlimited(WeaponId::new("fists"));
            for _ in 0..1000 {
                assert!(!w.consume());
            }
            assert_eq!(w.uses(), None);
            assert!(!w.is_spent());
        }

        #[test]
        fn limited_counts_down_to_zero_and_stays() {
            let mut w = WeaponState::limited(WeaponId::new("sword"), 2);
            assert!(!w.consume());
            assert!(w.consume());
            assert_eq!(w.uses(), Some(0));
            assert!(!w.consume());
            assert_eq!(w.uses(), Some(0));
        }

        #[test]
        fn spent_weapon_reverts_on_attempt() {
            let default = WeaponId::new("fists");
            let mut w = WeaponState::limited(WeaponId::new("sword"), 0);
            assert!(w.revert_if_spent(&default));
            assert_eq!(w, WeaponState::unlimited(default.clone()));
            assert!(!w.revert_if_spent(&default));
        }

        #[test]
        fn live_weapon_is_kept() {
            let default = WeaponId::new("fists");
            let mut w = WeaponState::limited(WeaponId::new("sword"), 1);
            assert!(!w.revert_if_spent(&default));
            assert_eq!(w.id().as_str(), "sword");
        }
    }

    mod spec_tests {
        use super::*;

        #[test]
        fn rapid_fire_shortens_cooldown() {
            let spec = WeaponSpec {
                id: WeaponId::new("rifle"),
                damage: 1.0,
                cooldown_secs: 0.5,
                uses: Some(10),
                kind: WeaponKind::Ranged {
                    projectile_speed: 400.0,
                    projectile_radius: 4.0,
                    charge: None,
                },
            };
            assert_eq!(spec.cooldown_ticks(1.0), 30);
            assert_eq!(spec.cooldown_ticks(2.0), 15);
            assert!(spec.charge().is_none());
            assert!(!spec.is_melee());
        }

        #[test]
        fn kind_serializes_tagged() {
            let kind = WeaponKind::Melee { range: 40.0 };
            let json = serde_json::to_string(&kind).unwrap();
            assert_eq!(json, r#"{"type":"melee","range":40.0}"#);
        }
    }
}
