//! Pickup kinds and drop tables.
//!
//! Pickup kinds are written as `weapon:<id>` or `buff:<id>` both in
//! configuration and in serialized snapshots.
//!
//! ```
//! use gauntlet_core::pickup::PickupKind;
//! use gauntlet_core::buff::BuffKind;
//!
//! let kind: PickupKind = "buff:shield".parse().unwrap();
//! assert_eq!(kind, PickupKind::Buff(BuffKind::Shield));
//! assert_eq!(kind.to_string(), "buff:shield");
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::buff::BuffKind;
use crate::weapon::WeaponId;

/// What collecting a pickup grants.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum PickupKind {
    /// Equips a fresh copy of the named weapon.
    Weapon(WeaponId),
    /// Grants or refreshes a buff.
    Buff(BuffKind),
}

impl fmt::Display for PickupKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Weapon(id) => write!(f, "weapon:{id}"),
            Self::Buff(kind) => write!(f, "buff:{kind}"),
        }
    }
}

impl FromStr for PickupKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once(':') {
            Some(("weapon", id)) if !id.is_empty() => Ok(Self::Weapon(WeaponId::new(id))),
            Some(("buff", name)) => name.parse().map(Self::Buff),
            _ => Err(format!("pickup kind `{s}` is not `weapon:<id>` or `buff:<id>`")),
        }
    }
}

impl TryFrom<String> for PickupKind {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<PickupKind> for String {
    fn from(kind: PickupKind) -> Self {
        kind.to_string()
    }
}

/// Loot rolled when an enemy dies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DropConfig {
    /// Probability that a kill drops anything at all.
    pub chance: f32,
    /// Fewest pickups in a drop.
    pub min_count: u32,
    /// Most pickups in a drop.
    pub max_count: u32,
    /// Kinds to choose from, uniformly.
    pub table: Vec<PickupKind>,
    /// Scatter radius around the kill position.
    pub scatter: f32,
    /// Seconds before an unclaimed pickup disappears.
    pub lifetime_secs: f32,
    /// Pickup collision radius.
    pub radius: f32,
}

impl DropConfig {
    /// A table that never drops.
    #[must_use]
    pub fn none() -> Self {
        Self {
            chance: 0.0,
            min_count: 0,
            max_count: 0,
            table: Vec::new(),
            scatter: 0.0,
            lifetime_secs: 10.0,
            radius: 12.0,
        }
    }
}

/// Upper bound on simultaneous weapon pickups a configuration may allow.
pub const MAX_WEAPON_PICKUPS: usize = 2;

/// Weapon pickups spawned on their own timer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeaponPickupConfig {
    /// Seconds between spawn attempts.
    pub interval_secs: f32,
    /// At most this many weapon pickups may be present at once, never above
    /// [`MAX_WEAPON_PICKUPS`].
    pub max_present: usize,
    /// Weapons to choose from, uniformly. Empty disables the timer.
    pub weapons: Vec<WeaponId>,
}

impl WeaponPickupConfig {
    /// A timer that never fires.
    #[must_use]
    pub fn disabled() -> Self {
        Self {
            interval_secs: 1.0,
            max_present: 0,
            weapons: Vec::new(),
        }
    }

    /// Returns `true` if this timer can ever spawn anything.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.max_present > 0 && !self.weapons.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_both_forms() {
        assert_eq!(
            "weapon:sword".parse::<PickupKind>().unwrap(),
            PickupKind::Weapon(WeaponId::new("sword"))
        );
        assert_eq!(
            "buff:rapid_fire".parse::<PickupKind>().unwrap(),
            PickupKind::Buff(BuffKind::RapidFire)
        );
    }

    #[test]
    fn rejects_malformed() {
        assert!("sword".parse::<PickupKind>().is_err());
        assert!("weapon:".parse::<PickupKind>().is_err());
        assert!("buff:invisibility".parse::<PickupKind>().is_err());
        assert!("armor:plate".parse::<PickupKind>().is_err());
    }

    #[test]
    fn serializes_as_string() {
        let kinds = vec![
            PickupKind::Weapon(WeaponId::new("bow")),
            PickupKind::Buff(BuffKind::Damage),
        ];
        let json = serde_json::to_string(&kinds).unwrap();
        assert_eq!(json, r#"["weapon:bow","buff:damage"]"#);
        let back: Vec<PickupKind> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, kinds);
    }

    #[test]
    fn weapon_timer_enablement() {
        assert!(!WeaponPickupConfig::disabled().is_enabled());
        let cfg = WeaponPickupConfig {
            interval_secs: 8.0,
            max_present: 2,
            weapons: vec![WeaponId::new("sword")],
        };
        assert!(cfg.is_enabled());
    }
}
