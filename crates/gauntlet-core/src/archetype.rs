//! Enemy archetypes.
//!
//! An [`Archetype`] is the template an enemy is spawned from: body size,
//! speed, health, which AI [`Behavior`] drives it, and what its attack looks
//! like. The attack's [`AttackProfile`] decides which player stances evade it.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::clock::secs_to_ticks;
use crate::entity::AttackProfile;

/// Name of an archetype.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ArchetypeId(String);

impl ArchetypeId {
    /// Creates an archetype id.
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

impl fmt::Display for ArchetypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// AI behavior driving an archetype.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Behavior {
    /// Walk straight at the nearest player.
    Chase,
    /// Keep a distance and shoot.
    Ranged,
    /// Keep the spawn velocity until leaving the arena.
    Drift,
}

/// Projectile fired by a ranged attack.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProjectileSpec {
    /// Speed in arena units per second.
    pub speed: f32,
    /// Collision radius.
    pub radius: f32,
}

/// An archetype's attack.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AttackSpec {
    /// Damage per hit.
    pub damage: f32,
    /// Melee reach, or sight range for ranged attackers.
    pub range: f32,
    /// Seconds between attacks.
    pub cooldown_secs: f32,
    /// Fired projectile; `None` for melee attacks.
    pub projectile: Option<ProjectileSpec>,
}

impl AttackSpec {
    /// Cooldown in ticks.
    #[must_use]
    pub fn cooldown_ticks(&self) -> u64 {
        secs_to_ticks(self.cooldown_secs)
    }

    /// Returns `true` for contact attacks resolved by reach.
    #[must_use]
    pub fn is_melee(&self) -> bool {
        self.projectile.is_none()
    }
}

/// Template for spawning an enemy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Archetype {
    /// Name.
    pub id: ArchetypeId,
    /// AI behavior.
    pub behavior: Behavior,
    /// Collision radius.
    pub radius: f32,
    /// Movement speed in arena units per second.
    pub speed: f32,
    /// Starting and maximum health.
    pub max_health: f32,
    /// How the attack travels, for dodge checks.
    #[serde(default)]
    pub profile: AttackProfile,
    /// Attack, if any.
    #[serde(default)]
    pub attack: Option<AttackSpec>,
    /// Boss archetype: fixed points and at most one alive.
    #[serde(default)]
    pub is_boss: bool,
    /// Fixed points on kill, overriding the phase table. Negative for decoys.
    #[serde(default)]
    pub fixed_points: Option<i32>,
}

impl Archetype {
    /// Basic melee walker.
    #[must_use]
    pub fn basic() -> Self {
        Self {
            id: ArchetypeId::new("basic"),
            behavior: Behavior::Chase,
            radius: 14.0,
            speed: 70.0,
            max_health: 2.0,
            profile: AttackProfile::GROUND_MELEE,
            attack: Some(AttackSpec {
                damage: 2.0,
                range: 24.0,
                cooldown_secs: 1.0,
                projectile: None,
            }),
            is_boss: false,
            fixed_points: None,
        }
    }

    /// Ground archer firing low projectiles.
    #[must_use]
    pub fn archer() -> Self {
        Self {
            id: ArchetypeId::new("archer"),
            behavior: Behavior::Ranged,
            radius: 14.0,
            speed: 50.0,
            max_health: 2.0,
            profile: AttackProfile::GROUND_RANGED,
            attack: Some(AttackSpec {
                damage: 2.0,
                range: 320.0,
                cooldown_secs: 2.0,
                projectile: Some(ProjectileSpec {
                    speed: 220.0,
                    radius: 5.0,
                }),
            }),
            is_boss: false,
            fixed_points: None,
        }
    }

    /// Flyer dropping shots from above.
    #[must_use]
    pub fn bat() -> Self {
        Self {
            id: ArchetypeId::new("bat"),
            behavior: Behavior::Ranged,
            radius: 12.0,
            speed: 110.0,
            max_health: 1.0,
            profile: AttackProfile::AERIAL,
            attack: Some(AttackSpec {
                damage: 1.0,
                range: 260.0,
                cooldown_secs: 1.5,
                projectile: Some(ProjectileSpec {
                    speed: 200.0,
                    radius: 5.0,
                }),
            }),
            is_boss: false,
            fixed_points: None,
        }
    }

    /// Burrower whose shots erupt from the ground.
    #[must_use]
    pub fn mole() -> Self {
        Self {
            id: ArchetypeId::new("mole"),
            behavior: Behavior::Ranged,
            radius: 14.0,
            speed: 40.0,
            max_health: 3.0,
            profile: AttackProfile::BURROW,
            attack: Some(AttackSpec {
                damage: 2.0,
                range: 280.0,
                cooldown_secs: 2.5,
                projectile: Some(ProjectileSpec {
                    speed: 180.0,
                    radius: 6.0,
                }),
            }),
            is_boss: false,
            fixed_points: None,
        }
    }

    /// Heavy melee boss worth fixed points.
    #[must_use]
    pub fn boss(points: i32) -> Self {
        Self {
            id: ArchetypeId::new("boss"),
            behavior: Behavior::Chase,
            radius: 32.0,
            speed: 45.0,
            max_health: 30.0,
            profile: AttackProfile::GROUND_MELEE,
            attack: Some(AttackSpec {
                damage: 5.0,
                range: 44.0,
                cooldown_secs: 1.5,
                projectile: None,
            }),
            is_boss: true,
            fixed_points: Some(points),
        }
    }

    /// Passive drifting target for the throw variant.
    #[must_use]
    pub fn target(id: &str, points: i32, speed: f32) -> Self {
        Self {
            id: ArchetypeId::new(id),
            behavior: Behavior::Drift,
            radius: 18.0,
            speed,
            max_health: 1.0,
            profile: AttackProfile::empty(),
            attack: None,
            is_boss: false,
            fixed_points: Some(points),
        }
    }

    /// Returns `true` if any landed hit destroys this archetype regardless of
    /// damage. Drifting targets break on contact.
    #[must_use]
    pub fn breaks_on_hit(&self) -> bool {
        self.behavior == Behavior::Drift
    }

    /// Returns `true` if killing this archetype costs points.
    #[must_use]
    pub fn is_decoy(&self) -> bool {
        self.fixed_points.is_some_and(|p| p < 0)
    }
}
