//! Entity types for the arena simulation.
//!
//! This module provides the core entity types:
//! - [`EntityId`]: Stable identifier, unique within a match
//! - [`EntityTag`]: Kind classification (player, enemy, projectile, pickup, particle)
//! - [`EntityInner`]: Type-safe storage for kind-specific components
//! - [`Entity`]: The complete entity container
//!
//! The tag is always derived from the inner storage, so a tag and its
//! components can never disagree.
//!
//! # Example
//!
//! ```
//! use gauntlet_core::entity::{Entity, EntityId, EntityInner, EntityTag, ParticleComponents};
//! use glam::Vec2;
//!
//! let spark = Entity::new(
//!     EntityId::new(7),
//!     EntityInner::Particle(ParticleComponents::new(Vec2::ZERO, Vec2::X, 30)),
//! );
//!
//! assert_eq!(spark.id().as_u64(), 7);
//! assert_eq!(spark.tag(), EntityTag::Particle);
//! ```

pub mod components;

use serde::{Deserialize, Serialize};
use std::fmt;

pub use components::{
    AttackProfile, Body, EnemyComponents, Owner, ParticleComponents, PickupComponents,
    PlayerComponents, ProjectileComponents, Stance,
};

/// Unique identifier for an entity.
///
/// Identifiers are assigned monotonically by the [`Arena`](crate::arena::Arena)
/// and never reused within a match, so ordering by id is ordering by spawn
/// time. All simulation stages iterate in id order.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntityId(u64);

impl EntityId {
    /// Creates a new `EntityId` from a raw `u64` value.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw `u64` value of this identifier.
    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Debug for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EntityId({})", self.0)
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for EntityId {
    fn from(id: u64) -> Self {
        Self::new(id)
    }
}

/// Entity kind tag.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EntityTag {
    /// A human-controlled combatant. Never destroyed, respawns instead.
    Player,
    /// A spawned opponent or throw target.
    Enemy,
    /// A moving hit volume owned by a player or an enemy.
    Projectile,
    /// A collectible weapon or buff.
    Pickup,
    /// Cosmetic only, never read by gameplay.
    Particle,
}

impl fmt::Display for EntityTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Player => write!(f, "Player"),
            Self::Enemy => write!(f, "Enemy"),
            Self::Projectile => write!(f, "Projectile"),
            Self::Pickup => write!(f, "Pickup"),
            Self::Particle => write!(f, "Particle"),
        }
    }
}

/// Type-safe storage for kind-specific components.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EntityInner {
    /// Player components (body, health, weapon, buffs, stance)
    Player(PlayerComponents),
    /// Enemy components (body, health, archetype, attack cooldown)
    Enemy(EnemyComponents),
    /// Projectile components (body, owner, damage, attack profile)
    Projectile(ProjectileComponents),
    /// Pickup components (body, kind, expiry)
    Pickup(PickupComponents),
    /// Particle components (body, expiry)
    Particle(ParticleComponents),
}

impl EntityInner {
    /// Returns the tag that matches this storage variant.
    #[must_use]
    pub const fn tag(&self) -> EntityTag {
        match self {
            Self::Player(_) => EntityTag::Player,
            Self::Enemy(_) => EntityTag::Enemy,
            Self::Projectile(_) => EntityTag::Projectile,
            Self::Pickup(_) => EntityTag::Pickup,
            Self::Particle(_) => EntityTag::Particle,
        }
    }

    /// Returns the physical body shared by every entity kind.
    #[must_use]
    pub const fn body(&self) -> &Body {
        match self {
            Self::Player(c) => &c.body,
            Self::Enemy(c) => &c.body,
            Self::Projectile(c) => &c.body,
            Self::Pickup(c) => &c.body,
            Self::Particle(c) => &c.body,
        }
    }

    /// Returns the physical body mutably.
    #[must_use]
    pub fn body_mut(&mut self) -> &mut Body {
        match self {
            Self::Player(c) => &mut c.body,
            Self::Enemy(c) => &mut c.body,
            Self::Projectile(c) => &mut c.body,
            Self::Pickup(c) => &mut c.body,
            Self::Particle(c) => &mut c.body,
        }
    }
}

/// A complete entity: identity plus components.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    id: EntityId,
    inner: EntityInner,
}

impl Entity {
    /// Creates a new entity with the given ID and component storage.
    #[must_use]
    pub const fn new(id: EntityId, inner: EntityInner) -> Self {
        Self { id, inner }
    }

    /// Returns the entity's unique identifier.
    #[must_use]
    pub const fn id(&self) -> EntityId {
        self.id
    }

    /// Returns the entity's kind tag.
    #[must_use]
    pub const fn tag(&self) -> EntityTag {
        self.inner.tag()
    }

    /// Returns a reference to the entity's component storage.
    #[must_use]
    pub const fn inner(&self) -> &EntityInner {
        &self.inner
    }

    /// Returns a mutable reference to the entity's component storage.
    #[must_use]
    pub fn inner_mut(&mut self) -> &mut EntityInner {
        &mut self.inner
    }

    /// Returns the entity's physical body.
    #[must_use]
    pub const fn body(&self) -> &Body {
        self.inner.body()
    }

    /// Returns the entity's physical body mutably.
    #[must_use]
    pub fn body_mut(&mut self) -> &mut Body {
        self.inner.body_mut()
    }

    /// Returns the player components if this is a player, `None` otherwise.
    #[must_use]
    pub const fn as_player(&self) -> Option<&PlayerComponents> {
        match &self.inner {
            EntityInner::Player(c) => Some(c),
            _ => None,
        }
    }

    /// Returns mutable player components if this is a player, `None` otherwise.
    #[must_use]
    pub fn as_player_mut(&mut self) -> Option<&mut PlayerComponents> {
        match &mut self.inner {
            EntityInner::Player(c) => Some(c),
            _ => None,
        }
    }

    /// Returns the enemy components if this is an enemy, `None` otherwise.
    #[must_use]
    pub const fn as_enemy(&self) -> Option<&EnemyComponents> {
        match &self.inner {
            EntityInner::Enemy(c) => Some(c),
            _ => None,
        }
    }

    /// Returns mutable enemy components if this is an enemy, `None` otherwise.
    #[must_use]
    pub fn as_enemy_mut(&mut self) -> Option<&mut EnemyComponents> {
        match &mut self.inner {
            EntityInner::Enemy(c) => Some(c),
            _ => None,
        }
    }

    /// Returns the projectile components if this is a projectile, `None` otherwise.
    #[must_use]
    pub const fn as_projectile(&self) -> Option<&ProjectileComponents> {
        match &self.inner {
            EntityInner::Projectile(c) => Some(c),
            _ => None,
        }
    }

    /// Returns the pickup components if this is a pickup, `None` otherwise.
    #[must_use]
    pub const fn as_pickup(&self) -> Option<&PickupComponents> {
        match &self.inner {
            EntityInner::Pickup(c) => Some(c),
            _ => None,
        }
    }

    /// Returns the particle components if this is a particle, `None` otherwise.
    #[must_use]
    pub const fn as_particle(&self) -> Option<&ParticleComponents> {
        match &self.inner {
            EntityInner::Particle(c) => Some(c),
            _ => None,
        }
    }
}
