//! Entity storage for one match.
//!
//! The [`Arena`] owns every player, enemy, projectile, pickup and particle.
//! It provides:
//! - Monotonic [`EntityId`] assignment (ids are never reused)
//! - Deterministic iteration in id order via `BTreeMap`
//! - Deferred removal, so stages can mark entities dead while walking a
//!   snapshot of ids without invalidating it
//! - The rectangular [`Bounds`] of the playable area
//!
//! # Deferred removal
//!
//! [`Arena::mark_removed`] only flags an entity. Flagged entities stay in
//! storage, but are skipped by [`Arena::is_live`] and every `live_*` query,
//! until [`Arena::flush_removals`] drops them at a stage boundary.
//!
//! # Example
//!
//! ```
//! use gauntlet_core::arena::{Arena, Bounds};
//! use gauntlet_core::entity::{EntityInner, EntityTag, ParticleComponents};
//! use glam::Vec2;
//!
//! let mut arena = Arena::new(Bounds::new(Vec2::ZERO, Vec2::new(100.0, 100.0)));
//! let a = arena.spawn(EntityInner::Particle(ParticleComponents::new(Vec2::ZERO, Vec2::X, 10)));
//! let b = arena.spawn(EntityInner::Particle(ParticleComponents::new(Vec2::ONE, Vec2::X, 10)));
//!
//! arena.mark_removed(a);
//! assert!(!arena.is_live(a));
//! assert_eq!(arena.live_ids(EntityTag::Particle), vec![b]);
//!
//! assert_eq!(arena.flush_removals().len(), 1);
//! assert!(arena.get(a).is_none());
//! ```

use std::collections::{BTreeMap, BTreeSet};

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::entity::{Body, Entity, EntityId, EntityInner, EntityTag};
use crate::pickup::PickupKind;

// =============================================================================
// Bounds
// =============================================================================

/// Axis-aligned playable rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    /// Lower-left corner.
    pub min: Vec2,
    /// Upper-right corner.
    pub max: Vec2,
}

impl Bounds {
    /// Creates bounds from two corners.
    #[must_use]
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self {
            min: min.min(max),
            max: min.max(max),
        }
    }

    /// Bounds anchored at the origin.
    #[must_use]
    pub fn from_size(width: f32, height: f32) -> Self {
        Self::new(Vec2::ZERO, Vec2::new(width, height))
    }

    /// Returns `true` if `point` lies inside or on the edge.
    #[must_use]
    pub fn contains(&self, point: Vec2) -> bool {
        point.cmpge(self.min).all() && point.cmple(self.max).all()
    }

    /// Keeps a circle of `radius` fully inside the bounds.
    #[must_use]
    pub fn clamp_circle(&self, center: Vec2, radius: f32) -> Vec2 {
        let inset = Vec2::splat(radius);
        let lo = self.min + inset;
        let hi = (self.max - inset).max(lo);
        center.clamp(lo, hi)
    }

    /// Returns `true` once a body has completely left the bounds.
    #[must_use]
    pub fn has_left(&self, body: &Body) -> bool {
        let r = body.radius;
        let p = body.position;
        p.x + r < self.min.x || p.x - r > self.max.x || p.y + r < self.min.y || p.y - r > self.max.y
    }

    /// Center of the bounds.
    #[must_use]
    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    /// Size of the bounds.
    #[must_use]
    pub fn size(&self) -> Vec2 {
        self.max - self.min
    }
}

// =============================================================================
// Arena
// =============================================================================

/// Entity registry with deterministic iteration and deferred removal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Arena {
    /// Monotonically increasing entity ID counter.
    next_id: u64,
    /// Entity storage with deterministic iteration order.
    entities: BTreeMap<EntityId, Entity>,
    /// Entities flagged for removal at the next flush.
    pending_removal: BTreeSet<EntityId>,
    /// Playable area.
    bounds: Bounds,
}

impl Arena {
    /// Creates an empty arena.
    #[must_use]
    pub fn new(bounds: Bounds) -> Self {
        Self {
            next_id: 0,
            entities: BTreeMap::new(),
            pending_removal: BTreeSet::new(),
            bounds,
        }
    }

    /// Playable area.
    #[must_use]
    pub const fn bounds(&self) -> &Bounds {
        &self.bounds
    }

    /// Adds an entity and returns its freshly assigned id.
    pub fn spawn(&mut self, inner: EntityInner) -> EntityId {
        let id = EntityId::new(self.next_id);
        self.next_id += 1;
        self.entities.insert(id, Entity::new(id, inner));
        id
    }

    /// Removes an entity immediately.
    ///
    /// Prefer [`Arena::mark_removed`] from inside a stage.
    pub fn despawn(&mut self, id: EntityId) -> Option<Entity> {
        self.pending_removal.remove(&id);
        self.entities.remove(&id)
    }

    /// Flags an entity for removal at the next [`Arena::flush_removals`].
    ///
    /// Returns `true` if the entity was live before this call, so callers can
    /// tell a first removal from a repeated one.
    pub fn mark_removed(&mut self, id: EntityId) -> bool {
        self.entities.contains_key(&id) && self.pending_removal.insert(id)
    }

    /// Drops every flagged entity, returning them in id order.
    pub fn flush_removals(&mut self) -> Vec<Entity> {
        let pending = std::mem::take(&mut self.pending_removal);
        pending
            .into_iter()
            .filter_map(|id| self.entities.remove(&id))
            .collect()
    }

    /// Returns `true` if the entity exists and is not flagged for removal.
    #[must_use]
    pub fn is_live(&self, id: EntityId) -> bool {
        self.entities.contains_key(&id) && !self.pending_removal.contains(&id)
    }

    /// Returns a reference to an entity by ID, live or flagged.
    #[must_use]
    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(&id)
    }

    /// Returns a mutable reference to an entity by ID, live or flagged.
    #[must_use]
    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.get_mut(&id)
    }

    /// Returns a live entity by ID.
    #[must_use]
    pub fn get_live(&self, id: EntityId) -> Option<&Entity> {
        self.get(id).filter(|_| !self.pending_removal.contains(&id))
    }

    /// Returns an iterator over all entity IDs in sorted order.
    pub fn entity_ids_sorted(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.entities.keys().copied()
    }

    /// Returns an iterator over live entities in sorted order.
    pub fn live_entities(&self) -> impl Iterator<Item = &Entity> + '_ {
        self.entities
            .values()
            .filter(move |e| !self.pending_removal.contains(&e.id()))
    }

    /// Live entities of one kind, in id order.
    pub fn live_with_tag(&self, tag: EntityTag) -> impl Iterator<Item = &Entity> + '_ {
        self.live_entities().filter(move |e| e.tag() == tag)
    }

    /// Snapshot of live ids of one kind, in id order.
    #[must_use]
    pub fn live_ids(&self, tag: EntityTag) -> Vec<EntityId> {
        self.live_with_tag(tag).map(Entity::id).collect()
    }

    /// Number of live entities of one kind.
    #[must_use]
    pub fn live_count(&self, tag: EntityTag) -> usize {
        self.live_with_tag(tag).count()
    }

    /// Returns `true` if a live boss enemy exists.
    #[must_use]
    pub fn boss_alive(&self) -> bool {
        self.live_with_tag(EntityTag::Enemy)
            .filter_map(Entity::as_enemy)
            .any(|e| e.archetype.is_boss)
    }

    /// Number of live weapon pickups.
    #[must_use]
    pub fn live_weapon_pickups(&self) -> usize {
        self.live_with_tag(EntityTag::Pickup)
            .filter_map(Entity::as_pickup)
            .filter(|p| matches!(p.kind, PickupKind::Weapon(_)))
            .count()
    }

    /// Id of the first player, if any.
    #[must_use]
    pub fn first_player(&self) -> Option<EntityId> {
        self.live_with_tag(EntityTag::Player).map(Entity::id).next()
    }

    /// Returns the number of entities in storage, including flagged ones.
    #[must_use]
    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    /// Returns true if the arena has no entities.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

impl Default for Arena {
    fn default() -> Self {
        Self::new(Bounds::from_size(960.0, 540.0))
    }
}

// =============================================================================
// Tests
// =============================================================================
