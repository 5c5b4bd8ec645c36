//! `WorldView` provides scoped, read-only access to the arena for plugins.
//!
//! A plugin declares which entity kinds it reads in its
//! [`PluginDeclaration`](crate::plugin::PluginDeclaration). The view it
//! receives only hands out entities of those kinds; anything else reads as
//! absent. Entities flagged for removal are never visible.
//!
//! # Example
//!
//! ```
//! use gauntlet_core::arena::Arena;
//! use gauntlet_core::entity::{EntityInner, EntityTag, PlayerComponents};
//! use gauntlet_core::world_view::WorldView;
//! use gauntlet_core::weapon::WeaponId;
//! use glam::Vec2;
//!
//! let mut arena = Arena::default();
//! let player = arena.spawn(EntityInner::Player(PlayerComponents::new(
//!     Vec2::new(100.0, 100.0),
//!     16.0,
//!     20.0,
//!     WeaponId::new("fists"),
//! )));
//!
//! let view = WorldView::new(&arena, &[EntityTag::Player], 0);
//! let (id, _) = view.nearest_player(Vec2::new(90.0, 100.0)).unwrap();
//! assert_eq!(id, player);
//!
//! let blind = WorldView::new(&arena, &[EntityTag::Enemy], 0);
//! assert!(blind.nearest_player(Vec2::ZERO).is_none());
//! ```

use glam::Vec2;

use crate::arena::{Arena, Bounds};
use crate::entity::{EnemyComponents, Entity, EntityId, EntityTag, PlayerComponents};

/// Scoped, read-only view of the arena.
#[derive(Debug, Clone, Copy)]
pub struct WorldView<'a> {
    /// Reference to the arena being viewed.
    arena: &'a Arena,
    /// Entity kinds this view may read.
    readable: &'a [EntityTag],
    /// Current simulation tick.
    tick: u64,
}

impl<'a> WorldView<'a> {
    /// Creates a view limited to `readable` entity kinds.
    #[must_use]
    pub fn new(arena: &'a Arena, readable: &'a [EntityTag], tick: u64) -> Self {
        Self {
            arena,
            readable,
            tick,
        }
    }

    /// Creates a view that can read every entity kind.
    #[must_use]
    pub fn full_access(arena: &'a Arena, tick: u64) -> Self {
        static ALL_TAGS: &[EntityTag] = &[
            EntityTag::Player,
            EntityTag::Enemy,
            EntityTag::Projectile,
            EntityTag::Pickup,
            EntityTag::Particle,
        ];
        Self::new(arena, ALL_TAGS, tick)
    }

    /// Returns the current simulation tick.
    #[must_use]
    pub const fn tick(&self) -> u64 {
        self.tick
    }

    /// Playable area. Always readable.
    #[must_use]
    pub fn bounds(&self) -> &'a Bounds {
        self.arena.bounds()
    }

    /// Returns `true` if this view may read `tag`.
    #[must_use]
    pub fn can_read(&self, tag: EntityTag) -> bool {
        self.readable.contains(&tag)
    }

    /// Returns a live, readable entity by ID.
    #[must_use]
    pub fn entity(&self, id: EntityId) -> Option<&'a Entity> {
        self.arena
            .get_live(id)
            .filter(|entity| self.can_read(entity.tag()))
    }

    /// Returns a live enemy by ID.
    #[must_use]
    pub fn enemy(&self, id: EntityId) -> Option<&'a EnemyComponents> {
        self.entity(id).and_then(Entity::as_enemy)
    }

    /// Live entities of one kind, in id order. Empty if `tag` is not readable.
    pub fn live(&self, tag: EntityTag) -> impl Iterator<Item = &'a Entity> + 'a {
        let arena = self.arena;
        let allowed = self.can_read(tag);
        arena.live_with_tag(tag).filter(move |_| allowed)
    }

    /// Nearest live player to `point`. Ties go to the lower id.
    #[must_use]
    pub fn nearest_player(&self, point: Vec2) -> Option<(EntityId, &'a PlayerComponents)> {
        let mut best: Option<(f32, EntityId, &'a PlayerComponents)> = None;
        for entity in self.live(EntityTag::Player) {
            let Some(player) = entity.as_player() else {
                continue;
            };
            let d = player.body.position.distance_squared(point);
            if best.map_or(true, |(bd, _, _)| d < bd) {
                best = Some((d, entity.id(), player));
            }
        }
        best.map(|(_, id, player)| (id, player))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::archetype::Archetype;
    use crate::entity::EntityInner;
    use crate::weapon::WeaponId;

    fn player_at(x: f32) -> EntityInner {
        EntityInner::Player(PlayerComponents::new(
            Vec2::new(x, 0.0),
            16.0,
            20.0,
            WeaponId::new("fists"),
        ))
    }

    #[test]
    fn nearest_player_picks_closest() {
        let mut arena = Arena::default();
        let _far = arena.spawn(player_at(500.0));
        let near = arena.spawn(player_at(20.0));
        let view = WorldView::full_access(&arena, 0);
        assert_eq!(view.nearest_player(Vec2::ZERO).unwrap().0, near);
    }

    #[test]
    fn flagged_entities_are_invisible() {
        let mut arena = Arena::default();
        let p = arena.spawn(player_at(0.0));
        arena.mark_removed(p);
        let view = WorldView::full_access(&arena, 0);
        assert!(view.entity(p).is_none());
        assert!(view.nearest_player(Vec2::ZERO).is_none());
    }

    #[test]
    fn undeclared_kinds_read_as_absent() {
        let mut arena = Arena::default();
        let e = arena.spawn(EntityInner::Enemy(
            crate::entity::EnemyComponents::from_archetype(
                &Archetype::basic(),
                Vec2::ZERO,
                Vec2::ZERO,
            ),
        ));
        let view = WorldView::new(&arena, &[EntityTag::Player], 3);
        assert!(view.enemy(e).is_none());
        assert_eq!(view.live(EntityTag::Enemy).count(), 0);
        assert_eq!(view.tick(), 3);

        let view = WorldView::new(&arena, &[EntityTag::Enemy], 3);
        assert!(view.enemy(e).is_some());
    }
}
