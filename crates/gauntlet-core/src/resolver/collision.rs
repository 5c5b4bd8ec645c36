//! Circle-circle contact detection.
//!
//! Detection is read-only: it walks the live entities of the arena and lists
//! every interacting pair as a [`Contact`]. The [`CombatResolver`] applies
//! them afterwards.
//!
//! Pairs checked:
//! - player-owned projectile vs enemy
//! - enemy-owned projectile vs player
//! - melee enemy vs player, within attack range of the player's edge
//! - pickup vs player
//!
//! Naive O(n²) is fine at arena populations.
//!
//! [`CombatResolver`]: super::CombatResolver

use serde::{Deserialize, Serialize};

use crate::arena::Arena;
use crate::entity::{Entity, EntityId, EntityTag, Owner};

/// One interacting pair found during detection.
///
/// Variants are declared in resolution order; the derived `Ord` sorts
/// contacts by kind first, then by ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Contact {
    /// A player-owned projectile overlaps an enemy.
    ProjectileEnemy {
        /// Projectile.
        projectile: EntityId,
        /// Enemy hit.
        enemy: EntityId,
    },
    /// An enemy-owned projectile overlaps a player.
    ProjectilePlayer {
        /// Projectile.
        projectile: EntityId,
        /// Player hit.
        player: EntityId,
    },
    /// A melee enemy has a player within its attack range.
    MeleeReach {
        /// Attacking enemy.
        enemy: EntityId,
        /// Player in reach.
        player: EntityId,
    },
    /// A player overlaps a pickup.
    PickupPlayer {
        /// Pickup.
        pickup: EntityId,
        /// Collecting player.
        player: EntityId,
    },
}

/// Stateless contact detector.
#[derive(Debug, Clone, Copy, Default)]
pub struct CollisionResolver;

impl CollisionResolver {
    /// Creates a detector.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Lists every contact among live entities, sorted.
    #[must_use]
    pub fn detect(&self, arena: &Arena) -> Vec<Contact> {
        let players: Vec<&Entity> = arena.live_with_tag(EntityTag::Player).collect();
        let enemies: Vec<&Entity> = arena.live_with_tag(EntityTag::Enemy).collect();
        let mut contacts = Vec::new();

        for entity in arena.live_with_tag(EntityTag::Projectile) {
            let Some(projectile) = entity.as_projectile() else {
                continue;
            };
            match projectile.owner {
                Owner::Player(_) => {
                    contacts.extend(
                        enemies
                            .iter()
                            .filter(|enemy| projectile.body.overlaps(enemy.body()))
                            .map(|enemy| Contact::ProjectileEnemy {
                                projectile: entity.id(),
                                enemy: enemy.id(),
                            }),
                    );
                }
                Owner::Enemy(_) => {
                    contacts.extend(
                        players
                            .iter()
                            .filter(|player| projectile.body.overlaps(player.body()))
                            .map(|player| Contact::ProjectilePlayer {
                                projectile: entity.id(),
                                player: player.id(),
                            }),
                    );
                }
            }
        }

        for entity in &enemies {
            let Some(enemy) = entity.as_enemy() else {
                continue;
            };
            let Some(attack) = enemy.archetype.attack.filter(|a| a.is_melee()) else {
                continue;
            };
            contacts.extend(
                players
                    .iter()
                    .filter(|player| enemy.body.reaches(player.body(), attack.range))
                    .map(|player| Contact::MeleeReach {
                        enemy: entity.id(),
                        player: player.id(),
                    }),
            );
        }

        for entity in arena.live_with_tag(EntityTag::Pickup) {
            contacts.extend(
                players
                    .iter()
                    .filter(|player| entity.body().overlaps(player.body()))
                    .map(|player| Contact::PickupPlayer {
                        pickup: entity.id(),
                        player: player.id(),
                    }),
            );
        }

        contacts.sort_unstable();
        contacts
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::archetype::Archetype;
    use crate::buff::BuffKind;
    use crate::entity::{
        AttackProfile, Body, EnemyComponents, EntityInner, PickupComponents, PlayerComponents,
        ProjectileComponents,
    };
    use crate::pickup::PickupKind;
    use crate::weapon::WeaponId;
    use glam::Vec2;

    fn player_at(arena: &mut Arena, x: f32) -> EntityId {
        arena.spawn(EntityInner::Player(PlayerComponents::new(
            Vec2::new(x, 100.0),
            16.0,
            20.0,
            WeaponId::new("fists"),
        )))
    }

    fn enemy_at(arena: &mut Arena, archetype: &Archetype, x: f32) -> EntityId {
        arena.spawn(EntityInner::Enemy(EnemyComponents::from_archetype(
            archetype,
            Vec2::new(x, 100.0),
            Vec2::ZERO,
        )))
    }

    fn projectile_at(arena: &mut Arena, x: f32, owner: Owner) -> EntityId {
        arena.spawn(EntityInner::Projectile(ProjectileComponents {
            body: Body::new(Vec2::new(x, 100.0), 4.0),
            owner,
            damage: 1.0,
            profile: AttackProfile::GROUND_RANGED,
        }))
    }

    mod pair_tests {
        use super::*;

        #[test]
        fn projectiles_only_hit_the_other_side() {
            let mut arena = Arena::default();
            let player = player_at(&mut arena, 100.0);
            let enemy = enemy_at(&mut arena, &Archetype::archer(), 300.0);
            let friendly = projectile_at(&mut arena, 305.0, Owner::Player(player));
            let hostile = projectile_at(&mut arena, 105.0, Owner::Enemy(enemy));
            // Overlaps its own side only.
            projectile_at(&mut arena, 103.0, Owner::Player(player));

            let contacts = CollisionResolver::new().detect(&arena);
            assert_eq!(
                contacts,
                vec![
                    Contact::ProjectileEnemy {
                        projectile: friendly,
                        enemy
                    },
                    Contact::ProjectilePlayer {
                        projectile: hostile,
                        player
                    },
                ]
            );
        }

        #[test]
        fn touching_circles_do_not_collide() {
            let mut arena = Arena::default();
            let player = player_at(&mut arena, 100.0);
            // 16 + 4 = 20 apart exactly.
            projectile_at(&mut arena, 120.0, Owner::Enemy(player));
            assert!(CollisionResolver::new().detect(&arena).is_empty());
        }

        #[test]
        fn melee_reach_uses_attack_range() {
            let mut arena = Arena::default();
            let player = player_at(&mut arena, 100.0);
            // basic: range 24, player radius 16, so reach is < 40.
            let near = enemy_at(&mut arena, &Archetype::basic(), 139.0);
            enemy_at(&mut arena, &Archetype::basic(), 141.0);
            // Ranged archetypes never produce melee contacts.
            enemy_at(&mut arena, &Archetype::archer(), 110.0);

            let contacts = CollisionResolver::new().detect(&arena);
            assert_eq!(contacts, vec![Contact::MeleeReach { enemy: near, player }]);
        }

        #[test]
        fn pickups_overlapping_players() {
            let mut arena = Arena::default();
            let player = player_at(&mut arena, 100.0);
            let pickup = arena.spawn(EntityInner::Pickup(PickupComponents {
                body: Body::new(Vec2::new(110.0, 100.0), 10.0),
                kind: PickupKind::Buff(BuffKind::Shield),
                expires_at: 600,
            }));
            let contacts = CollisionResolver::new().detect(&arena);
            assert_eq!(contacts, vec![Contact::PickupPlayer { pickup, player }]);
        }

        #[test]
        fn flagged_entities_are_skipped() {
            let mut arena = Arena::default();
            let player = player_at(&mut arena, 100.0);
            let enemy = enemy_at(&mut arena, &Archetype::basic(), 120.0);
            arena.mark_removed(enemy);
            assert!(CollisionResolver::new().detect(&arena).is_empty());
            let _ = player;
        }
    }
}
