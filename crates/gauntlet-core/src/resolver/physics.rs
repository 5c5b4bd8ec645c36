//! Physics resolver for movement commands and integration.
//!
//! The `PhysicsResolver` handles:
//! - `SetVelocity` commands: update entity velocity
//! - Integration: `position += velocity * dt` for every live entity
//! - Bounds: players are kept inside the arena; enemies, projectiles and
//!   particles that have fully left it are removed silently
//! - Expiry: pickups and particles past their lifetime are removed
//!
//! Removal is deferred through [`Arena::mark_removed`].

use glam::Vec2;

use crate::arena::Arena;
use crate::clock::FIXED_DT;
use crate::context::MatchContext;
use crate::entity::{EntityId, EntityInner};
use crate::output::{Command, CommandKind};

use super::Resolver;

/// Resolver for velocity commands and per-tick integration.
///
/// # Example
///
/// ```
/// use gauntlet_core::resolver::{PhysicsResolver, Resolver};
/// use gauntlet_core::output::CommandKind;
///
/// let resolver = PhysicsResolver::new();
/// assert!(resolver.handles().contains(&CommandKind::Movement));
/// ```
#[derive(Debug, Clone)]
pub struct PhysicsResolver {
    /// Fixed timestep for integration.
    dt: f32,
}

impl PhysicsResolver {
    /// Creates a physics resolver with the fixed timestep.
    #[must_use]
    pub fn new() -> Self {
        Self { dt: FIXED_DT }
    }

    /// Returns the timestep used for integration.
    #[must_use]
    pub fn dt(&self) -> f32 {
        self.dt
    }

    fn apply_set_velocity(arena: &mut Arena, target: EntityId, velocity: Vec2) {
        if !arena.is_live(target) || !velocity.is_finite() {
            return;
        }
        if let Some(entity) = arena.get_mut(target) {
            entity.body_mut().velocity = velocity;
        }
    }

    fn integrate(&self, arena: &mut Arena, tick: u64) {
        let bounds = *arena.bounds();
        let mut leaving = Vec::new();
        for id in arena.entity_ids_sorted().collect::<Vec<_>>() {
            if !arena.is_live(id) {
                continue;
            }
            let Some(entity) = arena.get_mut(id) else {
                continue;
            };
            let body = entity.body_mut();
            body.position += body.velocity * self.dt;

            let gone = match entity.inner_mut() {
                EntityInner::Player(player) => {
                    player.body.position = bounds.clamp_circle(player.body.position, player.body.radius);
                    false
                }
                EntityInner::Enemy(enemy) => bounds.has_left(&enemy.body),
                EntityInner::Projectile(projectile) => bounds.has_left(&projectile.body),
                EntityInner::Pickup(pickup) => tick >= pickup.expires_at,
                EntityInner::Particle(particle) => {
                    tick >= particle.expires_at || bounds.has_left(&particle.body)
                }
            };
            if gone {
                leaving.push(id);
            }
        }
        for id in leaving {
            arena.mark_removed(id);
        }
    }
}

impl Default for PhysicsResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl Resolver for PhysicsResolver {
    fn handles(&self) -> &[CommandKind] {
        &[CommandKind::Movement]
    }

    fn resolve(&self, commands: &[&Command], arena: &mut Arena, ctx: &mut MatchContext) {
        for command in commands {
            if let Command::SetVelocity { target, velocity } = command {
                Self::apply_set_velocity(arena, *target, *velocity);
            }
        }
        self.integrate(arena, ctx.tick);
    }
}
