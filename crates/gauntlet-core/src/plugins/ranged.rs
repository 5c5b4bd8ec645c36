//! Ranged behavior.
//!
//! Closes to a preferred distance from the nearest player, then holds and
//! fires whenever the attack cooldown allows and the player is within sight
//! range. Archetypes whose attack has no projectile only move.

use glam::Vec2;

use crate::entity::EntityTag;
use crate::output::{Command, CommandKind, PluginId};
use crate::plugin::{Plugin, PluginContext, PluginDeclaration};
use crate::world_view::WorldView;

/// Preferred distance as a fraction of sight range.
const PREFERRED_FRACTION: f32 = 0.6;

/// Plugin for archers, flyers and burrowers.
pub struct RangedPlugin {
    declaration: PluginDeclaration,
}

impl RangedPlugin {
    /// Creates a new `RangedPlugin`.
    #[must_use]
    pub fn new() -> Self {
        Self {
            declaration: PluginDeclaration {
                id: PluginId::from_static("ranged"),
                reads: vec![EntityTag::Enemy, EntityTag::Player],
                emits: vec![CommandKind::Movement, CommandKind::Attack],
            },
        }
    }
}

impl Default for RangedPlugin {
    fn default() -> Self {
        Self::new()
    }
}

impl Plugin for RangedPlugin {
    fn declaration(&self) -> &PluginDeclaration {
        &self.declaration
    }

    fn run(&self, ctx: &PluginContext, view: &WorldView) -> Vec<Command> {
        let Some(enemy) = view.enemy(ctx.entity_id) else {
            return vec![];
        };
        let Some((_, player)) = view.nearest_player(enemy.body.position) else {
            return vec![Command::SetVelocity {
                target: ctx.entity_id,
                velocity: Vec2::ZERO,
            }];
        };

        let offset = player.body.position - enemy.body.position;
        let distance = offset.length();
        let direction = offset.normalize_or_zero();
        let sight = enemy.archetype.attack.map_or(0.0, |a| a.range);

        let velocity = if distance > sight * PREFERRED_FRACTION {
            direction * enemy.archetype.speed
        } else {
            Vec2::ZERO
        };
        let mut commands = vec![Command::SetVelocity {
            target: ctx.entity_id,
            velocity,
        }];

        let fires_projectiles = enemy
            .archetype
            .attack
            .is_some_and(|a| a.projectile.is_some());
        if fires_projectiles
            && enemy.attack_ready(ctx.tick)
            && distance <= sight
            && direction != Vec2::ZERO
        {
            commands.push(Command::EnemyFire {
                source: ctx.entity_id,
                direction,
            });
        }
        commands
    }
}
