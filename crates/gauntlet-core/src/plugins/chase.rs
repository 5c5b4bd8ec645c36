//! Chase behavior.
//!
//! Walks straight at the nearest player at the archetype's speed and stops
//! once the player is comfortably inside melee reach, so contact attacks are
//! resolved by the collision stage rather than by pushing into the player.

use glam::Vec2;

use crate::entity::EntityTag;
use crate::output::{Command, CommandKind, PluginId};
use crate::plugin::{Plugin, PluginContext, PluginDeclaration};
use crate::world_view::WorldView;

/// Fraction of the attack range at which a chaser stops advancing.
const HOLD_FRACTION: f32 = 0.8;

/// Plugin that closes on the nearest player.
///
/// # Example
///
/// ```
/// use gauntlet_core::plugins::ChasePlugin;
/// use gauntlet_core::plugin::Plugin;
///
/// let plugin = ChasePlugin::new();
/// assert_eq!(plugin.declaration().id.as_str(), "chase");
/// ```
pub struct ChasePlugin {
    declaration: PluginDeclaration,
}

impl ChasePlugin {
    /// Creates a new `ChasePlugin`.
    #[must_use]
    pub fn new() -> Self {
        Self {
            declaration: PluginDeclaration {
                id: PluginId::from_static("chase"),
                reads: vec![EntityTag::Enemy, EntityTag::Player],
                emits: vec![CommandKind::Movement],
            },
        }
    }
}

impl Default for ChasePlugin {
    fn default() -> Self {
        Self::new()
    }
}

impl Plugin for ChasePlugin {
    fn declaration(&self) -> &PluginDeclaration {
        &self.declaration
    }

    fn run(&self, ctx: &PluginContext, view: &WorldView) -> Vec<Command> {
        let Some(enemy) = view.enemy(ctx.entity_id) else {
            return vec![];
        };
        let velocity = match view.nearest_player(enemy.body.position) {
            Some((_, player)) => {
                let hold = enemy
                    .archetype
                    .attack
                    .map_or(0.0, |attack| attack.range * HOLD_FRACTION);
                if enemy.body.reaches(&player.body, hold) {
                    Vec2::ZERO
                } else {
                    (player.body.position - enemy.body.position).normalize_or_zero()
                        * enemy.archetype.speed
                }
            }
            None => Vec2::ZERO,
        };
        vec![Command::SetVelocity {
            target: ctx.entity_id,
            velocity,
        }]
    }
}
