//! Drift behavior for passive targets.
//!
//! Keeps moving along the current heading at the archetype's speed. Targets
//! never chase anything; they cross the arena and are culled once they have
//! fully left it.

use glam::Vec2;

use crate::entity::EntityTag;
use crate::output::{Command, CommandKind, PluginId};
use crate::plugin::{Plugin, PluginContext, PluginDeclaration};
use crate::world_view::WorldView;

/// Plugin that holds a constant heading.
pub struct DriftPlugin {
    declaration: PluginDeclaration,
}

impl DriftPlugin {
    /// Creates a new `DriftPlugin`.
    #[must_use]
    pub fn new() -> Self {
        Self {
            declaration: PluginDeclaration {
                id: PluginId::from_static("drift"),
                reads: vec![EntityTag::Enemy],
                emits: vec![CommandKind::Movement],
            },
        }
    }
}

impl Default for DriftPlugin {
    fn default() -> Self {
        Self::new()
    }
}

impl Plugin for DriftPlugin {
    fn declaration(&self) -> &PluginDeclaration {
        &self.declaration
    }

    fn run(&self, ctx: &PluginContext, view: &WorldView) -> Vec<Command> {
        let Some(enemy) = view.enemy(ctx.entity_id) else {
            return vec![];
        };
        let heading = enemy.body.velocity.try_normalize().unwrap_or(Vec2::X);
        vec![Command::SetVelocity {
            target: ctx.entity_id,
            velocity: heading * enemy.archetype.speed,
        }]
    }
}
