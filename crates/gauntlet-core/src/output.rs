//! Commands emitted by the controller and enemy plugins.
//!
//! Nothing that reads the world mutates it directly. The player controller
//! and the behavior plugins emit [`Command`]s, and resolvers turn them into
//! state changes. [`Command::kind`] routes each command to the resolver that
//! handles it.
//!
//! # Example
//!
//! ```
//! use gauntlet_core::output::{Command, CommandKind};
//! use gauntlet_core::entity::EntityId;
//! use glam::Vec2;
//!
//! let cmd = Command::SetVelocity {
//!     target: EntityId::new(1),
//!     velocity: Vec2::new(10.0, 5.0),
//! };
//! assert_eq!(cmd.kind(), CommandKind::Movement);
//! assert_eq!(cmd.source(), EntityId::new(1));
//! ```

use std::fmt;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::entity::EntityId;

// =============================================================================
// Plugin ID
// =============================================================================

/// Identifier of a behavior plugin.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PluginId(String);

impl PluginId {
    /// Creates a plugin id.
    #[must_use]
    pub fn new(id: &str) -> Self {
        Self(id.to_string())
    }

    /// Creates a plugin id from a static string.
    #[must_use]
    pub fn from_static(id: &'static str) -> Self {
        Self(id.to_string())
    }

    /// Returns the id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PluginId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// =============================================================================
// Commands
// =============================================================================

/// Routing category of a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CommandKind {
    /// Velocity changes, handled by the physics resolver.
    Movement,
    /// Attacks, handled by the combat resolver.
    Attack,
}

impl fmt::Display for CommandKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Movement => write!(f, "Movement"),
            Self::Attack => write!(f, "Attack"),
        }
    }
}

/// A proposed state change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Command {
    /// Set the velocity of an entity.
    SetVelocity {
        /// Entity to modify.
        target: EntityId,
        /// New velocity in arena units per second.
        velocity: Vec2,
    },
    /// Swing the player's melee weapon.
    PlayerSwing {
        /// Attacking player.
        source: EntityId,
    },
    /// Fire the player's ranged weapon in the facing direction.
    PlayerShoot {
        /// Attacking player.
        source: EntityId,
        /// Speed and damage multiplier from charging; `1.0` for automatic fire.
        multiplier: f32,
    },
    /// Fire an enemy projectile.
    EnemyFire {
        /// Attacking enemy.
        source: EntityId,
        /// Unit vector toward the target.
        direction: Vec2,
    },
}

impl Command {
    /// Returns the routing category of this command.
    #[must_use]
    pub const fn kind(&self) -> CommandKind {
        match self {
            Self::SetVelocity { .. } => CommandKind::Movement,
            Self::PlayerSwing { .. } | Self::PlayerShoot { .. } | Self::EnemyFire { .. } => {
                CommandKind::Attack
            }
        }
    }

    /// Returns the entity that issued or is affected by this command.
    #[must_use]
    pub const fn source(&self) -> EntityId {
        match self {
            Self::SetVelocity { target, .. } => *target,
            Self::PlayerSwing { source }
            | Self::PlayerShoot { source, .. }
            | Self::EnemyFire { source, .. } => *source,
        }
    }
}
