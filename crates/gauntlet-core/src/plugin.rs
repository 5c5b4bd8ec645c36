//! Enemy behavior plugins.
//!
//! Every enemy is driven by the plugins registered for its archetype's
//! [`Behavior`]. Plugins follow a strict read-only paradigm:
//! - They receive a [`WorldView`] scoped to the entity kinds they declared
//! - They emit [`Command`]s as proposals for state changes
//! - They never mutate state directly
//!
//! Resolvers apply the collected commands after every enemy has run, so the
//! order enemies are visited in cannot change what any of them sees.
//!
//! # Example
//!
//! ```
//! use gauntlet_core::archetype::Behavior;
//! use gauntlet_core::entity::EntityTag;
//! use gauntlet_core::output::{Command, CommandKind, PluginId};
//! use gauntlet_core::plugin::{Plugin, PluginContext, PluginDeclaration, PluginRegistry};
//! use gauntlet_core::world_view::WorldView;
//! use std::sync::Arc;
//!
//! struct Idle {
//!     declaration: PluginDeclaration,
//! }
//!
//! impl Plugin for Idle {
//!     fn declaration(&self) -> &PluginDeclaration {
//!         &self.declaration
//!     }
//!
//!     fn run(&self, _ctx: &PluginContext, _view: &WorldView) -> Vec<Command> {
//!         vec![]
//!     }
//! }
//!
//! let mut registry = PluginRegistry::new();
//! registry.register(
//!     Behavior::Drift,
//!     Arc::new(Idle {
//!         declaration: PluginDeclaration {
//!             id: PluginId::new("idle"),
//!             reads: vec![EntityTag::Enemy],
//!             emits: vec![CommandKind::Movement],
//!         },
//!     }),
//! );
//!
//! assert_eq!(registry.plugins_for(Behavior::Drift).len(), 1);
//! assert!(registry.plugins_for(Behavior::Chase).is_empty());
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::archetype::Behavior;
use crate::entity::{EntityId, EntityTag};
use crate::output::{Command, CommandKind, PluginId};
use crate::world_view::WorldView;

// =============================================================================
// Plugin Declaration
// =============================================================================

/// Declaration of a plugin's capabilities and requirements.
#[derive(Debug, Clone)]
pub struct PluginDeclaration {
    /// Unique identifier for this plugin.
    pub id: PluginId,
    /// Entity kinds this plugin reads. The `WorldView` hides everything else.
    pub reads: Vec<EntityTag>,
    /// Command kinds this plugin may emit.
    pub emits: Vec<CommandKind>,
}

impl PluginDeclaration {
    /// Checks if this plugin emits the given command kind.
    #[must_use]
    pub fn emits_command(&self, kind: CommandKind) -> bool {
        self.emits.contains(&kind)
    }
}

// =============================================================================
// Plugin Context
// =============================================================================

/// Contextual information passed to a plugin during execution.
#[derive(Debug, Clone, Copy)]
pub struct PluginContext {
    /// The enemy this plugin instance is operating on.
    pub entity_id: EntityId,
    /// The current simulation tick.
    pub tick: u64,
}

// =============================================================================
// Plugin Trait
// =============================================================================

/// Behavior logic for one enemy.
///
/// Given the same view, a plugin must always produce the same commands.
/// Randomness, if ever needed, must come from the match context, never from
/// thread-local sources.
pub trait Plugin: Send + Sync {
    /// Returns the plugin's declaration.
    fn declaration(&self) -> &PluginDeclaration;

    /// Proposes commands for the enemy named in `ctx`.
    fn run(&self, ctx: &PluginContext, view: &WorldView) -> Vec<Command>;
}

// =============================================================================
// Plugin Registry
// =============================================================================

/// Plugins bundled by enemy behavior.
#[derive(Default)]
pub struct PluginRegistry {
    bundles: BTreeMap<Behavior, Vec<Arc<dyn Plugin>>>,
}

impl PluginRegistry {
    /// Creates a new empty plugin registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            bundles: BTreeMap::new(),
        }
    }

    /// Registers a plugin for a behavior.
    pub fn register(&mut self, behavior: Behavior, plugin: Arc<dyn Plugin>) {
        self.bundles.entry(behavior).or_default().push(plugin);
    }

    /// Plugins registered for a behavior, in registration order.
    #[must_use]
    pub fn plugins_for(&self, behavior: Behavior) -> &[Arc<dyn Plugin>] {
        self.bundles.get(&behavior).map_or(&[], Vec::as_slice)
    }

    /// Returns the total number of plugin registrations.
    #[must_use]
    pub fn registration_count(&self) -> usize {
        self.bundles.values().map(Vec::len).sum()
    }

    /// Returns true if the registry has no plugins.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bundles.values().all(Vec::is_empty)
    }

    /// Creates a registry with the stock behavior for each [`Behavior`].
    ///
    /// ```
    /// use gauntlet_core::archetype::Behavior;
    /// use gauntlet_core::plugin::PluginRegistry;
    ///
    /// let registry = PluginRegistry::default_bundles();
    /// assert_eq!(registry.plugins_for(Behavior::Chase).len(), 1);
    /// assert_eq!(registry.plugins_for(Behavior::Ranged).len(), 1);
    /// assert_eq!(registry.plugins_for(Behavior::Drift).len(), 1);
    /// ```
    #[must_use]
    pub fn default_bundles() -> Self {
        use crate::plugins::{ChasePlugin, DriftPlugin, RangedPlugin};

        let mut registry = Self::new();
        registry.register(Behavior::Chase, Arc::new(ChasePlugin::new()));
        registry.register(Behavior::Ranged, Arc::new(RangedPlugin::new()));
        registry.register(Behavior::Drift, Arc::new(DriftPlugin::new()));
        registry
    }
}

impl fmt::Debug for PluginRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PluginRegistry")
            .field("bundle_count", &self.bundles.len())
            .field("registration_count", &self.registration_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plugin_is_object_safe() {
        fn _accepts_boxed(_plugin: Box<dyn Plugin>) {}
    }

    #[test]
    fn empty_registry() {
        let registry = PluginRegistry::new();
        assert!(registry.is_empty());
        assert_eq!(registry.registration_count(), 0);
        assert!(registry.plugins_for(Behavior::Ranged).is_empty());
    }

    #[test]
    fn default_bundles_cover_every_behavior() {
        let registry = PluginRegistry::default_bundles();
        assert_eq!(registry.registration_count(), 3);
        for behavior in [Behavior::Chase, Behavior::Ranged, Behavior::Drift] {
            let plugins = registry.plugins_for(behavior);
            assert_eq!(plugins.len(), 1);
            assert!(plugins[0]
                .declaration()
                .emits_command(CommandKind::Movement));
        }
    }
}
