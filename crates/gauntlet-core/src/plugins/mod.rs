//! Stock enemy behaviors.
//!
//! - [`ChasePlugin`]: walks at the nearest player (melee archetypes, boss)
//! - [`RangedPlugin`]: closes to a preferred distance and shoots
//! - [`DriftPlugin`]: holds its spawn heading until it leaves the arena
//!
//! Use [`PluginRegistry::default_bundles()`](crate::plugin::PluginRegistry::default_bundles)
//! to get a registry with each behavior wired up.

mod chase;
mod drift;
mod ranged;

pub use chase::ChasePlugin;
pub use drift::DriftPlugin;
pub use ranged::RangedPlugin;
