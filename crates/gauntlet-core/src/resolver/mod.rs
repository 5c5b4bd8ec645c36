//! Resolvers: the write phase of a tick.
//!
//! Resolvers process commands and mutate the arena and match context. They
//! are where proposed changes become actual state mutations.
//!
//! # Architecture
//!
//! Each resolver declares which command kinds it handles via
//! [`Resolver::handles()`]. During a tick:
//! 1. Commands are collected from the player controller and enemy plugins
//! 2. Commands are routed to resolvers by [`CommandKind`]
//! 3. Each resolver processes its commands in emission order
//!
//! Collision detection is not a resolver: [`CollisionResolver::detect`] only
//! reads the arena and produces [`Contact`]s, which the [`CombatResolver`]
//! then applies.
//!
//! # Available Resolvers
//!
//! - [`PhysicsResolver`]: velocity commands, integration, bounds, expiry
//! - [`CombatResolver`]: attacks, damage, deaths, pickups, scoring
//! - [`CollisionResolver`]: circle-circle contact detection

mod collision;
mod combat;
mod physics;

pub use collision::{CollisionResolver, Contact};
pub use combat::CombatResolver;
pub use physics::PhysicsResolver;

use crate::arena::Arena;
use crate::context::MatchContext;
use crate::output::{Command, CommandKind};

/// Resolver processes commands and mutates match state.
///
/// Given the same arena, context and command order, a resolver must produce
/// identical results. Iterate entities in id order and draw randomness only
/// from [`MatchContext::rng`].
pub trait Resolver: Send + Sync {
    /// Returns the command kinds this resolver handles.
    fn handles(&self) -> &[CommandKind];

    /// Resolves commands into state mutations.
    ///
    /// `commands` has already been filtered by [`Resolver::handles()`].
    fn resolve(&self, commands: &[&Command], arena: &mut Arena, ctx: &mut MatchContext);
}

/// Routes `commands` to `resolver`, keeping only the kinds it handles.
pub fn dispatch(resolver: &dyn Resolver, commands: &[Command], arena: &mut Arena, ctx: &mut MatchContext) {
    let handles = resolver.handles();
    let routed: Vec<&Command> = commands
        .iter()
        .filter(|cmd| handles.contains(&cmd.kind()))
        .collect();
    resolver.resolve(&routed, arena, ctx);
}

#[cfg(test)]
mod tests {
    use super::*;

    // Test that the trait is object-safe
    #[test]
    fn resolver_is_object_safe() {
        fn _accepts_boxed(_resolver: Box<dyn Resolver>) {}
        fn _accepts_slice(_resolvers: &[Box<dyn Resolver>]) {}
    }
}
