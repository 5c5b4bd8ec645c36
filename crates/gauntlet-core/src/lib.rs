//! # Gauntlet Core
//!
//! Fixed-step simulation engine for the Gauntlet arena mini-games.
//!
//! One engine drives three game variants that differ only in configuration:
//! a side-on brawler ([`config::Variant::Arena`]), a twin-stick shooter
//! ([`config::Variant::Shooter`]) and a charge-and-throw target range
//! ([`config::Variant::Throw`]).
//!
//! ## Architecture
//!
//! - **Entities**: player, enemies, projectiles, pickups, particles, stored
//!   in an [`arena::Arena`] with monotonic ids and deferred removal
//! - **Plugins**: read-only enemy behaviors that emit commands
//! - **Resolvers**: physics and combat, the only stages that mutate
//! - **Stages**: spawning, collision detection, buffs, scoring and the match
//!   lifecycle, run in a fixed order by [`simulation::Simulation::step`]
//!
//! The match clock is owned by the host: every tick is told how much time
//! remains, and the match ends when that reaches zero.
//!
//! ## Usage
//!
//! ```
//! use gauntlet_core::config::MatchConfig;
//! use gauntlet_core::input::InputState;
//! use gauntlet_core::simulation::Simulation;
//!
//! let mut sim = Simulation::new(MatchConfig::shooter(), 7);
//! sim.start();
//!
//! let input = InputState { attack: true, ..InputState::default() };
//! for tick in 0..600 {
//!     let remaining = 120.0 - tick as f32 / 60.0;
//!     sim.step(remaining, &input);
//! }
//!
//! for delta in sim.drain_score_events() {
//!     println!("{:?} {:+}", delta.reason, delta.delta);
//! }
//! println!("{}", serde_json::to_string(&sim.telemetry()).unwrap());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod archetype;
pub mod arena;
pub mod buff;
pub mod clock;
pub mod config;
pub mod context;
pub mod control;
pub mod entity;
pub mod error;
pub mod event;
pub mod input;
pub mod output;
pub mod phase;
pub mod pickup;
pub mod plugin;
pub mod plugins;
pub mod resolver;
pub mod score;
pub mod simulation;
pub mod spawn;
pub mod state;
pub mod telemetry;
pub mod weapon;
pub mod world_view;

#[cfg(test)]
mod tests;

pub use config::{MatchConfig, Variant};
pub use error::ConfigError;
pub use input::InputState;
pub use simulation::Simulation;
pub use state::MatchState;
