//! Integration tests that drive whole matches through [`Simulation`].
//!
//! - `helpers.rs`: match setup and scripted input
//! - `scenarios.rs`: end-to-end kill, death, shield and charge scenarios
//! - `determinism.rs`: same seed and input give identical matches
//! - `properties.rs`: property-based invariants (proptest)
//!
//! [`Simulation`]: crate::simulation::Simulation

mod helpers;
mod properties;
