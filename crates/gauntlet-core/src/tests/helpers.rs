//! Test helper functions for setting up matches and scripting input.

use glam::Vec2;

use crate::archetype::Archetype;
use crate::config::MatchConfig;
use crate::entity::{EnemyComponents, EntityId, EntityInner};
use crate::event::{EventRecord, MatchEvent};
use crate::input::InputState;
use crate::pickup::{DropConfig, WeaponPickupConfig};
use crate::simulation::Simulation;

// =============================================================================
// Match Setup
// =============================================================================

/// Strips every source of unscripted entities from `config`: no enemy
/// spawns, no drops, no weapon pickup timer, no particles.
pub fn quiet(mut config: MatchConfig) -> MatchConfig {
    config.phases.early.max_enemies = 0;
    config.phases.late.max_enemies = 0;
    config.drops = DropConfig::none();
    config.weapon_pickups = WeaponPickupConfig::disabled();
    config.particles.enabled = false;
    config
}

/// A started match.
pub fn running(config: MatchConfig, seed: u64) -> Simulation {
    let mut sim = Simulation::new(config, seed);
    sim.start();
    sim.drain_events();
    sim
}

/// Places a stationary enemy at `offset` from the player.
pub fn spawn_enemy_near_player(sim: &mut Simulation, archetype: &Archetype, offset: Vec2) -> EntityId {
    let position = sim.player().map_or(Vec2::ZERO, |p| p.body.position) + offset;
    sim.arena_mut()
        .spawn(EntityInner::Enemy(EnemyComponents::from_archetype(
            archetype,
            position,
            Vec2::ZERO,
        )))
}

/// Runs `ticks` steps with the same input and remaining time.
pub fn run_for(sim: &mut Simulation, ticks: u64, remaining: f32, input: &InputState) {
    for _ in 0..ticks {
        sim.step(remaining, input);
    }
}

// =============================================================================
// Input
// =============================================================================

/// Input with only the attack button set.
pub fn attack(held: bool) -> InputState {
    InputState {
        attack: held,
        ..InputState::default()
    }
}

/// Deterministic, busy input pattern keyed on the tick.
#[allow(clippy::cast_precision_loss)]
pub fn scripted_input(tick: u64) -> InputState {
    let phase = tick as f32 * 0.05;
    InputState {
        move_x: phase.cos(),
        move_y: phase.sin(),
        aim_x: (phase * 0.7).cos(),
        aim_y: (phase * 0.7).sin(),
        jump: tick % 90 < 3,
        crouch: tick % 150 > 120,
        block: tick % 200 > 170,
        attack: tick % 40 < 25,
        special: tick % 120 == 0,
    }
}

/// Remaining seconds at `tick` for a match that started with `total`.
#[allow(clippy::cast_precision_loss)]
pub fn remaining_at(total: f32, tick: u64) -> f32 {
    total - tick as f32 / 60.0
}

// =============================================================================
// Events
// =============================================================================

/// Number of recorded events matching `pred`.
pub fn count_events(records: &[EventRecord], pred: impl Fn(&MatchEvent) -> bool) -> usize {
    records.iter().filter(|r| pred(&r.event)).count()
}
