//! Scripted player for headless matches.
//!
//! The autopilot only reads public simulation state and produces one
//! [`InputState`] per tick, the same way a human-facing host would.

use glam::Vec2;

use gauntlet_core::clock::secs_to_ticks;
use gauntlet_core::entity::{EntityTag, Owner, PlayerComponents};
use gauntlet_core::input::InputState;
use gauntlet_core::simulation::Simulation;
use gauntlet_core::weapon::WeaponKind;

/// Distance at which the autopilot backs away while holding a ranged weapon.
const KEEP_AWAY: f32 = 140.0;

/// Hostile projectiles closer than this trigger a crouch.
const DUCK_RADIUS: f32 = 80.0;

/// Enemies closer than this make the autopilot hold block.
const GUARD_RADIUS: f32 = 70.0;

/// Greedy input script: chase pickups, face the nearest enemy, attack.
#[derive(Debug, Default)]
pub struct Autopilot {
    held_ticks: u64,
    last_attack: bool,
}

impl Autopilot {
    /// Creates an autopilot with no button held.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Chooses the input for the next tick.
    pub fn input(&mut self, sim: &Simulation) -> InputState {
        let Some(player) = sim.player() else {
            return InputState::default();
        };
        let origin = player.body.position;
        let nearest_enemy = nearest(sim, EntityTag::Enemy, origin);
        let nearest_pickup = nearest(sim, EntityTag::Pickup, origin);

        let aim = nearest_enemy.map(|target| (target - origin).normalize_or_zero());
        let movement = movement(sim, player, origin, nearest_enemy, nearest_pickup);
        let attack = self.attack(sim, player, nearest_enemy.is_some());
        let threatened = hostile_projectile_within(sim, origin, DUCK_RADIUS);

        InputState {
            move_x: movement.x,
            move_y: movement.y,
            aim_x: aim.map_or(0.0, |a| a.x),
            aim_y: aim.map_or(0.0, |a| a.y),
            jump: false,
            crouch: threatened,
            block: nearest_enemy.is_some_and(|target| target.distance(origin) < GUARD_RADIUS),
            attack,
            special: false,
        }
    }

    fn attack(&mut self, sim: &Simulation, player: &PlayerComponents, has_target: bool) -> bool {
        let Some(spec) = sim.config().weapon(player.weapon.id()) else {
            return false;
        };
        let pressed = match spec.kind {
            // Melee fires on the press edge, so pulse the button.
            WeaponKind::Melee { .. } => has_target && !self.last_attack,
            WeaponKind::Ranged { charge: None, .. } => has_target,
            WeaponKind::Ranged {
                charge: Some(charge),
                ..
            } => {
                let full = secs_to_ticks(charge.duration_secs);
                if self.held_ticks >= full {
                    self.held_ticks = 0;
                    false
                } else if has_target && tick_ready(sim, player) {
                    self.held_ticks += 1;
                    true
                } else {
                    self.held_ticks = 0;
                    false
                }
            }
        };
        self.last_attack = pressed;
        pressed
    }
}

fn movement(
    sim: &Simulation,
    player: &PlayerComponents,
    origin: Vec2,
    enemy: Option<Vec2>,
    pickup: Option<Vec2>,
) -> Vec2 {
    let ranged = sim
        .config()
        .weapon(player.weapon.id())
        .is_some_and(|spec| !spec.is_melee());

    match (enemy, pickup) {
        (Some(enemy), Some(pickup)) if pickup.distance(origin) < enemy.distance(origin) => {
            (pickup - origin).normalize_or_zero()
        }
        (None, Some(pickup)) => (pickup - origin).normalize_or_zero(),
        (Some(enemy), _) if ranged && enemy.distance(origin) < KEEP_AWAY => {
            (origin - enemy).normalize_or_zero()
        }
        (Some(enemy), _) if !ranged => (enemy - origin).normalize_or_zero(),
        _ => Vec2::ZERO,
    }
}

fn tick_ready(sim: &Simulation, player: &PlayerComponents) -> bool {
    player.charge_started.is_some() || sim.tick() >= player.attack_ready_at
}

fn nearest(sim: &Simulation, tag: EntityTag, origin: Vec2) -> Option<Vec2> {
    sim.arena()
        .live_with_tag(tag)
        .map(|e| e.body().position)
        .min_by(|a, b| a.distance_squared(origin).total_cmp(&b.distance_squared(origin)))
}

fn hostile_projectile_within(sim: &Simulation, origin: Vec2, radius: f32) -> bool {
    sim.arena()
        .live_with_tag(EntityTag::Projectile)
        .filter_map(|e| e.as_projectile())
        .any(|p| matches!(p.owner, Owner::Enemy(_)) && p.body.position.distance(origin) < radius)
}
