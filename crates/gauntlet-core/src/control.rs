//! Player controller.
//!
//! Turns one tick of sanitized [`InputState`] into player state updates
//! (stance, dash, facing, charge timers) and [`Command`]s for the resolvers
//! (velocity and attacks). Edge-triggered actions compare against the held
//! flags stored on the player from the previous tick.
//!
//! Attack handling by weapon kind:
//! - melee strikes on the press edge
//! - automatic ranged weapons fire every tick the input is held and the
//!   cooldown allows
//! - charge weapons start charging while held and fire on release, scaled by
//!   the charge fraction, or not at all below the minimum threshold
//!
//! A spent weapon is swapped for the default weapon as soon as the attack
//! input is held again, before the attack itself is evaluated.

use glam::Vec2;
use tracing::debug;

use crate::arena::Arena;
use crate::clock::secs_to_ticks;
use crate::config::MatchConfig;
use crate::context::MatchContext;
use crate::entity::{EntityId, PlayerComponents, Stance};
use crate::event::MatchEvent;
use crate::input::InputState;
use crate::output::Command;
use crate::weapon::WeaponKind;

/// Applies player input. Stateless; all timers live on the player.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlayerController;

impl PlayerController {
    /// Creates the controller.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Applies `input` to player `id` and returns the resulting commands.
    pub fn apply(
        &self,
        arena: &mut Arena,
        id: EntityId,
        input: &InputState,
        config: &MatchConfig,
        ctx: &mut MatchContext,
    ) -> Vec<Command> {
        let tick = ctx.tick;
        let Some(player) = arena.get_mut(id).and_then(|e| e.as_player_mut()) else {
            return vec![];
        };

        update_stance(player, input, config, tick);
        update_dash(player, input, config, tick);
        if let Some(aim) = input.aim_direction() {
            player.facing = aim;
        } else if let Some(heading) = input.movement().try_normalize() {
            player.facing = heading;
        }

        let mut commands = vec![Command::SetVelocity {
            target: id,
            velocity: velocity(player, input, config, tick),
        }];

        if input.attack && player.weapon.revert_if_spent(&config.default_weapon) {
            player.charge_started = None;
            debug!(player = %id, weapon = %config.default_weapon, "spent weapon reverted");
            ctx.emit(MatchEvent::WeaponReverted {
                player: id,
                weapon: config.default_weapon.clone(),
            });
        }
        if let Some(attack) = attack(id, player, input, config, tick) {
            commands.push(attack);
        }
        player.attack_held = input.attack;
        commands
    }
}

fn update_stance(player: &mut PlayerComponents, input: &InputState, config: &MatchConfig, tick: u64) {
    player.blocking = input.block;
    if !config.player.vertical_motion {
        player.stance = Stance::Grounded;
        player.jump_held = input.jump;
        return;
    }

    let airborne = tick < player.airborne_until;
    let jump_pressed = input.jump && !player.jump_held;
    if jump_pressed && !airborne {
        player.airborne_until = tick + secs_to_ticks(config.player.jump_secs).max(1);
    }
    player.jump_held = input.jump;

    player.stance = if tick < player.airborne_until {
        Stance::Airborne
    } else if input.crouch {
        Stance::Crouched
    } else {
        Stance::Grounded
    };
}

fn update_dash(player: &mut PlayerComponents, input: &InputState, config: &MatchConfig, tick: u64) {
    let pressed = input.special && !player.special_held;
    player.special_held = input.special;
    let Some(dash) = config.player.dash else {
        return;
    };
    if pressed && tick >= player.dash_ready_at {
        player.dash_until = tick + secs_to_ticks(dash.duration_secs).max(1);
        player.dash_ready_at = tick + secs_to_ticks(dash.cooldown_secs);
    }
}

fn velocity(player: &PlayerComponents, input: &InputState, config: &MatchConfig, tick: u64) -> Vec2 {
    let mut speed = config.player.speed * player.buffs.speed_multiplier(tick, &config.buffs);
    if player.stance == Stance::Crouched {
        speed *= config.player.crouch_speed_factor;
    }
    let mut direction = input.movement();
    if let Some(dash) = config.player.dash.filter(|_| tick < player.dash_until) {
        speed *= dash.multiplier;
        if direction == Vec2::ZERO {
            direction = player.facing;
        }
    }
    direction * speed
}

fn attack(
    id: EntityId,
    player: &mut PlayerComponents,
    input: &InputState,
    config: &MatchConfig,
    tick: u64,
) -> Option<Command> {
    let spec = config.weapon(player.weapon.id())?;
    let ready = tick >= player.attack_ready_at;
    let pressed = input.attack && !player.attack_held;

    match spec.kind {
        WeaponKind::Melee { .. } => (pressed && ready).then_some(Command::PlayerSwing { source: id }),
        WeaponKind::Ranged { charge: None, .. } => (input.attack && ready).then_some(Command::PlayerShoot {
            source: id,
            multiplier: 1.0,
        }),
        WeaponKind::Ranged {
            charge: Some(charge),
            ..
        } => {
            if input.attack {
                if player.charge_started.is_none() && ready {
                    player.charge_started = Some(tick);
                }
                return None;
            }
            let started = player.charge_started.take()?;
            let fraction = charge.fraction(tick.saturating_sub(started));
            charge.multiplier(fraction).map(|multiplier| Command::PlayerShoot {
                source: id,
                multiplier,
            })
        }
    }
}
