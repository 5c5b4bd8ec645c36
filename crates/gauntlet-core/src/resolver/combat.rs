//! Combat resolver: attacks, damage, deaths, pickups and scoring.
//!
//! The `CombatResolver` handles two inputs:
//! - Attack commands (`PlayerSwing`, `PlayerShoot`, `EnemyFire`) emitted by
//!   the player controller and enemy plugins
//! - [`Contact`]s produced by collision detection
//!
//! # Player damage order
//!
//! 1. Stance dodge against the attack profile
//! 2. Shield absorption (optionally only while blocking)
//! 3. Invulnerability window
//! 4. Health loss, then a fresh invulnerability window
//!
//! # Enemy death
//!
//! Points come from the archetype when fixed, otherwise from the phase
//! table. Decoys cost points and do not count as kills. Every death may
//! scatter pickups and cosmetic particles.

use std::f32::consts::TAU;
use std::sync::Arc;

use glam::Vec2;
use rand::Rng;
use tracing::{debug, trace};

use crate::archetype::Archetype;
use crate::arena::Arena;
use crate::clock::secs_to_ticks;
use crate::config::MatchConfig;
use crate::context::MatchContext;
use crate::entity::{
    AttackProfile, Body, Entity, EntityId, EntityInner, EntityTag, Owner, ParticleComponents,
    PickupComponents, ProjectileComponents,
};
use crate::event::MatchEvent;
use crate::output::{Command, CommandKind};
use crate::pickup::PickupKind;
use crate::score::ScoreReason;
use crate::weapon::{WeaponKind, WeaponState};

use super::{Contact, Resolver};

/// What happened to a hit aimed at a player.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HitOutcome {
    Evaded,
    Absorbed,
    Ignored,
    Damaged,
    Killed,
}

/// Resolver for attacks and contacts.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use gauntlet_core::config::MatchConfig;
/// use gauntlet_core::output::CommandKind;
/// use gauntlet_core::resolver::{CombatResolver, Resolver};
///
/// let resolver = CombatResolver::new(Arc::new(MatchConfig::arena()));
/// assert_eq!(resolver.handles(), &[CommandKind::Attack]);
/// ```
#[derive(Debug, Clone)]
pub struct CombatResolver {
    config: Arc<MatchConfig>,
}

impl CombatResolver {
    /// Creates a combat resolver for one match configuration.
    #[must_use]
    pub fn new(config: Arc<MatchConfig>) -> Self {
        Self { config }
    }

    /// The configuration this resolver applies.
    #[must_use]
    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    /// Applies contacts in order.
    ///
    /// A contact whose entities were removed earlier in the same pass is
    /// skipped, so a projectile hits at most once and an enemy dies at most
    /// once.
    pub fn resolve_contacts(&self, contacts: &[Contact], arena: &mut Arena, ctx: &mut MatchContext) {
        for contact in contacts {
            match *contact {
                Contact::ProjectileEnemy { projectile, enemy } => {
                    self.projectile_hits_enemy(projectile, enemy, arena, ctx);
                }
                Contact::ProjectilePlayer { projectile, player } => {
                    self.projectile_hits_player(projectile, player, arena, ctx);
                }
                Contact::MeleeReach { enemy, player } => {
                    self.melee_strike(enemy, player, arena, ctx);
                }
                Contact::PickupPlayer { pickup, player } => {
                    self.collect(pickup, player, arena, ctx);
                }
            }
        }
    }

    // =========================================================================
    // Attack commands
    // =========================================================================

    fn swing(&self, source: EntityId, arena: &mut Arena, ctx: &mut MatchContext) {
        let tick = ctx.tick;
        let Some(player) = arena.get_live(source).and_then(Entity::as_player) else {
            return;
        };
        let Some(spec) = self.config.weapon(player.weapon.id()) else {
            return;
        };
        let WeaponKind::Melee { range } = spec.kind else {
            return;
        };
        if tick < player.attack_ready_at {
            return;
        }

        let damage = spec.damage * player.buffs.damage_multiplier(tick, &self.config.buffs);
        let cooldown = spec.cooldown_ticks(player.buffs.fire_rate_multiplier(tick, &self.config.buffs));
        let reach = player.body;
        let targets: Vec<EntityId> = arena
            .live_with_tag(EntityTag::Enemy)
            .filter(|enemy| reach.reaches(enemy.body(), range))
            .map(Entity::id)
            .collect();

        if let Some(player) = arena.get_mut(source).and_then(Entity::as_player_mut) {
            player.attack_ready_at = tick + cooldown;
            // Whiffs are free.
            if !targets.is_empty() && player.weapon.consume() {
                let weapon = player.weapon.id().clone();
                debug!(player = %source, weapon = %weapon, tick, "weapon spent");
                ctx.emit(MatchEvent::WeaponSpent {
                    player: source,
                    weapon,
                });
            }
        }

        for target in targets {
            self.damage_enemy(target, damage, arena, ctx);
        }
    }

    fn shoot(&self, source: EntityId, multiplier: f32, arena: &mut Arena, ctx: &mut MatchContext) {
        let tick = ctx.tick;
        if !multiplier.is_finite() || multiplier <= 0.0 {
            return;
        }
        let Some(player) = arena.get_live(source).and_then(Entity::as_player) else {
            return;
        };
        let Some(spec) = self.config.weapon(player.weapon.id()) else {
            return;
        };
        let WeaponKind::Ranged {
            projectile_speed,
            projectile_radius,
            ..
        } = spec.kind
        else {
            return;
        };
        if tick < player.attack_ready_at {
            return;
        }

        let damage =
            spec.damage * multiplier * player.buffs.damage_multiplier(tick, &self.config.buffs);
        let cooldown = spec.cooldown_ticks(player.buffs.fire_rate_multiplier(tick, &self.config.buffs));
        let direction = player.facing.try_normalize().unwrap_or(Vec2::X);
        let origin = player.body.position;

        let projectile = arena.spawn(EntityInner::Projectile(ProjectileComponents {
            body: Body::moving(origin, direction * projectile_speed * multiplier, projectile_radius),
            owner: Owner::Player(source),
            damage,
            profile: AttackProfile::GROUND_RANGED,
        }));
        ctx.emit(MatchEvent::ProjectileFired {
            projectile,
            shooter: source,
            damage,
        });

        if let Some(player) = arena.get_mut(source).and_then(Entity::as_player_mut) {
            player.attack_ready_at = tick + cooldown;
            if player.weapon.consume() {
                let weapon = player.weapon.id().clone();
                debug!(player = %source, weapon = %weapon, tick, "weapon spent");
                ctx.emit(MatchEvent::WeaponSpent {
                    player: source,
                    weapon,
                });
            }
        }
    }

    fn enemy_fire(&self, source: EntityId, direction: Vec2, arena: &mut Arena, ctx: &mut MatchContext) {
        let tick = ctx.tick;
        let Some(enemy) = arena.get_live(source).and_then(Entity::as_enemy) else {
            return;
        };
        let Some(attack) = enemy.archetype.attack else {
            return;
        };
        let Some(spec) = attack.projectile else {
            return;
        };
        let Some(direction) = direction.try_normalize() else {
            return;
        };
        if !enemy.attack_ready(tick) {
            return;
        }

        let origin = enemy.body.position;
        let profile = enemy.archetype.profile;
        let projectile = arena.spawn(EntityInner::Projectile(ProjectileComponents {
            body: Body::moving(origin, direction * spec.speed, spec.radius),
            owner: Owner::Enemy(source),
            damage: attack.damage,
            profile,
        }));
        if let Some(enemy) = arena.get_mut(source).and_then(Entity::as_enemy_mut) {
            enemy.attack_ready_at = tick + attack.cooldown_ticks().max(1);
        }
        ctx.emit(MatchEvent::ProjectileFired {
            projectile,
            shooter: source,
            damage: attack.damage,
        });
    }

    // =========================================================================
    // Contacts
    // =========================================================================

    fn projectile_hits_enemy(
        &self,
        projectile: EntityId,
        enemy: EntityId,
        arena: &mut Arena,
        ctx: &mut MatchContext,
    ) {
        if !arena.is_live(enemy) {
            return;
        }
        let Some(damage) = arena
            .get_live(projectile)
            .and_then(Entity::as_projectile)
            .map(|p| p.damage)
        else {
            return;
        };
        arena.mark_removed(projectile);
        self.damage_enemy(enemy, damage, arena, ctx);
    }

    fn projectile_hits_player(
        &self,
        projectile: EntityId,
        player: EntityId,
        arena: &mut Arena,
        ctx: &mut MatchContext,
    ) {
        let Some((damage, profile)) = arena
            .get_live(projectile)
            .and_then(Entity::as_projectile)
            .map(|p| (p.damage, p.profile))
        else {
            return;
        };
        // An evaded projectile keeps flying.
        if self.hit_player(player, damage, profile, arena, ctx) != HitOutcome::Evaded {
            arena.mark_removed(projectile);
        }
    }

    fn melee_strike(&self, enemy: EntityId, player: EntityId, arena: &mut Arena, ctx: &mut MatchContext) {
        let tick = ctx.tick;
        let Some(attacker) = arena.get_live(enemy).and_then(Entity::as_enemy) else {
            return;
        };
        let Some(attack) = attacker.archetype.attack.filter(|a| a.is_melee()) else {
            return;
        };
        if !attacker.attack_ready(tick) {
            return;
        }
        let profile = attacker.archetype.profile;
        if let Some(attacker) = arena.get_mut(enemy).and_then(Entity::as_enemy_mut) {
            attacker.attack_ready_at = tick + attack.cooldown_ticks().max(1);
        }
        self.hit_player(player, attack.damage, profile, arena, ctx);
    }

    fn collect(&self, pickup: EntityId, player: EntityId, arena: &mut Arena, ctx: &mut MatchContext) {
        let tick = ctx.tick;
        let Some((kind, body)) = arena
            .get_live(pickup)
            .and_then(Entity::as_pickup)
            .map(|p| (p.kind.clone(), p.body))
        else {
            return;
        };
        let Some(holder) = arena.get_mut(player).and_then(Entity::as_player_mut) else {
            return;
        };
        // Contacts are detected before resolution; a respawn may have moved the player.
        if !body.overlaps(&holder.body) {
            trace!(player = %player, pickup = %pickup, tick, "pickup out of reach after respawn");
            return;
        }
        match &kind {
            PickupKind::Weapon(id) => match self.config.weapon(id) {
                Some(spec) => {
                    holder.weapon = WeaponState::from_spec(spec);
                    holder.charge_started = None;
                }
                None => trace!(weapon = %id, "unknown weapon pickup discarded"),
            },
            PickupKind::Buff(buff) => holder.buffs.apply(*buff, tick, &self.config.buffs),
        }
        arena.mark_removed(pickup);
        debug!(player = %player, kind = %kind, tick, "pickup collected");
        ctx.emit(MatchEvent::PickupCollected { player, kind });
    }

    // =========================================================================
    // Damage
    // =========================================================================

    /// Applies damage to an enemy, handling its death.
    ///
    /// Returns `true` if the enemy died from this hit.
    fn damage_enemy(&self, id: EntityId, amount: f32, arena: &mut Arena, ctx: &mut MatchContext) -> bool {
        if !arena.is_live(id) {
            return false;
        }
        let Some(enemy) = arena.get_mut(id).and_then(Entity::as_enemy_mut) else {
            return false;
        };
        if !enemy.take_damage(amount) {
            return false;
        }
        let archetype = enemy.archetype.clone();
        let position = enemy.body.position;
        if !arena.mark_removed(id) {
            return false;
        }
        self.enemy_killed(id, &archetype, position, arena, ctx);
        true
    }

    fn enemy_killed(
        &self,
        id: EntityId,
        archetype: &Archetype,
        position: Vec2,
        arena: &mut Arena,
        ctx: &mut MatchContext,
    ) {
        let points = archetype
            .fixed_points
            .unwrap_or_else(|| self.config.phases.kill_points(ctx.remaining));
        let reason = if archetype.is_boss {
            ScoreReason::BossKilled
        } else if archetype.is_decoy() {
            ScoreReason::DecoyHit
        } else if archetype.fixed_points.is_some() {
            ScoreReason::TargetHit
        } else {
            ScoreReason::EnemyKilled
        };
        ctx.score(points, reason);

        if !archetype.is_decoy() {
            ctx.kills += 1;
            ctx.combo.register_kill(ctx.tick, self.config.combo_window_ticks());
        }
        debug!(
            enemy = %id,
            archetype = %archetype.id,
            points,
            combo = ctx.combo.count,
            tick = ctx.tick,
            "enemy killed"
        );
        ctx.emit(MatchEvent::EnemyKilled {
            enemy: id,
            archetype: archetype.id.clone(),
            points,
        });

        self.scatter_drops(position, arena, ctx);
        self.burst_particles(position, arena, ctx.tick);
    }

    fn scatter_drops(&self, position: Vec2, arena: &mut Arena, ctx: &mut MatchContext) {
        let drops = &self.config.drops;
        if drops.table.is_empty() || ctx.rng.gen::<f32>() >= drops.chance {
            return;
        }
        let low = drops.min_count.min(drops.max_count);
        let high = drops.min_count.max(drops.max_count);
        let count = ctx.rng.gen_range(low..=high);
        let expires_at = ctx.tick + secs_to_ticks(drops.lifetime_secs);
        for _ in 0..count {
            let kind = drops.table[ctx.rng.gen_range(0..drops.table.len())].clone();
            let angle = ctx.rng.gen::<f32>() * TAU;
            let distance = ctx.rng.gen::<f32>() * drops.scatter;
            let spot = arena
                .bounds()
                .clamp_circle(position + Vec2::from_angle(angle) * distance, drops.radius);
            let pickup = arena.spawn(EntityInner::Pickup(PickupComponents {
                body: Body::new(spot, drops.radius),
                kind: kind.clone(),
                expires_at,
            }));
            ctx.emit(MatchEvent::PickupSpawned { pickup, kind });
        }
    }

    fn burst_particles(&self, position: Vec2, arena: &mut Arena, tick: u64) {
        let particles = &self.config.particles;
        if !particles.enabled || particles.per_kill == 0 {
            return;
        }
        let expires_at = tick + secs_to_ticks(particles.lifetime_secs).max(1);
        #[allow(clippy::cast_precision_loss)]
        let step = TAU / particles.per_kill as f32;
        for i in 0..particles.per_kill {
            #[allow(clippy::cast_precision_loss)]
            let velocity = Vec2::from_angle(step * i as f32) * particles.speed;
            arena.spawn(EntityInner::Particle(ParticleComponents::new(
                position, velocity, expires_at,
            )));
        }
    }

    fn hit_player(
        &self,
        id: EntityId,
        damage: f32,
        profile: AttackProfile,
        arena: &mut Arena,
        ctx: &mut MatchContext,
    ) -> HitOutcome {
        let tick = ctx.tick;
        let rules = &self.config.player;
        if !arena.is_live(id) {
            return HitOutcome::Ignored;
        }
        let Some(player) = arena.get_mut(id).and_then(Entity::as_player_mut) else {
            return HitOutcome::Ignored;
        };

        if player.stance.evades(profile) {
            trace!(player = %id, stance = ?player.stance, tick, "attack evaded");
            ctx.emit(MatchEvent::AttackEvaded { player: id });
            return HitOutcome::Evaded;
        }

        let mut damage = damage.max(0.0);
        if !rules.shield_requires_block || player.blocking {
            if let Some(absorption) = player.buffs.absorb(damage, tick) {
                ctx.emit(MatchEvent::ShieldAbsorbed {
                    player: id,
                    amount: absorption.absorbed,
                    remaining: player.buffs.shield_health(tick),
                });
                if absorption.broken {
                    debug!(player = %id, tick, "shield broken");
                    ctx.emit(MatchEvent::ShieldBroken { player: id });
                }
                damage = absorption.overflow;
                if damage <= 0.0 {
                    return HitOutcome::Absorbed;
                }
            }
        }

        if player.is_invulnerable(tick) || damage <= 0.0 {
            return HitOutcome::Ignored;
        }

        let died = player.take_health_damage(damage);
        player.invulnerable_until = tick + 1 + secs_to_ticks(rules.hit_invulnerability_secs);
        ctx.emit(MatchEvent::PlayerHit {
            player: id,
            damage,
            health: player.health,
        });
        if !died {
            return HitOutcome::Damaged;
        }

        let penalty = rules.death_penalty;
        ctx.score(penalty, ScoreReason::PlayerDeath);
        ctx.deaths += 1;
        ctx.combo.reset();
        let invulnerable_until = tick + 1 + secs_to_ticks(rules.respawn_invulnerability_secs);
        player.respawn(self.config.default_weapon.clone(), invulnerable_until);
        debug!(player = %id, penalty, deaths = ctx.deaths, tick, "player died");
        ctx.emit(MatchEvent::PlayerDied { player: id });
        ctx.emit(MatchEvent::PlayerRespawned {
            player: id,
            invulnerable_until,
        });
        HitOutcome::Killed
    }
}

impl Resolver for CombatResolver {
    fn handles(&self) -> &[CommandKind] {
        &[CommandKind::Attack]
    }

    fn resolve(&self, commands: &[&Command], arena: &mut Arena, ctx: &mut MatchContext) {
        for command in commands {
            match **command {
                Command::PlayerSwing { source } => self.swing(source, arena, ctx),
                Command::PlayerShoot { source, multiplier } => {
                    self.shoot(source, multiplier, arena, ctx);
                }
                Command::EnemyFire { source, direction } => {
                    self.enemy_fire(source, direction, arena, ctx);
                }
                Command::SetVelocity { .. } => {}
            }
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
