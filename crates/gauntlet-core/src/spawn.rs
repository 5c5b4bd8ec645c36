//! Enemy and weapon pickup spawning.
//!
//! The [`SpawnDirector`] runs once per tick before any movement. It owns the
//! two spawn clocks:
//!
//! - **Enemies**: at most one per tick, rejected while the live population
//!   is at the phase cap or the phase interval has not elapsed since the last
//!   successful spawn. The late phase may roll the boss if none is alive.
//! - **Weapon pickups**: a fixed-interval timer independent of phase. A
//!   firing that finds the cap reached is skipped, not queued.
//!
//! All randomness comes from [`MatchContext::rng`].

use std::fmt;
use std::sync::Arc;

use glam::Vec2;
use rand::Rng;
use tracing::{debug, trace};

use crate::archetype::{Archetype, Behavior};
use crate::arena::{Arena, Bounds};
use crate::clock::secs_to_ticks;
use crate::config::MatchConfig;
use crate::context::MatchContext;
use crate::entity::{Body, EnemyComponents, EntityId, EntityInner, EntityTag, PickupComponents};
use crate::event::MatchEvent;
use crate::phase::Phase;
use crate::pickup::PickupKind;

/// Why an enemy spawn attempt did nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpawnRejection {
    /// The live population is at the phase cap.
    PopulationCap {
        /// Live enemies.
        live: usize,
        /// Phase cap.
        cap: usize,
    },
    /// The phase interval has not elapsed since the last spawn.
    Interval {
        /// First tick a spawn is allowed.
        ready_at: u64,
    },
    /// Nothing in the roster can be spawned.
    NoCandidate,
}

impl fmt::Display for SpawnRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PopulationCap { live, cap } => write!(f, "population cap {live}/{cap}"),
            Self::Interval { ready_at } => write!(f, "interval until tick {ready_at}"),
            Self::NoCandidate => write!(f, "no spawnable archetype"),
        }
    }
}

/// Per-match spawn clocks.
#[derive(Debug, Clone)]
pub struct SpawnDirector {
    config: Arc<MatchConfig>,
    last_enemy_spawn: Option<u64>,
    next_weapon_at: u64,
}

impl SpawnDirector {
    /// Creates a director whose timers start at tick 0.
    #[must_use]
    pub fn new(config: Arc<MatchConfig>) -> Self {
        let next_weapon_at = secs_to_ticks(config.weapon_pickups.interval_secs).max(1);
        Self {
            config,
            last_enemy_spawn: None,
            next_weapon_at,
        }
    }

    /// Tick of the last successful enemy spawn.
    #[must_use]
    pub fn last_enemy_spawn(&self) -> Option<u64> {
        self.last_enemy_spawn
    }

    /// Tick the weapon pickup timer fires next.
    #[must_use]
    pub fn next_weapon_at(&self) -> u64 {
        self.next_weapon_at
    }

    /// Runs both spawn clocks for the current tick.
    pub fn step(&mut self, arena: &mut Arena, ctx: &mut MatchContext) {
        if let Err(rejection) = self.try_spawn_enemy(arena, ctx) {
            trace!(tick = ctx.tick, %rejection, "enemy spawn skipped");
        }
        self.tick_weapon_timer(arena, ctx);
    }

    /// Attempts one enemy spawn.
    ///
    /// # Errors
    ///
    /// Returns the reason the attempt was rejected. Rejections are routine
    /// and never surface beyond a trace log.
    pub fn try_spawn_enemy(
        &mut self,
        arena: &mut Arena,
        ctx: &mut MatchContext,
    ) -> Result<EntityId, SpawnRejection> {
        let tick = ctx.tick;
        let phases = &self.config.phases;
        let phase = phases.phase_at(ctx.remaining);
        let params = phases.params(phase);

        let live = arena.live_count(EntityTag::Enemy);
        if live >= params.max_enemies {
            return Err(SpawnRejection::PopulationCap {
                live,
                cap: params.max_enemies,
            });
        }
        if let Some(last) = self.last_enemy_spawn {
            let ready_at = last + params.spawn_interval_ticks();
            if tick < ready_at {
                return Err(SpawnRejection::Interval { ready_at });
            }
        }

        let archetype = self
            .choose_archetype(phase, arena, ctx)
            .ok_or(SpawnRejection::NoCandidate)?
            .clone();
        let (position, velocity) = entry_point(&archetype, arena.bounds(), ctx);
        let enemy = arena.spawn(EntityInner::Enemy(EnemyComponents::from_archetype(
            &archetype, position, velocity,
        )));
        self.last_enemy_spawn = Some(tick);

        debug!(enemy = %enemy, archetype = %archetype.id, %phase, tick, "enemy spawned");
        ctx.emit(MatchEvent::EnemySpawned {
            enemy,
            archetype: archetype.id,
            position,
        });
        Ok(enemy)
    }

    fn choose_archetype(&self, phase: Phase, arena: &Arena, ctx: &mut MatchContext) -> Option<&Archetype> {
        let boss_chance = self.config.phases.boss_chance(phase);
        if boss_chance > 0.0 && !arena.boss_alive() {
            if let Some(boss) = self.config.boss() {
                if ctx.rng.gen::<f32>() < boss_chance {
                    return Some(boss);
                }
            }
        }
        let regulars: Vec<&Archetype> = self.config.regulars().collect();
        if regulars.is_empty() {
            return None;
        }
        Some(regulars[ctx.rng.gen_range(0..regulars.len())])
    }

    /// Fires the weapon pickup timer if it is due.
    ///
    /// Returns the new pickup, if one spawned.
    pub fn tick_weapon_timer(&mut self, arena: &mut Arena, ctx: &mut MatchContext) -> Option<EntityId> {
        let timer = &self.config.weapon_pickups;
        if !timer.is_enabled() || ctx.tick < self.next_weapon_at {
            return None;
        }
        self.next_weapon_at = ctx.tick + secs_to_ticks(timer.interval_secs).max(1);

        let present = arena.live_weapon_pickups();
        if present >= timer.max_present {
            trace!(tick = ctx.tick, present, "weapon pickup skipped");
            return None;
        }

        let weapon = timer.weapons[ctx.rng.gen_range(0..timer.weapons.len())].clone();
        let drops = &self.config.drops;
        let bounds = *arena.bounds();
        let spot = bounds.clamp_circle(
            bounds.min + bounds.size() * Vec2::new(ctx.rng.gen::<f32>(), ctx.rng.gen::<f32>()),
            drops.radius,
        );
        let kind = PickupKind::Weapon(weapon);
        let pickup = arena.spawn(EntityInner::Pickup(PickupComponents {
            body: Body::new(spot, drops.radius),
            kind: kind.clone(),
            expires_at: ctx.tick + secs_to_ticks(drops.lifetime_secs),
        }));
        debug!(pickup = %pickup, kind = %kind, tick = ctx.tick, "weapon pickup spawned");
        ctx.emit(MatchEvent::PickupSpawned { pickup, kind });
        Some(pickup)
    }
}

/// Position and initial velocity for a new enemy.
///
/// Drifting targets enter at the left edge heading right; everything else
/// appears on a random edge, standing still until its plugin moves it.
fn entry_point(archetype: &Archetype, bounds: &Bounds, ctx: &mut MatchContext) -> (Vec2, Vec2) {
    let r = archetype.radius;
    let lo = bounds.min + Vec2::splat(r);
    let hi = (bounds.max - Vec2::splat(r)).max(lo);
    let along = |t: f32, a: f32, b: f32| a + (b - a) * t;

    if archetype.behavior == Behavior::Drift {
        let y = along(ctx.rng.gen::<f32>(), lo.y, hi.y);
        return (Vec2::new(bounds.min.x, y), Vec2::X * archetype.speed);
    }

    let t = ctx.rng.gen::<f32>();
    let position = match ctx.rng.gen_range(0..4) {
        0 => Vec2::new(along(t, lo.x, hi.x), bounds.min.y),
        1 => Vec2::new(along(t, lo.x, hi.x), bounds.max.y),
        2 => Vec2::new(bounds.min.x, along(t, lo.y, hi.y)),
        _ => Vec2::new(bounds.max.x, along(t, lo.y, hi.y)),
    };
    (position, Vec2::ZERO)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::phase::PhaseTable;

    fn director(config: MatchConfig) -> (SpawnDirector, Arena) {
        let arena = Arena::new(Bounds::from_size(config.arena.width, config.arena.height));
        (SpawnDirector::new(Arc::new(config)), arena)
    }

    mod enemy_tests {
        use super::*;

        #[test]
        fn first_spawn_is_immediate_then_interval_applies() {
            let (mut director, mut arena) = director(MatchConfig::arena());
            let mut ctx = MatchContext::new(1, 120.0);
            assert!(director.try_spawn_enemy(&mut arena, &mut ctx).is_ok());

            let interval = PhaseTable::default().early.spawn_interval_ticks();
            ctx.tick = interval - 1;
            assert_eq!(
                director.try_spawn_enemy(&mut arena, &mut ctx),
                Err(SpawnRejection::Interval { ready_at: interval })
            );
            ctx.tick = interval;
            assert!(director.try_spawn_enemy(&mut arena, &mut ctx).is_ok());
        }

        #[test]
        fn population_cap_rejects() {
            let (mut director, mut arena) = director(MatchConfig::arena());
            let mut ctx = MatchContext::new(1, 120.0);
            let cap = director.config.phases.early.max_enemies;
            for _ in 0..cap {
                arena.spawn(EntityInner::Enemy(EnemyComponents::from_archetype(
                    &Archetype::basic(),
                    Vec2::new(100.0, 100.0),
                    Vec2::ZERO,
                )));
            }
            assert_eq!(
                director.try_spawn_enemy(&mut arena, &mut ctx),
                Err(SpawnRejection::PopulationCap { live: cap, cap })
            );
        }

        #[test]
        fn early_phase_never_spawns_boss() {
            let mut config = MatchConfig::shooter();
            config.phases.early.max_enemies = 1000;
            config.phases.late.max_enemies = 1000;
            let (mut director, mut arena) = director(config);
            let mut ctx = MatchContext::new(3, 120.0);
            for tick in 0..5000 {
                ctx.tick = tick;
                director.step(&mut arena, &mut ctx);
            }
            assert!(!arena.boss_alive());
        }

        #[test]
        fn late_phase_spawns_at_most_one_boss() {
            let mut config = MatchConfig::shooter();
            config.phases.late.max_enemies = 1000;
            config.phases.late.boss_chance = 1.0;
            let (mut director, mut arena) = director(config);
            let mut ctx = MatchContext::new(3, 30.0);
            for tick in 0..2000 {
                ctx.tick = tick;
                director.step(&mut arena, &mut ctx);
            }
            let bosses = arena
                .live_with_tag(EntityTag::Enemy)
                .filter_map(crate::entity::Entity::as_enemy)
                .filter(|e| e.archetype.is_boss)
                .count();
            assert_eq!(bosses, 1);
            assert!(arena.live_count(EntityTag::Enemy) > 1);
        }

        #[test]
        fn drift_targets_enter_from_the_left() {
            let (mut director, mut arena) = director(MatchConfig::throw());
            let mut ctx = MatchContext::new(9, 120.0);
            let id = director.try_spawn_enemy(&mut arena, &mut ctx).unwrap();
            let enemy = arena.get(id).and_then(crate::entity::Entity::as_enemy).unwrap();
            assert!(enemy.body.position.x.abs() < f32::EPSILON);
            assert!(enemy.body.velocity.x > 0.0);
        }

        #[test]
        fn spawns_record_events() {
            let (mut director, mut arena) = director(MatchConfig::arena());
            let mut ctx = MatchContext::new(1, 120.0);
            let id = director.try_spawn_enemy(&mut arena, &mut ctx).unwrap();
            assert!(matches!(
                ctx.events.records()[0].event,
                MatchEvent::EnemySpawned { enemy, .. } if enemy == id
            ));
        }
    }

    mod weapon_timer_tests {
        use super::*;

        #[test]
        fn timer_respects_cap_and_skips() {
            let (mut director, mut arena) = director(MatchConfig::arena());
            let mut ctx = MatchContext::new(5, 120.0);
            let interval = secs_to_ticks(director.config.weapon_pickups.interval_secs);

            let mut spawned = 0;
            for tick in 0..interval * 5 {
                ctx.tick = tick;
                if director.tick_weapon_timer(&mut arena, &mut ctx).is_some() {
                    spawned += 1;
                }
                assert!(arena.live_weapon_pickups() <= 2);
            }
            assert_eq!(spawned, 2);
            // Skipped firings still advance the timer.
            assert_eq!(director.next_weapon_at(), interval * 5);
        }

        #[test]
        fn disabled_timer_never_fires() {
            let (mut director, mut arena) = director(MatchConfig::throw());
            let mut ctx = MatchContext::new(5, 120.0);
            for tick in 0..10_000 {
                ctx.tick = tick;
                assert!(director.tick_weapon_timer(&mut arena, &mut ctx).is_none());
            }
        }
    }
}
