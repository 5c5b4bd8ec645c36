//! Simulation module with the per-tick stage pipeline.
//!
//! The `Simulation` struct owns one match: its arena, context, lifecycle
//! state machine and every stage. Each call to [`Simulation::step`] runs one
//! fixed 60 Hz tick:
//!
//! 1. **GATE**: nothing happens unless the match is running
//! 2. **CLOCK**: read the externally supplied remaining time; at zero the
//!    match ends and the tick stops here
//! 3. **SPAWN**: enemy and weapon pickup timers
//! 4. **INTENT**: player controller and enemy plugins emit commands
//! 5. **RESOLVE**: physics applies movement, combat applies attacks
//! 6. **CONTACT**: collision detection, then combat applies contacts
//! 7. **BUFFS**: lapsed buffs are retired
//!
//! Removals are flushed between stages, so an entity removed in one stage is
//! never seen by the next.
//!
//! # Determinism
//!
//! Given the same configuration, seed, and per-tick inputs, two simulations
//! produce identical state, events and score deltas:
//! - Entities are iterated in id order (via `BTreeMap`)
//! - Plugins run against a frozen view and are collected in enemy id order
//! - All randomness comes from one seeded `ChaCha8Rng` per match
//!
//! # Example
//!
//! ```
//! use gauntlet_core::config::MatchConfig;
//! use gauntlet_core::input::InputState;
//! use gauntlet_core::simulation::Simulation;
//! use gauntlet_core::state::MatchState;
//!
//! let mut sim = Simulation::new(MatchConfig::arena(), 42);
//! sim.start();
//!
//! for _ in 0..10 {
//!     sim.step(120.0, &InputState::default());
//! }
//! assert_eq!(sim.tick(), 10);
//!
//! sim.step(0.0, &InputState::default());
//! assert_eq!(sim.state(), MatchState::Ended);
//! ```

use std::fmt;
use std::sync::Arc;

use tracing::{info, warn};

use crate::arena::{Arena, Bounds};
use crate::buff::BuffSystem;
use crate::clock::FixedClock;
use crate::config::MatchConfig;
use crate::context::MatchContext;
use crate::control::PlayerController;
use crate::entity::{Entity, EntityId, EntityInner, EntityTag, PlayerComponents};
use crate::error::ConfigError;
use crate::event::{EventRecord, MatchEvent};
use crate::input::InputState;
use crate::output::Command;
use crate::phase::Phase;
use crate::plugin::{PluginContext, PluginRegistry};
use crate::resolver::{dispatch, CollisionResolver, CombatResolver, PhysicsResolver};
use crate::score::{ScoreEvent, ScoreSink};
use crate::spawn::SpawnDirector;
use crate::state::{MatchState, MatchStateMachine};
use crate::telemetry::Telemetry;
use crate::world_view::WorldView;

// =============================================================================
// Simulation
// =============================================================================

/// One match of one game variant.
pub struct Simulation {
    config: Arc<MatchConfig>,
    seed: u64,
    arena: Arena,
    ctx: MatchContext,
    state: MatchStateMachine,
    clock: FixedClock,
    player: EntityId,
    spawner: SpawnDirector,
    controller: PlayerController,
    plugins: PluginRegistry,
    physics: PhysicsResolver,
    combat: CombatResolver,
    collision: CollisionResolver,
    buffs: BuffSystem,
}

impl fmt::Debug for Simulation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Simulation")
            .field("variant", &self.config.variant)
            .field("seed", &self.seed)
            .field("state", &self.state.state())
            .field("tick", &self.ctx.tick)
            .field("entities", &self.arena.entity_count())
            .field("plugins", &self.plugins)
            .finish_non_exhaustive()
    }
}

impl Simulation {
    /// Creates an idle match with the stock enemy behaviors.
    ///
    /// The configuration is trusted as-is; use [`Simulation::try_new`] for
    /// configurations loaded from outside.
    #[must_use]
    pub fn new(config: MatchConfig, seed: u64) -> Self {
        let config = Arc::new(config);
        let mut arena = Arena::new(Bounds::from_size(config.arena.width, config.arena.height));
        let spawn = arena
            .bounds()
            .clamp_circle(config.player.spawn, config.player.radius);
        let player = arena.spawn(EntityInner::Player(PlayerComponents::new(
            spawn,
            config.player.radius,
            config.player.max_health,
            config.default_weapon.clone(),
        )));

        Self {
            spawner: SpawnDirector::new(Arc::clone(&config)),
            combat: CombatResolver::new(Arc::clone(&config)),
            config,
            seed,
            arena,
            ctx: MatchContext::new(seed, 0.0),
            state: MatchStateMachine::new(),
            clock: FixedClock::new(),
            player,
            controller: PlayerController::new(),
            plugins: PluginRegistry::default_bundles(),
            physics: PhysicsResolver::new(),
            collision: CollisionResolver::new(),
            buffs: BuffSystem::new(),
        }
    }

    /// Validates `config`, then creates an idle match.
    ///
    /// # Errors
    ///
    /// Returns the first configuration constraint violated.
    pub fn try_new(config: MatchConfig, seed: u64) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::new(config, seed))
    }

    /// Moves the match from `Idle` to `Running`.
    ///
    /// Returns `false` if the match was not idle.
    pub fn start(&mut self) -> bool {
        let Some((from, to)) = self.state.start() else {
            return false;
        };
        info!(variant = %self.config.variant, seed = self.seed, "match started");
        self.ctx.emit(MatchEvent::StateChanged { from, to });
        true
    }

    /// Runs one fixed tick.
    ///
    /// `remaining_secs` is the externally owned match clock. A non-finite
    /// reading is ignored and a negative one counts as zero.
    pub fn step(&mut self, remaining_secs: f32, input: &InputState) {
        if !self.state.is_running() {
            return;
        }
        if remaining_secs.is_finite() {
            self.ctx.remaining = remaining_secs.max(0.0);
        }
        if let Some((from, to)) = self.state.observe_remaining(self.ctx.remaining) {
            info!(
                tick = self.ctx.tick,
                score = self.ctx.ledger.total(),
                kills = self.ctx.kills,
                deaths = self.ctx.deaths,
                "match ended"
            );
            self.ctx.emit(MatchEvent::StateChanged { from, to });
            return;
        }

        self.spawner.step(&mut self.arena, &mut self.ctx);

        let input = input.sanitized();
        let mut commands = self.controller.apply(
            &mut self.arena,
            self.player,
            &input,
            &self.config,
            &mut self.ctx,
        );
        commands.extend(self.plugin_commands());

        dispatch(&self.physics, &commands, &mut self.arena, &mut self.ctx);
        dispatch(&self.combat, &commands, &mut self.arena, &mut self.ctx);
        self.arena.flush_removals();

        let contacts = self.collision.detect(&self.arena);
        self.combat
            .resolve_contacts(&contacts, &mut self.arena, &mut self.ctx);
        self.arena.flush_removals();

        self.buffs.reconcile(&mut self.arena, &mut self.ctx);
        self.ctx.tick += 1;
    }

    /// Feeds `frame_secs` of host time through the fixed clock and runs the
    /// resulting number of ticks. Returns how many ran.
    pub fn advance(&mut self, frame_secs: f32, remaining_secs: f32, input: &InputState) -> u32 {
        let steps = self.clock.consume(frame_secs);
        for _ in 0..steps {
            self.step(remaining_secs, input);
        }
        steps
    }

    /// Runs every enemy's plugins against a frozen view of the arena.
    fn plugin_commands(&self) -> Vec<Command> {
        let tick = self.ctx.tick;
        let mut commands = Vec::new();
        for entity in self.arena.live_with_tag(EntityTag::Enemy) {
            let Some(enemy) = entity.as_enemy() else {
                continue;
            };
            let ctx = PluginContext {
                entity_id: entity.id(),
                tick,
            };
            for plugin in self.plugins.plugins_for(enemy.archetype.behavior) {
                let decl = plugin.declaration();
                let view = WorldView::new(&self.arena, &decl.reads, tick);
                for command in plugin.run(&ctx, &view) {
                    if !decl.emits_command(command.kind()) || command.source() != entity.id() {
                        warn!(plugin = %decl.id, enemy = %entity.id(), ?command, "undeclared command dropped");
                        continue;
                    }
                    commands.push(command);
                }
            }
        }
        commands
    }

    // =========================================================================
    // Output
    // =========================================================================

    /// Snapshot of the continuous match output.
    #[must_use]
    pub fn telemetry(&self) -> Telemetry {
        Telemetry::capture(self.state(), self.phase(), &self.arena, &self.ctx)
    }

    /// Drains events recorded since the last call.
    pub fn drain_events(&mut self) -> Vec<EventRecord> {
        self.ctx.events.take()
    }

    /// Drains score deltas recorded since the last call while no sink was
    /// installed.
    pub fn drain_score_events(&mut self) -> Vec<ScoreEvent> {
        self.ctx.ledger.drain()
    }

    /// Installs a receiver that sees every score delta as it is recorded.
    /// Deltas delivered to the sink are not queued for
    /// [`drain_score_events`](Self::drain_score_events).
    pub fn set_score_sink<S: ScoreSink + 'static>(&mut self, sink: S) {
        self.ctx.ledger.set_sink(Box::new(sink));
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Lifecycle state.
    #[must_use]
    pub fn state(&self) -> MatchState {
        self.state.state()
    }

    /// Difficulty phase for the last remaining-time reading.
    #[must_use]
    pub fn phase(&self) -> Phase {
        self.config.phases.phase_at(self.ctx.remaining)
    }

    /// Index of the next tick to run.
    #[must_use]
    pub fn tick(&self) -> u64 {
        self.ctx.tick
    }

    /// Display score.
    #[must_use]
    pub fn score(&self) -> i64 {
        self.ctx.ledger.total()
    }

    /// Master seed.
    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Configuration in use.
    #[must_use]
    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    /// Counters, combo and ledger.
    #[must_use]
    pub fn context(&self) -> &MatchContext {
        &self.ctx
    }

    /// Read-only arena.
    #[must_use]
    pub fn arena(&self) -> &Arena {
        &self.arena
    }

    /// Mutable arena, for scenario setup between ticks.
    #[must_use]
    pub fn arena_mut(&mut self) -> &mut Arena {
        &mut self.arena
    }

    /// Id of the player entity.
    #[must_use]
    pub fn player_id(&self) -> EntityId {
        self.player
    }

    /// The player.
    #[must_use]
    pub fn player(&self) -> Option<&PlayerComponents> {
        self.arena.get(self.player).and_then(Entity::as_player)
    }

    /// Mutable player, for scenario setup between ticks.
    #[must_use]
    pub fn player_mut(&mut self) -> Option<&mut PlayerComponents> {
        self.arena.get_mut(self.player).and_then(Entity::as_player_mut)
    }

    /// Mutable plugin registry, for custom enemy behaviors.
    #[must_use]
    pub fn plugins_mut(&mut self) -> &mut PluginRegistry {
        &mut self.plugins
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn idle() -> InputState {
        InputState::default()
    }

    mod lifecycle_tests {
        use super::*;

        #[test]
        fn idle_match_ignores_steps() {
            let mut sim = Simulation::new(MatchConfig::arena(), 1);
            sim.step(120.0, &idle());
            assert_eq!(sim.tick(), 0);
            assert_eq!(sim.state(), MatchState::Idle);
            assert!(sim.drain_events().is_empty());
        }

        #[test]
        fn start_is_one_shot() {
            let mut sim = Simulation::new(MatchConfig::arena(), 1);
            assert!(sim.start());
            assert!(!sim.start());
            let events = sim.drain_events();
            assert_eq!(events.len(), 1);
            assert_eq!(
                events[0].event,
                MatchEvent::StateChanged {
                    from: MatchState::Idle,
                    to: MatchState::Running
                }
            );
        }

        #[test]
        fn ended_match_never_mutates() {
            let mut sim = Simulation::new(MatchConfig::arena(), 1);
            sim.start();
            for _ in 0..30 {
                sim.step(100.0, &idle());
            }
            sim.step(0.0, &idle());
            assert_eq!(sim.state(), MatchState::Ended);
            sim.drain_events();
            let before = serde_json::to_string(sim.arena()).unwrap();
            let tick = sim.tick();

            for _ in 0..30 {
                sim.step(100.0, &idle());
            }
            assert_eq!(sim.tick(), tick);
            assert_eq!(serde_json::to_string(sim.arena()).unwrap(), before);
            assert!(sim.drain_events().is_empty());
            assert!(!sim.start());
        }

        #[test]
        fn negative_remaining_ends_and_nan_is_ignored() {
            let mut sim = Simulation::new(MatchConfig::arena(), 1);
            sim.start();
            sim.step(50.0, &idle());
            sim.step(f32::NAN, &idle());
            assert_eq!(sim.state(), MatchState::Running);
            assert!((sim.context().remaining - 50.0).abs() < 1e-6);
            sim.step(-3.0, &idle());
            assert_eq!(sim.state(), MatchState::Ended);
            assert!(sim.context().remaining.abs() < 1e-6);
        }

        #[test]
        fn try_new_rejects_invalid_config() {
            let mut config = MatchConfig::arena();
            config.roster.clear();
            assert!(matches!(
                Simulation::try_new(config, 1),
                Err(ConfigError::EmptyRoster)
            ));
        }
    }

    mod clock_tests {
        use super::*;

        #[test]
        fn advance_runs_whole_ticks() {
            let mut sim = Simulation::new(MatchConfig::arena(), 1);
            sim.start();
            assert_eq!(sim.advance(1.0 / 30.0, 100.0, &idle()), 2);
            assert_eq!(sim.tick(), 2);
            assert_eq!(sim.advance(1.0, 100.0, &idle()), 8);
            assert_eq!(sim.tick(), 10);
        }
    }

    mod output_tests {
        use super::*;
        use std::sync::{Arc, Mutex};

        #[test]
        fn score_sink_receives_deltas() {
            let mut sim = Simulation::new(MatchConfig::arena(), 1);
            let seen = Arc::new(Mutex::new(Vec::new()));
            let sink = Arc::clone(&seen);
            sim.set_score_sink(move |event: &ScoreEvent| {
                sink.lock().unwrap().push(event.delta);
            });
            sim.start();
            sim.player_mut().unwrap().health = 1.0;

            // Lethal hit from a basic enemy standing on the player.
            let position = sim.player().unwrap().body.position;
            sim.arena_mut().spawn(EntityInner::Enemy(
                crate::entity::EnemyComponents::from_archetype(
                    &crate::archetype::Archetype::basic(),
                    position,
                    glam::Vec2::ZERO,
                ),
            ));
            sim.step(100.0, &idle());

            assert_eq!(*seen.lock().unwrap(), vec![-5]);
            assert!(sim.drain_score_events().is_empty());
            assert_eq!(sim.score(), 0);
        }

        #[test]
        fn telemetry_tracks_state() {
            let mut sim = Simulation::new(MatchConfig::shooter(), 1);
            sim.start();
            sim.step(30.0, &idle());
            let snapshot = sim.telemetry();
            assert_eq!(snapshot.state, MatchState::Running);
            assert_eq!(snapshot.phase, Phase::Late);
            assert_eq!(snapshot.tick, 1);
            assert_eq!(snapshot.player.unwrap().weapon.as_str(), "pistol");
        }
    }
}
