//! Component structs for each entity kind.
//!
//! Every kind carries a [`Body`] (position, velocity, radius). All hit tests
//! in the engine are circle-circle tests between bodies.

use bitflags::bitflags;
use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::EntityId;
use crate::archetype::Archetype;
use crate::buff::BuffSet;
use crate::pickup::PickupKind;
use crate::weapon::{WeaponId, WeaponState};

// =============================================================================
// Body
// =============================================================================

/// Circular physical body.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Body {
    /// Center position in arena units.
    pub position: Vec2,
    /// Velocity in arena units per second.
    pub velocity: Vec2,
    /// Collision radius.
    pub radius: f32,
}

impl Body {
    /// Creates a stationary body.
    #[must_use]
    pub const fn new(position: Vec2, radius: f32) -> Self {
        Self {
            position,
            velocity: Vec2::ZERO,
            radius,
        }
    }

    /// Creates a moving body.
    #[must_use]
    pub const fn moving(position: Vec2, velocity: Vec2, radius: f32) -> Self {
        Self {
            position,
            velocity,
            radius,
        }
    }

    /// Returns `true` if the two circles overlap.
    ///
    /// Touching circles (distance exactly equal to the sum of radii) do not
    /// overlap.
    #[must_use]
    pub fn overlaps(&self, other: &Body) -> bool {
        let reach = self.radius + other.radius;
        self.position.distance_squared(other.position) < reach * reach
    }

    /// Returns `true` if `other` is within `range` of this body's center,
    /// measured to the edge of `other`.
    #[must_use]
    pub fn reaches(&self, other: &Body, range: f32) -> bool {
        let reach = range + other.radius;
        self.position.distance_squared(other.position) < reach * reach
    }
}

// =============================================================================
// Attack profile and stance
// =============================================================================

bitflags! {
    /// Capability set describing how an attack travels.
    ///
    /// Dodge rules are expressed against these flags rather than against
    /// specific enemy archetypes; see [`Stance::evades`].
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct AttackProfile: u8 {
        /// Swing or contact at ground level.
        const GROUND_MELEE = 0b0001;
        /// Projectile travelling at ground level.
        const GROUND_RANGED = 0b0010;
        /// Attack delivered from the air.
        const AERIAL = 0b0100;
        /// Attack that erupts from below ground.
        const BURROW = 0b1000;
    }
}

impl AttackProfile {
    /// Attacks a crouching player slips under: ground-level, non-burrowing.
    pub const CROUCH_EVADES: Self = Self::GROUND_MELEE.union(Self::GROUND_RANGED);

    /// Attacks an airborne player clears: ground melee and burrowing.
    pub const AIRBORNE_EVADES: Self = Self::GROUND_MELEE.union(Self::BURROW);
}

/// Vertical motion state of a player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stance {
    /// Standing on the ground.
    #[default]
    Grounded,
    /// Mid-jump.
    Airborne,
    /// Ducking.
    Crouched,
}

impl Stance {
    /// Returns `true` if a player in this stance avoids an attack with the
    /// given profile.
    ///
    /// An attack is avoided only when every one of its flags is avoidable in
    /// this stance. Attacks with an empty profile are never avoided.
    ///
    /// ```
    /// use gauntlet_core::entity::{AttackProfile, Stance};
    ///
    /// assert!(Stance::Airborne.evades(AttackProfile::BURROW));
    /// assert!(Stance::Crouched.evades(AttackProfile::GROUND_RANGED));
    /// assert!(!Stance::Crouched.evades(AttackProfile::BURROW));
    /// assert!(!Stance::Airborne.evades(AttackProfile::AERIAL));
    /// assert!(!Stance::Grounded.evades(AttackProfile::GROUND_MELEE));
    /// ```
    #[must_use]
    pub fn evades(self, profile: AttackProfile) -> bool {
        if profile.is_empty() {
            return false;
        }
        match self {
            Self::Grounded => false,
            Self::Crouched => AttackProfile::CROUCH_EVADES.contains(profile),
            Self::Airborne => AttackProfile::AIRBORNE_EVADES.contains(profile),
        }
    }
}

// =============================================================================
// Player
// =============================================================================

/// Components for the player entity.
///
/// Timers are absolute tick indices: a window "until T" is active for every
/// tick `< T`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerComponents {
    /// Physical body.
    pub body: Body,
    /// Current health, always within `[0, max_health]`.
    pub health: f32,
    /// Maximum health.
    pub max_health: f32,
    /// Unit vector the player attacks toward.
    pub facing: Vec2,
    /// Vertical motion state.
    pub stance: Stance,
    /// Equipped weapon.
    pub weapon: WeaponState,
    /// Timed stat modifiers.
    pub buffs: BuffSet,
    /// Damage is ignored for ticks before this one.
    pub invulnerable_until: u64,
    /// Earliest tick the next attack may start.
    pub attack_ready_at: u64,
    /// Tick a charge weapon started charging, if charging.
    pub charge_started: Option<u64>,
    /// Airborne for ticks before this one.
    pub airborne_until: u64,
    /// Dash speed applies for ticks before this one.
    pub dash_until: u64,
    /// Earliest tick the next dash may start.
    pub dash_ready_at: u64,
    /// Block input held this tick.
    pub blocking: bool,
    /// Attack input held on the previous tick (edge detection).
    pub attack_held: bool,
    /// Jump input held on the previous tick.
    pub jump_held: bool,
    /// Special input held on the previous tick.
    pub special_held: bool,
    /// Respawn location.
    pub spawn_point: Vec2,
}

impl PlayerComponents {
    /// Creates a fresh player at its spawn point.
    #[must_use]
    pub fn new(spawn_point: Vec2, radius: f32, max_health: f32, weapon: WeaponId) -> Self {
        Self {
            body: Body::new(spawn_point, radius),
            health: max_health,
            max_health,
            facing: Vec2::X,
            stance: Stance::Grounded,
            weapon: WeaponState::unlimited(weapon),
            buffs: BuffSet::default(),
            invulnerable_until: 0,
            attack_ready_at: 0,
            charge_started: None,
            airborne_until: 0,
            dash_until: 0,
            dash_ready_at: 0,
            blocking: false,
            attack_held: false,
            jump_held: false,
            special_held: false,
            spawn_point,
        }
    }

    /// Returns `true` if damage is ignored on `tick`.
    #[must_use]
    pub fn is_invulnerable(&self, tick: u64) -> bool {
        tick < self.invulnerable_until
    }

    /// Remaining invulnerability in ticks, counted from `tick`.
    #[must_use]
    pub fn invulnerability_remaining(&self, tick: u64) -> u64 {
        self.invulnerable_until.saturating_sub(tick)
    }

    /// Applies raw damage to health, clamped at zero. Returns `true` on death.
    pub fn take_health_damage(&mut self, amount: f32) -> bool {
        self.health = (self.health - amount.max(0.0)).clamp(0.0, self.max_health);
        self.health <= 0.0
    }

    /// Resets the player at the spawn point after a death.
    pub fn respawn(&mut self, default_weapon: WeaponId, invulnerable_until: u64) {
        self.body = Body::new(self.spawn_point, self.body.radius);
        self.health = self.max_health;
        self.weapon = WeaponState::unlimited(default_weapon);
        self.buffs.clear();
        self.invulnerable_until = invulnerable_until;
        self.charge_started = None;
        self.stance = Stance::Grounded;
        self.airborne_until = 0;
        self.dash_until = 0;
    }
}

// =============================================================================
// Enemy
// =============================================================================

/// Components for enemy entities.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnemyComponents {
    /// Physical body.
    pub body: Body,
    /// Current health, never stored below zero.
    pub health: f32,
    /// Maximum health.
    pub max_health: f32,
    /// Template this enemy was spawned from.
    pub archetype: Archetype,
    /// Earliest tick the next attack may fire.
    pub attack_ready_at: u64,
}

impl EnemyComponents {
    /// Spawns an enemy from its archetype.
    #[must_use]
    pub fn from_archetype(archetype: &Archetype, position: Vec2, velocity: Vec2) -> Self {
        Self {
            body: Body::moving(position, velocity, archetype.radius),
            health: archetype.max_health,
            max_health: archetype.max_health,
            archetype: archetype.clone(),
            attack_ready_at: 0,
        }
    }

    /// Returns `true` if this enemy may attack on `tick`.
    #[must_use]
    pub fn attack_ready(&self, tick: u64) -> bool {
        tick >= self.attack_ready_at
    }

    /// Applies damage, clamped at zero. Returns `true` if the enemy died.
    ///
    /// Archetypes that [break on hit](Archetype::breaks_on_hit) die from any
    /// positive amount.
    pub fn take_damage(&mut self, amount: f32) -> bool {
        if amount > 0.0 && self.archetype.breaks_on_hit() {
            self.health = 0.0;
            return true;
        }
        self.health = (self.health - amount.max(0.0)).max(0.0);
        self.health <= 0.0
    }
}

// =============================================================================
// Projectile
// =============================================================================

/// Who fired a projectile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Owner {
    /// Fired by a player; hits enemies.
    Player(EntityId),
    /// Fired by an enemy; hits players.
    Enemy(EntityId),
}

/// Components for projectile entities.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectileComponents {
    /// Physical body.
    pub body: Body,
    /// Shooter.
    pub owner: Owner,
    /// Damage dealt on hit, already scaled by charge and buffs.
    pub damage: f32,
    /// How the projectile travels, for dodge checks.
    pub profile: AttackProfile,
}

// =============================================================================
// Pickup
// =============================================================================

/// Components for pickup entities.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PickupComponents {
    /// Physical body.
    pub body: Body,
    /// What collecting this grants.
    pub kind: PickupKind,
    /// Removed unclaimed on this tick.
    pub expires_at: u64,
}

// =============================================================================
// Particle
// =============================================================================

/// Components for cosmetic particles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParticleComponents {
    /// Physical body (radius is visual only).
    pub body: Body,
    /// Removed on this tick.
    pub expires_at: u64,
}

impl ParticleComponents {
    /// Creates a particle.
    #[must_use]
    pub const fn new(position: Vec2, velocity: Vec2, expires_at: u64) -> Self {
        Self {
            body: Body::moving(position, velocity, 2.0),
            expires_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod body_tests {
        use super::*;

        #[test]
        fn overlapping_circles() {
            let a = Body::new(Vec2::ZERO, 10.0);
            let b = Body::new(Vec2::new(15.0, 0.0), 10.0);
            assert!(a.overlaps(&b));
            assert!(b.overlaps(&a));
        }

        #[test]
        fn touching_circles_do_not_overlap() {
            let a = Body::new(Vec2::ZERO, 10.0);
            let b = Body::new(Vec2::new(20.0, 0.0), 10.0);
            assert!(!a.overlaps(&b));
        }

        #[test]
        fn reach_measures_to_target_edge() {
            let attacker = Body::new(Vec2::ZERO, 5.0);
            let target = Body::new(Vec2::new(30.0, 0.0), 8.0);
            assert!(attacker.reaches(&target, 25.0));
            assert!(!attacker.reaches(&target, 22.0));
        }
    }

    mod stance_tests {
        use super::*;

        #[test]
        fn grounded_evades_nothing() {
            for profile in [
                AttackProfile::GROUND_MELEE,
                AttackProfile::GROUND_RANGED,
                AttackProfile::AERIAL,
                AttackProfile::BURROW,
            ] {
                assert!(!Stance::Grounded.evades(profile));
            }
        }

        #[test]
        fn crouch_evades_ground_level_only() {
            assert!(Stance::Crouched.evades(AttackProfile::GROUND_MELEE));
            assert!(Stance::Crouched.evades(AttackProfile::GROUND_RANGED));
            assert!(!Stance::Crouched.evades(AttackProfile::BURROW));
            assert!(!Stance::Crouched.evades(AttackProfile::AERIAL));
        }

        #[test]
        fn airborne_evades_melee_and_burrow() {
            assert!(Stance::Airborne.evades(AttackProfile::GROUND_MELEE));
            assert!(Stance::Airborne.evades(AttackProfile::BURROW));
            assert!(!Stance::Airborne.evades(AttackProfile::GROUND_RANGED));
            assert!(!Stance::Airborne.evades(AttackProfile::AERIAL));
        }

        #[test]
        fn mixed_profile_needs_every_flag_evadable() {
            let slam = AttackProfile::GROUND_MELEE | AttackProfile::AERIAL;
            assert!(!Stance::Airborne.evades(slam));
            assert!(!Stance::Crouched.evades(slam));
        }

        #[test]
        fn empty_profile_is_never_evaded() {
            assert!(!Stance::Crouched.evades(AttackProfile::empty()));
            assert!(!Stance::Airborne.evades(AttackProfile::empty()));
        }
    }

    mod player_tests {
        use super::*;

        fn player() -> PlayerComponents {
            PlayerComponents::new(Vec2::new(100.0, 100.0), 16.0, 20.0, WeaponId::new("fists"))
        }

        #[test]
        fn health_clamps_at_zero() {
            let mut p = player();
            assert!(p.take_health_damage(50.0));
            assert_eq!(p.health, 0.0);
        }

        #[test]
        fn negative_damage_does_not_heal() {
            let mut p = player();
            p.health = 10.0;
            assert!(!p.take_health_damage(-5.0));
            assert_eq!(p.health, 10.0);
        }

        #[test]
        fn invulnerability_window_is_exclusive() {
            let mut p = player();
            p.invulnerable_until = 10;
            assert!(p.is_invulnerable(9));
            assert!(!p.is_invulnerable(10));
            assert_eq!(p.invulnerability_remaining(4), 6);
            assert_eq!(p.invulnerability_remaining(12), 0);
        }

        #[test]
        fn respawn_restores_defaults() {
            let mut p = player();
            p.body.position = Vec2::new(5.0, 5.0);
            p.health = 0.0;
            p.weapon = WeaponState::limited(WeaponId::new("sword"), 3);
            p.charge_started = Some(4);
            p.respawn(WeaponId::new("fists"), 200);

            assert_eq!(p.body.position, Vec2::new(100.0, 100.0));
            assert_eq!(p.health, p.max_health);
            assert_eq!(p.weapon.id().as_str(), "fists");
            assert_eq!(p.weapon.uses(), None);
            assert_eq!(p.invulnerable_until, 200);
            assert!(p.charge_started.is_none());
        }
    }

    mod enemy_tests {
        use super::*;

        fn enemy(archetype: &Archetype) -> EnemyComponents {
            EnemyComponents::from_archetype(archetype, Vec2::ZERO, Vec2::ZERO)
        }

        #[test]
        fn regular_enemy_loses_health_per_hit() {
            let mut e = enemy(&Archetype::basic());
            assert!(!e.take_damage(0.5));
            assert!((e.health - 1.5).abs() < 1e-6);
            assert!(e.take_damage(5.0));
            assert_eq!(e.health, 0.0);
        }

        #[test]
        fn targets_break_on_any_hit() {
            let mut e = enemy(&Archetype::target("target", 3, 90.0));
            assert!(!e.take_damage(0.0));
            assert!(!e.take_damage(f32::NAN));
            assert!(e.take_damage(0.1));
            assert_eq!(e.health, 0.0);
        }
    }
}
