//! Match configuration.
//!
//! The three games share one engine and differ only in a [`MatchConfig`].
//! [`MatchConfig::preset`] returns the tuning for each [`Variant`];
//! [`MatchConfig::from_json`] loads a custom document and validates it.
//!
//! All durations are in seconds and are converted to whole ticks where they
//! are used.
//!
//! # Example
//!
//! ```
//! use gauntlet_core::config::{MatchConfig, Variant};
//!
//! let config = MatchConfig::preset(Variant::Shooter);
//! assert_eq!(config.player.death_penalty, -6);
//! assert!(config.validate().is_ok());
//!
//! let json = serde_json::to_string(&config).unwrap();
//! let loaded = MatchConfig::from_json(&json).unwrap();
//! assert_eq!(loaded, config);
//! ```

use std::fmt;
use std::str::FromStr;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::archetype::Archetype;
use crate::buff::{BuffConfig, BuffKind};
use crate::clock::secs_to_ticks;
use crate::error::ConfigError;
use crate::phase::{PhaseParams, PhaseTable};
use crate::pickup::{DropConfig, PickupKind, WeaponPickupConfig, MAX_WEAPON_PICKUPS};
use crate::weapon::{ChargeSpec, WeaponId, WeaponKind, WeaponSpec};

/// Which of the three games a configuration describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Variant {
    /// Side-on melee/ranged combat arena with jump and crouch.
    Arena,
    /// Top-down twin-stick survival shooter.
    Shooter,
    /// Charge-and-throw at drifting targets.
    Throw,
}

impl Variant {
    /// Every variant.
    pub const ALL: [Self; 3] = [Self::Arena, Self::Shooter, Self::Throw];

    /// Stable lowercase name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Arena => "arena",
            Self::Shooter => "shooter",
            Self::Throw => "throw",
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Variant {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|v| v.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown variant `{s}` (expected arena, shooter or throw)"))
    }
}

// =============================================================================
// Sections
// =============================================================================

/// Playable area, anchored at the origin.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ArenaConfig {
    /// Width in arena units.
    pub width: f32,
    /// Height in arena units.
    pub height: f32,
}

/// Dash burst bound to the special input.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DashConfig {
    /// Speed multiplier while dashing.
    pub multiplier: f32,
    /// Length of the burst.
    pub duration_secs: f32,
    /// Time from dash start until the next dash.
    pub cooldown_secs: f32,
}

/// Player tuning.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlayerConfig {
    /// Collision radius.
    pub radius: f32,
    /// Maximum health.
    pub max_health: f32,
    /// Base movement speed in arena units per second.
    pub speed: f32,
    /// Spawn and respawn location.
    pub spawn: Vec2,
    /// Jump and crouch are available.
    pub vertical_motion: bool,
    /// Airtime of a jump.
    pub jump_secs: f32,
    /// Speed factor while crouched.
    pub crouch_speed_factor: f32,
    /// Invulnerability after taking a hit.
    pub hit_invulnerability_secs: f32,
    /// Invulnerability after respawning.
    pub respawn_invulnerability_secs: f32,
    /// Score delta on death (negative).
    pub death_penalty: i32,
    /// Shield absorbs only while the block input is held.
    pub shield_requires_block: bool,
    /// Dash on the special input, if any.
    pub dash: Option<DashConfig>,
}

/// Cosmetic particle bursts on enemy death.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParticleConfig {
    /// Emit particles at all.
    pub enabled: bool,
    /// Particles per kill.
    pub per_kill: u32,
    /// Particle lifetime.
    pub lifetime_secs: f32,
    /// Initial particle speed.
    pub speed: f32,
}

impl Default for ParticleConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            per_kill: 6,
            lifetime_secs: 0.5,
            speed: 120.0,
        }
    }
}

// =============================================================================
// MatchConfig
// =============================================================================

/// Complete tuning for one match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchConfig {
    /// Game this configuration describes.
    pub variant: Variant,
    /// Playable area.
    pub arena: ArenaConfig,
    /// Player tuning.
    pub player: PlayerConfig,
    /// Difficulty phases.
    pub phases: PhaseTable,
    /// Spawnable archetypes. At most one may be a boss.
    pub roster: Vec<Archetype>,
    /// Weapon definitions.
    pub weapons: Vec<WeaponSpec>,
    /// Weapon held at spawn and after a spent weapon reverts.
    pub default_weapon: WeaponId,
    /// Buff tuning.
    pub buffs: BuffConfig,
    /// Loot on enemy death.
    pub drops: DropConfig,
    /// Timed weapon pickups.
    pub weapon_pickups: WeaponPickupConfig,
    /// Kills within this many seconds of the previous one extend the combo.
    pub combo_window_secs: f32,
    /// Cosmetic particles.
    #[serde(default)]
    pub particles: ParticleConfig,
}

impl MatchConfig {
    /// Tuning for `variant`.
    #[must_use]
    pub fn preset(variant: Variant) -> Self {
        match variant {
            Variant::Arena => Self::arena(),
            Variant::Shooter => Self::shooter(),
            Variant::Throw => Self::throw(),
        }
    }

    /// Side-on combat arena.
    #[must_use]
    pub fn arena() -> Self {
        let boss_points = 15;
        Self {
            variant: Variant::Arena,
            arena: ArenaConfig {
                width: 960.0,
                height: 540.0,
            },
            player: PlayerConfig {
                radius: 16.0,
                max_health: 20.0,
                speed: 180.0,
                spawn: Vec2::new(480.0, 270.0),
                vertical_motion: true,
                jump_secs: 0.6,
                crouch_speed_factor: 0.5,
                hit_invulnerability_secs: 1.0,
                respawn_invulnerability_secs: 3.0,
                death_penalty: -5,
                shield_requires_block: true,
                dash: None,
            },
            phases: PhaseTable::default(),
            roster: vec![
                Archetype::basic(),
                Archetype::archer(),
                Archetype::bat(),
                Archetype::mole(),
                Archetype::boss(boss_points),
            ],
            weapons: vec![
                WeaponSpec {
                    id: WeaponId::new("fists"),
                    damage: 1.0,
                    cooldown_secs: 0.35,
                    uses: None,
                    kind: WeaponKind::Melee { range: 40.0 },
                },
                WeaponSpec {
                    id: WeaponId::new("sword"),
                    damage: 3.0,
                    cooldown_secs: 0.45,
                    uses: Some(15),
                    kind: WeaponKind::Melee { range: 56.0 },
                },
                WeaponSpec {
                    id: WeaponId::new("bow"),
                    damage: 4.0,
                    cooldown_secs: 0.3,
                    uses: Some(10),
                    kind: WeaponKind::Ranged {
                        projectile_speed: 420.0,
                        projectile_radius: 5.0,
                        charge: Some(ChargeSpec {
                            duration_secs: 1.0,
                            min_fraction: 0.25,
                            min_multiplier: 0.5,
                            max_multiplier: 1.5,
                        }),
                    },
                },
            ],
            default_weapon: WeaponId::new("fists"),
            buffs: BuffConfig::default(),
            drops: DropConfig {
                chance: 0.35,
                min_count: 2,
                max_count: 4,
                table: vec![
                    PickupKind::Weapon(WeaponId::new("sword")),
                    PickupKind::Weapon(WeaponId::new("bow")),
                    PickupKind::Buff(BuffKind::Damage),
                    PickupKind::Buff(BuffKind::Speed),
                    PickupKind::Buff(BuffKind::RapidFire),
                    PickupKind::Buff(BuffKind::Shield),
                ],
                scatter: 40.0,
                lifetime_secs: 10.0,
                radius: 12.0,
            },
            weapon_pickups: WeaponPickupConfig {
                interval_secs: 12.0,
                max_present: 2,
                weapons: vec![WeaponId::new("sword"), WeaponId::new("bow")],
            },
            combo_window_secs: 5.0,
            particles: ParticleConfig::default(),
        }
    }

    /// Twin-stick survival shooter.
    #[must_use]
    pub fn shooter() -> Self {
        let boss_points = 15;
        Self {
            variant: Variant::Shooter,
            arena: ArenaConfig {
                width: 1024.0,
                height: 768.0,
            },
            player: PlayerConfig {
                radius: 14.0,
                max_health: 20.0,
                speed: 200.0,
                spawn: Vec2::new(512.0, 384.0),
                vertical_motion: false,
                jump_secs: 0.0,
                crouch_speed_factor: 1.0,
                hit_invulnerability_secs: 1.0,
                respawn_invulnerability_secs: 3.0,
                death_penalty: -6,
                shield_requires_block: false,
                dash: Some(DashConfig {
                    multiplier: 2.5,
                    duration_secs: 0.2,
                    cooldown_secs: 1.5,
                }),
            },
            phases: PhaseTable {
                threshold_secs: 60.0,
                early: PhaseParams {
                    max_enemies: 6,
                    spawn_interval_secs: 2.0,
                    kill_points: 2,
                    boss_chance: 0.0,
                },
                late: PhaseParams {
                    max_enemies: 12,
                    spawn_interval_secs: 1.0,
                    kill_points: 3,
                    boss_chance: 0.1,
                },
            },
            roster: vec![
                Archetype::basic(),
                Archetype::archer(),
                Archetype::boss(boss_points),
            ],
            weapons: vec![
                WeaponSpec {
                    id: WeaponId::new("pistol"),
                    damage: 1.0,
                    cooldown_secs: 0.3,
                    uses: None,
                    kind: WeaponKind::Ranged {
                        projectile_speed: 480.0,
                        projectile_radius: 4.0,
                        charge: None,
                    },
                },
                WeaponSpec {
                    id: WeaponId::new("rifle"),
                    damage: 1.0,
                    cooldown_secs: 0.1,
                    uses: Some(60),
                    kind: WeaponKind::Ranged {
                        projectile_speed: 600.0,
                        projectile_radius: 3.0,
                        charge: None,
                    },
                },
                WeaponSpec {
                    id: WeaponId::new("cannon"),
                    damage: 6.0,
                    cooldown_secs: 0.8,
                    uses: Some(8),
                    kind: WeaponKind::Ranged {
                        projectile_speed: 320.0,
                        projectile_radius: 9.0,
                        charge: None,
                    },
                },
            ],
            default_weapon: WeaponId::new("pistol"),
            buffs: BuffConfig::default(),
            drops: DropConfig {
                chance: 0.3,
                min_count: 2,
                max_count: 4,
                table: vec![
                    PickupKind::Weapon(WeaponId::new("rifle")),
                    PickupKind::Weapon(WeaponId::new("cannon")),
                    PickupKind::Buff(BuffKind::Damage),
                    PickupKind::Buff(BuffKind::Speed),
                    PickupKind::Buff(BuffKind::RapidFire),
                    PickupKind::Buff(BuffKind::Shield),
                ],
                scatter: 40.0,
                lifetime_secs: 10.0,
                radius: 12.0,
            },
            weapon_pickups: WeaponPickupConfig {
                interval_secs: 10.0,
                max_present: 2,
                weapons: vec![WeaponId::new("rifle"), WeaponId::new("cannon")],
            },
            combo_window_secs: 5.0,
            particles: ParticleConfig::default(),
        }
    }

    /// Charge-and-throw at drifting targets.
    #[must_use]
    pub fn throw() -> Self {
        Self {
            variant: Variant::Throw,
            arena: ArenaConfig {
                width: 960.0,
                height: 540.0,
            },
            player: PlayerConfig {
                radius: 16.0,
                max_health: 1.0,
                speed: 0.0,
                spawn: Vec2::new(480.0, 500.0),
                vertical_motion: false,
                jump_secs: 0.0,
                crouch_speed_factor: 1.0,
                hit_invulnerability_secs: 0.0,
                respawn_invulnerability_secs: 0.0,
                death_penalty: 0,
                shield_requires_block: false,
                dash: None,
            },
            phases: PhaseTable {
                threshold_secs: 60.0,
                early: PhaseParams {
                    max_enemies: 3,
                    spawn_interval_secs: 1.2,
                    kill_points: 0,
                    boss_chance: 0.0,
                },
                late: PhaseParams {
                    max_enemies: 5,
                    spawn_interval_secs: 0.8,
                    kill_points: 0,
                    boss_chance: 0.0,
                },
            },
            roster: vec![
                Archetype::target("target", 3, 90.0),
                Archetype::target("decoy", -2, 120.0),
            ],
            weapons: vec![WeaponSpec {
                id: WeaponId::new("ball"),
                damage: 1.0,
                cooldown_secs: 0.25,
                uses: None,
                kind: WeaponKind::Ranged {
                    projectile_speed: 500.0,
                    projectile_radius: 8.0,
                    charge: Some(ChargeSpec {
                        duration_secs: 0.8,
                        min_fraction: 0.2,
                        min_multiplier: 0.6,
                        max_multiplier: 1.4,
                    }),
                },
            }],
            default_weapon: WeaponId::new("ball"),
            buffs: BuffConfig::default(),
            drops: DropConfig::none(),
            weapon_pickups: WeaponPickupConfig::disabled(),
            combo_window_secs: 5.0,
            particles: ParticleConfig::default(),
        }
    }

    /// Parses and validates a JSON document.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed JSON and the matching
    /// validation error for semantically invalid tuning.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks cross-field constraints that the type system cannot express.
    ///
    /// # Errors
    ///
    /// Returns the first violated constraint.
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("arena.width", self.arena.width)?;
        positive("arena.height", self.arena.height)?;
        positive("player.radius", self.player.radius)?;
        positive("player.max_health", self.player.max_health)?;
        positive("combo_window_secs", self.combo_window_secs)?;

        positive(
            "phases.early.spawn_interval_secs",
            self.phases.early.spawn_interval_secs,
        )?;
        positive(
            "phases.late.spawn_interval_secs",
            self.phases.late.spawn_interval_secs,
        )?;
        probability("phases.early.boss_chance", self.phases.early.boss_chance)?;
        probability("phases.late.boss_chance", self.phases.late.boss_chance)?;
        if self.phases.late.max_enemies < self.phases.early.max_enemies {
            return Err(ConfigError::CapRegression {
                early: self.phases.early.max_enemies,
                late: self.phases.late.max_enemies,
            });
        }

        let bosses = self.roster.iter().filter(|a| a.is_boss).count();
        if bosses > 1 {
            return Err(ConfigError::MultipleBosses(bosses));
        }
        if self.roster.iter().all(|a| a.is_boss) {
            return Err(ConfigError::EmptyRoster);
        }
        if let Some(boss) = self.roster.iter().find(|a| a.is_boss && a.fixed_points.is_none()) {
            return Err(ConfigError::BossWithoutPoints(boss.id.to_string()));
        }

        let default = self
            .weapon(&self.default_weapon)
            .ok_or_else(|| ConfigError::UnknownWeapon(self.default_weapon.to_string()))?;
        if default.uses.is_some() {
            return Err(ConfigError::LimitedDefaultWeapon(default.id.to_string()));
        }
        for spec in &self.weapons {
            if let Some(charge) = spec.charge() {
                if !(charge.min_fraction > 0.0 && charge.min_fraction <= 1.0) {
                    return Err(ConfigError::ChargeThreshold {
                        weapon: spec.id.to_string(),
                        value: charge.min_fraction,
                    });
                }
                positive("weapons.charge.duration_secs", charge.duration_secs)?;
            }
        }

        probability("drops.chance", self.drops.chance)?;
        if self.drops.min_count > self.drops.max_count
            || (self.drops.chance > 0.0 && self.drops.max_count == 0)
        {
            return Err(ConfigError::DropRange {
                min: self.drops.min_count,
                max: self.drops.max_count,
            });
        }
        let table_weapons = self.drops.table.iter().filter_map(|kind| match kind {
            PickupKind::Weapon(id) => Some(id),
            PickupKind::Buff(_) => None,
        });
        for id in table_weapons.chain(&self.weapon_pickups.weapons) {
            if self.weapon(id).is_none() {
                return Err(ConfigError::UnknownWeapon(id.to_string()));
            }
        }
        if self.weapon_pickups.max_present > MAX_WEAPON_PICKUPS {
            return Err(ConfigError::TooManyWeaponPickups {
                value: self.weapon_pickups.max_present,
                max: MAX_WEAPON_PICKUPS,
            });
        }
        if self.weapon_pickups.is_enabled() {
            positive(
                "weapon_pickups.interval_secs",
                self.weapon_pickups.interval_secs,
            )?;
        }
        Ok(())
    }

    /// Looks up a weapon definition.
    #[must_use]
    pub fn weapon(&self, id: &WeaponId) -> Option<&WeaponSpec> {
        self.weapons.iter().find(|w| &w.id == id)
    }

    /// The boss archetype, if the roster has one.
    #[must_use]
    pub fn boss(&self) -> Option<&Archetype> {
        self.roster.iter().find(|a| a.is_boss)
    }

    /// Non-boss archetypes, in roster order.
    pub fn regulars(&self) -> impl Iterator<Item = &Archetype> {
        self.roster.iter().filter(|a| !a.is_boss)
    }

    /// Combo window in ticks.
    #[must_use]
    pub fn combo_window_ticks(&self) -> u64 {
        secs_to_ticks(self.combo_window_secs)
    }
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self::arena()
    }
}

fn positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NonPositive { field, value })
    }
}

fn probability(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::Probability { field, value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod preset_tests {
        use super::*;

        #[test]
        fn every_preset_validates() {
            for variant in Variant::ALL {
                let config = MatchConfig::preset(variant);
                assert_eq!(config.variant, variant);
                config.validate().unwrap();
            }
        }

        #[test]
        fn death_penalties() {
            assert_eq!(MatchConfig::arena().player.death_penalty, -5);
            assert_eq!(MatchConfig::shooter().player.death_penalty, -6);
        }

        #[test]
        fn arena_has_one_boss() {
            let config = MatchConfig::arena();
            assert_eq!(config.boss().unwrap().fixed_points, Some(15));
            assert_eq!(config.regulars().count(), 4);
        }

        #[test]
        fn variant_names_parse() {
            assert_eq!("Shooter".parse::<Variant>().unwrap(), Variant::Shooter);
            assert!("racing".parse::<Variant>().is_err());
        }
    }

    mod validation_tests {
        use super::*;

        #[test]
        fn rejects_cap_regression() {
            let mut config = MatchConfig::arena();
            config.phases.late.max_enemies = 2;
            assert!(matches!(
                config.validate(),
                Err(ConfigError::CapRegression { early: 4, late: 2 })
            ));
        }

        #[test]
        fn rejects_zero_spawn_interval() {
            let mut config = MatchConfig::arena();
            config.phases.early.spawn_interval_secs = 0.0;
            assert!(matches!(
                config.validate(),
                Err(ConfigError::NonPositive { .. })
            ));
        }

        #[test]
        fn rejects_boss_only_roster() {
            let mut config = MatchConfig::arena();
            config.roster.retain(|a| a.is_boss);
            assert!(matches!(config.validate(), Err(ConfigError::EmptyRoster)));
        }

        #[test]
        fn rejects_second_boss() {
            let mut config = MatchConfig::arena();
            config.roster.push(Archetype::boss(20));
            assert!(matches!(
                config.validate(),
                Err(ConfigError::MultipleBosses(2))
            ));
        }

        #[test]
        fn rejects_boss_without_fixed_points() {
            let mut config = MatchConfig::arena();
            for archetype in config.roster.iter_mut().filter(|a| a.is_boss) {
                archetype.fixed_points = None;
            }
            assert!(matches!(
                config.validate(),
                Err(ConfigError::BossWithoutPoints(id)) if id == "boss"
            ));
        }

        #[test]
        fn boss_points_must_be_present_in_json() {
            let mut value = serde_json::to_value(MatchConfig::arena()).unwrap();
            for archetype in value["roster"].as_array_mut().unwrap() {
                if archetype["is_boss"] == serde_json::Value::Bool(true) {
                    archetype.as_object_mut().unwrap().remove("fixed_points");
                }
            }
            assert!(matches!(
                MatchConfig::from_json(&value.to_string()),
                Err(ConfigError::BossWithoutPoints(_))
            ));
        }

        #[test]
        fn rejects_weapon_pickup_cap_above_two() {
            let mut config = MatchConfig::shooter();
            config.weapon_pickups.max_present = 3;
            assert!(matches!(
                config.validate(),
                Err(ConfigError::TooManyWeaponPickups { value: 3, max: 2 })
            ));
            config.weapon_pickups.max_present = 2;
            config.validate().unwrap();
        }

        #[test]
        fn rejects_unknown_drop_weapon() {
            let mut config = MatchConfig::arena();
            config
                .drops
                .table
                .push(PickupKind::Weapon(WeaponId::new("laser")));
            assert!(matches!(
                config.validate(),
                Err(ConfigError::UnknownWeapon(name)) if name == "laser"
            ));
        }

        #[test]
        fn rejects_limited_default_weapon() {
            let mut config = MatchConfig::arena();
            config.default_weapon = WeaponId::new("sword");
            assert!(matches!(
                config.validate(),
                Err(ConfigError::LimitedDefaultWeapon(_))
            ));
        }

        #[test]
        fn rejects_inverted_drop_range() {
            let mut config = MatchConfig::arena();
            config.drops.min_count = 5;
            assert!(matches!(
                config.validate(),
                Err(ConfigError::DropRange { min: 5, max: 4 })
            ));
        }

        #[test]
        fn rejects_bad_boss_chance() {
            let mut config = MatchConfig::arena();
            config.phases.late.boss_chance = 1.5;
            assert!(matches!(
                config.validate(),
                Err(ConfigError::Probability { .. })
            ));
        }

        #[test]
        fn from_json_reports_parse_errors() {
            assert!(matches!(
                MatchConfig::from_json("{"),
                Err(ConfigError::Parse(_))
            ));
        }
    }
}
