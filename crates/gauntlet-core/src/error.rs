//! Error types.
//!
//! The simulation itself never fails: out-of-range input is clamped or
//! ignored, spawn rejections are routine flow control, and entities leaving
//! the arena are removed silently. The only fallible surface is loading and
//! validating a [`MatchConfig`](crate::config::MatchConfig).

use thiserror::Error;

/// Errors produced while parsing or validating a match configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration document is not valid JSON for `MatchConfig`.
    #[error("failed to parse match config: {0}")]
    Parse(#[from] serde_json::Error),

    /// A duration or rate that must be strictly positive is not.
    #[error("`{field}` must be positive, got {value}")]
    NonPositive {
        /// Dotted path of the offending field.
        field: &'static str,
        /// The rejected value.
        value: f32,
    },

    /// A probability lies outside `[0, 1]`.
    #[error("`{field}` must be within [0, 1], got {value}")]
    Probability {
        /// Dotted path of the offending field.
        field: &'static str,
        /// The rejected value.
        value: f32,
    },

    /// The late phase allows fewer enemies than the early phase.
    #[error("late phase cap ({late}) is below early phase cap ({early})")]
    CapRegression {
        /// Early phase population cap.
        early: usize,
        /// Late phase population cap.
        late: usize,
    },

    /// No regular (non-boss) archetype is available to spawn.
    #[error("enemy roster has no regular archetypes")]
    EmptyRoster,

    /// More than one archetype is flagged as the boss.
    #[error("enemy roster has {0} boss archetypes, at most one is allowed")]
    MultipleBosses(usize),

    /// The boss archetype has no fixed point value.
    #[error("boss archetype `{0}` must have fixed points")]
    BossWithoutPoints(String),

    /// The weapon pickup timer allows more pickups at once than the match supports.
    #[error("weapon_pickups.max_present is {value}, at most {max} allowed")]
    TooManyWeaponPickups {
        /// Configured cap.
        value: usize,
        /// Hard ceiling.
        max: usize,
    },

    /// A table references a weapon that is not defined.
    #[error("unknown weapon `{0}`")]
    UnknownWeapon(String),

    /// The configured default weapon has limited uses.
    #[error("default weapon `{0}` must have unlimited uses")]
    LimitedDefaultWeapon(String),

    /// The pickup drop count range is inverted or empty.
    #[error("drop count range {min}..={max} is invalid")]
    DropRange {
        /// Lower bound.
        min: u32,
        /// Upper bound.
        max: u32,
    },

    /// A charge threshold lies outside `(0, 1]`.
    #[error("weapon `{weapon}` has charge threshold {value}, expected (0, 1]")]
    ChargeThreshold {
        /// Weapon id.
        weapon: String,
        /// The rejected value.
        value: f32,
    },
}
