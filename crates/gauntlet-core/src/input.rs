//! Player input for one tick.
//!
//! Hosts fill an [`InputState`] from whatever device they have. The engine
//! never trusts it raw: [`InputState::sanitized`] replaces non-finite axes
//! with zero, clamps axes to `[-1, 1]`, and caps the movement vector at unit
//! length so diagonals are not faster.
//!
//! ```
//! use gauntlet_core::input::InputState;
//!
//! let input = InputState { move_x: f32::NAN, move_y: 7.0, ..InputState::default() };
//! let clean = input.sanitized();
//! assert_eq!(clean.move_x, 0.0);
//! assert_eq!(clean.move_y, 1.0);
//! ```

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Device state sampled for one tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputState {
    /// Horizontal movement axis.
    pub move_x: f32,
    /// Vertical movement axis.
    pub move_y: f32,
    /// Horizontal aim axis (twin-stick).
    pub aim_x: f32,
    /// Vertical aim axis (twin-stick).
    pub aim_y: f32,
    /// Jump held.
    pub jump: bool,
    /// Crouch held.
    pub crouch: bool,
    /// Block held.
    pub block: bool,
    /// Attack held. Release is the transition to `false`.
    pub attack: bool,
    /// Special held.
    pub special: bool,
}

impl InputState {
    /// Returns a copy with every axis finite and in range.
    #[must_use]
    pub fn sanitized(&self) -> Self {
        let movement = clamp_length(Vec2::new(axis(self.move_x), axis(self.move_y)));
        let aim = clamp_length(Vec2::new(axis(self.aim_x), axis(self.aim_y)));
        Self {
            move_x: movement.x,
            move_y: movement.y,
            aim_x: aim.x,
            aim_y: aim.y,
            ..*self
        }
    }

    /// Movement vector.
    #[must_use]
    pub fn movement(&self) -> Vec2 {
        Vec2::new(self.move_x, self.move_y)
    }

    /// Unit aim direction, if the aim stick is deflected.
    #[must_use]
    pub fn aim_direction(&self) -> Option<Vec2> {
        Vec2::new(self.aim_x, self.aim_y).try_normalize()
    }
}

fn axis(value: f32) -> f32 {
    if value.is_finite() {
        value.clamp(-1.0, 1.0)
    } else {
        0.0
    }
}

fn clamp_length(v: Vec2) -> Vec2 {
    if v.length_squared() > 1.0 {
        v.normalize_or_zero()
    } else {
        v
    }
}
