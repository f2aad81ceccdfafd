//! Difficulty tuning
//!
//! The observed skins of the game differ only in how fast difficulty ramps
//! and how the player follows the pointer. Everything else is shared.

use serde::{Deserialize, Serialize};

use crate::consts::SPAWN_INTERVAL_MS;

/// How the player responds to pointer movement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum InputStyle {
    /// Jump straight to the pointer
    Snap,
    /// Cover a fixed fraction of the distance on every input event
    #[default]
    Ease,
}

/// Difficulty parameters for one session
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tuning {
    /// Fall speed at session start (percent per frame)
    pub initial_speed: f32,
    /// Speed gained per catch
    pub speed_increment: f32,
    /// Speed cap
    pub max_speed: f32,
    /// Spawn interval in milliseconds
    pub spawn_interval_ms: u32,
    /// Player input response
    pub input_style: InputStyle,
}

impl Default for Tuning {
    fn default() -> Self {
        Self::classic()
    }
}

impl Tuning {
    /// Gentle ramp, eased follow
    pub fn classic() -> Self {
        Self {
            initial_speed: 0.8,
            speed_increment: 0.05,
            max_speed: 3.0,
            spawn_interval_ms: SPAWN_INTERVAL_MS,
            input_style: InputStyle::Ease,
        }
    }

    /// Steep ramp, high cap, snap-to-pointer
    pub fn frantic() -> Self {
        Self {
            initial_speed: 0.8,
            speed_increment: 0.1,
            max_speed: 8.0,
            spawn_interval_ms: SPAWN_INTERVAL_MS,
            input_style: InputStyle::Snap,
        }
    }

    /// Repair values that would break the speed invariants.
    ///
    /// Each offending field falls back to the classic value.
    pub fn validated(mut self) -> Self {
        let defaults = Self::classic();

        if !self.initial_speed.is_finite() || self.initial_speed < 0.0 {
            log::warn!("Invalid initial_speed {}, using default", self.initial_speed);
            self.initial_speed = defaults.initial_speed;
        }
        if !self.speed_increment.is_finite() || self.speed_increment < 0.0 {
            log::warn!("Invalid speed_increment {}, using default", self.speed_increment);
            self.speed_increment = defaults.speed_increment;
        }
        if !self.max_speed.is_finite() || self.max_speed < self.initial_speed {
            log::warn!(
                "max_speed {} below initial speed {}, raising cap",
                self.max_speed,
                self.initial_speed
            );
            self.max_speed = defaults.max_speed.max(self.initial_speed);
        }
        if self.spawn_interval_ms == 0 {
            log::warn!("Zero spawn interval, using default");
            self.spawn_interval_ms = defaults.spawn_interval_ms;
        }

        self
    }
}
