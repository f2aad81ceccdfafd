//! Session state and core simulation types
//!
//! Everything the loop mutates lives in [`Session`]. Timers and RNG are owned
//! by the controller, not here.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::clamp_player_x;
use crate::consts::*;
use crate::tuning::Tuning;

/// Session lifecycle phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Phase {
    /// Title screen, nothing simulated
    #[default]
    Menu,
    /// Active gameplay
    Playing,
    /// Session ended by the host
    GameOver,
}

/// A falling item
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: u32,
    /// x is fixed at spawn, y grows by the session speed every frame
    pub pos: Vec2,
}

impl Item {
    pub fn new(id: u32, x: f32) -> Self {
        Self {
            id,
            pos: Vec2::new(x, SPAWN_Y),
        }
    }

    #[inline]
    pub fn x(&self) -> f32 {
        self.pos.x
    }

    #[inline]
    pub fn y(&self) -> f32 {
        self.pos.y
    }
}

/// The catcher
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub x: f32,
}

impl Default for Player {
    fn default() -> Self {
        Self { x: PLAYER_START_X }
    }
}

impl Player {
    /// Place the player directly at `target` (clamped)
    pub fn snap_to(&mut self, target: f32) {
        self.x = clamp_player_x(target);
    }

    /// Move a fixed fraction of the way toward `target` (clamped)
    pub fn ease_toward(&mut self, target: f32, factor: f32) {
        let target = clamp_player_x(target);
        self.x = clamp_player_x(self.x + (target - self.x) * factor);
    }
}

/// Complete session state (serializable for hosts)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub phase: Phase,
    pub score: u64,
    /// Fall speed in percent per frame
    pub speed: f32,
    /// Active items, ascending by id
    pub items: Vec<Item>,
    pub player: Player,
    /// Remaining cosmetic jump time after a catch
    #[serde(default)]
    pub jump_ms: f32,
    next_item_id: u32,
}

impl Session {
    /// A fresh session sitting in the menu
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            phase: Phase::Menu,
            score: 0,
            speed: tuning.initial_speed,
            items: Vec::new(),
            player: Player::default(),
            jump_ms: 0.0,
            next_item_id: 0,
        }
    }

    /// Reset everything and enter `Playing`
    pub fn reset(&mut self, tuning: &Tuning) {
        *self = Self::new(tuning);
        self.phase = Phase::Playing;
    }

    /// Leave `Playing` for `GameOver`; items do not outlive the session.
    ///
    /// Returns false if the session was not playing.
    pub fn finish(&mut self) -> bool {
        if self.phase != Phase::Playing {
            return false;
        }
        self.phase = Phase::GameOver;
        self.items.clear();
        self.jump_ms = 0.0;
        true
    }

    /// Allocate the next item ID
    pub fn next_item_id(&mut self) -> u32 {
        let id = self.next_item_id;
        self.next_item_id += 1;
        id
    }

    /// Apply one catch: score, capped speed, cosmetic jump
    pub fn register_catch(&mut self, tuning: &Tuning) {
        self.score += 1;
        self.speed = (self.speed + tuning.speed_increment).min(tuning.max_speed);
        self.jump_ms = JUMP_DURATION_MS;
    }

    pub fn is_playing(&self) -> bool {
        self.phase == Phase::Playing
    }

    pub fn is_jumping(&self) -> bool {
        self.jump_ms > 0.0
    }
}
