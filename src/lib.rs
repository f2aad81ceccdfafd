//! Carrot Catch - A falling-item catch arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (spawning, falling, catching, score)
//! - `game`: Loop controller that ties the simulation to host timers
//! - `platform`: Timer leases for browser/headless hosts
//! - `tuning`: Data-driven difficulty parameters
//! - `settings`: Presentation preferences (theme skin)

pub mod game;
pub mod platform;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use game::{Game, View};
pub use settings::{Preset, Settings, Theme};
pub use tuning::{InputStyle, Tuning};

/// Game configuration constants
///
/// All positions are in percent of the play area (0-100 on both axes).
pub mod consts {
    /// Items are catchable strictly inside this vertical band
    pub const CATCH_BAND_MIN: f32 = 75.0;
    pub const CATCH_BAND_MAX: f32 = 85.0;
    /// Maximum horizontal distance between item and player for a catch
    pub const CATCH_RADIUS: f32 = 8.0;

    /// Player (and spawn) horizontal bounds
    pub const PLAYER_MIN_X: f32 = 5.0;
    pub const PLAYER_MAX_X: f32 = 95.0;
    pub const PLAYER_START_X: f32 = 50.0;

    /// Items enter just above the top edge
    pub const SPAWN_Y: f32 = -5.0;
    /// Items at or below this are gone
    pub const EXIT_Y: f32 = 100.0;

    /// Wall-clock spawn interval
    pub const SPAWN_INTERVAL_MS: u32 = 1500;

    /// Fraction of the remaining distance covered per eased input event
    pub const FOLLOW_FACTOR: f32 = 0.15;

    /// Cosmetic jump after a catch
    pub const JUMP_DURATION_MS: f32 = 300.0;

    /// Clamp for host frame deltas (tab switches produce huge gaps)
    pub const MAX_FRAME_DT_MS: f32 = 100.0;
}

/// Clamp a horizontal position into the player's reachable range
#[inline]
pub fn clamp_player_x(x: f32) -> f32 {
    x.clamp(consts::PLAYER_MIN_X, consts::PLAYER_MAX_X)
}
