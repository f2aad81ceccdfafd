//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One step per frame, no wall-clock reads
//! - Seeded RNG only (passed in by the caller)
//! - Stable iteration order (by item ID)
//! - No rendering or platform dependencies

pub mod catch;
pub mod state;
pub mod tick;

pub use catch::{PlayArea, has_exited, in_catch_band, is_caught, within_catch_radius};
pub use state::{Item, Phase, Player, Session};
pub use tick::{SimEvent, spawn_item, tick};
