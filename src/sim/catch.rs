//! Catch detection and pointer mapping
//!
//! Catching is a band test on y plus a radius test on x. There is no swept
//! test: an item falling fast enough can step over the band in one frame.

use serde::{Deserialize, Serialize};

use super::state::Item;
use crate::clamp_player_x;
use crate::consts::*;

/// True if `y` is strictly inside the catch band
#[inline]
pub fn in_catch_band(y: f32) -> bool {
    y > CATCH_BAND_MIN && y < CATCH_BAND_MAX
}

/// True if the item is horizontally close enough to the player
#[inline]
pub fn within_catch_radius(item_x: f32, player_x: f32) -> bool {
    (item_x - player_x).abs() < CATCH_RADIUS
}

/// Catch test against an item's current position
pub fn is_caught(item: &Item, player_x: f32) -> bool {
    in_catch_band(item.y()) && within_catch_radius(item.x(), player_x)
}

/// True once an item has left the bottom of the play area
#[inline]
pub fn has_exited(item: &Item) -> bool {
    item.y() >= EXIT_Y
}

/// Horizontal extent of the play area in client coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlayArea {
    pub left: f32,
    pub width: f32,
}

impl PlayArea {
    pub fn new(left: f32, width: f32) -> Self {
        Self { left, width }
    }

    /// Map a client x coordinate to a clamped percent position.
    ///
    /// Returns `None` when the measurement is unusable (zero, negative or
    /// non-finite width, or a non-finite coordinate).
    pub fn percent_x(&self, client_x: f32) -> Option<f32> {
        if !self.width.is_finite() || self.width <= 0.0 {
            return None;
        }
        if !self.left.is_finite() || !client_x.is_finite() {
            return None;
        }
        let x = (client_x - self.left) / self.width * 100.0;
        x.is_finite().then(|| clamp_player_x(x))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catch_band_is_open_interval() {
        assert!(!in_catch_band(75.0));
        assert!(in_catch_band(75.01));
        assert!(in_catch_band(80.0));
        assert!(in_catch_band(84.99));
        assert!(!in_catch_band(85.0));
    }

    #[test]
    fn test_catch_radius_is_strict() {
        assert!(within_catch_radius(50.0, 57.9));
        assert!(!within_catch_radius(50.0, 58.0));
        assert!(within_catch_radius(50.0, 42.5));
    }

    #[test]
    fn test_is_caught_needs_both() {
        let mut item = Item::new(0, 50.0);
        item.pos.y = 80.0;
        assert!(is_caught(&item, 52.0));
        assert!(!is_caught(&item, 70.0));

        item.pos.y = 90.0;
        assert!(!is_caught(&item, 50.0));
    }

    #[test]
    fn test_has_exited() {
        let mut item = Item::new(0, 50.0);
        item.pos.y = 99.9;
        assert!(!has_exited(&item));
        item.pos.y = 100.0;
        assert!(has_exited(&item));
    }

    #[test]
    fn test_percent_x_maps_and_clamps() {
        let area = PlayArea::new(100.0, 400.0);
        assert_eq!(area.percent_x(300.0), Some(50.0));
        assert_eq!(area.percent_x(100.0), Some(PLAYER_MIN_X));
        assert_eq!(area.percent_x(900.0), Some(PLAYER_MAX_X));
    }

    #[test]
    fn test_percent_x_rejects_bad_measurements() {
        assert_eq!(PlayArea::new(0.0, 0.0).percent_x(10.0), None);
        assert_eq!(PlayArea::new(0.0, -5.0).percent_x(10.0), None);
        assert_eq!(PlayArea::new(0.0, f32::NAN).percent_x(10.0), None);
        assert_eq!(PlayArea::new(f32::INFINITY, 100.0).percent_x(10.0), None);
        assert_eq!(PlayArea::new(0.0, 100.0).percent_x(f32::NAN), None);
    }
}
