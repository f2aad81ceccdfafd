//! Spawning and per-frame simulation step
//!
//! Order within a frame matters: positions advance first, then the catch test
//! runs against the new y, then exited items are dropped. An item therefore
//! gets exactly one look at the catch band per frame it spends inside it, and
//! is removed on the first catch.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::catch::{has_exited, is_caught};
use super::state::{Item, Session};
use crate::consts::*;
use crate::tuning::Tuning;

/// Something that happened during a spawn or frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SimEvent {
    Spawned { id: u32 },
    /// Caught by the player; `score` is the score after the catch
    Caught { id: u32, score: u64 },
    /// Fell out of the bottom
    Missed { id: u32 },
}

/// Spawn one item at a random x. No-op unless playing.
pub fn spawn_item<R: Rng>(state: &mut Session, rng: &mut R) -> Option<SimEvent> {
    if !state.is_playing() {
        return None;
    }

    let x = rng.random_range(PLAYER_MIN_X..PLAYER_MAX_X);
    let id = state.next_item_id();
    state.items.push(Item::new(id, x));
    log::trace!("Spawned item {} at x={:.1}", id, x);

    Some(SimEvent::Spawned { id })
}

/// Advance the session by one frame. No-op unless playing.
pub fn tick(state: &mut Session, tuning: &Tuning) -> Vec<SimEvent> {
    let mut events = Vec::new();
    if !state.is_playing() {
        return events;
    }

    // Every item falls at the speed in effect when the frame began
    let speed = state.speed;
    let player_x = state.player.x;

    state.items.retain_mut(|item| {
        item.pos.y += speed;

        if is_caught(item, player_x) {
            events.push(SimEvent::Caught {
                id: item.id,
                score: 0,
            });
            return false;
        }

        if has_exited(item) {
            log::trace!("Item {} missed", item.id);
            events.push(SimEvent::Missed { id: item.id });
            return false;
        }

        true
    });

    // Scores are filled in once the borrow on items is released
    for event in &mut events {
        if let SimEvent::Caught { id, score } = event {
            state.register_catch(tuning);
            *score = state.score;
            log::debug!(
                "Caught item {} (score {}, speed {:.2})",
                id,
                state.score,
                state.speed
            );
        }
    }

    events
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::Phase;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn playing(tuning: &Tuning) -> Session {
        let mut state = Session::new(tuning);
        state.reset(tuning);
        state
    }

    fn place(state: &mut Session, x: f32, y: f32) -> u32 {
        let id = state.next_item_id();
        let mut item = Item::new(id, x);
        item.pos.y = y;
        state.items.push(item);
        id
    }

    #[test]
    fn test_spawn_only_while_playing() {
        let tuning = Tuning::classic();
        let mut rng = Pcg32::seed_from_u64(7);
        let mut state = Session::new(&tuning);

        assert_eq!(spawn_item(&mut state, &mut rng), None);
        assert!(state.items.is_empty());

        state.reset(&tuning);
        assert_eq!(
            spawn_item(&mut state, &mut rng),
            Some(SimEvent::Spawned { id: 0 })
        );
        assert_eq!(
            spawn_item(&mut state, &mut rng),
            Some(SimEvent::Spawned { id: 1 })
        );
        assert_eq!(state.items.len(), 2);
        for item in &state.items {
            assert_eq!(item.y(), SPAWN_Y);
            assert!((PLAYER_MIN_X..=PLAYER_MAX_X).contains(&item.x()));
        }
    }

    #[test]
    fn test_tick_advances_by_speed() {
        let tuning = Tuning::classic();
        let mut state = playing(&tuning);
        state.player.x = 90.0;
        place(&mut state, 10.0, 0.0);

        let events = tick(&mut state, &tuning);
        assert!(events.is_empty());
        assert!((state.items[0].y() - tuning.initial_speed).abs() < 1e-6);
        assert_eq!(state.items[0].x(), 10.0);
    }

    #[test]
    fn test_tick_catches_in_band() {
        let tuning = Tuning::classic();
        let mut state = playing(&tuning);
        let id = place(&mut state, 50.0, 79.5);

        let events = tick(&mut state, &tuning);
        assert_eq!(events, vec![SimEvent::Caught { id, score: 1 }]);
        assert!(state.items.is_empty());
        assert_eq!(state.score, 1);
        assert!((state.speed - (tuning.initial_speed + tuning.speed_increment)).abs() < 1e-6);
        assert!(state.is_jumping());
    }

    #[test]
    fn test_tick_uses_post_update_position() {
        let tuning = Tuning::classic();
        let mut state = playing(&tuning);
        // Inside the band before the update, past it after
        place(&mut state, 50.0, 84.5);

        let events = tick(&mut state, &tuning);
        assert!(events.is_empty());
        assert_eq!(state.score, 0);
        assert_eq!(state.items.len(), 1);
    }

    #[test]
    fn test_tick_fast_item_skips_band() {
        let tuning = Tuning::frantic();
        let mut state = playing(&tuning);
        state.speed = 8.0;

        // 70 -> 78 lands in the band
        place(&mut state, 50.0, 70.0);
        assert_eq!(tick(&mut state, &tuning).len(), 1);

        // 74 -> 86 steps over (75, 85) entirely
        state.speed = 12.0;
        place(&mut state, 50.0, 74.0);
        assert!(tick(&mut state, &tuning).is_empty());
        assert_eq!(state.items.len(), 1);
        assert_eq!(state.score, 1);
    }

    #[test]
    fn test_tick_removes_exited_items() {
        let tuning = Tuning::classic();
        let mut state = playing(&tuning);
        let id = place(&mut state, 50.0, 99.5);

        let events = tick(&mut state, &tuning);
        assert_eq!(events, vec![SimEvent::Missed { id }]);
        assert!(state.items.is_empty());
        assert_eq!(state.score, 0);
    }

    #[test]
    fn test_tick_multiple_catches_in_one_frame() {
        let tuning = Tuning::classic();
        let mut state = playing(&tuning);
        let a = place(&mut state, 48.0, 79.0);
        let b = place(&mut state, 52.0, 80.0);
        let c = place(&mut state, 52.0, 20.0);

        let events = tick(&mut state, &tuning);
        assert_eq!(
            events,
            vec![
                SimEvent::Caught { id: a, score: 1 },
                SimEvent::Caught { id: b, score: 2 },
            ]
        );
        assert_eq!(state.items.len(), 1);
        assert_eq!(state.items[0].id, c);
        // The survivor fell at the speed the frame started with
        assert!((state.items[0].y() - (20.0 + tuning.initial_speed)).abs() < 1e-6);
    }

    #[test]
    fn test_tick_ignored_outside_playing() {
        let tuning = Tuning::classic();
        let mut state = playing(&tuning);
        place(&mut state, 50.0, 10.0);
        state.phase = Phase::Menu;

        assert!(tick(&mut state, &tuning).is_empty());
        assert_eq!(state.items[0].y(), 10.0);
    }

    #[test]
    fn test_determinism() {
        // Two sessions with the same seed spawn identical items
        let tuning = Tuning::classic();
        let mut rng1 = Pcg32::seed_from_u64(99999);
        let mut rng2 = Pcg32::seed_from_u64(99999);
        let mut state1 = playing(&tuning);
        let mut state2 = playing(&tuning);

        for frame in 0..500 {
            if frame % 90 == 0 {
                spawn_item(&mut state1, &mut rng1);
                spawn_item(&mut state2, &mut rng2);
            }
            tick(&mut state1, &tuning);
            tick(&mut state2, &tuning);
        }

        assert_eq!(state1.score, state2.score);
        assert_eq!(state1.items, state2.items);
    }
}
