//! Loop controller
//!
//! [`Game`] owns the session, the RNG and the two host timer leases. Hosts
//! forward timer firings and pointer input here and read [`View`] back.
//!
//! Timer discipline: both leases are acquired when a session enters
//! `Playing` and dropped on every way out of it (end, restart, drop of the
//! game). The frame lease is re-armed after each frame only while playing.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::Serialize;

use crate::consts::*;
use crate::platform::{ManualTimers, TimerHost, TimerLease};
use crate::sim::{Item, Phase, PlayArea, Session, SimEvent, spawn_item, tick};
use crate::tuning::{InputStyle, Tuning};

/// Read-only snapshot for the presentation layer
#[derive(Debug, Clone, Serialize)]
pub struct View<'a> {
    pub phase: Phase,
    pub score: u64,
    pub items: &'a [Item],
    pub player_x: f32,
    pub speed: f32,
    /// Cosmetic jump in progress
    pub jumping: bool,
}

/// The simulation loop bound to a timer host
pub struct Game<H: TimerHost> {
    session: Session,
    tuning: Tuning,
    rng: Pcg32,
    host: H,
    spawn_lease: Option<TimerLease>,
    frame_lease: Option<TimerLease>,
    /// Timestamp of the previous frame (for cosmetic timers only)
    last_frame_ms: Option<f64>,
}

impl<H: TimerHost> Game<H> {
    pub fn new(host: H, tuning: Tuning, seed: u64) -> Self {
        let tuning = tuning.validated();
        Self {
            session: Session::new(&tuning),
            tuning,
            rng: Pcg32::seed_from_u64(seed),
            host,
            spawn_lease: None,
            frame_lease: None,
            last_frame_ms: None,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn phase(&self) -> Phase {
        self.session.phase
    }

    /// Menu -> Playing
    pub fn start_session(&mut self) {
        self.enter_playing();
        log::info!("Session started");
    }

    /// GameOver -> Playing (also valid mid-session; resets everything)
    pub fn restart_session(&mut self) {
        self.enter_playing();
        log::info!("Session restarted");
    }

    /// Playing -> GameOver. Only ever triggered from outside the loop.
    ///
    /// Returns false if no session was playing.
    pub fn end_session(&mut self) -> bool {
        if !self.session.finish() {
            return false;
        }
        self.disarm();
        log::info!("Session ended with score {}", self.session.score);
        true
    }

    /// Spawn interval fired
    pub fn on_spawn_timer(&mut self) -> Option<SimEvent> {
        if self.spawn_lease.is_none() {
            log::debug!("Ignoring spawn timer with no armed interval");
            return None;
        }
        spawn_item(&mut self.session, &mut self.rng)
    }

    /// Frame callback fired at host time `now_ms`
    pub fn on_frame(&mut self, now_ms: f64) -> Vec<SimEvent> {
        match self.frame_lease.take() {
            Some(lease) => lease.spent(),
            None => {
                log::debug!("Ignoring frame with no armed callback");
                return Vec::new();
            }
        }

        let dt_ms = self
            .last_frame_ms
            .map(|last| ((now_ms - last) as f32).clamp(0.0, MAX_FRAME_DT_MS))
            .unwrap_or(0.0);
        self.last_frame_ms = Some(now_ms);
        self.session.jump_ms = (self.session.jump_ms - dt_ms).max(0.0);

        let events = tick(&mut self.session, &self.tuning);

        if self.session.is_playing() {
            self.frame_lease = Some(self.host.arm_frame());
        }
        events
    }

    /// Pointer or touch moved over the play area.
    ///
    /// Returns the new player x, or `None` if the input was ignored (not
    /// playing, or an unusable play-area measurement).
    pub fn on_pointer(&mut self, client_x: f32, area: PlayArea) -> Option<f32> {
        if !self.session.is_playing() {
            return None;
        }
        let Some(target) = area.percent_x(client_x) else {
            log::debug!("Ignoring pointer at {} over {:?}", client_x, area);
            return None;
        };

        let player = &mut self.session.player;
        match self.tuning.input_style {
            InputStyle::Snap => player.snap_to(target),
            InputStyle::Ease => player.ease_toward(target, FOLLOW_FACTOR),
        }
        Some(player.x)
    }

    pub fn view(&self) -> View<'_> {
        View {
            phase: self.session.phase,
            score: self.session.score,
            items: &self.session.items,
            player_x: self.session.player.x,
            speed: self.session.speed,
            jumping: self.session.is_jumping(),
        }
    }

    fn enter_playing(&mut self) {
        // Old timers go before new ones are armed
        self.disarm();
        self.session.reset(&self.tuning);
        self.last_frame_ms = None;
        self.spawn_lease = Some(self.host.arm_interval(self.tuning.spawn_interval_ms));
        self.frame_lease = Some(self.host.arm_frame());
    }

    /// Drop held leases, spawn interval first
    fn disarm(&mut self) {
        for lease in [self.spawn_lease.take(), self.frame_lease.take()]
            .into_iter()
            .flatten()
        {
            log::debug!("Cancelling {:?} timer", lease.kind());
        }
    }
}

impl Game<ManualTimers> {
    /// Advance the virtual clock and deliver whatever fell due.
    ///
    /// Spawns are delivered before the frame, matching a browser where the
    /// interval task runs ahead of the next animation frame.
    pub fn step(&mut self, dt_ms: f64) -> Vec<SimEvent> {
        let due = self.host.advance(dt_ms);
        let mut events = Vec::new();

        for _ in 0..due.intervals {
            events.extend(self.on_spawn_timer());
        }
        if due.frame {
            let now = self.host.now_ms();
            events.extend(self.on_frame(now));
        }
        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::{TimerEvent, TimerKind};

    fn game(tuning: Tuning) -> (Game<ManualTimers>, ManualTimers) {
        let timers = ManualTimers::new();
        let game = Game::new(timers.clone(), tuning, 12345);
        (game, timers)
    }

    #[test]
    fn test_new_game_is_idle_menu() {
        let (mut game, timers) = game(Tuning::classic());
        assert_eq!(game.phase(), Phase::Menu);
        assert!(timers.is_idle());

        assert!(game.step(5000.0).is_empty());
        assert!(game.session().items.is_empty());
    }

    #[test]
    fn test_start_arms_both_timers() {
        let (mut game, timers) = game(Tuning::classic());
        game.start_session();

        assert_eq!(game.phase(), Phase::Playing);
        assert_eq!(timers.armed_intervals(), 1);
        assert!(timers.frame_armed());
    }

    #[test]
    fn test_frame_rearms_while_playing() {
        let (mut game, timers) = game(Tuning::classic());
        game.start_session();

        for _ in 0..10 {
            game.step(16.0);
            assert!(timers.frame_armed());
        }
        assert_eq!(timers.cancelled(), 0);
    }

    #[test]
    fn test_spawns_follow_interval() {
        let (mut game, _timers) = game(Tuning::classic());
        game.start_session();

        let events = game.step(1499.0);
        assert!(!events.iter().any(|e| matches!(e, SimEvent::Spawned { .. })));

        let events = game.step(1.0);
        assert_eq!(events.first(), Some(&SimEvent::Spawned { id: 0 }));
        assert_eq!(game.session().items.len(), 1);
    }

    #[test]
    fn test_end_session_disarms() {
        let (mut game, timers) = game(Tuning::classic());
        game.start_session();
        game.step(2000.0);

        assert!(game.end_session());
        assert_eq!(game.phase(), Phase::GameOver);
        assert!(timers.is_idle());
        assert_eq!(timers.cancelled(), 2);
        assert!(game.session().items.is_empty());

        // Nothing keeps mutating state afterwards
        assert!(game.step(10_000.0).is_empty());
        assert!(!game.end_session());
    }

    #[test]
    fn test_restart_replaces_timers() {
        let (mut game, timers) = game(Tuning::classic());
        game.start_session();
        game.step(3000.0);
        let armed_before = timers.history().len();

        game.restart_session();
        // Both old leases are gone before either new one is armed
        assert_eq!(
            timers.history()[armed_before..],
            [
                TimerEvent::Cancelled(TimerKind::SpawnInterval),
                TimerEvent::Cancelled(TimerKind::Frame),
                TimerEvent::Armed(TimerKind::SpawnInterval),
                TimerEvent::Armed(TimerKind::Frame),
            ]
        );
        assert_eq!(timers.cancelled(), 2);
        assert_eq!(timers.armed_intervals(), 1);
        assert!(timers.frame_armed());
        assert_eq!(game.session().score, 0);
        assert!(game.session().items.is_empty());
    }

    #[test]
    fn test_drop_disarms() {
        let (mut game, timers) = game(Tuning::classic());
        game.start_session();
        drop(game);
        assert!(timers.is_idle());
    }

    #[test]
    fn test_stale_callbacks_ignored() {
        let (mut game, _timers) = game(Tuning::classic());
        assert_eq!(game.on_spawn_timer(), None);
        assert!(game.on_frame(16.0).is_empty());
    }

    #[test]
    fn test_pointer_snap_and_ease() {
        let area = PlayArea::new(0.0, 200.0);

        let (mut snap, _) = game(Tuning::frantic());
        assert_eq!(snap.on_pointer(100.0, area), None, "ignored in menu");
        snap.start_session();
        assert_eq!(snap.on_pointer(180.0, area), Some(90.0));

        let (mut ease, _) = game(Tuning::classic());
        ease.start_session();
        let x = ease.on_pointer(180.0, area).unwrap();
        // 50 + (90 - 50) * 0.15
        assert!((x - 56.0).abs() < 1e-4);
    }

    #[test]
    fn test_pointer_zero_width_is_noop() {
        let (mut game, _) = game(Tuning::frantic());
        game.start_session();
        assert_eq!(game.on_pointer(100.0, PlayArea::new(0.0, 0.0)), None);
        assert_eq!(game.session().player.x, PLAYER_START_X);
    }

    #[test]
    fn test_jump_decays_with_frame_time() {
        let (mut game, _) = game(Tuning::classic());
        game.start_session();
        game.step(16.0);
        game.session.jump_ms = JUMP_DURATION_MS;
        assert!(game.view().jumping);

        // Deltas are capped at MAX_FRAME_DT_MS, so step in 100 ms frames
        game.step(100.0);
        game.step(100.0);
        assert!(game.view().jumping);
        game.step(100.0);
        assert!(!game.view().jumping);
    }
}
