//! Platform abstraction layer
//!
//! The game needs two host timers: a repeating spawn interval and a one-shot
//! frame callback. Hosts hand out a [`TimerLease`] for each; dropping the
//! lease cancels the timer. The controller keeps leases only while a session
//! is playing, so leaving that phase by any path disarms both.

pub mod manual;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use manual::{ManualTimers, TimerEvent};

/// Which host timer a lease guards
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerKind {
    SpawnInterval,
    Frame,
}

/// Scoped ownership of one armed host timer.
///
/// Dropping the lease runs its cancel hook exactly once. A frame lease whose
/// callback already fired should be released with [`TimerLease::spent`]
/// instead, so the host is not asked to cancel something that already ran.
#[must_use = "dropping a lease cancels its timer"]
pub struct TimerLease {
    kind: TimerKind,
    cancel: Option<Box<dyn FnOnce()>>,
}

impl TimerLease {
    pub fn new(kind: TimerKind, cancel: impl FnOnce() + 'static) -> Self {
        Self {
            kind,
            cancel: Some(Box::new(cancel)),
        }
    }

    pub fn kind(&self) -> TimerKind {
        self.kind
    }

    /// Release without cancelling (the timer already fired)
    pub fn spent(mut self) {
        self.cancel = None;
    }
}

impl Drop for TimerLease {
    fn drop(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl std::fmt::Debug for TimerLease {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TimerLease")
            .field("kind", &self.kind)
            .field("armed", &self.cancel.is_some())
            .finish()
    }
}

/// Host-side timer registration
pub trait TimerHost {
    /// Arm a repeating timer; the host calls `Game::on_spawn_timer` on each firing
    fn arm_interval(&mut self, period_ms: u32) -> TimerLease;

    /// Arm a single frame callback; the host calls `Game::on_frame` once
    fn arm_frame(&mut self) -> TimerLease;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    #[test]
    fn test_drop_cancels_once() {
        let cancelled = Rc::new(Cell::new(0));
        let counter = cancelled.clone();
        let lease = TimerLease::new(TimerKind::Frame, move || counter.set(counter.get() + 1));
        assert_eq!(lease.kind(), TimerKind::Frame);

        drop(lease);
        assert_eq!(cancelled.get(), 1);
    }

    #[test]
    fn test_spent_skips_cancel() {
        let cancelled = Rc::new(Cell::new(false));
        let flag = cancelled.clone();
        let lease = TimerLease::new(TimerKind::Frame, move || flag.set(true));

        lease.spent();
        assert!(!cancelled.get());
    }
}
