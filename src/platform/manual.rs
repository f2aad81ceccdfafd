//! Deterministic virtual-clock timers
//!
//! Used for headless runs and tests. Time only moves when [`ManualTimers::advance`]
//! is called, which reports what fell due. Clones share the same clock, so a
//! test can keep a handle while the game owns another.
//!
//! Like a browser `setInterval`, an interval fires at most once per advance;
//! periods lapsed during a long stall are skipped, not replayed.

use std::cell::RefCell;
use std::rc::Rc;

use super::{TimerHost, TimerKind, TimerLease};

#[derive(Debug, Clone, Copy)]
struct Interval {
    id: u64,
    period_ms: f64,
    next_fire_ms: f64,
}

/// Arm/cancel history entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerEvent {
    Armed(TimerKind),
    Cancelled(TimerKind),
}

#[derive(Debug, Default)]
struct Clock {
    now_ms: f64,
    next_id: u64,
    intervals: Vec<Interval>,
    frame: Option<u64>,
    cancelled: u32,
    history: Vec<TimerEvent>,
}

impl Clock {
    fn allocate_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }
}

/// Timers that fell due during one [`ManualTimers::advance`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Due {
    /// Armed intervals that fired, each at most once
    pub intervals: u32,
    /// Whether an armed frame callback fires
    pub frame: bool,
}

/// Virtual clock implementing [`TimerHost`]
#[derive(Debug, Clone, Default)]
pub struct ManualTimers {
    clock: Rc<RefCell<Clock>>,
}

impl ManualTimers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Move time forward and collect what fired.
    ///
    /// A fired frame is consumed; intervals keep running until cancelled.
    /// Negative or non-finite deltas leave the clock where it is.
    pub fn advance(&self, dt_ms: f64) -> Due {
        let mut clock = self.clock.borrow_mut();
        if dt_ms.is_finite() && dt_ms > 0.0 {
            clock.now_ms += dt_ms;
        }
        let now = clock.now_ms;

        let mut due = Due::default();
        for interval in &mut clock.intervals {
            if interval.next_fire_ms <= now {
                due.intervals = due.intervals.saturating_add(1);
                let lapsed = ((now - interval.next_fire_ms) / interval.period_ms).floor() + 1.0;
                interval.next_fire_ms += lapsed * interval.period_ms;
            }
        }
        due.frame = clock.frame.take().is_some();
        due
    }

    pub fn now_ms(&self) -> f64 {
        self.clock.borrow().now_ms
    }

    /// Number of intervals currently armed
    pub fn armed_intervals(&self) -> usize {
        self.clock.borrow().intervals.len()
    }

    /// Whether a frame callback is pending
    pub fn frame_armed(&self) -> bool {
        self.clock.borrow().frame.is_some()
    }

    /// Total cancellations performed through leases
    pub fn cancelled(&self) -> u32 {
        self.clock.borrow().cancelled
    }

    /// Every arm and cancel so far, oldest first
    pub fn history(&self) -> Vec<TimerEvent> {
        self.clock.borrow().history.clone()
    }

    /// True when nothing is armed
    pub fn is_idle(&self) -> bool {
        self.armed_intervals() == 0 && !self.frame_armed()
    }
}

impl TimerHost for ManualTimers {
    fn arm_interval(&mut self, period_ms: u32) -> TimerLease {
        let id = {
            let mut clock = self.clock.borrow_mut();
            let id = clock.allocate_id();
            let period_ms = f64::from(period_ms.max(1));
            let next_fire_ms = clock.now_ms + period_ms;
            clock.intervals.push(Interval {
                id,
                period_ms,
                next_fire_ms,
            });
            clock.history.push(TimerEvent::Armed(TimerKind::SpawnInterval));
            id
        };

        let clock = Rc::clone(&self.clock);
        TimerLease::new(TimerKind::SpawnInterval, move || {
            let mut clock = clock.borrow_mut();
            clock.intervals.retain(|i| i.id != id);
            clock.cancelled += 1;
            clock.history.push(TimerEvent::Cancelled(TimerKind::SpawnInterval));
        })
    }

    fn arm_frame(&mut self) -> TimerLease {
        let id = {
            let mut clock = self.clock.borrow_mut();
            let id = clock.allocate_id();
            clock.frame = Some(id);
            clock.history.push(TimerEvent::Armed(TimerKind::Frame));
            id
        };

        let clock = Rc::clone(&self.clock);
        TimerLease::new(TimerKind::Frame, move || {
            let mut clock = clock.borrow_mut();
            if clock.frame == Some(id) {
                clock.frame = None;
            }
            clock.cancelled += 1;
            clock.history.push(TimerEvent::Cancelled(TimerKind::Frame));
        })
    }
}
