//! Browser timers: `setInterval` and `requestAnimationFrame`
//!
//! Leases cancel through `clearInterval` / `cancelAnimationFrame`. The
//! callbacks are supplied by the host and usually hold a `Weak` handle to the
//! game, so a dropped game turns late firings into no-ops.

use std::rc::Rc;

use wasm_bindgen::prelude::*;

use super::{TimerHost, TimerKind, TimerLease};

pub struct BrowserTimers {
    window: web_sys::Window,
    on_interval: Rc<dyn Fn()>,
    on_frame: Rc<dyn Fn(f64)>,
}

impl BrowserTimers {
    pub fn new(
        window: web_sys::Window,
        on_interval: impl Fn() + 'static,
        on_frame: impl Fn(f64) + 'static,
    ) -> Self {
        Self {
            window,
            on_interval: Rc::new(on_interval),
            on_frame: Rc::new(on_frame),
        }
    }
}

impl TimerHost for BrowserTimers {
    fn arm_interval(&mut self, period_ms: u32) -> TimerLease {
        let callback = Rc::clone(&self.on_interval);
        let closure = Closure::<dyn FnMut()>::new(move || callback());
        let timeout = i32::try_from(period_ms).unwrap_or(i32::MAX);

        match self
            .window
            .set_interval_with_callback_and_timeout_and_arguments_0(
                closure.as_ref().unchecked_ref(),
                timeout,
            ) {
            Ok(handle) => {
                let window = self.window.clone();
                TimerLease::new(TimerKind::SpawnInterval, move || {
                    window.clear_interval_with_handle(handle);
                    // Only freed once JS can no longer call it
                    drop(closure);
                })
            }
            Err(e) => {
                log::error!("setInterval failed: {:?}", e);
                TimerLease::new(TimerKind::SpawnInterval, move || drop(closure))
            }
        }
    }

    fn arm_frame(&mut self) -> TimerLease {
        let callback = Rc::clone(&self.on_frame);
        // Freed by wasm-bindgen after its single call; a cancelled one leaks
        let closure = Closure::once_into_js(move |time: f64| callback(time));

        match self.window.request_animation_frame(closure.unchecked_ref()) {
            Ok(id) => {
                let window = self.window.clone();
                TimerLease::new(TimerKind::Frame, move || {
                    let _ = window.cancel_animation_frame(id);
                })
            }
            Err(e) => {
                log::error!("requestAnimationFrame failed: {:?}", e);
                TimerLease::new(TimerKind::Frame, || {})
            }
        }
    }
}
