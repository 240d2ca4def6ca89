//! Simulated Host
//!
//! An in-memory implementation of all four host collaborator traits, used
//! by the test suite and usable by embedders that drive the tracker from
//! their own event loop.
//!
//! # Behavior
//!
//! - The clock is manual: time only moves when [`SimHost::advance`] is
//!   called. Due timers fire synchronously inside `advance`, in due
//!   order.
//! - [`SimHost::resize`] and [`SimHost::rotate`] update the simulated
//!   dimensions and then deliver the corresponding signal to every bound
//!   handler.
//! - Handlers and timer callbacks are always invoked with the internal
//!   lock released, so they are free to call back into the host.

use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::Mutex;

use super::{Capabilities, Dimensions, Scheduler, SignalHandler, SignalSource, TimerToken, Viewport};
use crate::events::Trigger;

struct Timer {
    token: TimerToken,
    due: Instant,
    callback: Box<dyn FnOnce() + Send>,
}

struct SimState {
    width: u32,
    height: u32,
    inner_size_available: bool,
    pixel_ratio: Option<f64>,
    touch: bool,
    orientation_events: bool,
    now: Instant,
    next_token: TimerToken,
    timers: Vec<Timer>,
    resize_handlers: Vec<SignalHandler>,
    orientation_handlers: Vec<SignalHandler>,
}

/// A simulated host environment with a manual clock.
///
/// Cloning shares state: all clones observe the same dimensions, clock,
/// and bound handlers.
#[derive(Clone)]
pub struct SimHost {
    state: Arc<Mutex<SimState>>,
}

impl SimHost {
    /// Create a host reporting the given viewport size, with no pixel
    /// ratio signal, no touch support, and no orientation signal.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            state: Arc::new(Mutex::new(SimState {
                width,
                height,
                inner_size_available: true,
                pixel_ratio: None,
                touch: false,
                orientation_events: false,
                now: Instant::now(),
                next_token: 0,
                timers: Vec::new(),
                resize_handlers: Vec::new(),
                orientation_handlers: Vec::new(),
            })),
        }
    }

    /// Change the reported dimensions without delivering any signal.
    pub fn set_size(&self, width: u32, height: u32) {
        let mut state = self.state.lock();
        state.width = width;
        state.height = height;
    }

    /// Set or clear the device-pixel-ratio signal.
    pub fn set_pixel_ratio(&self, ratio: Option<f64>) {
        self.state.lock().pixel_ratio = ratio;
    }

    /// Toggle the touch-capable signal.
    pub fn set_touch(&self, touch: bool) {
        self.state.lock().touch = touch;
    }

    /// Toggle whether the host advertises orientation-change signals.
    pub fn set_orientation_events(&self, supported: bool) {
        self.state.lock().orientation_events = supported;
    }

    /// Toggle availability of the "inner dimensions" query, forcing the
    /// client-dimensions fallback when `false`.
    pub fn set_inner_size_available(&self, available: bool) {
        self.state.lock().inner_size_available = available;
    }

    /// Resize the viewport and deliver a resize signal.
    pub fn resize(&self, width: u32, height: u32) {
        self.set_size(width, height);
        let handlers = self.state.lock().resize_handlers.clone();
        for handler in handlers {
            handler(Trigger::Resize);
        }
    }

    /// Swap width and height and deliver an orientation-change signal.
    ///
    /// The signal is only delivered when the host advertises orientation
    /// support, matching a real host that never emits it otherwise.
    pub fn rotate(&self) {
        let handlers = {
            let mut state = self.state.lock();
            let state = &mut *state;
            std::mem::swap(&mut state.width, &mut state.height);
            if state.orientation_events {
                state.orientation_handlers.clone()
            } else {
                Vec::new()
            }
        };
        for handler in handlers {
            handler(Trigger::OrientationChange);
        }
    }

    /// Advance the clock by `delta`, firing due timers in due order.
    pub fn advance(&self, delta: Duration) {
        let deadline = self.state.lock().now + delta;
        loop {
            let timer = {
                let mut state = self.state.lock();
                let next = state
                    .timers
                    .iter()
                    .enumerate()
                    .filter(|(_, t)| t.due <= deadline)
                    .min_by_key(|(_, t)| t.due)
                    .map(|(index, _)| index);
                match next {
                    Some(index) => {
                        let timer = state.timers.remove(index);
                        if timer.due > state.now {
                            state.now = timer.due;
                        }
                        timer
                    }
                    None => {
                        state.now = deadline;
                        break;
                    }
                }
            };
            (timer.callback)();
        }
    }
}

impl Viewport for SimHost {
    fn inner_size(&self) -> Option<Dimensions> {
        let state = self.state.lock();
        if state.inner_size_available {
            Some(Dimensions {
                width: state.width,
                height: state.height,
            })
        } else {
            None
        }
    }

    fn client_size(&self) -> Option<Dimensions> {
        let state = self.state.lock();
        Some(Dimensions {
            width: state.width,
            height: state.height,
        })
    }
}

impl Capabilities for SimHost {
    fn pixel_ratio(&self) -> Option<f64> {
        self.state.lock().pixel_ratio
    }

    fn touch_capable(&self) -> bool {
        self.state.lock().touch
    }

    fn orientation_events(&self) -> bool {
        self.state.lock().orientation_events
    }
}

impl Scheduler for SimHost {
    fn now(&self) -> Instant {
        self.state.lock().now
    }

    fn schedule(&self, delay: Duration, callback: Box<dyn FnOnce() + Send>) -> TimerToken {
        let mut state = self.state.lock();
        let token = state.next_token;
        state.next_token += 1;
        let due = state.now + delay;
        state.timers.push(Timer {
            token,
            due,
            callback,
        });
        token
    }

    fn cancel(&self, token: TimerToken) {
        self.state.lock().timers.retain(|t| t.token != token);
    }
}

impl SignalSource for SimHost {
    fn bind_resize(&self, handler: SignalHandler) {
        self.state.lock().resize_handlers.push(handler);
    }

    fn bind_orientation_change(&self, handler: SignalHandler) {
        self.state.lock().orientation_handlers.push(handler);
    }
}
