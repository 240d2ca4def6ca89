//! Host Collaborators
//!
//! The tracker never probes a real environment. Everything it needs from
//! the host arrives through four injected collaborator traits:
//!
//! - [`Viewport`]: the current viewport dimensions, with a two-strategy
//!   fallback (an "inner dimensions" style query and a "client
//!   dimensions" style query).
//! - [`Capabilities`]: pixel density, touch support, and whether the host
//!   delivers orientation-change signals. Absent capabilities degrade to
//!   documented defaults rather than failing.
//! - [`Scheduler`]: a delay-based callback primitive plus a clock, used
//!   only by the rate limiter.
//! - [`SignalSource`]: delivery of resize and orientation-change signals.
//!   Adapters fold host-specific registration styles (modern vs. legacy)
//!   behind this trait.
//!
//! This keeps the engine fully testable without a host: the [`sim`]
//! module provides an in-memory implementation of all four traits with a
//! manual clock.

pub mod sim;

use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::events::Trigger;

/// Viewport width and height, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

/// Query for the host's current viewport size.
///
/// The engine tries [`inner_size`](Viewport::inner_size) first and falls
/// back to [`client_size`](Viewport::client_size) when it is unavailable.
pub trait Viewport: Send + Sync {
    /// The "inner dimensions" style query, if the host supports it.
    fn inner_size(&self) -> Option<Dimensions>;

    /// The "document element client dimensions" style fallback.
    fn client_size(&self) -> Option<Dimensions>;
}

/// Host capability description, read once per snapshot rebuild.
pub trait Capabilities: Send + Sync {
    /// Device pixel ratio. `None` means the host has no such signal and
    /// the snapshot defaults to `1.0`.
    fn pixel_ratio(&self) -> Option<f64>;

    /// Whether a touch-capable signal is present. `false` reports
    /// mouse interaction.
    fn touch_capable(&self) -> bool;

    /// Whether the host delivers orientation-change signals. When this
    /// is `false` the tracker does not bind to them.
    fn orientation_events(&self) -> bool;
}

/// Opaque identifier for a scheduled callback.
pub type TimerToken = u64;

/// The host's delay-based callback primitive.
///
/// Only the rate limiter uses this; no other operation suspends or
/// blocks. Implementations must hand out a fresh token per `schedule`
/// call and treat `cancel` of an unknown or already-fired token as a
/// no-op.
pub trait Scheduler: Send + Sync {
    /// The current time on the host's clock.
    fn now(&self) -> Instant;

    /// Run `callback` after `delay`.
    fn schedule(&self, delay: Duration, callback: Box<dyn FnOnce() + Send>) -> TimerToken;

    /// Cancel a pending callback.
    fn cancel(&self, token: TimerToken);
}

/// A handler bound to a host signal.
pub type SignalHandler = Arc<dyn Fn(Trigger) + Send + Sync>;

/// Delivery of viewport-change signals.
pub trait SignalSource: Send + Sync {
    /// Bind a handler to the resize-equivalent signal.
    fn bind_resize(&self, handler: SignalHandler);

    /// Bind a handler to the orientation-change-equivalent signal.
    ///
    /// Called only when [`Capabilities::orientation_events`] reports
    /// support; implementations without the signal may ignore this.
    fn bind_orientation_change(&self, handler: SignalHandler);
}

/// The bundle of collaborators a tracker is constructed with.
#[derive(Clone)]
pub struct HostEnv {
    pub viewport: Arc<dyn Viewport>,
    pub capabilities: Arc<dyn Capabilities>,
    pub scheduler: Arc<dyn Scheduler>,
    pub signals: Arc<dyn SignalSource>,
}

impl HostEnv {
    /// Assemble an environment from individual collaborators.
    pub fn new(
        viewport: Arc<dyn Viewport>,
        capabilities: Arc<dyn Capabilities>,
        scheduler: Arc<dyn Scheduler>,
        signals: Arc<dyn SignalSource>,
    ) -> Self {
        Self {
            viewport,
            capabilities,
            scheduler,
            signals,
        }
    }

    /// Split one object implementing all four collaborator traits into
    /// an environment. This is the common case for real host adapters
    /// and for [`sim::SimHost`].
    pub fn shared<H>(host: Arc<H>) -> Self
    where
        H: Viewport + Capabilities + Scheduler + SignalSource + 'static,
    {
        Self {
            viewport: host.clone(),
            capabilities: host.clone(),
            scheduler: host.clone(),
            signals: host,
        }
    }

    /// Current viewport size via the two-strategy fallback chain.
    pub fn viewport_size(&self) -> Option<Dimensions> {
        self.viewport
            .inner_size()
            .or_else(|| self.viewport.client_size())
    }
}

#[cfg(test)]
mod tests {
    use super::sim::SimHost;
    use super::*;

    #[test]
    fn viewport_size_prefers_inner_dimensions() {
        let host = Arc::new(SimHost::new(800, 600));
        let env = HostEnv::shared(host.clone());

        assert_eq!(
            env.viewport_size(),
            Some(Dimensions {
                width: 800,
                height: 600
            })
        );

        host.set_inner_size_available(false);
        // Falls back to the client-dimensions strategy.
        assert_eq!(
            env.viewport_size(),
            Some(Dimensions {
                width: 800,
                height: 600
            })
        );
    }
}
