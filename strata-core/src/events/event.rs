//! Event Records
//!
//! A [`ContextEvent`] is what listeners receive. For the `change` event it
//! carries the freshly rebuilt context snapshot plus the raw trigger that
//! engaged the evaluation, so a listener can tell a resize apart from an
//! orientation flip.

use crate::context::ContextSnapshot;

/// The event type fired when the derived bucket changes.
pub const CHANGE: &str = "change";

/// The raw signal that engaged an evaluation pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    /// A viewport resize signal from the host.
    Resize,
    /// An orientation-change signal from the host.
    OrientationChange,
    /// A direct call to `contextualize`, outside any host signal.
    Manual,
}

/// An event delivered to registered listeners.
///
/// Constructed either as a minimal record from a bare type name (via
/// `From<&str>`) or as a full record with snapshot and trigger attached.
#[derive(Debug, Clone)]
pub struct ContextEvent {
    /// The event-type name, e.g. [`CHANGE`].
    pub kind: String,
    /// The snapshot published by this event, if any.
    pub snapshot: Option<ContextSnapshot>,
    /// The signal that caused the evaluation, if any.
    pub trigger: Option<Trigger>,
}

impl ContextEvent {
    /// Create a minimal event record with only a type name.
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            snapshot: None,
            trigger: None,
        }
    }
}

impl From<&str> for ContextEvent {
    fn from(kind: &str) -> Self {
        Self::new(kind)
    }
}
