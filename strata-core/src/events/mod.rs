//! Event Plumbing
//!
//! This module implements the notification side of the tracker: the event
//! record delivered to listeners, the raw trigger that engaged an
//! evaluation, and the registry that maps event-type names to ordered
//! listener sequences.
//!
//! # Dispatch Contract
//!
//! Listeners for a type are invoked synchronously, in registration order,
//! with the event as their only argument. The same listener may be
//! registered more than once (it is then invoked once per registration).
//! Removal matches by `Arc` identity and removes the first occurrence
//! only. A listener that panics is not caught; the panic propagates to
//! whoever delivered the signal.

mod emitter;
mod event;

pub use emitter::{EventEmitter, Listener};
pub use event::{ContextEvent, Trigger, CHANGE};
