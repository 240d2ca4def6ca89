//! Strata Core
//!
//! This crate provides the core runtime for the Strata responsive context
//! tracker. It implements:
//!
//! - A threshold table of named or anonymous width boundaries
//! - Bucket classification and change detection over viewport signals
//! - A leading+trailing debounce over the host's timer primitive
//! - Synchronous, ordered `change` notification to registered listeners
//!
//! The tracker never touches a real host environment directly: viewport
//! queries, capability probes, signal delivery, and timers all arrive
//! through injected collaborator traits, which keeps the engine fully
//! testable in-process.
//!
//! # Architecture
//!
//! The crate is organized into several modules:
//!
//! - `context`: threshold table, configuration, snapshot, and the tracker
//! - `events`: event records, triggers, and the listener registry
//! - `host`: collaborator traits plus a simulated host implementation
//! - `timing`: the rate limiter wrapping raw change signals
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use strata_core::context::{Config, ContextTracker};
//! use strata_core::events::CHANGE;
//! use strata_core::host::{sim::SimHost, HostEnv};
//!
//! let host = Arc::new(SimHost::new(320, 480));
//! let tracker = ContextTracker::new(Config::default(), HostEnv::shared(host.clone()));
//!
//! tracker.on(
//!     CHANGE,
//!     Arc::new(|event| {
//!         if let Some(snapshot) = &event.snapshot {
//!             println!("now in `{}` (≤ {}px)", snapshot.name, snapshot.threshold);
//!         }
//!     }),
//! );
//!
//! // Crossing the tablet boundary fires the listener once the
//! // rate-limited evaluation runs.
//! host.resize(800, 600);
//! host.advance(std::time::Duration::from_millis(200));
//! ```

pub mod context;
pub mod error;
pub mod events;
pub mod host;
pub mod timing;
