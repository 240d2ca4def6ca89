//! Context Classification
//!
//! This module implements the core of the tracker: the threshold table
//! that defines bucket edges, the configuration it is built from, the
//! published context snapshot, and the tracker that ties them to a host
//! environment.
//!
//! # Concepts
//!
//! ## Buckets
//!
//! A bucket is the discrete classification the current viewport width
//! falls into: the smallest threshold the width does not exceed, clamped
//! to the last bucket for widths above every boundary. Buckets are
//! identified by index and, for named tables, by name.
//!
//! ## Snapshots
//!
//! The snapshot is the last-published view of the environment: pixel
//! ratio, interaction mode, bucket name, and boundary value. It is
//! replaced wholesale whenever the bucket changes and frozen in between,
//! even if pixel ratio or interaction mode drift independently of width.
//!
//! ## Change Detection
//!
//! An evaluation pass re-reads the viewport, recomputes the bucket index,
//! and fires a `change` event only when the index actually moved. Every
//! pixel of resize updates the cached dimensions; only bucket transitions
//! notify listeners.

mod config;
mod snapshot;
mod thresholds;
mod tracker;

pub use config::{Config, ThresholdSpec};
pub use snapshot::{BucketName, ContextSnapshot, Interaction};
pub use thresholds::{ThresholdEntry, ThresholdTable};
pub use tracker::{ContextTracker, Field, FieldValue};
