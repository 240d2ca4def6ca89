//! Error Types
//!
//! All fallible operations in the crate report through [`ContextError`].
//! Both variants are programming-contract violations rather than runtime
//! faults: missing host capabilities never error, they degrade to
//! documented defaults instead.

use thiserror::Error;

/// Errors reported by the context tracker.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ContextError {
    /// Dispatch was asked to fire an event whose type name could not be
    /// resolved. The dispatch attempt is halted; nothing is delivered.
    #[error("`{0}` is not a supported event")]
    UnsupportedEvent(String),

    /// An `add` call would leave the threshold table with some named and
    /// some anonymous boundaries. The table is either fully named or fully
    /// anonymous; mixing is rejected and the table is left untouched.
    #[error("cannot mix named and anonymous thresholds")]
    MixedThresholds,
}
