//! Rate Limiting
//!
//! Viewport-change signals arrive far faster than the tracker needs to
//! re-evaluate. The [`Debouncer`] collapses a burst into at most one
//! immediate evaluation plus one trailing evaluation carrying the latest
//! signal payload.

mod debounce;

pub use debounce::Debouncer;
