//! Context Snapshot
//!
//! The published summary of the current bucket. Owned exclusively by the
//! tracker and replaced wholesale on every bucket change; consumers only
//! ever see clones.

use std::fmt;

/// How the user interacts with the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interaction {
    /// A touch-capable signal is present.
    Touch,
    /// No touch signal; assume a pointing device.
    Mouse,
}

impl fmt::Display for Interaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Touch => write!(f, "touch"),
            Self::Mouse => write!(f, "mouse"),
        }
    }
}

/// The bucket identifier published in a snapshot: the name looked up in
/// the table for named tables, the raw index otherwise.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BucketName {
    Named(String),
    Index(usize),
}

impl fmt::Display for BucketName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Named(name) => write!(f, "{name}"),
            Self::Index(index) => write!(f, "{index}"),
        }
    }
}

/// The last-published view of the environment.
#[derive(Debug, Clone, PartialEq)]
pub struct ContextSnapshot {
    /// Device pixel ratio; `1.0` when the host has no such signal.
    pub pixel_ratio: f64,
    /// Touch or mouse interaction.
    pub interaction: Interaction,
    /// The current bucket, by name or raw index.
    pub name: BucketName,
    /// The boundary value of the current bucket.
    pub threshold: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_forms() {
        assert_eq!(Interaction::Touch.to_string(), "touch");
        assert_eq!(Interaction::Mouse.to_string(), "mouse");
        assert_eq!(BucketName::Named("tablet".to_owned()).to_string(), "tablet");
        assert_eq!(BucketName::Index(2).to_string(), "2");
    }
}
