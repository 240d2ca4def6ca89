//! Tracker Configuration
//!
//! Construction input is an explicit typed struct rather than a bag of
//! dynamic fields: every field is named, defaulted, and unknown keys in
//! deserialized input are rejected (`deny_unknown_fields`), not silently
//! absorbed.
//!
//! Thresholds are given either as a name→width mapping (an `IndexMap`,
//! so the mapping's iteration order is the source order) or as a plain
//! width list.

use std::time::Duration;

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer};

/// How the threshold table is specified.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ThresholdSpec {
    /// Bucket name → width boundary, in source order.
    Named(IndexMap<String, u32>),
    /// Anonymous width boundaries.
    Widths(Vec<u32>),
}

impl Default for ThresholdSpec {
    fn default() -> Self {
        let mut map = IndexMap::new();
        map.insert("mobile".to_owned(), 400);
        map.insert("tablet".to_owned(), 768);
        map.insert("standard".to_owned(), 980);
        Self::Named(map)
    }
}

/// Tracker configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct Config {
    /// The threshold table specification. An empty spec falls back to
    /// the defaults.
    pub thresholds: ThresholdSpec,

    /// The rate-limit interval for viewport-change signals.
    #[serde(rename = "debounce_ms", deserialize_with = "duration_from_millis")]
    pub debounce: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            thresholds: ThresholdSpec::default(),
            debounce: Duration::from_millis(100),
        }
    }
}

impl Config {
    /// Configuration with a named threshold mapping.
    pub fn named<S, I>(pairs: I) -> Self
    where
        S: Into<String>,
        I: IntoIterator<Item = (S, u32)>,
    {
        Self {
            thresholds: ThresholdSpec::Named(
                pairs
                    .into_iter()
                    .map(|(name, width)| (name.into(), width))
                    .collect(),
            ),
            ..Self::default()
        }
    }

    /// Configuration with anonymous width boundaries.
    pub fn widths(widths: Vec<u32>) -> Self {
        Self {
            thresholds: ThresholdSpec::Widths(widths),
            ..Self::default()
        }
    }

    /// Override the rate-limit interval.
    pub fn debounce(mut self, interval: Duration) -> Self {
        self.debounce = interval;
        self
    }
}

fn duration_from_millis<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Duration::from_millis(u64::deserialize(deserializer)?))
}
