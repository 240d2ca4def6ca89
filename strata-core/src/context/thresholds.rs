//! Threshold Table
//!
//! An ordered list of width boundaries, optionally named, defining the
//! bucket edges. The widths are kept strictly ascending at all times:
//! construction sorts its input and `add` splices at the sorted position.
//! Boundaries are never removed once added.
//!
//! # Naming Policy
//!
//! A table is either fully named or fully anonymous. An `add` call that
//! would mix the two states is rejected with
//! [`ContextError::MixedThresholds`] and leaves the table untouched,
//! rather than letting the name sequence silently fall out of step with
//! the widths.

use smallvec::SmallVec;

use super::config::ThresholdSpec;
use crate::error::ContextError;

/// A boundary handed to [`ThresholdTable::add`]: either a bare width or
/// a name+width pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ThresholdEntry {
    /// An anonymous boundary.
    Width(u32),
    /// A named boundary.
    Named { name: String, width: u32 },
}

impl ThresholdEntry {
    /// An anonymous boundary at `width`.
    pub fn width(width: u32) -> Self {
        Self::Width(width)
    }

    /// A named boundary at `width`.
    pub fn named(name: impl Into<String>, width: u32) -> Self {
        Self::Named {
            name: name.into(),
            width,
        }
    }
}

/// The ordered set of width boundaries defining bucket edges.
///
/// Invariants: `widths` is ascending, and `names` is either empty
/// (anonymous table) or exactly as long as `widths` (named table). The
/// table is never empty; an empty spec falls back to the defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThresholdTable {
    widths: SmallVec<[u32; 8]>,
    names: Vec<String>,
}

impl ThresholdTable {
    /// The default table: mobile 400, tablet 768, standard 980.
    pub fn defaults() -> Self {
        Self {
            widths: SmallVec::from_slice(&[400, 768, 980]),
            names: vec![
                "mobile".to_owned(),
                "tablet".to_owned(),
                "standard".to_owned(),
            ],
        }
    }

    /// Build a table from a threshold spec.
    ///
    /// Named pairs are taken in the mapping's iteration order and then
    /// stably sorted ascending by width; plain width lists are sorted
    /// ascending. An empty spec falls back silently to the defaults.
    pub fn from_spec(spec: &ThresholdSpec) -> Self {
        match spec {
            ThresholdSpec::Named(map) if map.is_empty() => {
                tracing::debug!("empty threshold spec, falling back to defaults");
                Self::defaults()
            }
            ThresholdSpec::Widths(widths) if widths.is_empty() => {
                tracing::debug!("empty threshold spec, falling back to defaults");
                Self::defaults()
            }
            ThresholdSpec::Named(map) => {
                let mut pairs: Vec<(String, u32)> = map
                    .iter()
                    .map(|(name, width)| (name.clone(), *width))
                    .collect();
                pairs.sort_by_key(|(_, width)| *width);
                Self {
                    widths: pairs.iter().map(|(_, width)| *width).collect(),
                    names: pairs.into_iter().map(|(name, _)| name).collect(),
                }
            }
            ThresholdSpec::Widths(widths) => {
                let mut sorted: SmallVec<[u32; 8]> = SmallVec::from_slice(widths);
                sorted.sort_unstable();
                Self {
                    widths: sorted,
                    names: Vec::new(),
                }
            }
        }
    }

    /// The bucket a width falls into: the smallest index `i` with
    /// `width <= widths[i]`, clamped to the last bucket when the width
    /// is above every boundary. Single-element tables always classify
    /// to index 0.
    pub fn bucket_index(&self, width: u32) -> usize {
        self.widths
            .iter()
            .position(|&boundary| width <= boundary)
            .unwrap_or(self.widths.len().saturating_sub(1))
    }

    /// Insert a new boundary at its sorted position.
    ///
    /// Uses the same ascending search as classification, except a width
    /// above every boundary is appended at the end rather than clamped,
    /// so the ascending invariant survives. Returns
    /// [`ContextError::MixedThresholds`] when the entry's naming does not
    /// match the table's.
    pub fn add(&mut self, entry: ThresholdEntry) -> Result<(), ContextError> {
        match entry {
            ThresholdEntry::Width(width) => {
                if self.is_named() {
                    return Err(ContextError::MixedThresholds);
                }
                let index = self.insertion_index(width);
                self.widths.insert(index, width);
                tracing::debug!(width, index, "threshold added");
            }
            ThresholdEntry::Named { name, width } => {
                if !self.is_named() {
                    return Err(ContextError::MixedThresholds);
                }
                let index = self.insertion_index(width);
                self.widths.insert(index, width);
                self.names.insert(index, name.clone());
                tracing::debug!(width, index, name = %name, "threshold added");
            }
        }
        debug_assert!(self.widths.windows(2).all(|pair| pair[0] <= pair[1]));
        Ok(())
    }

    fn insertion_index(&self, width: u32) -> usize {
        self.widths
            .iter()
            .position(|&boundary| width <= boundary)
            .unwrap_or(self.widths.len())
    }

    /// Whether every boundary carries a name.
    pub fn is_named(&self) -> bool {
        !self.names.is_empty()
    }

    /// The boundary widths, ascending.
    pub fn widths(&self) -> &[u32] {
        &self.widths
    }

    /// The boundary names, parallel to [`widths`](Self::widths); empty
    /// for anonymous tables.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// The boundary value at `index`. Index must be below
    /// [`len`](Self::len).
    pub fn width_at(&self, index: usize) -> u32 {
        self.widths[index]
    }

    /// The name at `index`, or `None` for anonymous tables.
    pub fn name_at(&self, index: usize) -> Option<&str> {
        self.names.get(index).map(String::as_str)
    }

    /// Number of boundaries.
    pub fn len(&self) -> usize {
        self.widths.len()
    }

    /// Always `false`: the table is never empty.
    pub fn is_empty(&self) -> bool {
        self.widths.is_empty()
    }
}

impl Default for ThresholdTable {
    fn default() -> Self {
        Self::defaults()
    }
}
