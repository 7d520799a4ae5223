//! Canonical unit weights and category corrections
//!
//! A [`UnitTable`] maps generic unit labels (`cup`, `bowl`, `roti`,
//! `palm size`...) to the weight of one of them. The
//! [`MultiplierRules`] correct that weight for foods where the generic
//! value is far off, like a single almond compared with a generic `piece`.

use indexmap::IndexMap;
use serde::Serialize;

use crate::matching::normalize;

pub use multiplier::{CategoryMultiplierRule, MultiplierRules};

mod multiplier;

/// Unit looked up when a label is not in the table
pub const FALLBACK_UNIT: &str = "serving";
/// Weight of [`FALLBACK_UNIT`] when the table does not define it
pub const DEFAULT_SERVING_GRAMS: f64 = 100.0;

/// Immutable map of unit labels to grams
///
/// Keys are stored [`normalize`]d. Iteration follows the order the units were
/// declared in.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct UnitTable(IndexMap<String, f64>);

impl UnitTable {
    pub(crate) fn new(units: IndexMap<String, f64>) -> Self {
        Self(units)
    }

    /// Total number of units
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if there are no units
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate the known labels and their weight
    pub fn units(&self) -> impl Iterator<Item = (&str, f64)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Exact lookup of a label after normalization, and of its singular
    /// form.
    pub fn get(&self, unit_label: &str) -> Option<f64> {
        let key = normalize(unit_label);
        self.0
            .get(&key)
            .or_else(|| singular(&key).and_then(|s| self.0.get(s)))
            .or_else(|| key.strip_suffix('s').and_then(|s| self.0.get(s)))
            .copied()
    }

    /// Weight of one `unit_label`.
    ///
    /// Unknown labels resolve to the `serving` entry or, without it, to
    /// [`DEFAULT_SERVING_GRAMS`]. This never fails.
    pub fn resolve_base_grams(&self, unit_label: &str) -> f64 {
        self.get(unit_label).unwrap_or_else(|| {
            tracing::trace!(unit_label, "unknown unit, using serving");
            self.serving_grams()
        })
    }

    /// Weight of the `serving` fallback
    pub fn serving_grams(&self) -> f64 {
        self.0
            .get(FALLBACK_UNIT)
            .copied()
            .unwrap_or(DEFAULT_SERVING_GRAMS)
    }
}

fn singular(key: &str) -> Option<&str> {
    // "glasses" -> "glass", "pieces" is handled by the plain `s` strip
    key.strip_suffix("es").filter(|s| {
        s.ends_with("ss") || s.ends_with("sh") || s.ends_with("ch") || s.ends_with('x')
    })
}
