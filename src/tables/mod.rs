//! Configuration data used by [`EngineBuilder`]
//!
//! A [`TablesFile`] declares units, multipliers, portion rules and
//! plausibility categories. More than one file can be layered with the
//! builder, so a locale can extend or override the bundled data.

use indexmap::IndexMap;
use serde::Deserialize;

use crate::validate::FoodCategory;

pub use builder::{EngineBuilder, EngineBuilderError};

mod builder;

/// Tables configuration
///
/// This structure is designed for deserializing [TOML](https://toml.io/en/),
/// but you can try other formats supported by serde.
#[derive(Debug, Deserialize, Clone, PartialEq, Default)]
#[serde(deny_unknown_fields)]
pub struct TablesFile {
    /// Where the rules of this file go relative to the ones already added
    #[serde(default)]
    pub precedence: Precedence,
    /// Unit label to grams. Overrides units with the same label.
    #[serde(default)]
    pub units: IndexMap<String, f64>,
    /// Category multiplier rules
    #[serde(default)]
    pub multiplier: Vec<MultiplierEntry>,
    /// Portion recommendation rules
    #[serde(default)]
    pub portion: Vec<PortionEntry>,
    /// Recommendation when no portion rule matches
    pub fallback: Option<FallbackEntry>,
    /// Calorie density categories
    pub plausibility: Option<PlausibilityEntry>,
}

/// Where new rules are placed
#[derive(Debug, Default, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum Precedence {
    /// Before the current rules (*higher priority*)
    #[default]
    Before,
    /// After the current rules (*lower priority*)
    After,
}

/// A [`CategoryMultiplierRule`](crate::units::CategoryMultiplierRule)
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct MultiplierEntry {
    pub foods: Vec<String>,
    #[serde(default)]
    pub exclude: Vec<String>,
    pub units: Vec<String>,
    pub multiplier: f64,
}

/// A [`PortionRule`](crate::recommend::PortionRule)
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct PortionEntry {
    pub patterns: Vec<String>,
    #[serde(default)]
    pub exclude: Vec<String>,
    pub unit: String,
    pub grams: f64,
    pub note: String,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct FallbackEntry {
    pub unit: String,
    pub grams: f64,
    pub note: String,
}

/// Plausibility configuration
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct PlausibilityEntry {
    /// Category of foods no rule matches
    pub default: Option<FoodCategory>,
    #[serde(default)]
    pub category: Vec<CategoryEntry>,
}

/// A [`CategoryRule`](crate::validate::CategoryRule)
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct CategoryEntry {
    pub category: FoodCategory,
    pub patterns: Vec<String>,
    #[serde(default)]
    pub exclude: Vec<String>,
    pub min: f64,
    pub max: f64,
}

#[cfg(feature = "bundled_tables")]
static BUNDLED: &str = include_str!("../../tables.toml");

#[cfg(feature = "bundled_tables")]
impl TablesFile {
    /// Get the bundled tables file
    ///
    /// This is only available with the `bundled_tables` feature.
    pub fn bundled() -> Self {
        Self::from_toml_str(BUNDLED).expect("bundled tables.toml is valid")
    }

    /// Parse a tables file from TOML
    ///
    /// This is only available with the `bundled_tables` feature.
    pub fn from_toml_str(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }
}
