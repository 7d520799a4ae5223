//! Portion and nutrition resolution for free-form food logging.
//!
//! Turns a food name, a unit label and a quantity into calories and
//! macronutrients, recommends a sensible default unit for a food, and checks
//! if a result has a plausible calorie density.
//!
//! Also includes:
//! - Canonical unit weights with per food corrections (a single almond is not
//!   a generic `piece`).
//! - Extraction of explicit amounts from labels like `"bottle (650ml)"`.
//! - Layered configuration tables, so a locale can extend the bundled data.
//!
//! # Basic usage
//! For a one off lookup use [`calculate()`], [`recommend_portion`] and
//! [`validate()`]. They share a lazily built default engine.
//!
//! ```rust
//! use portion_engine::{NutritionPer100, NutritionSource};
//!
//! let rice = NutritionPer100::new(130.0, 2.7, 28.0, 0.3);
//! let result = portion_engine::calculate("rice", "150g", 1.0, &rice, None);
//! assert_eq!(result.calories, 195.0);
//! assert_eq!(result.gram_equivalent_label, "~150g");
//! assert_eq!(result.source_used, NutritionSource::ExtractedUnit);
//! ```
//!
//! To change the tables, build an engine yourself and reuse it:
//!
//! ```rust
//! # use portion_engine::{PortionEngine, tables::TablesFile};
//! let local = TablesFile::from_toml_str("[units]\nglass = 200")?;
//! let engine = PortionEngine::builder()
//!     .with_bundled_tables()
//!     .with_tables_file(local)
//!     .finish()?;
//! assert_eq!(engine.resolve_base_grams("glass"), 200.0);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # Approximations
//! Volumes are converted with 1 ml = 1 g. Nutrition data is expected per
//! 100 g, or per 100 ml for liquids.
//!
//! # Caller contract
//! Quantities should be positive and nutrition values non negative. Other
//! values are not rejected, they are logged with [`tracing`] and computed
//! anyway.

#![warn(rustdoc::broken_intra_doc_links, clippy::doc_markdown)]

#[cfg(doc)]
pub mod _features {
    //! This lib has 1 feature, enabled by default:
    //! - `bundled_tables`. Includes a tables file with common units, portion
    //!   rules and calorie density bands for Indian and western foods. The
    //!   default [`PortionEngine`](crate::PortionEngine) uses them if this
    //!   feature is enabled. Without it, [`TablesFile`](crate::tables::TablesFile)
    //!   can't be parsed from TOML.
}

pub mod calculate;
pub mod extract;
pub mod matching;
pub mod recommend;
pub mod tables;
pub mod units;
pub mod validate;

use once_cell::sync::Lazy;

use recommend::PortionRules;
use units::MultiplierRules;
use validate::PlausibilityRules;

pub use calculate::{
    NutritionPer100, NutritionResult, NutritionSource, NutritionTotals, SmartPortion,
};
pub use extract::extract_grams_or_ml;
pub use recommend::PortionRecommendation;
pub use tables::{EngineBuilder, EngineBuilderError};
pub use units::UnitTable;
pub use validate::{FoodCategory, Validation};

/// Resolves portions and nutrition with a set of tables
///
/// Building one compiles every pattern of the tables, so create it once and
/// reuse it. It is immutable and can be shared between threads.
///
/// [`PortionEngine::default`] uses the bundled tables.
#[derive(Debug, Clone)]
pub struct PortionEngine {
    pub(crate) units: UnitTable,
    pub(crate) multipliers: MultiplierRules,
    pub(crate) portions: PortionRules,
    pub(crate) plausibility: PlausibilityRules,
}

impl PortionEngine {
    /// Start a new [`EngineBuilder`]
    pub fn builder() -> EngineBuilder {
        EngineBuilder::new()
    }

    /// An engine without tables
    ///
    /// Every unit weighs 100 g, there are no multipliers, every food gets the
    /// fallback recommendation and is checked against the grain band.
    pub fn empty() -> Self {
        Self {
            units: UnitTable::default(),
            multipliers: MultiplierRules::default(),
            portions: PortionRules::default(),
            plausibility: PlausibilityRules::default(),
        }
    }

    /// An engine with the bundled tables
    ///
    /// This is only available with the `bundled_tables` feature.
    #[cfg(feature = "bundled_tables")]
    pub fn bundled() -> Self {
        Self::builder()
            .with_bundled_tables()
            .finish()
            .expect("bundled tables are valid")
    }

    pub fn unit_table(&self) -> &UnitTable {
        &self.units
    }

    pub fn multiplier_rules(&self) -> &MultiplierRules {
        &self.multipliers
    }

    pub fn portion_rules(&self) -> &PortionRules {
        &self.portions
    }

    pub fn plausibility_rules(&self) -> &PlausibilityRules {
        &self.plausibility
    }

    /// Weight of one `unit_label`, see [`UnitTable::resolve_base_grams`]
    pub fn resolve_base_grams(&self, unit_label: &str) -> f64 {
        self.units.resolve_base_grams(unit_label)
    }

    /// Correction for `food_name` in `unit_label`, `1.0` when no rule matches
    pub fn category_multiplier(&self, food_name: &str, unit_label: &str) -> f64 {
        self.multipliers.category_multiplier(food_name, unit_label)
    }

    /// Nutrition of `quantity` × `unit_label` of a food
    ///
    /// See [`calculate`](mod@crate::calculate) for how the weight is resolved.
    #[tracing::instrument(level = "debug", name = "calculate", skip(self, base, smart_portion))]
    pub fn calculate(
        &self,
        food_name: &str,
        unit_label: &str,
        quantity: f64,
        base: &NutritionPer100,
        smart_portion: Option<&SmartPortion>,
    ) -> NutritionResult {
        calculate::calculate(
            &self.units,
            &self.multipliers,
            food_name,
            unit_label,
            quantity,
            base,
            smart_portion,
        )
    }

    /// Default unit for a food. Never fails.
    #[tracing::instrument(level = "debug", name = "recommend", skip(self))]
    pub fn recommend_portion(&self, food_name: &str) -> PortionRecommendation {
        self.portions.recommend(food_name)
    }

    /// Check the calorie density of `calories` in `total_grams` of a food
    #[tracing::instrument(level = "debug", name = "validate", skip(self))]
    pub fn validate(&self, food_name: &str, calories: f64, total_grams: f64) -> Validation {
        self.plausibility.validate(food_name, calories, total_grams)
    }

    /// Same as [`Self::validate`] with the values of a [`NutritionResult`]
    pub fn validate_result(&self, food_name: &str, result: &NutritionResult) -> Validation {
        self.validate(food_name, result.calories, result.total_grams)
    }
}

#[cfg(feature = "bundled_tables")]
impl Default for PortionEngine {
    /// Same as [`PortionEngine::bundled`]
    fn default() -> Self {
        Self::bundled()
    }
}

#[cfg(not(feature = "bundled_tables"))]
impl Default for PortionEngine {
    /// Same as [`PortionEngine::empty`]
    fn default() -> Self {
        Self::empty()
    }
}

static DEFAULT_ENGINE: Lazy<PortionEngine> = Lazy::new(PortionEngine::default);

/// The engine used by the free functions of this crate
///
/// It's [`PortionEngine::default`], built the first time it's needed.
pub fn default_engine() -> &'static PortionEngine {
    &DEFAULT_ENGINE
}

/// Calculate nutrition with the [`default_engine`]
///
/// See [`PortionEngine::calculate`].
pub fn calculate(
    food_name: &str,
    unit_label: &str,
    quantity: f64,
    base: &NutritionPer100,
    smart_portion: Option<&SmartPortion>,
) -> NutritionResult {
    default_engine().calculate(food_name, unit_label, quantity, base, smart_portion)
}

/// Recommend a unit with the [`default_engine`]
///
/// See [`PortionEngine::recommend_portion`].
pub fn recommend_portion(food_name: &str) -> PortionRecommendation {
    default_engine().recommend_portion(food_name)
}

/// Validate calorie density with the [`default_engine`]
///
/// See [`PortionEngine::validate`].
pub fn validate(food_name: &str, calories: f64, total_grams: f64) -> Validation {
    default_engine().validate(food_name, calories, total_grams)
}
