//! Calorie density plausibility check
//!
//! Flags results whose calories per gram fall outside the usual band for the
//! kind of food. It is advisory, nothing is corrected or rejected.

use serde::{Deserialize, Serialize};

use crate::matching::{normalize, Matcher};

/// Broad kind of food used to pick a calorie density band
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum FoodCategory {
    Vegetable,
    Fruit,
    Grain,
    Nut,
    Oil,
    Beverage,
}

/// Expected calories per gram, inclusive
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CalorieRange {
    pub min: f64,
    pub max: f64,
}

impl CalorieRange {
    pub fn contains(&self, calories_per_gram: f64) -> bool {
        (self.min..=self.max).contains(&calories_per_gram)
    }
}

impl std::fmt::Display for CalorieRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.1}-{:.1} cal/g", self.min, self.max)
    }
}

/// Outcome of [`PlausibilityRules::validate`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Validation {
    pub is_valid: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
    /// Category the food was checked against
    pub category: FoodCategory,
    /// [`None`] when it could not be computed
    pub calories_per_gram: Option<f64>,
    pub expected: CalorieRange,
}

#[derive(Debug, Clone)]
pub struct CategoryRule {
    pub(crate) category: FoodCategory,
    pub(crate) matcher: Matcher,
    pub(crate) range: CalorieRange,
}

impl CategoryRule {
    pub fn category(&self) -> FoodCategory {
        self.category
    }

    pub fn range(&self) -> CalorieRange {
        self.range
    }
}

/// Ordered category rules and the category for unmatched foods
#[derive(Debug, Clone)]
pub struct PlausibilityRules {
    pub(crate) rules: Vec<CategoryRule>,
    pub(crate) default_category: FoodCategory,
    pub(crate) default_range: CalorieRange,
}

/// Band used for unmatched foods when no rule defines the default category
pub const GRAIN_RANGE: CalorieRange = CalorieRange { min: 1.0, max: 4.0 };

impl Default for PlausibilityRules {
    fn default() -> Self {
        Self {
            rules: Vec::new(),
            default_category: FoodCategory::Grain,
            default_range: GRAIN_RANGE,
        }
    }
}

impl PlausibilityRules {
    pub fn rules(&self) -> &[CategoryRule] {
        &self.rules
    }

    /// Category and band for a food
    pub fn categorize(&self, food_name: &str) -> (FoodCategory, CalorieRange) {
        let name = normalize(food_name);
        self.rules
            .iter()
            .find(|r| r.matcher.is_match(&name))
            .map(|r| (r.category, r.range))
            .unwrap_or((self.default_category, self.default_range))
    }

    /// Check the calorie density of a calculated amount.
    ///
    /// A weight that is not positive cannot be checked and is reported as
    /// not valid.
    pub fn validate(&self, food_name: &str, calories: f64, total_grams: f64) -> Validation {
        let (category, expected) = self.categorize(food_name);

        if !(total_grams.is_finite() && total_grams > 0.0 && calories.is_finite()) {
            return Validation {
                is_valid: false,
                warning: Some(format!(
                    "Cannot check calorie density of {food_name} without a positive weight and finite calories"
                )),
                category,
                calories_per_gram: None,
                expected,
            };
        }

        let calories_per_gram = calories / total_grams;
        let is_valid = expected.contains(calories_per_gram);
        let warning = (!is_valid).then(|| {
            format!(
                "{food_name} has {calories_per_gram:.2} cal/g, expected {expected} for {category} foods"
            )
        });
        if let Some(warning) = &warning {
            tracing::debug!(%category, calories_per_gram, "{warning}");
        }

        Validation {
            is_valid,
            warning,
            category,
            calories_per_gram: Some(calories_per_gram),
            expected,
        }
    }
}
