use crate::matching::{normalize, Matcher};

/// Corrects the table weight of a unit for some foods
///
/// Applies when both the food name and the unit label match.
#[derive(Debug, Clone)]
pub struct CategoryMultiplierRule {
    pub(crate) foods: Matcher,
    pub(crate) units: Matcher,
    pub(crate) multiplier: f64,
}

impl CategoryMultiplierRule {
    /// The factor applied to the unit weight
    pub fn multiplier(&self) -> f64 {
        self.multiplier
    }

    /// Check the rule against a [`normalize`]d food name and unit label
    pub fn matches(&self, food_name: &str, unit_label: &str) -> bool {
        self.units.is_match(unit_label) && self.foods.is_match(food_name)
    }
}

/// Ordered list of [`CategoryMultiplierRule`], first match wins
#[derive(Debug, Clone, Default)]
pub struct MultiplierRules(pub(crate) Vec<CategoryMultiplierRule>);

impl MultiplierRules {
    /// Number of rules
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if there are no rules
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Get the rule that applies, if any
    pub fn find(&self, food_name: &str, unit_label: &str) -> Option<&CategoryMultiplierRule> {
        let food = normalize(food_name);
        let unit = normalize(unit_label);
        self.0.iter().find(|r| r.matches(&food, &unit))
    }

    /// Factor applied to the base weight of `unit_label` for `food_name`.
    ///
    /// `1.0` when no rule matches.
    pub fn category_multiplier(&self, food_name: &str, unit_label: &str) -> f64 {
        self.find(food_name, unit_label)
            .map_or(1.0, CategoryMultiplierRule::multiplier)
    }
}
