//! Recommended default unit for a food
//!
//! Used to pre-fill a unit selector. The recommendation is descriptive, it is
//! not scaled by any quantity.

use serde::{Deserialize, Serialize};

use crate::matching::{normalize, Matcher};

/// Suggested unit for a food
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortionRecommendation {
    /// Label to pre-select, like `"bottle (650ml)"`
    pub canonical_unit_label: String,
    /// Weight of one unit
    pub unit_size_grams: f64,
    /// Why this unit was chosen, for display
    pub explanatory_note: String,
}

/// A food pattern and the recommendation it produces
#[derive(Debug, Clone)]
pub struct PortionRule {
    pub(crate) matcher: Matcher,
    pub(crate) recommendation: PortionRecommendation,
}

impl PortionRule {
    pub fn recommendation(&self) -> &PortionRecommendation {
        &self.recommendation
    }
}

/// Ordered [`PortionRule`]s with an unconditional fallback
#[derive(Debug, Clone)]
pub struct PortionRules {
    pub(crate) rules: Vec<PortionRule>,
    pub(crate) fallback: PortionRecommendation,
}

impl Default for PortionRules {
    fn default() -> Self {
        Self {
            rules: Vec::new(),
            fallback: default_fallback(),
        }
    }
}

pub(crate) fn default_fallback() -> PortionRecommendation {
    PortionRecommendation {
        canonical_unit_label: "serving (100g)".to_string(),
        unit_size_grams: 100.0,
        explanatory_note: "No specific portion data, using a standard 100g serving".to_string(),
    }
}

impl PortionRules {
    /// Number of rules, without the fallback
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// The recommendation used when no rule matches
    pub fn fallback(&self) -> &PortionRecommendation {
        &self.fallback
    }

    /// First matching rule, if any
    pub fn find(&self, food_name: &str) -> Option<&PortionRule> {
        let name = normalize(food_name);
        self.rules.iter().find(|r| r.matcher.is_match(&name))
    }

    /// Recommend a unit for `food_name`. Never fails.
    pub fn recommend(&self, food_name: &str) -> PortionRecommendation {
        match self.find(food_name) {
            Some(rule) => rule.recommendation.clone(),
            None => {
                tracing::trace!(food_name, "no portion rule, using fallback");
                self.fallback.clone()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule(patterns: &[&str], exclude: &[&str], unit: &str, grams: f64) -> PortionRule {
        PortionRule {
            matcher: Matcher::new(patterns, exclude).unwrap(),
            recommendation: PortionRecommendation {
                canonical_unit_label: unit.to_string(),
                unit_size_grams: grams,
                explanatory_note: format!("{unit} note"),
            },
        }
    }

    fn rules() -> PortionRules {
        PortionRules {
            rules: vec![
                rule(&["kingfisher"], &[], "bottle (650ml)", 650.0),
                rule(&["beer"], &["ginger beer"], "bottle (330ml)", 330.0),
                rule(&["mango"], &["lassi"], "medium (200g)", 200.0),
                rule(&["lassi"], &[], "glass (250ml)", 250.0),
            ],
            fallback: default_fallback(),
        }
    }

    #[test]
    fn first_match_wins() {
        let r = rules().recommend("Kingfisher Beer");
        assert_eq!(r.canonical_unit_label, "bottle (650ml)");
        assert_eq!(r.unit_size_grams, 650.0);
    }

    #[test]
    fn exclude_skips_to_next_rule() {
        assert_eq!(
            rules().recommend("mango lassi").canonical_unit_label,
            "glass (250ml)"
        );
        assert_eq!(rules().recommend("ginger beer"), default_fallback());
    }

    #[test]
    fn fallback() {
        let r = rules().recommend("unknown-xyz-food");
        assert_eq!(r.canonical_unit_label, "serving (100g)");
        assert_eq!(r.unit_size_grams, 100.0);
        assert!(!r.explanatory_note.is_empty());
        assert_eq!(PortionRules::default().recommend("beer"), default_fallback());
    }
}
