//! Nutrition of a logged amount of food
//!
//! The result is resolved from the first applicable source:
//! 1. [`SmartPortion`] estimate, when it has both weight and calories.
//! 2. An amount written in the unit label, see [`extract_grams_or_ml`].
//! 3. The [`UnitTable`] weight times the category multiplier.

use serde::{Deserialize, Serialize};

use crate::{
    extract::extract_grams_or_ml,
    units::{MultiplierRules, UnitTable},
};

/// Nutrition per 100 g (or 100 ml) of a food
///
/// All values are expected to be non negative.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct NutritionPer100 {
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
}

impl NutritionPer100 {
    pub fn new(calories: f64, protein: f64, carbs: f64, fat: f64) -> Self {
        Self {
            calories,
            protein,
            carbs,
            fat,
        }
    }

    /// Nutrition of `grams` of the food
    fn for_grams(&self, grams: f64) -> Macros {
        let f = grams / 100.0;
        Macros {
            calories: self.calories * f,
            protein: self.protein * f,
            carbs: self.carbs * f,
            fat: self.fat * f,
        }
    }

    fn has_negative(&self) -> bool {
        [self.calories, self.protein, self.carbs, self.fat]
            .iter()
            .any(|v| *v < 0.0)
    }
}

/// Estimated real serving for one unit of a food, from image recognition
///
/// Nutrition values are already scaled to [`portion_grams`](Self::portion_grams).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SmartPortion {
    pub portion_grams: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub calories: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protein: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub carbs: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fat: Option<f64>,
    /// Confidence of the estimate, informative only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
}

impl SmartPortion {
    /// An estimate with only weight and calories
    pub fn new(portion_grams: f64, calories: f64) -> Self {
        Self {
            portion_grams: Some(portion_grams),
            calories: Some(calories),
            ..Default::default()
        }
    }

    /// The weight and calories if both are present
    fn usable(&self) -> Option<(f64, f64)> {
        Some((self.portion_grams?, self.calories?))
    }
}

/// Which source determined a [`NutritionResult`]
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
pub enum NutritionSource {
    SmartPortion,
    ExtractedUnit,
    TableLookup,
}

/// Calculated nutrition of a logged amount
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NutritionResult {
    /// Rounded to one decimal
    pub calories: f64,
    /// Rounded to one decimal
    pub protein: f64,
    /// Rounded to one decimal
    pub carbs: f64,
    /// Rounded to one decimal
    pub fat: f64,
    /// Not rounded
    pub total_grams: f64,
    /// Display weight, like `~150g`
    pub gram_equivalent_label: String,
    pub source_used: NutritionSource,
}

#[derive(Debug, Clone, Copy, Default)]
struct Macros {
    calories: f64,
    protein: f64,
    carbs: f64,
    fat: f64,
}

impl Macros {
    fn scale(self, factor: f64) -> Self {
        Self {
            calories: self.calories * factor,
            protein: self.protein * factor,
            carbs: self.carbs * factor,
            fat: self.fat * factor,
        }
    }
}

/// Round to one decimal place
///
/// ```
/// # use portion_engine::calculate::round1;
/// assert_eq!(round1(195.04), 195.0);
/// assert_eq!(round1(0.25), 0.3);
/// ```
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Format a weight for display: `~0.5g` under a gram, `~150g` otherwise.
pub fn gram_label(grams: f64) -> String {
    if grams < 1.0 {
        format!("~{grams:.1}g")
    } else {
        format!("~{}g", grams.round())
    }
}

pub(crate) fn calculate(
    units: &UnitTable,
    multipliers: &MultiplierRules,
    food_name: &str,
    unit_label: &str,
    quantity: f64,
    base: &NutritionPer100,
    smart_portion: Option<&SmartPortion>,
) -> NutritionResult {
    if !quantity.is_finite() || quantity <= 0.0 {
        tracing::warn!(quantity, food_name, "quantity should be positive");
    }
    if base.has_negative() {
        tracing::warn!(?base, food_name, "negative nutrition values");
    }

    let smart = smart_portion.and_then(|sp| Some((sp, sp.usable()?)));
    let (per_unit, unit_grams, source) = match smart {
        Some((sp, (portion_grams, calories))) => {
            let derived = base.for_grams(portion_grams);
            let per_unit = Macros {
                calories,
                protein: sp.protein.unwrap_or(derived.protein),
                carbs: sp.carbs.unwrap_or(derived.carbs),
                fat: sp.fat.unwrap_or(derived.fat),
            };
            (per_unit, portion_grams, NutritionSource::SmartPortion)
        }
        None => {
            let (grams, source) = match extract_grams_or_ml(unit_label) {
                Some(grams) => (grams, NutritionSource::ExtractedUnit),
                None => {
                    let base_grams = units.resolve_base_grams(unit_label);
                    let multiplier = multipliers.category_multiplier(food_name, unit_label);
                    tracing::trace!(base_grams, multiplier, "table lookup");
                    (base_grams * multiplier, NutritionSource::TableLookup)
                }
            };
            (base.for_grams(grams), grams, source)
        }
    };
    tracing::trace!(%source, unit_grams, "resolved unit weight");

    let total = per_unit.scale(quantity);
    let total_grams = unit_grams * quantity;
    NutritionResult {
        calories: round1(total.calories),
        protein: round1(total.protein),
        carbs: round1(total.carbs),
        fat: round1(total.fat),
        total_grams,
        gram_equivalent_label: gram_label(total_grams),
        source_used: source,
    }
}

/// Running totals of several [`NutritionResult`]s, like the items of a meal
///
/// Adds the rounded values of each result and rounds again when read, so
/// the totals match what the user sees per item.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NutritionTotals {
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
    pub total_grams: f64,
    pub items: usize,
}

impl NutritionTotals {
    /// Add a result to the totals
    pub fn add(&mut self, result: &NutritionResult) {
        self.calories += result.calories;
        self.protein += result.protein;
        self.carbs += result.carbs;
        self.fat += result.fat;
        self.total_grams += result.total_grams;
        self.items += 1;
    }

    /// Totals with every nutrition field rounded to one decimal
    pub fn rounded(&self) -> Self {
        Self {
            calories: round1(self.calories),
            protein: round1(self.protein),
            carbs: round1(self.carbs),
            fat: round1(self.fat),
            ..*self
        }
    }
}

impl std::ops::Add<&NutritionResult> for NutritionTotals {
    type Output = NutritionTotals;

    fn add(mut self, rhs: &NutritionResult) -> Self::Output {
        NutritionTotals::add(&mut self, rhs);
        self
    }
}

impl<'a> std::iter::Sum<&'a NutritionResult> for NutritionTotals {
    fn sum<I: Iterator<Item = &'a NutritionResult>>(iter: I) -> Self {
        iter.fold(Self::default(), |acc, r| acc + r).rounded()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matching::Matcher;
    use crate::units::CategoryMultiplierRule;
    use indexmap::IndexMap;
    use test_case::test_case;

    const RICE: NutritionPer100 = NutritionPer100 {
        calories: 130.0,
        protein: 2.7,
        carbs: 28.0,
        fat: 0.3,
    };

    fn units() -> UnitTable {
        UnitTable::new(IndexMap::from([
            ("piece".to_string(), 50.0),
            ("bowl".to_string(), 200.0),
            ("serving".to_string(), 100.0),
        ]))
    }

    fn multipliers() -> MultiplierRules {
        MultiplierRules(vec![CategoryMultiplierRule {
            foods: Matcher::new(["almond"], [""; 0]).unwrap(),
            units: Matcher::new(["piece"], [""; 0]).unwrap(),
            multiplier: 0.024,
        }])
    }

    fn calc(
        food: &str,
        unit: &str,
        quantity: f64,
        base: &NutritionPer100,
        smart: Option<&SmartPortion>,
    ) -> NutritionResult {
        calculate(&units(), &multipliers(), food, unit, quantity, base, smart)
    }

    #[test]
    fn extracted_unit() {
        let r = calc("rice", "medium portion (150g)", 1.0, &RICE, None);
        assert_eq!(r.source_used, NutritionSource::ExtractedUnit);
        assert_eq!(r.total_grams, 150.0);
        assert_eq!(r.calories, 195.0);
        assert_eq!(r.protein, 4.1);
        assert_eq!(r.carbs, 42.0);
        assert_eq!(r.fat, 0.5);
        assert_eq!(r.gram_equivalent_label, "~150g");
    }

    #[test]
    fn table_lookup_with_multiplier() {
        let almond = NutritionPer100::new(579.0, 21.0, 22.0, 50.0);
        let r = calc("almonds", "piece", 10.0, &almond, None);
        assert_eq!(r.source_used, NutritionSource::TableLookup);
        assert!((r.total_grams - 12.0).abs() < 1e-9);
        assert_eq!(r.calories, 69.5);
        assert_eq!(r.gram_equivalent_label, "~12g");
    }

    #[test]
    fn smart_portion_wins() {
        let sp = SmartPortion {
            portion_grams: Some(180.0),
            calories: Some(250.0),
            protein: Some(5.0),
            ..Default::default()
        };
        let r = calc("rice", "medium portion (150g)", 2.0, &RICE, Some(&sp));
        assert_eq!(r.source_used, NutritionSource::SmartPortion);
        assert_eq!(r.calories, 500.0);
        assert_eq!(r.protein, 10.0);
        // missing macros come from the base scaled to the portion
        assert_eq!(r.carbs, round1(28.0 * 1.8 * 2.0));
        assert_eq!(r.fat, round1(0.3 * 1.8 * 2.0));
        assert_eq!(r.total_grams, 360.0);
    }

    #[test_case(SmartPortion { portion_grams: Some(180.0), ..Default::default() } ; "no calories")]
    #[test_case(SmartPortion { calories: Some(250.0), ..Default::default() } ; "no weight")]
    fn incomplete_smart_portion_is_ignored(sp: SmartPortion) {
        let r = calc("rice", "bowl", 1.0, &RICE, Some(&sp));
        assert_eq!(r.source_used, NutritionSource::TableLookup);
        assert_eq!(r.total_grams, 200.0);
        assert_eq!(r.calories, 260.0);
    }

    #[test]
    fn unknown_everything_uses_serving() {
        let base = NutritionPer100::new(100.0, 1.0, 2.0, 3.0);
        let r = calc("unknown-xyz-food", "unknown-unit-label", 1.0, &base, None);
        assert_eq!(r.source_used, NutritionSource::TableLookup);
        assert_eq!(r.total_grams, 100.0);
        assert_eq!(r.calories, 100.0);
    }

    #[test]
    fn zero_quantity_is_not_rejected() {
        let r = calc("rice", "bowl", 0.0, &RICE, None);
        assert_eq!(r.calories, 0.0);
        assert_eq!(r.total_grams, 0.0);
    }

    #[test_case(0.5 => "~0.5g")]
    #[test_case(0.04 => "~0.0g")]
    #[test_case(1.0 => "~1g")]
    #[test_case(149.6 => "~150g")]
    #[test_case(650.0 => "~650g")]
    fn labels(grams: f64) -> String {
        gram_label(grams)
    }

    #[test]
    fn totals() {
        let a = calc("rice", "medium portion (150g)", 1.0, &RICE, None);
        let b = calc("rice", "bowl", 1.0, &RICE, None);
        let totals: NutritionTotals = [a, b].iter().sum();
        assert_eq!(totals.items, 2);
        assert_eq!(totals.calories, 455.0);
        assert_eq!(totals.total_grams, 350.0);
        assert_eq!(totals.protein, 9.5);
    }

    #[test]
    fn source_names() {
        assert_eq!(NutritionSource::SmartPortion.to_string(), "smartPortion");
        assert_eq!(
            "tableLookup".parse::<NutritionSource>().unwrap(),
            NutritionSource::TableLookup
        );
    }
}
