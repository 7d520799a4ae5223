use indexmap::IndexMap;
use thiserror::Error;

use super::{
    CategoryEntry, FallbackEntry, MultiplierEntry, PlausibilityEntry, PortionEntry, Precedence,
    TablesFile,
};
use crate::{
    matching::{normalize, Matcher},
    recommend::{default_fallback, PortionRecommendation, PortionRule, PortionRules},
    units::{CategoryMultiplierRule, MultiplierRules, UnitTable},
    validate::{CalorieRange, CategoryRule, FoodCategory, PlausibilityRules, GRAIN_RANGE},
    PortionEngine,
};

/// Builder to create a custom [`PortionEngine`]
///
/// The builder uses [`TablesFile`]s to configure the engine. More than one
/// file can be layered. Order matters: units are overwritten by later files
/// and rules are placed according to each file's [`Precedence`].
#[derive(Debug, Default)]
pub struct EngineBuilder {
    units: IndexMap<String, f64>,
    multipliers: Vec<MultiplierEntry>,
    portions: Vec<PortionEntry>,
    fallback: Option<FallbackEntry>,
    categories: Vec<CategoryEntry>,
    default_category: Option<FoodCategory>,
}

impl EngineBuilder {
    /// New empty builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Add the bundled tables to the builder
    ///
    /// This is only available with the `bundled_tables` feature.
    #[cfg(feature = "bundled_tables")]
    pub fn with_bundled_tables(mut self) -> Self {
        self.add_bundled_tables();
        self
    }

    /// Add the bundled tables to the builder
    ///
    /// This is only available with the `bundled_tables` feature.
    #[cfg(feature = "bundled_tables")]
    pub fn add_bundled_tables(&mut self) -> &mut Self {
        self.add_tables_file(TablesFile::bundled())
    }

    /// Add a [`TablesFile`] to the builder
    pub fn with_tables_file(mut self, file: TablesFile) -> Self {
        self.add_tables_file(file);
        self
    }

    /// Add a [`TablesFile`] to the builder
    pub fn add_tables_file(&mut self, file: TablesFile) -> &mut Self {
        for (label, grams) in file.units {
            self.units.insert(normalize(&label), grams);
        }

        join_rules(&mut self.multipliers, file.multiplier, file.precedence);
        join_rules(&mut self.portions, file.portion, file.precedence);

        if let Some(fallback) = file.fallback {
            self.fallback = Some(fallback);
        }
        if let Some(PlausibilityEntry { default, category }) = file.plausibility {
            join_rules(&mut self.categories, category, file.precedence);
            if default.is_some() {
                self.default_category = default;
            }
        }
        self
    }

    /// Consume the builder and return the new [`PortionEngine`]
    pub fn finish(self) -> Result<PortionEngine, EngineBuilderError> {
        for (label, &grams) in &self.units {
            if label.is_empty() {
                return Err(EngineBuilderError::EmptyUnitLabel);
            }
            check_positive(grams, || format!("unit '{label}'"))?;
        }
        let units = UnitTable::new(self.units);

        let multipliers = self
            .multipliers
            .into_iter()
            .enumerate()
            .map(|(i, entry)| -> Result<_, EngineBuilderError> {
                let what = || format!("multiplier rule {i}");
                check_positive(entry.multiplier, what)?;
                Ok(CategoryMultiplierRule {
                    foods: build_matcher(&entry.foods, &entry.exclude, what)?,
                    units: build_matcher(&entry.units, &[], what)?,
                    multiplier: entry.multiplier,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let portions = self
            .portions
            .into_iter()
            .enumerate()
            .map(|(i, entry)| -> Result<_, EngineBuilderError> {
                let what = || format!("portion rule {i}");
                let matcher = build_matcher(&entry.patterns, &entry.exclude, what)?;
                Ok(PortionRule {
                    matcher,
                    recommendation: build_recommendation(
                        entry.unit,
                        entry.grams,
                        entry.note,
                        what,
                    )?,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let fallback = match self.fallback {
            Some(f) => build_recommendation(f.unit, f.grams, f.note, || "fallback".to_string())?,
            None => default_fallback(),
        };

        let categories = self
            .categories
            .into_iter()
            .enumerate()
            .map(|(i, entry)| -> Result<_, EngineBuilderError> {
                let category = entry.category;
                let what = || format!("{category} category rule {i}");
                Ok(CategoryRule {
                    category,
                    matcher: build_matcher(&entry.patterns, &entry.exclude, what)?,
                    range: build_range(entry.min, entry.max, what)?,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let default_category = self.default_category.unwrap_or(FoodCategory::Grain);
        let default_range = categories
            .iter()
            .find(|r| r.category == default_category)
            .map(|r| r.range)
            .or_else(|| (default_category == FoodCategory::Grain).then_some(GRAIN_RANGE))
            .ok_or(EngineBuilderError::MissingDefaultCategory(default_category))?;

        Ok(PortionEngine {
            units,
            multipliers: MultiplierRules(multipliers),
            portions: PortionRules {
                rules: portions,
                fallback,
            },
            plausibility: PlausibilityRules {
                rules: categories,
                default_category,
                default_range,
            },
        })
    }
}

fn join_rules<T>(current: &mut Vec<T>, mut new: Vec<T>, precedence: Precedence) {
    match precedence {
        Precedence::Before => {
            new.append(current);
            *current = new;
        }
        Precedence::After => current.append(&mut new),
    }
}

fn check_positive(value: f64, what: impl Fn() -> String) -> Result<(), EngineBuilderError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(EngineBuilderError::NotPositive {
            what: what(),
            value,
        })
    }
}

fn build_matcher(
    include: &[String],
    exclude: &[String],
    what: impl Fn() -> String,
) -> Result<Matcher, EngineBuilderError> {
    if include.is_empty() {
        return Err(EngineBuilderError::NoPatterns { what: what() });
    }
    if include.iter().chain(exclude).any(|p| p.trim().is_empty()) {
        return Err(EngineBuilderError::EmptyPattern { what: what() });
    }
    Ok(Matcher::new(include, exclude)?)
}

fn build_recommendation(
    unit: String,
    grams: f64,
    note: String,
    what: impl Fn() -> String,
) -> Result<PortionRecommendation, EngineBuilderError> {
    if unit.trim().is_empty() {
        return Err(EngineBuilderError::EmptyUnitLabel);
    }
    check_positive(grams, what)?;
    Ok(PortionRecommendation {
        canonical_unit_label: unit,
        unit_size_grams: grams,
        explanatory_note: note,
    })
}

fn build_range(
    min: f64,
    max: f64,
    what: impl Fn() -> String,
) -> Result<CalorieRange, EngineBuilderError> {
    if !(min.is_finite() && max.is_finite()) || min < 0.0 || min > max {
        return Err(EngineBuilderError::InvalidRange {
            what: what(),
            min,
            max,
        });
    }
    Ok(CalorieRange { min, max })
}

/// Errors generated by [`EngineBuilder`]
#[derive(Debug, Error)]
pub enum EngineBuilderError {
    #[error("Empty unit label")]
    EmptyUnitLabel,

    #[error("Value for {what} has to be positive, got {value}")]
    NotPositive { what: String, value: f64 },

    #[error("No patterns in {what}")]
    NoPatterns { what: String },

    #[error("Empty pattern in {what}")]
    EmptyPattern { what: String },

    #[error("Invalid calorie range in {what}: {min} to {max}")]
    InvalidRange { what: String, min: f64, max: f64 },

    #[error("Default category '{0}' has no range")]
    MissingDefaultCategory(FoodCategory),

    #[error(transparent)]
    Regex(#[from] regex::Error),
}
