//! Explicit gram or millilitre amounts inside unit labels

use once_cell::sync::Lazy;
use regex::Regex;

static PAREN_GRAMS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\(\s*(\d+(?:\.\d+)?)\s*(?:g|gm|gms|grams?)\s*\)").unwrap());
static PAREN_ML: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\(\s*(\d+(?:\.\d+)?)\s*(?:ml|millilit(?:re|er)s?)\s*\)").unwrap()
});
static LEADING_GRAMS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^\s*(\d+(?:\.\d+)?)\s*(?:g|gm|gms|grams?)\b").unwrap());

/// Extract the amount written in a unit label.
///
/// Tried in order, the first match wins:
/// 1. Grams in parentheses: `"medium portion (150g)"`
/// 2. Millilitres in parentheses: `"glass (250ml)"`
/// 3. Leading grams: `"250g serving"`
///
/// Millilitres are returned as is, the engine treats 1 ml as 1 g. This is
/// an approximation for every liquid, not only water.
///
/// Amounts too large for an `f64` are ignored.
///
/// ```
/// # use portion_engine::extract::extract_grams_or_ml;
/// assert_eq!(extract_grams_or_ml("medium portion (150g)"), Some(150.0));
/// assert_eq!(extract_grams_or_ml("glass (250ml)"), Some(250.0));
/// assert_eq!(extract_grams_or_ml("piece"), None);
/// ```
pub fn extract_grams_or_ml(unit_label: &str) -> Option<f64> {
    [&PAREN_GRAMS, &PAREN_ML, &LEADING_GRAMS]
        .into_iter()
        .find_map(|re| re.captures(unit_label))
        .and_then(|caps| caps[1].parse::<f64>().ok())
        .filter(|amount| amount.is_finite())
}
