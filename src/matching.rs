//! Word aware matching of food names and unit labels
//!
//! Patterns only match whole words, so `nut` matches `"mixed nuts"` but not
//! `"nutmeg"`. A regular plural (`s` or `es`) is accepted after every pattern.

use regex::{Regex, RegexBuilder};

/// Lowercase, trim and collapse inner whitespace.
///
/// ```
/// # use portion_engine::matching::normalize;
/// assert_eq!(normalize("  Medium   Portion "), "medium portion");
/// ```
pub fn normalize(text: &str) -> String {
    text.split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Compiled set of include and exclude patterns
///
/// Matches when any include pattern is found as a whole word and no exclude
/// pattern is.
#[derive(Debug, Clone)]
pub struct Matcher {
    include: Option<Regex>,
    exclude: Option<Regex>,
}

impl Matcher {
    /// Compile a matcher.
    ///
    /// Patterns are normalized with [`normalize`] and escaped, they are words,
    /// not regular expressions. Blank patterns are skipped.
    pub fn new<I, E>(include: I, exclude: E) -> Result<Self, regex::Error>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
        E: IntoIterator,
        E::Item: AsRef<str>,
    {
        Ok(Self {
            include: words_regex(include)?,
            exclude: words_regex(exclude)?,
        })
    }

    /// A matcher that never matches
    pub fn never() -> Self {
        Self {
            include: None,
            exclude: None,
        }
    }

    /// Check an already [`normalize`]d text
    pub fn is_match(&self, text: &str) -> bool {
        let Some(include) = &self.include else {
            return false;
        };
        include.is_match(text) && !self.exclude.as_ref().is_some_and(|ex| ex.is_match(text))
    }
}

fn words_regex<I>(words: I) -> Result<Option<Regex>, regex::Error>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    let alternatives = words
        .into_iter()
        .map(|w| normalize(w.as_ref()))
        .filter(|w| !w.is_empty())
        .map(|w| regex::escape(&w))
        .collect::<Vec<_>>();
    if alternatives.is_empty() {
        return Ok(None);
    }
    let pattern = format!(r"\b(?:{})(?:e?s)?\b", alternatives.join("|"));
    RegexBuilder::new(&pattern)
        .case_insensitive(true)
        .build()
        .map(Some)
}
