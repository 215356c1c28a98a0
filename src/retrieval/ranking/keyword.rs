//! Keyword overlap scoring.
//!
//! A deliberately rough lexical signal: punctuation from a fixed set is
//! removed, the text is lowercased and split on single spaces, and the score
//! is the fraction of keywords found among the resulting tokens.

use std::collections::HashSet;

use crate::retrieval::core::candidate::KeywordSet;

/// Characters removed before tokenizing.
pub const PUNCTUATION: [char; 18] = [
    '!', ',', '.', '?', ';', '\'', '"', '-', '+', '=', '/', '[', ']', '{', '}', '(', ')', '\n',
];

/// Strategy scoring how well a text matches a keyword set.
pub trait KeywordScorer {
    /// Score `text` against `keywords`.
    fn score(&self, text: &str, keywords: &KeywordSet) -> f64;
}

impl<F> KeywordScorer for F
where
    F: Fn(&str, &KeywordSet) -> f64,
{
    fn score(&self, text: &str, keywords: &KeywordSet) -> f64 {
        self(text, keywords)
    }
}

/// Fraction-of-keywords-matched scorer scaled into `[min, max]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OverlapScorer {
    /// Score when no keyword matches.
    pub min: f64,
    /// Score when every keyword matches, and when there are no keywords.
    pub max: f64,
}

impl OverlapScorer {
    /// Create a scorer with the given output range.
    #[must_use]
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }
}

impl Default for OverlapScorer {
    fn default() -> Self {
        Self::new(0.0, 1.0)
    }
}

impl KeywordScorer for OverlapScorer {
    fn score(&self, text: &str, keywords: &KeywordSet) -> f64 {
        keyword_similarity(text, keywords, self.min, self.max)
    }
}

/// Split `text` into its lowercase token set.
///
/// Only the single space character separates tokens; runs of spaces produce
/// empty tokens, which are dropped.
#[must_use]
pub fn tokenize(text: &str) -> HashSet<String> {
    let cleaned: String = text
        .chars()
        .filter(|ch| !PUNCTUATION.contains(ch))
        .collect::<String>()
        .to_lowercase();

    cleaned
        .split(' ')
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .collect()
}

/// Normalized keyword overlap of `text` in `[min, max]`.
///
/// With no keywords the result is always `max`, so keyword-less searches are
/// never penalized.
#[must_use]
#[allow(clippy::cast_precision_loss)] // Keyword counts are tiny.
pub fn keyword_similarity(text: &str, keywords: &KeywordSet, min: f64, max: f64) -> f64 {
    if keywords.is_empty() {
        return max;
    }

    let tokens = tokenize(text);
    let hits = tokens
        .iter()
        .filter(|token| keywords.contains(token.as_str()))
        .count();
    (max - min).mul_add(hits as f64 / keywords.len() as f64, min)
}
