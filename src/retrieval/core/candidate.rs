//! Candidate, keyword set, and ranking types.

use std::collections::BTreeSet;

/// ANN result before keyword re-ranking.
#[derive(Clone, Debug, PartialEq)]
pub struct Candidate {
    /// Snippet text.
    pub text: String,
    /// Similarity reported by the store.
    pub similarity: f64,
}

impl Candidate {
    /// Create a candidate.
    pub fn new(text: impl Into<String>, similarity: f64) -> Self {
        Self {
            text: text.into(),
            similarity,
        }
    }
}

/// Candidate carrying its merged ranking score.
#[derive(Clone, Debug, PartialEq)]
pub struct ScoredCandidate {
    /// Snippet text.
    pub text: String,
    /// Blended ANN and keyword score.
    pub score: f64,
}

/// Ordered results, best first.
pub type Ranking = Vec<ScoredCandidate>;

/// Deduplicated keyword tokens.
///
/// Backed by a sorted set so iteration order never depends on how the caller
/// supplied the keywords. Tokens are kept as given; callers pass lowercase
/// tokens for them to match the scorer's lowercased text.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct KeywordSet {
    tokens: BTreeSet<String>,
}

impl KeywordSet {
    /// Empty set: no keyword filtering, pure vector ranking.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            tokens: BTreeSet::new(),
        }
    }

    /// Number of distinct keywords.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// Whether the set holds no keywords.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Whether `token` is one of the keywords.
    #[must_use]
    pub fn contains(&self, token: &str) -> bool {
        self.tokens.contains(token)
    }

    /// Keywords in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.tokens.iter().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for KeywordSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            tokens: iter.into_iter().map(Into::into).collect(),
        }
    }
}

impl<'a> IntoIterator for &'a KeywordSet {
    type Item = &'a String;
    type IntoIter = std::collections::btree_set::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.tokens.iter()
    }
}
