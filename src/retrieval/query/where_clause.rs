//! Keyword filter clause construction.

use std::fmt;

use crate::retrieval::core::candidate::KeywordSet;

/// Positional placeholder used by the snippet store.
pub const DEFAULT_PLACEHOLDER: &str = "?";

/// Logical operator joining keyword predicates.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LogicalJoiner {
    /// Every predicate must hold.
    #[default]
    And,
    /// At least one predicate must hold.
    Or,
}

impl LogicalJoiner {
    /// Keyword as it appears in the query text.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::And => "AND",
            Self::Or => "OR",
        }
    }
}

impl fmt::Display for LogicalJoiner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// WHERE clause fragment with its positional arguments.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct WhereClause {
    /// Clause text, empty when there is nothing to filter on.
    pub clause: String,
    /// Arguments bound to the clause placeholders, in order.
    pub args: Vec<String>,
}

impl WhereClause {
    /// Whether the clause filters anything.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.clause.is_empty()
    }
}

/// Build one `snippet : <placeholder>` predicate per keyword.
///
/// Keywords come out of the set sorted and deduplicated, so the same set always
/// yields the same clause and argument list. An empty set yields an empty
/// clause, which leaves the ANN query unfiltered.
#[must_use]
pub fn create_where_parts(
    keywords: &KeywordSet,
    placeholder: &str,
    logical_joiner: LogicalJoiner,
) -> WhereClause {
    if keywords.is_empty() {
        return WhereClause::default();
    }

    let predicate = format!("snippet : {placeholder}");
    let separator = format!(" {logical_joiner} ");
    let pieces = vec![predicate.as_str(); keywords.len()];

    WhereClause {
        clause: format!(" WHERE {}", pieces.join(&separator)),
        args: keywords.iter().map(str::to_string).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keywords(items: &[&str]) -> KeywordSet {
        items.iter().copied().collect()
    }

    #[test]
    fn test_empty_keywords_yield_empty_clause() {
        let parts = create_where_parts(&KeywordSet::empty(), DEFAULT_PLACEHOLDER, LogicalJoiner::Or);
        assert_eq!(parts.clause, "");
        assert!(parts.args.is_empty());
        assert!(parts.is_empty());
    }

    #[test]
    fn test_single_keyword() {
        let parts = create_where_parts(&keywords(&["cat"]), "?", LogicalJoiner::And);
        assert_eq!(parts.clause, " WHERE snippet : ?");
        assert_eq!(parts.args, vec!["cat".to_string()]);
    }

    #[test]
    fn test_joiner_and_sorted_args() {
        let parts = create_where_parts(&keywords(&["fog", "cat", "dog"]), "%s", LogicalJoiner::Or);
        assert_eq!(
            parts.clause,
            " WHERE snippet : %s OR snippet : %s OR snippet : %s"
        );
        assert_eq!(parts.args, vec!["cat", "dog", "fog"]);
    }

    #[test]
    fn test_deterministic_for_unordered_input() {
        let a = create_where_parts(&keywords(&["b", "a", "c", "a"]), "?", LogicalJoiner::And);
        let b = create_where_parts(&keywords(&["c", "b", "a"]), "?", LogicalJoiner::And);
        assert_eq!(a, b);
        assert_eq!(a.clause, " WHERE snippet : ? AND snippet : ? AND snippet : ?");
    }

    #[test]
    fn test_default_joiner_is_and() {
        assert_eq!(LogicalJoiner::default(), LogicalJoiner::And);
        assert_eq!(LogicalJoiner::Or.to_string(), "OR");
    }
}
