//! ANN query template and positional parameters.

use crate::retrieval::query::where_clause::WhereClause;

/// Positional parameter bound to the ANN query.
#[derive(Clone, Debug, PartialEq)]
pub enum QueryValue {
    /// Query embedding.
    Vector(Vec<f32>),
    /// Keyword bound to a filter predicate.
    Text(String),
    /// Row limit.
    Limit(usize),
}

/// Render the ANN query for `keyspace` with an optional filter clause.
///
/// Placeholders, in order: similarity vector, filter keywords, ordering vector,
/// limit.
#[must_use]
pub fn build_ann_query(keyspace: &str, where_clause: &WhereClause) -> String {
    format!(
        "\nSELECT snippet, similarity_cosine(embedding, ?) as similarity\n\
         FROM {keyspace}.snippets\n  {}\n  ORDER BY embedding ANN OF ?\n  LIMIT ? ;\n",
        where_clause.clause
    )
}

/// Assemble `[vector, keywords..., vector, limit]`.
#[must_use]
pub fn build_query_params(vector: &[f32], where_clause: &WhereClause, limit: usize) -> Vec<QueryValue> {
    let mut params = Vec::with_capacity(where_clause.args.len() + 3);
    params.push(QueryValue::Vector(vector.to_vec()));
    params.extend(where_clause.args.iter().cloned().map(QueryValue::Text));
    params.push(QueryValue::Vector(vector.to_vec()));
    params.push(QueryValue::Limit(limit));
    params
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::retrieval::core::candidate::KeywordSet;
    use crate::retrieval::query::where_clause::{LogicalJoiner, create_where_parts};

    #[test]
    fn test_unfiltered_query() {
        let query = build_ann_query("demo", &WhereClause::default());
        assert!(query.contains("FROM demo.snippets"));
        assert!(query.contains("ORDER BY embedding ANN OF ?"));
        assert!(query.contains("LIMIT ? ;"));
        assert!(!query.contains("WHERE"));
    }

    #[test]
    fn test_filtered_query_and_params() {
        let keywords: KeywordSet = ["dog", "cat"].into_iter().collect();
        let wc = create_where_parts(&keywords, "?", LogicalJoiner::Or);
        let query = build_ann_query("ks", &wc);
        assert!(query.contains("FROM ks.snippets\n   WHERE snippet : ? OR snippet : ?\n"));

        let params = build_query_params(&[0.5, 0.25], &wc, 15);
        assert_eq!(
            params,
            vec![
                QueryValue::Vector(vec![0.5, 0.25]),
                QueryValue::Text("cat".to_string()),
                QueryValue::Text("dog".to_string()),
                QueryValue::Vector(vec![0.5, 0.25]),
                QueryValue::Limit(15),
            ]
        );
    }

    #[test]
    fn test_placeholder_count_matches_params() {
        let keywords: KeywordSet = ["a", "b", "c"].into_iter().collect();
        let wc = create_where_parts(&keywords, "?", LogicalJoiner::Or);
        let query = build_ann_query("ks", &wc);
        let params = build_query_params(&[1.0], &wc, 3);
        assert_eq!(query.matches('?').count(), params.len());
    }
}
