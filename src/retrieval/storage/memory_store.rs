//! In-process snippet store answering the ANN query template.
//!
//! The store understands exactly the query shape produced by
//! [`build_ann_query`](crate::retrieval::query::build_ann_query): it checks the
//! target keyspace, reads the keyword predicates and their joiner from the
//! WHERE clause, scores rows with `similarity_cosine` (cosine mapped into
//! `[0, 1]`), orders by the second query vector, and applies the LIMIT.

use thiserror::Error;
use tracing::{debug, info};

use crate::retrieval::core::errors::{RetrievalError, RetrievalResult};
use crate::retrieval::embedding::embedder::{Embedder, EmbeddingVector};
use crate::retrieval::query::ann_query::QueryValue;
use crate::retrieval::ranking::keyword::tokenize;
use crate::retrieval::storage::executor::{QueryExecutor, SnippetRow};

const FILTER_PREDICATE: &str = "snippet : ?";
const ANN_ORDERING: &str = "ORDER BY embedding ANN OF ?";

/// Failures raised by [`InMemorySnippetStore`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    /// The query targets a keyspace this store does not hold.
    #[error("unknown keyspace {actual:?}, store holds {expected:?}")]
    UnknownKeyspace {
        /// Keyspace served by the store.
        expected: String,
        /// Keyspace named in the query.
        actual: String,
    },
    /// The query text does not follow the ANN template.
    #[error("malformed query: {0}")]
    MalformedQuery(String),
    /// Positional parameters do not line up with the placeholders.
    #[error("parameter mismatch: {0}")]
    ParameterMismatch(String),
    /// A vector has the wrong number of dimensions.
    #[error("dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Dimensions of stored embeddings.
        expected: usize,
        /// Dimensions of the offending vector.
        actual: usize,
    },
    /// The embedder returned a different number of vectors than texts.
    #[error("embedder returned {actual} vectors for {expected} snippets")]
    EmbeddingCount {
        /// Number of snippets sent.
        expected: usize,
        /// Number of vectors received.
        actual: usize,
    },
}

impl From<StoreError> for RetrievalError {
    fn from(err: StoreError) -> Self {
        Self::query(err)
    }
}

#[derive(Clone, Debug)]
struct StoredSnippet {
    snippet: String,
    embedding: EmbeddingVector,
}

/// Snippet collection held in memory.
#[derive(Clone, Debug)]
pub struct InMemorySnippetStore {
    keyspace: String,
    dimensions: Option<usize>,
    rows: Vec<StoredSnippet>,
}

impl InMemorySnippetStore {
    /// Create an empty store serving `keyspace`.
    pub fn new(keyspace: impl Into<String>) -> Self {
        Self {
            keyspace: keyspace.into(),
            dimensions: None,
            rows: Vec::new(),
        }
    }

    /// Embed `snippets` with a single embedder call and store them.
    ///
    /// # Errors
    /// Returns an error if the embedder fails or returns a wrong vector count.
    pub fn from_embedder<E>(
        keyspace: impl Into<String>,
        snippets: Vec<String>,
        embedder: &E,
    ) -> RetrievalResult<Self>
    where
        E: Embedder + ?Sized,
    {
        let embeddings = embedder.embed_texts(&snippets)?;
        if embeddings.len() != snippets.len() {
            return Err(RetrievalError::embedding(StoreError::EmbeddingCount {
                expected: snippets.len(),
                actual: embeddings.len(),
            }));
        }

        let mut store = Self::new(keyspace);
        for (snippet, embedding) in snippets.into_iter().zip(embeddings) {
            store.insert(snippet, embedding)?;
        }
        info!(keyspace = %store.keyspace, rows = store.len(), "Built in-memory snippet store");
        Ok(store)
    }

    /// Add a snippet with its embedding.
    ///
    /// # Errors
    /// Returns an error if the embedding dimensions differ from earlier rows.
    pub fn insert(
        &mut self,
        snippet: impl Into<String>,
        embedding: EmbeddingVector,
    ) -> Result<(), StoreError> {
        let expected = *self.dimensions.get_or_insert(embedding.len());
        if embedding.len() != expected {
            return Err(StoreError::DimensionMismatch {
                expected,
                actual: embedding.len(),
            });
        }

        self.rows.push(StoredSnippet {
            snippet: snippet.into(),
            embedding,
        });
        Ok(())
    }

    /// Keyspace served by this store.
    #[must_use]
    pub fn keyspace(&self) -> &str {
        &self.keyspace
    }

    /// Number of stored snippets.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the store is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    fn check_dimensions(&self, vector: &[f32]) -> Result<(), StoreError> {
        match self.dimensions {
            Some(expected) if expected != vector.len() => Err(StoreError::DimensionMismatch {
                expected,
                actual: vector.len(),
            }),
            _ => Ok(()),
        }
    }
}

impl QueryExecutor for InMemorySnippetStore {
    fn execute(&self, query: &str, params: &[QueryValue]) -> RetrievalResult<Vec<SnippetRow>> {
        let parsed = ParsedQuery::parse(query)?;
        if parsed.keyspace != self.keyspace {
            return Err(StoreError::UnknownKeyspace {
                expected: self.keyspace.clone(),
                actual: parsed.keyspace.to_string(),
            }
            .into());
        }

        let bound = BoundParams::bind(params, parsed.filter_count)?;
        self.check_dimensions(bound.similarity_vector)?;
        self.check_dimensions(bound.ordering_vector)?;

        let mut matches: Vec<(f64, SnippetRow)> = self
            .rows
            .iter()
            .filter(|row| parsed.keyword_filter(&row.snippet, &bound.keywords))
            .map(|row| {
                let ordering = similarity_cosine(&row.embedding, bound.ordering_vector);
                let similarity = similarity_cosine(&row.embedding, bound.similarity_vector);
                (
                    ordering,
                    SnippetRow {
                        snippet: row.snippet.clone(),
                        similarity,
                    },
                )
            })
            .collect();

        matches.sort_by(|a, b| b.0.total_cmp(&a.0));
        matches.truncate(bound.limit);
        debug!(
            keyspace = %self.keyspace,
            filters = parsed.filter_count,
            limit = bound.limit,
            returned = matches.len(),
            "Executed ANN query"
        );

        Ok(matches.into_iter().map(|(_, row)| row).collect())
    }
}

/// Structure read from the query text.
#[derive(Debug)]
struct ParsedQuery<'a> {
    keyspace: &'a str,
    filter_count: usize,
    require_all: bool,
}

impl<'a> ParsedQuery<'a> {
    fn parse(query: &'a str) -> Result<Self, StoreError> {
        let (_, after_from) = query
            .split_once("FROM ")
            .ok_or_else(|| StoreError::MalformedQuery("missing FROM clause".to_string()))?;
        let (keyspace, rest) = after_from.split_once(".snippets").ok_or_else(|| {
            StoreError::MalformedQuery("query must target <keyspace>.snippets".to_string())
        })?;
        let keyspace = keyspace.trim();

        let (filter, _) = rest.split_once(ANN_ORDERING).ok_or_else(|| {
            StoreError::MalformedQuery("missing ANN ordering clause".to_string())
        })?;
        if !rest.contains("LIMIT ?") {
            return Err(StoreError::MalformedQuery("missing LIMIT clause".to_string()));
        }

        let filter = filter.trim();
        let filter_count = filter.matches(FILTER_PREDICATE).count();
        if filter.is_empty() {
            return Ok(Self {
                keyspace,
                filter_count: 0,
                require_all: false,
            });
        }
        if !filter.starts_with("WHERE ") || filter_count == 0 {
            return Err(StoreError::MalformedQuery(format!(
                "unsupported filter clause: {filter}"
            )));
        }

        Ok(Self {
            keyspace,
            filter_count,
            require_all: filter.contains(" AND "),
        })
    }

    fn keyword_filter(&self, snippet: &str, keywords: &[&str]) -> bool {
        if keywords.is_empty() {
            return true;
        }
        let tokens = tokenize(snippet);
        if self.require_all {
            keywords.iter().all(|kw| tokens.contains(*kw))
        } else {
            keywords.iter().any(|kw| tokens.contains(*kw))
        }
    }
}

/// Parameters matched against the template placeholders.
struct BoundParams<'a> {
    similarity_vector: &'a [f32],
    keywords: Vec<&'a str>,
    ordering_vector: &'a [f32],
    limit: usize,
}

impl<'a> BoundParams<'a> {
    fn bind(params: &'a [QueryValue], filter_count: usize) -> Result<Self, StoreError> {
        let expected = filter_count + 3;
        if params.len() != expected {
            return Err(StoreError::ParameterMismatch(format!(
                "expected {expected} parameters, got {}",
                params.len()
            )));
        }

        let similarity_vector = expect_vector(&params[0], 0)?;
        let keywords = params[1..=filter_count]
            .iter()
            .enumerate()
            .map(|(offset, value)| match value {
                QueryValue::Text(text) => Ok(text.as_str()),
                other => Err(StoreError::ParameterMismatch(format!(
                    "parameter {} must be text, got {other:?}",
                    offset + 1
                ))),
            })
            .collect::<Result<Vec<_>, _>>()?;
        let ordering_vector = expect_vector(&params[filter_count + 1], filter_count + 1)?;
        let limit = match &params[filter_count + 2] {
            QueryValue::Limit(limit) => *limit,
            other => {
                return Err(StoreError::ParameterMismatch(format!(
                    "last parameter must be a limit, got {other:?}"
                )));
            }
        };

        Ok(Self {
            similarity_vector,
            keywords,
            ordering_vector,
            limit,
        })
    }
}

fn expect_vector(value: &QueryValue, position: usize) -> Result<&[f32], StoreError> {
    match value {
        QueryValue::Vector(vector) => Ok(vector),
        other => Err(StoreError::ParameterMismatch(format!(
            "parameter {position} must be a vector, got {other:?}"
        ))),
    }
}

/// Cosine similarity rescaled from `[-1, 1]` to `[0, 1]`.
///
/// A zero vector has no direction and scores the midpoint.
#[must_use]
pub fn similarity_cosine(a: &[f32], b: &[f32]) -> f64 {
    let mut dot = 0.0_f64;
    let mut norm_a = 0.0_f64;
    let mut norm_b = 0.0_f64;
    for (x, y) in a.iter().zip(b) {
        let (x, y) = (f64::from(*x), f64::from(*y));
        dot = x.mul_add(y, dot);
        norm_a = x.mul_add(x, norm_a);
        norm_b = y.mul_add(y, norm_b);
    }

    let denom = norm_a.sqrt() * norm_b.sqrt();
    let cosine = if denom > 0.0 { dot / denom } else { 0.0 };
    f64::midpoint(1.0, cosine)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::retrieval::core::candidate::KeywordSet;
    use crate::retrieval::query::ann_query::{build_ann_query, build_query_params};
    use crate::retrieval::query::where_clause::{LogicalJoiner, WhereClause, create_where_parts};

    fn store() -> InMemorySnippetStore {
        let mut store = InMemorySnippetStore::new("demo");
        store.insert("cat on mat", vec![1.0, 0.0]).unwrap();
        store.insert("dog in fog", vec![0.0, 1.0]).unwrap();
        store.insert("cat and dog", vec![0.7, 0.7]).unwrap();
        store
    }

    fn run(
        store: &InMemorySnippetStore,
        keywords: &[&str],
        joiner: LogicalJoiner,
        limit: usize,
    ) -> RetrievalResult<Vec<SnippetRow>> {
        let keywords: KeywordSet = keywords.iter().copied().collect();
        let wc = create_where_parts(&keywords, "?", joiner);
        let query = build_ann_query(store.keyspace(), &wc);
        store.execute(&query, &build_query_params(&[1.0, 0.0], &wc, limit))
    }

    #[test]
    fn test_unfiltered_orders_by_similarity() {
        let rows = run(&store(), &[], LogicalJoiner::Or, 10).unwrap();
        let texts: Vec<&str> = rows.iter().map(|r| r.snippet.as_str()).collect();
        assert_eq!(texts, vec!["cat on mat", "cat and dog", "dog in fog"]);
        assert!((rows[0].similarity - 1.0).abs() < 1e-9);
        assert!((rows[2].similarity - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_limit_applies() {
        let rows = run(&store(), &[], LogicalJoiner::Or, 1).unwrap();
        assert_eq!(rows.len(), 1);
    }

    #[test]
    fn test_or_filter_matches_any_keyword() {
        let rows = run(&store(), &["mat", "fog"], LogicalJoiner::Or, 10).unwrap();
        let texts: Vec<&str> = rows.iter().map(|r| r.snippet.as_str()).collect();
        assert_eq!(texts, vec!["cat on mat", "dog in fog"]);
    }

    #[test]
    fn test_and_filter_requires_all_keywords() {
        let rows = run(&store(), &["cat", "dog"], LogicalJoiner::And, 10).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].snippet, "cat and dog");
    }

    #[test]
    fn test_unknown_keyspace() {
        let query = build_ann_query("other", &WhereClause::default());
        let params = build_query_params(&[1.0, 0.0], &WhereClause::default(), 3);
        let err = store().execute(&query, &params).unwrap_err();
        assert!(matches!(err, RetrievalError::Query(_)));
        assert!(err.to_string().contains("unknown keyspace"));
    }

    #[test]
    fn test_parameter_count_mismatch() {
        let query = build_ann_query("demo", &WhereClause::default());
        let err = store()
            .execute(&query, &[QueryValue::Vector(vec![1.0, 0.0])])
            .unwrap_err();
        assert!(err.to_string().contains("parameter mismatch"));
    }

    #[test]
    fn test_dimension_mismatch() {
        let query = build_ann_query("demo", &WhereClause::default());
        let params = build_query_params(&[1.0, 0.0, 0.0], &WhereClause::default(), 3);
        assert!(store().execute(&query, &params).is_err());
    }

    #[test]
    fn test_malformed_query() {
        let err = store().execute("SELECT 1", &[]).unwrap_err();
        assert!(err.to_string().contains("malformed query"));
    }

    #[test]
    fn test_insert_rejects_wrong_dimensions() {
        let mut store = store();
        assert_eq!(
            store.insert("x", vec![1.0]),
            Err(StoreError::DimensionMismatch {
                expected: 2,
                actual: 1
            })
        );
    }

    #[test]
    fn test_from_embedder_embeds_once() {
        let calls = std::cell::Cell::new(0);
        let embed = |texts: &[String]| -> RetrievalResult<Vec<EmbeddingVector>> {
            calls.set(calls.get() + 1);
            Ok(texts.iter().map(|_| vec![1.0, 0.0]).collect())
        };
        let store = InMemorySnippetStore::from_embedder(
            "demo",
            vec!["a".to_string(), "b".to_string()],
            &embed,
        )
        .unwrap();
        assert_eq!(store.len(), 2);
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn test_from_embedder_checks_vector_count() {
        let embed = |_: &[String]| -> RetrievalResult<Vec<EmbeddingVector>> { Ok(vec![vec![1.0]]) };
        let result = InMemorySnippetStore::from_embedder(
            "demo",
            vec!["a".to_string(), "b".to_string()],
            &embed,
        );
        assert!(matches!(result, Err(RetrievalError::Embedding(_))));
    }

    #[test]
    fn test_similarity_cosine_range() {
        assert!((similarity_cosine(&[1.0, 0.0], &[1.0, 0.0]) - 1.0).abs() < 1e-12);
        assert!(similarity_cosine(&[1.0, 0.0], &[-1.0, 0.0]).abs() < 1e-12);
        assert!((similarity_cosine(&[0.0, 0.0], &[1.0, 0.0]) - 0.5).abs() < 1e-12);
    }
}
