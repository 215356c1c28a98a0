//! Query execution abstraction over the snippet store.

use crate::retrieval::core::errors::RetrievalResult;
use crate::retrieval::query::ann_query::QueryValue;

/// Row returned by the ANN query.
#[derive(Clone, Debug, PartialEq)]
pub struct SnippetRow {
    /// Snippet text.
    pub snippet: String,
    /// `similarity_cosine` between the snippet and the query vector.
    pub similarity: f64,
}

/// Session-like object able to run a parameterized query.
pub trait QueryExecutor {
    /// Execute `query` with positional `params`.
    ///
    /// # Errors
    /// Returns an error if the store rejects or fails the query.
    fn execute(&self, query: &str, params: &[QueryValue]) -> RetrievalResult<Vec<SnippetRow>>;
}

impl<T: QueryExecutor + ?Sized> QueryExecutor for &T {
    fn execute(&self, query: &str, params: &[QueryValue]) -> RetrievalResult<Vec<SnippetRow>> {
        (**self).execute(query, params)
    }
}
