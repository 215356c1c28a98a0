//! ANN candidate fetch with an any-keyword prefilter.

use tracing::debug;

use crate::retrieval::core::candidate::{Candidate, KeywordSet};
use crate::retrieval::core::errors::RetrievalResult;
use crate::retrieval::embedding::embedder::Embedder;
use crate::retrieval::query::ann_query::{build_ann_query, build_query_params};
use crate::retrieval::query::where_clause::{DEFAULT_PLACEHOLDER, LogicalJoiner, create_where_parts};
use crate::retrieval::storage::executor::QueryExecutor;

/// Fetch up to `count` candidates nearest to `query`.
///
/// Rows qualify when they contain any keyword; how many keywords they contain
/// is left to the keyword scorer. Embeds once and executes once; errors from
/// either step are returned as-is and no partial result is produced.
///
/// # Errors
/// Returns an error if embedding or query execution fails.
pub fn hybrid_ann_anykeyword<X, E>(
    executor: &X,
    keyspace: &str,
    embedder: &E,
    query: &str,
    keywords: &KeywordSet,
    count: usize,
) -> RetrievalResult<Vec<Candidate>>
where
    X: QueryExecutor + ?Sized,
    E: Embedder + ?Sized,
{
    let query_vector = embedder.embed_text(query)?;
    let where_clause = create_where_parts(keywords, DEFAULT_PLACEHOLDER, LogicalJoiner::Or);
    let ann_query = build_ann_query(keyspace, &where_clause);
    let params = build_query_params(&query_vector, &where_clause, count);

    debug!(keyspace, keywords = keywords.len(), limit = count, "Fetching ANN candidates");
    let rows = executor.execute(&ann_query, &params)?;

    Ok(rows
        .into_iter()
        .map(|row| Candidate::new(row.snippet, row.similarity))
        .collect())
}
