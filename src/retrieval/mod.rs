//! Hybrid retrieval pipeline.
//!
//! Organized along the flow of a search call:
//! - `core`: Candidates, keyword sets, configuration, and errors
//! - `query`: WHERE-clause and ANN query construction
//! - `embedding`: Embedding function abstraction and Ollama implementation
//! - `storage`: Query executor seam and the in-memory snippet store
//! - `ranking`: Keyword scoring, score merging, and re-ranking
//! - `search`: ANN fetch, hybrid search orchestration, and display

pub mod core;
pub mod embedding;
pub mod query;
pub mod ranking;
pub mod search;
pub mod storage;

// Re-export commonly used types for convenience
pub use self::core::{
    Candidate, EmbeddingConfig, HybridConfig, KeywordSet, Ranking, RetrievalConfig,
    RetrievalError, RetrievalResult, ScoredCandidate, ScoringConfig,
};
pub use embedding::{Embedder, EmbeddingVector, OllamaEmbedder};
pub use query::{LogicalJoiner, QueryValue, WhereClause, build_ann_query, create_where_parts};
pub use ranking::{
    KeywordScorer, OverlapScorer, ScoreMerger, WeightedSumMerger, combine_ann_with_kw_similarity,
    keyword_similarity, prefetch_window, sum_score_merger, truncate_ranking,
};
pub use search::{
    HybridSearchRequest, HybridSearcher, format_results, hybrid_ann_anykeyword,
    hybrid_search_with_kw, write_results,
};
pub use storage::{InMemorySnippetStore, QueryExecutor, SnippetRow, StoreError};

/// Initialize tracing with an env-filtered subscriber, defaulting to `info`.
pub fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
