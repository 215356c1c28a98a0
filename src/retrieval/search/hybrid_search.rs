//! Hybrid search: ANN prefetch blended with keyword overlap.
//!
//! The pipeline over-fetches when keywords are present
//! (`prefetch_factor * top_k` candidates), re-ranks the whole window with the
//! blended score, and only then cuts down to `top_k`.

use tracing::debug;

use crate::retrieval::core::candidate::{KeywordSet, Ranking};
use crate::retrieval::core::config::{
    DEFAULT_PREFETCH_FACTOR, DEFAULT_TOP_K, HybridConfig, RetrievalConfig,
};
use crate::retrieval::core::errors::RetrievalResult;
use crate::retrieval::embedding::embedder::Embedder;
use crate::retrieval::ranking::keyword::{KeywordScorer, OverlapScorer};
use crate::retrieval::ranking::merger::{ScoreMerger, WeightedSumMerger};
use crate::retrieval::ranking::rerank::{
    combine_ann_with_kw_similarity, prefetch_window, truncate_ranking,
};
use crate::retrieval::search::ann_fetch::hybrid_ann_anykeyword;
use crate::retrieval::storage::executor::QueryExecutor;

/// One hybrid search call.
#[derive(Clone, Debug)]
pub struct HybridSearchRequest<'a> {
    /// Keyspace holding the `snippets` table.
    pub keyspace: &'a str,
    /// Query text to embed.
    pub query: &'a str,
    /// Keywords for prefiltering and re-ranking.
    pub keywords: &'a KeywordSet,
    /// Number of results to return.
    pub top_k: usize,
    /// Prefetch multiplier applied when keywords are present.
    pub prefetch_factor: usize,
}

impl<'a> HybridSearchRequest<'a> {
    /// Request with the default `top_k` and prefetch factor.
    #[must_use]
    pub const fn new(keyspace: &'a str, query: &'a str, keywords: &'a KeywordSet) -> Self {
        Self {
            keyspace,
            query,
            keywords,
            top_k: DEFAULT_TOP_K,
            prefetch_factor: DEFAULT_PREFETCH_FACTOR,
        }
    }

    /// Set the number of results.
    #[must_use]
    pub const fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    /// Set the prefetch multiplier.
    #[must_use]
    pub const fn with_prefetch_factor(mut self, prefetch_factor: usize) -> Self {
        self.prefetch_factor = prefetch_factor;
        self
    }

    /// Candidates fetched before re-ranking.
    #[must_use]
    pub fn window(&self) -> usize {
        prefetch_window(self.top_k, self.prefetch_factor, !self.keywords.is_empty())
    }
}

/// Fetch, re-rank with keyword blending, and keep the best `top_k`.
///
/// # Errors
/// Returns an error if embedding or query execution fails.
pub fn hybrid_search_with_kw<X, E, S, M>(
    executor: &X,
    embedder: &E,
    request: &HybridSearchRequest<'_>,
    scorer: &S,
    merger: &M,
) -> RetrievalResult<Ranking>
where
    X: QueryExecutor + ?Sized,
    E: Embedder + ?Sized,
    S: KeywordScorer + ?Sized,
    M: ScoreMerger + ?Sized,
{
    let window = request.window();
    let candidates = hybrid_ann_anykeyword(
        executor,
        request.keyspace,
        embedder,
        request.query,
        request.keywords,
        window,
    )?;
    let fetched = candidates.len();

    let ranked = combine_ann_with_kw_similarity(candidates, request.keywords, scorer, merger);
    let ranked = truncate_ranking(ranked, request.top_k);
    debug!(
        window,
        fetched,
        returned = ranked.len(),
        "Hybrid search completed"
    );
    Ok(ranked)
}

/// Hybrid searcher bundling the store, embedder, and scoring strategies.
pub struct HybridSearcher<X, E, S = OverlapScorer, M = WeightedSumMerger> {
    executor: X,
    embedder: E,
    scorer: S,
    merger: M,
    config: RetrievalConfig,
}

impl<X, E> HybridSearcher<X, E>
where
    X: QueryExecutor,
    E: Embedder,
{
    /// Create a searcher with scorer and merger built from `config`.
    #[must_use]
    pub fn new(executor: X, embedder: E, config: &HybridConfig) -> Self {
        Self {
            executor,
            embedder,
            scorer: config.scoring.scorer(),
            merger: config.scoring.merger(),
            config: config.retrieval.clone(),
        }
    }
}

impl<X, E, S, M> HybridSearcher<X, E, S, M>
where
    X: QueryExecutor,
    E: Embedder,
    S: KeywordScorer,
    M: ScoreMerger,
{
    /// Replace the keyword scorer.
    #[must_use]
    pub fn with_scorer<S2: KeywordScorer>(self, scorer: S2) -> HybridSearcher<X, E, S2, M> {
        HybridSearcher {
            executor: self.executor,
            embedder: self.embedder,
            scorer,
            merger: self.merger,
            config: self.config,
        }
    }

    /// Replace the score merger.
    #[must_use]
    pub fn with_merger<M2: ScoreMerger>(self, merger: M2) -> HybridSearcher<X, E, S, M2> {
        HybridSearcher {
            executor: self.executor,
            embedder: self.embedder,
            scorer: self.scorer,
            merger,
            config: self.config,
        }
    }

    /// Retrieval settings in use.
    #[must_use]
    pub const fn config(&self) -> &RetrievalConfig {
        &self.config
    }

    /// Search with the configured `top_k`.
    ///
    /// # Errors
    /// Returns an error if embedding or query execution fails.
    pub fn search(&self, query: &str, keywords: &KeywordSet) -> RetrievalResult<Ranking> {
        self.search_top_k(query, keywords, self.config.top_k)
    }

    /// Search returning at most `top_k` results.
    ///
    /// # Errors
    /// Returns an error if embedding or query execution fails.
    pub fn search_top_k(
        &self,
        query: &str,
        keywords: &KeywordSet,
        top_k: usize,
    ) -> RetrievalResult<Ranking> {
        let request = HybridSearchRequest::new(&self.config.keyspace, query, keywords)
            .with_top_k(top_k)
            .with_prefetch_factor(self.config.prefetch_factor);
        hybrid_search_with_kw(
            &self.executor,
            &self.embedder,
            &request,
            &self.scorer,
            &self.merger,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_defaults() {
        let keywords = KeywordSet::empty();
        let request = HybridSearchRequest::new("demo", "q", &keywords);
        assert_eq!(request.top_k, 3);
        assert_eq!(request.prefetch_factor, 5);
        assert_eq!(request.window(), 3);
    }

    #[test]
    fn test_request_window_with_keywords() {
        let keywords: KeywordSet = ["cat"].into_iter().collect();
        let request = HybridSearchRequest::new("demo", "q", &keywords)
            .with_top_k(4)
            .with_prefetch_factor(2);
        assert_eq!(request.window(), 8);
    }
}
