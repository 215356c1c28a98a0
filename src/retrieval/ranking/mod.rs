//! Keyword scoring, score merging, and re-ranking.

pub mod keyword;
pub mod merger;
pub mod rerank;

pub use keyword::{KeywordScorer, OverlapScorer, PUNCTUATION, keyword_similarity, tokenize};
pub use merger::{DEFAULT_RHO, ScoreMerger, WeightedSumMerger, sum_score_merger};
pub use rerank::{combine_ann_with_kw_similarity, prefetch_window, truncate_ranking};
