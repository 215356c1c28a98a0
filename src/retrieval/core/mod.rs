//! Core retrieval types, configuration, and errors.

pub mod candidate;
pub mod config;
pub mod errors;

pub use candidate::{Candidate, KeywordSet, Ranking, ScoredCandidate};
pub use config::{
    DEFAULT_PREFETCH_FACTOR, DEFAULT_TOP_K, EmbeddingConfig, HybridConfig, RetrievalConfig,
    ScoringConfig,
};
pub use errors::{BoxError, RetrievalError, RetrievalResult};
