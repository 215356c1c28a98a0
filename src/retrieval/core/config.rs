//! Configuration for the hybrid retrieval pipeline.

use std::path::Path;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::retrieval::core::errors::{RetrievalError, RetrievalResult};
use crate::retrieval::ranking::keyword::OverlapScorer;
use crate::retrieval::ranking::merger::WeightedSumMerger;

/// Default number of results returned by a search.
pub const DEFAULT_TOP_K: usize = 3;
/// Default prefetch multiplier applied when keywords are present.
pub const DEFAULT_PREFETCH_FACTOR: usize = 5;

/// Top-level configuration for hybrid search.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct HybridConfig {
    /// Retrieval settings.
    pub retrieval: RetrievalConfig,
    /// Score blending settings.
    pub scoring: ScoringConfig,
    /// Embedding model settings.
    pub embedding: EmbeddingConfig,
}

impl HybridConfig {
    /// Load and validate a configuration from a JSON file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read, parsed, or fails validation.
    pub fn from_json_file(path: impl AsRef<Path>) -> RetrievalResult<Self> {
        let raw = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration invariants.
    ///
    /// The blend weight is deliberately left unchecked: values outside
    /// `[0, 1]` extrapolate the blend.
    ///
    /// # Errors
    /// Returns an error if any values are out of range or invalid.
    pub fn validate(&self) -> RetrievalResult<()> {
        let keyspace = &self.retrieval.keyspace;
        if keyspace.is_empty()
            || !keyspace
                .chars()
                .all(|ch| ch.is_ascii_alphanumeric() || ch == '_')
        {
            return Err(RetrievalError::InvalidConfig(format!(
                "retrieval.keyspace must be a non-empty identifier, got {keyspace:?}"
            )));
        }

        if self.retrieval.top_k == 0 {
            return Err(RetrievalError::InvalidConfig(
                "retrieval.top_k must be > 0".to_string(),
            ));
        }

        if self.retrieval.prefetch_factor == 0 {
            return Err(RetrievalError::InvalidConfig(
                "retrieval.prefetch_factor must be > 0".to_string(),
            ));
        }

        if self.scoring.keyword_max < self.scoring.keyword_min {
            return Err(RetrievalError::InvalidConfig(
                "scoring.keyword_max must be >= scoring.keyword_min".to_string(),
            ));
        }

        if let Some(base_url) = &self.embedding.base_url {
            Url::parse(base_url)?;
        }

        Ok(())
    }
}

/// Retrieval settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrievalConfig {
    /// Keyspace holding the `snippets` table.
    pub keyspace: String,
    /// Number of results to return.
    pub top_k: usize,
    /// Prefetch multiplier used when keywords are supplied.
    pub prefetch_factor: usize,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            keyspace: "demo".to_string(),
            top_k: DEFAULT_TOP_K,
            prefetch_factor: DEFAULT_PREFETCH_FACTOR,
        }
    }
}

/// Keyword scoring and blending coefficients.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// Keyword score when no keyword matches.
    pub keyword_min: f64,
    /// Keyword score when every keyword matches.
    pub keyword_max: f64,
    /// Weight of the keyword score in the blend.
    pub rho: f64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            keyword_min: 0.0,
            keyword_max: 1.0,
            rho: crate::retrieval::ranking::merger::DEFAULT_RHO,
        }
    }
}

impl ScoringConfig {
    /// Build the overlap scorer described by this config.
    #[must_use]
    pub const fn scorer(&self) -> OverlapScorer {
        OverlapScorer::new(self.keyword_min, self.keyword_max)
    }

    /// Build the weighted-sum merger described by this config.
    #[must_use]
    pub const fn merger(&self) -> WeightedSumMerger {
        WeightedSumMerger::new(self.rho)
    }
}

/// Embedding model settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingConfig {
    /// Ollama embedding model name.
    pub model: String,
    /// Optional custom base URL.
    pub base_url: Option<String>,
    /// Connect timeout in seconds.
    pub connect_timeout_secs: u64,
    /// Whole-request timeout in seconds.
    pub request_timeout_secs: u64,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            model: "nomic-embed-text".to_string(),
            base_url: None,
            connect_timeout_secs: 5,
            request_timeout_secs: 60,
        }
    }
}
