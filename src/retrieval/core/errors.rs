//! Error types for the retrieval pipeline.

use thiserror::Error;

/// Boxed error raised by an injected collaborator (embedder, executor).
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Retrieval pipeline error type.
#[derive(Debug, Error)]
pub enum RetrievalError {
    /// Invalid configuration or unsupported values.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    /// The embedding function failed.
    #[error("embedding error: {0}")]
    Embedding(#[source] BoxError),
    /// The embedding function returned no vector for the query text.
    #[error("embedding function returned no vector for the query")]
    EmptyEmbedding,
    /// The query executor failed.
    #[error("query execution error: {0}")]
    Query(#[source] BoxError),
    /// HTTP client error.
    #[error("http client error: {0}")]
    Http(#[from] reqwest::Error),
    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    /// URL parse error.
    #[error("url parse error: {0}")]
    Url(#[from] url::ParseError),
    /// I/O error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl RetrievalError {
    /// Wrap an embedder failure, keeping the original error as the source.
    pub fn embedding<E>(err: E) -> Self
    where
        E: Into<BoxError>,
    {
        Self::Embedding(err.into())
    }

    /// Wrap an executor failure, keeping the original error as the source.
    pub fn query<E>(err: E) -> Self
    where
        E: Into<BoxError>,
    {
        Self::Query(err.into())
    }
}

/// Convenience result alias for retrieval operations.
pub type RetrievalResult<T> = Result<T, RetrievalError>;
