//! Blocking Ollama embedder.
//!
//! Posts a batch of texts to `POST /api/embed` and returns the vectors in
//! input order. The client is blocking: one call, one round trip.

use std::time::Duration;

use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;

use crate::retrieval::core::config::EmbeddingConfig;
use crate::retrieval::core::errors::{RetrievalError, RetrievalResult};
use crate::retrieval::embedding::embedder::{Embedder, EmbeddingVector};

/// Default Ollama API endpoint.
pub const DEFAULT_OLLAMA_URL: &str = "http://127.0.0.1:11434";

#[derive(Serialize)]
struct EmbedRequest<'a> {
    model: &'a str,
    input: &'a [String],
}

#[derive(Deserialize)]
struct EmbedResponse {
    embeddings: Vec<EmbeddingVector>,
}

/// Embedding function backed by an Ollama server.
#[derive(Clone, Debug)]
pub struct OllamaEmbedder {
    client: Client,
    endpoint: Url,
    model: String,
}

impl OllamaEmbedder {
    /// Create an embedder from config.
    ///
    /// # Errors
    /// Returns an error if the base URL is invalid or the client cannot be built.
    pub fn new(config: &EmbeddingConfig) -> RetrievalResult<Self> {
        let base_url = config.base_url.as_deref().unwrap_or(DEFAULT_OLLAMA_URL);
        let mut base = Url::parse(base_url)?;
        // `join` replaces the last path segment unless the base ends in '/'.
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        let endpoint = base.join("api/embed")?;
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        Ok(Self {
            client,
            endpoint,
            model: config.model.clone(),
        })
    }

    /// Endpoint receiving embedding requests.
    #[must_use]
    pub const fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

impl Embedder for OllamaEmbedder {
    fn embed_texts(&self, texts: &[String]) -> RetrievalResult<Vec<EmbeddingVector>> {
        debug!(model = %self.model, count = texts.len(), "Requesting embeddings");
        let request = EmbedRequest {
            model: &self.model,
            input: texts,
        };

        let response = self
            .client
            .post(self.endpoint.clone())
            .json(&request)
            .send()
            .and_then(reqwest::blocking::Response::error_for_status)
            .map_err(RetrievalError::embedding)?;

        let body = response
            .json::<EmbedResponse>()
            .map_err(RetrievalError::embedding)?;
        Ok(body.embeddings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_endpoint() {
        let embedder = OllamaEmbedder::new(&EmbeddingConfig::default()).unwrap();
        assert_eq!(embedder.endpoint().as_str(), "http://127.0.0.1:11434/api/embed");
    }

    #[test]
    fn test_custom_base_url() {
        let config = EmbeddingConfig {
            base_url: Some("http://10.0.0.2:19212/".to_string()),
            ..EmbeddingConfig::default()
        };
        let embedder = OllamaEmbedder::new(&config).unwrap();
        assert_eq!(embedder.endpoint().as_str(), "http://10.0.0.2:19212/api/embed");
    }

    #[test]
    fn test_base_url_path_prefix_is_kept() {
        for base_url in ["http://proxy:8080/ollama", "http://proxy:8080/ollama/"] {
            let config = EmbeddingConfig {
                base_url: Some(base_url.to_string()),
                ..EmbeddingConfig::default()
            };
            let embedder = OllamaEmbedder::new(&config).unwrap();
            assert_eq!(
                embedder.endpoint().as_str(),
                "http://proxy:8080/ollama/api/embed"
            );
        }
    }

    #[test]
    fn test_invalid_base_url() {
        let config = EmbeddingConfig {
            base_url: Some("::nope".to_string()),
            ..EmbeddingConfig::default()
        };
        assert!(matches!(
            OllamaEmbedder::new(&config),
            Err(RetrievalError::Url(_))
        ));
    }
}
