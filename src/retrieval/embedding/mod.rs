//! Embedding function abstraction and Ollama implementation.

pub mod embedder;
pub mod ollama;

pub use embedder::{Embedder, EmbeddingVector};
pub use ollama::{DEFAULT_OLLAMA_URL, OllamaEmbedder};
