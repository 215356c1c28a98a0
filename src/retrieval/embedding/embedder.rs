//! Embedding function abstraction.

use crate::retrieval::core::errors::{RetrievalError, RetrievalResult};

/// Dense vector produced by an embedding model.
pub type EmbeddingVector = Vec<f32>;

/// Trait abstraction over embedding functions.
///
/// Implementations must return one vector per input text, in input order.
pub trait Embedder {
    /// Embed a batch of texts.
    ///
    /// # Errors
    /// Returns an error if the embedding model fails.
    fn embed_texts(&self, texts: &[String]) -> RetrievalResult<Vec<EmbeddingVector>>;

    /// Embed a single text by calling [`Embedder::embed_texts`] with a singleton
    /// batch and taking the first vector.
    ///
    /// # Errors
    /// Returns an error if the model fails or returns no vector.
    fn embed_text(&self, text: &str) -> RetrievalResult<EmbeddingVector> {
        self.embed_texts(&[text.to_string()])?
            .into_iter()
            .next()
            .ok_or(RetrievalError::EmptyEmbedding)
    }
}

impl<F> Embedder for F
where
    F: Fn(&[String]) -> RetrievalResult<Vec<EmbeddingVector>>,
{
    fn embed_texts(&self, texts: &[String]) -> RetrievalResult<Vec<EmbeddingVector>> {
        self(texts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_closure_embedder_takes_first_vector() {
        let embed = |texts: &[String]| -> RetrievalResult<Vec<EmbeddingVector>> {
            Ok(texts.iter().map(|t| vec![t.len() as f32, 1.0]).collect())
        };
        let vector = embed.embed_text("abc").unwrap();
        assert_eq!(vector, vec![3.0, 1.0]);
    }

    #[test]
    fn test_empty_batch_is_an_error() {
        let embed = |_: &[String]| -> RetrievalResult<Vec<EmbeddingVector>> { Ok(Vec::new()) };
        assert!(matches!(
            embed.embed_text("abc"),
            Err(RetrievalError::EmptyEmbedding)
        ));
    }
}
