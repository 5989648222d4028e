//! Embedding provider port for semantic vector generation.
//!
//! Defines the trait for embedding providers that convert text into
//! dense vector representations for semantic similarity search.

use async_trait::async_trait;

use crate::domain::errors::DomainResult;
use crate::domain::models::Embedding;

/// Trait for embedding providers.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Provider name (e.g., "hashing", "ollama").
    fn name(&self) -> &'static str;

    /// Embedding dimension, when known before the first call.
    ///
    /// Remote models report `None`; their dimension is learned from the
    /// first response.
    fn dimension(&self) -> Option<usize>;

    /// Generate an embedding for a single text.
    async fn embed(&self, text: &str) -> DomainResult<Embedding>;

    /// Generate embeddings for multiple texts, preserving input order.
    ///
    /// The default embeds one text at a time.
    async fn embed_all(&self, texts: &[String]) -> DomainResult<Vec<Embedding>> {
        let mut embeddings = Vec::with_capacity(texts.len());
        for text in texts {
            embeddings.push(self.embed(text).await?);
        }
        Ok(embeddings)
    }
}
