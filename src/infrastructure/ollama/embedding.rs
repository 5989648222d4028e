//! Ollama-backed embedding provider

use async_trait::async_trait;

use super::client::OllamaClient;
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::Embedding;
use crate::domain::ports::EmbeddingProvider;

/// Embeds text with the configured Ollama embedding model.
#[derive(Debug, Clone)]
pub struct OllamaEmbeddingProvider {
    client: OllamaClient,
}

impl OllamaEmbeddingProvider {
    pub const fn new(client: OllamaClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl EmbeddingProvider for OllamaEmbeddingProvider {
    fn name(&self) -> &'static str {
        "ollama"
    }

    fn dimension(&self) -> Option<usize> {
        None
    }

    async fn embed(&self, text: &str) -> DomainResult<Embedding> {
        let mut embeddings = self.embed_all(&[text.to_string()]).await?;
        embeddings
            .pop()
            .ok_or_else(|| DomainError::Provider("empty embedding response".to_string()))
    }

    async fn embed_all(&self, texts: &[String]) -> DomainResult<Vec<Embedding>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }
        let vectors = self.client.embed(texts).await?;
        Ok(vectors.into_iter().map(Embedding::new).collect())
    }
}
