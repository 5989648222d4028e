//! Document ingestion and semantic search
//!
//! Embeds texts with the configured provider and stores them, splits long
//! documents first, and searches the store by query similarity.

use std::sync::Arc;
use tracing::{debug, info, instrument};
use uuid::Uuid;

use super::basic_chat_service::require_text;
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{Embedding, EmbeddingMatch, EntryId, Metadata, TextSegment, METADATA_ID};
use crate::domain::ports::{EmbeddingProvider, EmbeddingStore};
use crate::infrastructure::vector::DocumentSplitter;

/// Ingestion and search over one embedding store.
pub struct EmbeddingService {
    embedder: Arc<dyn EmbeddingProvider>,
    store: Arc<dyn EmbeddingStore>,
    splitter: DocumentSplitter,
    min_score: f64,
}

impl EmbeddingService {
    /// Create a new embedding service
    ///
    /// # Arguments
    /// * `embedder` - Provider that turns text into vectors
    /// * `store` - Store the vectors are appended to
    /// * `splitter` - Splitter used by [`add_long_document`](Self::add_long_document)
    pub fn new(
        embedder: Arc<dyn EmbeddingProvider>,
        store: Arc<dyn EmbeddingStore>,
        splitter: DocumentSplitter,
    ) -> Self {
        Self {
            embedder,
            store,
            splitter,
            min_score: f64::NEG_INFINITY,
        }
    }

    /// Drop search matches scoring below `min_score`.
    #[must_use]
    pub const fn with_min_score(mut self, min_score: f64) -> Self {
        self.min_score = min_score;
        self
    }

    /// Embed and store one text, recording the caller's id in its metadata.
    #[instrument(skip(self, text), fields(chars = text.len()))]
    pub async fn add_text(&self, text: &str, id: &str) -> DomainResult<EntryId> {
        require_text(text, "text")?;
        let segment = TextSegment::new(text, Metadata::new().with(METADATA_ID, id));
        let embedding = self.embedder.embed(text).await?;
        let entry_id = self.store.add(embedding, segment)?;
        info!(%entry_id, "text embedded and stored");
        Ok(entry_id)
    }

    /// Embed and store many texts. Nothing is stored if any text fails.
    ///
    /// # Returns
    /// * `Ok(usize)` - Number of texts stored
    #[instrument(skip_all, fields(count = texts.len()))]
    pub async fn add_documents(&self, texts: &[String]) -> DomainResult<usize> {
        if let Some(pos) = texts.iter().position(|t| t.trim().is_empty()) {
            return Err(DomainError::ValidationFailed(format!(
                "text at index {pos} must not be empty"
            )));
        }

        let embeddings = self.embedder.embed_all(texts).await?;
        let entries: Vec<(Embedding, TextSegment)> = embeddings
            .into_iter()
            .zip(texts)
            .map(|(embedding, text)| (embedding, TextSegment::from_text(text.as_str())))
            .collect();
        let ids = self.store.add_all(entries)?;

        info!(stored = ids.len(), "documents embedded and stored");
        Ok(ids.len())
    }

    /// Split a long document, then embed and store every segment.
    ///
    /// # Returns
    /// * `Ok(usize)` - Number of segments stored
    #[instrument(skip_all, fields(chars = document.len()))]
    pub async fn add_long_document(&self, document: &str) -> DomainResult<usize> {
        require_text(document, "text")?;

        let source_id = Uuid::new_v4().to_string();
        let segments = self.splitter.split_document(document, &source_id);
        info!(segments = segments.len(), "document split");

        let texts: Vec<String> = segments.iter().map(|s| s.text().to_string()).collect();
        let embeddings = self.embedder.embed_all(&texts).await?;
        let ids = self
            .store
            .add_all(embeddings.into_iter().zip(segments).collect())?;

        info!(stored = ids.len(), "long document processed");
        Ok(ids.len())
    }

    /// The `k` most similar stored segments, best first.
    pub async fn find_matches(&self, query: &str, k: usize) -> DomainResult<Vec<EmbeddingMatch>> {
        require_text(query, "query")?;
        if k == 0 {
            return Ok(Vec::new());
        }
        let query_embedding = self.embedder.embed(query).await?;
        self.store
            .find_relevant_with_min_score(&query_embedding, k, self.min_score)
    }

    /// Texts of the `k` most similar stored segments, best first.
    #[instrument(skip(self, query))]
    pub async fn search(&self, query: &str, k: usize) -> DomainResult<Vec<String>> {
        let matches = self.find_matches(query, k).await?;
        for m in &matches {
            debug!(score = m.score, text = %preview(m.text()), "match");
        }
        info!(matches = matches.len(), "search complete");
        Ok(matches.into_iter().map(|m| m.segment.text().to_string()).collect())
    }

    /// Raw embedding of a text, for inspection.
    pub async fn embedding_of(&self, text: &str) -> DomainResult<Embedding> {
        self.embedder.embed(text).await
    }

    pub fn document_count(&self) -> usize {
        self.store.len()
    }
}

fn preview(text: &str) -> String {
    text.chars().take(50).collect()
}
