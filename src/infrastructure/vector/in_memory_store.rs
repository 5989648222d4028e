//! In-memory vector store
//!
//! Append-only list of entries behind a `parking_lot::RwLock`. Searches are a
//! linear cosine scan, which is adequate for the document counts a single
//! process serves; there is no persistence or index.

use parking_lot::RwLock;
use tracing::debug;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{
    cosine_similarity, Embedding, EmbeddingMatch, EntryId, StoreEntry, TextSegment,
};
use crate::domain::ports::EmbeddingStore;

#[derive(Debug, Default)]
struct StoreState {
    entries: Vec<StoreEntry>,
    dimension: Option<usize>,
}

impl StoreState {
    fn check(&self, embedding: &Embedding, expected: Option<usize>) -> DomainResult<()> {
        if embedding.dimension() == 0 {
            return Err(DomainError::ValidationFailed(
                "embedding must not be empty".to_string(),
            ));
        }
        if embedding.vector().iter().any(|v| !v.is_finite()) {
            return Err(DomainError::ValidationFailed(
                "embedding contains non-finite values".to_string(),
            ));
        }
        if let Some(expected) = expected.or(self.dimension) {
            if embedding.dimension() != expected {
                return Err(DomainError::DimensionMismatch {
                    expected,
                    actual: embedding.dimension(),
                });
            }
        }
        Ok(())
    }
}

/// Process-local embedding store shared across requests.
#[derive(Debug, Default)]
pub struct InMemoryEmbeddingStore {
    state: RwLock<StoreState>,
}

impl InMemoryEmbeddingStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all entries in insertion order.
    pub fn entries(&self) -> Vec<StoreEntry> {
        self.state.read().entries.clone()
    }
}

impl EmbeddingStore for InMemoryEmbeddingStore {
    fn add(&self, embedding: Embedding, segment: TextSegment) -> DomainResult<EntryId> {
        let mut state = self.state.write();
        state.check(&embedding, None)?;

        let id = EntryId::new();
        if state.dimension.is_none() {
            state.dimension = Some(embedding.dimension());
        }
        state.entries.push(StoreEntry {
            id,
            embedding,
            segment,
        });
        Ok(id)
    }

    fn add_all(&self, entries: Vec<(Embedding, TextSegment)>) -> DomainResult<Vec<EntryId>> {
        let mut state = self.state.write();

        // The first item fixes the dimension for an empty store, so the rest
        // of the batch is checked against it too.
        let batch_dimension = state
            .dimension
            .or_else(|| entries.first().map(|(e, _)| e.dimension()));
        for (embedding, _) in &entries {
            state.check(embedding, batch_dimension)?;
        }

        if state.dimension.is_none() {
            state.dimension = batch_dimension;
        }
        let ids = entries
            .into_iter()
            .map(|(embedding, segment)| {
                let id = EntryId::new();
                state.entries.push(StoreEntry {
                    id,
                    embedding,
                    segment,
                });
                id
            })
            .collect();
        Ok(ids)
    }

    fn find_relevant_with_min_score(
        &self,
        query: &Embedding,
        k: usize,
        min_score: f64,
    ) -> DomainResult<Vec<EmbeddingMatch>> {
        let state = self.state.read();
        if k == 0 || state.entries.is_empty() {
            return Ok(Vec::new());
        }
        state.check(query, None)?;

        let mut scored: Vec<(f64, &StoreEntry)> = state
            .entries
            .iter()
            .map(|entry| (cosine_similarity(query.vector(), entry.embedding.vector()), entry))
            .filter(|(score, _)| *score >= min_score)
            .collect();

        // Stable sort keeps insertion order among equal scores.
        scored.sort_by(|a, b| b.0.total_cmp(&a.0));
        scored.truncate(k);

        debug!(
            candidates = state.entries.len(),
            returned = scored.len(),
            "vector search complete"
        );

        Ok(scored
            .into_iter()
            .map(|(score, entry)| EmbeddingMatch {
                id: entry.id,
                segment: entry.segment.clone(),
                embedding: entry.embedding.clone(),
                score,
            })
            .collect())
    }

    fn len(&self) -> usize {
        self.state.read().entries.len()
    }

    fn dimension(&self) -> Option<usize> {
        self.state.read().dimension
    }
}
