//! Vector store port.

use crate::domain::errors::DomainResult;
use crate::domain::models::{Embedding, EmbeddingMatch, EntryId, TextSegment};

/// Append-only store of (embedding, segment) pairs searchable by cosine
/// similarity.
///
/// Operations are synchronous: implementations guard in-memory state with
/// short-lived locks and never await while holding them.
pub trait EmbeddingStore: Send + Sync {
    /// Append one entry and return its freshly assigned id.
    ///
    /// Fails with `DimensionMismatch` when the embedding length differs from
    /// the store's, and with `ValidationFailed` for an empty embedding. The
    /// store is unchanged on failure.
    fn add(&self, embedding: Embedding, segment: TextSegment) -> DomainResult<EntryId>;

    /// Append many entries. Validates all of them before inserting any.
    fn add_all(&self, entries: Vec<(Embedding, TextSegment)>) -> DomainResult<Vec<EntryId>>;

    /// Up to `k` entries by descending cosine similarity to `query`.
    ///
    /// Ties keep insertion order. An empty store or `k == 0` yields an empty
    /// vector.
    fn find_relevant(&self, query: &Embedding, k: usize) -> DomainResult<Vec<EmbeddingMatch>> {
        self.find_relevant_with_min_score(query, k, f64::NEG_INFINITY)
    }

    /// Like [`find_relevant`](Self::find_relevant), dropping matches scoring
    /// below `min_score`.
    fn find_relevant_with_min_score(
        &self,
        query: &Embedding,
        k: usize,
        min_score: f64,
    ) -> DomainResult<Vec<EmbeddingMatch>>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Dimensionality fixed by the first insert.
    fn dimension(&self) -> Option<usize>;
}
