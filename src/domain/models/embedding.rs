//! Embedding domain models
//!
//! Vectors, store entries and similarity matches. These models are
//! provider-agnostic: the hashing embedder and the Ollama embedder produce the
//! same [`Embedding`] type.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::segment::TextSegment;

/// A dense vector produced by an embedding provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Embedding(Vec<f32>);

impl Embedding {
    pub const fn new(vector: Vec<f32>) -> Self {
        Self(vector)
    }

    pub fn vector(&self) -> &[f32] {
        &self.0
    }

    pub fn dimension(&self) -> usize {
        self.0.len()
    }

    pub fn into_vector(self) -> Vec<f32> {
        self.0
    }

    /// Euclidean norm.
    pub fn magnitude(&self) -> f32 {
        self.0.iter().map(|v| v * v).sum::<f32>().sqrt()
    }

    /// Returns a unit-length copy. A zero vector stays zero.
    #[must_use]
    pub fn normalized(&self) -> Self {
        let magnitude = self.magnitude();
        if magnitude == 0.0 {
            return self.clone();
        }
        Self(self.0.iter().map(|v| v / magnitude).collect())
    }
}

impl From<Vec<f32>> for Embedding {
    fn from(vector: Vec<f32>) -> Self {
        Self(vector)
    }
}

/// Identifier assigned by the store on insert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryId(Uuid);

impl EntryId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for EntryId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for EntryId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One stored (embedding, segment) pair.
#[derive(Debug, Clone, PartialEq)]
pub struct StoreEntry {
    pub id: EntryId,
    pub embedding: Embedding,
    pub segment: TextSegment,
}

/// A search hit with its cosine similarity to the query.
#[derive(Debug, Clone, PartialEq)]
pub struct EmbeddingMatch {
    pub id: EntryId,
    pub segment: TextSegment,
    pub embedding: Embedding,
    /// Cosine similarity in `[-1, 1]`; higher means more relevant.
    pub score: f64,
}

impl EmbeddingMatch {
    pub fn text(&self) -> &str {
        self.segment.text()
    }
}

/// Cosine similarity of two equal-length vectors.
///
/// Returns 0.0 when either vector has zero magnitude.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f64 {
    debug_assert_eq!(a.len(), b.len());

    let mut dot = 0.0_f64;
    let mut norm_a = 0.0_f64;
    let mut norm_b = 0.0_f64;
    for (x, y) in a.iter().zip(b) {
        let (x, y) = (f64::from(*x), f64::from(*y));
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    (dot / (norm_a.sqrt() * norm_b.sqrt())).clamp(-1.0, 1.0)
}
