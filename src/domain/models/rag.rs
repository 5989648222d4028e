//! Retrieval-augmented generation results.

use serde::{Deserialize, Serialize};

/// An answer together with the context texts it was generated from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RagAnswer {
    pub answer: String,
    /// Retrieved segment texts in descending relevance order.
    pub sources: Vec<String>,
}

impl RagAnswer {
    pub fn new(answer: impl Into<String>, sources: Vec<String>) -> Self {
        Self {
            answer: answer.into(),
            sources,
        }
    }
}
