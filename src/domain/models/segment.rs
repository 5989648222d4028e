//! Text segments and their metadata.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Metadata key recording the caller-supplied document id.
pub const METADATA_ID: &str = "id";
/// Metadata key recording the document a chunk was split from.
pub const METADATA_SOURCE_ID: &str = "source_id";
/// Metadata key recording the chunk's position within its source document.
pub const METADATA_INDEX: &str = "index";

/// String key/value metadata attached to a segment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metadata(BTreeMap<String, String>);

impl Metadata {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// An immutable piece of text stored alongside its embedding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextSegment {
    text: String,
    metadata: Metadata,
}

impl TextSegment {
    pub fn new(text: impl Into<String>, metadata: Metadata) -> Self {
        Self {
            text: text.into(),
            metadata,
        }
    }

    /// A segment with no metadata.
    pub fn from_text(text: impl Into<String>) -> Self {
        Self::new(text, Metadata::default())
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub const fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    /// Length in characters, the unit the splitter measures in.
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }
}
