//! Document splitting configuration.

use serde::{Deserialize, Serialize};

use crate::domain::errors::{DomainError, DomainResult};

/// Configuration for the recursive document splitter.
///
/// Sizes are measured in characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplitterConfig {
    /// Upper bound on the length of every produced segment.
    pub max_chunk_size: usize,

    /// Characters of trailing context carried from one chunk into the next.
    pub chunk_overlap: usize,
}

impl SplitterConfig {
    pub const fn new(max_chunk_size: usize, chunk_overlap: usize) -> Self {
        Self {
            max_chunk_size,
            chunk_overlap,
        }
    }

    pub fn validate(&self) -> DomainResult<()> {
        if self.max_chunk_size == 0 {
            return Err(DomainError::ValidationFailed(
                "max_chunk_size must be greater than 0".to_string(),
            ));
        }
        if self.chunk_overlap >= self.max_chunk_size {
            return Err(DomainError::ValidationFailed(format!(
                "chunk_overlap ({}) must be less than max_chunk_size ({})",
                self.chunk_overlap, self.max_chunk_size
            )));
        }
        Ok(())
    }
}

impl Default for SplitterConfig {
    fn default() -> Self {
        Self::new(300, 50)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = SplitterConfig::default();
        assert_eq!(config.max_chunk_size, 300);
        assert_eq!(config.chunk_overlap, 50);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_configs() {
        assert!(SplitterConfig::new(0, 0).validate().is_err());
        assert!(SplitterConfig::new(100, 100).validate().is_err());
        assert!(SplitterConfig::new(100, 150).validate().is_err());
        assert!(SplitterConfig::new(100, 0).validate().is_ok());
    }
}
