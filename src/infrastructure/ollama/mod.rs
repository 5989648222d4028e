//! Ollama runtime adapter
//!
//! Implements the chat, streaming and embedding ports over the Ollama HTTP API.

pub mod client;
pub mod embedding;
pub mod error;
pub mod streaming;
pub mod types;

pub use client::{OllamaClient, OllamaClientConfig};
pub use embedding::OllamaEmbeddingProvider;
pub use error::OllamaError;
pub use streaming::NdjsonStreamParser;
