//! Port trait definitions (Hexagonal Architecture)
//!
//! This module defines the interfaces infrastructure adapters implement:
//! - EmbeddingProvider: text to vector
//! - ChatModel / StreamingChatModel: messages to assistant reply
//! - EmbeddingStore: similarity search over stored segments
//!
//! Services depend only on these traits, so tests substitute scripted doubles
//! for the Ollama runtime.

pub mod chat_model;
pub mod embedding;
pub mod embedding_store;

pub use chat_model::{ChatModel, StreamingChatModel, StreamingResponseHandler};
pub use embedding::EmbeddingProvider;
pub use embedding_store::EmbeddingStore;
