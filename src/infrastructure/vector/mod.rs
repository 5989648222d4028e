//! Vector infrastructure components
//!
//! Provides the local hashing embedder, the recursive document splitter and
//! the in-memory vector store used for retrieval (RAG).

pub mod hashing_embedder;
pub mod in_memory_store;
pub mod splitter;

pub use hashing_embedder::HashingEmbeddingProvider;
pub use in_memory_store::InMemoryEmbeddingStore;
pub use splitter::DocumentSplitter;
