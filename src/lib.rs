//! Ragloom - REST gateway for a local LLM runtime
//!
//! Ragloom puts thin HTTP endpoints in front of an Ollama runtime: basic chat,
//! memory-backed conversations, retrieval-augmented generation over an
//! in-memory vector store, prompt-template "AI services", token streaming and
//! tool calling.
//!
//! # Architecture
//!
//! This crate follows Clean Architecture / Hexagonal Architecture principles:
//!
//! - **Domain Layer** (`domain`): Models, errors and the provider ports
//! - **Service Layer** (`services`): Chat, memory, RAG, templates and tool dispatch
//! - **Infrastructure Layer** (`infrastructure`): Ollama adapter, vector store,
//!   config, logging and the HTTP API
//! - **Application Layer** (`application`): Service wiring and the demo runner
//! - **CLI Layer** (`cli`): Command-line interface
//!
//! # Example
//!
//! ```ignore
//! use ragloom::{AppContext, Config};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let context = AppContext::build(&Config::default())?;
//!     context.embeddings.add_text("Rust has no garbage collector", "rust").await?;
//!     let answer = context.rag.answer("Does Rust use a garbage collector?", 3).await?;
//!     println!("{answer}");
//!     Ok(())
//! }
//! ```

pub mod application;
pub mod cli;
pub mod domain;
pub mod infrastructure;
pub mod services;

// Re-export commonly used types for convenience
pub use application::{AppContext, Providers};
pub use domain::models::{
    ChatMessage, ChatRequest, ChatResponse, Config, Embedding, EmbeddingMatch, RagAnswer, Role,
    TextSegment, ToolCall, ToolOutcome, ToolRequest, ToolSpec,
};
pub use domain::ports::{ChatModel, EmbeddingProvider, EmbeddingStore, StreamingChatModel};
pub use domain::{DomainError, DomainResult};
pub use infrastructure::config::{ConfigError, ConfigLoader};
pub use services::{
    AiServices, BasicChatService, ConversationService, EmbeddingService, RagService,
    StreamingChatService, ToolService,
};
