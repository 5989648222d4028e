pub mod chat;
pub mod chunking;
pub mod config;
pub mod embedding;
pub mod rag;
pub mod segment;
pub mod tool;

pub use chat::{ChatMessage, ChatRequest, ChatResponse, Role, TokenUsage};
pub use chunking::SplitterConfig;
pub use config::{
    Config, EmbeddingConfig, EmbeddingProviderKind, LoggingConfig, MemoryConfig, OllamaConfig,
    RagConfig, ServerConfig, ToolsConfig,
};
pub use embedding::{cosine_similarity, Embedding, EmbeddingMatch, EntryId, StoreEntry};
pub use rag::RagAnswer;
pub use segment::{Metadata, TextSegment, METADATA_ID, METADATA_INDEX, METADATA_SOURCE_ID};
pub use tool::{
    ParamType, ToolCall, ToolError, ToolOutcome, ToolParameter, ToolRequest, ToolSpec, ToolValue,
};
