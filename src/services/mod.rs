//! Service layer: chat, memory, retrieval, templates, streaming and tools.

pub mod ai_services;
pub mod basic_chat_service;
pub mod chat_memory;
pub mod conversation_service;
pub mod embedding_service;
pub mod prompt_template;
pub mod rag_service;
pub mod streaming_service;
pub mod tool_service;
pub mod tools;

pub use ai_services::{AiServices, Sentiment};
pub use basic_chat_service::BasicChatService;
pub use chat_memory::{ChatMemoryStore, Conversation, MessageWindowChatMemory, DEFAULT_CONVERSATION_ID};
pub use conversation_service::{ConversationReply, ConversationService};
pub use embedding_service::EmbeddingService;
pub use prompt_template::PromptTemplate;
pub use rag_service::{RagService, NO_CONTEXT_ANSWER, NO_CONTEXT_ANSWER_WITH_SOURCES};
pub use streaming_service::{ChannelStreamHandler, StreamEvent, StreamHandle, StreamingChatService};
pub use tool_service::{ToolChatOutcome, ToolService, TOOL_MEMORY_MESSAGES};
pub use tools::{default_registry, KeyValueStore, ToolRegistry};
