//! Shared handler state.

use std::sync::Arc;

use crate::services::{
    AiServices, BasicChatService, ConversationService, EmbeddingService, RagService,
    StreamingChatService, ToolService,
};

/// Services shared by every request. Cloning is cheap.
#[derive(Clone)]
pub struct AppState {
    pub basic_chat: Arc<BasicChatService>,
    pub conversation: Arc<ConversationService>,
    pub embeddings: Arc<EmbeddingService>,
    pub rag: Arc<RagService>,
    pub ai_services: Arc<AiServices>,
    pub tools: Arc<ToolService>,
    pub streaming: Arc<StreamingChatService>,
    /// `k` used by search and ask when the request omits `maxResults`.
    pub default_max_results: usize,
}
