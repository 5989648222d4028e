//! Memory-backed conversational chat.

use serde::Serialize;
use std::sync::Arc;
use tracing::{info, instrument};

use super::basic_chat_service::require_text;
use super::chat_memory::ChatMemoryStore;
use crate::domain::errors::DomainResult;
use crate::domain::models::{ChatMessage, ChatRequest};
use crate::domain::ports::ChatModel;

/// Reply to one memory-backed turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationReply {
    pub response: String,
    /// Messages held for the conversation after the reply was stored.
    pub conversation_size: usize,
}

/// Chat service that gives the model the recent conversation as context.
pub struct ConversationService {
    chat_model: Arc<dyn ChatModel>,
    memory: Arc<ChatMemoryStore>,
}

impl ConversationService {
    pub fn new(chat_model: Arc<dyn ChatModel>, memory: Arc<ChatMemoryStore>) -> Self {
        Self { chat_model, memory }
    }

    /// Run one turn: remember the message, answer with the window as context,
    /// remember the answer.
    ///
    /// If the model call fails the user message stays in memory and the error
    /// is returned.
    #[instrument(skip(self, message))]
    pub async fn chat(&self, conversation_id: &str, message: &str) -> DomainResult<ConversationReply> {
        require_text(message, "message")?;

        let conversation = self.memory.conversation(conversation_id);
        let _turn = conversation.begin_turn().await;

        let context = conversation.add_and_snapshot(ChatMessage::user(message));
        let response = self.chat_model.generate(ChatRequest::new(context)).await?;
        let text = response.message.content;
        let conversation_size = conversation.add(ChatMessage::assistant(text.clone()));

        info!(conversation_size, "conversation turn complete");
        Ok(ConversationReply {
            response: text,
            conversation_size,
        })
    }

    pub fn clear(&self, conversation_id: &str) {
        info!(conversation_id, "clearing conversation memory");
        self.memory.clear(conversation_id);
    }

    pub fn size(&self, conversation_id: &str) -> usize {
        self.memory.size(conversation_id)
    }
}
