//! Chat model ports.
//!
//! `ChatModel` turns an ordered message list into one assistant reply, which is
//! either text or a set of tool requests. `StreamingChatModel` delivers the
//! same reply token by token through a [`StreamingResponseHandler`].

use async_trait::async_trait;
use std::sync::Arc;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{ChatMessage, ChatRequest, ChatResponse};

#[async_trait]
pub trait ChatModel: Send + Sync {
    /// Send the messages (and optional tool specs) and wait for the reply.
    async fn generate(&self, request: ChatRequest) -> DomainResult<ChatResponse>;

    /// Single user message in, text out.
    async fn generate_text(&self, prompt: &str) -> DomainResult<String> {
        let response = self
            .generate(ChatRequest::new(vec![ChatMessage::user(prompt)]))
            .await?;
        Ok(response.message.content)
    }
}

/// Receives a streamed reply.
///
/// `on_token` fires zero or more times, then exactly one of `on_complete` or
/// `on_error`.
pub trait StreamingResponseHandler: Send + Sync {
    fn on_token(&self, token: &str);

    /// Called with the full concatenated text.
    fn on_complete(&self, response: &str);

    fn on_error(&self, error: DomainError);
}

pub trait StreamingChatModel: Send + Sync {
    /// Start generating and return immediately; results arrive on `handler`.
    ///
    /// Must be called from within a tokio runtime.
    fn generate_streaming(
        &self,
        messages: Vec<ChatMessage>,
        handler: Arc<dyn StreamingResponseHandler>,
    );
}
