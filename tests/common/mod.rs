//! Common test utilities for integration tests
//!
//! Provides scripted chat models, a streaming double and context builders
//! shared across the integration test files.

#![allow(dead_code)]

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;

use ragloom::domain::models::{ChatMessage, ChatRequest, ChatResponse, Config, Role, ToolRequest};
use ragloom::domain::ports::{ChatModel, StreamingChatModel, StreamingResponseHandler};
use ragloom::infrastructure::vector::HashingEmbeddingProvider;
use ragloom::{AppContext, DomainError, DomainResult, Providers};

/// Chat model double.
///
/// Replies come from a queue first; once it is empty the model echoes the last
/// user message as `echo: {text}`. Every request is recorded.
#[derive(Default)]
pub struct ScriptedChatModel {
    replies: Mutex<VecDeque<DomainResult<ChatMessage>>>,
    requests: Mutex<Vec<ChatRequest>>,
}

impl ScriptedChatModel {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// A model that answers with `replies` in order, then echoes.
    pub fn with_replies(replies: &[&str]) -> Arc<Self> {
        let model = Self::default();
        for reply in replies {
            model.push_text(reply);
        }
        Arc::new(model)
    }

    pub fn push_text(&self, text: &str) {
        self.replies.lock().push_back(Ok(ChatMessage::assistant(text)));
    }

    pub fn push_tool_call(&self, name: &str, arguments: serde_json::Value) {
        self.replies
            .lock()
            .push_back(Ok(ChatMessage::assistant_tool_requests(vec![ToolRequest::new(
                name, arguments,
            )])));
    }

    pub fn push_error(&self, message: &str) {
        self.replies
            .lock()
            .push_back(Err(DomainError::Provider(message.to_string())));
    }

    pub fn calls(&self) -> usize {
        self.requests.lock().len()
    }

    pub fn requests(&self) -> Vec<ChatRequest> {
        self.requests.lock().clone()
    }

    pub fn last_request(&self) -> Option<ChatRequest> {
        self.requests.lock().last().cloned()
    }

    /// Concatenated content of the last request's messages.
    pub fn last_prompt(&self) -> String {
        self.last_request()
            .map(|request| {
                request
                    .messages
                    .iter()
                    .map(|m| m.content.as_str())
                    .collect::<Vec<_>>()
                    .join("\n")
            })
            .unwrap_or_default()
    }
}

#[async_trait]
impl ChatModel for ScriptedChatModel {
    async fn generate(&self, request: ChatRequest) -> DomainResult<ChatResponse> {
        let echo = request
            .messages
            .iter()
            .rev()
            .find(|m| m.role == Role::User)
            .map(|m| format!("echo: {}", m.content))
            .unwrap_or_default();
        self.requests.lock().push(request);

        let reply = self
            .replies
            .lock()
            .pop_front()
            .unwrap_or_else(|| Ok(ChatMessage::assistant(echo)));
        reply.map(ChatResponse::new)
    }
}

/// Streams a fixed reply word by word, or fails after the tokens.
pub struct WordStreamingModel {
    reply: String,
    fail_with: Option<String>,
}

impl WordStreamingModel {
    pub fn new(reply: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: reply.to_string(),
            fail_with: None,
        })
    }

    pub fn failing(reply: &str, error: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: reply.to_string(),
            fail_with: Some(error.to_string()),
        })
    }
}

impl StreamingChatModel for WordStreamingModel {
    fn generate_streaming(
        &self,
        _messages: Vec<ChatMessage>,
        handler: Arc<dyn StreamingResponseHandler>,
    ) {
        let reply = self.reply.clone();
        let fail_with = self.fail_with.clone();
        tokio::spawn(async move {
            for (i, word) in reply.split(' ').enumerate() {
                let token = if i == 0 {
                    word.to_string()
                } else {
                    format!(" {word}")
                };
                handler.on_token(&token);
                tokio::task::yield_now().await;
            }
            match fail_with {
                Some(message) => handler.on_error(DomainError::Provider(message)),
                None => handler.on_complete(&reply),
            }
        });
    }
}

/// Providers backed by test doubles and the local hashing embedder.
pub fn providers(chat: Arc<ScriptedChatModel>, streaming: Arc<WordStreamingModel>) -> Providers {
    Providers {
        chat_model: chat,
        streaming_model: streaming,
        embedder: Arc::new(HashingEmbeddingProvider::default()),
    }
}

/// Full application context over test doubles with default settings.
pub fn test_context(chat: Arc<ScriptedChatModel>) -> AppContext {
    test_context_with(&Config::default(), chat, WordStreamingModel::new("Hello from the stream"))
}

pub fn test_context_with(
    config: &Config,
    chat: Arc<ScriptedChatModel>,
    streaming: Arc<WordStreamingModel>,
) -> AppContext {
    AppContext::with_providers(config, providers(chat, streaming))
        .expect("Failed to build test context")
}

/// Setup test logging
///
/// Initializes tracing subscriber for test output.
/// Call this at the beginning of tests that need logging.
pub fn setup_test_logging() {
    use tracing_subscriber::fmt;

    let _ = fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}
