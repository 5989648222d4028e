//! Tool-calling chat
//!
//! Sends the conversation together with the tool catalog, executes whatever
//! tools the model asks for, feeds the results back as tool messages and
//! repeats until the model answers in plain text.

use serde::Serialize;
use std::sync::Arc;
use tracing::{info, instrument, warn};

use super::basic_chat_service::require_text;
use super::chat_memory::Conversation;
use super::tools::ToolRegistry;
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{ChatMessage, ChatRequest, ToolCall};
use crate::domain::ports::ChatModel;

/// Messages remembered by the tool assistant.
pub const TOOL_MEMORY_MESSAGES: usize = 10;

/// Final answer of a tool-enabled chat plus every tool call made for it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolChatOutcome {
    pub response: String,
    pub tool_calls: Vec<ToolCall>,
}

/// Chat assistant with tool access and its own short memory.
pub struct ToolService {
    chat_model: Arc<dyn ChatModel>,
    registry: Arc<ToolRegistry>,
    memory: Conversation,
    max_tool_rounds: usize,
}

impl ToolService {
    /// # Arguments
    /// * `max_tool_rounds` - Rounds of tool execution allowed per message
    pub fn new(chat_model: Arc<dyn ChatModel>, registry: Arc<ToolRegistry>, max_tool_rounds: usize) -> Self {
        Self {
            chat_model,
            registry,
            memory: Conversation::new(TOOL_MEMORY_MESSAGES),
            max_tool_rounds,
        }
    }

    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    /// Chat with tool access and return the final answer text.
    pub async fn chat_with_tools(&self, message: &str) -> DomainResult<String> {
        Ok(self.chat(message).await?.response)
    }

    /// Chat with tool access.
    ///
    /// # Returns
    /// * `Ok(ToolChatOutcome)` - Final text and the tool calls made
    /// * `Err(DomainError::ToolLoopExceeded)` - If the model still requests
    ///   tools after `max_tool_rounds` rounds
    #[instrument(skip(self, message), fields(max_rounds = self.max_tool_rounds))]
    pub async fn chat(&self, message: &str) -> DomainResult<ToolChatOutcome> {
        require_text(message, "message")?;

        let _turn = self.memory.begin_turn().await;
        self.memory.add(ChatMessage::user(message));
        let specs = self.registry.specs();
        let mut tool_calls = Vec::new();

        for round in 0..=self.max_tool_rounds {
            let request = ChatRequest::new(self.memory.messages()).with_tools(specs.clone());
            let reply = self.chat_model.generate(request).await?.message;

            if !reply.has_tool_requests() {
                info!(rounds = round, tool_calls = tool_calls.len(), "tool chat answered");
                let response = reply.content.clone();
                self.memory.add(reply);
                return Ok(ToolChatOutcome {
                    response,
                    tool_calls,
                });
            }
            if round == self.max_tool_rounds {
                break;
            }

            let requests = reply.tool_requests.clone();
            self.memory.add(reply);
            for request in &requests {
                let call = self.registry.execute(request);
                info!(
                    tool = %call.name,
                    arguments = ?call.arguments,
                    error = call.outcome.is_error(),
                    "tool called"
                );
                self.memory
                    .add(ChatMessage::tool_result(&call.name, call.outcome.to_message_text()));
                tool_calls.push(call);
            }
        }

        warn!(max_rounds = self.max_tool_rounds, "model kept requesting tools");
        Err(DomainError::ToolLoopExceeded(self.max_tool_rounds))
    }

    /// Messages currently remembered by the tool assistant.
    pub fn memory_size(&self) -> usize {
        self.memory.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::{ChatResponse, Role, ToolRequest};
    use crate::services::tools::{default_registry, KeyValueStore};
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use serde_json::json;
    use std::collections::VecDeque;

    /// Replays canned replies and records what it was sent.
    struct ScriptedModel {
        replies: Mutex<VecDeque<ChatMessage>>,
        seen: Mutex<Vec<ChatRequest>>,
        repeat_last: bool,
    }

    impl ScriptedModel {
        fn new(replies: Vec<ChatMessage>) -> Self {
            Self {
                replies: Mutex::new(replies.into()),
                seen: Mutex::new(Vec::new()),
                repeat_last: false,
            }
        }
    }

    #[async_trait]
    impl ChatModel for ScriptedModel {
        async fn generate(&self, request: ChatRequest) -> DomainResult<ChatResponse> {
            self.seen.lock().push(request);
            let mut replies = self.replies.lock();
            let reply = if self.repeat_last && replies.len() == 1 {
                replies.front().cloned()
            } else {
                replies.pop_front()
            };
            reply
                .map(ChatResponse::new)
                .ok_or_else(|| DomainError::Provider("script exhausted".into()))
        }
    }

    fn service(model: Arc<ScriptedModel>, max_rounds: usize) -> ToolService {
        let registry = Arc::new(default_registry(&Arc::new(KeyValueStore::new())));
        ToolService::new(model, registry, max_rounds)
    }

    #[tokio::test]
    async fn test_executes_tool_and_feeds_result_back() {
        let model = Arc::new(ScriptedModel::new(vec![
            ChatMessage::assistant_tool_requests(vec![ToolRequest::new(
                "multiply",
                json!({"a": 25, "b": 4}),
            )]),
            ChatMessage::assistant("25 multiplied by 4 is 100."),
        ]));
        let service = service(model.clone(), 5);

        let outcome = service.chat("What is 25 multiplied by 4?").await.unwrap();
        assert_eq!(outcome.response, "25 multiplied by 4 is 100.");
        assert_eq!(outcome.tool_calls.len(), 1);
        assert_eq!(outcome.tool_calls[0].outcome.to_message_text(), "100.0");

        let seen = model.seen.lock();
        assert_eq!(seen.len(), 2);
        assert_eq!(seen[0].tools.len(), 10);
        let last = seen[1].messages.last().unwrap();
        assert_eq!(last.role, Role::Tool);
        assert_eq!(last.content, "100.0");
        assert_eq!(last.tool_name.as_deref(), Some("multiply"));
    }

    #[tokio::test]
    async fn test_tool_error_is_fed_back_not_raised() {
        let model = Arc::new(ScriptedModel::new(vec![
            ChatMessage::assistant_tool_requests(vec![ToolRequest::new(
                "divide",
                json!({"a": 1, "b": 0}),
            )]),
            ChatMessage::assistant("You cannot divide by zero."),
        ]));
        let service = service(model.clone(), 5);

        let outcome = service.chat("1 / 0?").await.unwrap();
        assert!(outcome.tool_calls[0].outcome.is_error());
        let seen = model.seen.lock();
        assert_eq!(
            seen[1].messages.last().unwrap().content,
            "Error: Cannot divide by zero"
        );
    }

    #[tokio::test]
    async fn test_loop_is_bounded() {
        let model = Arc::new(ScriptedModel {
            repeat_last: true,
            ..ScriptedModel::new(vec![ChatMessage::assistant_tool_requests(vec![
                ToolRequest::new("get_current_date_time", json!({})),
            ])])
        });
        let service = service(model.clone(), 2);

        let err = service.chat("loop forever").await.unwrap_err();
        assert_eq!(err, DomainError::ToolLoopExceeded(2));
        assert_eq!(model.seen.lock().len(), 3);
    }

    #[tokio::test]
    async fn test_plain_answer_without_tools() {
        let model = Arc::new(ScriptedModel::new(vec![ChatMessage::assistant("Hello!")]));
        let service = service(model, 5);
        let outcome = service.chat("hi").await.unwrap();
        assert_eq!(outcome.response, "Hello!");
        assert!(outcome.tool_calls.is_empty());
        assert_eq!(service.memory_size(), 2);
    }

    #[tokio::test]
    async fn test_memory_is_capped() {
        let replies = (0..8).map(|i| ChatMessage::assistant(format!("r{i}"))).collect();
        let model = Arc::new(ScriptedModel::new(replies));
        let service = service(model, 5);
        for i in 0..8 {
            service.chat(&format!("m{i}")).await.unwrap();
        }
        assert_eq!(service.memory_size(), TOOL_MEMORY_MESSAGES);
    }
}
