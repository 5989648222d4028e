//! Stateless single-prompt chat operations.

use std::sync::Arc;
use tracing::{info, instrument};

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::ports::ChatModel;

/// Plain prompt-in, text-out operations with no memory.
pub struct BasicChatService {
    chat_model: Arc<dyn ChatModel>,
}

impl BasicChatService {
    pub fn new(chat_model: Arc<dyn ChatModel>) -> Self {
        Self { chat_model }
    }

    /// Send a message and return the reply.
    #[instrument(skip_all, fields(chars = message.len()))]
    pub async fn chat(&self, message: &str) -> DomainResult<String> {
        require_text(message, "message")?;
        let response = self.chat_model.generate_text(message).await?;
        info!(response_chars = response.len(), "basic chat answered");
        Ok(response)
    }

    /// Ask a question. Same round trip as [`chat`](Self::chat).
    #[instrument(skip_all)]
    pub async fn ask_question(&self, question: &str) -> DomainResult<String> {
        require_text(question, "question")?;
        self.chat_model.generate_text(question).await
    }

    /// Free-form content generation from a prompt.
    #[instrument(skip_all)]
    pub async fn generate_content(&self, prompt: &str) -> DomainResult<String> {
        require_text(prompt, "prompt")?;
        let content = self.chat_model.generate_text(prompt).await?;
        info!(content_chars = content.chars().count(), "content generated");
        Ok(content)
    }

    /// Generate code for an instruction.
    #[instrument(skip_all)]
    pub async fn generate_code(&self, instruction: &str) -> DomainResult<String> {
        require_text(instruction, "instruction")?;
        self.chat_model.generate_text(&code_prompt(instruction)).await
    }
}

fn code_prompt(instruction: &str) -> String {
    format!(
        "Generate code based on this instruction: {instruction}\nProvide only the code with comments."
    )
}

/// Reject empty or whitespace-only input.
pub(crate) fn require_text(value: &str, field: &str) -> DomainResult<()> {
    if value.trim().is_empty() {
        return Err(DomainError::ValidationFailed(format!(
            "{field} must not be empty"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::{ChatMessage, ChatRequest, ChatResponse};
    use async_trait::async_trait;
    use parking_lot::Mutex;

    /// Echoes the prompt back and records it.
    #[derive(Default)]
    struct EchoModel {
        prompts: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl ChatModel for EchoModel {
        async fn generate(&self, request: ChatRequest) -> DomainResult<ChatResponse> {
            let prompt = request
                .messages
                .last()
                .map(|m| m.content.clone())
                .unwrap_or_default();
            self.prompts.lock().push(prompt.clone());
            Ok(ChatResponse::new(ChatMessage::assistant(format!("echo: {prompt}"))))
        }
    }

    #[tokio::test]
    async fn test_chat_returns_model_text() {
        let model = Arc::new(EchoModel::default());
        let service = BasicChatService::new(model.clone());
        assert_eq!(service.chat("What is Java?").await.unwrap(), "echo: What is Java?");
        assert_eq!(model.prompts.lock().len(), 1);
    }

    #[tokio::test]
    async fn test_generate_code_wraps_instruction() {
        let model = Arc::new(EchoModel::default());
        let service = BasicChatService::new(model.clone());
        service.generate_code("check if a number is prime").await.unwrap();
        assert_eq!(
            model.prompts.lock()[0],
            "Generate code based on this instruction: check if a number is prime\nProvide only the code with comments."
        );
    }

    #[tokio::test]
    async fn test_empty_message_rejected_without_model_call() {
        let model = Arc::new(EchoModel::default());
        let service = BasicChatService::new(model.clone());
        let err = service.chat("   ").await.unwrap_err();
        assert!(matches!(err, DomainError::ValidationFailed(_)));
        assert!(model.prompts.lock().is_empty());
    }
}
