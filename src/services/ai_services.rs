//! Template-driven assistants
//!
//! Each operation pairs a fixed system message with a rendered user prompt
//! and makes one model call.

use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use tracing::{info, instrument};

use super::basic_chat_service::require_text;
use super::prompt_template::PromptTemplate;
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{ChatMessage, ChatRequest};
use crate::domain::ports::ChatModel;

const ASSISTANT_SYSTEM: &str =
    "You are a helpful assistant. Answer questions concisely and accurately.";
const PROGRAMMER_SYSTEM: &str =
    "You are an expert programmer. Generate clean, well-commented code.";
const ANALYZER_SYSTEM: &str = "You are a text analysis expert.";
const TRANSLATOR_SYSTEM: &str =
    "You are a professional translator. Translate accurately while preserving meaning and tone.";

/// Sentiment label extracted from an analysis reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Sentiment {
    Positive,
    Negative,
    Neutral,
}

impl Sentiment {
    /// Earliest of `POSITIVE`, `NEGATIVE` or `NEUTRAL` in the reply, case-insensitive.
    pub fn parse(reply: &str) -> Option<Self> {
        let upper = reply.to_uppercase();
        [Self::Positive, Self::Negative, Self::Neutral]
            .into_iter()
            .filter_map(|label| upper.find(label.as_str()).map(|pos| (pos, label)))
            .min_by_key(|(pos, _)| *pos)
            .map(|(_, label)| label)
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Positive => "POSITIVE",
            Self::Negative => "NEGATIVE",
            Self::Neutral => "NEUTRAL",
        }
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Assistants for chat, code generation, sentiment, summaries and translation.
pub struct AiServices {
    chat_model: Arc<dyn ChatModel>,
    code: PromptTemplate,
    sentiment: PromptTemplate,
    summary: PromptTemplate,
    translation: PromptTemplate,
}

impl AiServices {
    pub fn new(chat_model: Arc<dyn ChatModel>) -> Self {
        Self {
            chat_model,
            code: PromptTemplate::new("Generate {{language}} code for: {{description}}"),
            sentiment: PromptTemplate::new(
                "Analyze the sentiment of this text and respond with POSITIVE, NEGATIVE, or NEUTRAL, \
                 followed by a brief explanation: {{text}}",
            ),
            summary: PromptTemplate::new(
                "Summarize the following text in maximum {{maxWords}} words: {{text}}",
            ),
            translation: PromptTemplate::new("Translate the following text to {{language}}: {{text}}"),
        }
    }

    #[instrument(skip_all)]
    pub async fn chat(&self, message: &str) -> DomainResult<String> {
        require_text(message, "message")?;
        self.ask(ASSISTANT_SYSTEM, message.to_string()).await
    }

    #[instrument(skip(self, description))]
    pub async fn generate_code(&self, language: &str, description: &str) -> DomainResult<String> {
        require_text(language, "language")?;
        require_text(description, "description")?;
        let prompt = self
            .code
            .render_with(&[("language", language), ("description", description)])?;
        self.ask(PROGRAMMER_SYSTEM, prompt).await
    }

    #[instrument(skip_all)]
    pub async fn analyze_sentiment(&self, text: &str) -> DomainResult<String> {
        require_text(text, "text")?;
        let prompt = self.sentiment.render_with(&[("text", text)])?;
        let reply = self.ask(ANALYZER_SYSTEM, prompt).await?;
        info!(sentiment = ?Sentiment::parse(&reply), "sentiment analyzed");
        Ok(reply)
    }

    /// Summarize `text` in at most `max_words` words.
    #[instrument(skip(self, text))]
    pub async fn summarize(&self, text: &str, max_words: usize) -> DomainResult<String> {
        require_text(text, "text")?;
        if max_words == 0 {
            return Err(DomainError::ValidationFailed(
                "maxWords must be at least 1".to_string(),
            ));
        }
        let max_words = max_words.to_string();
        let prompt = self
            .summary
            .render_with(&[("maxWords", &max_words), ("text", text)])?;
        self.ask(ANALYZER_SYSTEM, prompt).await
    }

    #[instrument(skip(self, text))]
    pub async fn translate(&self, text: &str, language: &str) -> DomainResult<String> {
        require_text(text, "text")?;
        require_text(language, "targetLanguage")?;
        let prompt = self
            .translation
            .render_with(&[("language", language), ("text", text)])?;
        self.ask(TRANSLATOR_SYSTEM, prompt).await
    }

    async fn ask(&self, system: &str, prompt: String) -> DomainResult<String> {
        let request = ChatRequest::new(vec![ChatMessage::system(system), ChatMessage::user(prompt)]);
        let response = self.chat_model.generate(request).await?;
        Ok(response.message.content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::{ChatResponse, Role};
    use async_trait::async_trait;
    use parking_lot::Mutex;

    #[derive(Default)]
    struct RecordingModel {
        requests: Mutex<Vec<ChatRequest>>,
        reply: String,
    }

    #[async_trait]
    impl ChatModel for RecordingModel {
        async fn generate(&self, request: ChatRequest) -> DomainResult<ChatResponse> {
            self.requests.lock().push(request);
            Ok(ChatResponse::new(ChatMessage::assistant(self.reply.clone())))
        }
    }

    fn last_request(model: &RecordingModel) -> ChatRequest {
        model.requests.lock().last().cloned().unwrap()
    }

    #[tokio::test]
    async fn test_translate_prompt() {
        let model = Arc::new(RecordingModel::default());
        let services = AiServices::new(model.clone());
        services.translate("Hello, how are you?", "Spanish").await.unwrap();

        let request = last_request(&model);
        assert_eq!(request.messages.len(), 2);
        assert_eq!(request.messages[0].role, Role::System);
        assert_eq!(request.messages[0].content, TRANSLATOR_SYSTEM);
        assert_eq!(
            request.messages[1].content,
            "Translate the following text to Spanish: Hello, how are you?"
        );
    }

    #[tokio::test]
    async fn test_summarize_uses_analyzer_system_message() {
        let model = Arc::new(RecordingModel::default());
        let services = AiServices::new(model.clone());
        services.summarize("Some long text", 20).await.unwrap();

        let request = last_request(&model);
        assert_eq!(request.messages[0].content, ANALYZER_SYSTEM);
        assert_eq!(
            request.messages[1].content,
            "Summarize the following text in maximum 20 words: Some long text"
        );
    }

    #[tokio::test]
    async fn test_summarize_rejects_zero_words() {
        let model = Arc::new(RecordingModel::default());
        let services = AiServices::new(model.clone());
        assert!(services.summarize("text", 0).await.is_err());
        assert!(model.requests.lock().is_empty());
    }

    #[tokio::test]
    async fn test_generate_code_prompt() {
        let model = Arc::new(RecordingModel::default());
        let services = AiServices::new(model.clone());
        services.generate_code("Rust", "a binary search").await.unwrap();
        let request = last_request(&model);
        assert_eq!(request.messages[0].content, PROGRAMMER_SYSTEM);
        assert_eq!(request.messages[1].content, "Generate Rust code for: a binary search");
    }

    #[tokio::test]
    async fn test_sentiment_reply_returned_verbatim() {
        let model = Arc::new(RecordingModel {
            reply: "POSITIVE - the reviewer loves it".to_string(),
            ..RecordingModel::default()
        });
        let services = AiServices::new(model.clone());
        let reply = services
            .analyze_sentiment("This product is amazing! I love it!")
            .await
            .unwrap();
        assert_eq!(reply, "POSITIVE - the reviewer loves it");
        assert_eq!(Sentiment::parse(&reply), Some(Sentiment::Positive));
    }

    #[test]
    fn test_sentiment_parse_picks_earliest_label() {
        assert_eq!(
            Sentiment::parse("Neutral overall, not negative"),
            Some(Sentiment::Neutral)
        );
        assert_eq!(Sentiment::parse("negative."), Some(Sentiment::Negative));
        assert_eq!(Sentiment::parse("no idea"), None);
    }
}
