//! Ollama HTTP API client implementation

use async_trait::async_trait;
use futures::StreamExt;
use reqwest::Client as ReqwestClient;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, instrument, warn};

use super::error::OllamaError;
use super::streaming::NdjsonStreamParser;
use super::types::{
    ChatRequestBody, ChatResponseBody, EmbedRequestBody, EmbedResponseBody, ModelOptions,
    OllamaMessage, OllamaTool,
};
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{ChatMessage, ChatRequest, ChatResponse, OllamaConfig, ToolSpec};
use crate::domain::ports::{ChatModel, StreamingChatModel, StreamingResponseHandler};

/// Configuration for the Ollama HTTP client
#[derive(Debug, Clone)]
pub struct OllamaClientConfig {
    pub base_url: String,
    pub chat_model: String,
    pub embedding_model: String,
    pub temperature: f64,
    pub timeout_secs: u64,
}

impl From<&OllamaConfig> for OllamaClientConfig {
    fn from(config: &OllamaConfig) -> Self {
        Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            chat_model: config.chat_model.clone(),
            embedding_model: config.embedding_model.clone(),
            temperature: config.temperature,
            timeout_secs: config.timeout_secs,
        }
    }
}

impl Default for OllamaClientConfig {
    fn default() -> Self {
        Self::from(&OllamaConfig::default())
    }
}

/// HTTP client for a local Ollama runtime
///
/// One pooled `reqwest` client per instance; cloning shares the pool. Requests
/// are bounded by the configured timeout and never retried.
#[derive(Debug, Clone)]
pub struct OllamaClient {
    http_client: ReqwestClient,
    config: Arc<OllamaClientConfig>,
}

impl OllamaClient {
    /// Create a new client
    ///
    /// # Arguments
    /// * `config` - Client configuration
    ///
    /// # Returns
    /// * `Ok(OllamaClient)` - Successfully created client
    /// * `Err(OllamaError)` - Failed to build HTTP client
    pub fn new(config: OllamaClientConfig) -> Result<Self, OllamaError> {
        let http_client = ReqwestClient::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .pool_max_idle_per_host(10)
            .tcp_nodelay(true)
            .build()?;

        Ok(Self {
            http_client,
            config: Arc::new(config),
        })
    }

    pub fn config(&self) -> &OllamaClientConfig {
        &self.config
    }

    fn chat_body(&self, messages: &[ChatMessage], tools: &[ToolSpec], stream: bool) -> ChatRequestBody {
        ChatRequestBody {
            model: self.config.chat_model.clone(),
            messages: messages.iter().map(OllamaMessage::from).collect(),
            stream,
            tools: (!tools.is_empty()).then(|| tools.iter().map(OllamaTool::from).collect()),
            options: ModelOptions {
                temperature: self.config.temperature,
            },
        }
    }

    async fn post<B>(&self, path: &str, body: &B) -> Result<reqwest::Response, OllamaError>
    where
        B: Serialize + Sync,
    {
        let response = self
            .http_client
            .post(format!("{}{path}", self.config.base_url))
            .json(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read error response".to_string());
            return Err(OllamaError::from_status(status, body));
        }
        Ok(response)
    }

    async fn post_json<B, R>(&self, path: &str, body: &B) -> Result<R, OllamaError>
    where
        B: Serialize + Sync,
        R: DeserializeOwned,
    {
        let response = self.post(path, body).await?;
        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// Non-streaming `POST /api/chat`
    #[instrument(skip(self, messages, tools), fields(model = %self.config.chat_model, messages = messages.len()))]
    pub async fn chat(
        &self,
        messages: &[ChatMessage],
        tools: &[ToolSpec],
    ) -> Result<ChatResponseBody, OllamaError> {
        let body = self.chat_body(messages, tools, false);
        let response: ChatResponseBody = self.post_json("/api/chat", &body).await?;
        if let Some(error) = &response.error {
            return Err(OllamaError::StreamError(error.clone()));
        }
        debug!(eval_count = response.eval_count, "chat response received");
        Ok(response)
    }

    /// Streaming `POST /api/chat`, yielding NDJSON chunks
    pub async fn chat_stream(
        &self,
        messages: &[ChatMessage],
    ) -> Result<NdjsonStreamParser, OllamaError> {
        let body = self.chat_body(messages, &[], true);
        let response = self.post("/api/chat", &body).await?;
        Ok(NdjsonStreamParser::new(response.bytes_stream()))
    }

    /// `POST /api/embed` for a batch of texts
    #[instrument(skip(self, texts), fields(model = %self.config.embedding_model, count = texts.len()))]
    pub async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, OllamaError> {
        let body = EmbedRequestBody {
            model: self.config.embedding_model.clone(),
            input: texts.to_vec(),
        };
        let response: EmbedResponseBody = self.post_json("/api/embed", &body).await?;
        if response.embeddings.len() != texts.len() {
            return Err(OllamaError::Unknown(format!(
                "expected {} embeddings, got {}",
                texts.len(),
                response.embeddings.len()
            )));
        }
        Ok(response.embeddings)
    }

    async fn run_stream(
        &self,
        messages: Vec<ChatMessage>,
        handler: &dyn StreamingResponseHandler,
    ) -> Result<(), OllamaError> {
        let mut stream = self.chat_stream(&messages).await?;
        let mut full_text = String::new();

        while let Some(chunk) = stream.next().await {
            let chunk = chunk?;
            if let Some(message) = chunk.message {
                if !message.content.is_empty() {
                    handler.on_token(&message.content);
                    full_text.push_str(&message.content);
                }
            }
            if chunk.done {
                handler.on_complete(&full_text);
                return Ok(());
            }
        }

        Err(OllamaError::StreamError(
            "stream ended before completion".to_string(),
        ))
    }
}

#[async_trait]
impl ChatModel for OllamaClient {
    async fn generate(&self, request: ChatRequest) -> DomainResult<ChatResponse> {
        let body = self.chat(&request.messages, &request.tools).await?;
        let usage = body.usage();
        let message = body
            .message
            .ok_or_else(|| DomainError::Provider("response carried no message".to_string()))?;

        Ok(ChatResponse {
            message: message.into(),
            usage,
        })
    }
}

impl StreamingChatModel for OllamaClient {
    fn generate_streaming(
        &self,
        messages: Vec<ChatMessage>,
        handler: Arc<dyn StreamingResponseHandler>,
    ) {
        let client = self.clone();
        tokio::spawn(async move {
            if let Err(err) = client.run_stream(messages, handler.as_ref()).await {
                warn!(error = %err, "streaming chat failed");
                handler.on_error(err.into());
            }
        });
    }
}
