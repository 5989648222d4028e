//! Request and response types for the Ollama HTTP API

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::models::{ChatMessage, Role, TokenUsage, ToolRequest, ToolSpec};

/// Body of `POST /api/chat`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequestBody {
    pub model: String,
    pub messages: Vec<OllamaMessage>,
    pub stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tools: Option<Vec<OllamaTool>>,
    pub options: ModelOptions,
}

/// Sampling options
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelOptions {
    pub temperature: f64,
}

/// A chat message on the wire
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OllamaMessage {
    pub role: String,
    #[serde(default)]
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_calls: Option<Vec<OllamaToolCall>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_name: Option<String>,
}

/// A tool invocation requested by the model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OllamaToolCall {
    pub function: OllamaFunctionCall,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OllamaFunctionCall {
    pub name: String,
    #[serde(default)]
    pub arguments: Value,
}

/// Tool definition advertised in the request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OllamaTool {
    #[serde(rename = "type")]
    pub tool_type: String,
    pub function: OllamaFunction,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OllamaFunction {
    pub name: String,
    pub description: String,
    pub parameters: Value,
}

/// Response of `POST /api/chat`, and each NDJSON chunk when streaming
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChatResponseBody {
    #[serde(default)]
    pub model: String,
    #[serde(default)]
    pub message: Option<OllamaMessage>,
    #[serde(default)]
    pub done: bool,
    #[serde(default)]
    pub prompt_eval_count: Option<u32>,
    #[serde(default)]
    pub eval_count: Option<u32>,
    /// Set on mid-stream failures
    #[serde(default)]
    pub error: Option<String>,
}

impl ChatResponseBody {
    pub fn usage(&self) -> Option<TokenUsage> {
        match (self.prompt_eval_count, self.eval_count) {
            (None, None) => None,
            (input, output) => Some(TokenUsage {
                input_tokens: input.unwrap_or(0),
                output_tokens: output.unwrap_or(0),
            }),
        }
    }
}

/// Body of `POST /api/embed`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbedRequestBody {
    pub model: String,
    pub input: Vec<String>,
}

/// Response of `POST /api/embed`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbedResponseBody {
    pub embeddings: Vec<Vec<f32>>,
}

impl From<&ChatMessage> for OllamaMessage {
    fn from(message: &ChatMessage) -> Self {
        let tool_calls = message.has_tool_requests().then(|| {
            message
                .tool_requests
                .iter()
                .map(|request| OllamaToolCall {
                    function: OllamaFunctionCall {
                        name: request.name.clone(),
                        arguments: request.arguments.clone(),
                    },
                })
                .collect()
        });

        Self {
            role: message.role.as_str().to_string(),
            content: message.content.clone(),
            tool_calls,
            tool_name: message.tool_name.clone(),
        }
    }
}

impl From<OllamaMessage> for ChatMessage {
    fn from(message: OllamaMessage) -> Self {
        let tool_requests: Vec<ToolRequest> = message
            .tool_calls
            .unwrap_or_default()
            .into_iter()
            .map(|call| ToolRequest::new(call.function.name, call.function.arguments))
            .collect();

        Self {
            // Replies are always attributed to the assistant.
            role: Role::Assistant,
            content: message.content,
            tool_requests,
            tool_name: None,
        }
    }
}

impl From<&ToolSpec> for OllamaTool {
    fn from(spec: &ToolSpec) -> Self {
        Self {
            tool_type: "function".to_string(),
            function: OllamaFunction {
                name: spec.name.clone(),
                description: spec.description.clone(),
                parameters: spec.parameters_schema(),
            },
        }
    }
}
