use thiserror::Error;

use crate::domain::errors::DomainError;

/// Errors that can occur when interacting with the Ollama API
#[derive(Error, Debug)]
pub enum OllamaError {
    /// Invalid request parameters or malformed request
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// The requested model is not pulled on the Ollama host
    #[error("Model not found: {0}")]
    ModelNotFound(String),

    /// The runtime is busy serving other requests
    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    /// Ollama encountered an internal error
    #[error("Ollama server error: {0}")]
    ServerError(String),

    /// Network error occurred during request
    #[error("Network error: {0}")]
    NetworkError(reqwest::Error),

    /// JSON serialization or deserialization error
    #[error("JSON serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    /// Request timed out waiting for response
    #[error("Timeout waiting for response")]
    Timeout,

    /// The streamed response ended early or carried an error chunk
    #[error("Stream error: {0}")]
    StreamError(String),

    /// Unknown error occurred
    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl OllamaError {
    /// Create error from HTTP status code and response body
    ///
    /// - 400: Invalid request
    /// - 404: Model not found
    /// - 429: Rate limit exceeded
    /// - 5xx: Server error
    /// - Other: Unknown error
    pub fn from_status(status: reqwest::StatusCode, body: String) -> Self {
        match status.as_u16() {
            400 => Self::InvalidRequest(body),
            404 => Self::ModelNotFound(body),
            429 => Self::RateLimitExceeded,
            500..=599 => Self::ServerError(body),
            _ => Self::Unknown(format!("HTTP {status}: {body}")),
        }
    }
}

impl From<reqwest::Error> for OllamaError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else {
            Self::NetworkError(err)
        }
    }
}

impl From<OllamaError> for DomainError {
    fn from(err: OllamaError) -> Self {
        Self::Provider(err.to_string())
    }
}
