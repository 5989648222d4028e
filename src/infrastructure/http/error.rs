//! HTTP error responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use tracing::{error, warn};

use crate::domain::errors::DomainError;

/// Error body returned by every endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

/// Error returned from a handler.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error(transparent)]
    Domain(#[from] DomainError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Domain(err) => match err {
                DomainError::ValidationFailed(_) | DomainError::DimensionMismatch { .. } => {
                    StatusCode::BAD_REQUEST
                }
                DomainError::Provider(_) => StatusCode::BAD_GATEWAY,
                DomainError::ToolLoopExceeded(_) | DomainError::ConfigurationError(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
        }
    }

    /// Machine-readable error code.
    pub const fn code(&self) -> &'static str {
        match self {
            Self::BadRequest(_) => "bad_request",
            Self::Domain(err) => match err {
                DomainError::ValidationFailed(_) => "validation_failed",
                DomainError::DimensionMismatch { .. } => "dimension_mismatch",
                DomainError::Provider(_) => "provider_error",
                DomainError::ToolLoopExceeded(_) => "tool_loop_exceeded",
                DomainError::ConfigurationError(_) => "configuration_error",
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(status = %status, error = %self, "request failed");
        } else {
            warn!(status = %status, error = %self, "request rejected");
        }

        let body = ErrorResponse {
            error: self.code().to_string(),
            message: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
