//! REST API over the chat, RAG, assistant, tool and streaming services.

pub mod error;
pub mod handlers;
pub mod server;
pub mod state;
pub mod types;

pub use error::{ApiError, ApiResult, ErrorResponse};
pub use server::{build_router, serve, serve_with_shutdown};
pub use state::AppState;
