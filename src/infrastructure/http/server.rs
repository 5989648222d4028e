//! HTTP server: router and listener.

use anyhow::{Context, Result};
use axum::{
    routing::{get, post},
    Router,
};
use std::future::Future;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use super::handlers::{ai_services, chat, health, rag, streaming, tools};
use super::state::AppState;
use crate::domain::models::ServerConfig;

/// Build the router with all endpoints.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/api/basic-chat/chat", post(chat::basic_chat))
        .route("/api/basic-chat/question", post(chat::ask_question))
        .route("/api/basic-chat/generate-content", post(chat::generate_content))
        .route("/api/basic-chat/generate-code", post(chat::generate_code))
        .route("/api/conversational-chat/chat", post(chat::conversation_chat))
        .route("/api/conversational-chat/clear", post(chat::clear_conversation))
        .route("/api/conversational-chat/size", get(chat::conversation_size))
        .route("/api/rag/add-document", post(rag::add_document))
        .route("/api/rag/add-documents", post(rag::add_documents))
        .route("/api/rag/add-long-document", post(rag::add_long_document))
        .route("/api/rag/search", post(rag::search))
        .route("/api/rag/ask", post(rag::ask))
        .route("/api/rag/ask-with-sources", post(rag::ask_with_sources))
        .route("/api/ai-services/chat", post(ai_services::chat))
        .route("/api/ai-services/generate-code", post(ai_services::generate_code))
        .route("/api/ai-services/sentiment", post(ai_services::sentiment))
        .route("/api/ai-services/summarize", post(ai_services::summarize))
        .route("/api/ai-services/translate", post(ai_services::translate))
        .route("/api/tools/chat", post(tools::chat_with_tools))
        .route("/api/streaming/chat", post(streaming::stream_chat))
        .route("/health", get(health::health_check))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

/// Serve until the process is stopped.
pub async fn serve(state: AppState, config: &ServerConfig) -> Result<()> {
    serve_with_shutdown(state, config, std::future::pending()).await
}

/// Serve until `shutdown` resolves, then drain in-flight requests.
pub async fn serve_with_shutdown<F>(state: AppState, config: &ServerConfig, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let listener = TcpListener::bind((config.host.as_str(), config.port))
        .await
        .with_context(|| format!("Failed to bind {}:{}", config.host, config.port))?;
    let addr = listener.local_addr().context("Failed to read bound address")?;
    info!(%addr, "HTTP server listening");

    axum::serve(listener, build_router(state))
        .with_graceful_shutdown(shutdown)
        .await
        .context("HTTP server failed")?;

    info!("HTTP server stopped");
    Ok(())
}
