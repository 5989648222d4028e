//! Tool-enabled chat endpoint.

use axum::{extract::State, Json};

use crate::infrastructure::http::error::ApiResult;
use crate::infrastructure::http::state::AppState;
use crate::infrastructure::http::types::{ChatResponse, MessageRequest};

pub async fn chat_with_tools(
    State(state): State<AppState>,
    Json(request): Json<MessageRequest>,
) -> ApiResult<Json<ChatResponse>> {
    let response = state.tools.chat_with_tools(&request.message).await?;
    Ok(Json(ChatResponse { response }))
}
