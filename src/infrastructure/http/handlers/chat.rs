//! Basic and conversational chat endpoints.

use axum::{
    extract::{Query, State},
    Json,
};
use tracing::debug;

use crate::infrastructure::http::error::ApiResult;
use crate::infrastructure::http::state::AppState;
use crate::infrastructure::http::types::{
    ChatResponse, ConversationChatRequest, ConversationQuery, MessageRequest,
};
use crate::services::{ConversationReply, DEFAULT_CONVERSATION_ID};

pub async fn basic_chat(
    State(state): State<AppState>,
    Json(request): Json<MessageRequest>,
) -> ApiResult<Json<ChatResponse>> {
    let response = state.basic_chat.chat(&request.message).await?;
    Ok(Json(ChatResponse { response }))
}

pub async fn ask_question(
    State(state): State<AppState>,
    Json(request): Json<MessageRequest>,
) -> ApiResult<Json<ChatResponse>> {
    let response = state.basic_chat.ask_question(&request.message).await?;
    Ok(Json(ChatResponse { response }))
}

pub async fn generate_content(
    State(state): State<AppState>,
    Json(request): Json<MessageRequest>,
) -> ApiResult<Json<ChatResponse>> {
    let response = state.basic_chat.generate_content(&request.message).await?;
    Ok(Json(ChatResponse { response }))
}

pub async fn generate_code(
    State(state): State<AppState>,
    Json(request): Json<MessageRequest>,
) -> ApiResult<Json<ChatResponse>> {
    let response = state.basic_chat.generate_code(&request.message).await?;
    Ok(Json(ChatResponse { response }))
}

fn conversation_id(requested: Option<&str>) -> &str {
    requested
        .filter(|id| !id.trim().is_empty())
        .unwrap_or(DEFAULT_CONVERSATION_ID)
}

pub async fn conversation_chat(
    State(state): State<AppState>,
    Json(request): Json<ConversationChatRequest>,
) -> ApiResult<Json<ConversationReply>> {
    let id = conversation_id(request.conversation_id.as_deref());
    debug!(conversation_id = id, "conversation chat request");
    let reply = state.conversation.chat(id, &request.message).await?;
    Ok(Json(reply))
}

pub async fn clear_conversation(
    State(state): State<AppState>,
    Query(query): Query<ConversationQuery>,
) -> &'static str {
    state
        .conversation
        .clear(conversation_id(query.conversation_id.as_deref()));
    "Conversation memory cleared"
}

pub async fn conversation_size(
    State(state): State<AppState>,
    Query(query): Query<ConversationQuery>,
) -> Json<usize> {
    Json(
        state
            .conversation
            .size(conversation_id(query.conversation_id.as_deref())),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conversation_id_defaults() {
        assert_eq!(conversation_id(None), DEFAULT_CONVERSATION_ID);
        assert_eq!(conversation_id(Some(" ")), DEFAULT_CONVERSATION_ID);
        assert_eq!(conversation_id(Some("abc")), "abc");
    }
}
