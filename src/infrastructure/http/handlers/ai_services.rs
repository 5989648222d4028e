//! Template-driven assistant endpoints.

use axum::{extract::State, Json};

use crate::infrastructure::http::error::{ApiError, ApiResult};
use crate::infrastructure::http::state::AppState;
use crate::infrastructure::http::types::{
    CodeRequest, MessageRequest, ResultResponse, SummarizeRequest, TextRequest, TranslateRequest,
};

pub async fn chat(
    State(state): State<AppState>,
    Json(request): Json<MessageRequest>,
) -> ApiResult<Json<ResultResponse>> {
    let result = state.ai_services.chat(&request.message).await?;
    Ok(Json(ResultResponse { result }))
}

pub async fn generate_code(
    State(state): State<AppState>,
    Json(request): Json<CodeRequest>,
) -> ApiResult<Json<ResultResponse>> {
    let result = state
        .ai_services
        .generate_code(&request.language, &request.description)
        .await?;
    Ok(Json(ResultResponse { result }))
}

pub async fn sentiment(
    State(state): State<AppState>,
    Json(request): Json<TextRequest>,
) -> ApiResult<Json<ResultResponse>> {
    let result = state.ai_services.analyze_sentiment(&request.text).await?;
    Ok(Json(ResultResponse { result }))
}

pub async fn summarize(
    State(state): State<AppState>,
    Json(request): Json<SummarizeRequest>,
) -> ApiResult<Json<ResultResponse>> {
    let max_words = usize::try_from(request.max_words).map_err(|_| {
        ApiError::BadRequest(format!(
            "maxWords must not be negative, got {}",
            request.max_words
        ))
    })?;
    let result = state.ai_services.summarize(&request.text, max_words).await?;
    Ok(Json(ResultResponse { result }))
}

pub async fn translate(
    State(state): State<AppState>,
    Json(request): Json<TranslateRequest>,
) -> ApiResult<Json<ResultResponse>> {
    let result = state
        .ai_services
        .translate(&request.text, &request.target_language)
        .await?;
    Ok(Json(ResultResponse { result }))
}
