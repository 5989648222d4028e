//! Document ingestion, search and question answering endpoints.

use axum::{extract::State, Json};
use uuid::Uuid;

use crate::domain::models::RagAnswer;
use crate::infrastructure::http::error::ApiResult;
use crate::infrastructure::http::state::AppState;
use crate::infrastructure::http::types::{
    resolve_max_results, AnswerResponse, AskRequest, DocumentRequest, LongDocumentRequest,
    MultiDocumentRequest, SearchRequest,
};

pub async fn add_document(
    State(state): State<AppState>,
    Json(request): Json<DocumentRequest>,
) -> ApiResult<&'static str> {
    let id = request
        .id
        .unwrap_or_else(|| Uuid::new_v4().to_string());
    state.embeddings.add_text(&request.text, &id).await?;
    Ok("Document added successfully")
}

pub async fn add_documents(
    State(state): State<AppState>,
    Json(request): Json<MultiDocumentRequest>,
) -> ApiResult<String> {
    let count = state.embeddings.add_documents(&request.texts).await?;
    Ok(format!("{count} documents added successfully"))
}

pub async fn add_long_document(
    State(state): State<AppState>,
    Json(request): Json<LongDocumentRequest>,
) -> ApiResult<String> {
    let segments = state.embeddings.add_long_document(&request.text).await?;
    Ok(format!(
        "Long document processed and added successfully ({segments} segments)"
    ))
}

pub async fn search(
    State(state): State<AppState>,
    Json(request): Json<SearchRequest>,
) -> ApiResult<Json<Vec<String>>> {
    let k = resolve_max_results(request.max_results, state.default_max_results)?;
    let results = state.embeddings.search(&request.query, k).await?;
    Ok(Json(results))
}

pub async fn ask(
    State(state): State<AppState>,
    Json(request): Json<AskRequest>,
) -> ApiResult<Json<AnswerResponse>> {
    let k = resolve_max_results(request.max_results, state.default_max_results)?;
    let answer = state.rag.answer(&request.question, k).await?;
    Ok(Json(AnswerResponse { answer }))
}

pub async fn ask_with_sources(
    State(state): State<AppState>,
    Json(request): Json<AskRequest>,
) -> ApiResult<Json<RagAnswer>> {
    let k = resolve_max_results(request.max_results, state.default_max_results)?;
    let answer = state.rag.answer_with_sources(&request.question, k).await?;
    Ok(Json(answer))
}
