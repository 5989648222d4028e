use axum::{extract::State, Json};

use crate::infrastructure::http::state::AppState;
use crate::infrastructure::http::types::HealthResponse;

pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        documents: state.embeddings.document_count(),
    })
}
