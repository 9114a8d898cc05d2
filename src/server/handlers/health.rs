use std::sync::Arc;

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;

use crate::core::errors::ApiError;
use crate::state::AppState;

pub async fn health(State(_state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

pub async fn get_status(State(state): State<Arc<AppState>>) -> Result<impl IntoResponse, ApiError> {
    let stored_chunks = state.store.count().await.unwrap_or(0);
    let uptime_secs = (chrono::Utc::now() - state.started_at).num_seconds();

    Ok(Json(json!({
        "status": "ok",
        "uptime_secs": uptime_secs,
        "stored_chunks": stored_chunks,
        "chunk_size": state.settings.chunk_size,
        "top_k": state.settings.top_k,
        "embedding_model": state.settings.embedding_model,
        "completion_model": state.settings.completion_model,
    })))
}
