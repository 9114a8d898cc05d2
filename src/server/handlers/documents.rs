use std::sync::Arc;

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;

use crate::core::errors::ApiError;
use crate::rag::{chunker, extract};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct UploadRequest {
    pub title: String,
    pub text: String,
    /// Original filename, if the client uploaded a file. Checked against
    /// supported plain-text extensions.
    pub filename: Option<String>,
    /// Requested chunk size in characters; clamped to the accepted range.
    pub chunk_size: Option<usize>,
}

pub async fn upload_document(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<UploadRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if payload.title.trim().is_empty() {
        return Err(ApiError::BadRequest("title must not be empty".to_string()));
    }

    if let Some(filename) = &payload.filename {
        extract::ensure_supported(filename)?;
    }

    let chunk_size = payload
        .chunk_size
        .map(chunker::clamp_chunk_size)
        .unwrap_or(state.settings.chunk_size);

    let chunks = chunker::chunk_text(&payload.text, chunk_size);
    tracing::info!(
        "Uploading '{}': {} chunks of up to {} chars",
        payload.title,
        chunks.len(),
        chunk_size
    );

    let report = state.ingest.ingest(&payload.title, &chunks).await;

    Ok(Json(report))
}
