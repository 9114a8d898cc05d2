use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::json;
use thiserror::Error;

/// Failures the ingestion and answer pipelines can hit.
///
/// Per-chunk ingestion failures are recorded in the batch report instead of
/// aborting it; answer-pipeline failures are surfaced whole to the caller.
#[derive(Debug, Error)]
pub enum RagError {
    #[error("remote service error: {0}")]
    RemoteService(String),
    #[error("store write error: {0}")]
    StoreWrite(String),
    #[error("store query error: {0}")]
    StoreQuery(String),
    #[error("unsupported input: {0}")]
    UnsupportedInput(String),
}

impl RagError {
    pub fn remote<E: std::fmt::Display>(err: E) -> Self {
        RagError::RemoteService(err.to_string())
    }

    pub fn store_write<E: std::fmt::Display>(err: E) -> Self {
        RagError::StoreWrite(err.to_string())
    }

    pub fn store_query<E: std::fmt::Display>(err: E) -> Self {
        RagError::StoreQuery(err.to_string())
    }
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("upstream unavailable: {0}")]
    UpstreamUnavailable(String),
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<RagError> for ApiError {
    fn from(err: RagError) -> Self {
        match err {
            RagError::RemoteService(msg) => ApiError::UpstreamUnavailable(msg),
            RagError::StoreWrite(msg) | RagError::StoreQuery(msg) => ApiError::Internal(msg),
            RagError::UnsupportedInput(msg) => ApiError::BadRequest(msg),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match &self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            ApiError::UpstreamUnavailable(msg) => (StatusCode::BAD_GATEWAY, msg.clone()),
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg.clone()),
        };

        let body = Json(json!({ "error": message }));
        (status, body).into_response()
    }
}
