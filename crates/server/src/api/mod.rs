//! HTTP handlers.

mod health;
mod run;

pub use health::{health, root};
pub use run::run;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use docqa_ingest::embedding::EmbeddingError;
use docqa_ingest::{document::ExtractionError, FetchError};
use serde_json::json;

/// Document-level failure. Question-level failures never surface here; they
/// are reported inline in the answers array.
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(json!({
                "success": false,
                "error": self.message,
            })),
        )
            .into_response()
    }
}

impl From<FetchError> for ApiError {
    fn from(e: FetchError) -> Self {
        let status = match &e {
            // An unreadable local path is the caller's mistake; upstream
            // HTTP failures are a gateway problem.
            FetchError::Io { .. } => StatusCode::BAD_REQUEST,
            FetchError::Http(_) | FetchError::Status(_) => StatusCode::BAD_GATEWAY,
        };
        Self::new(status, format!("failed to fetch document: {e}"))
    }
}

impl From<ExtractionError> for ApiError {
    fn from(e: ExtractionError) -> Self {
        Self::new(
            StatusCode::UNPROCESSABLE_ENTITY,
            format!("failed to process document: {e}"),
        )
    }
}

impl From<EmbeddingError> for ApiError {
    fn from(e: EmbeddingError) -> Self {
        Self::new(
            StatusCode::BAD_GATEWAY,
            format!("failed to index document: {e}"),
        )
    }
}
