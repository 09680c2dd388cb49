//! Error types surfaced by the HTTP layer.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde_json::json;

use crate::core::store::StoreError;

/// Every failure a handler can return.
///
/// Rendered as `{"error": <message>}` with the matching status code.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Request rejected before any side effect.
    #[error("{0}")]
    Validation(String),

    /// Requested record does not exist.
    #[error("{0}")]
    NotFound(String),

    /// External collaborator (LLM, STT, TTS) failed.
    #[error("{0}")]
    Upstream(String),

    /// Storage failure.
    #[error("Database error: {0}")]
    Store(#[from] StoreError),

    /// Anything else.
    #[error("Unexpected error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) | ApiError::Store(StoreError::Invalid(_)) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Upstream(_) | ApiError::Store(_) | ApiError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        } else {
            tracing::debug!(error = %self, "request rejected");
        }
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

/// Convenience result type for handlers.
pub type ApiResult<T> = std::result::Result<T, ApiError>;
