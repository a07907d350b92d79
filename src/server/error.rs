use axum::Json;
use axum::http::StatusCode;
use axum::response::IntoResponse;

use crate::storage::StoreError;

/// Error answered by the HTTP layer.
///
/// Store failures are logged with their detail and answered with a generic
/// body, so a caller never learns anything about the backing database.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    BadRequest(String),

    #[error("chat store unavailable")]
    StoreUnavailable,

    #[error("internal error")]
    Internal(String),
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Rejected(reason) => AppError::BadRequest(reason),
            other => {
                log::error!("Chat store error: {other}");
                AppError::StoreUnavailable
            }
        }
    }
}

impl From<tokio::task::JoinError> for AppError {
    fn from(err: tokio::task::JoinError) -> Self {
        AppError::Internal(err.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let status = match &self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::StoreUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Internal(detail) => {
                log::error!("Request failed: {detail}");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let body = Json(serde_json::json!({
            "error": self.to_string()
        }));

        (status, body).into_response()
    }
}
