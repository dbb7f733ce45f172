use crate::error::ReceiptError;
use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use tracing::error;

/// An error rendered as `{"error": "<message>"}` with a status code.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    /// Maps a failed ingest. Storage details stay in the logs.
    pub fn processing(err: ReceiptError) -> Self {
        match err {
            ReceiptError::InvalidInput(message) => Self::new(StatusCode::BAD_REQUEST, message),
            other => {
                error!(error = %other, "failed to process receipt");
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, "Error processing receipt")
            }
        }
    }
}

impl From<ReceiptError> for ApiError {
    fn from(err: ReceiptError) -> Self {
        match err {
            ReceiptError::InvalidInput(message) => Self::new(StatusCode::BAD_REQUEST, message),
            ReceiptError::NotFound(_) => Self::not_found("Receipt not found"),
            other => {
                error!(error = %other, "request failed");
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}
