//! clipsync - HTTP payloads

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::clipboard::ClipboardValue;

/// `{"content": <value>}` in both directions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentPayload {
    pub content: ClipboardValue,
}

/// Success body of `POST /write`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn content_updated() -> Self {
        Self {
            message: "content updated".to_string(),
        }
    }
}

/// Error body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Write payload validation error
#[derive(Debug, thiserror::Error)]
pub enum PayloadError {
    #[error("invalid payload")]
    InvalidPayload,
}

impl IntoResponse for PayloadError {
    fn into_response(self) -> Response {
        let body = ErrorResponse {
            error: self.to_string(),
        };
        (StatusCode::BAD_REQUEST, Json(body)).into_response()
    }
}
