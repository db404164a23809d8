//! Error types for chat-api
//!
//! Every failure leaving a handler is converted here into the uniform
//! `{error, status: "error"}` JSON envelope with the mapped HTTP status.
//! This is the only place error kinds are translated to transport codes.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;

/// chat-api error type
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Invalid request format. JSON required.")]
    InvalidJson,

    #[error("No session ID provided")]
    MissingSessionId,

    #[error("Session not found: {0}")]
    SessionNotFound(String),

    #[error(transparent)]
    Core(#[from] chat_core::Error),
}

impl ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidJson | Self::MissingSessionId => StatusCode::BAD_REQUEST,
            Self::SessionNotFound(_) => StatusCode::NOT_FOUND,
            // Storage and upstream-completion failures, including the
            // empty-message guard, all surface as 500.
            Self::Core(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(json!({
            "error": self.to_string(),
            "status": "error",
        }));
        (status, body).into_response()
    }
}

/// Result type alias for chat-api handlers
pub type Result<T> = std::result::Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(ApiError::InvalidJson.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            ApiError::MissingSessionId.status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::SessionNotFound("x".into()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::Core(chat_core::Error::EmptyMessage).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_empty_message_display() {
        let err = ApiError::Core(chat_core::Error::EmptyMessage);
        assert_eq!(err.to_string(), "Empty message");
    }
}
