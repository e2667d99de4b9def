//! Maps the core error taxonomy onto HTTP responses.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::error;

use crate::common::{AuthError, CoreError};

#[derive(Serialize)]
pub struct ErrorBody {
    pub success: bool,
    pub error: String,
}

impl IntoResponse for CoreError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            CoreError::Validation(message) => (StatusCode::BAD_REQUEST, message.clone()),
            CoreError::Authorization(AuthError::AdminRequired) => {
                (StatusCode::FORBIDDEN, self.to_string())
            }
            CoreError::Authorization(_) => (StatusCode::UNAUTHORIZED, self.to_string()),
            CoreError::NotFound(_) => (StatusCode::NOT_FOUND, self.to_string()),
            CoreError::Locked(_) => (StatusCode::LOCKED, self.to_string()),
            CoreError::Conflict(message) => (StatusCode::CONFLICT, message.clone()),
            CoreError::Upstream(_) => (
                StatusCode::BAD_GATEWAY,
                "media origin unavailable".to_string(),
            ),
            CoreError::Internal(e) => {
                error!(error = ?e, "Request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal server error".to_string(),
                )
            }
        };

        (
            status,
            Json(ErrorBody {
                success: false,
                error: message,
            }),
        )
            .into_response()
    }
}

/// Malformed or mistyped JSON bodies are validation errors, not 422s.
pub fn json_rejection(rejection: JsonRejection) -> CoreError {
    CoreError::Validation(rejection.body_text())
}
