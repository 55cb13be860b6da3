//! Mapping from the service error taxonomy to HTTP responses.
//!
//! Every failure leaves the server as a JSON body with an `error` field.
//! Guard rejections for an invalid credential additionally carry
//! `discardToken: true` so clients drop what they stored.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use tracing::error;

use reclaim_core::CoreError;

/// An error ready to leave the HTTP boundary.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
    discard_token: bool,
}

impl ApiError {
    /// Classify a service error. Internal detail is withheld unless the
    /// server runs with dev errors enabled; it is always logged.
    pub fn from_core(err: CoreError, dev_errors: bool) -> Self {
        let (status, message) = match &err {
            CoreError::Validation(_) => (StatusCode::BAD_REQUEST, err.to_string()),
            CoreError::Unauthorized => (StatusCode::UNAUTHORIZED, err.to_string()),
            CoreError::Forbidden => (StatusCode::FORBIDDEN, err.to_string()),
            CoreError::NotFound(_) => (StatusCode::NOT_FOUND, err.to_string()),
            CoreError::Conflict(_) => (StatusCode::CONFLICT, err.to_string()),
            CoreError::Unavailable => (StatusCode::SERVICE_UNAVAILABLE, err.to_string()),
            CoreError::Internal(detail) => {
                error!(detail, "Internal error");
                let message = if dev_errors {
                    format!("internal error: {detail}")
                } else {
                    "internal error".to_string()
                };
                (StatusCode::INTERNAL_SERVER_ERROR, message)
            }
        };

        Self {
            status,
            message,
            discard_token: false,
        }
    }

    /// Missing credential.
    pub fn unauthorized() -> Self {
        Self {
            status: StatusCode::UNAUTHORIZED,
            message: "authentication required".to_string(),
            discard_token: false,
        }
    }

    /// Credential present but failed verification; tell the client to
    /// discard it.
    pub fn forbidden_discard(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::FORBIDDEN,
            message: message.into(),
            discard_token: true,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let mut body = json!({ "error": self.message });
        if self.discard_token {
            body["discardToken"] = json!(true);
        }
        (self.status, Json(body)).into_response()
    }
}
