//! API error responder.
//!
//! Maps [`EngineError`] onto HTTP statuses and a JSON error body shaped the
//! way the admin console expects: `{"error": {"message", "type"}}`.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use routing_core::EngineError;
use serde_json::json;

/// An error response returned by any handler
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
    code: String,
}

impl ApiError {
    /// Create an error with an explicit status
    pub fn new(status: StatusCode, message: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            code: code.into(),
        }
    }

    /// 400 Bad Request
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message, "bad_request")
    }

    /// 404 Not Found
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message, "not_found")
    }

    /// 502 Bad Gateway
    pub fn bad_gateway(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_GATEWAY, message, "bad_gateway")
    }

    /// 503 Service Unavailable
    pub fn service_unavailable(message: impl Into<String>) -> Self {
        Self::new(
            StatusCode::SERVICE_UNAVAILABLE,
            message,
            "service_unavailable",
        )
    }

    /// 500 Internal Server Error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message, "internal_error")
    }

    /// The response status
    #[must_use]
    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl From<EngineError> for ApiError {
    fn from(error: EngineError) -> Self {
        match &error {
            EngineError::Validation { code, .. } => {
                Self::new(StatusCode::BAD_REQUEST, error.to_string(), code.clone())
            }
            EngineError::NotFound { .. } => {
                Self::new(StatusCode::NOT_FOUND, error.to_string(), "not_found")
            }
            EngineError::Provider { .. } => {
                Self::new(StatusCode::BAD_GATEWAY, error.to_string(), "provider_error")
            }
            EngineError::Timeout { .. } => Self::new(
                StatusCode::GATEWAY_TIMEOUT,
                error.to_string(),
                "provider_timeout",
            ),
            EngineError::Exhausted { .. } => Self::new(
                StatusCode::BAD_GATEWAY,
                error.to_string(),
                "chain_exhausted",
            ),
            EngineError::Cancelled => Self::new(
                StatusCode::SERVICE_UNAVAILABLE,
                error.to_string(),
                "cancelled",
            ),
            EngineError::Store { .. } => Self::new(
                StatusCode::SERVICE_UNAVAILABLE,
                error.to_string(),
                "store_unavailable",
            ),
            EngineError::Internal { .. } => Self::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                error.to_string(),
                "internal_error",
            ),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(json!({
            "error": {
                "message": self.message,
                "type": self.code,
            }
        }));
        (self.status, body).into_response()
    }
}
