//! API error types with HTTP response mapping.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use common::ContextError;
use domain::{DomainError, ValidationError};

/// API-level error type that maps to HTTP responses.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Bad request from the client.
    #[error("{0}")]
    BadRequest(String),
    /// Domain logic error.
    #[error(transparent)]
    Domain(#[from] DomainError),
}

impl ApiError {
    /// Status code and metrics label for this error.
    fn classify(&self) -> (StatusCode, &'static str) {
        match self {
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, "bad_request"),
            ApiError::Domain(err) => match err {
                DomainError::Validation(_) => (StatusCode::BAD_REQUEST, "validation"),
                DomainError::ProductNotFound(_) => (StatusCode::NOT_FOUND, "not_found"),
                DomainError::ProductExists(_) => (StatusCode::CONFLICT, "exists"),
                DomainError::InsufficientStock(_) => (StatusCode::CONFLICT, "insufficient_stock"),
                DomainError::ConcurrencyConflict { .. } => (StatusCode::CONFLICT, "conflict"),
                DomainError::Interrupted(ContextError::Cancelled) => {
                    (StatusCode::SERVICE_UNAVAILABLE, "cancelled")
                }
                DomainError::Interrupted(ContextError::DeadlineExceeded) => {
                    (StatusCode::GATEWAY_TIMEOUT, "deadline_exceeded")
                }
                DomainError::Repository(_) => (StatusCode::INTERNAL_SERVER_ERROR, "repository"),
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, kind) = self.classify();
        metrics::counter!("catalog_errors_total", "kind" => kind).increment(1);

        if status.is_server_error() {
            tracing::error!(error = %self, kind, "request failed");
        } else {
            tracing::debug!(error = %self, kind, "request rejected");
        }

        let body = serde_json::json!({ "error": self.to_string() });
        (status, axum::Json(body)).into_response()
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::Domain(DomainError::Validation(err))
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}
