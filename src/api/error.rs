//! API error types with structured JSON responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::core_state::CoreError;
use crate::error::CareError;

/// Structured error response body.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub code: &'static str,
    pub message: String,
}

/// API-level errors with HTTP status mapping.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Actor identity required")]
    ActorRequired,
    #[error("Validation failed: {0}")]
    Validation(String),
    #[error("Forbidden: {0}")]
    Forbidden(String),
    #[error("Invalid transition: {0}")]
    InvalidTransition(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Invalid request: {0}")]
    BadRequest(String),
    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            ApiError::ActorRequired => (
                StatusCode::UNAUTHORIZED,
                "ACTOR_REQUIRED",
                "A known actor id is required in the X-Actor-Id header".to_string(),
            ),
            ApiError::Validation(detail) => (StatusCode::BAD_REQUEST, "VALIDATION", detail),
            ApiError::Forbidden(detail) => (StatusCode::FORBIDDEN, "FORBIDDEN", detail),
            ApiError::InvalidTransition(detail) => {
                (StatusCode::CONFLICT, "INVALID_TRANSITION", detail)
            }
            ApiError::NotFound(detail) => (StatusCode::NOT_FOUND, "NOT_FOUND", detail),
            ApiError::BadRequest(detail) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", detail),
            ApiError::Internal(detail) => {
                tracing::error!(%detail, "API internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL",
                    "An internal error occurred".to_string(),
                )
            }
        };

        let body = ErrorBody {
            error: ErrorDetail { code, message },
        };
        (status, Json(body)).into_response()
    }
}

impl From<CareError> for ApiError {
    fn from(err: CareError) -> Self {
        match &err {
            CareError::Validation { .. } => ApiError::Validation(err.to_string()),
            CareError::Permission(detail) => ApiError::Forbidden(detail.clone()),
            CareError::InvalidTransition { .. } => ApiError::InvalidTransition(err.to_string()),
            CareError::NotFound { .. } => ApiError::NotFound(err.to_string()),
            CareError::Database(e) => ApiError::Internal(e.to_string()),
        }
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        ApiError::Internal(err.to_string())
    }
}

impl From<crate::db::DatabaseError> for ApiError {
    fn from(err: crate::db::DatabaseError) -> Self {
        ApiError::Internal(err.to_string())
    }
}
