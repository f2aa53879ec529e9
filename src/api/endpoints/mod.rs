//! API endpoint handlers.
//!
//! Handlers parse the request, run the service call on the blocking pool and
//! wrap the result in a response struct.

pub mod appointments;
pub mod doctors;
pub mod facilities;
pub mod health;
pub mod summaries;
pub mod triage;

use axum::extract::rejection::JsonRejection;
use axum::Json;

use crate::api::error::ApiError;

/// Unwrap a JSON body, turning axum's plain-text rejection into the API's
/// error envelope.
pub(crate) fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| ApiError::BadRequest(rejection.body_text()))
}
