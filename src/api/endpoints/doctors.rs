//! Doctor directory endpoints, plus the owning doctor's availability switch.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::{Extension, Json};
use serde::{Deserialize, Serialize};

use crate::api::endpoints::json_body;
use crate::api::error::ApiError;
use crate::api::types::{parse_id, ActorContext, ApiContext};
use crate::api::with_db;
use crate::directory;
use crate::models::DoctorProfile;

#[derive(Debug, Deserialize)]
pub struct DoctorQuery {
    pub specialty: Option<String>,
    pub search: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AvailabilityRequest {
    pub is_available: bool,
}

#[derive(Serialize)]
pub struct DoctorsResponse {
    pub doctors: Vec<DoctorProfile>,
}

#[derive(Serialize)]
pub struct DoctorResponse {
    pub doctor: DoctorProfile,
}

/// `GET /api/doctors?specialty=&search=`: doctors accepting bookings.
pub async fn list(
    State(ctx): State<ApiContext>,
    Query(query): Query<DoctorQuery>,
) -> Result<Json<DoctorsResponse>, ApiError> {
    let doctors = with_db(&ctx.core, move |_, conn| {
        Ok(directory::list_doctors(conn, query.specialty.as_deref(), query.search.as_deref())?)
    })
    .await?;

    Ok(Json(DoctorsResponse { doctors }))
}

/// `GET /api/doctors/:id`
pub async fn detail(
    State(ctx): State<ApiContext>,
    Path(id): Path<String>,
) -> Result<Json<DoctorResponse>, ApiError> {
    let id = parse_id(&id)?;
    let doctor = with_db(&ctx.core, move |_, conn| Ok(directory::get_doctor(conn, &id)?)).await?;

    Ok(Json(DoctorResponse { doctor }))
}

/// `PUT /api/doctors/me/availability`
pub async fn set_availability(
    State(ctx): State<ApiContext>,
    Extension(caller): Extension<ActorContext>,
    payload: Result<Json<AvailabilityRequest>, JsonRejection>,
) -> Result<Json<DoctorResponse>, ApiError> {
    let request = json_body(payload)?;
    let doctor = with_db(&ctx.core, move |_, conn| {
        Ok(directory::set_availability(conn, &caller.actor, request.is_available)?)
    })
    .await?;

    Ok(Json(DoctorResponse { doctor }))
}
