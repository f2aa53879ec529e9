//! Appointment endpoints.
//!
//! - `POST /api/appointments`: book (patients only)
//! - `GET /api/appointments?status=`: role-scoped list
//! - `GET /api/appointments/:id`: single appointment
//! - `POST /api/appointments/:id/status`: assigned doctor moves the status
//! - `POST /api/appointments/:id/cancel`: either participant cancels

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::{Extension, Json};
use serde::{Deserialize, Serialize};

use crate::api::endpoints::json_body;
use crate::api::error::ApiError;
use crate::api::types::{parse_id, ActorContext, ApiContext};
use crate::api::with_db;
use crate::appointment::{self, BookingRequest};
use crate::models::Appointment;

#[derive(Serialize)]
pub struct AppointmentResponse {
    pub appointment: Appointment,
}

#[derive(Serialize)]
pub struct AppointmentsResponse {
    pub appointments: Vec<Appointment>,
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub status: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct StatusRequest {
    pub status: String,
}

/// `POST /api/appointments`: book a new appointment.
pub async fn create(
    State(ctx): State<ApiContext>,
    Extension(caller): Extension<ActorContext>,
    payload: Result<Json<BookingRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<AppointmentResponse>), ApiError> {
    let request = json_body(payload)?;
    let appointment = with_db(&ctx.core, move |core, conn| {
        Ok(appointment::book_appointment(conn, core.clock(), &caller.actor, request)?)
    })
    .await?;

    Ok((StatusCode::CREATED, Json(AppointmentResponse { appointment })))
}

/// `GET /api/appointments`: appointments visible to the caller.
pub async fn list(
    State(ctx): State<ApiContext>,
    Extension(caller): Extension<ActorContext>,
    Query(query): Query<ListQuery>,
) -> Result<Json<AppointmentsResponse>, ApiError> {
    let appointments = with_db(&ctx.core, move |_, conn| {
        let status = query.status.as_deref().filter(|s| !s.trim().is_empty());
        Ok(appointment::list_appointments(conn, &caller.actor, status)?)
    })
    .await?;

    Ok(Json(AppointmentsResponse { appointments }))
}

/// `GET /api/appointments/:id`
pub async fn detail(
    State(ctx): State<ApiContext>,
    Extension(caller): Extension<ActorContext>,
    Path(id): Path<String>,
) -> Result<Json<AppointmentResponse>, ApiError> {
    let id = parse_id(&id)?;
    let appointment = with_db(&ctx.core, move |_, conn| {
        Ok(appointment::get_appointment(conn, &caller.actor, &id)?)
    })
    .await?;

    Ok(Json(AppointmentResponse { appointment }))
}

/// `POST /api/appointments/:id/status`
pub async fn update_status(
    State(ctx): State<ApiContext>,
    Extension(caller): Extension<ActorContext>,
    Path(id): Path<String>,
    payload: Result<Json<StatusRequest>, JsonRejection>,
) -> Result<Json<AppointmentResponse>, ApiError> {
    let id = parse_id(&id)?;
    let request = json_body(payload)?;
    let appointment = with_db(&ctx.core, move |core, conn| {
        Ok(appointment::update_status(conn, core.clock(), &caller.actor, &id, &request.status)?)
    })
    .await?;

    Ok(Json(AppointmentResponse { appointment }))
}

/// `POST /api/appointments/:id/cancel`
pub async fn cancel(
    State(ctx): State<ApiContext>,
    Extension(caller): Extension<ActorContext>,
    Path(id): Path<String>,
) -> Result<Json<AppointmentResponse>, ApiError> {
    let id = parse_id(&id)?;
    let appointment = with_db(&ctx.core, move |core, conn| {
        Ok(appointment::cancel(conn, core.clock(), &caller.actor, &id)?)
    })
    .await?;

    Ok(Json(AppointmentResponse { appointment }))
}
