//! Consultation summary endpoints.
//!
//! - `PUT /api/appointments/:id/summary`: assigned doctor writes the record
//! - `GET /api/appointments/:id/summary`: either participant reads it
//! - `GET /api/summaries`: role-scoped list

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::{Extension, Json};
use serde::Serialize;

use crate::api::endpoints::json_body;
use crate::api::error::ApiError;
use crate::api::types::{parse_id, ActorContext, ApiContext};
use crate::api::with_db;
use crate::consultation;
use crate::models::{ConsultationFields, ConsultationRecord};

#[derive(Serialize)]
pub struct SummaryResponse {
    pub summary: ConsultationRecord,
}

#[derive(Serialize)]
pub struct SummariesResponse {
    pub summaries: Vec<ConsultationRecord>,
}

/// `PUT /api/appointments/:id/summary`
pub async fn upsert(
    State(ctx): State<ApiContext>,
    Extension(caller): Extension<ActorContext>,
    Path(id): Path<String>,
    payload: Result<Json<ConsultationFields>, JsonRejection>,
) -> Result<Json<SummaryResponse>, ApiError> {
    let id = parse_id(&id)?;
    let fields = json_body(payload)?;
    let summary = with_db(&ctx.core, move |core, conn| {
        Ok(consultation::create_or_amend_summary(conn, core.clock(), &caller.actor, &id, fields)?)
    })
    .await?;

    Ok(Json(SummaryResponse { summary }))
}

/// `GET /api/appointments/:id/summary`
pub async fn read(
    State(ctx): State<ApiContext>,
    Extension(caller): Extension<ActorContext>,
    Path(id): Path<String>,
) -> Result<Json<SummaryResponse>, ApiError> {
    let id = parse_id(&id)?;
    let summary = with_db(&ctx.core, move |_, conn| {
        Ok(consultation::read_summary(conn, &caller.actor, &id)?)
    })
    .await?;

    Ok(Json(SummaryResponse { summary }))
}

/// `GET /api/summaries`
pub async fn list(
    State(ctx): State<ApiContext>,
    Extension(caller): Extension<ActorContext>,
) -> Result<Json<SummariesResponse>, ApiError> {
    let summaries = with_db(&ctx.core, move |_, conn| {
        Ok(consultation::list_summaries(conn, &caller.actor)?)
    })
    .await?;

    Ok(Json(SummariesResponse { summaries }))
}
