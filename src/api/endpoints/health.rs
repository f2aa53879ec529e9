//! Health check endpoint.

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::api::with_db;
use crate::db;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
    pub schema_tables: i64,
}

/// `GET /api/health`: liveness plus a store round-trip.
pub async fn check(State(ctx): State<ApiContext>) -> Result<Json<HealthResponse>, ApiError> {
    let schema_tables = with_db(&ctx.core, |_, conn| Ok(db::count_tables(conn)?)).await?;

    Ok(Json(HealthResponse {
        status: "ok",
        service: crate::config::APP_NAME,
        version: crate::config::APP_VERSION,
        schema_tables,
    }))
}
