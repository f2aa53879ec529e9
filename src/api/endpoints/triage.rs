//! Symptom triage endpoints. Pure; no store access.

use axum::extract::rejection::JsonRejection;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::api::endpoints::json_body;
use crate::api::error::ApiError;
use crate::triage::{self, TriageCategory, TriageResult};

#[derive(Debug, Deserialize)]
pub struct TriageRequest {
    pub symptoms: String,
    pub age: u32,
    #[serde(default)]
    pub category: Option<String>,
}

#[derive(Serialize)]
pub struct CategoriesResponse {
    pub categories: &'static [TriageCategory],
}

/// `POST /api/triage`
pub async fn classify(
    payload: Result<Json<TriageRequest>, JsonRejection>,
) -> Result<Json<TriageResult>, ApiError> {
    let request = json_body(payload)?;
    let category = request.category.as_deref().map(str::trim).filter(|c| !c.is_empty());
    Ok(Json(triage::classify(&request.symptoms, request.age, category)))
}

/// `GET /api/triage/categories`
pub async fn categories() -> Json<CategoriesResponse> {
    Json(CategoriesResponse {
        categories: triage::categories(),
    })
}
