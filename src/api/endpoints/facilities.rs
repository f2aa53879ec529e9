//! Facility endpoints: listing, detail, proximity search, emergency overview.

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::api::error::ApiError;
use crate::api::types::{parse_id, ApiContext};
use crate::api::with_db;
use crate::directory::{self, EmergencyOverview};
use crate::error::CareError;
use crate::models::Facility;
use crate::proximity::{self, NearbySearch};

#[derive(Debug, Deserialize)]
pub struct FacilityQuery {
    pub city: Option<String>,
    pub emergency: Option<String>,
    pub search: Option<String>,
}

/// Raw strings so malformed numbers surface as validation errors with the
/// API's error envelope.
#[derive(Debug, Deserialize)]
pub struct NearbyQuery {
    pub lat: Option<String>,
    pub lon: Option<String>,
    pub radius: Option<String>,
}

#[derive(Serialize)]
pub struct FacilitiesResponse {
    pub facilities: Vec<Facility>,
}

#[derive(Serialize)]
pub struct CitiesResponse {
    pub cities: Vec<String>,
}

#[derive(Serialize)]
pub struct FacilityResponse {
    pub facility: Facility,
}

fn parse_number(field: &'static str, raw: Option<&str>) -> Result<Option<f64>, CareError> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(None),
        Some(s) => s
            .parse::<f64>()
            .map(Some)
            .map_err(|_| CareError::validation(field, format!("'{s}' is not a number"))),
    }
}

/// Any non-empty value other than false/0 enables the flag.
fn flag(raw: Option<&str>) -> bool {
    match raw.map(str::trim) {
        None | Some("") => false,
        Some(v) => !(v.eq_ignore_ascii_case("false") || v == "0"),
    }
}

/// `GET /api/facilities?city=&emergency=&search=`
pub async fn list(
    State(ctx): State<ApiContext>,
    Query(query): Query<FacilityQuery>,
) -> Result<Json<FacilitiesResponse>, ApiError> {
    let emergency_only = flag(query.emergency.as_deref());
    let facilities = with_db(&ctx.core, move |_, conn| {
        Ok(directory::list_facilities(
            conn,
            query.city.as_deref(),
            emergency_only,
            query.search.as_deref(),
        )?)
    })
    .await?;

    Ok(Json(FacilitiesResponse { facilities }))
}

/// `GET /api/facilities/cities`
pub async fn cities(State(ctx): State<ApiContext>) -> Result<Json<CitiesResponse>, ApiError> {
    let cities = with_db(&ctx.core, |_, conn| Ok(directory::list_cities(conn)?)).await?;
    Ok(Json(CitiesResponse { cities }))
}

/// `GET /api/facilities/:id`
pub async fn detail(
    State(ctx): State<ApiContext>,
    Path(id): Path<String>,
) -> Result<Json<FacilityResponse>, ApiError> {
    let id = parse_id(&id)?;
    let facility = with_db(&ctx.core, move |_, conn| Ok(directory::get_facility(conn, &id)?)).await?;

    Ok(Json(FacilityResponse { facility }))
}

/// `GET /api/facilities/nearby?lat=&lon=&radius=`
pub async fn nearby(
    State(ctx): State<ApiContext>,
    Query(query): Query<NearbyQuery>,
) -> Result<Json<NearbySearch>, ApiError> {
    let latitude = parse_number("latitude", query.lat.as_deref())?;
    let longitude = parse_number("longitude", query.lon.as_deref())?;
    let radius_km = parse_number("radius_km", query.radius.as_deref())?;

    let search = with_db(&ctx.core, move |_, conn| {
        Ok(proximity::find_nearby_facilities(conn, latitude, longitude, radius_km)?)
    })
    .await?;

    Ok(Json(search))
}

/// `GET /api/emergency`
pub async fn emergency(State(ctx): State<ApiContext>) -> Result<Json<EmergencyOverview>, ApiError> {
    let overview = with_db(&ctx.core, |_, conn| Ok(directory::emergency_overview(conn)?)).await?;
    Ok(Json(overview))
}
