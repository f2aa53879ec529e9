//! Read-only directory of doctors and facilities.

use std::str::FromStr;

use rusqlite::Connection;
use serde::Serialize;
use uuid::Uuid;

use crate::config::{AMBULANCE_NUMBER, EMERGENCY_FACILITY_LIMIT, EMERGENCY_NUMBER};
use crate::db::repository;
use crate::error::CareError;
use crate::models::enums::Specialty;
use crate::models::{Actor, DoctorFilter, DoctorProfile, Facility, FacilityFilter};

#[derive(Debug, Serialize)]
pub struct EmergencyOverview {
    pub emergency_number: &'static str,
    pub ambulance_number: &'static str,
    pub facilities: Vec<Facility>,
}

fn non_blank(s: Option<&str>) -> Option<String> {
    s.map(str::trim).filter(|s| !s.is_empty()).map(String::from)
}

/// Doctors accepting bookings, optionally narrowed to one specialty and by
/// free-text search over name, specialty and clinic.
pub fn list_doctors(
    conn: &Connection,
    specialty: Option<&str>,
    search: Option<&str>,
) -> Result<Vec<DoctorProfile>, CareError> {
    let specialty = specialty
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            Specialty::from_str(s)
                .map_err(|_| CareError::validation("specialty", format!("unknown specialty '{s}'")))
        })
        .transpose()?;

    let filter = DoctorFilter {
        specialty,
        include_unavailable: false,
        search: non_blank(search),
    };
    Ok(repository::list_doctor_profiles(conn, &filter)?)
}

pub fn get_doctor(conn: &Connection, id: &Uuid) -> Result<DoctorProfile, CareError> {
    repository::get_doctor_profile(conn, id)?.ok_or_else(|| CareError::not_found("DoctorProfile", id))
}

/// Facilities filtered by city substring, emergency capability and
/// free-text search over name, city and address.
pub fn list_facilities(
    conn: &Connection,
    city: Option<&str>,
    emergency_only: bool,
    search: Option<&str>,
) -> Result<Vec<Facility>, CareError> {
    let filter = FacilityFilter {
        city: non_blank(city),
        emergency_only,
        search: non_blank(search),
    };
    Ok(repository::list_facilities(conn, &filter)?)
}

/// Every city with at least one facility, for filter pickers.
pub fn list_cities(conn: &Connection) -> Result<Vec<String>, CareError> {
    Ok(repository::list_facility_cities(conn)?)
}

/// Lets a doctor open or close their own calendar to new bookings.
pub fn set_availability(conn: &Connection, actor: &Actor, available: bool) -> Result<DoctorProfile, CareError> {
    let profile = actor
        .doctor_profile()
        .ok_or_else(|| CareError::permission("only a doctor with a profile can change availability"))?;

    repository::set_doctor_availability(conn, &profile.id, available)?;
    tracing::info!(doctor_id = %profile.id, available, "Doctor availability changed");

    repository::get_doctor_profile(conn, &profile.id)?.ok_or_else(|| CareError::not_found("DoctorProfile", &profile.id))
}

pub fn get_facility(conn: &Connection, id: &Uuid) -> Result<Facility, CareError> {
    repository::get_facility(conn, id)?.ok_or_else(|| CareError::not_found("Facility", id))
}

/// Emergency numbers plus a bounded list of emergency-capable facilities.
pub fn emergency_overview(conn: &Connection) -> Result<EmergencyOverview, CareError> {
    let mut facilities = list_facilities(conn, None, true, None)?;
    facilities.truncate(EMERGENCY_FACILITY_LIMIT);
    Ok(EmergencyOverview {
        emergency_number: EMERGENCY_NUMBER,
        ambulance_number: AMBULANCE_NUMBER,
        facilities,
    })
}
