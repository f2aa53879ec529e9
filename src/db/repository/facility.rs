use rusqlite::types::ToSql;
use rusqlite::{params, Connection, OptionalExtension, Row};
use uuid::Uuid;

use super::{rating_column, uuid_column};
use crate::db::DatabaseError;
use crate::models::*;

const FACILITY_COLUMNS: &str =
    "id, name, address, city, state, contact_number, latitude, longitude, has_emergency,
     has_ambulance, beds_available, rating_hundredths";

fn facility_from_row(row: &Row<'_>) -> rusqlite::Result<Facility> {
    Ok(Facility {
        id: uuid_column(row, 0)?,
        name: row.get(1)?,
        address: row.get(2)?,
        city: row.get(3)?,
        state: row.get(4)?,
        contact_number: row.get(5)?,
        latitude: row.get(6)?,
        longitude: row.get(7)?,
        has_emergency: row.get(8)?,
        has_ambulance: row.get(9)?,
        beds_available: row.get(10)?,
        rating: rating_column(row, 11)?,
    })
}

pub fn insert_facility(conn: &Connection, facility: &Facility) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO facilities (id, name, address, city, state, contact_number, latitude,
         longitude, has_emergency, has_ambulance, beds_available, rating_hundredths)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
        params![
            facility.id.to_string(),
            facility.name,
            facility.address,
            facility.city,
            facility.state,
            facility.contact_number,
            facility.latitude,
            facility.longitude,
            facility.has_emergency,
            facility.has_ambulance,
            facility.beds_available,
            facility.rating.hundredths(),
        ],
    )?;
    Ok(())
}

pub fn get_facility(conn: &Connection, id: &Uuid) -> Result<Option<Facility>, DatabaseError> {
    let sql = format!("SELECT {FACILITY_COLUMNS} FROM facilities WHERE id = ?1");
    Ok(conn
        .query_row(&sql, params![id.to_string()], facility_from_row)
        .optional()?)
}

/// Emergency-capable facilities first, then by name.
///
/// Text filters are plain substring matches via `instr`, so `%` and `_` in
/// user input match literally.
pub fn list_facilities(
    conn: &Connection,
    filter: &FacilityFilter,
) -> Result<Vec<Facility>, DatabaseError> {
    let mut sql = format!("SELECT {FACILITY_COLUMNS} FROM facilities WHERE 1=1");
    let mut params_vec: Vec<Box<dyn ToSql>> = Vec::new();
    let mut param_idx = 1u32;

    if let Some(ref city) = filter.city {
        sql.push_str(&format!(" AND instr(lower(city), lower(?{param_idx})) > 0"));
        params_vec.push(Box::new(city.clone()));
        param_idx += 1;
    }
    if filter.emergency_only {
        sql.push_str(" AND has_emergency = 1");
    }
    for term in search_terms(filter.search.as_deref()) {
        sql.push_str(&format!(
            " AND (instr(lower(name), lower(?{param_idx})) > 0
               OR instr(lower(city), lower(?{param_idx})) > 0
               OR instr(lower(address), lower(?{param_idx})) > 0)"
        ));
        params_vec.push(Box::new(term.to_string()));
        param_idx += 1;
    }

    sql.push_str(" ORDER BY has_emergency DESC, name ASC");

    let param_refs: Vec<&dyn ToSql> = params_vec.iter().map(|p| p.as_ref()).collect();
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(param_refs.as_slice(), facility_from_row)?;

    rows.map(|r| r.map_err(DatabaseError::from)).collect()
}

/// Distinct city names, alphabetically.
pub fn list_facility_cities(conn: &Connection) -> Result<Vec<String>, DatabaseError> {
    let mut stmt = conn.prepare("SELECT DISTINCT city FROM facilities ORDER BY city ASC")?;
    let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;

    rows.map(|r| r.map_err(DatabaseError::from)).collect()
}

/// Facilities carrying both coordinates, in name order.
pub fn list_geolocated_facilities(conn: &Connection) -> Result<Vec<Facility>, DatabaseError> {
    let sql = format!(
        "SELECT {FACILITY_COLUMNS} FROM facilities
         WHERE latitude IS NOT NULL AND longitude IS NOT NULL
         ORDER BY name ASC"
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map([], facility_from_row)?;

    rows.map(|r| r.map_err(DatabaseError::from)).collect()
}
