use rusqlite::types::ToSql;
use rusqlite::{params, Connection, OptionalExtension, Row};
use uuid::Uuid;

use super::{enum_column, rating_column, uuid_column};
use crate::db::DatabaseError;
use crate::models::*;

const PROFILE_COLUMNS: &str =
    "p.id, p.actor_id, a.display_name, p.specialty, p.qualification, p.experience_years,
     p.consultation_fee_minor, p.clinic, p.rating_hundredths, p.is_available";

fn profile_from_row(row: &Row<'_>) -> rusqlite::Result<DoctorProfile> {
    Ok(DoctorProfile {
        id: uuid_column(row, 0)?,
        actor_id: uuid_column(row, 1)?,
        display_name: row.get(2)?,
        specialty: enum_column(row, 3)?,
        qualification: row.get(4)?,
        experience_years: row.get(5)?,
        consultation_fee: Money::from_minor(row.get(6)?),
        clinic: row.get(7)?,
        rating: rating_column(row, 8)?,
        is_available: row.get(9)?,
    })
}

/// Inserts a profile. The UNIQUE constraint on `actor_id` rejects a second
/// profile for the same actor.
pub fn insert_doctor_profile(conn: &Connection, profile: &DoctorProfile) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO doctor_profiles (id, actor_id, specialty, qualification, experience_years,
         consultation_fee_minor, clinic, rating_hundredths, is_available)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        params![
            profile.id.to_string(),
            profile.actor_id.to_string(),
            profile.specialty.as_str(),
            profile.qualification,
            profile.experience_years,
            profile.consultation_fee.minor(),
            profile.clinic,
            profile.rating.hundredths(),
            profile.is_available,
        ],
    )?;
    Ok(())
}

pub fn get_doctor_profile(conn: &Connection, id: &Uuid) -> Result<Option<DoctorProfile>, DatabaseError> {
    let sql = format!(
        "SELECT {PROFILE_COLUMNS} FROM doctor_profiles p
         JOIN actors a ON a.id = p.actor_id
         WHERE p.id = ?1"
    );
    Ok(conn
        .query_row(&sql, params![id.to_string()], profile_from_row)
        .optional()?)
}

pub fn get_doctor_profile_by_actor(
    conn: &Connection,
    actor_id: &Uuid,
) -> Result<Option<DoctorProfile>, DatabaseError> {
    let sql = format!(
        "SELECT {PROFILE_COLUMNS} FROM doctor_profiles p
         JOIN actors a ON a.id = p.actor_id
         WHERE p.actor_id = ?1"
    );
    Ok(conn
        .query_row(&sql, params![actor_id.to_string()], profile_from_row)
        .optional()?)
}

/// Lists doctors ordered by name. Unavailable doctors are skipped unless the
/// filter asks for them.
pub fn list_doctor_profiles(
    conn: &Connection,
    filter: &DoctorFilter,
) -> Result<Vec<DoctorProfile>, DatabaseError> {
    let mut sql = format!(
        "SELECT {PROFILE_COLUMNS} FROM doctor_profiles p
         JOIN actors a ON a.id = p.actor_id
         WHERE 1=1"
    );
    let mut params_vec: Vec<Box<dyn ToSql>> = Vec::new();
    let mut param_idx = 1u32;

    if let Some(specialty) = filter.specialty {
        sql.push_str(&format!(" AND p.specialty = ?{param_idx}"));
        params_vec.push(Box::new(specialty.as_str()));
        param_idx += 1;
    }
    if !filter.include_unavailable {
        sql.push_str(" AND p.is_available = 1");
    }
    for term in search_terms(filter.search.as_deref()) {
        sql.push_str(&format!(
            " AND (instr(lower(a.display_name), lower(?{param_idx})) > 0
               OR instr(lower(p.specialty), lower(?{param_idx})) > 0
               OR instr(lower(p.clinic), lower(?{param_idx})) > 0)"
        ));
        params_vec.push(Box::new(term.to_string()));
        param_idx += 1;
    }

    sql.push_str(" ORDER BY a.display_name ASC");

    let param_refs: Vec<&dyn ToSql> = params_vec.iter().map(|p| p.as_ref()).collect();
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(param_refs.as_slice(), profile_from_row)?;

    rows.map(|r| r.map_err(DatabaseError::from)).collect()
}

pub fn set_doctor_availability(
    conn: &Connection,
    profile_id: &Uuid,
    available: bool,
) -> Result<(), DatabaseError> {
    let changed = conn.execute(
        "UPDATE doctor_profiles SET is_available = ?1 WHERE id = ?2",
        params![available, profile_id.to_string()],
    )?;
    if changed == 0 {
        return Err(DatabaseError::NotFound {
            entity_type: "DoctorProfile".into(),
            id: profile_id.to_string(),
        });
    }
    Ok(())
}
