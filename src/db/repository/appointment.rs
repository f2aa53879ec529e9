use chrono::NaiveDateTime;
use rusqlite::{params, Connection, OptionalExtension, Row};
use uuid::Uuid;

use super::{enum_column, uuid_column};
use crate::db::DatabaseError;
use crate::models::enums::AppointmentStatus;
use crate::models::*;

const APPOINTMENT_COLUMNS: &str =
    "id, patient_id, doctor_id, appointment_date, appointment_time, symptoms, status, notes,
     created_at, updated_at";

fn appointment_from_row(row: &Row<'_>) -> rusqlite::Result<Appointment> {
    Ok(Appointment {
        id: uuid_column(row, 0)?,
        patient_id: uuid_column(row, 1)?,
        doctor_id: uuid_column(row, 2)?,
        date: row.get(3)?,
        time: row.get(4)?,
        symptoms: row.get(5)?,
        status: enum_column(row, 6)?,
        notes: row.get(7)?,
        created_at: row.get(8)?,
        updated_at: row.get(9)?,
    })
}

pub fn insert_appointment(conn: &Connection, appt: &Appointment) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO appointments (id, patient_id, doctor_id, appointment_date, appointment_time,
         symptoms, status, notes, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
        params![
            appt.id.to_string(),
            appt.patient_id.to_string(),
            appt.doctor_id.to_string(),
            appt.date,
            appt.time,
            appt.symptoms,
            appt.status.as_str(),
            appt.notes,
            appt.created_at,
            appt.updated_at,
        ],
    )?;
    Ok(())
}

pub fn get_appointment(conn: &Connection, id: &Uuid) -> Result<Option<Appointment>, DatabaseError> {
    let sql = format!("SELECT {APPOINTMENT_COLUMNS} FROM appointments WHERE id = ?1");
    Ok(conn
        .query_row(&sql, params![id.to_string()], appointment_from_row)
        .optional()?)
}

/// Appointments booked by a patient, newest first.
pub fn list_appointments_for_patient(
    conn: &Connection,
    patient_id: &Uuid,
    status: Option<AppointmentStatus>,
) -> Result<Vec<Appointment>, DatabaseError> {
    list_appointments_where(conn, "patient_id", patient_id, status)
}

/// Appointments assigned to a doctor profile, newest first.
pub fn list_appointments_for_doctor(
    conn: &Connection,
    doctor_profile_id: &Uuid,
    status: Option<AppointmentStatus>,
) -> Result<Vec<Appointment>, DatabaseError> {
    list_appointments_where(conn, "doctor_id", doctor_profile_id, status)
}

fn list_appointments_where(
    conn: &Connection,
    owner_column: &'static str,
    owner_id: &Uuid,
    status: Option<AppointmentStatus>,
) -> Result<Vec<Appointment>, DatabaseError> {
    let sql = format!(
        "SELECT {APPOINTMENT_COLUMNS} FROM appointments
         WHERE {owner_column} = ?1 AND (?2 IS NULL OR status = ?2)
         ORDER BY appointment_date DESC, appointment_time DESC"
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(
        params![owner_id.to_string(), status.map(|s| s.as_str())],
        appointment_from_row,
    )?;

    rows.map(|r| r.map_err(DatabaseError::from)).collect()
}

/// Writes `next` only if the stored status still equals `expected`.
/// Returns `false` when another writer got there first.
pub fn compare_and_set_status(
    conn: &Connection,
    id: &Uuid,
    expected: AppointmentStatus,
    next: AppointmentStatus,
    updated_at: NaiveDateTime,
) -> Result<bool, DatabaseError> {
    let changed = conn.execute(
        "UPDATE appointments SET status = ?1, updated_at = ?2
         WHERE id = ?3 AND status = ?4",
        params![next.as_str(), updated_at, id.to_string(), expected.as_str()],
    )?;
    Ok(changed == 1)
}
