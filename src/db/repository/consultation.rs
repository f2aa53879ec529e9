use rusqlite::{params, Connection, OptionalExtension, Row};
use uuid::Uuid;

use super::uuid_column;
use crate::db::DatabaseError;
use crate::models::*;

const RECORD_COLUMNS: &str =
    "r.id, r.appointment_id, r.diagnosis, r.prescribed_treatment, r.instructions, r.diet_notes,
     r.follow_up_required, r.follow_up_date, r.created_at, r.updated_at";

fn record_from_row(row: &Row<'_>) -> rusqlite::Result<ConsultationRecord> {
    Ok(ConsultationRecord {
        id: uuid_column(row, 0)?,
        appointment_id: uuid_column(row, 1)?,
        diagnosis: row.get(2)?,
        prescribed_treatment: row.get(3)?,
        instructions: row.get(4)?,
        diet_notes: row.get(5)?,
        follow_up_required: row.get(6)?,
        follow_up_date: row.get(7)?,
        created_at: row.get(8)?,
        updated_at: row.get(9)?,
    })
}

pub fn get_consultation_record(
    conn: &Connection,
    appointment_id: &Uuid,
) -> Result<Option<ConsultationRecord>, DatabaseError> {
    let sql = format!(
        "SELECT {RECORD_COLUMNS} FROM consultation_records r WHERE r.appointment_id = ?1"
    );
    Ok(conn
        .query_row(&sql, params![appointment_id.to_string()], record_from_row)
        .optional()?)
}

/// Inserts the record, or replaces the content of the existing record for
/// the same appointment. `id` and `created_at` of an existing row are kept.
pub fn upsert_consultation_record(
    conn: &Connection,
    record: &ConsultationRecord,
) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO consultation_records (id, appointment_id, diagnosis, prescribed_treatment,
         instructions, diet_notes, follow_up_required, follow_up_date, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
         ON CONFLICT(appointment_id) DO UPDATE SET
            diagnosis = excluded.diagnosis,
            prescribed_treatment = excluded.prescribed_treatment,
            instructions = excluded.instructions,
            diet_notes = excluded.diet_notes,
            follow_up_required = excluded.follow_up_required,
            follow_up_date = excluded.follow_up_date,
            updated_at = excluded.updated_at",
        params![
            record.id.to_string(),
            record.appointment_id.to_string(),
            record.diagnosis,
            record.prescribed_treatment,
            record.instructions,
            record.diet_notes,
            record.follow_up_required,
            record.follow_up_date,
            record.created_at,
            record.updated_at,
        ],
    )?;
    Ok(())
}

/// Records on appointments booked by a patient, newest appointment first.
pub fn list_records_for_patient(
    conn: &Connection,
    patient_id: &Uuid,
) -> Result<Vec<ConsultationRecord>, DatabaseError> {
    list_records_where(conn, "a.patient_id", patient_id)
}

/// Records on appointments assigned to a doctor profile.
pub fn list_records_for_doctor(
    conn: &Connection,
    doctor_profile_id: &Uuid,
) -> Result<Vec<ConsultationRecord>, DatabaseError> {
    list_records_where(conn, "a.doctor_id", doctor_profile_id)
}

fn list_records_where(
    conn: &Connection,
    owner_column: &'static str,
    owner_id: &Uuid,
) -> Result<Vec<ConsultationRecord>, DatabaseError> {
    let sql = format!(
        "SELECT {RECORD_COLUMNS} FROM consultation_records r
         JOIN appointments a ON a.id = r.appointment_id
         WHERE {owner_column} = ?1
         ORDER BY a.appointment_date DESC, a.appointment_time DESC"
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params![owner_id.to_string()], record_from_row)?;

    rows.map(|r| r.map_err(DatabaseError::from)).collect()
}

pub fn count_consultation_records(conn: &Connection, appointment_id: &Uuid) -> Result<i64, DatabaseError> {
    let count = conn.query_row(
        "SELECT COUNT(*) FROM consultation_records WHERE appointment_id = ?1",
        params![appointment_id.to_string()],
        |row| row.get(0),
    )?;
    Ok(count)
}
