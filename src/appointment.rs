//! Appointment lifecycle: booking, scoped reads, status changes, cancellation.
//!
//! State machine:
//! pending → confirmed | cancelled
//! confirmed → completed | cancelled
//! completed, cancelled → (terminal)
//!
//! Status writes run inside an IMMEDIATE transaction and compare-and-set on
//! the status column, so two writers racing on one appointment serialize and
//! the loser sees `InvalidTransition`.

use std::str::FromStr;

use chrono::{NaiveDate, NaiveTime};
use rusqlite::{Connection, TransactionBehavior};
use serde::Deserialize;
use uuid::Uuid;

use crate::authorization::{
    listing_scope, require_assigned_doctor, require_participant, require_patient, ListingScope,
};
use crate::clock::Clock;
use crate::db::repository;
use crate::error::CareError;
use crate::models::enums::AppointmentStatus;
use crate::models::{Actor, Appointment};

pub const MAX_SYMPTOMS_LEN: usize = 5000;
pub const MAX_NOTES_LEN: usize = 2000;

// ─── Types ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
pub struct BookingRequest {
    /// Doctor profile id.
    pub doctor_id: Uuid,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub symptoms: String,
    #[serde(default)]
    pub notes: Option<String>,
}

// ─── Helpers ──────────────────────────────────────────────────────────────────

pub(crate) fn load_appointment(conn: &Connection, id: &Uuid) -> Result<Appointment, CareError> {
    repository::get_appointment(conn, id)?.ok_or_else(|| CareError::not_found("Appointment", id))
}

pub fn parse_status(raw: &str) -> Result<AppointmentStatus, CareError> {
    AppointmentStatus::from_str(raw.trim())
        .map_err(|_| CareError::validation("status", format!("unknown status '{raw}'")))
}

fn validate_booking(req: &BookingRequest) -> Result<(String, Option<String>), CareError> {
    let symptoms = req.symptoms.trim();
    if symptoms.is_empty() {
        return Err(CareError::validation("symptoms", "must not be empty"));
    }
    if symptoms.chars().count() > MAX_SYMPTOMS_LEN {
        return Err(CareError::validation(
            "symptoms",
            format!("must be at most {MAX_SYMPTOMS_LEN} characters"),
        ));
    }

    let notes = req
        .notes
        .as_deref()
        .map(str::trim)
        .filter(|n| !n.is_empty());
    if let Some(n) = notes {
        if n.chars().count() > MAX_NOTES_LEN {
            return Err(CareError::validation(
                "notes",
                format!("must be at most {MAX_NOTES_LEN} characters"),
            ));
        }
    }

    Ok((symptoms.to_string(), notes.map(String::from)))
}

// ─── Operations ───────────────────────────────────────────────────────────────

/// Books a `pending` appointment for `patient` with an available doctor.
/// The slot must not lie before the clock's current date and time.
pub fn book_appointment(
    conn: &mut Connection,
    clock: &dyn Clock,
    patient: &Actor,
    req: BookingRequest,
) -> Result<Appointment, CareError> {
    require_patient(patient)?;
    let (symptoms, notes) = validate_booking(&req)?;

    let now = clock.now();
    if req.date < now.date() {
        return Err(CareError::validation("date", "must not be in the past"));
    }
    if req.date == now.date() && req.time < now.time() {
        return Err(CareError::validation("time", "must not be in the past"));
    }

    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

    let doctor = repository::get_doctor_profile(&tx, &req.doctor_id)?
        .ok_or_else(|| CareError::not_found("DoctorProfile", &req.doctor_id))?;
    if !doctor.is_available {
        return Err(CareError::validation(
            "doctor_id",
            "doctor is not accepting new appointments",
        ));
    }

    let appointment = Appointment {
        id: Uuid::new_v4(),
        patient_id: patient.id,
        doctor_id: doctor.id,
        date: req.date,
        time: req.time,
        symptoms,
        status: AppointmentStatus::Pending,
        notes,
        created_at: now,
        updated_at: now,
    };
    repository::insert_appointment(&tx, &appointment)?;
    tx.commit()?;

    tracing::info!(
        appointment_id = %appointment.id,
        patient_id = %patient.id,
        doctor_id = %doctor.id,
        date = %appointment.date,
        "Appointment booked"
    );
    Ok(appointment)
}

/// Appointments visible to `actor`, newest first, optionally by status.
pub fn list_appointments(
    conn: &Connection,
    actor: &Actor,
    status: Option<&str>,
) -> Result<Vec<Appointment>, CareError> {
    let status = status.map(parse_status).transpose()?;
    let rows = match listing_scope(actor) {
        ListingScope::Patient(id) => repository::list_appointments_for_patient(conn, &id, status)?,
        ListingScope::Doctor(profile_id) => {
            repository::list_appointments_for_doctor(conn, &profile_id, status)?
        }
        ListingScope::Nothing => Vec::new(),
    };
    Ok(rows)
}

pub fn get_appointment(conn: &Connection, actor: &Actor, id: &Uuid) -> Result<Appointment, CareError> {
    let appointment = load_appointment(conn, id)?;
    require_participant(actor, &appointment)?;
    Ok(appointment)
}

/// Moves an appointment along the state machine. Only the assigned doctor
/// may do this.
pub fn update_status(
    conn: &mut Connection,
    clock: &dyn Clock,
    actor: &Actor,
    id: &Uuid,
    new_status: &str,
) -> Result<Appointment, CareError> {
    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

    let appointment = load_appointment(&tx, id)?;
    require_assigned_doctor(actor, &appointment)?;
    let next = parse_status(new_status)?;

    let updated = transition(&tx, clock, appointment, next)?;
    tx.commit()?;

    tracing::info!(
        appointment_id = %id,
        actor_id = %actor.id,
        status = %next,
        "Appointment status changed"
    );
    Ok(updated)
}

/// Cancels a `pending` or `confirmed` appointment on behalf of either
/// participant.
pub fn cancel(
    conn: &mut Connection,
    clock: &dyn Clock,
    actor: &Actor,
    id: &Uuid,
) -> Result<Appointment, CareError> {
    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

    let appointment = load_appointment(&tx, id)?;
    let reason = require_participant(actor, &appointment)?;

    let updated = transition(&tx, clock, appointment, AppointmentStatus::Cancelled)?;
    tx.commit()?;

    tracing::info!(
        appointment_id = %id,
        actor_id = %actor.id,
        by = ?reason,
        "Appointment cancelled"
    );
    Ok(updated)
}

/// Checks the edge and writes it with compare-and-set. A concurrent writer
/// that changed the status first turns into `InvalidTransition` from the
/// status it left behind.
pub(crate) fn transition(
    conn: &Connection,
    clock: &dyn Clock,
    mut appointment: Appointment,
    next: AppointmentStatus,
) -> Result<Appointment, CareError> {
    let from = appointment.status;
    if !from.can_transition_to(next) {
        tracing::warn!(appointment_id = %appointment.id, %from, to = %next, "Transition rejected");
        return Err(CareError::InvalidTransition { from, to: next });
    }

    let now = clock.now();
    if !repository::compare_and_set_status(conn, &appointment.id, from, next, now)? {
        let current = load_appointment(conn, &appointment.id)?.status;
        tracing::warn!(appointment_id = %appointment.id, %current, to = %next, "Lost status race");
        return Err(CareError::InvalidTransition { from: current, to: next });
    }

    appointment.status = next;
    appointment.updated_at = now;
    Ok(appointment)
}
