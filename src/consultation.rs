//! Consultation records: the doctor's clinical summary of an appointment.
//!
//! Writing a record completes the appointment in the same transaction.
//! A cancelled appointment cannot receive one.

use rusqlite::{Connection, TransactionBehavior};
use uuid::Uuid;

use crate::appointment::load_appointment;
use crate::authorization::{listing_scope, require_assigned_doctor, require_participant, ListingScope};
use crate::clock::Clock;
use crate::db::repository;
use crate::error::CareError;
use crate::models::enums::AppointmentStatus;
use crate::models::{Actor, Appointment, ConsultationFields, ConsultationRecord};

pub const MAX_FIELD_LEN: usize = 5000;

fn required_text(field: &'static str, value: &str) -> Result<String, CareError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(CareError::validation(field, "must not be empty"));
    }
    if value.chars().count() > MAX_FIELD_LEN {
        return Err(CareError::validation(
            field,
            format!("must be at most {MAX_FIELD_LEN} characters"),
        ));
    }
    Ok(value.to_string())
}

/// Trimmed, length-checked copy of the doctor's input.
fn validate_fields(
    fields: ConsultationFields,
    appointment: &Appointment,
) -> Result<ConsultationFields, CareError> {
    let diet_notes = fields
        .diet_notes
        .as_deref()
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .map(|n| required_text("diet_notes", n))
        .transpose()?;

    if let Some(follow_up) = fields.follow_up_date {
        if !fields.follow_up_required {
            return Err(CareError::validation(
                "follow_up_date",
                "requires follow_up_required to be set",
            ));
        }
        if follow_up < appointment.date {
            return Err(CareError::validation(
                "follow_up_date",
                "must not precede the appointment date",
            ));
        }
    }

    Ok(ConsultationFields {
        diagnosis: required_text("diagnosis", &fields.diagnosis)?,
        prescribed_treatment: required_text("prescribed_treatment", &fields.prescribed_treatment)?,
        instructions: required_text("instructions", &fields.instructions)?,
        diet_notes,
        follow_up_required: fields.follow_up_required,
        follow_up_date: fields.follow_up_date,
    })
}

/// Creates the appointment's record, or replaces the content of the existing
/// one, and marks the appointment `completed`.
pub fn create_or_amend_summary(
    conn: &mut Connection,
    clock: &dyn Clock,
    actor: &Actor,
    appointment_id: &Uuid,
    fields: ConsultationFields,
) -> Result<ConsultationRecord, CareError> {
    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

    let appointment = load_appointment(&tx, appointment_id)?;
    require_assigned_doctor(actor, &appointment)?;

    if appointment.status == AppointmentStatus::Cancelled {
        tracing::warn!(%appointment_id, "Summary refused for cancelled appointment");
        return Err(CareError::InvalidTransition {
            from: AppointmentStatus::Cancelled,
            to: AppointmentStatus::Completed,
        });
    }

    let fields = validate_fields(fields, &appointment)?;
    let now = clock.now();
    let existing = repository::get_consultation_record(&tx, appointment_id)?;
    let amended = existing.is_some();

    let record = ConsultationRecord {
        id: existing.as_ref().map_or_else(Uuid::new_v4, |r| r.id),
        appointment_id: appointment.id,
        diagnosis: fields.diagnosis,
        prescribed_treatment: fields.prescribed_treatment,
        instructions: fields.instructions,
        diet_notes: fields.diet_notes,
        follow_up_required: fields.follow_up_required,
        follow_up_date: fields.follow_up_date,
        created_at: existing.as_ref().map_or(now, |r| r.created_at),
        updated_at: now,
    };
    repository::upsert_consultation_record(&tx, &record)?;

    let from = appointment.status;
    if from != AppointmentStatus::Completed
        && !repository::compare_and_set_status(&tx, &appointment.id, from, AppointmentStatus::Completed, now)?
    {
        let current = load_appointment(&tx, &appointment.id)?.status;
        return Err(CareError::InvalidTransition {
            from: current,
            to: AppointmentStatus::Completed,
        });
    }

    tx.commit()?;

    tracing::info!(
        %appointment_id,
        actor_id = %actor.id,
        amended,
        previous_status = %from,
        "Consultation summary saved"
    );
    Ok(record)
}

/// The record of an appointment the actor participates in.
pub fn read_summary(
    conn: &Connection,
    actor: &Actor,
    appointment_id: &Uuid,
) -> Result<ConsultationRecord, CareError> {
    let appointment = load_appointment(conn, appointment_id)?;
    require_participant(actor, &appointment)?;
    repository::get_consultation_record(conn, appointment_id)?
        .ok_or_else(|| CareError::not_found("ConsultationRecord", appointment_id))
}

/// Every record on appointments visible to the actor.
pub fn list_summaries(conn: &Connection, actor: &Actor) -> Result<Vec<ConsultationRecord>, CareError> {
    let records = match listing_scope(actor) {
        ListingScope::Patient(id) => repository::list_records_for_patient(conn, &id)?,
        ListingScope::Doctor(profile_id) => repository::list_records_for_doctor(conn, &profile_id)?,
        ListingScope::Nothing => Vec::new(),
    };
    Ok(records)
}
