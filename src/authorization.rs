//! Appointment access rules.
//!
//! Every decision is derived from the requesting actor and the appointment
//! row at hand; nothing is cached between requests.
//! 1. Actor is the appointment's patient → participant (view, cancel)
//! 2. Actor is a doctor whose profile is the appointment's doctor → participant
//!    and the only one allowed to change status or write the summary
//! 3. Default → DENY

use uuid::Uuid;

use crate::error::CareError;
use crate::models::{Actor, ActorRole, Appointment, DoctorProfile};

// ═══════════════════════════════════════════════════════════
// Types
// ═══════════════════════════════════════════════════════════

/// Why access was granted (or denied), for the audit trail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessReason {
    /// Patient who booked the appointment.
    OwningPatient,
    /// Doctor whose profile the appointment is assigned to.
    AssignedDoctor,
    /// No matching rule.
    Denied,
}

#[derive(Debug, Clone, Copy)]
pub struct AccessDecision {
    pub allowed: bool,
    pub reason: AccessReason,
}

impl AccessDecision {
    fn allow(reason: AccessReason) -> Self {
        Self {
            allowed: true,
            reason,
        }
    }

    fn deny() -> Self {
        Self {
            allowed: false,
            reason: AccessReason::Denied,
        }
    }
}

/// Which rows a listing may return for an actor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListingScope {
    Patient(Uuid),
    /// Doctor profile id.
    Doctor(Uuid),
    /// Doctor account without a profile.
    Nothing,
}

// ═══════════════════════════════════════════════════════════
// Checks
// ═══════════════════════════════════════════════════════════

pub fn check_appointment_access(actor: &Actor, appointment: &Appointment) -> AccessDecision {
    match &actor.role {
        ActorRole::Patient if appointment.patient_id == actor.id => {
            AccessDecision::allow(AccessReason::OwningPatient)
        }
        ActorRole::Doctor(Some(profile)) if appointment.doctor_id == profile.id => {
            AccessDecision::allow(AccessReason::AssignedDoctor)
        }
        _ => AccessDecision::deny(),
    }
}

/// Either participant. Used for reads and cancellation.
pub fn require_participant(actor: &Actor, appointment: &Appointment) -> Result<AccessReason, CareError> {
    let decision = check_appointment_access(actor, appointment);
    if decision.allowed {
        Ok(decision.reason)
    } else {
        tracing::warn!(
            actor_id = %actor.id,
            appointment_id = %appointment.id,
            "Appointment access denied"
        );
        Err(CareError::permission("not a participant in this appointment"))
    }
}

/// Only the assigned doctor. Returns their profile.
pub fn require_assigned_doctor<'a>(
    actor: &'a Actor,
    appointment: &Appointment,
) -> Result<&'a DoctorProfile, CareError> {
    match actor.doctor_profile() {
        Some(profile) if profile.id == appointment.doctor_id => Ok(profile),
        _ => {
            tracing::warn!(
                actor_id = %actor.id,
                appointment_id = %appointment.id,
                "Doctor-only action denied"
            );
            Err(CareError::permission(
                "only the assigned doctor may perform this action",
            ))
        }
    }
}

pub fn require_patient(actor: &Actor) -> Result<(), CareError> {
    match actor.role {
        ActorRole::Patient => Ok(()),
        ActorRole::Doctor(_) => Err(CareError::permission("only patients may book appointments")),
    }
}

pub fn listing_scope(actor: &Actor) -> ListingScope {
    match &actor.role {
        ActorRole::Patient => ListingScope::Patient(actor.id),
        ActorRole::Doctor(Some(profile)) => ListingScope::Doctor(profile.id),
        ActorRole::Doctor(None) => ListingScope::Nothing,
    }
}

// ═══════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use chrono::NaiveDateTime;

    use super::*;
    use crate::models::enums::{AppointmentStatus, Specialty};
    use crate::models::{Money, Rating};

    fn profile(actor_id: Uuid) -> DoctorProfile {
        DoctorProfile {
            id: Uuid::new_v4(),
            actor_id,
            display_name: "Dr. Mehta".into(),
            specialty: Specialty::General,
            qualification: "MBBS".into(),
            experience_years: 5,
            consultation_fee: Money::from_minor(30_000),
            clinic: "City Clinic".into(),
            rating: Rating::from_hundredths(450).unwrap(),
            is_available: true,
        }
    }

    fn appointment(patient_id: Uuid, doctor_id: Uuid) -> Appointment {
        let at = NaiveDateTime::parse_from_str("2026-03-01 09:00:00", "%Y-%m-%d %H:%M:%S").unwrap();
        Appointment {
            id: Uuid::new_v4(),
            patient_id,
            doctor_id,
            date: at.date(),
            time: at.time(),
            symptoms: "cough".into(),
            status: AppointmentStatus::Pending,
            notes: None,
            created_at: at,
            updated_at: at,
        }
    }

    #[test]
    fn owning_patient_is_participant() {
        let patient = Actor::patient(Uuid::new_v4(), "Asha");
        let appt = appointment(patient.id, Uuid::new_v4());
        assert_eq!(require_participant(&patient, &appt).unwrap(), AccessReason::OwningPatient);
    }

    #[test]
    fn assigned_doctor_is_participant_and_may_act() {
        let doctor_id = Uuid::new_v4();
        let doctor = Actor::doctor(doctor_id, "Dr. Mehta", Some(profile(doctor_id)));
        let appt = appointment(Uuid::new_v4(), doctor.doctor_profile().unwrap().id);
        assert_eq!(require_participant(&doctor, &appt).unwrap(), AccessReason::AssignedDoctor);
        assert!(require_assigned_doctor(&doctor, &appt).is_ok());
    }

    #[test]
    fn patient_cannot_act_as_doctor() {
        let patient = Actor::patient(Uuid::new_v4(), "Asha");
        let appt = appointment(patient.id, Uuid::new_v4());
        assert!(matches!(
            require_assigned_doctor(&patient, &appt),
            Err(CareError::Permission(_))
        ));
    }

    #[test]
    fn strangers_are_denied() {
        let other_patient = Actor::patient(Uuid::new_v4(), "Ravi");
        let other_doctor_id = Uuid::new_v4();
        let other_doctor = Actor::doctor(other_doctor_id, "Dr. Rao", Some(profile(other_doctor_id)));
        let appt = appointment(Uuid::new_v4(), Uuid::new_v4());

        for actor in [&other_patient, &other_doctor] {
            let decision = check_appointment_access(actor, &appt);
            assert!(!decision.allowed);
            assert_eq!(decision.reason, AccessReason::Denied);
        }
    }

    #[test]
    fn patient_id_colliding_with_doctor_id_grants_nothing() {
        // A doctor whose actor id happens to be stored as patient_id is not the patient.
        let doctor_id = Uuid::new_v4();
        let doctor = Actor::doctor(doctor_id, "Dr. Mehta", None);
        let appt = appointment(doctor_id, Uuid::new_v4());
        assert!(!check_appointment_access(&doctor, &appt).allowed);
    }

    #[test]
    fn listing_scope_by_role() {
        let patient = Actor::patient(Uuid::new_v4(), "Asha");
        assert_eq!(listing_scope(&patient), ListingScope::Patient(patient.id));

        let doctor_id = Uuid::new_v4();
        let p = profile(doctor_id);
        let profile_id = p.id;
        let doctor = Actor::doctor(doctor_id, "Dr. Mehta", Some(p));
        assert_eq!(listing_scope(&doctor), ListingScope::Doctor(profile_id));

        let bare = Actor::doctor(Uuid::new_v4(), "Dr. New", None);
        assert_eq!(listing_scope(&bare), ListingScope::Nothing);
    }

    #[test]
    fn only_patients_book() {
        assert!(require_patient(&Actor::patient(Uuid::new_v4(), "Asha")).is_ok());
        assert!(require_patient(&Actor::doctor(Uuid::new_v4(), "Dr. New", None)).is_err());
    }
}
