//! Repository layer: entity-scoped database operations.
//!
//! Free functions over a borrowed `Connection`; callers own transactions.

mod actor;
mod appointment;
mod consultation;
mod doctor;
mod facility;

use std::str::FromStr;

use rusqlite::types::Type;
use rusqlite::Row;
use uuid::Uuid;

use super::DatabaseError;
use crate::models::Rating;

pub use actor::*;
pub use appointment::*;
pub use consultation::*;
pub use doctor::*;
pub use facility::*;

fn conversion_error(idx: usize, err: impl std::error::Error + Send + Sync + 'static) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(err))
}

/// Reads a TEXT column holding a hyphenated UUID.
pub(crate) fn uuid_column(row: &Row<'_>, idx: usize) -> rusqlite::Result<Uuid> {
    let raw: String = row.get(idx)?;
    Uuid::parse_str(&raw).map_err(|e| conversion_error(idx, e))
}

/// Reads a TEXT column holding a `str_enum!` value.
pub(crate) fn enum_column<T>(row: &Row<'_>, idx: usize) -> rusqlite::Result<T>
where
    T: FromStr<Err = DatabaseError>,
{
    let raw: String = row.get(idx)?;
    T::from_str(&raw).map_err(|e| conversion_error(idx, e))
}

pub(crate) fn rating_column(row: &Row<'_>, idx: usize) -> rusqlite::Result<Rating> {
    let raw: u16 = row.get(idx)?;
    Rating::from_hundredths(raw).ok_or_else(|| {
        conversion_error(
            idx,
            DatabaseError::ConstraintViolation(format!("rating {raw} out of range")),
        )
    })
}


#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;
    use crate::db::sqlite::open_memory_database;
    use crate::models::enums::*;
    use crate::models::*;
    use rusqlite::{params, Connection};

    fn test_db() -> Connection {
        open_memory_database().unwrap()
    }

    #[test]
    fn patient_actor_round_trips_without_profile() {
        let conn = test_db();
        let seed = seed(&conn);
        let actor = get_actor(&conn, &seed.patient).unwrap().unwrap();
        assert_eq!(actor.role_kind(), Role::Patient);
        assert!(actor.doctor_profile().is_none());
    }

    #[test]
    fn doctor_actor_loads_profile() {
        let conn = test_db();
        let seed = seed(&conn);
        let actor = get_actor(&conn, &seed.doctor_actor).unwrap().unwrap();
        let profile = actor.doctor_profile().unwrap();
        assert_eq!(profile.id, seed.doctor_profile);
        assert_eq!(profile.display_name, "Dr. Mehta");
        assert_eq!(profile.consultation_fee.minor(), 50_000);
    }

    #[test]
    fn doctor_without_profile_is_still_a_doctor() {
        let conn = test_db();
        let seed = seed(&conn);
        let actor = get_actor(&conn, &seed.bare_doctor).unwrap().unwrap();
        assert_eq!(actor.role_kind(), Role::Doctor);
        assert!(actor.doctor_profile().is_none());
    }

    #[test]
    fn unknown_actor_is_none() {
        let conn = test_db();
        assert!(get_actor(&conn, &Uuid::new_v4()).unwrap().is_none());
    }

    #[test]
    fn second_profile_for_same_actor_rejected() {
        let conn = test_db();
        let seed = seed(&conn);
        let mut dup = get_doctor_profile(&conn, &seed.doctor_profile).unwrap().unwrap();
        dup.id = Uuid::new_v4();
        assert!(insert_doctor_profile(&conn, &dup).is_err());
    }

    #[test]
    fn doctor_listing_filters_specialty_and_availability() {
        let conn = test_db();
        seed(&conn);
        add_doctor(&conn, "Dr. Absent", Specialty::Cardiology, false);

        let cardio = list_doctor_profiles(
            &conn,
            &DoctorFilter { specialty: Some(Specialty::Cardiology), ..Default::default() },
        )
        .unwrap();
        assert_eq!(cardio.len(), 1);
        assert_eq!(cardio[0].display_name, "Dr. Rao");

        let all_cardio = list_doctor_profiles(
            &conn,
            &DoctorFilter {
                specialty: Some(Specialty::Cardiology),
                include_unavailable: true,
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(all_cardio.len(), 2);

        let everyone = list_doctor_profiles(&conn, &DoctorFilter::default()).unwrap();
        let names: Vec<_> = everyone.iter().map(|d| d.display_name.as_str()).collect();
        assert_eq!(names, vec!["Dr. Mehta", "Dr. Rao"]);
    }

    #[test]
    fn availability_toggle_and_missing_profile() {
        let conn = test_db();
        let seed = seed(&conn);
        set_doctor_availability(&conn, &seed.doctor_profile, false).unwrap();
        let profile = get_doctor_profile(&conn, &seed.doctor_profile).unwrap().unwrap();
        assert!(!profile.is_available);

        let err = set_doctor_availability(&conn, &Uuid::new_v4(), true).unwrap_err();
        assert!(matches!(err, DatabaseError::NotFound { .. }));
    }

    #[test]
    fn appointment_listing_scoped_and_ordered() {
        let conn = test_db();
        let seed = seed(&conn);
        let early = add_appointment(&conn, seed.patient, seed.doctor_profile, "2026-03-10", "09:00", AppointmentStatus::Pending);
        let late = add_appointment(&conn, seed.patient, seed.doctor_profile, "2026-03-10", "15:30", AppointmentStatus::Confirmed);
        let later_day = add_appointment(&conn, seed.patient, seed.other_doctor_profile, "2026-03-12", "08:00", AppointmentStatus::Pending);
        add_appointment(&conn, seed.other_patient, seed.doctor_profile, "2026-03-11", "10:00", AppointmentStatus::Pending);

        let mine = list_appointments_for_patient(&conn, &seed.patient, None).unwrap();
        let ids: Vec<_> = mine.iter().map(|a| a.id).collect();
        assert_eq!(ids, vec![later_day, late, early]);

        let pending = list_appointments_for_patient(&conn, &seed.patient, Some(AppointmentStatus::Pending)).unwrap();
        assert_eq!(pending.len(), 2);

        let doctor_view = list_appointments_for_doctor(&conn, &seed.doctor_profile, None).unwrap();
        assert_eq!(doctor_view.len(), 3);
        assert!(doctor_view.iter().all(|a| a.doctor_id == seed.doctor_profile));
    }

    #[test]
    fn appointment_fields_round_trip() {
        let conn = test_db();
        let seed = seed(&conn);
        let id = add_appointment(&conn, seed.patient, seed.doctor_profile, "2026-03-10", "14:45", AppointmentStatus::Pending);
        let appt = get_appointment(&conn, &id).unwrap().unwrap();
        assert_eq!(appt.date, date("2026-03-10"));
        assert_eq!(appt.time, time("14:45"));
        assert_eq!(appt.status, AppointmentStatus::Pending);
        assert_eq!(appt.notes, None);
    }

    #[test]
    fn compare_and_set_only_applies_from_expected_status() {
        let conn = test_db();
        let seed = seed(&conn);
        let id = add_appointment(&conn, seed.patient, seed.doctor_profile, "2026-03-10", "09:00", AppointmentStatus::Pending);
        let now = ts("2026-03-02 10:00:00");

        assert!(compare_and_set_status(&conn, &id, AppointmentStatus::Pending, AppointmentStatus::Confirmed, now).unwrap());
        assert!(!compare_and_set_status(&conn, &id, AppointmentStatus::Pending, AppointmentStatus::Cancelled, now).unwrap());

        let appt = get_appointment(&conn, &id).unwrap().unwrap();
        assert_eq!(appt.status, AppointmentStatus::Confirmed);
        assert_eq!(appt.updated_at, now);
    }

    #[test]
    fn corrupt_status_surfaces_as_conversion_error() {
        let conn = test_db();
        let seed = seed(&conn);
        let id = add_appointment(&conn, seed.patient, seed.doctor_profile, "2026-03-10", "09:00", AppointmentStatus::Pending);
        conn.execute_batch("PRAGMA ignore_check_constraints = ON").unwrap();
        conn.execute(
            "UPDATE appointments SET status = 'lost' WHERE id = ?1",
            params![id.to_string()],
        )
        .unwrap();
        assert!(get_appointment(&conn, &id).is_err());
    }

    fn record_for(appointment_id: Uuid, diagnosis: &str, at: &str) -> ConsultationRecord {
        ConsultationRecord {
            id: Uuid::new_v4(),
            appointment_id,
            diagnosis: diagnosis.into(),
            prescribed_treatment: "Rest".into(),
            instructions: "Drink fluids".into(),
            diet_notes: None,
            follow_up_required: false,
            follow_up_date: None,
            created_at: ts(at),
            updated_at: ts(at),
        }
    }

    #[test]
    fn consultation_upsert_keeps_single_row_and_identity() {
        let conn = test_db();
        let seed = seed(&conn);
        let appt = add_appointment(&conn, seed.patient, seed.doctor_profile, "2026-03-10", "09:00", AppointmentStatus::Completed);

        let first = record_for(appt, "Viral fever", "2026-03-10 10:00:00");
        upsert_consultation_record(&conn, &first).unwrap();
        let second = record_for(appt, "Influenza", "2026-03-11 08:00:00");
        upsert_consultation_record(&conn, &second).unwrap();

        assert_eq!(count_consultation_records(&conn, &appt).unwrap(), 1);
        let stored = get_consultation_record(&conn, &appt).unwrap().unwrap();
        assert_eq!(stored.id, first.id);
        assert_eq!(stored.diagnosis, "Influenza");
        assert_eq!(stored.created_at, first.created_at);
        assert_eq!(stored.updated_at, second.updated_at);
    }

    #[test]
    fn consultation_listing_scoped_by_participant() {
        let conn = test_db();
        let seed = seed(&conn);
        let mine = add_appointment(&conn, seed.patient, seed.doctor_profile, "2026-03-10", "09:00", AppointmentStatus::Completed);
        let theirs = add_appointment(&conn, seed.other_patient, seed.other_doctor_profile, "2026-03-11", "09:00", AppointmentStatus::Completed);
        upsert_consultation_record(&conn, &record_for(mine, "Cold", "2026-03-10 10:00:00")).unwrap();
        upsert_consultation_record(&conn, &record_for(theirs, "Angina", "2026-03-11 10:00:00")).unwrap();

        let patient_records = list_records_for_patient(&conn, &seed.patient).unwrap();
        assert_eq!(patient_records.len(), 1);
        assert_eq!(patient_records[0].appointment_id, mine);

        let doctor_records = list_records_for_doctor(&conn, &seed.other_doctor_profile).unwrap();
        assert_eq!(doctor_records.len(), 1);
        assert_eq!(doctor_records[0].diagnosis, "Angina");
    }

    #[test]
    fn facility_listing_filters() {
        let conn = test_db();
        add_facility(&conn, "Lakeside Clinic", "Bengaluru", None, false);
        add_facility(&conn, "City General", "Bengaluru", Some((12.97, 77.59)), true);
        add_facility(&conn, "Coastal Care", "Mangaluru", Some((12.91, 74.85)), true);

        let blr = list_facilities(
            &conn,
            &FacilityFilter { city: Some("bengaluru".into()), ..Default::default() },
        )
        .unwrap();
        let names: Vec<_> = blr.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["City General", "Lakeside Clinic"]);

        let emergency = list_facilities(
            &conn,
            &FacilityFilter { emergency_only: true, ..Default::default() },
        )
        .unwrap();
        assert_eq!(emergency.len(), 2);

        let located = list_geolocated_facilities(&conn).unwrap();
        assert_eq!(located.len(), 2);
        assert!(located.iter().all(|f| f.coordinates().is_some()));
    }

    #[test]
    fn facility_text_filters_match_literally() {
        let conn = test_db();
        add_facility(&conn, "Lilavati", "Mumbai", None, true);
        add_facility(&conn, "Ruby Hall", "Pune", None, false);

        let count = |filter: FacilityFilter| list_facilities(&conn, &filter).unwrap().len();
        for (city, expected) in [("%", 0), ("M_mbai", 0), ("_", 0), ("\\", 0), ("MUM", 1), ("un", 1)] {
            let filter = FacilityFilter { city: Some(city.into()), ..Default::default() };
            assert_eq!(count(filter), expected, "city {city:?}");
        }
        for (search, expected) in [("%", 0), ("ruby_", 0), ("hall", 1), ("lilavati mumbai", 1), ("road", 2)] {
            let filter = FacilityFilter { search: Some(search.into()), ..Default::default() };
            assert_eq!(count(filter), expected, "search {search:?}");
        }
    }

    #[test]
    fn facility_cities_are_distinct_and_sorted() {
        let conn = test_db();
        add_facility(&conn, "Sassoon", "Pune", None, false);
        add_facility(&conn, "KEM", "Mumbai", None, true);
        add_facility(&conn, "Ruby Hall", "Pune", None, true);
        assert_eq!(list_facility_cities(&conn).unwrap(), vec!["Mumbai", "Pune"]);
    }

    #[test]
    fn doctor_search_requires_every_term() {
        let conn = test_db();
        seed(&conn);
        for (search, expected) in [
            ("rao", vec!["Dr. Rao"]),
            ("Cardiology city", vec!["Dr. Rao"]),
            ("clinic", vec!["Dr. Mehta", "Dr. Rao"]),
            ("dr._", vec![]),
        ] {
            let filter = DoctorFilter { search: Some(search.into()), ..Default::default() };
            let names: Vec<_> = list_doctor_profiles(&conn, &filter)
                .unwrap()
                .into_iter()
                .map(|d| d.display_name)
                .collect();
            assert_eq!(names, expected, "search {search:?}");
        }
    }

    #[test]
    fn facility_round_trips_optional_coordinates() {
        let conn = test_db();
        let id = add_facility(&conn, "Lakeside Clinic", "Bengaluru", None, false);
        let facility = get_facility(&conn, &id).unwrap().unwrap();
        assert!(facility.coordinates().is_none());
        assert_eq!(facility.rating.hundredths(), 400);
    }
}
