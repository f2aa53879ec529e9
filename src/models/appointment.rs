use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::enums::AppointmentStatus;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Appointment {
    pub id: Uuid,
    pub patient_id: Uuid,
    /// References `doctor_profiles.id`, not the doctor's actor id.
    pub doctor_id: Uuid,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub symptoms: String,
    pub status: AppointmentStatus,
    pub notes: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}
