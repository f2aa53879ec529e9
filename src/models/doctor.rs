use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::enums::Specialty;
use super::units::{Money, Rating};

/// Practice details of a doctor actor. `display_name` is joined from `actors`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DoctorProfile {
    pub id: Uuid,
    pub actor_id: Uuid,
    pub display_name: String,
    pub specialty: Specialty,
    pub qualification: String,
    pub experience_years: u32,
    pub consultation_fee: Money,
    pub clinic: String,
    pub rating: Rating,
    pub is_available: bool,
}
