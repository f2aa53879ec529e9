use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsultationRecord {
    pub id: Uuid,
    pub appointment_id: Uuid,
    pub diagnosis: String,
    pub prescribed_treatment: String,
    pub instructions: String,
    pub diet_notes: Option<String>,
    pub follow_up_required: bool,
    pub follow_up_date: Option<NaiveDate>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Doctor-supplied content of a consultation record.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConsultationFields {
    pub diagnosis: String,
    pub prescribed_treatment: String,
    pub instructions: String,
    #[serde(default)]
    pub diet_notes: Option<String>,
    #[serde(default)]
    pub follow_up_required: bool,
    #[serde(default)]
    pub follow_up_date: Option<NaiveDate>,
}
