//! Caller-visible error kinds of the care services.

use uuid::Uuid;

use crate::db::DatabaseError;
use crate::models::enums::AppointmentStatus;

#[derive(Debug, thiserror::Error)]
pub enum CareError {
    #[error("Invalid {field}: {reason}")]
    Validation { field: &'static str, reason: String },

    #[error("Permission denied: {0}")]
    Permission(String),

    #[error("Cannot move appointment from {from} to {to}")]
    InvalidTransition {
        from: AppointmentStatus,
        to: AppointmentStatus,
    },

    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),
}

impl CareError {
    pub fn validation(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Validation {
            field,
            reason: reason.into(),
        }
    }

    pub fn permission(reason: impl Into<String>) -> Self {
        Self::Permission(reason.into())
    }

    pub fn not_found(entity: &'static str, id: &Uuid) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }
}

impl From<rusqlite::Error> for CareError {
    fn from(e: rusqlite::Error) -> Self {
        Self::Database(DatabaseError::Sqlite(e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_offending_part() {
        let err = CareError::validation("latitude", "must be within [-90, 90]");
        assert_eq!(err.to_string(), "Invalid latitude: must be within [-90, 90]");

        let err = CareError::InvalidTransition {
            from: AppointmentStatus::Cancelled,
            to: AppointmentStatus::Confirmed,
        };
        assert_eq!(err.to_string(), "Cannot move appointment from cancelled to confirmed");
    }

    #[test]
    fn sqlite_errors_wrap_as_database() {
        let err: CareError = rusqlite::Error::QueryReturnedNoRows.into();
        assert!(matches!(err, CareError::Database(DatabaseError::Sqlite(_))));
    }
}
