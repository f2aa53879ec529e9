use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::doctor::DoctorProfile;
use super::enums::Role;

/// A person acting on the system, with their role resolved.
#[derive(Debug, Clone, Serialize)]
pub struct Actor {
    pub id: Uuid,
    pub display_name: String,
    pub role: ActorRole,
}

/// Closed set of roles. A doctor may exist before their profile does.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", content = "profile", rename_all = "snake_case")]
pub enum ActorRole {
    Patient,
    Doctor(Option<DoctorProfile>),
}

impl Actor {
    pub fn patient(id: Uuid, display_name: impl Into<String>) -> Self {
        Self {
            id,
            display_name: display_name.into(),
            role: ActorRole::Patient,
        }
    }

    pub fn doctor(id: Uuid, display_name: impl Into<String>, profile: Option<DoctorProfile>) -> Self {
        Self {
            id,
            display_name: display_name.into(),
            role: ActorRole::Doctor(profile),
        }
    }

    pub fn role_kind(&self) -> Role {
        match self.role {
            ActorRole::Patient => Role::Patient,
            ActorRole::Doctor(_) => Role::Doctor,
        }
    }

    /// The doctor profile, if this actor is a doctor that has one.
    pub fn doctor_profile(&self) -> Option<&DoctorProfile> {
        match &self.role {
            ActorRole::Doctor(profile) => profile.as_ref(),
            ActorRole::Patient => None,
        }
    }
}

/// Flat storage row for the `actors` table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActorRecord {
    pub id: Uuid,
    pub display_name: String,
    pub role: Role,
}
