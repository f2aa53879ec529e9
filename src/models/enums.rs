use std::fmt;

use crate::db::DatabaseError;
use serde::{Deserialize, Serialize};

/// Macro to generate enum with as_str + std::str::FromStr pattern
macro_rules! str_enum {
    ($name:ident { $($variant:ident => $s:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(rename_all = "snake_case")]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $s),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = DatabaseError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($s => Ok(Self::$variant)),+,
                    _ => Err(DatabaseError::InvalidEnum {
                        field: stringify!($name).into(),
                        value: s.into(),
                    }),
                }
            }
        }
    };
}

str_enum!(Role {
    Patient => "patient",
    Doctor => "doctor",
});

str_enum!(AppointmentStatus {
    Pending => "pending",
    Confirmed => "confirmed",
    Completed => "completed",
    Cancelled => "cancelled",
});

impl AppointmentStatus {
    /// Statuses reachable in one step from `self`.
    pub fn allowed_transitions(&self) -> &'static [AppointmentStatus] {
        match self {
            Self::Pending => &[Self::Confirmed, Self::Cancelled],
            Self::Confirmed => &[Self::Completed, Self::Cancelled],
            Self::Completed | Self::Cancelled => &[],
        }
    }

    pub fn can_transition_to(&self, next: AppointmentStatus) -> bool {
        self.allowed_transitions().contains(&next)
    }

    pub fn is_terminal(&self) -> bool {
        self.allowed_transitions().is_empty()
    }
}

str_enum!(ConcernLevel {
    Mild => "mild",
    Moderate => "moderate",
    Severe => "severe",
});

str_enum!(Specialty {
    General => "general",
    Cardiology => "cardiology",
    Dermatology => "dermatology",
    Pediatrics => "pediatrics",
    Orthopedics => "orthopedics",
    Neurology => "neurology",
    Gynecology => "gynecology",
    Psychiatry => "psychiatry",
    Gastroenterology => "gastroenterology",
    Ent => "ent",
});

impl Specialty {
    /// Every specialty, in directory display order.
    pub const ALL: [Specialty; 10] = [
        Self::General,
        Self::Cardiology,
        Self::Dermatology,
        Self::Pediatrics,
        Self::Orthopedics,
        Self::Neurology,
        Self::Gynecology,
        Self::Psychiatry,
        Self::Gastroenterology,
        Self::Ent,
    ];

    /// Title of a practitioner in this specialty.
    pub fn practitioner_title(&self) -> &'static str {
        match self {
            Self::General => "General Physician",
            Self::Cardiology => "Cardiologist",
            Self::Dermatology => "Dermatologist",
            Self::Pediatrics => "Pediatrician",
            Self::Orthopedics => "Orthopedic",
            Self::Neurology => "Neurologist",
            Self::Gynecology => "Gynecologist",
            Self::Psychiatry => "Psychiatrist",
            Self::Gastroenterology => "Gastroenterologist",
            Self::Ent => "ENT Specialist",
        }
    }
}
