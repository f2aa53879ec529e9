//! Source of "now" in the canonical timezone.
//!
//! Booking checks compare the requested slot against this clock, so every
//! date and time the service stores is interpreted in the same fixed offset.

use chrono::{FixedOffset, NaiveDateTime, Offset, Utc};

pub trait Clock: Send + Sync {
    /// Current wall-clock time in the canonical zone.
    fn now(&self) -> NaiveDateTime;
}

/// Real time shifted by a fixed UTC offset.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    offset: FixedOffset,
}

impl SystemClock {
    pub fn utc() -> Self {
        Self {
            offset: Utc.fix(),
        }
    }

    /// `None` if the offset is not strictly inside ±24 hours.
    pub fn with_offset_minutes(minutes: i32) -> Option<Self> {
        let offset = FixedOffset::east_opt(minutes.checked_mul(60)?)?;
        Some(Self { offset })
    }

    pub fn offset(&self) -> FixedOffset {
        self.offset
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::utc()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Utc::now().with_timezone(&self.offset).naive_local()
    }
}

/// A clock frozen at one instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDateTime);

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}
