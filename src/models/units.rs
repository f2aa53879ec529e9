//! Fixed-point quantities: money in minor units, ratings in hundredths.

use serde::{Deserialize, Serialize};

/// Amount of money in minor currency units (paise, cents).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(i64);

impl Money {
    pub fn from_minor(minor: i64) -> Self {
        Self(minor)
    }

    pub fn minor(&self) -> i64 {
        self.0
    }
}

/// Star rating on a 0.00..=5.00 scale, stored as hundredths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u16", into = "u16")]
pub struct Rating(u16);

impl Rating {
    pub const MAX_HUNDREDTHS: u16 = 500;

    pub fn from_hundredths(hundredths: u16) -> Option<Self> {
        (hundredths <= Self::MAX_HUNDREDTHS).then_some(Self(hundredths))
    }

    pub fn hundredths(&self) -> u16 {
        self.0
    }
}

impl TryFrom<u16> for Rating {
    type Error = String;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        Rating::from_hundredths(value)
            .ok_or_else(|| format!("rating {value} exceeds {}", Rating::MAX_HUNDREDTHS))
    }
}

impl From<Rating> for u16 {
    fn from(rating: Rating) -> Self {
        rating.0
    }
}
