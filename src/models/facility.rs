use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::units::Rating;

/// A point on the globe in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Facility {
    pub id: Uuid,
    pub name: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub contact_number: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub has_emergency: bool,
    pub has_ambulance: bool,
    pub beds_available: u32,
    pub rating: Rating,
}

impl Facility {
    /// Both coordinates, or `None` when either is missing.
    pub fn coordinates(&self) -> Option<GeoPoint> {
        match (self.latitude, self.longitude) {
            (Some(latitude), Some(longitude)) => Some(GeoPoint { latitude, longitude }),
            _ => None,
        }
    }
}
