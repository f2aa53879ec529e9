//! Great-circle proximity search over facility coordinates.

use rusqlite::Connection;
use serde::Serialize;

use crate::config::DEFAULT_SEARCH_RADIUS_KM;
use crate::db::repository;
use crate::error::CareError;
use crate::models::{Facility, GeoPoint};

/// Mean Earth radius used by the haversine formula.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

#[derive(Debug, Clone, Serialize)]
pub struct NearbyFacility {
    #[serde(flatten)]
    pub facility: Facility,
    /// Rounded to two decimals.
    pub distance_km: f64,
}

/// A resolved search: the query as applied plus its ranked results.
#[derive(Debug, Clone, Serialize)]
pub struct NearbySearch {
    pub origin: GeoPoint,
    pub radius_km: f64,
    pub count: usize,
    pub facilities: Vec<NearbyFacility>,
}

impl GeoPoint {
    /// Rejects non-finite or out-of-range coordinates.
    pub fn validated(latitude: f64, longitude: f64) -> Result<Self, CareError> {
        if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
            return Err(CareError::validation("latitude", "must be a number within [-90, 90]"));
        }
        if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
            return Err(CareError::validation("longitude", "must be a number within [-180, 180]"));
        }
        Ok(Self { latitude, longitude })
    }
}

pub fn haversine_km(a: GeoPoint, b: GeoPoint) -> f64 {
    let (lat1, lat2) = (a.latitude.to_radians(), b.latitude.to_radians());
    let d_lat = (b.latitude - a.latitude).to_radians();
    let d_lon = (b.longitude - a.longitude).to_radians();

    let h = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);
    // Rounding can push h a hair above 1 for antipodal points.
    let c = 2.0 * h.sqrt().min(1.0).asin();
    EARTH_RADIUS_KM * c
}

fn round_km(km: f64) -> f64 {
    (km * 100.0).round() / 100.0
}

/// Facilities within `radius_km` of `origin`, nearest first.
///
/// Inclusion uses the exact distance; the reported distance is rounded.
/// Ties keep the input order.
pub fn rank_nearby(facilities: Vec<Facility>, origin: GeoPoint, radius_km: f64) -> Vec<NearbyFacility> {
    let mut within: Vec<(f64, Facility)> = facilities
        .into_iter()
        .filter_map(|f| {
            let point = f.coordinates()?;
            let km = haversine_km(origin, point);
            (km <= radius_km).then_some((km, f))
        })
        .collect();

    within.sort_by(|a, b| a.0.total_cmp(&b.0));

    within
        .into_iter()
        .map(|(km, facility)| NearbyFacility {
            facility,
            distance_km: round_km(km),
        })
        .collect()
}

/// Loads geolocated facilities and ranks them around the query point.
/// Missing coordinates are a validation error; the radius defaults to
/// [`DEFAULT_SEARCH_RADIUS_KM`].
pub fn find_nearby_facilities(
    conn: &Connection,
    latitude: Option<f64>,
    longitude: Option<f64>,
    radius_km: Option<f64>,
) -> Result<NearbySearch, CareError> {
    let latitude = latitude.ok_or_else(|| CareError::validation("latitude", "is required"))?;
    let longitude = longitude.ok_or_else(|| CareError::validation("longitude", "is required"))?;
    let origin = GeoPoint::validated(latitude, longitude)?;

    let radius_km = radius_km.unwrap_or(DEFAULT_SEARCH_RADIUS_KM);
    if !radius_km.is_finite() || radius_km < 0.0 {
        return Err(CareError::validation("radius_km", "must be a non-negative number"));
    }

    let candidates = repository::list_geolocated_facilities(conn)?;
    let facilities = rank_nearby(candidates, origin, radius_km);
    tracing::debug!(found = facilities.len(), radius_km, "Nearby facility search");
    Ok(NearbySearch {
        origin,
        radius_km,
        count: facilities.len(),
        facilities,
    })
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use super::*;
    use crate::db::repository::fixtures::add_facility;
    use crate::db::sqlite::open_memory_database;
    use crate::models::Rating;

    fn point(latitude: f64, longitude: f64) -> GeoPoint {
        GeoPoint { latitude, longitude }
    }

    fn facility(name: &str, coords: Option<(f64, f64)>) -> Facility {
        Facility {
            id: Uuid::new_v4(),
            name: name.into(),
            address: String::new(),
            city: "Mumbai".into(),
            state: "Maharashtra".into(),
            contact_number: String::new(),
            latitude: coords.map(|c| c.0),
            longitude: coords.map(|c| c.1),
            has_emergency: false,
            has_ambulance: false,
            beds_available: 0,
            rating: Rating::from_hundredths(400).unwrap(),
        }
    }

    #[test]
    fn distance_to_self_is_zero() {
        for p in [point(19.0896, 72.8656), point(-33.86, 151.2), point(90.0, 0.0)] {
            assert_eq!(haversine_km(p, p), 0.0);
        }
    }

    #[test]
    fn distance_is_symmetric() {
        let mumbai = point(19.0760, 72.8777);
        let delhi = point(28.7041, 77.1025);
        let there = haversine_km(mumbai, delhi);
        let back = haversine_km(delhi, mumbai);
        assert!((there - back).abs() < 1e-9);
    }

    #[test]
    fn known_distances() {
        let cases = [
            (point(19.0760, 72.8777), point(28.7041, 77.1025), 1153.0),
            (point(0.0, 0.0), point(0.0, 1.0), 111.19),
            (point(0.0, 0.0), point(0.0, 180.0), 20015.09),
        ];
        for (a, b, expected) in cases {
            let km = haversine_km(a, b);
            assert!((km - expected).abs() < 1.0, "{a:?} -> {b:?}: {km}");
        }
    }

    #[test]
    fn identical_point_included_with_zero_distance() {
        let here = point(19.0896, 72.8656);
        let ranked = rank_nearby(vec![facility("Airport Clinic", Some((19.0896, 72.8656)))], here, 10.0);
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].distance_km, 0.0);
    }

    #[test]
    fn excludes_missing_coordinates_and_out_of_radius() {
        let here = point(19.0760, 72.8777);
        let mut half = facility("Half Coordinates", None);
        half.latitude = Some(19.07);
        let ranked = rank_nearby(
            vec![
                facility("No Coordinates", None),
                half,
                facility("Delhi", Some((28.7041, 77.1025))),
                facility("Bandra", Some((19.0596, 72.8295))),
            ],
            here,
            50.0,
        );
        let names: Vec<_> = ranked.iter().map(|n| n.facility.name.as_str()).collect();
        assert_eq!(names, vec!["Bandra"]);
    }

    #[test]
    fn results_are_nondecreasing_and_ties_stable() {
        let here = point(19.0760, 72.8777);
        let ranked = rank_nearby(
            vec![
                facility("Far", Some((19.30, 72.90))),
                facility("Tie A", Some((19.10, 72.8777))),
                facility("Near", Some((19.08, 72.8777))),
                facility("Tie B", Some((19.10, 72.8777))),
            ],
            here,
            100.0,
        );
        let names: Vec<_> = ranked.iter().map(|n| n.facility.name.as_str()).collect();
        assert_eq!(names, vec!["Near", "Tie A", "Tie B", "Far"]);
        assert!(ranked.windows(2).all(|w| w[0].distance_km <= w[1].distance_km));
    }

    #[test]
    fn zero_radius_keeps_only_exact_matches() {
        let here = point(12.9716, 77.5946);
        let ranked = rank_nearby(
            vec![
                facility("Here", Some((12.9716, 77.5946))),
                facility("Next Door", Some((12.9717, 77.5946))),
            ],
            here,
            0.0,
        );
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].facility.name, "Here");
    }

    #[test]
    fn rejects_invalid_queries() {
        let conn = open_memory_database().unwrap();
        let bad = [
            (None, Some(72.0), None),
            (Some(19.0), None, None),
            (Some(91.0), Some(72.0), None),
            (Some(-90.5), Some(72.0), None),
            (Some(19.0), Some(180.5), None),
            (Some(f64::NAN), Some(72.0), None),
            (Some(19.0), Some(f64::INFINITY), None),
            (Some(19.0), Some(72.0), Some(-1.0)),
            (Some(19.0), Some(72.0), Some(f64::NAN)),
        ];
        for (lat, lon, radius) in bad {
            let err = find_nearby_facilities(&conn, lat, lon, radius).unwrap_err();
            assert!(matches!(err, CareError::Validation { .. }), "{lat:?} {lon:?} {radius:?}");
        }
    }

    #[test]
    fn search_uses_default_radius_over_stored_facilities() {
        let conn = open_memory_database().unwrap();
        add_facility(&conn, "Nanavati", "Mumbai", Some((19.0960, 72.8400)), true);
        add_facility(&conn, "Pune General", "Pune", Some((18.5204, 73.8567)), true);
        add_facility(&conn, "Unmapped", "Mumbai", None, false);

        let within_default = find_nearby_facilities(&conn, Some(19.0760), Some(72.8777), None).unwrap();
        assert_eq!(within_default.radius_km, DEFAULT_SEARCH_RADIUS_KM);
        let names: Vec<_> = within_default.facilities.iter().map(|n| n.facility.name.as_str()).collect();
        assert_eq!(names, vec!["Nanavati"]);

        let wide = find_nearby_facilities(&conn, Some(19.0760), Some(72.8777), Some(200.0)).unwrap();
        assert_eq!(wide.count, 2);
        assert_eq!(wide.facilities[1].facility.name, "Pune General");
    }

    #[test]
    fn serializes_facility_fields_alongside_distance() {
        let ranked = rank_nearby(
            vec![facility("Airport Clinic", Some((19.0896, 72.8656)))],
            point(19.0896, 72.8656),
            10.0,
        );
        let json = serde_json::to_value(&ranked[0]).unwrap();
        assert_eq!(json["name"], "Airport Clinic");
        assert_eq!(json["distance_km"], 0.0);
    }
}
