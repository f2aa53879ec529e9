use super::enums::Specialty;

#[derive(Debug, Default)]
pub struct DoctorFilter {
    pub specialty: Option<Specialty>,
    /// Include doctors that are not accepting new bookings.
    pub include_unavailable: bool,
    /// Whitespace-separated terms. Every term must occur, case-insensitively,
    /// in the doctor's name, specialty or clinic.
    pub search: Option<String>,
}

#[derive(Debug, Default)]
pub struct FacilityFilter {
    /// Case-insensitive substring match on city.
    pub city: Option<String>,
    pub emergency_only: bool,
    /// Whitespace-separated terms. Every term must occur, case-insensitively,
    /// in the facility's name, city or address.
    pub search: Option<String>,
}

/// Splits free text into search terms, dropping empties.
pub fn search_terms(search: Option<&str>) -> Vec<&str> {
    search
        .map(|s| s.split(|c: char| c.is_whitespace() || c == ',').filter(|t| !t.is_empty()).collect())
        .unwrap_or_default()
}
