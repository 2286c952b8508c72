use model::location::Coordinates;
use serde::{Deserialize, Serialize};

pub const DEFAULT_LOCALITY: &str = "Bugis";
pub const DEFAULT_COUNTRY: &str = "Singapore";

/// Zoom level when the search names a locality.
pub const LOCALITY_ZOOM: u8 = 15;
/// Zoom level when only a country is searched.
pub const COUNTRY_ZOOM: u8 = 5;

/// What the user typed into the search sidebar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchCriteria {
    #[serde(default)]
    pub locality: String,
    #[serde(default)]
    pub country: String,
}

impl Default for SearchCriteria {
    fn default() -> Self {
        Self::new(DEFAULT_LOCALITY, DEFAULT_COUNTRY)
    }
}

impl SearchCriteria {
    pub fn new(locality: impl Into<String>, country: impl Into<String>) -> Self {
        Self {
            locality: locality.into(),
            country: country.into(),
        }
    }

    /// Geocoder query and the zoom level fitting its precision, `None` when
    /// there is nothing to search for.
    pub fn geocode_query(&self) -> Option<(String, u8)> {
        let locality = self.locality.trim();
        let country = self.country.trim();
        match (locality.is_empty(), country.is_empty()) {
            (false, false) => Some((format!("{locality}, {country}"), LOCALITY_ZOOM)),
            (true, false) => Some((country.to_owned(), COUNTRY_ZOOM)),
            (false, true) => Some((locality.to_owned(), LOCALITY_ZOOM)),
            (true, true) => None,
        }
    }
}

/// Where the map is centered.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MapFocus {
    pub center: Coordinates,
    pub zoom: u8,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn locality_and_country_are_combined() {
        assert_eq!(
            SearchCriteria::default().geocode_query(),
            Some(("Bugis, Singapore".to_owned(), LOCALITY_ZOOM))
        );
    }

    #[test]
    fn empty_locality_falls_back_to_the_country() {
        assert_eq!(
            SearchCriteria::new("  ", "Singapore").geocode_query(),
            Some(("Singapore".to_owned(), COUNTRY_ZOOM))
        );
        assert!(COUNTRY_ZOOM < LOCALITY_ZOOM);
    }

    #[test]
    fn nothing_to_search() {
        assert_eq!(SearchCriteria::new("", "").geocode_query(), None);
    }
}
