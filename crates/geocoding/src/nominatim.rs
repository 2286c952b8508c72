//! Response bodies of the Nominatim `/search` and `/reverse` endpoints.

use model::location::{Address, Coordinates, InvalidCoordinates};
use serde::Deserialize;
use utility::serde::lenient_f64;

use crate::GeocodeError;

#[derive(Debug, Clone, Deserialize)]
pub struct SearchResult {
    #[serde(with = "lenient_f64")]
    pub lat: f64,
    #[serde(with = "lenient_f64")]
    pub lon: f64,
    #[serde(default)]
    pub display_name: String,
}

impl SearchResult {
    pub fn coordinates(&self) -> Result<Coordinates, InvalidCoordinates> {
        Coordinates::new(self.lat, self.lon)
    }
}

/// Nominatim answers a reverse lookup without match with `{"error": "..."}`
/// and status 200.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ReverseResponse {
    Found {
        #[serde(default)]
        display_name: String,
        address: AddressParts,
    },
    Error {
        error: String,
    },
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AddressParts {
    pub road: Option<String>,
    pub suburb: Option<String>,
    pub neighbourhood: Option<String>,
    pub city_district: Option<String>,
    pub city: Option<String>,
    pub town: Option<String>,
    pub village: Option<String>,
    pub postcode: Option<String>,
    pub country: Option<String>,
    pub country_code: Option<String>,
}

impl ReverseResponse {
    pub fn into_address(self, query: impl Into<String>) -> Result<Address, GeocodeError> {
        match self {
            ReverseResponse::Found {
                display_name,
                address,
            } => Ok(Address {
                display_name,
                road: address.road,
                suburb: address
                    .suburb
                    .or(address.neighbourhood)
                    .or(address.city_district),
                city: address.city.or(address.town).or(address.village),
                postcode: address.postcode,
                country: address.country,
                country_code: address.country_code,
            }),
            ReverseResponse::Error { error } => {
                log::debug!("reverse lookup miss: {error}");
                Err(GeocodeError::NotFound(query.into()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_results_carry_string_coordinates() {
        let results: Vec<SearchResult> = serde_json::from_str(
            r#"[{"place_id": 1, "lat": "1.2996", "lon": "103.8555",
                 "display_name": "Bugis, Downtown Core, Central, Singapore"}]"#,
        )
        .unwrap();
        let coordinates = results[0].coordinates().unwrap();
        assert_eq!(coordinates.latitude, 1.2996);
        assert_eq!(coordinates.longitude, 103.8555);
    }

    #[test]
    fn reverse_result_becomes_address() {
        let response: ReverseResponse = serde_json::from_str(
            r#"{"display_name": "Bugis Junction, Victoria Street, Bugis, Singapore",
                "address": {"road": "Victoria Street", "neighbourhood": "Bugis",
                            "city": "Singapore", "postcode": "188024",
                            "country": "Singapore", "country_code": "sg"}}"#,
        )
        .unwrap();
        let address = response.into_address("1.2996, 103.8555").unwrap();
        assert_eq!(address.suburb.as_deref(), Some("Bugis"));
        assert_eq!(address.country.as_deref(), Some("Singapore"));
        assert_eq!(address.city.as_deref(), Some("Singapore"));
        assert_eq!(address.road.as_deref(), Some("Victoria Street"));
    }

    #[test]
    fn reverse_miss_is_not_found() {
        let response: ReverseResponse =
            serde_json::from_str(r#"{"error": "Unable to geocode"}"#).unwrap();
        assert!(matches!(
            response.into_address("0, 0"),
            Err(GeocodeError::NotFound(query)) if query == "0, 0"
        ));
    }
}
