use std::{error, fmt};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use utility::geo::{self, is_valid_latitude, is_valid_longitude};

/// A validated WGS84 coordinate in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(try_from = "RawCoordinates")]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Deserialize)]
struct RawCoordinates {
    latitude: f64,
    longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, InvalidCoordinates> {
        if is_valid_latitude(latitude) && is_valid_longitude(longitude) {
            Ok(Self {
                latitude,
                longitude,
            })
        } else {
            Err(InvalidCoordinates {
                latitude,
                longitude,
            })
        }
    }

    pub fn distance_km(&self, other: &Coordinates) -> f64 {
        geo::haversine_distance(
            self.latitude,
            self.longitude,
            other.latitude,
            other.longitude,
        )
    }
}

impl TryFrom<RawCoordinates> for Coordinates {
    type Error = InvalidCoordinates;

    fn try_from(raw: RawCoordinates) -> Result<Self, Self::Error> {
        Self::new(raw.latitude, raw.longitude)
    }
}

impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}, {}", self.latitude, self.longitude)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InvalidCoordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl error::Error for InvalidCoordinates {}

impl fmt::Display for InvalidCoordinates {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "invalid coordinate ({}, {}): latitude must be within [-90, 90] and longitude within [-180, 180]",
            self.latitude, self.longitude
        )
    }
}

/// Address fields resolved for a coordinate.
#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    pub display_name: String,
    pub road: Option<String>,
    pub suburb: Option<String>,
    pub city: Option<String>,
    pub postcode: Option<String>,
    pub country: Option<String>,
    pub country_code: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validates_on_construction() {
        assert!(Coordinates::new(1.2996, 103.8555).is_ok());
        assert!(Coordinates::new(91.0, 0.0).is_err());
        assert!(Coordinates::new(0.0, f64::NAN).is_err());
    }

    #[test]
    fn validates_on_deserialization() {
        let ok: Coordinates =
            serde_json::from_str(r#"{"latitude": 1.3, "longitude": 103.8}"#).unwrap();
        assert_eq!(ok, Coordinates::new(1.3, 103.8).unwrap());
        assert!(
            serde_json::from_str::<Coordinates>(r#"{"latitude": 1.3, "longitude": 200}"#)
                .is_err()
        );
    }
}
