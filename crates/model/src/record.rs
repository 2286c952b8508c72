use std::fmt;

use chrono::NaiveDate;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::{
    category::Category, image::ImageSet, location::Coordinates, rating::Rating,
    ExampleData,
};

/// Identity of a record in the store.
#[derive(
    Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema,
)]
#[serde(transparent)]
pub struct RecordKey(String);

impl RecordKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Key of a newly created record: `<YYYY-MM-DD>_<locality>`.
    pub fn compose(period: NaiveDate, locality: &str) -> Self {
        Self(format!("{}_{}", period.format("%Y-%m-%d"), locality.trim()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecordKey {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for RecordKey {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for RecordKey {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

impl AsRef<str> for RecordKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A logged visit to a place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct LocationRecord {
    pub key: RecordKey,
    pub locality: String,
    #[serde(default)]
    pub suburb: String,
    pub country: String,
    #[serde(flatten)]
    pub coordinates: Coordinates,
    pub category: Category,
    pub rating: Rating,
    pub period: NaiveDate,
    #[serde(default)]
    pub comment: String,
    #[serde(default)]
    pub image: ImageSet,
}

impl LocationRecord {
    pub fn latitude(&self) -> f64 {
        self.coordinates.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.coordinates.longitude
    }

    /// Short line shown above the title in the detail view.
    pub fn caption(&self) -> String {
        format!(
            "{} | {} | {}",
            self.period.format("%Y-%m-%d"),
            self.category,
            self.country
        )
    }
}

impl ExampleData for LocationRecord {
    fn example_data() -> Self {
        let period = NaiveDate::from_ymd_opt(2023, 5, 1).unwrap_or_default();
        LocationRecord {
            key: RecordKey::compose(period, "Bugis"),
            locality: "Bugis".to_owned(),
            suburb: "Bugis".to_owned(),
            country: "Singapore".to_owned(),
            coordinates: Coordinates {
                latitude: 1.3007,
                longitude: 103.8559,
            },
            category: Category::Food,
            rating: Rating::default(),
            period,
            comment: "Hainanese chicken rice at the hawker centre.".to_owned(),
            image: [(
                "bugis.jpg",
                "https://storage.cloud.google.com/travel-log/bugis.jpg",
            )]
            .into_iter()
            .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn composed_key_is_date_and_locality() {
        let period = NaiveDate::from_ymd_opt(2023, 5, 1).unwrap();
        assert_eq!(
            RecordKey::compose(period, " Bugis ").as_str(),
            "2023-05-01_Bugis"
        );
    }

    #[test]
    fn stored_shape_is_flat() {
        let record = LocationRecord::example_data();
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["key"], "2023-05-01_Bugis");
        assert_eq!(value["latitude"], 1.3007);
        assert_eq!(value["longitude"], 103.8559);
        assert_eq!(value["category"], "Food");
        assert_eq!(value["rating"], 1);
        assert_eq!(value["period"], "2023-05-01");
        assert_eq!(
            value["image"]["bugis.jpg"],
            "https://storage.cloud.google.com/travel-log/bugis.jpg"
        );
        assert!(value.get("coordinates").is_none());
    }

    #[test]
    fn reads_entries_without_optional_fields() {
        let record: LocationRecord = serde_json::from_value(json!({
            "key": "2022-12-24_Clarke Quay",
            "locality": "Clarke Quay",
            "country": "Singapore",
            "latitude": 1.2906,
            "longitude": 103.8465,
            "category": "Drink",
            "rating": 4,
            "period": "2022-12-24",
            "image": "https://storage.cloud.google.com/travel-log/quay.png"
        }))
        .unwrap();
        assert_eq!(record.suburb, "");
        assert_eq!(record.comment, "");
        assert_eq!(record.image.names().collect::<Vec<_>>(), vec!["quay.png"]);
        assert_eq!(record.caption(), "2022-12-24 | Drink | Singapore");
    }

    #[test]
    fn rejects_invalid_coordinates_and_categories() {
        let mut value = serde_json::to_value(LocationRecord::example_data()).unwrap();
        value["latitude"] = json!(123.0);
        assert!(serde_json::from_value::<LocationRecord>(value.clone()).is_err());
        value["latitude"] = json!(1.3);
        value["category"] = json!("Nightlife");
        assert!(serde_json::from_value::<LocationRecord>(value).is_err());
    }
}
