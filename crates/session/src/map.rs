use std::fmt;

use model::{
    category::Category,
    location::Coordinates,
    record::{LocationRecord, RecordKey},
};
use serde::{Deserialize, Serialize};

use crate::search::MapFocus;

pub const MAP_TILES: &str = "CartoDB dark_matter";

/// Identity of a marker. It is the key of the record the marker was created
/// for, so a click resolves to exactly one record without comparing
/// coordinates.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MarkerId(RecordKey);

impl MarkerId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(RecordKey::new(id))
    }

    pub fn for_record(record: &LocationRecord) -> Self {
        Self(record.key.clone())
    }

    pub fn key(&self) -> &RecordKey {
        &self.0
    }
}

impl fmt::Display for MarkerId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Marker {
    pub id: MarkerId,
    pub position: Coordinates,
    pub popup: String,
    pub category: Category,
    pub icon: &'static str,
    pub color: &'static str,
}

impl Marker {
    pub fn for_record(record: &LocationRecord) -> Self {
        Self {
            id: MarkerId::for_record(record),
            position: record.coordinates,
            popup: record.locality.clone(),
            category: record.category,
            icon: record.category.icon(),
            color: record.category.color(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MapView {
    pub tiles: &'static str,
    /// `None` when the search could not be resolved.
    pub focus: Option<MapFocus>,
    pub markers: Vec<Marker>,
}

impl MapView {
    pub fn new(focus: Option<MapFocus>, markers: Vec<Marker>) -> Self {
        Self {
            tiles: MAP_TILES,
            focus,
            markers,
        }
    }
}

#[cfg(test)]
mod tests {
    use model::ExampleData;

    use super::*;

    #[test]
    fn marker_mirrors_its_record() {
        let record = LocationRecord::example_data();
        let marker = Marker::for_record(&record);
        assert_eq!(marker.id, MarkerId::new("2023-05-01_Bugis"));
        assert_eq!(marker.id.key(), &record.key);
        assert_eq!(marker.position, record.coordinates);
        assert_eq!(marker.popup, "Bugis");
        assert_eq!(marker.icon, Category::Food.icon());
        assert_eq!(marker.color, "red");
    }
}
