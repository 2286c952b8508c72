use itertools::Itertools;
use model::{
    location::Coordinates,
    record::{LocationRecord, RecordKey},
    WithDistance,
};
use utility::geo::BoundingBox;

use crate::map::{Marker, MarkerId};

/// All records of one interaction cycle, rebuilt from a full fetch every
/// time. Lookups are linear scans, which is fine for a personal log.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordTable {
    rows: Vec<LocationRecord>,
}

impl RecordTable {
    pub fn new(records: Vec<LocationRecord>) -> Self {
        let fetched = records.len();
        let rows = records
            .into_iter()
            .unique_by(|record| record.key.clone())
            .collect::<Vec<_>>();
        if rows.len() != fetched {
            log::warn!(
                "dropped {} records with duplicate keys",
                fetched - rows.len()
            );
        }
        Self { rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn records(&self) -> &[LocationRecord] {
        &self.rows
    }

    pub fn into_records(self) -> Vec<LocationRecord> {
        self.rows
    }

    pub fn get(&self, key: &RecordKey) -> Option<&LocationRecord> {
        self.rows.iter().find(|record| &record.key == key)
    }

    pub fn by_marker(&self, marker: &MarkerId) -> Option<&LocationRecord> {
        self.get(marker.key())
    }

    /// One marker per row.
    pub fn markers(&self) -> Vec<Marker> {
        self.rows.iter().map(Marker::for_record).collect()
    }

    /// Records within `radius_km` of `center`, closest first.
    pub fn nearby(
        &self,
        center: Coordinates,
        radius_km: f64,
    ) -> Vec<WithDistance<LocationRecord>> {
        let bbox = BoundingBox::around(center.latitude, center.longitude, radius_km);
        self.rows
            .iter()
            .filter(|record| bbox.contains(record.latitude(), record.longitude()))
            .map(|record| {
                WithDistance::new(center.distance_km(&record.coordinates), record.clone())
            })
            .filter(|found| found.distance_km <= radius_km)
            .sorted_by(|a, b| a.distance_km.total_cmp(&b.distance_km))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use model::ExampleData;

    use super::*;

    fn at(key: &str, latitude: f64, longitude: f64) -> LocationRecord {
        let mut record = LocationRecord::example_data();
        record.key = RecordKey::new(key);
        record.coordinates = Coordinates::new(latitude, longitude).unwrap();
        record
    }

    #[test]
    fn duplicate_keys_are_kept_once() {
        let table = RecordTable::new(vec![
            at("a", 1.30, 103.85),
            at("a", 1.31, 103.86),
            at("b", 1.29, 103.84),
        ]);
        assert_eq!(table.len(), 2);
        assert_eq!(table.markers().len(), 2);
        assert_eq!(table.get(&RecordKey::new("a")).unwrap().latitude(), 1.30);
    }

    #[test]
    fn nearby_is_sorted_and_bounded() {
        let table = RecordTable::new(vec![
            at("marina", 1.2834, 103.8607),
            at("bugis", 1.3007, 103.8559),
            at("paris", 48.8566, 2.3522),
        ]);
        let center = Coordinates::new(1.3000, 103.8550).unwrap();
        let found = table.nearby(center, 5.0);
        let keys = found
            .iter()
            .map(|found| found.content.key.as_str())
            .collect::<Vec<_>>();
        assert_eq!(keys, vec!["bugis", "marina"]);
        assert!(found[0].distance_km < found[1].distance_km);
        assert!(table.nearby(center, 0.5).len() == 1);
    }

    #[test]
    fn nearby_reaches_across_the_antimeridian() {
        let table = RecordTable::new(vec![
            at("east", -17.0, 179.95),
            at("west", -17.0, -179.95),
            at("suva", -18.14, 178.44),
        ]);
        let center = Coordinates::new(-17.0, 179.99).unwrap();
        let keys = table
            .nearby(center, 20.0)
            .into_iter()
            .map(|found| found.content.key.as_str().to_owned())
            .collect::<Vec<_>>();
        assert_eq!(keys, vec!["east", "west"]);
    }

    #[test]
    fn lookup_by_marker() {
        let table = RecordTable::new(vec![at("2023-05-01_Bugis", 1.3, 103.85)]);
        assert!(table.by_marker(&MarkerId::new("2023-05-01_Bugis")).is_some());
        assert!(table.by_marker(&MarkerId::new("2023-05-02_Bugis")).is_none());
    }
}
