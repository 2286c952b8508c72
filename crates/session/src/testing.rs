use std::{collections::HashMap, sync::Arc, sync::Mutex};

use async_trait::async_trait;
use chrono::NaiveDate;
use geocoding::{GeocodeError, Geocoder};
use media_store::MemoryMediaStore;
use model::{
    category::Category,
    image::ImageSet,
    location::{Address, Coordinates},
    rating::Rating,
    record::{LocationRecord, RecordKey},
};
use record_store::{MemoryRecordStore, RecordStore, StoreError};

use crate::Logbook;

/// Geocoder answering from a fixed table and remembering what was asked.
pub struct FakeGeocoder {
    places: Option<HashMap<String, Coordinates>>,
    queries: Mutex<Vec<String>>,
}

impl FakeGeocoder {
    pub fn singapore() -> Self {
        let places = [
            ("Bugis, Singapore", (1.2996, 103.8555)),
            ("Orchard, Singapore", (1.3048, 103.8318)),
            ("Singapore", (1.3521, 103.8198)),
        ]
        .into_iter()
        .map(|(name, (latitude, longitude))| {
            (name.to_owned(), Coordinates::new(latitude, longitude).unwrap())
        })
        .collect();
        Self {
            places: Some(places),
            queries: Mutex::new(vec![]),
        }
    }

    /// Every request fails like an overloaded service.
    pub fn unavailable() -> Self {
        Self {
            places: None,
            queries: Mutex::new(vec![]),
        }
    }

    pub fn forward_queries(&self) -> Vec<String> {
        self.queries.lock().unwrap().clone()
    }

    fn outage() -> GeocodeError {
        GeocodeError::InvalidResponse {
            status_code: reqwest::StatusCode::SERVICE_UNAVAILABLE,
            url: "http://geocoder.test/search".to_owned(),
            response: None,
        }
    }
}

#[async_trait]
impl Geocoder for FakeGeocoder {
    async fn forward(&self, query: &str) -> Result<Coordinates, GeocodeError> {
        self.queries.lock().unwrap().push(query.to_owned());
        let places = self.places.as_ref().ok_or_else(Self::outage)?;
        places
            .get(query)
            .copied()
            .ok_or_else(|| GeocodeError::NotFound(query.to_owned()))
    }

    async fn reverse(
        &self,
        coordinates: Coordinates,
        _language: &str,
    ) -> Result<Address, GeocodeError> {
        if self.places.is_none() {
            return Err(Self::outage());
        }
        Ok(Address {
            display_name: format!("Bugis Junction, Bugis, Singapore ({coordinates})"),
            suburb: Some("Bugis".to_owned()),
            city: Some("Singapore".to_owned()),
            country: Some("Singapore".to_owned()),
            country_code: Some("sg".to_owned()),
            ..Address::default()
        })
    }
}

/// Store which reads fine but rejects every write.
pub struct FailingPutStore(pub MemoryRecordStore);

#[async_trait]
impl RecordStore for FailingPutStore {
    async fn put(&self, record: &LocationRecord) -> record_store::Result<()> {
        Err(StoreError::Other(format!("write of '{}' refused", record.key)))
    }

    async fn get(&self, key: &RecordKey) -> record_store::Result<LocationRecord> {
        self.0.get(key).await
    }

    async fn fetch_all(&self) -> record_store::Result<Vec<LocationRecord>> {
        self.0.fetch_all().await
    }
}

pub fn logbook(
    records: Vec<LocationRecord>,
    geocoder: FakeGeocoder,
) -> (
    Logbook,
    Arc<MemoryRecordStore>,
    Arc<MemoryMediaStore>,
    Arc<FakeGeocoder>,
) {
    let store = Arc::new(MemoryRecordStore::with_records(records));
    let media = Arc::new(MemoryMediaStore::new("travel-log"));
    let geocoder = Arc::new(geocoder);
    let logbook = Logbook::new(store.clone(), media.clone(), geocoder.clone());
    (logbook, store, media, geocoder)
}

pub fn record_at(key: &str, latitude: f64) -> LocationRecord {
    let key = RecordKey::new(key);
    let (period, locality) = key.as_str().split_once('_').unwrap();
    LocationRecord {
        locality: locality.to_owned(),
        suburb: String::new(),
        country: "Singapore".to_owned(),
        coordinates: Coordinates::new(latitude, 103.85).unwrap(),
        category: Category::Food,
        rating: Rating::new(4).unwrap(),
        period: NaiveDate::parse_from_str(period, "%Y-%m-%d").unwrap(),
        comment: String::new(),
        image: ImageSet::new(),
        key,
    }
}
