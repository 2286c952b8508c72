//! One interaction cycle of the travel log: fetch the table, place markers,
//! center the map and show either a record or the entry form.

use std::sync::Arc;

use geocoding::{GeocodeError, Geocoder, DEFAULT_LANGUAGE};
use media_store::MediaStore;
use model::{
    location::{Address, Coordinates},
    record::{LocationRecord, RecordKey},
};
use record_store::{RecordStore, StoreError};

pub mod form;
pub mod map;
pub mod render;
pub mod search;
pub mod submit;
pub mod table;

#[cfg(test)]
mod testing;

pub use form::{EntryForm, FormMode, ValidationError};
pub use map::{MapView, Marker, MarkerId};
pub use render::{EntryIntent, Interaction, Panel, RenderCycle, View};
pub use search::{MapFocus, SearchCriteria};
pub use submit::SubmitError;
pub use table::RecordTable;

/// The collaborators of the app, shared by every request.
#[derive(Clone)]
pub struct Logbook {
    records: Arc<dyn RecordStore>,
    media: Arc<dyn MediaStore>,
    geocoder: Arc<dyn Geocoder>,
}

impl Logbook {
    pub fn new(
        records: Arc<dyn RecordStore>,
        media: Arc<dyn MediaStore>,
        geocoder: Arc<dyn Geocoder>,
    ) -> Self {
        Self {
            records,
            media,
            geocoder,
        }
    }

    /// Fetches every stored record.
    pub async fn table(&self) -> Result<RecordTable, StoreError> {
        Ok(RecordTable::new(self.records.fetch_all().await?))
    }

    pub async fn record(&self, key: &RecordKey) -> Result<LocationRecord, StoreError> {
        self.records.get(key).await
    }

    /// Where the map should be centered for the search.
    pub async fn locate(&self, search: &SearchCriteria) -> Result<MapFocus, GeocodeError> {
        let (query, zoom) = search.geocode_query().ok_or(GeocodeError::EmptyQuery)?;
        let center = self.geocoder.forward(&query).await?;
        log::debug!("'{query}' is at {center}");
        Ok(MapFocus { center, zoom })
    }

    /// Free text place search.
    pub async fn geocode(&self, query: &str) -> Result<Coordinates, GeocodeError> {
        match query.trim() {
            "" => Err(GeocodeError::EmptyQuery),
            query => self.geocoder.forward(query).await,
        }
    }

    pub async fn reverse_geocode(
        &self,
        coordinates: Coordinates,
        language: &str,
    ) -> Result<Address, GeocodeError> {
        self.geocoder.reverse(coordinates, language).await
    }

    /// Resolves the address of a pin dropped on the map, used to prefill
    /// suburb and country of the form.
    pub async fn drop_pin(&self, coordinates: Coordinates) -> Result<Address, GeocodeError> {
        self.reverse_geocode(coordinates, DEFAULT_LANGUAGE).await
    }
}
