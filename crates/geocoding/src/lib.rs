use std::{error, fmt, sync::Arc};

use async_trait::async_trait;
use model::location::{Address, Coordinates, InvalidCoordinates};
use utility::retry::Transient;

pub mod client;
pub mod nominatim;

pub use client::{NominatimClient, NominatimConfig};

pub const DEFAULT_LANGUAGE: &str = "en";

/// Resolves place names to coordinates and back.
#[async_trait]
pub trait Geocoder: Send + Sync {
    /// Forward geocode, e.g. `"Bugis, Singapore"`.
    async fn forward(&self, query: &str) -> Result<Coordinates, GeocodeError>;

    /// Reverse geocode with address parts in the given language.
    async fn reverse(
        &self,
        coordinates: Coordinates,
        language: &str,
    ) -> Result<Address, GeocodeError>;
}

#[derive(Debug, Clone)]
pub enum GeocodeError {
    /// The geocoder has no match for the query.
    NotFound(String),
    EmptyQuery,
    RequestError(Arc<reqwest::Error>),
    JsonError(Arc<serde_json::Error>),
    InvalidResponse {
        status_code: reqwest::StatusCode,
        url: String,
        response: Option<String>,
    },
    InvalidCoordinates(InvalidCoordinates),
}

impl error::Error for GeocodeError {}

impl fmt::Display for GeocodeError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            GeocodeError::NotFound(query) => write!(f, "No place found for '{}'.", query),
            GeocodeError::EmptyQuery => write!(f, "Nothing to search for."),
            GeocodeError::RequestError(e) => write!(f, "HTTP request error: {}", e),
            GeocodeError::JsonError(e) => write!(f, "JSON parse error: {}", e),
            GeocodeError::InvalidResponse {
                status_code,
                url,
                response,
            } => match response {
                Some(text) => {
                    write!(f, "Invalid Response ({}) {}: {}", status_code, text, url)
                }
                None => write!(f, "Invalid Response ({}) {}", status_code, url),
            },
            GeocodeError::InvalidCoordinates(e) => {
                write!(f, "Geocoder returned an {}", e)
            }
        }
    }
}

impl Transient for GeocodeError {
    fn is_transient(&self) -> bool {
        match self {
            GeocodeError::RequestError(e) => !e.is_builder() && !e.is_decode(),
            GeocodeError::InvalidResponse { status_code, .. } => {
                status_code.is_server_error()
                    || *status_code == reqwest::StatusCode::TOO_MANY_REQUESTS
            }
            _ => false,
        }
    }
}

impl From<reqwest::Error> for GeocodeError {
    fn from(e: reqwest::Error) -> Self {
        GeocodeError::RequestError(Arc::new(e))
    }
}

impl From<serde_json::Error> for GeocodeError {
    fn from(e: serde_json::Error) -> Self {
        GeocodeError::JsonError(Arc::new(e))
    }
}

impl From<InvalidCoordinates> for GeocodeError {
    fn from(e: InvalidCoordinates) -> Self {
        GeocodeError::InvalidCoordinates(e)
    }
}
