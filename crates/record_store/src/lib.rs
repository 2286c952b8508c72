use std::{error, fmt, result, sync::Arc};

use async_trait::async_trait;
use model::record::{LocationRecord, RecordKey};
use utility::retry::Transient;

pub mod base;
pub mod memory;

pub use base::{BaseClient, BaseCredentials};
pub use memory::MemoryRecordStore;

#[derive(Debug, Clone)]
pub enum StoreError {
    NotFound(RecordKey),
    RequestError(Arc<reqwest::Error>),
    JsonError(Arc<serde_json::Error>),
    InvalidResponse {
        status_code: reqwest::StatusCode,
        url: String,
        response: Option<String>,
    },
    Other(String),
}

pub type Result<T> = result::Result<T, StoreError>;

/// Durable home of all location records.
///
/// The store does no querying: callers fetch everything and filter in
/// memory, which is fine for the few hundred records a personal log holds.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Inserts the record or overwrites every field of the record with the
    /// same key.
    async fn put(&self, record: &LocationRecord) -> Result<()>;

    async fn get(&self, key: &RecordKey) -> Result<LocationRecord>;

    async fn fetch_all(&self) -> Result<Vec<LocationRecord>>;
}

impl error::Error for StoreError {}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            StoreError::NotFound(key) => write!(f, "No record with key '{}'.", key),
            StoreError::RequestError(e) => write!(f, "HTTP request error: {}", e),
            StoreError::JsonError(e) => write!(f, "JSON parse error: {}", e),
            StoreError::InvalidResponse {
                status_code,
                url,
                response,
            } => match response {
                Some(text) => {
                    write!(f, "Invalid Response ({}) {}: {}", status_code, text, url)
                }
                None => write!(f, "Invalid Response ({}) {}", status_code, url),
            },
            StoreError::Other(e) => write!(f, "{e}"),
        }
    }
}

impl Transient for StoreError {
    fn is_transient(&self) -> bool {
        match self {
            StoreError::RequestError(e) => !e.is_builder() && !e.is_decode(),
            StoreError::InvalidResponse { status_code, .. } => {
                status_code.is_server_error()
                    || *status_code == reqwest::StatusCode::TOO_MANY_REQUESTS
            }
            _ => false,
        }
    }
}

impl From<reqwest::Error> for StoreError {
    fn from(e: reqwest::Error) -> Self {
        StoreError::RequestError(Arc::new(e))
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(e: serde_json::Error) -> Self {
        StoreError::JsonError(Arc::new(e))
    }
}

pub fn not_found_to_none<O>(result: Result<O>) -> Result<Option<O>> {
    match result {
        Err(StoreError::NotFound(_)) => Ok(None),
        other => other.map(Some),
    }
}
