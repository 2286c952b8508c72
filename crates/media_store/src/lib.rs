use std::{error, fmt, sync::Arc};

use async_trait::async_trait;
use utility::retry::Transient;

pub mod bucket;
pub mod memory;

pub use bucket::{BucketClient, BucketConfig};
pub use memory::MemoryMediaStore;

/// `https://<host>/<bucket>/<name>` with bucket and name escaped as path
/// segments, shared by every store so stored URLs look the same.
pub fn public_url(host: &str, bucket: &str, name: &str) -> Result<String, MediaError> {
    let mut url = reqwest::Url::parse(&format!("https://{host}/"))
        .map_err(|why| MediaError::InvalidUrl(format!("{host}: {why}")))?;
    url.path_segments_mut()
        .map_err(|_| MediaError::InvalidUrl(host.to_owned()))?
        .pop_if_empty()
        .extend([bucket, name]);
    Ok(url.into())
}

/// Photo types accepted for upload.
pub const ACCEPTED_MIME_TYPES: &[&str] = &["image/png", "image/jpeg"];

/// A photo as received from the entry form.
#[derive(Clone, PartialEq, Eq)]
pub struct PhotoUpload {
    /// Original file name, also used as blob name.
    pub name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl PhotoUpload {
    pub fn new(
        name: impl Into<String>,
        mime_type: impl Into<String>,
        bytes: impl Into<Vec<u8>>,
    ) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            bytes: bytes.into(),
        }
    }

    pub fn validate(&self) -> Result<(), MediaError> {
        if self.name.trim().is_empty() || self.name.contains('/') {
            return Err(MediaError::InvalidName(self.name.clone()));
        }
        let mime_type = self.mime_type.to_ascii_lowercase();
        if !ACCEPTED_MIME_TYPES.contains(&mime_type.as_str()) {
            return Err(MediaError::UnsupportedType {
                name: self.name.clone(),
                mime_type: self.mime_type.clone(),
            });
        }
        Ok(())
    }
}

impl fmt::Debug for PhotoUpload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PhotoUpload")
            .field("name", &self.name)
            .field("mime_type", &self.mime_type)
            .field("size", &self.bytes.len())
            .finish()
    }
}

/// Blob storage for photos.
///
/// Uploading under an existing name replaces the blob. Nothing is ever
/// deleted, photos dropped from a record stay in the bucket.
#[async_trait]
pub trait MediaStore: Send + Sync {
    /// Stores the photo and returns its public URL.
    async fn upload(&self, photo: &PhotoUpload) -> Result<String, MediaError>;
}

#[derive(Debug, Clone)]
pub enum MediaError {
    InvalidName(String),
    UnsupportedType {
        name: String,
        mime_type: String,
    },
    InvalidUrl(String),
    RequestError(Arc<reqwest::Error>),
    InvalidResponse {
        status_code: reqwest::StatusCode,
        url: String,
        response: Option<String>,
    },
}

impl error::Error for MediaError {}

impl fmt::Display for MediaError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            MediaError::InvalidName(name) => write!(f, "Invalid photo name '{}'.", name),
            MediaError::UnsupportedType { name, mime_type } => write!(
                f,
                "Photo '{}' has unsupported type '{}', expected one of: {}",
                name,
                mime_type,
                ACCEPTED_MIME_TYPES.join(", ")
            ),
            MediaError::InvalidUrl(url) => write!(f, "Invalid storage URL '{}'.", url),
            MediaError::RequestError(e) => write!(f, "HTTP request error: {}", e),
            MediaError::InvalidResponse {
                status_code,
                url,
                response,
            } => match response {
                Some(text) => {
                    write!(f, "Invalid Response ({}) {}: {}", status_code, text, url)
                }
                None => write!(f, "Invalid Response ({}) {}", status_code, url),
            },
        }
    }
}

impl Transient for MediaError {
    fn is_transient(&self) -> bool {
        match self {
            MediaError::RequestError(e) => !e.is_builder(),
            MediaError::InvalidResponse { status_code, .. } => {
                status_code.is_server_error()
                    || *status_code == reqwest::StatusCode::TOO_MANY_REQUESTS
            }
            _ => false,
        }
    }
}

impl From<reqwest::Error> for MediaError {
    fn from(e: reqwest::Error) -> Self {
        MediaError::RequestError(Arc::new(e))
    }
}
