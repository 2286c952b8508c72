use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::{bucket::PUBLIC_HOST, public_url, MediaError, MediaStore, PhotoUpload};

/// Keeps uploaded photos in memory, URLs point to where the bucket would
/// serve them.
#[derive(Debug)]
pub struct MemoryMediaStore {
    bucket: String,
    blobs: RwLock<HashMap<String, PhotoUpload>>,
}

impl MemoryMediaStore {
    pub fn new(bucket: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            blobs: RwLock::new(HashMap::new()),
        }
    }

    pub async fn blob(&self, name: &str) -> Option<PhotoUpload> {
        self.blobs.read().await.get(name).cloned()
    }

    pub async fn len(&self) -> usize {
        self.blobs.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.blobs.read().await.is_empty()
    }
}

#[async_trait]
impl MediaStore for MemoryMediaStore {
    async fn upload(&self, photo: &PhotoUpload) -> Result<String, MediaError> {
        photo.validate()?;
        self.blobs
            .write()
            .await
            .insert(photo.name.clone(), photo.clone());
        public_url(PUBLIC_HOST, &self.bucket, &photo.name)
    }
}
