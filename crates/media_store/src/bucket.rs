//! Client of the cloud object storage bucket holding the photos.

use std::{env, time::Duration};

use async_trait::async_trait;
use utility::retry::RetryPolicy;

use crate::{public_url, MediaError, MediaStore, PhotoUpload};

pub const UPLOAD_API_URL: &str = "https://storage.googleapis.com/upload/storage/v1";
pub const PUBLIC_HOST: &str = "storage.cloud.google.com";

#[derive(Debug, Clone)]
pub struct BucketConfig {
    pub bucket: String,
    /// OAuth bearer token with write access to the bucket.
    pub access_token: String,
    pub upload_url: String,
    pub public_host: String,
    pub timeout: Duration,
    pub retry: RetryPolicy,
}

impl BucketConfig {
    pub fn new(bucket: impl Into<String>, access_token: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            access_token: access_token.into(),
            upload_url: UPLOAD_API_URL.to_owned(),
            public_host: PUBLIC_HOST.to_owned(),
            timeout: Duration::from_secs(30),
            retry: RetryPolicy::default(),
        }
    }

    /// Reads `MEDIA_BUCKET` and `MEDIA_ACCESS_TOKEN`, optionally
    /// `MEDIA_PUBLIC_HOST` and `MEDIA_UPLOAD_URL`.
    pub fn from_env() -> Option<Self> {
        let bucket = env::var("MEDIA_BUCKET").ok()?;
        let access_token = env::var("MEDIA_ACCESS_TOKEN").ok()?;
        let mut config = Self::new(bucket, access_token);
        if let Ok(public_host) = env::var("MEDIA_PUBLIC_HOST") {
            config.public_host = public_host;
        }
        if let Ok(upload_url) = env::var("MEDIA_UPLOAD_URL") {
            config.upload_url = upload_url;
        }
        Some(config)
    }

    /// `https://<storage-host>/<bucket>/<blob-name>`
    pub fn public_url(&self, name: &str) -> Result<String, MediaError> {
        public_url(&self.public_host, &self.bucket, name)
    }

    /// `<upload-url>/b/<bucket>/o`
    fn upload_endpoint(&self) -> Result<reqwest::Url, MediaError> {
        let mut url = reqwest::Url::parse(&self.upload_url)
            .map_err(|why| MediaError::InvalidUrl(format!("{}: {why}", self.upload_url)))?;
        url.path_segments_mut()
            .map_err(|_| MediaError::InvalidUrl(self.upload_url.clone()))?
            .pop_if_empty()
            .extend(["b", self.bucket.as_str(), "o"]);
        Ok(url)
    }
}

pub struct BucketClient {
    config: BucketConfig,
    http: reqwest::Client,
}

impl BucketClient {
    pub fn new(config: BucketConfig) -> Result<Self, MediaError> {
        let http = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(Self { config, http })
    }

    async fn upload_once(&self, photo: &PhotoUpload) -> Result<(), MediaError> {
        let url = self.config.upload_endpoint()?;
        let response = self
            .http
            .post(url.clone())
            .query(&[("uploadType", "media"), ("name", photo.name.as_str())])
            .bearer_auth(&self.config.access_token)
            .header(reqwest::header::CONTENT_TYPE, photo.mime_type.as_str())
            .body(photo.bytes.clone())
            .send()
            .await?;

        match response.status() {
            status if status.is_success() => Ok(()),
            other => Err(MediaError::InvalidResponse {
                status_code: other,
                url: url.into(),
                response: response.text().await.ok(),
            }),
        }
    }
}

#[async_trait]
impl MediaStore for BucketClient {
    async fn upload(&self, photo: &PhotoUpload) -> Result<String, MediaError> {
        photo.validate()?;
        let url = self.config.public_url(&photo.name)?;
        self.config
            .retry
            .run("upload photo", || self.upload_once(photo))
            .await?;
        log::info!(
            "uploaded '{}' ({} bytes) to bucket '{}'",
            photo.name,
            photo.bytes.len(),
            self.config.bucket
        );
        Ok(url)
    }
}
