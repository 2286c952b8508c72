use std::{env, time::Duration};

use async_trait::async_trait;
use model::location::{Address, Coordinates};
use serde::de::DeserializeOwned;
use tokio::{sync::Mutex, time::Instant};
use utility::retry::RetryPolicy;

use crate::{
    nominatim::{ReverseResponse, SearchResult},
    GeocodeError, Geocoder,
};

pub const NOMINATIM_URL: &str = "https://nominatim.openstreetmap.org";

#[derive(Debug, Clone)]
pub struct NominatimConfig {
    pub url: String,
    pub user_agent: String,
    /// Minimum spacing between two requests (the public instance allows one
    /// request per second).
    pub min_delay: Duration,
    pub timeout: Duration,
    pub retry: RetryPolicy,
}

impl Default for NominatimConfig {
    fn default() -> Self {
        Self {
            url: NOMINATIM_URL.to_owned(),
            user_agent: "travel-log".to_owned(),
            min_delay: Duration::from_secs(1),
            timeout: Duration::from_secs(10),
            retry: RetryPolicy::default(),
        }
    }
}

impl NominatimConfig {
    /// Defaults, overridden by `GEOCODER_URL` and `GEOCODER_USER_AGENT`.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            url: env::var("GEOCODER_URL").unwrap_or(defaults.url),
            user_agent: env::var("GEOCODER_USER_AGENT").unwrap_or(defaults.user_agent),
            ..defaults
        }
    }
}

pub struct NominatimClient {
    config: NominatimConfig,
    http: reqwest::Client,
    last_request: Mutex<Option<Instant>>,
}

impl NominatimClient {
    pub fn new(config: NominatimConfig) -> Result<Self, GeocodeError> {
        let http = reqwest::Client::builder()
            .user_agent(&config.user_agent)
            .timeout(config.timeout)
            .build()?;
        Ok(Self {
            config,
            http,
            last_request: Mutex::new(None),
        })
    }

    /// Waits until `min_delay` has passed since the previous request.
    async fn throttle(&self) {
        let mut last_request = self.last_request.lock().await;
        if let Some(last) = *last_request {
            let next_allowed = last + self.config.min_delay;
            if next_allowed > Instant::now() {
                tokio::time::sleep_until(next_allowed).await;
            }
        }
        *last_request = Some(Instant::now());
    }

    async fn get<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        query: &[(&str, String)],
    ) -> Result<T, GeocodeError> {
        self.throttle().await;

        let url = format!("{}/{}", self.config.url.trim_end_matches('/'), endpoint);
        log::debug!("Requesting endpoint '{url}' with {query:?}.");
        let response = self
            .http
            .get(&url)
            .query(query)
            .query(&[("format", "json")])
            .send()
            .await?;

        match response.status() {
            reqwest::StatusCode::OK => Ok(serde_json::from_str(&response.text().await?)?),
            other => Err(GeocodeError::InvalidResponse {
                status_code: other,
                url,
                response: response.text().await.ok(),
            }),
        }
    }

    async fn search(&self, query: &str) -> Result<Coordinates, GeocodeError> {
        let results: Vec<SearchResult> = self
            .get("search", &[("q", query.to_owned()), ("limit", "1".to_owned())])
            .await?;
        let first = results
            .first()
            .ok_or_else(|| GeocodeError::NotFound(query.to_owned()))?;
        Ok(first.coordinates()?)
    }

    async fn reverse_once(
        &self,
        coordinates: Coordinates,
        language: &str,
    ) -> Result<Address, GeocodeError> {
        let response: ReverseResponse = self
            .get(
                "reverse",
                &[
                    ("lat", coordinates.latitude.to_string()),
                    ("lon", coordinates.longitude.to_string()),
                    ("accept-language", language.to_owned()),
                ],
            )
            .await?;
        response.into_address(coordinates.to_string())
    }
}

#[async_trait]
impl Geocoder for NominatimClient {
    async fn forward(&self, query: &str) -> Result<Coordinates, GeocodeError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(GeocodeError::EmptyQuery);
        }
        self.config
            .retry
            .run("forward geocode", || self.search(query))
            .await
    }

    async fn reverse(
        &self,
        coordinates: Coordinates,
        language: &str,
    ) -> Result<Address, GeocodeError> {
        self.config
            .retry
            .run("reverse geocode", || self.reverse_once(coordinates, language))
            .await
    }
}
