//! Client of the hosted key-value store ("Base") that keeps the records.

use std::{env, time::Duration};

use async_trait::async_trait;
use model::record::{LocationRecord, RecordKey};
use reqwest::Url;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;
use utility::retry::RetryPolicy;

use crate::{RecordStore, Result, StoreError};

pub const BASE_API_URL: &str = "https://database.deta.sh/v1";

/// Page size of a full table walk.
const QUERY_LIMIT: usize = 1000;

#[derive(Debug, Clone)]
pub struct BaseCredentials {
    /// `<project id>_<secret>`, sent as `X-API-Key`.
    pub project_key: String,
    pub base_name: String,
    pub api_url: String,
    pub timeout: Duration,
    pub retry: RetryPolicy,
}

impl BaseCredentials {
    pub fn new(project_key: impl Into<String>, base_name: impl Into<String>) -> Self {
        Self {
            project_key: project_key.into(),
            base_name: base_name.into(),
            api_url: BASE_API_URL.to_owned(),
            timeout: Duration::from_secs(10),
            retry: RetryPolicy::default(),
        }
    }

    /// Reads `RECORD_STORE_KEY` and optionally `RECORD_STORE_BASE` and
    /// `RECORD_STORE_URL`.
    pub fn from_env() -> Option<Self> {
        let project_key = env::var("RECORD_STORE_KEY").ok()?;
        let base_name =
            env::var("RECORD_STORE_BASE").unwrap_or_else(|_| "location_db".to_owned());
        let mut credentials = Self::new(project_key, base_name);
        if let Ok(api_url) = env::var("RECORD_STORE_URL") {
            credentials.api_url = api_url;
        }
        Some(credentials)
    }

    pub fn project_id(&self) -> &str {
        self.project_key
            .split('_')
            .next()
            .unwrap_or(&self.project_key)
    }

    pub fn base_url(&self) -> String {
        format!(
            "{}/{}/{}",
            self.api_url.trim_end_matches('/'),
            self.project_id(),
            self.base_name
        )
    }
}

#[derive(Debug, Serialize)]
struct PutRequest<'a> {
    items: [&'a LocationRecord; 1],
}

#[derive(Debug, Default, Deserialize)]
struct PutResponse {
    #[serde(default)]
    failed: Option<ItemList>,
}

#[derive(Debug, Default, Deserialize)]
struct ItemList {
    #[serde(default)]
    items: Vec<Value>,
}

#[serde_with::skip_serializing_none]
#[derive(Debug, Serialize)]
struct QueryRequest<'a> {
    limit: usize,
    last: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct QueryResponse {
    #[serde(default)]
    pub paging: Paging,
    #[serde(default)]
    pub items: Vec<Value>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct Paging {
    pub last: Option<String>,
}

pub struct BaseClient {
    credentials: BaseCredentials,
    http: reqwest::Client,
}

impl BaseClient {
    pub fn new(credentials: BaseCredentials) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(credentials.timeout)
            .build()?;
        Ok(Self { credentials, http })
    }

    fn url(&self, segments: &[&str]) -> Result<Url> {
        let mut url = Url::parse(&self.credentials.base_url())
            .map_err(|why| StoreError::Other(format!("invalid store url: {why}")))?;
        url.path_segments_mut()
            .map_err(|_| StoreError::Other("store url cannot be a base".to_owned()))?
            .extend(segments);
        Ok(url)
    }

    async fn send<T: DeserializeOwned>(&self, request: reqwest::RequestBuilder) -> Result<T> {
        let response = request
            .header("X-API-Key", &self.credentials.project_key)
            .header("accept", "application/json")
            .send()
            .await?;
        let url = response.url().to_string();

        match response.status() {
            status if status.is_success() => Ok(serde_json::from_str(&response.text().await?)?),
            other => Err(StoreError::InvalidResponse {
                status_code: other,
                url,
                response: response.text().await.ok(),
            }),
        }
    }

    async fn put_once(&self, record: &LocationRecord) -> Result<()> {
        let url = self.url(&["items"])?;
        let response: PutResponse = self
            .send(self.http.put(url).json(&PutRequest { items: [record] }))
            .await?;
        match response.failed {
            Some(failed) if !failed.items.is_empty() => Err(StoreError::Other(format!(
                "store rejected record '{}'",
                record.key
            ))),
            _ => Ok(()),
        }
    }

    async fn get_once(&self, key: &RecordKey) -> Result<LocationRecord> {
        let url = self.url(&["items", key.as_str()])?;
        match self.send(self.http.get(url)).await {
            Err(StoreError::InvalidResponse { status_code, .. })
                if status_code == reqwest::StatusCode::NOT_FOUND =>
            {
                Err(StoreError::NotFound(key.clone()))
            }
            other => other,
        }
    }

    async fn query_page(&self, last: Option<&str>) -> Result<QueryResponse> {
        let url = self.url(&["query"])?;
        self.send(self.http.post(url).json(&QueryRequest {
            limit: QUERY_LIMIT,
            last,
        }))
        .await
    }
}

/// Entries which do not describe a valid record are skipped with a warning so
/// one broken entry cannot hide the whole log.
pub(crate) fn parse_items(items: Vec<Value>) -> Vec<LocationRecord> {
    items
        .into_iter()
        .filter_map(|item| {
            let key = item.get("key").cloned();
            serde_json::from_value(item)
                .map_err(|why| log::warn!("skipping stored entry {key:?}: {why}"))
                .ok()
        })
        .collect()
}

#[async_trait]
impl RecordStore for BaseClient {
    async fn put(&self, record: &LocationRecord) -> Result<()> {
        self.credentials
            .retry
            .run("put record", || self.put_once(record))
            .await
    }

    async fn get(&self, key: &RecordKey) -> Result<LocationRecord> {
        self.credentials
            .retry
            .run("get record", || self.get_once(key))
            .await
    }

    async fn fetch_all(&self) -> Result<Vec<LocationRecord>> {
        let mut records = vec![];
        let mut last: Option<String> = None;
        loop {
            let page = self
                .credentials
                .retry
                .run("query records", || self.query_page(last.as_deref()))
                .await?;
            records.extend(parse_items(page.items));
            match page.paging.last {
                Some(next) if last.as_deref() == Some(next.as_str()) => {
                    return Err(StoreError::Other(format!(
                        "store repeated page cursor '{next}'"
                    )));
                }
                Some(next) => last = Some(next),
                None => break,
            }
        }
        log::info!("fetched {} records", records.len());
        Ok(records)
    }
}
