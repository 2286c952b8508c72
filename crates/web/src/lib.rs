pub use crate::common::RouteResult;

use std::{env, net::SocketAddr};

use axum::{extract::FromRef, routing::get_service, Router};
use session::Logbook;
use tokio::net::TcpListener;
use tower_http::{
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};

pub mod api;
pub mod common;
pub mod hateoas;
pub mod middleware;

#[derive(Clone, FromRef)]
pub struct WebState {
    pub logbook: Logbook,
}

#[derive(Debug, Clone)]
pub struct WebConfig {
    pub bind_address: SocketAddr,
    /// Directory of the browser app, served for every path outside `/api`.
    pub static_dir: String,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            bind_address: SocketAddr::from(([0, 0, 0, 0], 8080)),
            static_dir: "./resources/www/".to_owned(),
        }
    }
}

impl WebConfig {
    /// Defaults, overridden by `WEB_BIND_ADDRESS` and `WEB_STATIC_DIR`.
    pub fn from_env() -> Option<Self> {
        let defaults = Self::default();
        let bind_address = match env::var("WEB_BIND_ADDRESS") {
            Ok(address) => address.parse().ok()?,
            Err(_) => defaults.bind_address,
        };
        Some(Self {
            bind_address,
            static_dir: env::var("WEB_STATIC_DIR").unwrap_or(defaults.static_dir),
        })
    }
}

pub fn router(state: WebState, static_dir: &str) -> Router {
    Router::new()
        .nest_service("/api", api::routes(state))
        .fallback_service(static_content_router(static_dir))
        .layer(TraceLayer::new_for_http())
}

pub async fn start_web_server(state: WebState, config: WebConfig) -> std::io::Result<()> {
    let routes = router(state, &config.static_dir);

    let listener = TcpListener::bind(config.bind_address).await?;
    log::info!("Listening on http://{}", config.bind_address);
    axum::serve(listener, routes.into_make_service()).await?;

    Ok(())
}

fn static_content_router(static_dir: &str) -> Router {
    let not_found = format!("{}/error404.html", static_dir.trim_end_matches('/'));
    Router::new().nest_service(
        "/",
        get_service(ServeDir::new(static_dir).not_found_service(ServeFile::new(not_found))),
    )
}

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::Arc;

    use async_trait::async_trait;
    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
        Router,
    };
    use geocoding::{GeocodeError, Geocoder};
    use media_store::MemoryMediaStore;
    use model::{
        location::{Address, Coordinates},
        record::LocationRecord,
    };
    use record_store::MemoryRecordStore;
    use serde_json::Value;
    use session::Logbook;
    use tower::ServiceExt;

    use crate::{router, WebState};

    /// Knows Bugis and nothing else.
    pub struct BugisGeocoder;

    #[async_trait]
    impl Geocoder for BugisGeocoder {
        async fn forward(&self, query: &str) -> Result<Coordinates, GeocodeError> {
            match query {
                "Bugis, Singapore" | "Singapore" => Ok(Coordinates::new(1.2996, 103.8555)?),
                other => Err(GeocodeError::NotFound(other.to_owned())),
            }
        }

        async fn reverse(
            &self,
            _coordinates: Coordinates,
            _language: &str,
        ) -> Result<Address, GeocodeError> {
            Ok(Address {
                display_name: "Bugis, Singapore".to_owned(),
                suburb: Some("Bugis".to_owned()),
                country: Some("Singapore".to_owned()),
                ..Address::default()
            })
        }
    }

    pub fn app(records: Vec<LocationRecord>) -> (Router, Arc<MemoryRecordStore>) {
        let store = Arc::new(MemoryRecordStore::with_records(records));
        let logbook = Logbook::new(
            store.clone(),
            Arc::new(MemoryMediaStore::new("travel-log")),
            Arc::new(BugisGeocoder),
        );
        (router(WebState { logbook }, "./resources/www/"), store)
    }

    pub async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, body)
    }

    pub async fn get(app: Router, uri: &str) -> (StatusCode, Value) {
        send(app, Request::get(uri).body(Body::empty()).unwrap()).await
    }
}
