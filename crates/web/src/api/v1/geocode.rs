use axum::{
    extract::{OriginalUri, Query, State},
    http::Method,
    routing::{get, on},
    Json, Router,
};
use geocoding::{GeocodeError, DEFAULT_LANGUAGE};
use model::location::{Address, Coordinates};
use serde::Deserialize;

use crate::{
    common::{route_not_found, RouteErrorResponse, RouteResult, METHOD_FILTER_ALL},
    WebState,
};

pub(crate) fn routes(state: WebState) -> Router {
    Router::new()
        .route("/forward", get(forward))
        .route("/reverse", get(reverse))
        .with_state(state)
        .fallback_service(on(METHOD_FILTER_ALL, route_not_found))
}

#[derive(Deserialize)]
struct ForwardQuery {
    #[serde(default)]
    q: String,
}

async fn forward(
    OriginalUri(original_uri): OriginalUri,
    State(WebState { logbook }): State<WebState>,
    Query(params): Query<ForwardQuery>,
) -> RouteResult<Json<Coordinates>> {
    logbook
        .geocode(&params.q)
        .await
        .map(Json)
        .map_err(|why| route_error(why, original_uri.path()))
}

#[derive(Deserialize)]
struct ReverseQuery {
    latitude: f64,
    longitude: f64,
    language: Option<String>,
}

async fn reverse(
    OriginalUri(original_uri): OriginalUri,
    State(WebState { logbook }): State<WebState>,
    Query(params): Query<ReverseQuery>,
) -> RouteResult<Json<Address>> {
    let coordinates = Coordinates::new(params.latitude, params.longitude)?;
    let language = params.language.as_deref().unwrap_or(DEFAULT_LANGUAGE);
    logbook
        .reverse_geocode(coordinates, language)
        .await
        .map(Json)
        .map_err(|why| route_error(why, original_uri.path()))
}

fn route_error(why: GeocodeError, uri: &str) -> RouteErrorResponse {
    RouteErrorResponse::from(why)
        .with_method(&Method::GET)
        .with_uri(uri)
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;

    use crate::testing::{app, get};

    #[tokio::test]
    async fn forward_resolves_known_places() {
        let (app, _) = app(vec![]);
        let (status, body) = get(app, "/api/v1/geocode/forward?q=Bugis%2C%20Singapore").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["latitude"], 1.2996);
        assert_eq!(body["longitude"], 103.8555);
    }

    #[tokio::test]
    async fn forward_miss_is_404() {
        let (app, _) = app(vec![]);
        let (status, body) = get(app, "/api/v1/geocode/forward?q=Atlantis").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], "No place found for 'Atlantis'.");
    }

    #[tokio::test]
    async fn empty_forward_query_is_unprocessable() {
        let (app, _) = app(vec![]);
        let (status, _) = get(app, "/api/v1/geocode/forward?q=%20").await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn reverse_returns_address_parts() {
        let (app, _) = app(vec![]);
        let (status, body) = get(
            app,
            "/api/v1/geocode/reverse?latitude=1.2996&longitude=103.8555",
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["suburb"], "Bugis");
        assert_eq!(body["country"], "Singapore");
    }
}
