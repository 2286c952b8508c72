use axum::{
    response::IntoResponse,
    routing::{get, on},
    Json, Router,
};
use serde_json::json;

pub mod v1;

use crate::{
    common::{route_not_found, METHOD_FILTER_ALL},
    WebState,
};

macro_rules! resource {
    ($($arg:tt)*) => {
        format!("/api{}", format_args!($($arg)*))
    };
}
pub(crate) use resource;

pub fn routes(state: WebState) -> Router {
    Router::new()
        .route("/ping", get(ping))
        .nest_service("/v1", v1::routes(state))
        .fallback_service(on(METHOD_FILTER_ALL, route_not_found))
}

async fn ping() -> impl IntoResponse {
    Json(json!({
        "message": "pong!"
    }))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;

    use crate::testing::{app, get};

    #[tokio::test]
    async fn ping_pongs() {
        let (app, _) = app(vec![]);
        let (status, body) = get(app, "/api/ping").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "pong!");
    }

    #[tokio::test]
    async fn unknown_api_route_is_json_404() {
        let (app, _) = app(vec![]);
        let (status, body) = get(app, "/api/v2/anything").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["requestedUri"], "/api/v2/anything");
    }
}
