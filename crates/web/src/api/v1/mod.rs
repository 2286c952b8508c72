use axum::{
    routing::{get, on},
    Json, Router,
};
use model::category::Category;
use serde::Serialize;

use crate::{
    common::{route_not_found, VecResponse, METHOD_FILTER_ALL},
    middleware::base_url::base_url_middleware,
    WebState,
};

mod geocode;
mod records;
mod render;

macro_rules! resource {
    ($($arg:tt)*) => {
        crate::api::resource!("/v1{}", format_args!($($arg)*))
    };
}
pub(crate) use resource;

pub(crate) fn routes(state: WebState) -> Router {
    Router::new()
        .route("/categories", get(categories))
        .route("/render", get(render::render))
        .nest_service("/records", records::routes(state.clone()))
        .nest_service("/geocode", geocode::routes(state.clone()))
        .layer(axum::middleware::from_fn(base_url_middleware))
        .with_state(state)
        .fallback_service(on(METHOD_FILTER_ALL, route_not_found))
}

#[derive(Serialize)]
struct CategoryDto {
    name: &'static str,
    icon: &'static str,
    color: &'static str,
}

async fn categories() -> Json<VecResponse<CategoryDto>> {
    VecResponse::new(
        Category::ALL
            .iter()
            .map(|category| CategoryDto {
                name: category.name(),
                icon: category.icon(),
                color: category.color(),
            })
            .collect(),
    )
    .json()
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;

    use crate::testing::{app, get};

    #[tokio::test]
    async fn categories_come_in_menu_order() {
        let (app, _) = app(vec![]);
        let (status, body) = get(app, "/api/v1/categories").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["totalItems"], 6);
        assert_eq!(body["data"][0]["name"], "Food");
        assert_eq!(body["data"][0]["icon"], "cutlery");
        assert_eq!(body["data"][5]["name"], "View Point");
    }
}
