use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;
use session::{
    map::MarkerId, render::EntryIntent, Interaction, RenderCycle, SearchCriteria, View,
};

use crate::{common::RouteErrorResponse, RouteResult, WebState};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum Tab {
    #[default]
    Map,
    Entry,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum Mode {
    #[default]
    Create,
    Edit,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RenderQuery {
    locality: Option<String>,
    country: Option<String>,
    #[serde(default)]
    tab: Tab,
    marker: Option<String>,
    #[serde(default)]
    mode: Mode,
}

impl RenderQuery {
    /// Missing search fields fall back to the default search, empty ones are
    /// kept so that an empty locality searches the country only.
    fn search(&self) -> SearchCriteria {
        let defaults = SearchCriteria::default();
        SearchCriteria::new(
            self.locality.clone().unwrap_or(defaults.locality),
            self.country.clone().unwrap_or(defaults.country),
        )
    }

    fn view(&self) -> RouteResult<View> {
        let marker = self.marker.as_deref().map(MarkerId::new);
        match (self.tab, self.mode, marker) {
            (Tab::Map, _, selected) => Ok(View::Browse { selected }),
            (Tab::Entry, Mode::Create, _) => Ok(View::Entry(EntryIntent::Create)),
            (Tab::Entry, Mode::Edit, Some(marker)) => Ok(View::Entry(EntryIntent::Edit(marker))),
            (Tab::Entry, Mode::Edit, None) => Err(RouteErrorResponse::bad_request(
                "Select a marker on the map to edit its location.",
            )),
        }
    }
}

pub(crate) async fn render(
    State(WebState { logbook }): State<WebState>,
    Query(params): Query<RenderQuery>,
) -> RouteResult<Json<RenderCycle>> {
    let interaction = Interaction::new(params.search(), params.view()?);
    let cycle = logbook.render(&interaction).await?;
    Ok(Json(cycle))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use model::{record::LocationRecord, ExampleData};

    use crate::testing::{app, get};

    #[tokio::test]
    async fn default_render_shows_every_marker_centered_on_bugis() {
        let (app, _) = app(vec![LocationRecord::example_data()]);
        let (status, body) = get(app, "/api/v1/render").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["map"]["tiles"], "CartoDB dark_matter");
        assert_eq!(body["map"]["focus"]["zoom"], 15);
        assert_eq!(body["map"]["markers"][0]["id"], "2023-05-01_Bugis");
        assert_eq!(body["panel"]["kind"], "empty");
        assert!(body["notices"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn edit_tab_returns_the_stored_values() {
        let (app, _) = app(vec![LocationRecord::example_data()]);
        let (status, body) = get(
            app,
            "/api/v1/render?tab=entry&mode=edit&marker=2023-05-01_Bugis",
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["panel"]["kind"], "form");
        assert_eq!(body["panel"]["locality"], "Bugis");
        assert_eq!(body["panel"]["mode"]["edit"]["key"], "2023-05-01_Bugis");
    }

    #[tokio::test]
    async fn edit_without_marker_is_a_bad_request() {
        let (app, _) = app(vec![]);
        let (status, _) = get(app, "/api/v1/render?tab=entry&mode=edit").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn unknown_place_is_a_notice_not_an_error() {
        let (app, _) = app(vec![]);
        let (status, body) = get(app, "/api/v1/render?locality=Atlantis").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["map"]["focus"].is_null());
        assert_eq!(body["notices"][0]["kind"], "placeNotFound");
    }
}
