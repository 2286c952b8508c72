use std::sync::Arc;

use axum::{
    extract::{DefaultBodyLimit, Multipart, OriginalUri, Path, Query, State},
    http::{Method, StatusCode},
    routing::{get, on},
    Extension, Json, Router,
};
use media_store::PhotoUpload;
use model::{location::Coordinates, record::LocationRecord, WithDistance};
use serde::Deserialize;
use session::EntryForm;

use crate::{
    common::{
        route_not_found, schema, RouteErrorResponse, RouteResult, VecResponse,
        METHOD_FILTER_ALL,
    },
    hateoas,
    middleware::base_url::BaseUrl,
    WebState,
};

macro_rules! resource {
    ($($arg:tt)*) => {
        crate::api::v1::resource!("/records{}", format_args!($($arg)*))
    };
}

/// Photos straight from a phone camera are a few megabytes each.
const MAX_SUBMIT_BYTES: usize = 32 * 1024 * 1024;

const DEFAULT_NEARBY_RADIUS_KM: f64 = 1.0;

pub(crate) fn routes(state: WebState) -> Router {
    Router::new()
        .route("/", get(get_records).post(submit_record))
        .route("/schema", get(schema::<LocationRecord>))
        .route("/nearby", get(nearby))
        .route("/:key", get(get_record))
        .layer(DefaultBodyLimit::max(MAX_SUBMIT_BYTES))
        .with_state(state)
        .fallback_service(on(METHOD_FILTER_ALL, route_not_found))
}

async fn get_records(
    OriginalUri(original_uri): OriginalUri,
    State(WebState { logbook }): State<WebState>,
    Extension(base_url): Extension<Arc<BaseUrl>>,
) -> RouteResult<Json<VecResponse<hateoas::Response<LocationRecord>>>> {
    let table = logbook.table().await.map_err(|why| {
        RouteErrorResponse::from(why)
            .with_method(&Method::GET)
            .with_uri(original_uri.path())
    })?;
    let data = table
        .into_records()
        .into_iter()
        .map(|record| record_hateoas(record, base_url.clone()))
        .collect();
    Ok(VecResponse::new(data).json())
}

async fn get_record(
    OriginalUri(original_uri): OriginalUri,
    Path(key): Path<String>,
    State(WebState { logbook }): State<WebState>,
    Extension(base_url): Extension<Arc<BaseUrl>>,
) -> RouteResult<Json<hateoas::Response<LocationRecord>>> {
    logbook
        .record(&key.into())
        .await
        .map(|record| record_hateoas(record, base_url).json())
        .map_err(|why| {
            RouteErrorResponse::from(why)
                .with_method(&Method::GET)
                .with_uri(original_uri.path())
        })
}

#[derive(Deserialize)]
struct NearbyQuery {
    latitude: f64,
    longitude: f64,
    /// Kilometers.
    radius: Option<f64>,
}

async fn nearby(
    OriginalUri(original_uri): OriginalUri,
    State(WebState { logbook }): State<WebState>,
    Query(params): Query<NearbyQuery>,
) -> RouteResult<Json<VecResponse<WithDistance<LocationRecord>>>> {
    let center = Coordinates::new(params.latitude, params.longitude)?;
    let radius = params
        .radius
        .filter(|radius| radius.is_finite() && *radius > 0.0)
        .unwrap_or(DEFAULT_NEARBY_RADIUS_KM);
    let table = logbook.table().await.map_err(|why| {
        RouteErrorResponse::from(why)
            .with_method(&Method::GET)
            .with_uri(original_uri.path())
    })?;
    Ok(VecResponse::new(table.nearby(center, radius)).json())
}

/// Expects a `form` part holding the entry form as JSON and any number of
/// `photos` file parts.
async fn submit_record(
    State(WebState { logbook }): State<WebState>,
    Extension(base_url): Extension<Arc<BaseUrl>>,
    mut multipart: Multipart,
) -> RouteResult<(StatusCode, Json<hateoas::Response<LocationRecord>>)> {
    let mut form: Option<EntryForm> = None;
    let mut photos = vec![];

    while let Some(field) = multipart.next_field().await? {
        let part = field.name().map(str::to_owned);
        match part.as_deref() {
            Some("form") => {
                let text = field.text().await?;
                form = Some(serde_json::from_str(&text).map_err(|why| {
                    RouteErrorResponse::new(StatusCode::UNPROCESSABLE_ENTITY)
                        .with_message("The entry form could not be read.")
                        .with_detailed_information(why.to_string())
                })?);
            }
            Some("photos") => {
                let name = field.file_name().unwrap_or_default().to_owned();
                let mime_type = field
                    .content_type()
                    .map(str::to_owned)
                    .unwrap_or_else(|| guess_mime_type(&name).to_owned());
                let bytes = field.bytes().await?;
                photos.push(PhotoUpload::new(name, mime_type, bytes.to_vec()));
            }
            other => log::debug!("ignoring multipart field {other:?}"),
        }
    }

    let form =
        form.ok_or_else(|| RouteErrorResponse::bad_request("Missing the 'form' part."))?;
    let record = logbook.submit(&form, &photos).await?;
    Ok((StatusCode::CREATED, record_hateoas(record, base_url).json()))
}

fn guess_mime_type(name: &str) -> &'static str {
    let extension = name
        .rsplit_once('.')
        .map(|(_, extension)| extension.to_ascii_lowercase());
    match extension.as_deref() {
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        _ => "application/octet-stream",
    }
}

pub(crate) fn record_hateoas(
    record: LocationRecord,
    base_url: Arc<BaseUrl>,
) -> hateoas::Response<LocationRecord> {
    let key = record.key.to_string();
    let key = key.as_str();
    let photos = record
        .image
        .iter()
        .map(|(_, url)| url.to_owned())
        .collect::<Vec<_>>();
    photos
        .into_iter()
        .fold(
            hateoas::Response::builder(record, base_url)
                .link_encoded("self", resource!(""), &[key], &[])
                .link_encoded(
                    "marker",
                    crate::api::v1::resource!("/render"),
                    &[],
                    &[("marker", key)],
                )
                .link_encoded(
                    "edit",
                    crate::api::v1::resource!("/render"),
                    &[],
                    &[("tab", "entry"), ("mode", "edit"), ("marker", key)],
                ),
            |builder, url| builder.link_extern("photo", url),
        )
        .build()
}
