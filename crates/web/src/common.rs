use axum::{
    extract::{multipart::MultipartError, OriginalUri, Query, Request},
    http::{Method, StatusCode},
    response::IntoResponse,
    routing::MethodFilter,
    Json,
};
use geocoding::GeocodeError;
use media_store::MediaError;
use model::{location::InvalidCoordinates, ExampleData};
use record_store::StoreError;
use schemars::{schema_for, schema_for_value, JsonSchema};
use serde::{Deserialize, Serialize};
use session::{form::FieldError, SubmitError};

pub type RouteResult<O> = Result<O, RouteErrorResponse>;

/// A `MethodFilter` that matches all http methods.
pub(crate) const METHOD_FILTER_ALL: MethodFilter = MethodFilter::GET
    .or(MethodFilter::POST)
    .or(MethodFilter::PATCH)
    .or(MethodFilter::PUT)
    .or(MethodFilter::DELETE);

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VecResponse<T> {
    pub data: Vec<T>,
    pub total_items: usize,
}

impl<T> VecResponse<T> {
    pub fn new(data: Vec<T>) -> Self {
        Self {
            total_items: data.len(),
            data,
        }
    }

    pub fn json(self) -> Json<Self> {
        Json(self)
    }
}

// - Services returning commonly used responses -

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SchemaParams {
    #[serde(default = "Default::default")]
    example_data: bool,
}

pub(crate) async fn schema<T: ExampleData + JsonSchema + Serialize>(
    Query(params): Query<SchemaParams>,
) -> impl IntoResponse {
    if params.example_data {
        Json(schema_for_value!(T::example_data()))
    } else {
        Json(schema_for!(T))
    }
}

pub(crate) async fn route_not_found(
    OriginalUri(original_uri): OriginalUri,
    req: Request,
) -> impl IntoResponse {
    RouteErrorResponse::not_found(req.method(), original_uri.path())
}

// - Commonly used responses -

#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteErrorResponse {
    #[serde(skip)]
    pub status_code: StatusCode,
    pub http_method: Option<String>,
    pub requested_uri: Option<String>,
    pub message: Option<String>,
    pub detailed_information: Option<String>,
    /// Every invalid form field, for display next to the field.
    pub field_errors: Option<Vec<FieldError>>,
}

impl RouteErrorResponse {
    pub fn new(status_code: StatusCode) -> Self {
        Self {
            status_code,
            http_method: None,
            requested_uri: None,
            message: None,
            detailed_information: None,
            field_errors: None,
        }
    }

    pub fn not_found(method: &Method, uri: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND)
            .with_method(method)
            .with_uri(uri)
            .with_default_message()
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST).with_message(message)
    }

    pub fn with_method(mut self, method: &Method) -> Self {
        self.http_method = Some(method.to_string());
        self
    }

    pub fn with_uri(mut self, uri: impl Into<String>) -> Self {
        self.requested_uri = Some(uri.into());
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn with_default_message(self) -> Self {
        let message = self
            .status_code
            .canonical_reason()
            .unwrap_or("Something went wrong.");
        self.with_message(message)
    }

    pub fn with_detailed_information(mut self, message: impl Into<String>) -> Self {
        self.detailed_information = Some(message.into());
        self
    }

    fn upstream(what: &str, why: impl ToString) -> Self {
        log::error!("{what} failed: {}", why.to_string());
        Self::new(StatusCode::BAD_GATEWAY)
            .with_message(format!("{what} is unavailable right now."))
            .with_detailed_information(why.to_string())
    }
}

impl From<StoreError> for RouteErrorResponse {
    fn from(value: StoreError) -> Self {
        match value {
            StoreError::NotFound(key) => Self::new(StatusCode::NOT_FOUND)
                .with_message(format!("The location '{key}' does not exist.")),
            other => Self::upstream("The record store", other),
        }
    }
}

impl From<GeocodeError> for RouteErrorResponse {
    fn from(value: GeocodeError) -> Self {
        match value {
            GeocodeError::NotFound(query) => Self::new(StatusCode::NOT_FOUND)
                .with_message(format!("No place found for '{query}'.")),
            GeocodeError::EmptyQuery => Self::new(StatusCode::UNPROCESSABLE_ENTITY)
                .with_message("Enter a place to search for."),
            other => Self::upstream("The place search", other),
        }
    }
}

impl From<InvalidCoordinates> for RouteErrorResponse {
    fn from(value: InvalidCoordinates) -> Self {
        Self::new(StatusCode::UNPROCESSABLE_ENTITY).with_message(value.to_string())
    }
}

impl From<MultipartError> for RouteErrorResponse {
    fn from(value: MultipartError) -> Self {
        Self::new(value.status()).with_message(value.body_text())
    }
}

impl From<SubmitError> for RouteErrorResponse {
    fn from(value: SubmitError) -> Self {
        match value {
            SubmitError::Validation(errors) => {
                let mut response = Self::new(StatusCode::UNPROCESSABLE_ENTITY)
                    .with_message("The entry is not valid.");
                response.field_errors = Some(errors.0);
                response
            }
            SubmitError::UnknownRecord(key) => Self::new(StatusCode::NOT_FOUND)
                .with_message(format!("The location '{key}' does not exist anymore.")),
            SubmitError::Media {
                source: source @ (MediaError::InvalidName(_) | MediaError::UnsupportedType { .. }),
                ..
            } => Self::new(StatusCode::UNPROCESSABLE_ENTITY).with_message(source.to_string()),
            SubmitError::Media {
                photo,
                source,
                uploaded,
            } => Self::upstream("The photo storage", source).with_message(format!(
                "Could not upload '{photo}', already uploaded: [{}].",
                uploaded.join(", ")
            )),
            SubmitError::Store { source, uploaded } => Self::upstream("The record store", source)
                .with_message(format!(
                    "The location was not saved, already uploaded photos: [{}].",
                    uploaded.join(", ")
                )),
        }
    }
}

impl IntoResponse for RouteErrorResponse {
    fn into_response(self) -> axum::response::Response {
        (self.status_code, Json(self)).into_response()
    }
}
