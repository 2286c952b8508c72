use std::sync::Arc;

use axum::Json;
use schemars::JsonSchema;
use serde::Serialize;

use crate::middleware::base_url::BaseUrl;

#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct Link {
    #[serde(rename = "rel")]
    pub relation: String,

    #[serde(rename = "href")]
    pub hypertext_reference: String,
}

/// Content plus links to related resources, so the browser app never has to
/// assemble URLs itself.
#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct Response<T> {
    #[serde(flatten)]
    pub content: T,
    pub links: Vec<Link>,
}

impl<T> Response<T> {
    pub fn builder(content: T, base_url: Arc<BaseUrl>) -> ResponseBuilder<T> {
        ResponseBuilder {
            response: Response {
                content,
                links: vec![],
            },
            base_url,
        }
    }

    pub fn json(self) -> Json<Self> {
        Json(self)
    }
}

pub struct ResponseBuilder<T> {
    response: Response<T>,
    base_url: Arc<BaseUrl>,
}

impl<T> ResponseBuilder<T> {
    /// Link to a resource of this server whose path ends in `segments` and
    /// carries `query`, for values like record keys that need escaping.
    pub fn link_encoded(
        self,
        relation: impl Into<String>,
        path: impl AsRef<str>,
        segments: &[&str],
        query: &[(&str, &str)],
    ) -> Self {
        let url = self.base_url.encoded_url(path.as_ref(), segments, query);
        self.link_extern(relation, url)
    }

    /// Link to an absolute URL, e.g. a photo in the bucket.
    pub fn link_extern(
        mut self,
        relation: impl Into<String>,
        hypertext_reference: impl Into<String>,
    ) -> Self {
        self.response.links.push(Link {
            relation: relation.into(),
            hypertext_reference: hypertext_reference.into(),
        });
        self
    }

    pub fn build(self) -> Response<T> {
        self.response
    }
}
