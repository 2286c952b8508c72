use std::sync::Arc;

use axum::{extract::Request, http::HeaderMap, middleware::Next, response::Response};
use reqwest::Url;

/// Scheme, host and path prefix under which clients reach the server, which
/// differ from the bind address behind a reverse proxy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BaseUrl {
    proto: String,
    host: String,
    prefix: String,
}

fn header<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|value| value.to_str().ok())
}

impl BaseUrl {
    pub fn from_headers(headers: &HeaderMap) -> Self {
        Self {
            proto: header(headers, "x-forwarded-proto")
                .unwrap_or("http")
                .to_owned(),
            host: header(headers, "x-forwarded-host")
                .or_else(|| header(headers, "host"))
                .unwrap_or("localhost")
                .to_owned(),
            prefix: header(headers, "x-forwarded-prefix")
                .unwrap_or("")
                .trim_end_matches('/')
                .to_owned(),
        }
    }

    pub fn full_url(&self, path: &str) -> String {
        format!("{}://{}{}{}", self.proto, self.host, self.prefix, path)
    }

    /// Like `full_url`, with `segments` appended to the path and `query`
    /// added, both percent-encoded.
    pub fn encoded_url(&self, path: &str, segments: &[&str], query: &[(&str, &str)]) -> String {
        let full_url = self.full_url(path);
        let mut url = match Url::parse(&full_url) {
            Ok(url) => url,
            Err(why) => {
                log::warn!("cannot build a link below '{full_url}': {why}");
                return full_url;
            }
        };
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }
        url.into()
    }
}

pub async fn base_url_middleware(mut req: Request, next: Next) -> Response {
    let base_url = BaseUrl::from_headers(req.headers());
    req.extensions_mut().insert(Arc::new(base_url));
    next.run(req).await
}
