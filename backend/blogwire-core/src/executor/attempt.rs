use common::HttpStatusCode;

use reqwest::Method;
use reqwest::header::{ETAG, HeaderMap, LOCATION};
use serde::de::DeserializeOwned;
use url::Url;

/// One outgoing request, built fresh for every redirect hop.
#[derive(Debug, Clone)]
pub struct RequestAttempt {
    pub method: Method,
    pub uri: Url,
    pub headers: HeaderMap,
    pub body: Option<Vec<u8>>,
}

impl RequestAttempt {
    pub fn new(method: Method, uri: Url) -> Self {
        Self {
            method,
            uri,
            headers: HeaderMap::new(),
            body: None,
        }
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

/// A fully received response.
///
/// Redirect responses handed back by [`crate::executor::ReqwestTransport`]
/// carry an empty body; their connection is released before the next hop.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    status: HttpStatusCode,
    headers: HeaderMap,
    body: Vec<u8>,
    url: Url,
}

impl HttpResponse {
    pub fn new(status: u16, headers: HeaderMap, body: Vec<u8>, url: Url) -> Self {
        Self {
            status: HttpStatusCode(status),
            headers,
            body,
            url,
        }
    }

    pub fn status(&self) -> HttpStatusCode {
        self.status
    }

    /// URL this response was received from (the last hop of the chain).
    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// `Location` header, `None` when missing or blank.
    pub fn location(&self) -> Option<&str> {
        self.header(LOCATION.as_str())
            .map(str::trim)
            .filter(|location| !location.is_empty())
    }

    /// Strong `ETag` only. Weak validators (`W/...`) are useless for `If-Match`.
    pub fn etag(&self) -> Option<String> {
        self.header(ETAG.as_str())
            .filter(|etag| !etag.is_empty())
            .filter(|etag| !etag.get(..2).is_some_and(|p| p.eq_ignore_ascii_case("w/")))
            .map(str::to_string)
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    pub fn json<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_slice(&self.body)
    }
}
