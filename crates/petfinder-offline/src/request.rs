//! Request and response values passed between the page, the worker and
//! the network.

use bytes::Bytes;
use reqwest::header::HeaderMap;
use reqwest::{Method, StatusCode, Url};

/// What the request is for. Only full-page navigations get the offline
/// document fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Destination {
    Document,
    Other,
}

impl Destination {
    /// Infers the destination from `Sec-Fetch-Dest`, falling back to
    /// `Accept: text/html` for clients that do not send fetch metadata.
    #[must_use]
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let header = |name: &str| {
            headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::to_ascii_lowercase)
        };

        if let Some(dest) = header("sec-fetch-dest") {
            return if dest == "document" {
                Destination::Document
            } else {
                Destination::Other
            };
        }

        match header("accept") {
            Some(accept) if accept.contains("text/html") => Destination::Document,
            _ => Destination::Other,
        }
    }
}

/// An intercepted request.
#[derive(Debug, Clone)]
pub struct FetchRequest {
    pub method: Method,
    pub url: Url,
    pub destination: Destination,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl FetchRequest {
    #[must_use]
    pub fn new(method: Method, url: Url, destination: Destination) -> Self {
        Self {
            method,
            url,
            destination,
            headers: HeaderMap::new(),
            body: Bytes::new(),
        }
    }

    /// A GET for a subresource.
    #[must_use]
    pub fn get(url: Url) -> Self {
        Self::new(Method::GET, url, Destination::Other)
    }

    /// A GET for a full-page navigation.
    #[must_use]
    pub fn navigate(url: Url) -> Self {
        Self::new(Method::GET, url, Destination::Document)
    }

    #[must_use]
    pub fn with_headers(mut self, headers: HeaderMap) -> Self {
        self.headers = headers;
        self
    }

    #[must_use]
    pub fn with_body(mut self, body: Bytes) -> Self {
        self.body = body;
        self
    }

    /// Cache key: the absolute request URL without its fragment.
    #[must_use]
    pub fn cache_key(&self) -> String {
        cache_key(&self.url)
    }
}

/// Normalizes a URL into the key used inside a cache bucket.
#[must_use]
pub fn cache_key(url: &Url) -> String {
    let mut url = url.clone();
    url.set_fragment(None);
    url.to_string()
}

/// A fully buffered response. Cloning yields an independent copy, so the
/// copy written to the cache never shares a consumable body with the one
/// returned to the page.
#[derive(Debug, Clone, PartialEq)]
pub struct CachedResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl CachedResponse {
    #[must_use]
    pub fn new(status: StatusCode, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
            body: body.into(),
        }
    }

    #[must_use]
    pub fn ok(body: impl Into<Bytes>) -> Self {
        Self::new(StatusCode::OK, body)
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }
}
