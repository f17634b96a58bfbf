//! Which fresh network responses may be written back into the cache.

use reqwest::Url;

use crate::request::{CachedResponse, FetchRequest};

#[derive(Debug, Clone)]
pub struct FetchPolicy {
    origin: Url,
    excluded_hosts: Vec<String>,
    live_paths: Vec<String>,
}

impl FetchPolicy {
    /// `origin` is the page's own origin; `excluded_hosts` are the
    /// third-party breed API hosts whose responses are always live.
    #[must_use]
    pub fn new(origin: Url, excluded_hosts: Vec<String>) -> Self {
        let excluded_hosts = excluded_hosts
            .into_iter()
            .map(|h| h.to_ascii_lowercase())
            .collect();
        Self {
            origin,
            excluded_hosts,
            live_paths: Vec::new(),
        }
    }

    /// Same-origin path prefixes, relative to the origin, whose responses
    /// relay live breed data. They are neither read from nor written to
    /// the cache.
    #[must_use]
    pub fn with_live_paths<I, P>(mut self, prefixes: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: AsRef<str>,
    {
        for prefix in prefixes {
            let prefix = prefix.as_ref();
            match self.origin.join(prefix) {
                Ok(url) => self.live_paths.push(url.path().to_owned()),
                Err(e) => tracing::warn!(prefix, error = %e, "ignoring invalid live path"),
            }
        }
        self
    }

    #[must_use]
    pub fn origin(&self) -> &Url {
        &self.origin
    }

    #[must_use]
    pub fn is_same_origin(&self, url: &Url) -> bool {
        url.origin() == self.origin.origin()
    }

    #[must_use]
    pub fn is_excluded_host(&self, url: &Url) -> bool {
        url.host_str().is_some_and(|host| {
            let host = host.to_ascii_lowercase();
            self.excluded_hosts.iter().any(|excluded| *excluded == host)
        })
    }

    #[must_use]
    pub fn is_live(&self, url: &Url) -> bool {
        self.is_same_origin(url)
            && self
                .live_paths
                .iter()
                .any(|prefix| url.path().starts_with(prefix.as_str()))
    }

    /// A fresh response is stored only for a successful same-origin GET
    /// that targets neither an excluded API host nor a live path.
    #[must_use]
    pub fn should_store(&self, request: &FetchRequest, response: &CachedResponse) -> bool {
        request.method == reqwest::Method::GET
            && response.is_success()
            && self.is_same_origin(&request.url)
            && !self.is_excluded_host(&request.url)
            && !self.is_live(&request.url)
    }
}
