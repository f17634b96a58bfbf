//! Network access for requests the cache cannot answer.

use std::future::Future;
use std::time::Duration;

use reqwest::Client;

use crate::error::OfflineError;
use crate::request::{CachedResponse, FetchRequest};

/// Performs a request against the network.
///
/// A response with an error status is still `Ok`; only transport failures
/// are errors.
pub trait Fetcher: Send + Sync {
    fn fetch(
        &self,
        request: &FetchRequest,
    ) -> impl Future<Output = Result<CachedResponse, OfflineError>> + Send;
}

/// [`Fetcher`] backed by `reqwest`. Redirects are not followed so the page
/// sees the origin's redirect responses unchanged.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

/// Hop-by-hop headers that must not be forwarded.
const HOP_BY_HOP: &[&str] = &[
    "connection",
    "keep-alive",
    "proxy-connection",
    "transfer-encoding",
    "upgrade",
    "te",
    "trailer",
    "host",
    "content-length",
];

impl HttpFetcher {
    /// # Errors
    ///
    /// Returns [`OfflineError::Network`] if the `reqwest::Client` cannot be built.
    pub fn new(timeout_secs: u64, user_agent: &str) -> Result<Self, OfflineError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .map_err(|e| OfflineError::Network {
                url: String::new(),
                reason: e.to_string(),
            })?;
        Ok(Self { client })
    }
}

impl Fetcher for HttpFetcher {
    async fn fetch(&self, request: &FetchRequest) -> Result<CachedResponse, OfflineError> {
        let network_error = |e: reqwest::Error| OfflineError::Network {
            url: request.url.to_string(),
            reason: e.to_string(),
        };

        let mut headers = request.headers.clone();
        for name in HOP_BY_HOP {
            headers.remove(*name);
        }

        let response = self
            .client
            .request(request.method.clone(), request.url.clone())
            .headers(headers)
            .body(request.body.clone())
            .send()
            .await
            .map_err(network_error)?;

        let status = response.status();
        let mut headers = response.headers().clone();
        for name in HOP_BY_HOP {
            headers.remove(*name);
        }
        let body = response.bytes().await.map_err(network_error)?;

        Ok(CachedResponse {
            status,
            headers,
            body,
        })
    }
}
