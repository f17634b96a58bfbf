//! HTTP client for the breed-list and image-search endpoints.

use std::time::Duration;

use reqwest::Client;
use serde::de::DeserializeOwned;

use petfinder_core::{AppConfig, Species};

use crate::error::BreedsError;
use crate::rate_limit::retry_with_backoff;
use crate::types::{Breed, BreedImage};

/// One species' API: where its breeds live and where its images are served.
#[derive(Debug, Clone)]
pub struct BreedApi {
    pub species: Species,
    /// API root, e.g. `https://api.thedogapi.com/v1`.
    pub base_url: String,
}

impl BreedApi {
    #[must_use]
    pub fn new(species: Species, base_url: impl Into<String>) -> Self {
        Self {
            species,
            base_url: base_url.into(),
        }
    }

    /// Host of the API, used to keep its responses out of the offline cache.
    #[must_use]
    pub fn host(&self) -> Option<String> {
        reqwest::Url::parse(&self.base_url)
            .ok()
            .and_then(|u| u.host_str().map(str::to_owned))
    }

    fn endpoint(&self, path: &str) -> Result<reqwest::Url, BreedsError> {
        let base = format!("{}/{path}", self.base_url.trim_end_matches('/'));
        reqwest::Url::parse(&base).map_err(|e| BreedsError::InvalidBaseUrl {
            base_url: self.base_url.clone(),
            reason: e.to_string(),
        })
    }
}

/// The dog and cat APIs queried side by side.
#[derive(Debug, Clone)]
pub struct BreedSources {
    pub dogs: BreedApi,
    pub cats: BreedApi,
}

impl BreedSources {
    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            dogs: BreedApi::new(Species::Dog, config.dog_api_base.clone()),
            cats: BreedApi::new(Species::Cat, config.cat_api_base.clone()),
        }
    }

    /// Hosts of both APIs; responses from these are never written to the
    /// offline cache.
    #[must_use]
    pub fn hosts(&self) -> Vec<String> {
        [self.dogs.host(), self.cats.host()]
            .into_iter()
            .flatten()
            .collect()
    }
}

/// Client shared by both species.
///
/// Non-2xx statuses become typed errors. Transient errors are retried only
/// when `max_retries > 0`.
pub struct BreedClient {
    client: Client,
    api_key: Option<String>,
    max_retries: u32,
    backoff_base_secs: u64,
}

impl BreedClient {
    /// # Errors
    ///
    /// Returns [`BreedsError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(
        timeout_secs: u64,
        user_agent: &str,
        max_retries: u32,
        backoff_base_secs: u64,
        api_key: Option<String>,
    ) -> Result<Self, BreedsError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;
        Ok(Self {
            client,
            api_key,
            max_retries,
            backoff_base_secs,
        })
    }

    /// # Errors
    ///
    /// See [`Self::new`].
    pub fn from_config(config: &AppConfig) -> Result<Self, BreedsError> {
        Self::new(
            config.http_timeout_secs,
            &config.user_agent,
            config.http_max_retries,
            config.http_retry_backoff_secs,
            config.api_key.clone(),
        )
    }

    /// Fetches the full breed list of one species (`GET {base}/breeds`).
    ///
    /// # Errors
    ///
    /// - [`BreedsError::RateLimited`]: HTTP 429.
    /// - [`BreedsError::NotFound`]: HTTP 404.
    /// - [`BreedsError::UnexpectedStatus`]: any other non-2xx status.
    /// - [`BreedsError::Http`]: network or TLS failure.
    /// - [`BreedsError::Deserialize`]: body is not a breed array.
    pub async fn fetch_breeds(&self, api: &BreedApi) -> Result<Vec<Breed>, BreedsError> {
        let url = api.endpoint("breeds")?;
        self.get_json(url, &format!("{} breeds", api.species)).await
    }

    /// Fetches sample images with breed metadata
    /// (`GET {base}/images/search?limit=N&has_breeds=1`).
    ///
    /// # Errors
    ///
    /// Same as [`Self::fetch_breeds`].
    pub async fn search_images(
        &self,
        api: &BreedApi,
        limit: u32,
    ) -> Result<Vec<BreedImage>, BreedsError> {
        let url = Self::image_search_url(api, limit)?;
        self.get_json(url, &format!("{} image search", api.species))
            .await
    }

    fn image_search_url(api: &BreedApi, limit: u32) -> Result<reqwest::Url, BreedsError> {
        let mut url = api.endpoint("images/search")?;
        url.query_pairs_mut()
            .append_pair("limit", &limit.to_string())
            .append_pair("has_breeds", "1");
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: reqwest::Url,
        context: &str,
    ) -> Result<T, BreedsError> {
        retry_with_backoff(self.max_retries, self.backoff_base_secs, || {
            let url = url.clone();
            async move {
                let mut request = self
                    .client
                    .get(url.clone())
                    .header(reqwest::header::ACCEPT, "application/json");
                if let Some(key) = &self.api_key {
                    request = request.header("x-api-key", key);
                }

                let response = request.send().await?;
                let status = response.status();

                if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                    let retry_after_secs = response
                        .headers()
                        .get(reqwest::header::RETRY_AFTER)
                        .and_then(|v| v.to_str().ok())
                        .and_then(|s| s.parse::<u64>().ok())
                        .unwrap_or(60);
                    return Err(BreedsError::RateLimited {
                        domain: url.host_str().unwrap_or_default().to_owned(),
                        retry_after_secs,
                    });
                }

                if status == reqwest::StatusCode::NOT_FOUND {
                    return Err(BreedsError::NotFound {
                        url: url.to_string(),
                    });
                }

                if !status.is_success() {
                    return Err(BreedsError::UnexpectedStatus {
                        status: status.as_u16(),
                        url: url.to_string(),
                    });
                }

                let body = response.text().await?;
                serde_json::from_str::<T>(&body).map_err(|e| BreedsError::Deserialize {
                    context: context.to_owned(),
                    source: e,
                })
            }
        })
        .await
    }
}

#[cfg(test)]
#[path = "../client_test.rs"]
mod tests;
