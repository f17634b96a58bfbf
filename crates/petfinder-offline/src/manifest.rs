//! The precache manifest: bucket name plus the static assets it holds.
//!
//! Changing [`DEFAULT_ASSETS`] or the worker's upgrade behavior requires a
//! new cache name; activation then deletes the previous generation.

use reqwest::Url;

use crate::error::OfflineError;
use crate::request::cache_key;

/// Static assets fetched at install, relative to the page origin.
pub const DEFAULT_ASSETS: &[&str] = &[
    "./",
    "./index.html",
    "./style.css",
    "./app.js",
    "./manifest.json",
    "./images/icon-72x72.jpg",
    "./images/icon-96x96.jpg",
    "./images/icon-144x144.jpg",
    "./images/rick-golden.jpg",
    "./images/lana-frajola.jpg",
    "./images/bob-bulldog.jpg",
    "./images/lulu.jpg",
];

/// Path of the document served to navigations when the network is down.
pub const ROOT_DOCUMENT: &str = "./";

#[derive(Debug, Clone)]
pub struct Precache {
    pub cache_name: String,
    pub assets: Vec<String>,
}

impl Precache {
    #[must_use]
    pub fn new(cache_name: impl Into<String>) -> Self {
        Self {
            cache_name: cache_name.into(),
            assets: DEFAULT_ASSETS.iter().map(|a| (*a).to_owned()).collect(),
        }
    }

    #[must_use]
    pub fn with_assets<I, A>(mut self, assets: I) -> Self
    where
        I: IntoIterator<Item = A>,
        A: Into<String>,
    {
        self.assets = assets.into_iter().map(Into::into).collect();
        self
    }

    /// Absolute asset URLs resolved against `scope`.
    ///
    /// # Errors
    ///
    /// Returns [`OfflineError::InvalidUrl`] for an asset path that cannot be
    /// joined onto `scope`.
    pub fn asset_urls(&self, scope: &Url) -> Result<Vec<Url>, OfflineError> {
        self.assets
            .iter()
            .map(|asset| resolve(scope, asset))
            .collect()
    }

    /// Cache key of the offline fallback document.
    ///
    /// # Errors
    ///
    /// See [`Self::asset_urls`].
    pub fn root_key(scope: &Url) -> Result<String, OfflineError> {
        resolve(scope, ROOT_DOCUMENT).map(|url| cache_key(&url))
    }
}

fn resolve(scope: &Url, asset: &str) -> Result<Url, OfflineError> {
    scope.join(asset).map_err(|e| OfflineError::InvalidUrl {
        url: asset.to_owned(),
        reason: e.to_string(),
    })
}
