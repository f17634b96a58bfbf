//! The offline worker lifecycle and its fetch interception policy.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};

use futures::future::try_join_all;
use reqwest::{Method, Url};
use tokio::sync::RwLock;

use crate::error::OfflineError;
use crate::manifest::Precache;
use crate::network::Fetcher;
use crate::policy::FetchPolicy;
use crate::request::{CachedResponse, Destination, FetchRequest};
use crate::storage::CacheStorage;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerState {
    Installing,
    Installed,
    Activated,
    Controlling,
    /// Install failed in strict mode; the worker never takes control.
    Redundant,
}

impl fmt::Display for WorkerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Installing => "installing",
            Self::Installed => "installed",
            Self::Activated => "activated",
            Self::Controlling => "controlling",
            Self::Redundant => "redundant",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallReport {
    pub cache_name: String,
    /// Number of assets written to the bucket. Zero when precaching failed.
    pub cached: usize,
    /// The precache failure tolerated in advisory mode.
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivateReport {
    /// Buckets from previous cache generations that were removed.
    pub deleted: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServedFrom {
    Cache,
    Network,
    /// The cached root document, served to a navigation while offline.
    OfflineFallback,
}

impl ServedFrom {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Cache => "cache",
            Self::Network => "network",
            Self::OfflineFallback => "offline-fallback",
        }
    }
}

#[derive(Debug, Clone)]
pub struct FetchOutcome {
    pub response: CachedResponse,
    pub served_from: ServedFrom,
}

pub struct OfflineWorker<S, F> {
    storage: S,
    fetcher: F,
    precache: Precache,
    policy: FetchPolicy,
    strict_install: bool,
    state: RwLock<WorkerState>,
    /// Set by the first `install` call so precaching runs without the state lock held.
    install_started: AtomicBool,
}

impl<S, F> OfflineWorker<S, F>
where
    S: CacheStorage,
    F: Fetcher,
{
    /// A new worker in [`WorkerState::Installing`]. Precache assets resolve
    /// against the policy's origin.
    #[must_use]
    pub fn new(storage: S, fetcher: F, precache: Precache, policy: FetchPolicy) -> Self {
        Self {
            storage,
            fetcher,
            precache,
            policy,
            strict_install: false,
            state: RwLock::new(WorkerState::Installing),
            install_started: AtomicBool::new(false),
        }
    }

    /// In strict mode a precache failure fails the install and the worker
    /// becomes [`WorkerState::Redundant`].
    #[must_use]
    pub fn with_strict_install(mut self, strict: bool) -> Self {
        self.strict_install = strict;
        self
    }

    pub async fn state(&self) -> WorkerState {
        *self.state.read().await
    }

    #[must_use]
    pub fn cache_name(&self) -> &str {
        &self.precache.cache_name
    }

    #[must_use]
    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// The origin that precache assets and the root document resolve against.
    #[must_use]
    pub fn scope(&self) -> &Url {
        self.policy.origin()
    }

    /// Pre-populates the current bucket with every precache asset.
    ///
    /// Assets are all fetched before anything is written, so a single
    /// failure leaves the bucket untouched. Requests handled while the
    /// assets download go straight to the network.
    ///
    /// # Errors
    ///
    /// Returns [`OfflineError::InvalidTransition`] unless the worker is
    /// installing and no other install has started, and in strict mode the
    /// precache or storage failure.
    pub async fn install(&self) -> Result<InstallReport, OfflineError> {
        {
            let state = self.state.read().await;
            if *state != WorkerState::Installing || self.install_started.swap(true, Ordering::SeqCst)
            {
                return Err(OfflineError::InvalidTransition {
                    state: *state,
                    action: "install",
                });
            }
        }

        let cache_name = self.precache.cache_name.clone();
        let precached = self.precache_assets().await;
        let mut state = self.state.write().await;
        match precached {
            Ok(cached) => {
                tracing::info!(cache = %cache_name, cached, "precached static assets");
                *state = WorkerState::Installed;
                Ok(InstallReport {
                    cache_name,
                    cached,
                    error: None,
                })
            }
            Err(e) if self.strict_install => {
                tracing::error!(cache = %cache_name, error = %e, "precache failed; worker is redundant");
                *state = WorkerState::Redundant;
                Err(e)
            }
            Err(e) => {
                tracing::warn!(cache = %cache_name, error = %e, "precache failed; continuing install");
                *state = WorkerState::Installed;
                Ok(InstallReport {
                    cache_name,
                    cached: 0,
                    error: Some(e.to_string()),
                })
            }
        }
    }

    async fn precache_assets(&self) -> Result<usize, OfflineError> {
        let urls = self.precache.asset_urls(self.scope())?;
        self.storage.open(&self.precache.cache_name).await?;

        let entries = try_join_all(urls.into_iter().map(|url| async move {
            let request = FetchRequest::get(url);
            let response = self
                .fetcher
                .fetch(&request)
                .await
                .map_err(|e| OfflineError::Precache {
                    url: request.url.to_string(),
                    reason: e.to_string(),
                })?;
            if !response.is_success() {
                return Err(OfflineError::Precache {
                    url: request.url.to_string(),
                    reason: format!("HTTP {}", response.status.as_u16()),
                });
            }
            Ok((request.cache_key(), response))
        }))
        .await?;

        let cached = entries.len();
        self.storage
            .put_all(&self.precache.cache_name, entries)
            .await?;
        Ok(cached)
    }

    /// Drops buckets from previous cache generations and takes control.
    ///
    /// # Errors
    ///
    /// Returns [`OfflineError::InvalidTransition`] unless the worker is
    /// installed, or a storage error while enumerating or deleting buckets.
    /// After a storage error the worker stays installed and activation can
    /// be retried.
    pub async fn activate(&self) -> Result<ActivateReport, OfflineError> {
        let mut state = self.state.write().await;
        if *state != WorkerState::Installed {
            return Err(OfflineError::InvalidTransition {
                state: *state,
                action: "activate",
            });
        }

        let mut deleted = Vec::new();
        for bucket in self.storage.keys().await? {
            if bucket == self.precache.cache_name {
                continue;
            }
            if self.storage.delete(&bucket).await? {
                tracing::info!(cache = %bucket, "deleted stale cache");
                deleted.push(bucket);
            }
        }

        *state = WorkerState::Activated;
        tracing::debug!(cache = %self.precache.cache_name, "worker activated; claiming clients");
        *state = WorkerState::Controlling;
        Ok(ActivateReport { deleted })
    }

    /// Answers an intercepted request.
    ///
    /// # Errors
    ///
    /// Returns the network error when the request cannot be answered from
    /// the network, the cache, or (for navigations) the cached root
    /// document.
    pub async fn handle_fetch(&self, request: &FetchRequest) -> Result<FetchOutcome, OfflineError> {
        if self.state().await != WorkerState::Controlling
            || request.method != Method::GET
            || self.policy.is_live(&request.url)
        {
            return self.network_only(request).await;
        }

        let key = request.cache_key();
        let bucket = &self.precache.cache_name;
        if let Some(response) = self.storage.match_request(bucket, &key).await? {
            tracing::debug!(url = %key, "cache hit");
            return Ok(FetchOutcome {
                response,
                served_from: ServedFrom::Cache,
            });
        }

        match self.fetcher.fetch(request).await {
            Ok(response) => {
                if self.policy.should_store(request, &response) {
                    if let Err(e) = self.storage.put(bucket, &key, response.clone()).await {
                        tracing::warn!(url = %key, error = %e, "failed to store response");
                    }
                }
                Ok(FetchOutcome {
                    response,
                    served_from: ServedFrom::Network,
                })
            }
            Err(e) if request.destination == Destination::Document => {
                let root = Precache::root_key(self.scope())?;
                match self.storage.match_request(bucket, &root).await? {
                    Some(response) => {
                        tracing::info!(url = %key, "network unavailable; serving cached document");
                        Ok(FetchOutcome {
                            response,
                            served_from: ServedFrom::OfflineFallback,
                        })
                    }
                    None => Err(e),
                }
            }
            Err(e) => Err(e),
        }
    }

    async fn network_only(&self, request: &FetchRequest) -> Result<FetchOutcome, OfflineError> {
        let response = self.fetcher.fetch(request).await?;
        Ok(FetchOutcome {
            response,
            served_from: ServedFrom::Network,
        })
    }
}
