//! Offline cache worker for the PetFinder page.
//!
//! The worker owns one versioned cache bucket. It pre-populates the bucket
//! with the page's static assets on install, drops older buckets on
//! activate, and from then on answers GET requests cache-first, writing
//! fresh same-origin responses back. Third-party breed API responses are
//! never stored.
//!
//! Storage and network access sit behind [`CacheStorage`] and [`Fetcher`]
//! so the policy can be exercised without a real cache or network.

pub mod error;
pub mod manifest;
pub mod network;
pub mod policy;
pub mod request;
pub mod storage;
pub mod worker;

pub use error::OfflineError;
pub use manifest::{Precache, DEFAULT_ASSETS};
pub use network::{Fetcher, HttpFetcher};
pub use policy::FetchPolicy;
pub use request::{CachedResponse, Destination, FetchRequest};
pub use storage::{CacheStorage, MemoryCacheStorage};
pub use worker::{ActivateReport, FetchOutcome, InstallReport, OfflineWorker, ServedFrom, WorkerState};
