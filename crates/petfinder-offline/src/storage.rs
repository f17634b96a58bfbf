//! Named cache buckets.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::error::OfflineError;
use crate::request::CachedResponse;

/// Storage for named buckets of request-keyed responses.
///
/// Implementations must serialize their own reads, writes and deletes.
pub trait CacheStorage: Send + Sync {
    /// Opens `bucket`, creating it empty if it does not exist.
    fn open(&self, bucket: &str) -> impl Future<Output = Result<(), OfflineError>> + Send;

    /// Names of all existing buckets.
    fn keys(&self) -> impl Future<Output = Result<Vec<String>, OfflineError>> + Send;

    /// Deletes `bucket`; returns whether it existed.
    fn delete(&self, bucket: &str) -> impl Future<Output = Result<bool, OfflineError>> + Send;

    fn match_request(
        &self,
        bucket: &str,
        key: &str,
    ) -> impl Future<Output = Result<Option<CachedResponse>, OfflineError>> + Send;

    fn put(
        &self,
        bucket: &str,
        key: &str,
        response: CachedResponse,
    ) -> impl Future<Output = Result<(), OfflineError>> + Send;

    /// Stores every entry or none of them.
    fn put_all(
        &self,
        bucket: &str,
        entries: Vec<(String, CachedResponse)>,
    ) -> impl Future<Output = Result<(), OfflineError>> + Send;

    /// Request keys stored in `bucket` (empty if the bucket does not exist).
    fn entries(&self, bucket: &str) -> impl Future<Output = Result<Vec<String>, OfflineError>> + Send;
}

type Buckets = HashMap<String, HashMap<String, CachedResponse>>;

/// In-process [`CacheStorage`]. Clones share the same buckets.
#[derive(Debug, Clone, Default)]
pub struct MemoryCacheStorage {
    buckets: Arc<RwLock<Buckets>>,
}

impl MemoryCacheStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl CacheStorage for MemoryCacheStorage {
    async fn open(&self, bucket: &str) -> Result<(), OfflineError> {
        self.buckets
            .write()
            .await
            .entry(bucket.to_owned())
            .or_default();
        Ok(())
    }

    async fn keys(&self) -> Result<Vec<String>, OfflineError> {
        let mut names: Vec<String> = self.buckets.read().await.keys().cloned().collect();
        names.sort();
        Ok(names)
    }

    async fn delete(&self, bucket: &str) -> Result<bool, OfflineError> {
        Ok(self.buckets.write().await.remove(bucket).is_some())
    }

    async fn match_request(
        &self,
        bucket: &str,
        key: &str,
    ) -> Result<Option<CachedResponse>, OfflineError> {
        Ok(self
            .buckets
            .read()
            .await
            .get(bucket)
            .and_then(|entries| entries.get(key))
            .cloned())
    }

    async fn put(
        &self,
        bucket: &str,
        key: &str,
        response: CachedResponse,
    ) -> Result<(), OfflineError> {
        self.buckets
            .write()
            .await
            .entry(bucket.to_owned())
            .or_default()
            .insert(key.to_owned(), response);
        Ok(())
    }

    async fn put_all(
        &self,
        bucket: &str,
        entries: Vec<(String, CachedResponse)>,
    ) -> Result<(), OfflineError> {
        // Single write guard: either every entry lands or none does.
        self.buckets
            .write()
            .await
            .entry(bucket.to_owned())
            .or_default()
            .extend(entries);
        Ok(())
    }

    async fn entries(&self, bucket: &str) -> Result<Vec<String>, OfflineError> {
        let mut keys: Vec<String> = self
            .buckets
            .read()
            .await
            .get(bucket)
            .map(|entries| entries.keys().cloned().collect())
            .unwrap_or_default();
        keys.sort();
        Ok(keys)
    }
}
