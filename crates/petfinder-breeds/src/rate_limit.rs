//! Retry helper for breed API requests.
//!
//! The page issues each breed request exactly once, so the default policy is
//! `max_retries = 0`. Operators can opt into exponential backoff for
//! transient failures (429 and network errors).

use std::future::Future;
use std::time::Duration;

use crate::error::BreedsError;

/// Returns `true` for transient conditions: [`BreedsError::RateLimited`]
/// and [`BreedsError::Http`]. Everything else (404, other statuses, bodies
/// that do not decode) is returned immediately.
fn is_retriable(err: &BreedsError) -> bool {
    matches!(err, BreedsError::RateLimited { .. } | BreedsError::Http(_))
}

/// Executes `operation`, retrying transient errors up to `max_retries`
/// additional times with a `backoff_base_secs * 2^attempt` delay.
pub(crate) async fn retry_with_backoff<T, F, Fut>(
    max_retries: u32,
    backoff_base_secs: u64,
    mut operation: F,
) -> Result<T, BreedsError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, BreedsError>>,
{
    let mut attempt = 0u32;

    loop {
        let err = match operation().await {
            Ok(value) => return Ok(value),
            Err(err) => err,
        };

        if !is_retriable(&err) || attempt >= max_retries {
            return Err(err);
        }

        let delay_secs = backoff_base_secs.saturating_mul(1u64 << attempt.min(62));
        tracing::warn!(
            attempt,
            max_retries,
            delay_secs,
            error = %err,
            "transient breed API error, retrying after backoff"
        );
        tokio::time::sleep(Duration::from_secs(delay_secs)).await;
        attempt += 1;
    }
}
