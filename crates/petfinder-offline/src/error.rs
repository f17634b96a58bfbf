use thiserror::Error;

use crate::worker::WorkerState;

#[derive(Debug, Error)]
pub enum OfflineError {
    #[error("network request to {url} failed: {reason}")]
    Network { url: String, reason: String },

    #[error("failed to precache {url}: {reason}")]
    Precache { url: String, reason: String },

    #[error("cache storage error: {0}")]
    Storage(String),

    #[error("cannot {action} while worker is {state}")]
    InvalidTransition {
        state: WorkerState,
        action: &'static str,
    },

    #[error("invalid URL \"{url}\": {reason}")]
    InvalidUrl { url: String, reason: String },
}
