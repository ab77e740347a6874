use std::time::Duration;

use thiserror::Error;

/// Failures while fetching a price. Every variant is recoverable: callers
/// log it and retry on their next tick.
#[derive(Error, Debug)]
pub enum FeedError {
    #[error("price source unavailable: {0}")]
    Unavailable(#[from] reqwest::Error),

    #[error("unexpected http status {status} from {url}")]
    Status { status: u16, url: String },

    #[error("price source rejected the request: {0}")]
    Api(String),

    #[error("invalid json from price source: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("malformed response: {0}")]
    Malformed(String),

    #[error("request timed out after {0:?}")]
    Timeout(Duration),
}
