use std::time::Duration;

use thiserror::Error;

/// Why a single endpoint fetch did not produce live data.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("live API disabled")]
    Disabled,
    #[error("invalid API URL {url:?}: {reason}")]
    InvalidUrl { url: String, reason: String },
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("server returned {status}: {body}")]
    Server { status: u16, body: String },
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("upstream reported an error: {0}")]
    Upstream(String),
    #[error("request timed out after {0:?}")]
    Timeout(Duration),
    #[error("request cancelled")]
    Cancelled,
}
