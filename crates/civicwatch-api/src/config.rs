use std::time::Duration;

use civicwatch_core::DEFAULT_SEED;

/// Per-request bound applied when the caller does not set one.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

/// Connection settings for the legislative-activity API.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Web-app URL of the backend, e.g. `https://script.google.com/macros/s/<id>/exec`.
    /// `None` disables live fetching.
    pub base_url: Option<String>,
    /// Serve every endpoint from fallback data even when a URL is set.
    pub offline: bool,
    pub timeout: Duration,
    /// Seed for the synthetic fallback data.
    pub fallback_seed: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            offline: false,
            timeout: DEFAULT_TIMEOUT,
            fallback_seed: DEFAULT_SEED,
        }
    }
}

impl ApiConfig {
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn offline(mut self, offline: bool) -> Self {
        self.offline = offline;
        self
    }
}
