//! API layer: HTTP client for the legislative-activity backend, per-endpoint
//! fallback to synthetic data, and the concurrent dashboard load cycle.

pub mod client;
mod config;
mod error;
pub mod load;

pub use client::{ApiClient, Endpoint, Fetched, Source};
pub use config::{ApiConfig, DEFAULT_TIMEOUT};
pub use error::FetchError;
pub use load::{EndpointStatus, LoadCycle, LoadReport};
pub use tokio_util::sync::CancellationToken;
