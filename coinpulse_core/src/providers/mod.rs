pub mod coins;
pub mod fallback;
pub mod insight;
pub mod meme;
pub mod news;

use async_trait::async_trait;
use reqwest::Client;
use thiserror::Error;

use crate::preferences::dto::Preferences;

const USER_AGENT: &str = "coinpulse/0.1 (dashboard aggregator)";

/// Why a live upstream call could not be used. Never leaves a provider:
/// each provider swaps it for its fallback payload.
#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("request timed out")]
    Timeout,
    #[error("upstream responded with status {0}")]
    Status(u16),
    #[error("network error: {0}")]
    Network(String),
    #[error("upstream returned an empty payload")]
    Empty,
    #[error("malformed payload: {0}")]
    Malformed(String),
    #[error("no upstream configured")]
    NotConfigured,
}

impl From<reqwest::Error> for UpstreamError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            UpstreamError::Timeout
        } else if err.is_decode() {
            UpstreamError::Malformed(err.to_string())
        } else {
            UpstreamError::Network(err.to_string())
        }
    }
}

/// One dashboard section, resolved from the user's preferences.
///
/// Real providers never return `Err`: upstream trouble is absorbed into a
/// fallback payload. An `Err` (or a panic) here is a defect and is reported
/// by the aggregator as a failed section.
#[async_trait]
pub trait SectionSource<T>: Send + Sync {
    async fn load(&self, preferences: &Preferences) -> anyhow::Result<T>;
}

/// Shared HTTP client for all providers. Per-call timeouts are set on each request.
pub fn http_client() -> reqwest::Result<Client> {
    Client::builder().user_agent(USER_AGENT).gzip(true).build()
}
