use async_trait::async_trait;
use log::{debug, warn};
use rand::seq::SliceRandom;
use reqwest::Client;
use std::sync::Arc;

use super::dto::{Meme, MemeFallbackTable, RedditChild, RedditListing, RedditPost};
use crate::{
    config::UpstreamConfig,
    preferences::dto::Preferences,
    providers::{SectionSource, UpstreamError},
};

const HOT_PATH: &str = "/hot.json";
const LISTING_LIMIT: &str = "10";
const CANDIDATES: usize = 5;

/// A random image post from r/cryptomemes, backed by a static meme table.
#[derive(Clone)]
pub struct MemeProvider {
    client: Client,
    config: UpstreamConfig,
    table: Arc<MemeFallbackTable>,
}

impl MemeProvider {
    pub fn new(client: Client, config: UpstreamConfig, table: Arc<MemeFallbackTable>) -> Self {
        Self {
            client,
            config,
            table,
        }
    }

    pub async fn fetch(&self) -> Meme {
        match self.fetch_live().await {
            Ok(meme) => meme,
            Err(e) => {
                warn!("Meme upstream unavailable, serving fallback: {}", e);
                self.table.meme()
            }
        }
    }

    async fn fetch_live(&self) -> Result<Meme, UpstreamError> {
        let response = self
            .client
            .get(format!("{}{}", self.config.base_url, HOT_PATH))
            .query(&[("limit", LISTING_LIMIT)])
            .timeout(self.config.timeout)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(UpstreamError::Status(status.as_u16()));
        }

        let listing: RedditListing = response.json().await?;
        let children = listing
            .data
            .ok_or_else(|| UpstreamError::Malformed("listing has no data".to_string()))?
            .children;

        let candidates: Vec<RedditPost> = children
            .into_iter()
            .filter_map(|raw| match serde_json::from_value::<RedditChild>(raw) {
                Ok(child) => child.data,
                Err(e) => {
                    debug!("Skipping unreadable reddit child: {}", e);
                    None
                }
            })
            .filter(RedditPost::is_eligible)
            .take(CANDIDATES)
            .collect();

        candidates
            .choose(&mut rand::thread_rng())
            .cloned()
            .map(RedditPost::into_meme)
            .ok_or(UpstreamError::Empty)
    }
}

#[async_trait]
impl SectionSource<Meme> for MemeProvider {
    async fn load(&self, _preferences: &Preferences) -> anyhow::Result<Meme> {
        Ok(self.fetch().await)
    }
}
