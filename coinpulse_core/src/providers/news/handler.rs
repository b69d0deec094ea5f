use async_trait::async_trait;
use log::warn;
use reqwest::{Client, StatusCode};
use std::sync::Arc;

use super::dto::{CryptoPanicPost, CryptoPanicResponse, NewsArticle, NewsFallbackTable, NewsFeed};
use crate::{
    config::UpstreamConfig,
    preferences::dto::Preferences,
    providers::{SectionSource, UpstreamError},
};

const POSTS_PATH: &str = "/posts";
const DEFAULT_CURRENCIES: &str = "BTC,ETH";
const MAX_ARTICLES: usize = 10;

/// Market news from CryptoPanic, backed by templated static articles.
#[derive(Clone)]
pub struct NewsProvider {
    client: Client,
    config: UpstreamConfig,
    table: Arc<NewsFallbackTable>,
}

impl NewsProvider {
    pub fn new(client: Client, config: UpstreamConfig, table: Arc<NewsFallbackTable>) -> Self {
        Self {
            client,
            config,
            table,
        }
    }

    pub async fn fetch(&self, preferences: &Preferences) -> NewsFeed {
        let assets = &preferences.interested_assets;

        match self.fetch_live(assets).await {
            Ok(feed) => feed,
            Err(e) => {
                warn!("News upstream unavailable, serving fallback: {}", e);
                self.table.feed(assets)
            }
        }
    }

    async fn fetch_live(&self, assets: &[String]) -> Result<NewsFeed, UpstreamError> {
        let currencies = if assets.is_empty() {
            DEFAULT_CURRENCIES.to_string()
        } else {
            assets.join(",")
        };

        let mut query = vec![("filter", "hot".to_string()), ("currencies", currencies)];
        if let Some(api_key) = &self.config.api_key {
            query.push(("auth_token", api_key.clone()));
        }

        let response = self
            .client
            .get(format!("{}{}", self.config.base_url, POSTS_PATH))
            .query(&query)
            .timeout(self.config.timeout)
            .send()
            .await?;

        // CryptoPanic answers 4xx without a key; any non-200 is treated as no data.
        let status = response.status();
        if status != StatusCode::OK {
            return Err(UpstreamError::Status(status.as_u16()));
        }

        let body: CryptoPanicResponse = response.json().await?;
        let posts = body.results.unwrap_or_default();
        if posts.is_empty() {
            return Err(UpstreamError::Empty);
        }

        let articles: Vec<NewsArticle> = posts
            .into_iter()
            .take(MAX_ARTICLES)
            .map(|raw| CryptoPanicPost::from_value(&raw).into_article())
            .collect();

        Ok(NewsFeed::new(articles, false))
    }
}

#[async_trait]
impl SectionSource<NewsFeed> for NewsProvider {
    async fn load(&self, preferences: &Preferences) -> anyhow::Result<NewsFeed> {
        Ok(self.fetch(preferences).await)
    }
}
