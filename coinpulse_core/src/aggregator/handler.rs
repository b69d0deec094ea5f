use log::error;
use reqwest::Client;
use std::sync::Arc;
use tokio::task::JoinHandle;

use super::dto::{DashboardEnvelope, SectionResult};
use crate::{
    config::ProviderConfig,
    preferences::dto::Preferences,
    providers::{
        coins::{dto::CoinPrices, handler::CoinPriceProvider},
        fallback::FallbackTables,
        insight::{dto::Insight, handler::InsightProvider},
        meme::{dto::Meme, handler::MemeProvider},
        news::{dto::NewsFeed, handler::NewsProvider},
        SectionSource,
    },
};

const MARKET_NEWS: &str = "market news";
const COIN_PRICES: &str = "coin prices";
const AI_INSIGHT: &str = "AI insight";
const MEME: &str = "meme";

/// Fans one preference record out to the four section sources.
#[derive(Clone)]
pub struct Aggregator {
    news: Arc<dyn SectionSource<NewsFeed>>,
    coins: Arc<dyn SectionSource<CoinPrices>>,
    insight: Arc<dyn SectionSource<Insight>>,
    meme: Arc<dyn SectionSource<Meme>>,
}

impl Aggregator {
    pub fn new(
        news: Arc<dyn SectionSource<NewsFeed>>,
        coins: Arc<dyn SectionSource<CoinPrices>>,
        insight: Arc<dyn SectionSource<Insight>>,
        meme: Arc<dyn SectionSource<Meme>>,
    ) -> Self {
        Self {
            news,
            coins,
            insight,
            meme,
        }
    }

    /// Wires the live providers over one shared HTTP client.
    pub fn from_providers(client: Client, config: &ProviderConfig, tables: FallbackTables) -> Self {
        let (coins, news, insight, meme) = tables.into_shared();

        Self::new(
            Arc::new(NewsProvider::new(client.clone(), config.news.clone(), news)),
            Arc::new(CoinPriceProvider::new(client.clone(), config.coins.clone(), coins)),
            Arc::new(InsightProvider::new(client.clone(), config.insight.clone(), insight)),
            Arc::new(MemeProvider::new(client, config.meme.clone(), meme)),
        )
    }

    /// Runs every section as its own task and waits for all of them.
    /// A failing or panicking section is reported in place and never
    /// cancels the others.
    pub async fn assemble(&self, preferences: Preferences) -> DashboardEnvelope {
        let preferences = Arc::new(preferences);

        let news = spawn_section(self.news.clone(), preferences.clone());
        let coins = spawn_section(self.coins.clone(), preferences.clone());
        let insight = spawn_section(self.insight.clone(), preferences.clone());
        let meme = spawn_section(self.meme.clone(), preferences);

        let (market_news, coin_prices, ai_insight, meme) = tokio::join!(
            settle(MARKET_NEWS, news),
            settle(COIN_PRICES, coins),
            settle(AI_INSIGHT, insight),
            settle(MEME, meme),
        );

        DashboardEnvelope {
            market_news,
            coin_prices,
            ai_insight,
            meme,
        }
    }
}

fn spawn_section<T: Send + 'static>(
    source: Arc<dyn SectionSource<T>>,
    preferences: Arc<Preferences>,
) -> JoinHandle<anyhow::Result<T>> {
    tokio::spawn(async move { source.load(&preferences).await })
}

async fn settle<T>(section: &str, handle: JoinHandle<anyhow::Result<T>>) -> SectionResult<T> {
    match handle.await {
        Ok(Ok(data)) => SectionResult::Success(data),
        Ok(Err(e)) => {
            error!("Section {} failed: {}", section, e);
            let message = e.to_string();
            if message.trim().is_empty() {
                SectionResult::Failure(format!("failed to fetch {}", section))
            } else {
                SectionResult::Failure(message)
            }
        }
        Err(e) => {
            error!("Section {} task aborted: {}", section, e);
            SectionResult::Failure(format!("failed to fetch {}", section))
        }
    }
}
