use async_trait::async_trait;
use chrono::Utc;
use log::{debug, warn};
use reqwest::Client;
use serde_json::{Map, Value};
use std::{collections::HashSet, sync::Arc};

use super::dto::{CoinFallbackTable, CoinPrices, CoinQuote};
use crate::{
    config::UpstreamConfig,
    preferences::dto::Preferences,
    providers::{SectionSource, UpstreamError},
};

const SIMPLE_PRICE_PATH: &str = "/simple/price";
const API_KEY_HEADER: &str = "x-cg-demo-api-key";

/// Coin quotes from CoinGecko's `/simple/price`, backed by a static price table.
#[derive(Clone)]
pub struct CoinPriceProvider {
    client: Client,
    config: UpstreamConfig,
    table: Arc<CoinFallbackTable>,
}

impl CoinPriceProvider {
    pub fn new(client: Client, config: UpstreamConfig, table: Arc<CoinFallbackTable>) -> Self {
        Self {
            client,
            config,
            table,
        }
    }

    pub async fn fetch(&self, asset_ids: &[String]) -> CoinPrices {
        let personalized = !asset_ids.is_empty();
        let requested = if personalized {
            asset_ids.to_vec()
        } else {
            self.table.default_assets.clone()
        };

        match self.fetch_live(&requested, personalized).await {
            Ok(prices) => prices,
            Err(e) => {
                warn!("Coin price upstream unavailable, serving fallback: {}", e);
                self.table.prices_for(&requested)
            }
        }
    }

    async fn fetch_live(
        &self,
        requested: &[String],
        fill_missing: bool,
    ) -> Result<CoinPrices, UpstreamError> {
        let ids = requested.join(",");
        debug!("Requesting coin prices for: {}", ids);

        let mut request = self
            .client
            .get(format!("{}{}", self.config.base_url, SIMPLE_PRICE_PATH))
            .query(&[
                ("ids", ids.as_str()),
                ("vs_currencies", "usd"),
                ("include_24hr_change", "true"),
                ("include_market_cap", "true"),
            ])
            .timeout(self.config.timeout);

        if let Some(api_key) = &self.config.api_key {
            request = request.header(API_KEY_HEADER, api_key);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(UpstreamError::Status(status.as_u16()));
        }

        let body: Map<String, Value> = response.json().await?;
        if body.is_empty() {
            return Err(UpstreamError::Empty);
        }

        let mut coins: Vec<CoinQuote> = body
            .iter()
            .map(|(id, data)| CoinQuote::from_upstream(id, data))
            .collect();

        if fill_missing {
            let returned: HashSet<&str> = body.keys().map(String::as_str).collect();
            let missing: Vec<CoinQuote> = requested
                .iter()
                .filter(|id| !returned.contains(id.as_str()))
                .map(|id| self.table.quote(id))
                .collect();

            if !missing.is_empty() {
                debug!("Filling {} coin(s) from the fallback table", missing.len());
                coins.extend(missing);
            }
        }

        Ok(CoinPrices {
            coins,
            timestamp: Utc::now(),
            fallback: false,
        })
    }
}

#[async_trait]
impl SectionSource<CoinPrices> for CoinPriceProvider {
    async fn load(&self, preferences: &Preferences) -> anyhow::Result<CoinPrices> {
        Ok(self.fetch(&preferences.interested_assets).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::time::Duration;
    use wiremock::{
        matchers::{header, method, path, query_param},
        Mock, MockServer, ResponseTemplate,
    };

    fn provider(server: &MockServer, timeout: Duration) -> CoinPriceProvider {
        CoinPriceProvider::new(
            Client::new(),
            UpstreamConfig::new(server.uri(), timeout),
            Arc::new(CoinFallbackTable::default()),
        )
    }

    fn ids(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[tokio::test]
    async fn test_partial_response_is_filled_from_table() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/simple/price"))
            .and(query_param("ids", "bitcoin,unknownCoin"))
            .and(query_param("vs_currencies", "usd"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "bitcoin": {"usd": 64000.5, "usd_24h_change": 1.234, "usd_market_cap": 1.2e12}
            })))
            .mount(&server)
            .await;

        let prices = provider(&server, Duration::from_secs(5))
            .fetch(&ids(&["bitcoin", "unknownCoin"]))
            .await;

        assert!(!prices.fallback);
        assert_eq!(prices.coins.len(), 2);
        assert_eq!(prices.coins[0].id, "bitcoin");
        assert_eq!(prices.coins[0].price, 64000.5);
        assert_eq!(prices.coins[0].change_24h, 1.23);
        assert_eq!(prices.coins[1].id, "unknownCoin");
        assert_eq!(prices.coins[1].price, 100.0);
        assert_eq!(prices.coins[1].change_24h, 0.0);
    }

    #[tokio::test]
    async fn test_upstream_order_kept_and_missing_appended_in_request_order() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/simple/price"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "solana": {"usd": 140},
                "bitcoin": {"usd": 60000}
            })))
            .mount(&server)
            .await;

        let prices = provider(&server, Duration::from_secs(5))
            .fetch(&ids(&["cosmos", "bitcoin", "ghost", "solana"]))
            .await;

        let order: Vec<&str> = prices.coins.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(order, vec!["solana", "bitcoin", "cosmos", "ghost"]);
        assert_eq!(prices.coins[2].price, 12.0);
    }

    #[tokio::test]
    async fn test_server_error_serves_full_fallback() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let prices = provider(&server, Duration::from_secs(5))
            .fetch(&ids(&["ethereum", "polkadot"]))
            .await;

        assert!(prices.fallback);
        assert_eq!(prices.coins.len(), 2);
        assert_eq!(prices.coins[0].price, 3500.0);
        assert_eq!(prices.coins[1].price, 7.5);
    }

    #[tokio::test]
    async fn test_timeout_serves_fallback() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"bitcoin": {"usd": 1}}))
                    .set_delay(Duration::from_millis(500)),
            )
            .mount(&server)
            .await;

        let prices = provider(&server, Duration::from_millis(50))
            .fetch(&ids(&["bitcoin"]))
            .await;

        assert!(prices.fallback);
        assert_eq!(prices.coins[0].price, 90000.0);
    }

    #[tokio::test]
    async fn test_empty_body_serves_fallback_for_default_assets() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(query_param("ids", "bitcoin,ethereum,solana,cardano"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .mount(&server)
            .await;

        let prices = provider(&server, Duration::from_secs(5)).fetch(&[]).await;

        assert!(prices.fallback);
        let order: Vec<&str> = prices.coins.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(order, vec!["bitcoin", "ethereum", "solana", "cardano"]);
    }

    #[tokio::test]
    async fn test_api_key_header_is_sent() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(header("x-cg-demo-api-key", "demo-key"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"bitcoin": {"usd": "61000"}})),
            )
            .mount(&server)
            .await;

        let provider = CoinPriceProvider::new(
            Client::new(),
            UpstreamConfig::new(server.uri(), Duration::from_secs(5))
                .with_api_key(Some("demo-key".to_string())),
            Arc::new(CoinFallbackTable::default()),
        );
        let prices = provider.fetch(&ids(&["bitcoin"])).await;

        assert!(!prices.fallback);
        assert_eq!(prices.coins[0].price, 61000.0);
    }
}
