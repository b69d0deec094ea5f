use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use utoipa::ToSchema;

use crate::helpers::utils::{coerce_f64, coin_display_name, round_to_cents};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CoinQuote {
    pub id: String,
    pub symbol: String,
    pub name: String,
    pub price: f64,
    pub change_24h: f64,
    pub market_cap: Option<f64>,
}

impl CoinQuote {
    /// Formats one entry of a `/simple/price` response. Fields that are
    /// missing or not numeric fall back to per-field defaults.
    pub fn from_upstream(id: &str, data: &Value) -> Self {
        let price = data.get("usd").and_then(coerce_f64).unwrap_or(0.0);
        let change_24h = data
            .get("usd_24h_change")
            .and_then(coerce_f64)
            .unwrap_or(0.0);
        let market_cap = data
            .get("usd_market_cap")
            .and_then(coerce_f64)
            .filter(|cap| *cap != 0.0);

        Self {
            id: id.to_string(),
            symbol: id.to_uppercase(),
            name: coin_display_name(id),
            price,
            change_24h: round_to_cents(change_24h),
            market_cap,
        }
    }

    pub fn from_fallback(id: &str, fallback: &FallbackPrice) -> Self {
        Self {
            id: id.to_string(),
            symbol: id.to_uppercase(),
            name: coin_display_name(id),
            price: fallback.price,
            change_24h: fallback.change_24h,
            market_cap: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CoinPrices {
    pub coins: Vec<CoinQuote>,
    pub timestamp: DateTime<Utc>,
    pub fallback: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FallbackPrice {
    pub price: f64,
    pub change_24h: f64,
}

impl FallbackPrice {
    const fn new(price: f64, change_24h: f64) -> Self {
        Self { price, change_24h }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoinFallbackTable {
    /// Queried when the user has no interested assets.
    pub default_assets: Vec<String>,
    pub prices: HashMap<String, FallbackPrice>,
    /// Used for any id missing from `prices`.
    pub unknown: FallbackPrice,
}

impl Default for CoinFallbackTable {
    fn default() -> Self {
        let prices = [
            ("bitcoin", FallbackPrice::new(90000.0, 2.5)),
            ("ethereum", FallbackPrice::new(3500.0, 1.8)),
            ("solana", FallbackPrice::new(150.0, 3.2)),
            ("cardano", FallbackPrice::new(0.55, -0.5)),
            ("polkadot", FallbackPrice::new(7.5, 1.2)),
            ("chainlink", FallbackPrice::new(18.0, 2.1)),
            ("polygon", FallbackPrice::new(0.95, 0.8)),
            ("avalanche", FallbackPrice::new(38.0, 1.5)),
            ("cosmos", FallbackPrice::new(12.0, 0.9)),
            ("algorand", FallbackPrice::new(0.25, -0.3)),
        ]
        .into_iter()
        .map(|(id, price)| (id.to_string(), price))
        .collect();

        Self {
            default_assets: ["bitcoin", "ethereum", "solana", "cardano"]
                .into_iter()
                .map(String::from)
                .collect(),
            prices,
            unknown: FallbackPrice::new(100.0, 0.0),
        }
    }
}

impl CoinFallbackTable {
    pub fn quote(&self, id: &str) -> CoinQuote {
        let price = self.prices.get(id).unwrap_or(&self.unknown);
        CoinQuote::from_fallback(id, price)
    }

    pub fn prices_for(&self, ids: &[String]) -> CoinPrices {
        CoinPrices {
            coins: ids.iter().map(|id| self.quote(id)).collect(),
            timestamp: Utc::now(),
            fallback: true,
        }
    }
}
