use anyhow::{anyhow, Result};
use std::{env, path::PathBuf, time::Duration};

use crate::providers::fallback::FallbackTables;

pub const DEFAULT_COINGECKO_URL: &str = "https://api.coingecko.com/api/v3";
pub const DEFAULT_CRYPTOPANIC_URL: &str = "https://cryptopanic.com/api/v1";
pub const DEFAULT_OPENROUTER_URL: &str = "https://openrouter.ai/api/v1";
pub const DEFAULT_OPENROUTER_MODEL: &str = "meta-llama/llama-3.2-3b-instruct:free";
pub const DEFAULT_HUGGINGFACE_URL: &str =
    "https://api-inference.huggingface.co/models/microsoft/DialoGPT-medium";
pub const DEFAULT_REDDIT_MEME_URL: &str = "https://www.reddit.com/r/cryptomemes";

/// One upstream endpoint: where it lives, how to authenticate, how long to wait.
#[derive(Debug, Clone)]
pub struct UpstreamConfig {
    pub base_url: String,
    pub api_key: Option<String>,
    pub timeout: Duration,
}

impl UpstreamConfig {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: None,
            timeout,
        }
    }

    pub fn with_api_key(mut self, api_key: Option<String>) -> Self {
        self.api_key = api_key;
        self
    }
}

#[derive(Debug, Clone)]
pub struct InsightConfig {
    pub openrouter: UpstreamConfig,
    pub openrouter_model: String,
    pub huggingface: UpstreamConfig,
}

#[derive(Debug, Clone)]
pub struct ProviderConfig {
    pub coins: UpstreamConfig,
    pub news: UpstreamConfig,
    pub insight: InsightConfig,
    pub meme: UpstreamConfig,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            coins: UpstreamConfig::new(DEFAULT_COINGECKO_URL, Duration::from_secs(15)),
            news: UpstreamConfig::new(DEFAULT_CRYPTOPANIC_URL, Duration::from_secs(10)),
            insight: InsightConfig {
                openrouter: UpstreamConfig::new(DEFAULT_OPENROUTER_URL, Duration::from_secs(15)),
                openrouter_model: DEFAULT_OPENROUTER_MODEL.to_string(),
                huggingface: UpstreamConfig::new(DEFAULT_HUGGINGFACE_URL, Duration::from_secs(15)),
            },
            meme: UpstreamConfig::new(DEFAULT_REDDIT_MEME_URL, Duration::from_secs(10)),
        }
    }
}

impl ProviderConfig {
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        let insight_timeout = env_secs("INSIGHT_TIMEOUT_SECS", defaults.insight.openrouter.timeout)?;

        Ok(Self {
            coins: UpstreamConfig::new(
                env_or("COINGECKO_API_URL", DEFAULT_COINGECKO_URL),
                env_secs("COIN_TIMEOUT_SECS", defaults.coins.timeout)?,
            )
            .with_api_key(env_opt("COINGECKO_API_KEY")),
            news: UpstreamConfig::new(
                env_or("CRYPTOPANIC_API_URL", DEFAULT_CRYPTOPANIC_URL),
                env_secs("NEWS_TIMEOUT_SECS", defaults.news.timeout)?,
            )
            .with_api_key(env_opt("CRYPTOPANIC_API_KEY")),
            insight: InsightConfig {
                openrouter: UpstreamConfig::new(
                    env_or("OPENROUTER_API_URL", DEFAULT_OPENROUTER_URL),
                    insight_timeout,
                )
                .with_api_key(env_opt("OPENROUTER_API_KEY")),
                openrouter_model: env_or("OPENROUTER_MODEL", DEFAULT_OPENROUTER_MODEL),
                huggingface: UpstreamConfig::new(
                    env_or("HUGGINGFACE_API_URL", DEFAULT_HUGGINGFACE_URL),
                    insight_timeout,
                )
                .with_api_key(env_opt("HUGGINGFACE_API_KEY")),
            },
            meme: UpstreamConfig::new(
                env_or("REDDIT_MEME_URL", DEFAULT_REDDIT_MEME_URL),
                env_secs("MEME_TIMEOUT_SECS", defaults.meme.timeout)?,
            ),
        })
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub server_domain: String,
    pub sled_url: String,
    pub jwt_secret: String,
    pub fallback_table_path: Option<PathBuf>,
    pub providers: ProviderConfig,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        let jwt_secret =
            env::var("JWT_SECRET").map_err(|_| anyhow!("JWT_SECRET environment variable not set"))?;

        Ok(Self {
            server_domain: env_or("SERVER_DOMAIN", "0.0.0.0:3000"),
            sled_url: env_or("SLED_URL", "coinpulse_db"),
            jwt_secret,
            fallback_table_path: env_opt("FALLBACK_TABLE_PATH").map(PathBuf::from),
            providers: ProviderConfig::from_env()?,
        })
    }

    pub fn fallback_tables(&self) -> Result<FallbackTables> {
        match &self.fallback_table_path {
            Some(path) => FallbackTables::load(path),
            None => Ok(FallbackTables::default()),
        }
    }
}

fn env_opt(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn env_or(name: &str, default: &str) -> String {
    env_opt(name).unwrap_or_else(|| default.to_string())
}

fn env_secs(name: &str, default: Duration) -> Result<Duration> {
    match env_opt(name) {
        Some(value) => value
            .parse::<u64>()
            .map(Duration::from_secs)
            .map_err(|e| anyhow!("{} must be a whole number of seconds: {}", name, e)),
        None => Ok(default),
    }
}
