use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

use crate::helpers::utils::{capitalize, coerce_f64};

pub const CRYPTOPANIC_SITE: &str = "https://cryptopanic.com";
const NEWS_INDEX_URL: &str = "https://cryptopanic.com/news/";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct NewsVotes {
    pub positive: i64,
    pub negative: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct NewsMetadata {
    pub kind: String,
    pub domain: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewsArticle {
    pub id: String,
    pub title: String,
    pub url: String,
    pub source: String,
    pub published_at: DateTime<Utc>,
    pub votes: NewsVotes,
    pub metadata: NewsMetadata,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct NewsFeed {
    pub articles: Vec<NewsArticle>,
    pub count: usize,
    pub timestamp: DateTime<Utc>,
    pub fallback: bool,
}

impl NewsFeed {
    pub fn new(articles: Vec<NewsArticle>, fallback: bool) -> Self {
        Self {
            count: articles.len(),
            articles,
            timestamp: Utc::now(),
            fallback,
        }
    }
}

/// Envelope of CryptoPanic's `/posts` endpoint. Posts stay raw so a single
/// malformed post cannot sink the whole page.
#[derive(Debug, Default, Deserialize)]
pub struct CryptoPanicResponse {
    #[serde(default)]
    pub results: Option<Vec<Value>>,
}

#[derive(Debug, Default)]
pub struct CryptoPanicSource {
    pub title: Option<String>,
    pub url: Option<String>,
}

/// One post, read field by field so a mistyped field only loses itself.
#[derive(Debug, Default)]
pub struct CryptoPanicPost {
    pub id: Option<Value>,
    pub title: Option<String>,
    pub url: Option<String>,
    pub link: Option<String>,
    pub source: Option<CryptoPanicSource>,
    pub domain: Option<String>,
    pub published_at: Option<String>,
    pub created_at: Option<String>,
    pub votes: Option<Value>,
    pub kind: Option<String>,
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn usable_url(value: &Option<String>) -> Option<&str> {
    non_empty(value).filter(|url| *url != "#")
}

fn text_field(value: &Value, field: &str) -> Option<String> {
    value.get(field).and_then(Value::as_str).map(str::to_string)
}

fn parse_timestamp(value: Option<&str>) -> Option<DateTime<Utc>> {
    value
        .and_then(|raw| DateTime::parse_from_rfc3339(raw).ok())
        .map(|parsed| parsed.with_timezone(&Utc))
}

impl CryptoPanicPost {
    pub fn from_value(raw: &Value) -> Self {
        Self {
            id: raw.get("id").cloned(),
            title: text_field(raw, "title"),
            url: text_field(raw, "url"),
            link: text_field(raw, "link"),
            source: raw
                .get("source")
                .filter(|source| source.is_object())
                .map(|source| CryptoPanicSource {
                    title: text_field(source, "title"),
                    url: text_field(source, "url"),
                }),
            domain: text_field(raw, "domain"),
            published_at: text_field(raw, "published_at"),
            created_at: text_field(raw, "created_at"),
            votes: raw.get("votes").filter(|votes| votes.is_object()).cloned(),
            kind: text_field(raw, "kind"),
        }
    }

    fn upstream_id(&self) -> Option<String> {
        match &self.id {
            Some(Value::String(id)) if !id.trim().is_empty() => Some(id.trim().to_string()),
            Some(Value::Number(id)) => Some(id.to_string()),
            _ => None,
        }
    }

    /// Resolves the article link, preferring the post's own URL over the
    /// CryptoPanic permalink and the news index.
    pub fn article_url(&self) -> String {
        let candidate = usable_url(&self.url)
            .or_else(|| usable_url(&self.link))
            .or_else(|| self.source.as_ref().and_then(|s| usable_url(&s.url)))
            .map(str::to_string)
            .or_else(|| {
                self.upstream_id()
                    .map(|id| format!("{}/news/{}/", CRYPTOPANIC_SITE, id))
            });

        match candidate {
            Some(url) if url.starts_with("http") => url,
            Some(url) if url.starts_with('/') => format!("{}{}", CRYPTOPANIC_SITE, url),
            Some(url) => format!("{}/{}", CRYPTOPANIC_SITE, url),
            None => NEWS_INDEX_URL.to_string(),
        }
    }

    fn votes(&self) -> NewsVotes {
        let count = |field: &str| {
            self.votes
                .as_ref()
                .and_then(|votes| votes.get(field))
                .and_then(coerce_f64)
                .map(|v| v as i64)
                .unwrap_or(0)
        };

        NewsVotes {
            positive: count("positive"),
            negative: count("negative"),
        }
    }

    pub fn into_article(self) -> NewsArticle {
        let id = self.upstream_id().unwrap_or_else(|| {
            format!(
                "news-{}-{}",
                Utc::now().timestamp_millis(),
                rand::random::<u32>()
            )
        });
        let url = self.article_url();
        let votes = self.votes();
        let source = self
            .source
            .as_ref()
            .and_then(|s| non_empty(&s.title))
            .or_else(|| non_empty(&self.domain))
            .unwrap_or("Crypto News")
            .to_string();
        let published_at = parse_timestamp(non_empty(&self.published_at))
            .or_else(|| parse_timestamp(non_empty(&self.created_at)))
            .unwrap_or_else(Utc::now);

        NewsArticle {
            id,
            title: non_empty(&self.title)
                .unwrap_or("Crypto News Update")
                .to_string(),
            url,
            source,
            published_at,
            votes,
            metadata: NewsMetadata {
                kind: non_empty(&self.kind).unwrap_or("news").to_string(),
                domain: non_empty(&self.domain)
                    .unwrap_or("cryptonews.com")
                    .to_string(),
            },
        }
    }
}

/// One static article. `{asset}` and `{asset_upper}` in the title and url
/// are replaced by the asset at `asset_slot` of the user's interests.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewsTemplate {
    pub id: String,
    pub title: String,
    pub url: String,
    pub source: String,
    pub domain: String,
    #[serde(default)]
    pub asset_slot: Option<usize>,
}

/// Stands in for a missing user asset: `id` fills `{asset}`, `currency`
/// fills `{asset_upper}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefaultAsset {
    pub id: String,
    pub currency: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewsFallbackTable {
    /// Fills asset slots the user's interests do not cover.
    pub default_assets: Vec<DefaultAsset>,
    pub articles: Vec<NewsTemplate>,
}

impl Default for NewsFallbackTable {
    fn default() -> Self {
        let template = |id: &str, title: &str, url: &str, source: &str, domain: &str, slot| {
            NewsTemplate {
                id: id.to_string(),
                title: title.to_string(),
                url: url.to_string(),
                source: source.to_string(),
                domain: domain.to_string(),
                asset_slot: slot,
            }
        };

        Self {
            default_assets: vec![
                DefaultAsset {
                    id: "bitcoin".to_string(),
                    currency: "BTC".to_string(),
                },
                DefaultAsset {
                    id: "ethereum".to_string(),
                    currency: "ETH".to_string(),
                },
            ],
            articles: vec![
                template(
                    "fallback-1",
                    "{asset} shows strong market performance",
                    "https://cryptopanic.com/news/?currencies={asset_upper}",
                    "CryptoPanic",
                    "cryptopanic.com",
                    Some(0),
                ),
                template(
                    "fallback-2",
                    "{asset} network upgrade announced",
                    "https://cryptopanic.com/news/?currencies={asset_upper}",
                    "CryptoPanic",
                    "cryptopanic.com",
                    Some(1),
                ),
                template(
                    "fallback-3",
                    "Latest cryptocurrency market news and analysis",
                    "https://cryptopanic.com/news/",
                    "CryptoPanic",
                    "cryptopanic.com",
                    None,
                ),
                template(
                    "fallback-4",
                    "Crypto market trends and blockchain updates",
                    "https://www.coindesk.com/",
                    "CoinDesk",
                    "coindesk.com",
                    None,
                ),
            ],
        }
    }
}

impl NewsFallbackTable {
    pub fn feed(&self, assets: &[String]) -> NewsFeed {
        let now = Utc::now();
        let articles = self
            .articles
            .iter()
            .map(|template| {
                let asset = template.asset_slot.and_then(|slot| match assets.get(slot) {
                    Some(asset) => Some((capitalize(asset), asset.to_uppercase())),
                    None => self
                        .default_assets
                        .get(slot)
                        .map(|default| (capitalize(&default.id), default.currency.clone())),
                });
                let fill = |text: &str| match &asset {
                    Some((name, currency)) => text
                        .replace("{asset_upper}", currency)
                        .replace("{asset}", name),
                    None => text.to_string(),
                };

                NewsArticle {
                    id: template.id.clone(),
                    title: fill(&template.title),
                    url: fill(&template.url),
                    source: template.source.clone(),
                    published_at: now,
                    votes: NewsVotes::default(),
                    metadata: NewsMetadata {
                        kind: "news".to_string(),
                        domain: template.domain.clone(),
                    },
                }
            })
            .collect();

        NewsFeed::new(articles, true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn post(value: Value) -> CryptoPanicPost {
        CryptoPanicPost::from_value(&value)
    }

    #[test]
    fn test_article_url_normalization() {
        assert_eq!(
            post(json!({"url": "https://example.com/a"})).article_url(),
            "https://example.com/a"
        );
        assert_eq!(
            post(json!({"link": "/news/123/"})).article_url(),
            "https://cryptopanic.com/news/123/"
        );
        assert_eq!(
            post(json!({"source": {"url": "news/abc"}})).article_url(),
            "https://cryptopanic.com/news/abc"
        );
        assert_eq!(
            post(json!({"id": 987})).article_url(),
            "https://cryptopanic.com/news/987/"
        );
        assert_eq!(post(json!({"url": "#"})).article_url(), NEWS_INDEX_URL);
        assert_eq!(
            post(json!({"url": "#", "link": "https://real.example/a", "id": 3})).article_url(),
            "https://real.example/a"
        );
        assert_eq!(
            post(json!({"url": " # ", "id": 3})).article_url(),
            "https://cryptopanic.com/news/3/"
        );
        assert_eq!(post(json!({})).article_url(), NEWS_INDEX_URL);
    }

    #[test]
    fn test_post_fields_are_defaulted() {
        let article = CryptoPanicPost::default().into_article();

        assert!(article.id.starts_with("news-"));
        assert_eq!(article.title, "Crypto News Update");
        assert_eq!(article.source, "Crypto News");
        assert_eq!(article.votes, NewsVotes::default());
        assert_eq!(article.metadata.kind, "news");
        assert_eq!(article.metadata.domain, "cryptonews.com");
    }

    #[test]
    fn test_post_fields_are_mapped() {
        let article = post(json!({
            "id": 42,
            "title": "ETF inflows rise",
            "url": "https://news.example/etf",
            "source": {"title": "Example News"},
            "domain": "news.example",
            "published_at": "2025-11-02T08:30:00Z",
            "votes": {"positive": 7, "negative": "2", "important": 1},
            "kind": "media"
        }))
        .into_article();

        assert_eq!(article.id, "42");
        assert_eq!(article.source, "Example News");
        assert_eq!(article.published_at.to_rfc3339(), "2025-11-02T08:30:00+00:00");
        assert_eq!(article.votes, NewsVotes { positive: 7, negative: 2 });
        assert_eq!(article.metadata.kind, "media");
        assert_eq!(article.metadata.domain, "news.example");
    }

    #[test]
    fn test_mistyped_field_keeps_the_rest_of_the_post() {
        let article = post(json!({
            "id": 7,
            "title": "Real headline",
            "url": "https://real.example/7",
            "published_at": 12345,
            "votes": "many",
            "source": ["not", "an", "object"]
        }))
        .into_article();

        assert_eq!(article.id, "7");
        assert_eq!(article.title, "Real headline");
        assert_eq!(article.url, "https://real.example/7");
        assert_eq!(article.source, "Crypto News");
        assert_eq!(article.votes, NewsVotes::default());
    }

    #[test]
    fn test_non_object_post_is_fully_defaulted() {
        let article = post(json!(null)).into_article();

        assert!(article.id.starts_with("news-"));
        assert_eq!(article.title, "Crypto News Update");
        assert_eq!(article.url, NEWS_INDEX_URL);
    }

    #[test]
    fn test_source_falls_back_to_domain() {
        let article = post(json!({"domain": "coindesk.com"})).into_article();
        assert_eq!(article.source, "coindesk.com");
    }

    #[test]
    fn test_fallback_feed_is_personalized() {
        let table = NewsFallbackTable::default();
        let feed = table.feed(&["solana".to_string()]);

        assert!(feed.fallback);
        assert_eq!(feed.count, 4);
        assert_eq!(feed.articles[0].title, "Solana shows strong market performance");
        assert_eq!(
            feed.articles[0].url,
            "https://cryptopanic.com/news/?currencies=SOLANA"
        );
        assert_eq!(feed.articles[1].title, "Ethereum network upgrade announced");
        assert_eq!(
            feed.articles[1].url,
            "https://cryptopanic.com/news/?currencies=ETH"
        );
        assert_eq!(feed.articles[3].source, "CoinDesk");
    }

    #[test]
    fn test_default_assets_use_currency_codes() {
        let feed = NewsFallbackTable::default().feed(&[]);

        assert_eq!(feed.articles[0].title, "Bitcoin shows strong market performance");
        assert_eq!(
            feed.articles[0].url,
            "https://cryptopanic.com/news/?currencies=BTC"
        );
        assert_eq!(
            feed.articles[1].url,
            "https://cryptopanic.com/news/?currencies=ETH"
        );
    }
}
