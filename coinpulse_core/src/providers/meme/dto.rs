use chrono::{DateTime, Utc};
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

pub const REDDIT_SOURCE: &str = "Reddit r/cryptomemes";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Meme {
    pub id: String,
    pub title: String,
    pub url: String,
    pub description: Option<String>,
    pub source: String,
    pub author: Option<String>,
    pub upvotes: Option<i64>,
    pub timestamp: DateTime<Utc>,
    pub fallback: bool,
}

/// Listing envelope of `hot.json`. Children stay raw and are parsed one by one.
#[derive(Debug, Default, Deserialize)]
pub struct RedditListing {
    pub data: Option<RedditListingData>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RedditListingData {
    #[serde(default)]
    pub children: Vec<Value>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RedditChild {
    pub data: Option<RedditPost>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RedditPost {
    pub id: Option<String>,
    pub title: Option<String>,
    pub url: Option<String>,
    pub author: Option<String>,
    pub ups: Option<i64>,
    pub post_hint: Option<String>,
    #[serde(default)]
    pub over_18: bool,
}

impl RedditPost {
    /// Safe-for-work image posts with a usable link.
    pub fn is_eligible(&self) -> bool {
        self.post_hint.as_deref() == Some("image")
            && !self.over_18
            && self
                .url
                .as_deref()
                .map(|url| !url.trim().is_empty())
                .unwrap_or(false)
    }

    pub fn into_meme(self) -> Meme {
        Meme {
            id: self
                .id
                .unwrap_or_else(|| format!("reddit-{}", Utc::now().timestamp_millis())),
            title: self.title.unwrap_or_else(|| "Crypto Meme".to_string()),
            url: self.url.unwrap_or_default(),
            description: None,
            source: REDDIT_SOURCE.to_string(),
            author: self.author,
            upvotes: self.ups,
            timestamp: Utc::now(),
            fallback: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StaticMeme {
    pub id: String,
    pub title: String,
    pub url: String,
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemeFallbackTable {
    pub memes: Vec<StaticMeme>,
    pub source: String,
}

impl Default for MemeFallbackTable {
    fn default() -> Self {
        let meme = |id: &str, title: &str, n: u8, description: &str| StaticMeme {
            id: id.to_string(),
            title: title.to_string(),
            url: format!("https://i.imgur.com/example{}.jpg", n),
            description: description.to_string(),
        };

        Self {
            memes: vec![
                meme("meme-1", "HODL Strong", 1, "When you HODL through the dip"),
                meme("meme-2", "To the Moon", 2, "When your coin pumps"),
                meme("meme-3", "Diamond Hands", 3, "Never selling"),
                meme("meme-4", "Buy the Dip", 4, "This is the way"),
                meme("meme-5", "Crypto Market", 5, "When you check the charts"),
            ],
            source: "Static Database".to_string(),
        }
    }
}

impl MemeFallbackTable {
    pub fn meme(&self) -> Meme {
        let picked = self.memes.choose(&mut rand::thread_rng());

        Meme {
            id: picked.map(|m| m.id.clone()).unwrap_or_default(),
            title: picked.map(|m| m.title.clone()).unwrap_or_default(),
            url: picked.map(|m| m.url.clone()).unwrap_or_default(),
            description: picked.map(|m| m.description.clone()),
            source: self.source.clone(),
            author: None,
            upvotes: None,
            timestamp: Utc::now(),
            fallback: true,
        }
    }
}
