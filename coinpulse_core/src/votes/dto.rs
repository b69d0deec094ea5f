use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum SectionType {
    MarketNews,
    CoinPrices,
    AiInsight,
    Meme,
}

impl SectionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SectionType::MarketNews => "market-news",
            SectionType::CoinPrices => "coin-prices",
            SectionType::AiInsight => "ai-insight",
            SectionType::Meme => "meme",
        }
    }
}

impl fmt::Display for SectionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for SectionType {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "market-news" => Ok(SectionType::MarketNews),
            "coin-prices" => Ok(SectionType::CoinPrices),
            "ai-insight" => Ok(SectionType::AiInsight),
            "meme" => Ok(SectionType::Meme),
            other => Err(format!("unknown section type: {}", other)),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum VoteValue {
    Up,
    Down,
}

impl FromStr for VoteValue {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "up" => Ok(VoteValue::Up),
            "down" => Ok(VoteValue::Down),
            other => Err(format!("unknown vote value: {}", other)),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Vote {
    pub id: Uuid,
    pub user_id: String,
    pub section_type: SectionType,
    pub content_id: String,
    pub vote: VoteValue,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<VoteDraft> for Vote {
    fn from(draft: VoteDraft) -> Self {
        let now = Utc::now();
        Vote {
            id: Uuid::new_v4(),
            user_id: draft.user_id,
            section_type: draft.section_type,
            content_id: draft.content_id,
            vote: draft.vote,
            created_at: now,
            updated_at: now,
        }
    }
}

/// A validated vote that has not been written yet.
#[derive(Debug, Clone, PartialEq)]
pub struct VoteDraft {
    pub user_id: String,
    pub section_type: SectionType,
    pub content_id: String,
    pub vote: VoteValue,
}

#[derive(Debug, Clone)]
pub struct UpsertedVote {
    pub vote: Vote,
    pub created: bool,
}

#[derive(Deserialize, Serialize, Debug, Default, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VoteRequest {
    pub section_type: Option<String>,
    pub content_id: Option<String>,
    pub vote: Option<String>,
}

impl VoteRequest {
    pub fn into_draft(self, user_id: &str) -> Result<VoteDraft, String> {
        let (Some(section_type), Some(content_id), Some(vote)) =
            (self.section_type, self.content_id, self.vote)
        else {
            return Err("please provide sectionType, contentId, and vote (up/down)".to_string());
        };

        let section_type = section_type
            .parse::<SectionType>()
            .map_err(|_| "invalid sectionType".to_string())?;

        let content_id = content_id.trim().to_string();
        if content_id.is_empty() {
            return Err("Content ID is required".to_string());
        }

        let vote = vote
            .parse::<VoteValue>()
            .map_err(|_| "vote must be either \"up\" or \"down\"".to_string())?;

        Ok(VoteDraft {
            user_id: user_id.to_string(),
            section_type,
            content_id,
            vote,
        })
    }
}
