use serde::{ser::SerializeStruct, Serialize, Serializer};
use utoipa::ToSchema;

use crate::providers::{
    coins::dto::CoinPrices, insight::dto::Insight, meme::dto::Meme, news::dto::NewsFeed,
};

/// Outcome of one dashboard section.
///
/// Serializes as `{"success": true, "data": ...}` or
/// `{"success": false, "error": "..."}`, never both.
#[derive(Debug, Clone, PartialEq)]
pub enum SectionResult<T> {
    Success(T),
    Failure(String),
}

impl<T> SectionResult<T> {
    pub fn is_success(&self) -> bool {
        matches!(self, SectionResult::Success(_))
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            SectionResult::Success(data) => Some(data),
            SectionResult::Failure(_) => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            SectionResult::Success(_) => None,
            SectionResult::Failure(error) => Some(error),
        }
    }
}

impl<T: Serialize> Serialize for SectionResult<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("SectionResult", 2)?;
        match self {
            SectionResult::Success(data) => {
                state.serialize_field("success", &true)?;
                state.serialize_field("data", data)?;
            }
            SectionResult::Failure(error) => {
                state.serialize_field("success", &false)?;
                state.serialize_field("error", error)?;
            }
        }
        state.end()
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardEnvelope {
    #[schema(value_type = Object)]
    pub market_news: SectionResult<NewsFeed>,
    #[schema(value_type = Object)]
    pub coin_prices: SectionResult<CoinPrices>,
    #[schema(value_type = Object)]
    pub ai_insight: SectionResult<Insight>,
    #[schema(value_type = Object)]
    pub meme: SectionResult<Meme>,
}
