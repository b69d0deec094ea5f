use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use utoipa::ToSchema;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, ToSchema)]
pub enum InvestorType {
    #[serde(rename = "HODLer")]
    Hodler,
    #[serde(rename = "Day Trader", alias = "DayTrader")]
    DayTrader,
    #[serde(rename = "NFT Collector", alias = "NFTCollector")]
    NftCollector,
    #[serde(rename = "DeFi Enthusiast", alias = "DeFiEnthusiast")]
    DefiEnthusiast,
    #[serde(rename = "Other")]
    Other,
}

impl InvestorType {
    pub fn as_str(&self) -> &'static str {
        match self {
            InvestorType::Hodler => "HODLer",
            InvestorType::DayTrader => "Day Trader",
            InvestorType::NftCollector => "NFT Collector",
            InvestorType::DefiEnthusiast => "DeFi Enthusiast",
            InvestorType::Other => "Other",
        }
    }
}

impl fmt::Display for InvestorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for InvestorType {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim() {
            "HODLer" => Ok(InvestorType::Hodler),
            "Day Trader" | "DayTrader" => Ok(InvestorType::DayTrader),
            "NFT Collector" | "NFTCollector" => Ok(InvestorType::NftCollector),
            "DeFi Enthusiast" | "DeFiEnthusiast" => Ok(InvestorType::DefiEnthusiast),
            "Other" => Ok(InvestorType::Other),
            other => Err(format!("unknown investor type: {}", other)),
        }
    }
}

/// Onboarding answers for one user. Assets are lowercase coin ids.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Preferences {
    pub interested_assets: Vec<String>,
    pub investor_type: InvestorType,
    pub content_preferences: Vec<String>,
    pub updated_at: DateTime<Utc>,
}

impl Preferences {
    pub fn new(
        interested_assets: Vec<String>,
        investor_type: InvestorType,
        content_preferences: Vec<String>,
    ) -> Self {
        Self {
            interested_assets,
            investor_type,
            content_preferences,
            updated_at: Utc::now(),
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Default, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PreferencesRequest {
    pub interested_assets: Option<Vec<String>>,
    pub investor_type: Option<String>,
    pub content_preferences: Option<Vec<String>>,
}

impl PreferencesRequest {
    /// Validates the survey answers and normalizes them into a record.
    pub fn into_preferences(self) -> Result<Preferences, String> {
        let (Some(assets), Some(investor_type), Some(content)) = (
            self.interested_assets,
            self.investor_type,
            self.content_preferences,
        ) else {
            return Err(
                "please provide all required fields: interestedAssets, investorType, contentPreferences"
                    .to_string(),
            );
        };

        let interested_assets = dedup_in_order(assets.iter().map(|a| a.trim().to_lowercase()));
        if interested_assets.is_empty() {
            return Err("Please select at least one asset of interest".to_string());
        }

        let investor_type = investor_type
            .parse::<InvestorType>()
            .map_err(|_| "Please select a valid investor type".to_string())?;

        let content_preferences = dedup_in_order(content.iter().map(|c| c.trim().to_string()));
        if content_preferences.is_empty() {
            return Err("Please select at least one content preference".to_string());
        }

        Ok(Preferences::new(
            interested_assets,
            investor_type,
            content_preferences,
        ))
    }
}

fn dedup_in_order(values: impl Iterator<Item = String>) -> Vec<String> {
    let mut seen = Vec::new();
    for value in values {
        if !value.is_empty() && !seen.contains(&value) {
            seen.push(value);
        }
    }
    seen
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn request(assets: &[&str], investor: &str, content: &[&str]) -> PreferencesRequest {
        PreferencesRequest {
            interested_assets: Some(assets.iter().map(|a| a.to_string()).collect()),
            investor_type: Some(investor.to_string()),
            content_preferences: Some(content.iter().map(|c| c.to_string()).collect()),
        }
    }

    #[test]
    fn test_request_is_normalized() {
        let preferences = request(
            &[" Bitcoin", "ethereum", "BITCOIN", ""],
            "Day Trader",
            &["Charts", " Charts ", "Social"],
        )
        .into_preferences()
        .unwrap();

        assert_eq!(preferences.interested_assets, vec!["bitcoin", "ethereum"]);
        assert_eq!(preferences.investor_type, InvestorType::DayTrader);
        assert_eq!(preferences.content_preferences, vec!["Charts", "Social"]);
    }

    #[test]
    fn test_missing_field_is_rejected() {
        let err = PreferencesRequest {
            interested_assets: Some(vec!["bitcoin".to_string()]),
            investor_type: None,
            content_preferences: Some(vec!["Charts".to_string()]),
        }
        .into_preferences()
        .unwrap_err();

        assert!(err.contains("interestedAssets, investorType, contentPreferences"));
    }

    #[test]
    fn test_empty_sets_are_rejected() {
        let err = request(&["  "], "HODLer", &["Charts"])
            .into_preferences()
            .unwrap_err();
        assert_eq!(err, "Please select at least one asset of interest");

        let err = request(&["bitcoin"], "HODLer", &[])
            .into_preferences()
            .unwrap_err();
        assert_eq!(err, "Please select at least one content preference");
    }

    #[test]
    fn test_unknown_investor_type_is_rejected() {
        let err = request(&["bitcoin"], "Whale", &["Charts"])
            .into_preferences()
            .unwrap_err();
        assert_eq!(err, "Please select a valid investor type");
    }

    #[test]
    fn test_investor_type_wire_names() {
        assert_eq!(
            serde_json::to_value(InvestorType::NftCollector).unwrap(),
            json!("NFT Collector")
        );
        let parsed: InvestorType = serde_json::from_value(json!("DeFiEnthusiast")).unwrap();
        assert_eq!(parsed, InvestorType::DefiEnthusiast);
        assert_eq!("HODLer".parse::<InvestorType>().unwrap(), InvestorType::Hodler);
    }
}
