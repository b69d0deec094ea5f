use chrono::{DateTime, Utc};
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

use crate::preferences::dto::Preferences;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Insight {
    pub text: String,
    pub model_label: String,
    pub timestamp: DateTime<Utc>,
    pub fallback: bool,
}

#[derive(Debug, Serialize)]
pub struct ChatMessage {
    pub role: &'static str,
    pub content: String,
}

#[derive(Debug, Serialize)]
pub struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub max_tokens: u32,
}

#[derive(Debug, Deserialize)]
pub struct ChatCompletionResponse {
    #[serde(default)]
    pub choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
pub struct ChatChoice {
    pub message: Option<ChatChoiceMessage>,
}

#[derive(Debug, Deserialize)]
pub struct ChatChoiceMessage {
    pub content: Option<String>,
}

impl ChatCompletionResponse {
    pub fn first_text(&self) -> Option<String> {
        self.choices
            .first()
            .and_then(|choice| choice.message.as_ref())
            .and_then(|message| message.content.as_deref())
            .map(str::trim)
            .filter(|text| !text.is_empty())
            .map(str::to_string)
    }
}

#[derive(Debug, Serialize)]
pub struct TextGenerationParameters {
    pub max_length: u32,
}

#[derive(Debug, Serialize)]
pub struct TextGenerationRequest {
    pub inputs: String,
    pub parameters: TextGenerationParameters,
}

/// Hugging Face answers either `[{generated_text}]` or `{generated_text}`.
pub fn generated_text(body: &Value) -> Option<&str> {
    let entry = match body {
        Value::Array(items) => items.first()?,
        other => other,
    };
    entry.get("generated_text")?.as_str()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InsightFallbackTable {
    /// Templates with `{investor_type}` and `{assets}` placeholders.
    pub templates: Vec<String>,
    pub model_label: String,
}

impl Default for InsightFallbackTable {
    fn default() -> Self {
        Self {
            templates: vec![
                "For {investor_type}s, {assets} continue to show resilience in the current market. Consider monitoring key support levels and staying informed about upcoming developments.".to_string(),
                "Today's market presents opportunities for {investor_type}s interested in {assets}. Keep an eye on volume trends and major news events that could impact prices.".to_string(),
                "The crypto market for {assets} remains dynamic. {investor_type}s should focus on long-term fundamentals while staying alert to short-term volatility.".to_string(),
            ],
            model_label: "Static Fallback".to_string(),
        }
    }
}

impl InsightFallbackTable {
    pub fn insight(&self, preferences: &Preferences) -> Insight {
        let assets = if preferences.interested_assets.is_empty() {
            "major cryptocurrencies".to_string()
        } else {
            preferences.interested_assets.join(" and ")
        };

        let text = self
            .templates
            .choose(&mut rand::thread_rng())
            .map(|template| {
                template
                    .replace("{investor_type}", preferences.investor_type.as_str())
                    .replace("{assets}", &assets)
            })
            .unwrap_or_default();

        Insight {
            text,
            model_label: self.model_label.clone(),
            timestamp: Utc::now(),
            fallback: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::preferences::dto::InvestorType;
    use serde_json::json;

    #[test]
    fn test_generated_text_shapes() {
        assert_eq!(
            generated_text(&json!([{"generated_text": "array form"}])),
            Some("array form")
        );
        assert_eq!(
            generated_text(&json!({"generated_text": "object form"})),
            Some("object form")
        );
        assert_eq!(generated_text(&json!([])), None);
        assert_eq!(generated_text(&json!({"error": "loading"})), None);
    }

    #[test]
    fn test_first_text_skips_blank_content() {
        let response: ChatCompletionResponse =
            serde_json::from_value(json!({"choices": [{"message": {"content": "   "}}]})).unwrap();
        assert_eq!(response.first_text(), None);

        let response: ChatCompletionResponse =
            serde_json::from_value(json!({"choices": [{"message": {"content": " Buy low. "}}]}))
                .unwrap();
        assert_eq!(response.first_text(), Some("Buy low.".to_string()));
    }

    #[test]
    fn test_fallback_insight_mentions_preferences() {
        let table = InsightFallbackTable {
            templates: vec!["{investor_type}s watching {assets}".to_string()],
            model_label: "Static Fallback".to_string(),
        };
        let preferences = Preferences::new(
            vec!["bitcoin".to_string(), "ethereum".to_string()],
            InvestorType::DayTrader,
            vec!["Charts".to_string()],
        );

        let insight = table.insight(&preferences);
        assert!(insight.fallback);
        assert_eq!(insight.text, "Day Traders watching bitcoin and ethereum");
        assert_eq!(insight.model_label, "Static Fallback");
    }
}
