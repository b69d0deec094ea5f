use async_trait::async_trait;
use chrono::Utc;
use log::{debug, warn};
use reqwest::Client;
use serde_json::Value;
use std::sync::Arc;

use super::dto::{
    generated_text, ChatCompletionRequest, ChatCompletionResponse, ChatMessage, Insight,
    InsightFallbackTable, TextGenerationParameters, TextGenerationRequest,
};
use crate::{
    config::InsightConfig,
    preferences::dto::Preferences,
    providers::{SectionSource, UpstreamError},
};

const CHAT_COMPLETIONS_PATH: &str = "/chat/completions";
const SYSTEM_PROMPT: &str =
    "You are a helpful crypto market analyst providing daily insights.";
const MAX_TOKENS: u32 = 150;
const HUGGINGFACE_LABEL: &str = "Hugging Face (DialoGPT)";

/// Daily market commentary from OpenRouter or Hugging Face, backed by
/// templated static commentary.
#[derive(Clone)]
pub struct InsightProvider {
    client: Client,
    config: InsightConfig,
    table: Arc<InsightFallbackTable>,
}

pub fn build_prompt(preferences: &Preferences) -> String {
    format!(
        "Provide a brief, insightful daily crypto market analysis (2-3 sentences) for a {} interested in {}. Focus on: {}. Keep it concise and actionable.",
        preferences.investor_type,
        preferences.interested_assets.join(", "),
        preferences.content_preferences.join(", ")
    )
}

impl InsightProvider {
    pub fn new(client: Client, config: InsightConfig, table: Arc<InsightFallbackTable>) -> Self {
        Self {
            client,
            config,
            table,
        }
    }

    pub async fn fetch(&self, preferences: &Preferences) -> Insight {
        match self.fetch_live(preferences).await {
            Ok(insight) => insight,
            Err(UpstreamError::NotConfigured) => {
                debug!("No insight backend configured, serving fallback");
                self.table.insight(preferences)
            }
            Err(e) => {
                warn!("Insight upstream unavailable, serving fallback: {}", e);
                self.table.insight(preferences)
            }
        }
    }

    async fn fetch_live(&self, preferences: &Preferences) -> Result<Insight, UpstreamError> {
        let prompt = build_prompt(preferences);

        let (text, model_label) = if let Some(api_key) = &self.config.openrouter.api_key {
            let text = self.ask_openrouter(api_key, prompt).await?;
            (text, format!("OpenRouter ({})", self.config.openrouter_model))
        } else if let Some(api_key) = &self.config.huggingface.api_key {
            let text = self.ask_huggingface(api_key, prompt).await?;
            (text, HUGGINGFACE_LABEL.to_string())
        } else {
            return Err(UpstreamError::NotConfigured);
        };

        Ok(Insight {
            text,
            model_label,
            timestamp: Utc::now(),
            fallback: false,
        })
    }

    async fn ask_openrouter(&self, api_key: &str, prompt: String) -> Result<String, UpstreamError> {
        let upstream = &self.config.openrouter;
        let request = ChatCompletionRequest {
            model: self.config.openrouter_model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT.to_string(),
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
            max_tokens: MAX_TOKENS,
        };

        let response = self
            .client
            .post(format!("{}{}", upstream.base_url, CHAT_COMPLETIONS_PATH))
            .bearer_auth(api_key)
            .json(&request)
            .timeout(upstream.timeout)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(UpstreamError::Status(status.as_u16()));
        }

        let body: ChatCompletionResponse = response.json().await?;
        body.first_text().ok_or(UpstreamError::Empty)
    }

    async fn ask_huggingface(&self, api_key: &str, prompt: String) -> Result<String, UpstreamError> {
        let upstream = &self.config.huggingface;
        let request = TextGenerationRequest {
            inputs: prompt.clone(),
            parameters: TextGenerationParameters {
                max_length: MAX_TOKENS,
            },
        };

        let response = self
            .client
            .post(&upstream.base_url)
            .bearer_auth(api_key)
            .json(&request)
            .timeout(upstream.timeout)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(UpstreamError::Status(status.as_u16()));
        }

        let body: Value = response.json().await?;
        let generated = generated_text(&body)
            .ok_or_else(|| UpstreamError::Malformed("missing generated_text".to_string()))?;

        // The model echoes the prompt before its continuation.
        let text = generated.strip_prefix(prompt.as_str()).unwrap_or(generated).trim();
        if text.is_empty() {
            return Err(UpstreamError::Empty);
        }

        Ok(text.to_string())
    }
}

#[async_trait]
impl SectionSource<Insight> for InsightProvider {
    async fn load(&self, preferences: &Preferences) -> anyhow::Result<Insight> {
        Ok(self.fetch(preferences).await)
    }
}
