use coinpulse_core::preferences::dto::Preferences;
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
pub struct PreferencesData {
    pub preferences: Preferences,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OnboardingResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub data: PreferencesData,
}
