use std::sync::Arc;

use axum::{
    Extension,
    extract::{Json, State, rejection::JsonRejection},
};
use coinpulse_core::{helpers::dto::UserPayload, preferences::dto::PreferencesRequest};

use super::dto::{OnboardingResponse, PreferencesData};
use crate::{error::ErrorServer, state::ServerState};

#[utoipa::path(
    post,
    path = "/onboarding",
    request_body = PreferencesRequest,
    description = "Save the onboarding survey",
    responses(
        (status = 200, description = "Success", body = OnboardingResponse),
        (status = 400, description = "Bad Request"),
        (status = 401, description = "Unauthorized"),
    ),
    security(("bearer" = []))
)]
#[axum::debug_handler]
pub async fn save_onboarding(
    State(server_state): State<Arc<ServerState>>,
    Extension(user): Extension<UserPayload>,
    payload: Result<Json<PreferencesRequest>, JsonRejection>,
) -> Result<Json<OnboardingResponse>, ErrorServer> {
    let Json(request) = payload?;
    let preferences = server_state
        .dashboard()
        .save_preferences(&user.user_id, request)?;

    Ok(Json(OnboardingResponse {
        success: true,
        message: Some("preferences saved successfully".to_string()),
        data: PreferencesData { preferences },
    }))
}

#[utoipa::path(
    get,
    path = "/onboarding",
    description = "Saved onboarding preferences",
    responses(
        (status = 200, description = "Success", body = OnboardingResponse),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Onboarding not completed"),
    ),
    security(("bearer" = []))
)]
#[axum::debug_handler]
pub async fn get_onboarding(
    State(server_state): State<Arc<ServerState>>,
    Extension(user): Extension<UserPayload>,
) -> Result<Json<OnboardingResponse>, ErrorServer> {
    let preferences = server_state.dashboard().get_preferences(&user.user_id)?;

    Ok(Json(OnboardingResponse {
        success: true,
        message: None,
        data: PreferencesData { preferences },
    }))
}
