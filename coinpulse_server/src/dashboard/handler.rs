use std::sync::Arc;

use axum::{
    Extension,
    extract::{Json, State, rejection::JsonRejection},
    http::StatusCode,
};
use coinpulse_core::{helpers::dto::UserPayload, votes::dto::VoteRequest};

use super::dto::{DashboardResponse, VoteData, VoteResponse, VotesData, VotesResponse};
use crate::{error::ErrorServer, state::ServerState};

#[utoipa::path(
    get,
    path = "/dashboard",
    description = "Personalized dashboard: market news, coin prices, AI insight and a meme",
    responses(
        (status = 200, description = "Success", body = DashboardResponse),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Onboarding not completed"),
    ),
    security(("bearer" = []))
)]
#[axum::debug_handler]
pub async fn get_dashboard(
    State(server_state): State<Arc<ServerState>>,
    Extension(user): Extension<UserPayload>,
) -> Result<Json<DashboardResponse>, ErrorServer> {
    let envelope = server_state.dashboard().get_dashboard(&user.user_id).await?;

    Ok(Json(DashboardResponse {
        success: true,
        message: "dashboard data retrieved".to_string(),
        data: envelope,
    }))
}

#[utoipa::path(
    post,
    path = "/dashboard/vote",
    request_body = VoteRequest,
    description = "Vote up or down on a dashboard item",
    responses(
        (status = 201, description = "Vote created", body = VoteResponse),
        (status = 200, description = "Vote updated", body = VoteResponse),
        (status = 400, description = "Bad Request"),
        (status = 401, description = "Unauthorized"),
    ),
    security(("bearer" = []))
)]
#[axum::debug_handler]
pub async fn submit_vote(
    State(server_state): State<Arc<ServerState>>,
    Extension(user): Extension<UserPayload>,
    payload: Result<Json<VoteRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<VoteResponse>), ErrorServer> {
    let Json(request) = payload?;
    let outcome = server_state.dashboard().submit_vote(&user.user_id, request)?;

    let (status, message) = if outcome.created {
        (StatusCode::CREATED, "vote submitted successfully")
    } else {
        (StatusCode::OK, "vote updated successfully")
    };

    Ok((
        status,
        Json(VoteResponse {
            success: true,
            message: message.to_string(),
            data: VoteData {
                vote: outcome.vote,
            },
        }),
    ))
}

#[utoipa::path(
    get,
    path = "/dashboard/votes",
    description = "Votes cast by the current user, newest first",
    responses(
        (status = 200, description = "Success", body = VotesResponse),
        (status = 401, description = "Unauthorized"),
    ),
    security(("bearer" = []))
)]
#[axum::debug_handler]
pub async fn get_user_votes(
    State(server_state): State<Arc<ServerState>>,
    Extension(user): Extension<UserPayload>,
) -> Result<Json<VotesResponse>, ErrorServer> {
    let votes = server_state.dashboard().get_user_votes(&user.user_id)?;

    Ok(Json(VotesResponse {
        success: true,
        data: VotesData { votes },
    }))
}
