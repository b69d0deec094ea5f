use axum::{Json, http::StatusCode};
use chrono::Utc;

use super::dto::Info;
use crate::error::ErrorServer;

#[utoipa::path(
    get,
    path = "/health",
    description = "Health check",
    responses(
        (status = 200, description = "Success", body = Info),
    )
)]
pub async fn health() -> Json<Info> {
    Json(Info {
        success: true,
        message: "server is running".to_string(),
        timestamp: Utc::now(),
    })
}

pub async fn not_found() -> ErrorServer {
    ErrorServer::new(StatusCode::NOT_FOUND, "route not found")
}
