use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{StatusCode, header::AUTHORIZATION},
    middleware::Next,
    response::Response,
};
use coinpulse_core::helpers::dto::UserPayload;
use log::debug;

use crate::{error::ErrorServer, state::ServerState};

pub async fn auth(
    State(server_state): State<Arc<ServerState>>,
    mut req: Request,
    next: Next,
) -> Result<Response, ErrorServer> {
    let headers = req.headers();
    let token = headers
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty());

    if let Some(token) = token {
        let claims = server_state.jwt().validate_token(token).map_err(|e| {
            debug!("Rejected bearer token: {}", e);
            ErrorServer::new(StatusCode::UNAUTHORIZED, "not authorized, token failed")
        })?;

        let user = UserPayload {
            user_id: claims.user_id,
        };

        req.extensions_mut().insert(user);
    } else {
        return Err(ErrorServer::new(
            StatusCode::UNAUTHORIZED,
            "not authorized, no token",
        ));
    }

    Ok(next.run(req).await)
}
