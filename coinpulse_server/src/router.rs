use std::sync::Arc;

use axum::{
    Router, middleware,
    routing::{get, post},
};
use coinpulse_core::{
    aggregator::handler::Aggregator,
    config::AppConfig,
    dashboard::handler::DashboardService,
    helpers::jwt::JwtManager,
    preferences::storage::SledPreferenceStore,
    providers::http_client,
    votes::storage::SledVoteStore,
};
use log::info;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_redoc::{Redoc, Servable};

use crate::{
    dashboard::handler::{get_dashboard, get_user_votes, submit_vote},
    docs::{dto::ApiDoc, handler::api_docs},
    info::handler::{health, not_found},
    middlewares::handler::auth,
    onboarding::handler::{get_onboarding, save_onboarding},
    state::ServerState,
};

pub fn router(config: &AppConfig) -> anyhow::Result<Router> {
    let db = sled::open(&config.sled_url)?;
    info!("Opened sled database at {}", config.sled_url);

    let state = server_state(&db, config)?;

    Ok(app(Arc::new(state)))
}

pub fn server_state(db: &sled::Db, config: &AppConfig) -> anyhow::Result<ServerState> {
    let preferences = Arc::new(SledPreferenceStore::new(db)?);
    let votes = Arc::new(SledVoteStore::new(db)?);

    let client = http_client()?;
    let tables = config.fallback_tables()?;
    let aggregator = Aggregator::from_providers(client, &config.providers, tables);

    let dashboard = DashboardService::new(preferences, votes, aggregator);
    let jwt = JwtManager::new(config.jwt_secret.clone());

    Ok(ServerState::from((dashboard, jwt)))
}

pub fn app(state: Arc<ServerState>) -> Router {
    let doc = ApiDoc::openapi();

    let auth_router = Router::new()
        .route("/dashboard", get(get_dashboard))
        .route("/dashboard/vote", post(submit_vote))
        .route("/dashboard/votes", get(get_user_votes))
        .route("/onboarding", post(save_onboarding).get(get_onboarding))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth));

    Router::new()
        .merge(Redoc::with_url("/redoc", doc))
        .merge(auth_router)
        .route("/health", get(health))
        .route("/docs", get(api_docs))
        .fallback(not_found)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
