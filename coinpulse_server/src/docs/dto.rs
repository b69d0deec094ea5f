use coinpulse_core::{
    aggregator::dto::DashboardEnvelope,
    preferences::dto::{InvestorType, Preferences, PreferencesRequest},
    providers::{
        coins::dto::{CoinPrices, CoinQuote},
        insight::dto::Insight,
        meme::dto::Meme,
        news::dto::{NewsArticle, NewsFeed, NewsMetadata, NewsVotes},
    },
    votes::dto::{SectionType, Vote, VoteRequest, VoteValue},
};
use utoipa::{
    Modify, OpenApi,
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
};

use crate::{
    dashboard::{self, dto as dashboard_dto},
    error::ErrorServer,
    info, onboarding,
    onboarding::dto as onboarding_dto,
};

#[derive(OpenApi)]
#[openapi(
    paths(
        info::handler::health,
        dashboard::handler::get_dashboard,
        dashboard::handler::submit_vote,
        dashboard::handler::get_user_votes,
        onboarding::handler::save_onboarding,
        onboarding::handler::get_onboarding,
    ),
    components(schemas(
        info::dto::Info,
        ErrorServer,
        DashboardEnvelope,
        dashboard_dto::DashboardResponse,
        dashboard_dto::VoteData,
        dashboard_dto::VoteResponse,
        dashboard_dto::VotesData,
        dashboard_dto::VotesResponse,
        onboarding_dto::PreferencesData,
        onboarding_dto::OnboardingResponse,
        InvestorType,
        Preferences,
        PreferencesRequest,
        CoinQuote,
        CoinPrices,
        Insight,
        Meme,
        NewsArticle,
        NewsFeed,
        NewsMetadata,
        NewsVotes,
        SectionType,
        Vote,
        VoteRequest,
        VoteValue,
    )),
    modifiers(&BearerAuth)
)]
pub struct ApiDoc;

struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}
