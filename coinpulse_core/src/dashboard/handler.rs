use log::{debug, info};
use std::sync::Arc;

use super::dto::DashboardError;
use crate::{
    aggregator::{dto::DashboardEnvelope, handler::Aggregator},
    preferences::{
        dto::{Preferences, PreferencesRequest},
        storage::PreferenceStore,
    },
    votes::{
        dto::{UpsertedVote, Vote, VoteRequest},
        storage::VoteStore,
    },
};

/// Per-user dashboard operations over the stores and the aggregator.
#[derive(Clone)]
pub struct DashboardService {
    preferences: Arc<dyn PreferenceStore>,
    votes: Arc<dyn VoteStore>,
    aggregator: Aggregator,
}

impl DashboardService {
    pub fn new(
        preferences: Arc<dyn PreferenceStore>,
        votes: Arc<dyn VoteStore>,
        aggregator: Aggregator,
    ) -> Self {
        Self {
            preferences,
            votes,
            aggregator,
        }
    }

    pub async fn get_dashboard(&self, user_id: &str) -> Result<DashboardEnvelope, DashboardError> {
        let preferences = self
            .preferences
            .get_preferences(user_id)?
            .ok_or(DashboardError::NotOnboarded)?;

        debug!(
            "Assembling dashboard for user {} ({} assets)",
            user_id,
            preferences.interested_assets.len()
        );

        Ok(self.aggregator.assemble(preferences).await)
    }

    pub fn submit_vote(
        &self,
        user_id: &str,
        request: VoteRequest,
    ) -> Result<UpsertedVote, DashboardError> {
        let draft = request
            .into_draft(user_id)
            .map_err(DashboardError::Validation)?;

        let outcome = self.votes.upsert_vote(draft)?;
        info!(
            "Vote {} by user {} on {}/{}",
            if outcome.created { "created" } else { "updated" },
            user_id,
            outcome.vote.section_type,
            outcome.vote.content_id
        );

        Ok(outcome)
    }

    pub fn get_user_votes(&self, user_id: &str) -> Result<Vec<Vote>, DashboardError> {
        Ok(self.votes.votes_for_user(user_id)?)
    }

    pub fn save_preferences(
        &self,
        user_id: &str,
        request: PreferencesRequest,
    ) -> Result<Preferences, DashboardError> {
        let preferences = request
            .into_preferences()
            .map_err(DashboardError::Validation)?;

        self.preferences.set_preferences(user_id, &preferences)?;
        info!("Onboarding saved for user {}", user_id);

        Ok(preferences)
    }

    pub fn get_preferences(&self, user_id: &str) -> Result<Preferences, DashboardError> {
        self.preferences
            .get_preferences(user_id)?
            .ok_or(DashboardError::PreferencesNotFound)
    }
}
