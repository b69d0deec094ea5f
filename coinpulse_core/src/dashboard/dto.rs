use thiserror::Error;

use crate::votes::storage::VoteStoreError;

#[derive(Debug, Error)]
pub enum DashboardError {
    #[error("please complete onboarding first")]
    NotOnboarded,
    #[error("preferences not found. please complete onboarding.")]
    PreferencesNotFound,
    #[error("{0}")]
    Validation(String),
    #[error("duplicate vote detected")]
    DuplicateVote,
    #[error("storage error: {0}")]
    Storage(#[from] anyhow::Error),
}

impl From<VoteStoreError> for DashboardError {
    fn from(err: VoteStoreError) -> Self {
        match err {
            VoteStoreError::Duplicate => DashboardError::DuplicateVote,
            VoteStoreError::InvalidUserId => DashboardError::Validation(err.to_string()),
            other => DashboardError::Storage(other.into()),
        }
    }
}
