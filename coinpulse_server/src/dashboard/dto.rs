use coinpulse_core::{aggregator::dto::DashboardEnvelope, votes::dto::Vote};
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
pub struct DashboardResponse {
    pub success: bool,
    pub message: String,
    pub data: DashboardEnvelope,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct VoteData {
    pub vote: Vote,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct VoteResponse {
    pub success: bool,
    pub message: String,
    pub data: VoteData,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct VotesData {
    pub votes: Vec<Vote>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct VotesResponse {
    pub success: bool,
    pub data: VotesData,
}
