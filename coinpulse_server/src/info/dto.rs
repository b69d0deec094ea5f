use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
pub struct Info {
    pub success: bool,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}
