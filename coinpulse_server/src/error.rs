use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use coinpulse_core::dashboard::dto::DashboardError;
use log::error;
use serde::Serialize;
use utoipa::{ToResponse, ToSchema};

#[derive(Debug, Serialize, ToSchema, ToResponse)]
pub struct ErrorServer {
    pub message: String,
    #[serde(skip)]
    pub status: u16,
}

#[derive(Debug, Serialize)]
struct ErrorBody<'a> {
    success: bool,
    message: &'a str,
}

impl ErrorServer {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            status: status.into(),
        }
    }
}

impl std::fmt::Display for ErrorServer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl IntoResponse for ErrorServer {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let body = ErrorBody {
            success: false,
            message: &self.message,
        };
        (status, Json(body)).into_response()
    }
}

impl From<DashboardError> for ErrorServer {
    fn from(err: DashboardError) -> Self {
        let status = match &err {
            DashboardError::NotOnboarded | DashboardError::PreferencesNotFound => {
                StatusCode::NOT_FOUND
            }
            DashboardError::Validation(_) | DashboardError::DuplicateVote => {
                StatusCode::BAD_REQUEST
            }
            DashboardError::Storage(e) => {
                error!("Storage failure: {}", e);
                return ErrorServer::new(StatusCode::INTERNAL_SERVER_ERROR, "server error");
            }
        };

        ErrorServer::new(status, err.to_string())
    }
}

impl From<JsonRejection> for ErrorServer {
    fn from(rejection: JsonRejection) -> Self {
        ErrorServer::new(StatusCode::BAD_REQUEST, rejection.body_text())
    }
}
