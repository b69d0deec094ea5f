use coinpulse_core::{dashboard::handler::DashboardService, helpers::jwt::JwtManager};

#[derive(Clone)]
pub struct ServerState {
    dashboard: DashboardService,
    jwt: JwtManager,
}

impl From<(DashboardService, JwtManager)> for ServerState {
    fn from(states: (DashboardService, JwtManager)) -> Self {
        let (dashboard, jwt) = states;
        Self { dashboard, jwt }
    }
}

impl ServerState {
    pub fn dashboard(&self) -> &DashboardService {
        &self.dashboard
    }

    pub fn jwt(&self) -> &JwtManager {
        &self.jwt
    }
}
