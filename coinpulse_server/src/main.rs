mod dashboard;
mod docs;
mod error;
mod info;
mod middlewares;
mod onboarding;
mod router;
mod state;

use coinpulse_core::config::AppConfig;
use dotenvy::dotenv;
use log::info;
use router::router;

#[tokio::main(flavor = "multi_thread", worker_threads = 4)]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    tracing_subscriber::fmt::init();

    let config = AppConfig::from_env()?;
    let app = router(&config)?;

    let listener = tokio::net::TcpListener::bind(&config.server_domain).await?;
    info!("Listening on {}", config.server_domain);

    axum::serve(listener, app).await?;

    Ok(())
}
