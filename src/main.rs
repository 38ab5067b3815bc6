use anyhow::{Context, Result};
use elysene_site::{config::Config, server};
use std::net::SocketAddr;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file (ignored in production)
    let _ = dotenvy::dotenv();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("elysene_site=info".parse()?),
        )
        .init();

    info!("Starting Elysene site backend");

    // Load configuration from environment
    let config = Config::from_env()?;

    if let Err(e) = config.brevo_settings() {
        warn!("Contact form disabled until configured: {}", e);
    }

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let app = server::router(server::AppState::new(config)?);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    info!("Listening on {}", addr);
    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
