use anyhow::Context;
use axum::Router;
use tokio::net::TcpListener;

use ragchat_backend::core::config::{redact_sensitive_values, ConfigService};
use ragchat_backend::core::logging;
use ragchat_backend::server;
use ragchat_backend::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config_service = ConfigService::from_env();
    let config = config_service
        .load()
        .with_context(|| format!("Failed to load {}", config_service.config_path().display()))?;
    logging::init(&config.logging);

    if let Ok(value) = serde_json::to_value(&config) {
        tracing::debug!(config = %redact_sensitive_values(&value), "Effective configuration");
    }

    let state = AppState::initialize(config)?;
    if state.is_degraded() {
        tracing::error!(
            missing = ?state.missing_config,
            "Missing required configuration; chat requests will fail until it is set"
        );
    }

    let bind_addr = state.config.bind_addr();
    let listener = TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("Failed to bind to {}", bind_addr))?;
    let addr = listener.local_addr()?;
    tracing::info!("Listening on {}", addr);

    let app: Router = server::router::router(state);
    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
