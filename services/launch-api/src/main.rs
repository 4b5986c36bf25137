use anyhow::Context;
use launch_api::{router, AppState};
use launchcore_core::{logging, AppConfig};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::from_env().context("loading configuration")?;
    logging::init_with_format(config.server.log_format);

    info!(
        environment = %config.server.environment,
        debug = config.server.debug,
        table = %config.store.table_name,
        region = %config.store.region,
        endpoint = config.store.endpoint_url.as_deref().unwrap_or("default"),
        "Starting launch-api"
    );

    let bind_addr = config.bind_addr();
    let state = Arc::new(AppState::connect(config).await);
    let app = router(state);

    let listener = TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("binding {bind_addr}"))?;
    info!("launch-api listening on {}", bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("launch-api stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "Failed to listen for shutdown signal");
    }
    info!("Shutdown signal received");
}
