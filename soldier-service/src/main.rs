use service_core::observability::init_tracing;
use soldier_service::config::SoldierConfig;
use soldier_service::services::init_metrics;
use soldier_service::startup::Application;

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let config = SoldierConfig::load()
        .map_err(|e| std::io::Error::other(format!("Configuration error: {}", e)))?;

    init_tracing(
        "soldier-service",
        &config.common.log_level,
        config.otlp_endpoint.as_deref(),
    )
    .map_err(|e| std::io::Error::other(format!("Tracing initialization error: {}", e)))?;

    // Recorder must be installed before any metric is recorded
    init_metrics().map_err(|e| {
        tracing::error!("Failed to initialize metrics: {}", e);
        std::io::Error::other(format!("Metrics initialization error: {}", e))
    })?;

    tracing::info!(
        backend = ?config.store.backend,
        port = config.common.port,
        "Starting soldier-service"
    );

    let app = Application::build(config).await.map_err(|e| {
        tracing::error!("Failed to build application: {}", e);
        std::io::Error::other(format!("Startup error: {}", e))
    })?;

    app.run_until_stopped().await?;

    tracing::info!("soldier-service stopped");
    Ok(())
}
