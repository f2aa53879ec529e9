pub mod api;
pub mod appointment;
pub mod authorization;
pub mod clock;
pub mod config;
pub mod consultation;
pub mod core_state; // Transport-agnostic state
pub mod db;
pub mod directory;
pub mod error;
pub mod models;
pub mod proximity;
pub mod triage;

use std::sync::Arc;

use tracing_subscriber::EnvFilter;

/// Failures that stop the service before it starts serving.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error(transparent)]
    Config(#[from] config::ConfigError),
    #[error(transparent)]
    Core(#[from] core_state::CoreError),
    #[error(transparent)]
    Server(#[from] api::server::ServerError),
    #[error("Failed to listen for shutdown signal: {0}")]
    Signal(std::io::Error),
}

/// Run the service until Ctrl-C.
pub async fn run() -> Result<(), StartupError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();

    tracing::info!("{} starting v{}", config::APP_NAME, config::APP_VERSION);

    let service = config::ServiceConfig::from_env()?;
    let core = core_state::CoreState::from_config(&service)?;
    core.initialize()?;

    let mut server = api::start_api_server(Arc::new(core), service.bind).await?;
    tracing::info!(addr = %server.addr, "Listening");

    tokio::signal::ctrl_c().await.map_err(StartupError::Signal)?;
    server.shutdown();
    server.wait().await;
    Ok(())
}
