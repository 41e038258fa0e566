pub mod api;
pub mod booking;
pub mod config;
pub mod core_state;
pub mod dashboard;
pub mod db;
pub mod models;
pub mod slots;
pub mod timeline;
pub mod treatment;

use std::sync::Arc;
use tracing_subscriber::EnvFilter;

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Run the HTTP service until Ctrl-C.
pub fn run() -> Result<(), BoxError> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();

    tracing::info!("{} starting v{}", config::APP_NAME, config::APP_VERSION);

    let core = Arc::new(core_state::CoreState::from_config());
    core.initialize()?;

    let addr = config::bind_addr()?;
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(async move {
        let server = api::start_api_server(core, addr).await?;
        tracing::info!(addr = %server.addr, "Listening");

        tokio::signal::ctrl_c().await?;
        tracing::info!("Ctrl-C received, shutting down");
        server.stop().await;
        Ok::<(), BoxError>(())
    })
}
