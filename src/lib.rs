pub mod analytics; // Survival, response and molecular-correlation analytics
pub mod api; // Read-only HTTP API
pub mod config;
pub mod core_state;
pub mod db;
pub mod models;

use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use core_state::CoreState;

pub fn run() {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();

    tracing::info!("{} starting v{}", config::APP_NAME, config::APP_VERSION);

    let core = Arc::new(CoreState::from_env());
    let runtime = tokio::runtime::Runtime::new().expect("error while starting the tokio runtime");

    runtime
        .block_on(serve(core, config::bind_addr()))
        .expect("error while running GBM Tracker");
}

/// Migrate the store, serve the API until Ctrl-C, then shut down gracefully.
async fn serve(core: Arc<CoreState>, addr: std::net::SocketAddr) -> Result<(), String> {
    tracing::info!(db = %core.db_path().display(), "Opening record store");
    core.migrate().map_err(|e| e.to_string())?;

    let server = api::start_api_server(core, addr).await?;
    tracing::info!(
        session_id = %server.session.session_id,
        addr = %server.session.server_addr,
        "Serving analytics API"
    );

    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for Ctrl-C: {e}");
    }

    server.stop().await;
    Ok(())
}
