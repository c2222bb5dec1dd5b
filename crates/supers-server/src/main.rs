//! Entry point of the supers server.
//!
//! # Startup Sequence
//!
//! 1. Initialize structured logging (tracing)
//! 2. Load configuration from `supers-config.yaml` (defaults when absent)
//! 3. Build the shared application state
//! 4. Serve HTTP until the process is terminated

use std::path::Path;
use std::sync::Arc;

use supers_core::config::CONFIG_FILE;
use supers_core::SupersConfig;
use supers_server::{start_server, AppState};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Application entry point.
///
/// # Errors
///
/// Returns an error if configuration is invalid or the server cannot
/// bind or serve.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Initialize structured logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    info!("supers-server starting");

    // 2. Load configuration.
    let config = SupersConfig::load_or_default(Path::new(CONFIG_FILE))?;
    info!(
        bind = %config.server.bind_address(),
        watch_path = %config.watch.path.display(),
        poll_interval_ms = config.watch.poll_interval_ms,
        ingest_enabled = config.ingest.enabled,
        "Configuration loaded"
    );

    // 3. Build shared state.
    let state = Arc::new(AppState::new(&config));

    // 4. Serve.
    start_server(&config.server, state).await?;

    Ok(())
}
