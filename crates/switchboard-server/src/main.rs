//! Switchboard server binary.
//!
//! This is the main entry point that wires the directory engine to the
//! gateway. It loads configuration, builds the phone roster from the
//! simulation catalog, and serves the REST and `WebSocket` API until the
//! process is terminated.
//!
//! # Startup Sequence
//!
//! 1. Load configuration from `switchboard-config.yaml`
//! 2. Initialize structured logging (tracing)
//! 3. Create the directory engine wired to the operator rooms
//! 4. Load every simulation definition and generate its fixed phones
//! 5. Serve the gateway

mod config;
mod error;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use switchboard_gateway::AppState;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::config::{DEFAULT_CONFIG_PATH, LoggingConfig, SwitchboardConfig};
use crate::error::ServerError;

/// Application entry point for the Switchboard server.
///
/// # Errors
///
/// Returns an error if configuration, the simulation catalog, or the
/// gateway fails.
#[tokio::main]
async fn main() -> Result<(), ServerError> {
    // 1. Load configuration.
    let (config, config_path) = load_config()?;

    // 2. Initialize structured logging.
    init_logging(&config.logging);
    info!("switchboard-server starting");
    info!(
        path = %config_path.display(),
        host = config.server.host,
        port = config.server.port,
        sim_dir = %config.simulations.directory.display(),
        release_on_disconnect = config.server.release_on_disconnect,
        "Configuration loaded"
    );

    // 3. Create the directory engine.
    let state = Arc::new(
        AppState::new().with_release_on_disconnect(config.server.release_on_disconnect),
    );

    // 4. Load simulations.
    let loaded = load_simulations(&state, &config.simulations.directory).await?;
    info!(simulations = loaded, "Phone roster built");

    // 5. Serve.
    switchboard_gateway::start_server(&config.server.to_server_config(), state).await?;

    info!("switchboard-server stopped");
    Ok(())
}

/// Load configuration from `SWITCHBOARD_CONFIG` or the default path.
///
/// A missing file is not an error: defaults (plus environment overrides)
/// are used instead.
fn load_config() -> Result<(SwitchboardConfig, PathBuf), ServerError> {
    let path = std::env::var("SWITCHBOARD_CONFIG")
        .map_or_else(|_| PathBuf::from(DEFAULT_CONFIG_PATH), PathBuf::from);

    let config = if path.exists() {
        SwitchboardConfig::from_file(&path)?
    } else {
        let mut config = SwitchboardConfig::default();
        config.apply_env_overrides()?;
        config
    };
    Ok((config, path))
}

/// Install the global tracing subscriber.
///
/// `RUST_LOG` takes precedence over the configured level.
fn init_logging(logging: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));

    if logging.json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_target(true)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .init();
    }
}

/// Register every simulation in `dir` with the directory engine.
///
/// A missing directory leaves the roster empty; simulations can still be
/// loaded through the API. Returns the number of simulations loaded.
async fn load_simulations(state: &AppState, dir: &Path) -> Result<usize, ServerError> {
    if !dir.is_dir() {
        warn!(dir = %dir.display(), "Simulation directory not found, starting with an empty roster");
        return Ok(0);
    }

    let sims = switchboard_world::load_simulation_dir(dir)?;
    let count = sims.len();
    let mut directory = state.directory.lock().await;
    for sim in sims {
        directory.load_simulation(sim)?;
    }
    Ok(count)
}
