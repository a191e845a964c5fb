//! Error types for the server binary.
//!
//! [`ServerError`] is the top-level error type that wraps all possible
//! failure modes during startup and serving.

use crate::config::ConfigError;

/// Top-level error for the server binary.
///
/// Each variant wraps a specific subsystem error, providing a single
/// error type that `main` can propagate with `?`.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// Configuration loading failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: ConfigError,
    },

    /// Simulation definitions could not be loaded.
    #[error("world error: {source}")]
    World {
        /// The underlying world error.
        #[from]
        source: switchboard_world::WorldError,
    },

    /// A simulation could not be registered with the directory.
    #[error("directory error: {source}")]
    Directory {
        /// The underlying directory error.
        #[from]
        source: switchboard_directory::DirectoryError,
    },

    /// The gateway failed to bind or serve.
    #[error("gateway error: {source}")]
    Gateway {
        /// The underlying gateway server error.
        #[from]
        source: switchboard_gateway::ServerError,
    },
}
