//! Configuration loading and typed config structures for the server.
//!
//! The configuration lives in `switchboard-config.yaml` at the project
//! root (or wherever `SWITCHBOARD_CONFIG` points). Every field has a
//! default, so a missing file or a partial file is fine.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use switchboard_gateway::ServerConfig;

/// Default config file name, relative to the working directory.
pub const DEFAULT_CONFIG_PATH: &str = "switchboard-config.yaml";

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },

    /// An environment override could not be parsed.
    #[error("invalid value for {var}: {value}: {source}")]
    InvalidEnv {
        /// The variable name.
        var: &'static str,
        /// The rejected value.
        value: String,
        /// Why the value was rejected.
        source: std::num::ParseIntError,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level server configuration.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct SwitchboardConfig {
    /// HTTP listener settings.
    #[serde(default)]
    pub server: HttpConfig,
    /// Where simulation definitions come from.
    #[serde(default)]
    pub simulations: SimulationsConfig,
    /// Log output settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl SwitchboardConfig {
    /// Load configuration from a YAML file, then apply environment
    /// overrides.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read,
    /// [`ConfigError::Yaml`] if it is not valid YAML, or
    /// [`ConfigError::InvalidEnv`] for an unparsable override.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse configuration from a YAML string, then apply environment
    /// overrides.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML, or
    /// [`ConfigError::InvalidEnv`] for an unparsable override.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let mut config: Self = serde_yml::from_str(yaml)?;
        config.apply_env_overrides()?;
        Ok(config)
    }

    /// Override settings from `SWITCHBOARD_HOST`, `SWITCHBOARD_PORT`, and
    /// `SWITCHBOARD_SIM_DIR`.
    ///
    /// This allows container deployments to move the listener or the
    /// simulation directory without editing the YAML file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidEnv`] if `SWITCHBOARD_PORT` is not a
    /// port number.
    pub fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        self.apply_overrides(|var| std::env::var(var).ok())
    }

    fn apply_overrides(
        &mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<(), ConfigError> {
        if let Some(host) = lookup("SWITCHBOARD_HOST") {
            self.server.host = host;
        }
        if let Some(port) = lookup("SWITCHBOARD_PORT") {
            self.server.port = port.parse().map_err(|source| ConfigError::InvalidEnv {
                var: "SWITCHBOARD_PORT",
                value: port.clone(),
                source,
            })?;
        }
        if let Some(dir) = lookup("SWITCHBOARD_SIM_DIR") {
            self.simulations.directory = PathBuf::from(dir);
        }
        Ok(())
    }
}

/// HTTP listener configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HttpConfig {
    /// Bind address.
    #[serde(default = "default_host")]
    pub host: String,

    /// Bind port.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Allowed CORS origins. Empty allows any origin.
    #[serde(default)]
    pub cors_origins: Vec<String>,

    /// Release an operator's phones when their last session closes.
    #[serde(default = "default_true")]
    pub release_on_disconnect: bool,
}

impl HttpConfig {
    /// The listener settings the gateway consumes.
    pub fn to_server_config(&self) -> ServerConfig {
        ServerConfig {
            host: self.host.clone(),
            port: self.port,
            cors_origins: self.cors_origins.clone(),
        }
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origins: Vec::new(),
            release_on_disconnect: true,
        }
    }
}

/// Simulation definition source.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SimulationsConfig {
    /// Directory of `*.yaml` simulation definitions, one per file.
    #[serde(default = "default_sim_dir")]
    pub directory: PathBuf,
}

impl Default for SimulationsConfig {
    fn default() -> Self {
        Self {
            directory: default_sim_dir(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error). `RUST_LOG` wins when set.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Emit JSON lines instead of human-readable output.
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_owned()
}

const fn default_port() -> u16 {
    8080
}

const fn default_true() -> bool {
    true
}

fn default_sim_dir() -> PathBuf {
    PathBuf::from("sims")
}

fn default_log_level() -> String {
    "info".to_owned()
}
