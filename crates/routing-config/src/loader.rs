//! Configuration loading.
//!
//! Resolution order: `ROUTING_ENGINE_CONFIG` env var, then
//! `routing-engine.yaml` / `routing-engine.toml` in the working directory,
//! then built-in defaults. `ROUTING_ENGINE_HOST` and `ROUTING_ENGINE_PORT`
//! override the file on top.

use crate::config::EngineConfig;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

/// Environment variable naming the config file
pub const CONFIG_PATH_ENV: &str = "ROUTING_ENGINE_CONFIG";

/// Environment variable overriding the bind host
pub const HOST_ENV: &str = "ROUTING_ENGINE_HOST";

/// Environment variable overriding the bind port
pub const PORT_ENV: &str = "ROUTING_ENGINE_PORT";

const DEFAULT_PATHS: &[&str] = &["routing-engine.yaml", "routing-engine.yml", "routing-engine.toml"];

/// Configuration loading error
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read
    #[error("failed to read config file {path}: {source}")]
    Io {
        /// Path that failed
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// The file could not be parsed
    #[error("failed to parse {format} config {path}: {message}")]
    Parse {
        /// Format that was attempted
        format: &'static str,
        /// Path that failed
        path: PathBuf,
        /// Parser message
        message: String,
    },

    /// The file extension is not supported
    #[error("unsupported config format for {path} (expected .yaml, .yml, or .toml)")]
    UnsupportedFormat {
        /// Path that failed
        path: PathBuf,
    },

    /// The configuration failed validation
    #[error("invalid configuration: {0}")]
    Validation(String),

    /// An environment override could not be applied
    #[error("invalid environment override {variable}: {message}")]
    EnvOverride {
        /// Variable name
        variable: &'static str,
        /// What went wrong
        message: String,
    },
}

/// Load configuration from the default locations
///
/// # Errors
/// Returns an error when a present file cannot be read, parsed, or
/// validated. A missing file is not an error; defaults apply.
pub async fn load_config() -> Result<EngineConfig, ConfigError> {
    let mut config = match resolve_path() {
        Some(path) => {
            info!(path = %path.display(), "Loading configuration file");
            load_from_path(&path).await?
        }
        None => {
            debug!("No configuration file found, using defaults");
            EngineConfig::default()
        }
    };

    apply_env_overrides(&mut config)?;
    config.validate().map_err(ConfigError::Validation)?;
    Ok(config)
}

/// Load configuration from a specific file
///
/// # Errors
/// Returns an error when the file cannot be read or parsed
pub async fn load_from_path(path: impl AsRef<Path>) -> Result<EngineConfig, ConfigError> {
    let path = path.as_ref();
    let contents = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

    match path.extension().and_then(|ext| ext.to_str()) {
        Some("yaml" | "yml") => {
            serde_yaml::from_str(&contents).map_err(|e| ConfigError::Parse {
                format: "yaml",
                path: path.to_path_buf(),
                message: e.to_string(),
            })
        }
        Some("toml") => toml::from_str(&contents).map_err(|e| ConfigError::Parse {
            format: "toml",
            path: path.to_path_buf(),
            message: e.to_string(),
        }),
        _ => Err(ConfigError::UnsupportedFormat {
            path: path.to_path_buf(),
        }),
    }
}

fn resolve_path() -> Option<PathBuf> {
    if let Ok(path) = std::env::var(CONFIG_PATH_ENV) {
        return Some(PathBuf::from(path));
    }

    DEFAULT_PATHS
        .iter()
        .map(|candidate| PathBuf::from(*candidate))
        .find(|path| path.exists())
}

/// Apply `ROUTING_ENGINE_HOST` / `ROUTING_ENGINE_PORT` on top of the file
fn apply_env_overrides(config: &mut EngineConfig) -> Result<(), ConfigError> {
    if let Ok(host) = std::env::var(HOST_ENV) {
        config.server.host = host;
    }

    if let Ok(port) = std::env::var(PORT_ENV) {
        config.server.port = port.parse().map_err(|_| ConfigError::EnvOverride {
            variable: PORT_ENV,
            message: format!("'{port}' is not a valid port"),
        })?;
    }

    Ok(())
}
