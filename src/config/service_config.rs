//! Service Configuration - server, model defaults and request handling as TOML values
//!
//! Every struct implements `Default`, so a missing file or a missing section
//! behaves exactly like the built-in service.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

use super::defaults;

// ============================================================================
// Top-Level Config
// ============================================================================

/// Root configuration for the prediction service.
///
/// Load with `ServiceConfig::load()` which searches:
/// 1. `$UF_BACKWASH_CONFIG` env var
/// 2. `./uf_backwash.toml`
/// 3. Built-in defaults
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// HTTP server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Model identity and request defaults
    #[serde(default)]
    pub model: ModelConfig,

    /// Random source for the engine
    #[serde(default)]
    pub simulation: SimulationConfig,

    /// Request validation strictness
    #[serde(default)]
    pub validation: ValidationConfig,

    /// In-memory prediction log
    #[serde(default)]
    pub history: HistoryConfig,

    /// Cross-origin policy
    #[serde(default)]
    pub cors: CorsConfig,
}

impl ServiceConfig {
    /// Load configuration using the standard search order:
    /// 1. `$UF_BACKWASH_CONFIG` environment variable
    /// 2. `./uf_backwash.toml` in the current working directory
    /// 3. Built-in defaults
    pub fn load() -> Self {
        if let Ok(path) = std::env::var(defaults::CONFIG_PATH_ENV) {
            let p = PathBuf::from(&path);
            if p.exists() {
                match Self::load_from_file(&p) {
                    Ok(config) => {
                        info!(path = %p.display(), "Loaded service config from {}", defaults::CONFIG_PATH_ENV);
                        return config;
                    }
                    Err(e) => {
                        warn!(path = %p.display(), error = %e, "Failed to load config from {}, falling back", defaults::CONFIG_PATH_ENV);
                    }
                }
            } else {
                warn!(path = %path, "{} points to non-existent file, falling back", defaults::CONFIG_PATH_ENV);
            }
        }

        let local = PathBuf::from(defaults::LOCAL_CONFIG_FILE);
        if local.exists() {
            match Self::load_from_file(&local) {
                Ok(config) => {
                    info!("Loaded service config from ./{}", defaults::LOCAL_CONFIG_FILE);
                    return config;
                }
                Err(e) => {
                    warn!(error = %e, "Failed to load ./{}, using defaults", defaults::LOCAL_CONFIG_FILE);
                }
            }
        }

        info!("No {} found, using built-in defaults", defaults::LOCAL_CONFIG_FILE);
        Self::default()
    }

    /// Load from a specific TOML file path.
    ///
    /// Unknown keys are logged as warnings; values that break internal
    /// consistency are an error.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents =
            std::fs::read_to_string(path).map_err(|e| ConfigError::Io(path.to_path_buf(), e))?;
        Self::from_toml_str(&contents).map_err(|e| match e {
            ConfigError::Toml(inner) => ConfigError::Parse(path.to_path_buf(), inner),
            other => other,
        })
    }

    /// Parse and validate a TOML document.
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        for w in super::validation::validate_unknown_keys(contents) {
            warn!("{}", w);
        }

        let config: Self = toml::from_str(contents).map_err(ConfigError::Toml)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize the current config to a TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(ConfigError::Serialize)
    }

    /// Write the config out, e.g. to seed a file with the defaults.
    pub fn save_to_file(&self, path: &Path) -> Result<(), ConfigError> {
        let contents = self.to_toml()?;
        std::fs::write(path, contents).map_err(|e| ConfigError::Io(path.to_path_buf(), e))?;
        info!(path = %path.display(), "Service config saved");
        Ok(())
    }

    /// Validate values for internal consistency.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let (errors, warnings) = super::validation::validate_ranges(self);
        for w in &warnings {
            warn!("{}", w);
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Validation(errors))
        }
    }

    /// Bind address with `UF_SERVER_ADDR` applied on top of the file value.
    pub fn resolved_addr(&self) -> String {
        std::env::var(defaults::SERVER_ADDR_ENV).unwrap_or_else(|_| self.server.addr.clone())
    }
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config I/O error ({}): {1}", .0.display())]
    Io(PathBuf, #[source] std::io::Error),

    #[error("Config parse error ({}): {1}", .0.display())]
    Parse(PathBuf, #[source] toml::de::Error),

    #[error("Config parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Config serialization error: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Config validation failed:\n{}", format_errors(.0))]
    Validation(Vec<String>),
}

fn format_errors(errors: &[String]) -> String {
    errors.iter().map(|e| format!("  - {e}")).collect::<Vec<_>>().join("\n")
}

// ============================================================================
// Sections
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// HTTP server bind address.
    ///
    /// Can be overridden by `UF_SERVER_ADDR` env var or `--addr` CLI flag.
    #[serde(default = "default_server_addr")]
    pub addr: String,
}

fn default_server_addr() -> String {
    defaults::DEFAULT_SERVER_ADDR.to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: default_server_addr(),
        }
    }
}

/// Model identity and the values applied when a request omits them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Reported as `model_version` in responses
    #[serde(default = "default_model_version")]
    pub version: String,

    #[serde(default = "default_time_steps")]
    pub default_time_steps: usize,

    /// Threshold (PSIG) for basic predictions that omit one
    #[serde(default = "default_pressure_threshold")]
    pub default_pressure_threshold: f64,

    /// Largest accepted horizon; may not exceed the hard limit of 50
    #[serde(default = "default_max_time_steps")]
    pub max_time_steps: usize,
}

fn default_model_version() -> String {
    defaults::MODEL_VERSION.to_string()
}
fn default_time_steps() -> usize {
    defaults::DEFAULT_TIME_STEPS
}
fn default_pressure_threshold() -> f64 {
    defaults::DEFAULT_PRESSURE_THRESHOLD
}
fn default_max_time_steps() -> usize {
    crate::validation::MAX_TIME_STEPS
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            version: default_model_version(),
            default_time_steps: default_time_steps(),
            default_pressure_threshold: default_pressure_threshold(),
            max_time_steps: default_max_time_steps(),
        }
    }
}

/// When `seed` is set every request replays the same random draws.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    #[serde(default)]
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValidationConfig {
    /// Reject fouling statuses outside the five known labels instead of
    /// treating them as clean
    #[serde(default)]
    pub strict_fouling_status: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryConfig {
    /// Records kept in memory, oldest evicted first
    #[serde(default = "default_history_capacity")]
    pub capacity: usize,
}

fn default_history_capacity() -> usize {
    defaults::HISTORY_CAPACITY
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            capacity: default_history_capacity(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CorsConfig {
    /// Allowed origins. Empty allows any origin.
    ///
    /// Can be overridden by the comma-separated `UF_CORS_ORIGINS` env var.
    #[serde(default)]
    pub allowed_origins: Vec<String>,
}
