//! Application settings loading from config.toml
//!
//! Every key is optional. A missing file yields the defaults; a file that
//! exists but cannot be parsed is an error. The `PORT` environment variable
//! overrides `server.port`.

use crate::errors::{Error, Result};
use serde::Deserialize;
use std::net::SocketAddr;
use std::path::Path;

/// Configuration structure representing the entire config.toml file
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// HTTP listener settings
    pub server: ServerConfig,
    /// Dashboard and report settings
    pub reports: ReportsConfig,
}

/// `[server]` table
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Interface to bind
    pub host: String,
    /// TCP port to bind
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
        }
    }
}

/// `[reports]` table
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ReportsConfig {
    /// How many monthly buckets the earnings chart keeps
    pub chart_months: usize,
    /// Symbol prefixed to formatted amounts
    pub currency_symbol: String,
}

impl Default for ReportsConfig {
    fn default() -> Self {
        Self {
            chart_months: 6,
            currency_symbol: "₹".to_string(),
        }
    }
}

impl AppConfig {
    /// Applies environment overrides (`PORT`).
    pub fn with_env_overrides(mut self) -> Result<Self> {
        if let Ok(port) = std::env::var("PORT") {
            self.server.port = port.parse().map_err(|e| Error::Config {
                message: format!("Invalid PORT value {port:?}: {e}"),
            })?;
        }
        Ok(self)
    }

    /// Socket address built from `server.host` and `server.port`.
    pub fn bind_address(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| Error::Config {
                message: format!(
                    "Invalid server address {}:{}: {e}",
                    self.server.host, self.server.port
                ),
            })
    }
}

/// Parses configuration from a TOML string.
pub fn parse_config(contents: &str) -> Result<AppConfig> {
    toml::from_str(contents).map_err(|e| Error::Config {
        message: format!("Failed to parse config.toml: {e}"),
    })
}

/// Loads configuration from a TOML file, returning defaults if the file does not exist.
///
/// # Errors
/// Returns an error if the file exists but cannot be read or its TOML is invalid.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<AppConfig> {
    let path = path.as_ref();
    if !path.exists() {
        tracing::debug!("No config file at {path:?}, using defaults");
        return Ok(AppConfig::default());
    }

    let contents = std::fs::read_to_string(path).map_err(|e| Error::Config {
        message: format!("Failed to read config file: {e}"),
    })?;
    parse_config(&contents)
}

/// Loads configuration from the default location (./config.toml) and applies
/// environment overrides.
pub fn load_default_config() -> Result<AppConfig> {
    load_config("config.toml")?.with_env_overrides()
}
