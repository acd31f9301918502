//! Configuration management for rdcmd
//!
//! This module handles loading and validating configuration from TOML
//! files and environment variables.

use crate::error::{RdCmdError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable naming a TOML file for [`Config::load`]
pub const CONFIG_PATH_ENV: &str = "RDCMD_CONFIG";

const ENV_PREFIX: &str = "RDCMD_";

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub client: ClientConfig,
    pub logging: LoggingConfig,
}

/// Connection settings for the TCP transport
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ClientConfig {
    pub address: String,
    pub tcp_nodelay: bool,
    /// Seconds
    pub connect_timeout: u64,
    /// Seconds
    pub read_timeout: u64,
    /// Seconds
    pub write_timeout: u64,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
    pub file_path: Option<PathBuf>,
}

/// Log output format
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum LogFormat {
    Json,
    Pretty,
    Compact,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            address: "127.0.0.1:6379".to_string(),
            tcp_nodelay: true,
            connect_timeout: 5,
            read_timeout: 30,
            write_timeout: 30,
        }
    }
}

impl ClientConfig {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout)
    }

    pub fn read_timeout(&self) -> Duration {
        Duration::from_secs(self.read_timeout)
    }

    pub fn write_timeout(&self) -> Duration {
        Duration::from_secs(self.write_timeout)
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Pretty,
            file_path: None,
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| RdCmdError::ConfigError {
            message: format!("Failed to read config file {}: {e}", path.display()),
            field: None,
        })?;
        Self::from_toml(&content)
    }

    /// Parse configuration from TOML text
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| RdCmdError::ConfigError {
            message: format!("Invalid TOML: {e}"),
            field: None,
        })
    }

    /// Load the file named by `RDCMD_CONFIG` (or defaults), apply `RDCMD_*`
    /// environment overrides and validate the result
    pub fn load() -> Result<Self> {
        let mut config = match std::env::var(CONFIG_PATH_ENV) {
            Ok(path) => Self::from_file(path)?,
            Err(_) => Self::default(),
        };
        config.apply_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    fn apply_env_overrides(&mut self) -> Result<()> {
        if let Some(address) = env_var("ADDRESS") {
            self.client.address = address;
        }
        if let Some(value) = env_var("TCP_NODELAY") {
            self.client.tcp_nodelay = parse_env("TCP_NODELAY", &value)?;
        }
        if let Some(value) = env_var("CONNECT_TIMEOUT") {
            self.client.connect_timeout = parse_env("CONNECT_TIMEOUT", &value)?;
        }
        if let Some(value) = env_var("READ_TIMEOUT") {
            self.client.read_timeout = parse_env("READ_TIMEOUT", &value)?;
        }
        if let Some(value) = env_var("WRITE_TIMEOUT") {
            self.client.write_timeout = parse_env("WRITE_TIMEOUT", &value)?;
        }
        if let Some(level) = env_var("LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(format) = env_var("LOG_FORMAT") {
            self.logging.format = match format.to_lowercase().as_str() {
                "json" => LogFormat::Json,
                "pretty" => LogFormat::Pretty,
                "compact" => LogFormat::Compact,
                _ => {
                    return Err(RdCmdError::ConfigError {
                        message: format!("Invalid log format: {format}"),
                        field: Some("logging.format".to_string()),
                    })
                }
            };
        }
        if let Some(path) = env_var("LOG_FILE") {
            self.logging.file_path = Some(PathBuf::from(path));
        }
        Ok(())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.client.address.trim().is_empty() {
            return Err(invalid("client.address", "address must not be empty"));
        }
        if self.client.connect_timeout == 0 {
            return Err(invalid("client.connect_timeout", "timeout must be positive"));
        }
        if self.client.read_timeout == 0 {
            return Err(invalid("client.read_timeout", "timeout must be positive"));
        }
        if self.client.write_timeout == 0 {
            return Err(invalid("client.write_timeout", "timeout must be positive"));
        }
        match self.logging.level.to_lowercase().as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => Ok(()),
            other => Err(invalid(
                "logging.level",
                &format!("Invalid log level: {other}"),
            )),
        }
    }
}

fn env_var(name: &str) -> Option<String> {
    std::env::var(format!("{ENV_PREFIX}{name}")).ok()
}

fn parse_env<T: std::str::FromStr>(name: &str, value: &str) -> Result<T> {
    value.parse::<T>().map_err(|_| RdCmdError::ConfigError {
        message: format!("Invalid value for {ENV_PREFIX}{name}: {value}"),
        field: Some(name.to_lowercase()),
    })
}

fn invalid(field: &str, message: &str) -> RdCmdError {
    RdCmdError::ConfigError {
        message: message.to_string(),
        field: Some(field.to_string()),
    }
}
