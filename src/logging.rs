//! Structured logging setup for rdcmd
//!
//! Installs a tracing subscriber with an env filter and one of the
//! configured output formats, writing to the console or to a file.

use crate::config::{Config, LogFormat};
use crate::error::{RdCmdError, Result};
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn, Level};
use tracing_subscriber::{
    fmt::{self, time::ChronoUtc, writer::BoxMakeWriter},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter, Registry,
};

/// Logging system manager that handles subscriber setup
#[derive(Debug)]
pub struct LoggingSystem {
    config: Config,
}

impl LoggingSystem {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Install the global subscriber.
    ///
    /// An already installed subscriber is kept and only reported.
    pub fn initialize(&self) -> Result<()> {
        let level = parse_log_level(&self.config.logging.level)?;

        let env_filter = EnvFilter::builder()
            .with_default_directive(level.into())
            .from_env_lossy();

        let (writer, to_file) = match &self.config.logging.file_path {
            Some(path) => (file_writer(path)?, true),
            None => (BoxMakeWriter::new(std::io::stderr), false),
        };

        let registry = Registry::default().with(env_filter);
        let installed = match self.config.logging.format {
            LogFormat::Json => registry
                .with(
                    fmt::layer()
                        .json()
                        .with_writer(writer)
                        .with_current_span(false)
                        .with_span_list(true)
                        .with_timer(ChronoUtc::rfc_3339())
                        .with_target(true)
                        .with_file(true)
                        .with_line_number(true),
                )
                .try_init(),
            LogFormat::Pretty => registry
                .with(
                    fmt::layer()
                        .pretty()
                        .with_writer(writer)
                        .with_ansi(!to_file)
                        .with_timer(ChronoUtc::rfc_3339())
                        .with_target(true),
                )
                .try_init(),
            LogFormat::Compact => registry
                .with(
                    fmt::layer()
                        .compact()
                        .with_writer(writer)
                        .with_ansi(!to_file)
                        .with_timer(ChronoUtc::rfc_3339())
                        .with_target(to_file),
                )
                .try_init(),
        };

        if let Err(e) = installed {
            warn!(
                "Failed to initialize tracing subscriber (may already be set): {}",
                e
            );
            return Ok(());
        }

        info!(
            "Logging initialized at level {} ({:?})",
            self.config.logging.level, self.config.logging.format
        );
        Ok(())
    }
}

/// Parse log level string to tracing Level
pub fn parse_log_level(level: &str) -> Result<Level> {
    match level.to_lowercase().as_str() {
        "trace" => Ok(Level::TRACE),
        "debug" => Ok(Level::DEBUG),
        "info" => Ok(Level::INFO),
        "warn" => Ok(Level::WARN),
        "error" => Ok(Level::ERROR),
        _ => Err(RdCmdError::ConfigError {
            message: format!("Invalid log level: {level}"),
            field: Some("logging.level".to_string()),
        }),
    }
}

fn file_writer(path: &Path) -> Result<BoxMakeWriter> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| logging_error("create log directory", e))?;
    }

    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| logging_error("open log file", e))?;

    Ok(BoxMakeWriter::new(Arc::new(file)))
}

fn logging_error(action: &str, e: std::io::Error) -> RdCmdError {
    RdCmdError::InternalError {
        message: format!("Failed to {action}: {e}"),
        component: Some("logging".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_parse_log_level() {
        assert!(matches!(parse_log_level("trace"), Ok(Level::TRACE)));
        assert!(matches!(parse_log_level("debug"), Ok(Level::DEBUG)));
        assert!(matches!(parse_log_level("INFO"), Ok(Level::INFO)));
        assert!(matches!(parse_log_level("Warn"), Ok(Level::WARN)));
        assert!(matches!(parse_log_level("error"), Ok(Level::ERROR)));
        assert!(parse_log_level("invalid").is_err());
    }

    #[test]
    fn test_invalid_level_fails_initialization() {
        let mut config = Config::default();
        config.logging.level = "chatty".to_string();
        let err = LoggingSystem::new(config).initialize().unwrap_err();
        assert!(matches!(err, RdCmdError::ConfigError { .. }));
    }

    #[test]
    fn test_file_writer_creates_missing_directories() {
        let temp_dir = TempDir::new().unwrap();
        let log_path = temp_dir.path().join("logs").join("rdcmd.log");

        file_writer(&log_path).unwrap();
        assert!(log_path.exists());
    }

    #[test]
    fn test_unwritable_log_path() {
        let temp_dir = TempDir::new().unwrap();
        let blocker = temp_dir.path().join("not-a-dir");
        std::fs::write(&blocker, b"").unwrap();

        let mut config = Config::default();
        config.logging.file_path = Some(blocker.join("rdcmd.log"));
        let err = LoggingSystem::new(config).initialize().unwrap_err();
        assert!(matches!(err, RdCmdError::InternalError { .. }));
    }
}
