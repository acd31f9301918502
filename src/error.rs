//! Error types and handling for rdcmd
//!
//! This module defines all error types used throughout the crate. Every
//! variant carries owned context so a memoized command outcome can hand
//! the same error out any number of times.

use crate::result::ResultShape;
use thiserror::Error;

/// Main error type for rdcmd operations
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RdCmdError {
    #[error("unknown command '{command}' for key template '{family}'")]
    UnknownCommand { command: String, family: String },

    /// The store's canonical "no such entry" reply.
    #[error("nil reply: no such entry")]
    NotFound,

    #[error("server error: {message}")]
    Server { message: String },

    #[error("cannot decode reply as {shape}: {message}")]
    Decode { shape: ResultShape, message: String },

    #[error("result already resolved as {resolved}, requested {requested}")]
    ShapeMismatch {
        requested: ResultShape,
        resolved: ResultShape,
    },

    #[error("result not available until the pipeline is executed")]
    NotReady,

    #[error("Connection error: {message}")]
    ConnectionError {
        message: String,
        address: Option<String>,
    },

    #[error("Network error: {message}")]
    NetworkError {
        message: String,
        address: Option<String>,
    },

    #[error("Protocol error: {message}")]
    ProtocolError { message: String },

    #[error("Timeout error: {message}")]
    TimeoutError { message: String },

    #[error("Configuration error: {message}")]
    ConfigError {
        message: String,
        field: Option<String>,
    },

    #[error("Internal error: {message}")]
    InternalError {
        message: String,
        component: Option<String>,
    },
}

/// Convenience type alias for Results
pub type Result<T> = std::result::Result<T, RdCmdError>;

impl RdCmdError {
    pub(crate) fn decode(shape: ResultShape, message: impl Into<String>) -> Self {
        RdCmdError::Decode {
            shape,
            message: message.into(),
        }
    }

    pub(crate) fn protocol(message: impl Into<String>) -> Self {
        RdCmdError::ProtocolError {
            message: message.into(),
        }
    }

    /// True for the canonical "no such entry" error only
    pub fn is_not_found(&self) -> bool {
        matches!(self, RdCmdError::NotFound)
    }

    /// Check if the error stems from the caller (declaration or decoding
    /// mistakes) rather than from the store or the network
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            RdCmdError::UnknownCommand { .. }
                | RdCmdError::Decode { .. }
                | RdCmdError::ShapeMismatch { .. }
                | RdCmdError::NotReady
                | RdCmdError::ConfigError { .. }
        )
    }

    /// Render the error as a Redis-style error line
    pub fn to_client_error(&self) -> String {
        match self {
            RdCmdError::UnknownCommand { command, .. } => {
                format!("ERR unknown command '{command}'")
            }
            RdCmdError::NotFound => "ERR no such key".to_string(),
            RdCmdError::Server { message } => message.clone(),
            RdCmdError::Decode { shape, .. } => {
                format!("ERR reply does not decode as {shape}")
            }
            RdCmdError::ProtocolError { message } => format!("ERR protocol error: {message}"),
            _ => "ERR internal client error".to_string(),
        }
    }
}
