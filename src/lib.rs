//! rdcmd - declarative command templates for Redis-compatible stores
//!
//! Commands are declared once as templates grouped into families, then
//! invoked by name with a map of arguments. Replies come back through typed
//! handles, either immediately or when a pipeline is executed.

// Core modules
pub mod config;
pub mod error;
pub mod logging;

// Feature modules
pub mod builder;
pub mod cli;
pub mod client;
pub mod commands;
pub mod dispatch;
pub mod network;
pub mod result;
pub mod template;

// Public API exports
pub use config::Config;
pub use error::{RdCmdError, Result};

// Test utilities (only available in test builds)
#[cfg(test)]
pub mod test_utils;

// Re-export commonly used types
pub use builder::CommandBuilder;
pub use client::Client;
pub use commands::with_ttl_commands;
pub use dispatch::{dispatch, CommandSink, DirectSink, Pipeline};
pub use logging::LoggingSystem;
pub use network::{RespValue, TcpTransport, Transport};
pub use result::{Reply, ResultHandle, ResultShape, ShapeOutput, TypedHandle};
pub use template::{assemble, ArgValue, Args, CommandFamily, ExpirePolicy, SubCommand};
