//! CLI command definitions using clap

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// rdcmd CLI client
#[derive(Debug, Parser)]
#[command(name = "rdcmd-cli")]
#[command(about = "Render and run templated commands against a Redis-compatible store")]
#[command(version)]
pub struct Cli {
    /// Server address; overrides the configuration
    #[arg(short, long)]
    pub address: Option<String>,

    /// TOML configuration file (defaults to $RDCMD_CONFIG)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Assemble a template and print its tokens without connecting
    Render {
        /// Key template, e.g. "user:{{id}}"
        #[arg(short, long, default_value = "")]
        key: String,
        /// Argument template, e.g. "{{field}} {{value}}"
        #[arg(short, long, default_value = "")]
        template: String,
        /// Wire verb when it differs from the operation name
        #[arg(long)]
        verb: Option<String>,
        /// Emit the key template literally
        #[arg(long)]
        without_key: bool,
        /// Runtime argument as name=value; repeatable
        #[arg(short = 'a', long = "arg", value_parser = parse_assignment)]
        args: Vec<(String, String)>,
        /// Operation name
        name: String,
        /// Tokens appended after the templated arguments
        trailing: Vec<String>,
    },
    /// Send raw tokens and decode the reply with a result shape
    Exec {
        /// Result shape name, e.g. "int" or "map-string-string"
        #[arg(short, long, default_value = "generic")]
        shape: String,
        /// Command and its arguments
        #[arg(required = true, num_args = 1..)]
        tokens: Vec<String>,
    },
    /// Set expiration time for a key
    Expire { key: String, seconds: u64 },
    /// Get time to live for a key
    Ttl { key: String },
}

/// Parse `name=value`
pub fn parse_assignment(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((name, value)) if !name.is_empty() => Ok((name.to_string(), value.to_string())),
        _ => Err(format!("expected name=value, got '{raw}'")),
    }
}
