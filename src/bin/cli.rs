//! rdcmd CLI client binary
//!
//! Renders command templates and runs single commands against a server

use clap::Parser;
use rdcmd::cli::{run, Cli};
use rdcmd::{Client, Config, LoggingSystem, TcpTransport};
use std::sync::Arc;
use tracing::error;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::from_file(path).and_then(|config| {
            config.validate()?;
            Ok(config)
        }),
        None => Config::load(),
    };
    let mut config = match config {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Invalid configuration: {e}");
            std::process::exit(2);
        }
    };
    if let Some(address) = cli.address {
        config.client.address = address;
    }

    if let Err(e) = LoggingSystem::new(config.clone()).initialize() {
        eprintln!("Failed to initialize logging: {e}");
    }

    let transport = Arc::new(TcpTransport::from_config(config.client.clone()));
    let client = Client::from_arc(transport.clone());

    let outcome = run(cli.command, &client).await;

    if let Err(e) = transport.disconnect().await {
        error!("Error during disconnect: {}", e);
    }

    match outcome {
        Ok(output) => println!("{output}"),
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }
}
