//! File relay - Entry Point
//!
//! Receives media from a single user into a download root and sends files
//! from an upload root back on request.

use log::{error, info};
use std::process::ExitCode;
use std::sync::Arc;

use file_relay::Relay;
use file_relay::Server;
use file_relay::config::RelayConfig;
use file_relay::storage::Roots;
use file_relay::transport::LocalTransport;

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize the logger (RUST_LOG overrides the default level)
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // Nothing may touch the transport before configuration is valid
    let config = match RelayConfig::load() {
        Ok(config) => Arc::new(config),
        Err(e) => {
            error!("Invalid configuration: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let roots = match Roots::from_config(&config) {
        Ok(roots) => roots,
        Err(e) => {
            error!("Cannot prepare storage roots: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let transport = match LocalTransport::new(&config.console_inbox, &config.console_outbox) {
        Ok(transport) => Arc::new(transport),
        Err(e) => {
            error!("Cannot prepare console transport: {}", e);
            return ExitCode::FAILURE;
        }
    };

    info!(
        "Launching file relay for user {}...",
        config.allowed_user_id
    );

    let server = Server::new(Relay::new(config, roots, transport));
    match server.start().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Console read failed: {}", e);
            ExitCode::FAILURE
        }
    }
}
