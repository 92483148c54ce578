//! Chatroom Relay - Entry Point
//!
//! Loads the configuration and serves the chatroom over TCP until Ctrl-C.

use env_logger::Env;
use log::{error, info};

use chatroom_relay::error::RelayError;
use chatroom_relay::error::handlers::handle_error;
use chatroom_relay::{RelayConfig, Server};

#[tokio::main]
async fn main() {
    // Initialize the logger (env_logger picks up RUST_LOG environment variable)
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    info!("Launching chatroom relay...");

    let config = match RelayConfig::load() {
        Ok(config) => config,
        Err(e) => {
            handle_error(&RelayError::from(e));
            std::process::exit(1);
        }
    };

    let server = match Server::bind(config).await {
        Ok(server) => server,
        Err(e) => {
            error!("Relay startup failed");
            handle_error(&e);
            std::process::exit(1);
        }
    };

    server.start().await;
}
