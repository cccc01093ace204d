//! Web File Editor - Entry Point
//!
//! An HTTP file management server confined to a single root directory.

use log::{error, info};

use webedit_server::server::{Server, ServerConfig};

#[tokio::main]
async fn main() {
    // Initialize the logger (env_logger picks up RUST_LOG environment variable)
    env_logger::init();

    info!("Launching web file editor...");

    let config = match ServerConfig::load() {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    let server = Server::new(config).await;
    server.start().await;
}
