//! Server startup
//!
//! Binds the listener, pins down the canonical server root, and runs
//! the accept loop through axum.

use log::{error, info};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::TcpListener;

use crate::server::config::ServerConfig;
use crate::server::routes::build_router;

/// Process-wide request context: the canonical root and the loaded
/// configuration. Read-only after startup.
pub struct ServerContext {
    pub root: PathBuf,
    pub config: ServerConfig,
}

pub struct Server {
    context: Arc<ServerContext>,
    listener: TcpListener,
}

impl Server {
    pub async fn new(config: ServerConfig) -> Self {
        let addr = config.socket_addr();
        let listener = match TcpListener::bind(&addr).await {
            Ok(listener) => {
                info!("Server bound to {addr}");
                listener
            }
            Err(e) => {
                error!("Failed to bind to {addr}: {e}");
                panic!("Server startup failed on socket {addr}: {e}");
            }
        };

        // The root must exist and be canonical before the first request
        // so the resolver's containment check has a fixed anchor.
        if let Err(e) = tokio::fs::create_dir_all(config.server_root_path()).await {
            error!("Failed to create server root {}: {e}", config.server_root);
            panic!("Server root {} unavailable: {e}", config.server_root);
        }
        let root = match tokio::fs::canonicalize(config.server_root_path()).await {
            Ok(root) => root,
            Err(e) => {
                error!("Failed to canonicalize {}: {e}", config.server_root);
                panic!("Server root {} unavailable: {e}", config.server_root);
            }
        };

        info!("Serving files from {}", root.display());

        Self {
            context: Arc::new(ServerContext { root, config }),
            listener,
        }
    }

    pub async fn start(self) {
        let router = build_router(Arc::clone(&self.context));

        info!(
            "Listening on {} (root {})",
            self.context.config.socket_addr(),
            self.context.root.display()
        );

        if let Err(e) = axum::serve(self.listener, router).await {
            error!("Server error: {e}");
        }
    }
}
