//! HTTP server
//!
//! Configuration, startup, and request routing.

pub mod config;
pub mod core;
pub mod routes;

pub use config::ServerConfig;
pub use core::{Server, ServerContext};
pub use routes::build_router;
