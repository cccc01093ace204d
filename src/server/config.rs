//! Configuration management
//!
//! Loads settings from an optional `config.toml` with environment
//! overrides, on top of built-in defaults. All values are fixed for
//! the lifetime of the process.

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::PathBuf;

/// Server configuration, read once at startup.
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    /// IP address to bind the HTTP listener
    pub bind_address: String,

    /// HTTP listening port
    pub port: u16,

    /// Root directory all file operations are confined to
    pub server_root: String,

    /// Maximum accepted request body size in MB
    pub max_upload_mb: u64,
}

impl ServerConfig {
    /// Load configuration from defaults, `config.toml` (optional), and
    /// `WEBEDIT_*` environment variables, in increasing precedence.
    pub fn load() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .set_default("bind_address", "0.0.0.0")?
            .set_default("port", 8080)?
            .set_default("server_root", "www")?
            .set_default("max_upload_mb", 100)?
            .add_source(File::with_name("config").required(false))
            .add_source(Environment::with_prefix("WEBEDIT"))
            .build()?;

        let config: ServerConfig = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.port == 0 {
            return Err(ConfigError::Message("port cannot be 0".into()));
        }

        if self.server_root.is_empty() {
            return Err(ConfigError::Message("server_root cannot be empty".into()));
        }

        if self.max_upload_mb == 0 {
            return Err(ConfigError::Message(
                "max_upload_mb must be greater than 0".into(),
            ));
        }

        Ok(())
    }

    /// Get bind address and port as a socket address string
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.bind_address, self.port)
    }

    /// Get server root as PathBuf
    pub fn server_root_path(&self) -> PathBuf {
        PathBuf::from(&self.server_root)
    }

    /// Get the request body cap in bytes
    pub fn max_upload_bytes(&self) -> usize {
        (self.max_upload_mb as usize) * 1024 * 1024
    }
}
