//! Store server configuration module.
//!
//! Configuration is loaded from environment variables with fallback to defaults.

use std::env;
use std::path::PathBuf;

/// Store server configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    /// HTTP port
    pub port: u16,

    /// Address to bind (default: 0.0.0.0)
    pub bind_addr: String,

    /// SQLite database file
    pub database_path: PathBuf,

    /// Maximum pooled connections
    pub db_max_connections: u32,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            port: 8787,
            bind_addr: "0.0.0.0".to_string(),
            database_path: PathBuf::from("./devis_store.db"),
            db_max_connections: 5,
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = ServerConfig::default();

        let config = ServerConfig {
            port: match lookup("DEVIS_PORT") {
                Some(value) => value
                    .parse()
                    .map_err(|_| ConfigError::InvalidValue("DEVIS_PORT".to_string()))?,
                None => defaults.port,
            },

            bind_addr: lookup("DEVIS_BIND_ADDR").unwrap_or(defaults.bind_addr),

            database_path: lookup("DEVIS_DATABASE_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.database_path),

            db_max_connections: match lookup("DEVIS_DB_MAX_CONNECTIONS") {
                Some(value) => value.parse().map_err(|_| {
                    ConfigError::InvalidValue("DEVIS_DB_MAX_CONNECTIONS".to_string())
                })?,
                None => defaults.db_max_connections,
            },
        };

        if config.bind_addr.trim().is_empty() {
            return Err(ConfigError::MissingRequired("DEVIS_BIND_ADDR".to_string()));
        }
        if config.db_max_connections == 0 {
            return Err(ConfigError::InvalidValue(
                "DEVIS_DB_MAX_CONNECTIONS".to_string(),
            ));
        }

        Ok(config)
    }

    /// Returns the full bind address.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.bind_addr, self.port)
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),

    #[error("Missing required configuration: {0}")]
    MissingRequired(String),
}
