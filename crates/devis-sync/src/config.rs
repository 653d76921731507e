//! # Client Configuration
//!
//! Where the store service lives and how to talk to it.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     DEVIS_STORE_URL=http://192.168.1.20:8787                           │
//! │     DEVIS_API_KEY=...                                                  │
//! │     DEVIS_TIMEOUT_SECS=10                                              │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     ~/.config/imprimeur/client.toml (Linux)                            │
//! │     ~/Library/Application Support/com.devis.imprimeur/client.toml      │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     http://127.0.0.1:8787, no key, 10 s timeout                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # client.toml
//! [store]
//! url = "http://127.0.0.1:8787"
//! api_key = ""
//! timeout_secs = 10
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;

use crate::error::{SyncError, SyncResult};

// =============================================================================
// Store Settings
// =============================================================================

/// How to reach the store service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreSettings {
    /// Base URL of the store service.
    #[serde(default = "default_store_url")]
    pub url: String,

    /// Sent as a bearer token when not empty.
    #[serde(default)]
    pub api_key: String,

    /// Per-request timeout (seconds).
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

fn default_store_url() -> String {
    "http://127.0.0.1:8787".to_string()
}

fn default_timeout() -> u64 {
    10
}

impl Default for StoreSettings {
    fn default() -> Self {
        StoreSettings {
            url: default_store_url(),
            api_key: String::new(),
            timeout_secs: default_timeout(),
        }
    }
}

// =============================================================================
// Main Client Configuration
// =============================================================================

/// Complete client configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Store service settings.
    #[serde(default)]
    pub store: StoreSettings,
}

impl ClientConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (client.toml)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> SyncResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading client config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Loads config or returns default if load fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load client config: {}. Using defaults.", e);
            Self::default()
        })
    }

    /// Saves configuration to file.
    pub fn save(&self, config_path: Option<PathBuf>) -> SyncResult<()> {
        let path = config_path
            .or_else(Self::default_config_path)
            .ok_or_else(|| SyncError::ConfigSaveFailed("No config path available".into()))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| SyncError::ConfigSaveFailed(e.to_string()))?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(&path, contents).map_err(|e| SyncError::ConfigSaveFailed(e.to_string()))?;

        info!(?path, "Client config saved");
        Ok(())
    }

    /// Validates the configuration.
    pub fn validate(&self) -> SyncResult<()> {
        let url = Url::parse(&self.store.url)?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(SyncError::InvalidUrl(format!(
                "Store URL must start with http:// or https://, got: {}",
                self.store.url
            )));
        }

        if self.store.timeout_secs == 0 {
            return Err(SyncError::InvalidConfig(
                "timeout_secs must be greater than 0".into(),
            ));
        }

        Ok(())
    }

    /// Applies environment variable overrides.
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup("DEVIS_STORE_URL") {
            debug!(url = %url, "Overriding store URL from environment");
            self.store.url = url;
        }

        if let Some(key) = lookup("DEVIS_API_KEY") {
            self.store.api_key = key;
        }

        if let Some(timeout) = lookup("DEVIS_TIMEOUT_SECS") {
            match timeout.parse::<u64>() {
                Ok(secs) => self.store.timeout_secs = secs,
                Err(_) => warn!(value = %timeout, "Ignoring invalid DEVIS_TIMEOUT_SECS"),
            }
        }
    }

    /// Returns the default config file path.
    fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "devis", "imprimeur")
            .map(|dirs| dirs.config_dir().join("client.toml"))
    }

    // =========================================================================
    // Convenience Methods
    // =========================================================================

    /// Returns the store URL.
    pub fn store_url(&self) -> &str {
        &self.store.url
    }

    /// Returns the API key, if one is configured.
    pub fn api_key(&self) -> Option<&str> {
        Some(self.store.api_key.as_str()).filter(|key| !key.is_empty())
    }

    /// Returns the request timeout.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.store.timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_config() {
        let config = ClientConfig::default();
        assert_eq!(config.store_url(), "http://127.0.0.1:8787");
        assert_eq!(config.api_key(), None);
        assert_eq!(config.timeout(), Duration::from_secs(10));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        let mut config = ClientConfig::default();

        config.store.url = "ws://localhost:8787".to_string();
        assert!(config.validate().unwrap_err().is_config_error());

        config.store.url = "not a url".to_string();
        assert!(config.validate().is_err());

        config.store.url = "https://devis.example.com".to_string();
        config.store.timeout_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_overrides() {
        let env: HashMap<&str, &str> = HashMap::from([
            ("DEVIS_STORE_URL", "http://10.0.0.5:9000"),
            ("DEVIS_API_KEY", "secret"),
            ("DEVIS_TIMEOUT_SECS", "nope"),
        ]);

        let mut config = ClientConfig::default();
        config.apply_overrides(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.store_url(), "http://10.0.0.5:9000");
        assert_eq!(config.api_key(), Some("secret"));
        // Invalid number keeps the previous value
        assert_eq!(config.store.timeout_secs, 10);
    }

    #[test]
    fn test_toml_round_trip() {
        let toml_str = r#"
            [store]
            url = "http://print-server:8787"
            timeout_secs = 3
        "#;
        let config: ClientConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.store.url, "http://print-server:8787");
        assert_eq!(config.store.api_key, "");
        assert_eq!(config.store.timeout_secs, 3);

        let written = toml::to_string_pretty(&config).unwrap();
        assert!(written.contains("[store]"));
        assert_eq!(toml::from_str::<ClientConfig>(&written).unwrap(), config);
    }

    #[test]
    fn test_save_and_load_file() {
        let path = std::env::temp_dir().join(format!("devis-client-{}.toml", std::process::id()));
        let mut config = ClientConfig::default();
        config.store.timeout_secs = 4;

        config.save(Some(path.clone())).unwrap();
        let loaded: ClientConfig = toml::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(loaded.store.timeout_secs, 4);

        std::fs::remove_file(&path).unwrap();
    }
}
