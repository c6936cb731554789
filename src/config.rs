//! Application configuration.

use derive_getters::Getters;
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, info, instrument};

/// Environment variable holding the client's identity token.
pub const ID_TOKEN_VAR: &str = "PERFECT_SCRABBLE_ID_TOKEN";

/// Default name of the configuration file.
pub const DEFAULT_CONFIG_FILE: &str = "perfect_scrabble.toml";

/// Settings shared by the CLI, the recorder, and the write endpoint.
#[derive(Debug, Clone, Getters, Serialize, Deserialize)]
pub struct AppConfig {
    /// Base URL of the write endpoint and read API.
    #[serde(default = "default_server_url")]
    server_url: String,

    /// Collection games are stored in.
    #[serde(default = "default_collection")]
    collection: String,

    /// Games per page when browsing by date.
    #[serde(default = "default_page_size")]
    page_size: usize,

    /// Hosted turn-scoring API.
    #[serde(default = "default_scoring_url")]
    scoring_url: String,

    /// Bearer tokens accepted by the local write endpoint, mapped to user ids.
    #[serde(default)]
    tokens: HashMap<String, String>,
}

#[instrument]
fn default_server_url() -> String {
    "http://127.0.0.1:3000".to_string()
}

#[instrument]
fn default_collection() -> String {
    "perfect-scrabble-games".to_string()
}

#[instrument]
fn default_page_size() -> usize {
    5
}

#[instrument]
fn default_scoring_url() -> String {
    "https://www.wolframcloud.com/obj/josephb/Scrabble/LiveAPIs/ScoreTurn".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server_url: default_server_url(),
            collection: default_collection(),
            page_size: default_page_size(),
            scoring_url: default_scoring_url(),
            tokens: HashMap::new(),
        }
    }
}

impl AppConfig {
    /// Loads configuration from a TOML file.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;
        Self::from_toml(&content)
    }

    /// Parses configuration from TOML text.
    #[instrument(skip(content))]
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))?;
        if config.page_size == 0 {
            return Err(ConfigError::new("page_size must be at least 1".to_string()));
        }
        info!(collection = %config.collection, server_url = %config.server_url, "Config loaded");
        Ok(config)
    }

    /// Loads the file if it exists, otherwise returns defaults.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        if path.as_ref().exists() {
            Self::from_file(path)
        } else {
            info!("Config file not found, using defaults");
            Ok(Self::default())
        }
    }

    /// Replaces the server URL.
    pub fn with_server_url(mut self, server_url: impl Into<String>) -> Self {
        self.server_url = server_url.into();
        self
    }

    /// Full URL of the write endpoint.
    pub fn write_url(&self) -> String {
        format!("{}/api/write", self.server_url.trim_end_matches('/'))
    }

    /// Reads the client identity token from the environment, if set.
    #[instrument(skip(self))]
    pub fn id_token_from_env(&self) -> Option<String> {
        std::env::var(ID_TOKEN_VAR)
            .ok()
            .filter(|token| !token.trim().is_empty())
    }
}

/// Configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: String) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_uses_defaults() {
        let config = AppConfig::from_toml("").expect("parse");
        assert_eq!(config.collection(), "perfect-scrabble-games");
        assert_eq!(*config.page_size(), 5);
        assert_eq!(config.write_url(), "http://127.0.0.1:3000/api/write");
    }

    #[test]
    fn tokens_table_is_read() {
        let config = AppConfig::from_toml(
            "server_url = \"http://example.test/\"\n[tokens]\nsecret = \"user-1\"\n",
        )
        .expect("parse");
        assert_eq!(config.tokens().get("secret").map(String::as_str), Some("user-1"));
        assert_eq!(config.write_url(), "http://example.test/api/write");
    }

    #[test]
    fn zero_page_size_is_rejected() {
        assert!(AppConfig::from_toml("page_size = 0").is_err());
    }
}
