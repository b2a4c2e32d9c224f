//! Configuration file parsing for the server.
//!
//! Loads settings from TOML files including bind address, database path,
//! page sizes and log level.

use origin_store::RegistryConfig;
use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

/// Server configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read config file
    #[error("Failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    /// Failed to parse TOML
    #[error("Failed to parse config TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// A field is present but unusable
    #[error("Invalid configuration field {field}: {reason}")]
    InvalidField {
        /// Offending field
        field: String,
        /// What is wrong with it
        reason: String,
    },
}

/// Server configuration loaded from TOML
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Bind address (e.g., "127.0.0.1")
    pub bind_address: String,

    /// Bind port (e.g., 8080)
    pub bind_port: u16,

    /// SQLite database holding the anchor journal (":memory:" for a scratch registry)
    pub database_path: String,

    /// Page length used when a list request gives no `limit`
    #[serde(default = "default_page_size")]
    pub default_page_size: usize,

    /// Largest `limit` an HTTP list request may ask for
    #[serde(default = "default_max_page_size")]
    pub max_page_size: usize,

    /// Capacity of the insertion event channel
    #[serde(default = "default_event_buffer")]
    pub event_buffer: usize,

    /// Tracing filter used when `RUST_LOG` is unset
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_page_size() -> usize {
    50
}

fn default_max_page_size() -> usize {
    1000
}

fn default_event_buffer() -> usize {
    1024
}

fn default_log_level() -> String {
    "info".to_string()
}

impl ServerConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config: ServerConfig = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Check cross-field constraints
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |field: &str, reason: &str| ConfigError::InvalidField {
            field: field.to_string(),
            reason: reason.to_string(),
        };

        if self.database_path.is_empty() {
            return Err(invalid("database_path", "must not be empty"));
        }
        if self.max_page_size == 0 {
            return Err(invalid("max_page_size", "must be at least 1"));
        }
        if self.default_page_size == 0 || self.default_page_size > self.max_page_size {
            return Err(invalid("default_page_size", "must be between 1 and max_page_size"));
        }
        if self.event_buffer == 0 {
            return Err(invalid("event_buffer", "must be at least 1"));
        }
        Ok(())
    }

    /// Create a default configuration for testing
    pub fn default_test_config() -> Self {
        ServerConfig {
            bind_address: "127.0.0.1".to_string(),
            bind_port: 8080,
            database_path: ":memory:".to_string(),
            default_page_size: default_page_size(),
            max_page_size: default_max_page_size(),
            event_buffer: default_event_buffer(),
            log_level: default_log_level(),
        }
    }

    /// Get the full bind address (address:port)
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.bind_address, self.bind_port)
    }

    /// Registry settings derived from this configuration
    pub fn registry_config(&self) -> RegistryConfig {
        RegistryConfig {
            event_buffer: self.event_buffer,
        }
    }
}
