//! Configuration management for FaqRelay
//!
//! This module handles loading, parsing, validating, and managing
//! configuration from files, environment variables, and CLI overrides.
//! Nothing in the core logic reads the environment directly; the API
//! key and storage location flow through this struct at construction.

use crate::error::{Result, RelayError};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main configuration structure for FaqRelay
///
/// This structure holds all configuration needed for the relay,
/// including the HTTP listener, storage location, and the AI fallback
/// endpoint settings.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// HTTP server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Storage configuration
    #[serde(default)]
    pub storage: StorageConfig,

    /// AI fallback endpoint configuration
    #[serde(default)]
    pub ai: AiConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Address to bind the listener to
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to bind the listener to
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3001
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Storage configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct StorageConfig {
    /// Optional database file path
    ///
    /// When unset the platform data directory is used. The
    /// `FAQRELAY_DB` environment variable takes precedence over both.
    #[serde(default)]
    pub db_path: Option<String>,
}

/// AI fallback endpoint configuration
///
/// Settings for the external generative-text API used when no FAQ
/// matches an incoming message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AiConfig {
    /// API credential
    ///
    /// When unset the fallback client is never constructed and the
    /// relay answers unmatched messages with a fixed default string.
    #[serde(default)]
    pub api_key: Option<String>,

    /// API base URL (useful for tests and local mocks)
    ///
    /// When set to a mock server URI the client issues its
    /// `generateContent` request there instead of the real endpoint.
    #[serde(default = "default_api_base")]
    pub api_base: String,

    /// Model identifier used to build the endpoint path
    #[serde(default = "default_model")]
    pub model: String,

    /// Request timeout in seconds
    ///
    /// The upstream contract specifies no timeout; this is a defensive
    /// bound on the single fallback request.
    #[serde(default = "default_ai_timeout")]
    pub timeout_seconds: u64,
}

fn default_api_base() -> String {
    "https://generativelanguage.googleapis.com".to_string()
}

fn default_model() -> String {
    "gemini-2.5-flash-preview-05-20".to_string()
}

fn default_ai_timeout() -> u64 {
    30
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_base: default_api_base(),
            model: default_model(),
            timeout_seconds: default_ai_timeout(),
        }
    }
}

impl Config {
    /// Load configuration from file with environment and CLI overrides
    ///
    /// # Arguments
    ///
    /// * `path` - Path to configuration file
    /// * `cli` - CLI arguments for overrides
    ///
    /// # Returns
    ///
    /// Returns the loaded and merged configuration
    ///
    /// # Errors
    ///
    /// Returns error if file cannot be read or parsed
    pub fn load(path: &str, cli: &crate::cli::Cli) -> Result<Self> {
        let mut config = if Path::new(path).exists() {
            Self::from_file(path)?
        } else {
            tracing::warn!("Config file not found at {}, using defaults", path);
            Self::default()
        };

        config.apply_env_vars();
        config.apply_cli_overrides(cli);

        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| RelayError::Config(format!("Failed to read config file: {}", e)))?;
        serde_yaml::from_str(&contents)
            .map_err(|e| RelayError::Config(format!("Failed to parse config: {}", e)).into())
    }

    fn apply_env_vars(&mut self) {
        if let Ok(host) = std::env::var("FAQRELAY_HOST") {
            self.server.host = host;
        }

        if let Ok(port) = std::env::var("FAQRELAY_PORT") {
            if let Ok(value) = port.parse() {
                self.server.port = value;
            } else {
                tracing::warn!("Invalid FAQRELAY_PORT: {}", port);
            }
        }

        if let Ok(api_key) = std::env::var("FAQRELAY_AI_API_KEY") {
            self.ai.api_key = Some(api_key);
        }

        if let Ok(api_base) = std::env::var("FAQRELAY_AI_API_BASE") {
            self.ai.api_base = api_base;
        }

        if let Ok(model) = std::env::var("FAQRELAY_AI_MODEL") {
            self.ai.model = model;
        }

        if let Ok(timeout) = std::env::var("FAQRELAY_AI_TIMEOUT_SECONDS") {
            if let Ok(value) = timeout.parse() {
                self.ai.timeout_seconds = value;
            } else {
                tracing::warn!("Invalid FAQRELAY_AI_TIMEOUT_SECONDS: {}", timeout);
            }
        }
    }

    fn apply_cli_overrides(&mut self, cli: &crate::cli::Cli) {
        if let Some(db_path) = &cli.storage_path {
            self.storage.db_path = Some(db_path.clone());
        }

        if let crate::cli::Commands::Serve { host, port } = &cli.command {
            if let Some(host) = host {
                self.server.host = host.clone();
            }
            if let Some(port) = port {
                self.server.port = *port;
            }
        }
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns error if any setting is out of range or empty
    pub fn validate(&self) -> Result<()> {
        if self.server.host.is_empty() {
            return Err(RelayError::Config("server.host must not be empty".to_string()).into());
        }

        if self.ai.api_base.is_empty() {
            return Err(RelayError::Config("ai.api_base must not be empty".to_string()).into());
        }

        if self.ai.model.is_empty() {
            return Err(RelayError::Config("ai.model must not be empty".to_string()).into());
        }

        if self.ai.timeout_seconds == 0 {
            return Err(
                RelayError::Config("ai.timeout_seconds must be greater than zero".to_string())
                    .into(),
            );
        }

        Ok(())
    }
}
