//! services/client/src/config.rs
//!
//! Defines the client's configuration structure and loading logic.
//!
//! All configuration is loaded from environment variables at startup. The `.env`
//! file is used for local development.

use std::path::PathBuf;
use tracing::Level;
use url::Url;

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for the environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Holds all configuration loaded from the environment at startup.
#[derive(Clone, Debug)]
pub struct Config {
    pub api_base_url: Url,
    pub session_file: PathBuf,
    pub log_level: Level,
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// It will look for a `.env` file in the current directory for development,
    /// but this is skipped in test environments to ensure tests are hermetic.
    pub fn from_env() -> Result<Self, ConfigError> {
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let base_url_str =
            lookup("API_BASE_URL").unwrap_or_else(|| "http://localhost:3000".to_string());
        let api_base_url = Url::parse(&base_url_str)
            .map_err(|e| ConfigError::InvalidValue("API_BASE_URL".to_string(), e.to_string()))?;
        if !matches!(api_base_url.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidValue(
                "API_BASE_URL".to_string(),
                format!("'{}' is not an http(s) URL", base_url_str),
            ));
        }

        let session_file = lookup("SESSION_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("./.book-reviews/session.json"));

        let log_level_str = lookup("RUST_LOG").unwrap_or_else(|| "WARN".to_string());
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;

        Ok(Self {
            api_base_url,
            session_file,
            log_level,
        })
    }
}
