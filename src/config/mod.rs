//! Configuration management.
//!
//! This module handles:
//! - Environment variable loading (with `.env` support)
//! - Configuration validation
//! - Default value handling
//! - Secure API key storage via [`SecretString`]
//!
//! # Example
//!
//! ```
//! use barakah::config::{Config, SecretString};
//!
//! // Use Config::from_env() in production
//! let config = Config::for_tests(SecretString::new("sk-ant-example-key"));
//!
//! println!("Using model: {}", config.model);
//! let debug = format!("{:?}", config);
//! assert!(debug.contains("<REDACTED>"));
//! assert!(!debug.contains("sk-ant-example-key"));
//! ```

mod secret;
mod validation;

pub use secret::SecretString;
pub use validation::{validate_config, MAX_TIMEOUT_MS, MIN_TIMEOUT_MS};

use crate::error::ConfigError;

/// Default database path.
pub const DEFAULT_DATABASE_PATH: &str = "./data/barakah.db";

/// Default listen address.
pub const DEFAULT_BIND_ADDRESS: &str = "127.0.0.1:3000";

/// Default log level.
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Default request timeout in milliseconds for provider calls.
pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 30_000;

/// Default timeout for the daily reminder model call before falling back.
pub const DEFAULT_REMINDER_TIMEOUT_MS: u64 = 10_000;

/// Default Anthropic model.
pub const DEFAULT_MODEL: &str = "claude-sonnet-4-20250514";

/// Default Anthropic API base URL.
pub const DEFAULT_ANTHROPIC_BASE_URL: &str = "https://api.anthropic.com/v1";

/// Default image generation API base URL.
pub const DEFAULT_IMAGE_BASE_URL: &str = "https://api.openai.com/v1";

/// Default image generation model.
pub const DEFAULT_IMAGE_MODEL: &str = "dall-e-3";

/// Default Quran text API base URL.
pub const DEFAULT_QURAN_BASE_URL: &str = "https://api.alquran.cloud/v1";

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Text,
    /// One JSON object per event.
    Json,
}

impl std::str::FromStr for LogFormat {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "pretty" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            _ => Err(()),
        }
    }
}

/// Application configuration.
///
/// Use [`Config::from_env`] to load configuration from environment variables.
/// Provider keys use [`SecretString`] to prevent accidental logging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Anthropic API key.
    pub api_key: SecretString,
    /// Anthropic model to use.
    pub model: String,
    /// Anthropic API base URL.
    pub anthropic_base_url: String,
    /// Image generation API key; image endpoints answer 503 when absent.
    pub image_api_key: Option<SecretString>,
    /// Image generation API base URL.
    pub image_base_url: String,
    /// Image generation model.
    pub image_model: String,
    /// Quran text API base URL.
    pub quran_base_url: String,
    /// `SQLite` database path.
    pub database_path: String,
    /// Socket address the HTTP server binds to.
    pub bind_address: String,
    /// Log level filter (error, warn, info, debug, trace).
    pub log_level: String,
    /// Log output format.
    pub log_format: LogFormat,
    /// Timeout for provider requests in milliseconds.
    pub request_timeout_ms: u64,
    /// Timeout for the daily reminder generation in milliseconds.
    pub reminder_timeout_ms: u64,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Required environment variables:
    /// - `ANTHROPIC_API_KEY`: Anthropic API key
    ///
    /// Optional environment variables (with defaults):
    /// - `ANTHROPIC_MODEL` (`claude-sonnet-4-20250514`)
    /// - `ANTHROPIC_BASE_URL` (`https://api.anthropic.com/v1`)
    /// - `IMAGE_API_KEY` (unset: image generation disabled)
    /// - `IMAGE_API_BASE_URL` (`https://api.openai.com/v1`)
    /// - `IMAGE_MODEL` (`dall-e-3`)
    /// - `QURAN_API_BASE_URL` (`https://api.alquran.cloud/v1`)
    /// - `DATABASE_PATH` (`./data/barakah.db`)
    /// - `BIND_ADDRESS` (`127.0.0.1:3000`)
    /// - `LOG_LEVEL` (`info`), `LOG_FORMAT` (`text` | `json`)
    /// - `REQUEST_TIMEOUT_MS` (`30000`), `REMINDER_TIMEOUT_MS` (`10000`)
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if `ANTHROPIC_API_KEY` is missing, a numeric
    /// variable does not parse, or any value fails [`validate_config`].
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors)
        let _ = dotenvy::dotenv();

        let api_key =
            std::env::var("ANTHROPIC_API_KEY").map_err(|_| ConfigError::MissingRequired {
                var: "ANTHROPIC_API_KEY".into(),
            })?;

        let log_format = match std::env::var("LOG_FORMAT") {
            Ok(raw) => raw.parse().map_err(|()| ConfigError::InvalidValue {
                var: "LOG_FORMAT".into(),
                reason: "must be 'text' or 'json'".into(),
            })?,
            Err(_) => LogFormat::default(),
        };

        let config = Self {
            api_key: SecretString::new(api_key),
            model: env_or("ANTHROPIC_MODEL", DEFAULT_MODEL),
            anthropic_base_url: env_or("ANTHROPIC_BASE_URL", DEFAULT_ANTHROPIC_BASE_URL),
            image_api_key: std::env::var("IMAGE_API_KEY")
                .ok()
                .and_then(SecretString::non_empty),
            image_base_url: env_or("IMAGE_API_BASE_URL", DEFAULT_IMAGE_BASE_URL),
            image_model: env_or("IMAGE_MODEL", DEFAULT_IMAGE_MODEL),
            quran_base_url: env_or("QURAN_API_BASE_URL", DEFAULT_QURAN_BASE_URL),
            database_path: env_or("DATABASE_PATH", DEFAULT_DATABASE_PATH),
            bind_address: env_or("BIND_ADDRESS", DEFAULT_BIND_ADDRESS),
            log_level: env_or("LOG_LEVEL", DEFAULT_LOG_LEVEL),
            log_format,
            request_timeout_ms: parse_env_u64("REQUEST_TIMEOUT_MS", DEFAULT_REQUEST_TIMEOUT_MS)?,
            reminder_timeout_ms: parse_env_u64(
                "REMINDER_TIMEOUT_MS",
                DEFAULT_REMINDER_TIMEOUT_MS,
            )?,
        };

        validate_config(&config)?;
        Ok(config)
    }

    /// Build a configuration with defaults and the given Anthropic key.
    ///
    /// Intended for tests and examples; production code uses [`Config::from_env`].
    #[must_use]
    pub fn for_tests(api_key: SecretString) -> Self {
        Self {
            api_key,
            model: DEFAULT_MODEL.to_string(),
            anthropic_base_url: DEFAULT_ANTHROPIC_BASE_URL.to_string(),
            image_api_key: None,
            image_base_url: DEFAULT_IMAGE_BASE_URL.to_string(),
            image_model: DEFAULT_IMAGE_MODEL.to_string(),
            quran_base_url: DEFAULT_QURAN_BASE_URL.to_string(),
            database_path: DEFAULT_DATABASE_PATH.to_string(),
            bind_address: DEFAULT_BIND_ADDRESS.to_string(),
            log_level: DEFAULT_LOG_LEVEL.to_string(),
            log_format: LogFormat::Text,
            request_timeout_ms: DEFAULT_REQUEST_TIMEOUT_MS,
            reminder_timeout_ms: DEFAULT_REMINDER_TIMEOUT_MS,
        }
    }
}

fn env_or(name: &str, default: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| default.into())
}

/// Parse an environment variable as u64, using a default if not set.
fn parse_env_u64(name: &str, default: u64) -> Result<u64, ConfigError> {
    std::env::var(name).map_or(Ok(default), |val| {
        val.parse().map_err(|_| ConfigError::InvalidValue {
            var: name.into(),
            reason: "must be a positive integer".into(),
        })
    })
}
