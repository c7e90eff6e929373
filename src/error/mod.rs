//! Error types for the Barakah service.
//!
//! This module defines a hierarchical error system:
//! - [`AppError`]: Top-level application errors
//! - [`AnthropicError`]: Anthropic API specific errors
//! - [`ImageError`]: Image generation API errors
//! - [`QuranError`]: Quran text API errors
//! - [`StorageError`]: Database operation errors
//! - [`ServiceError`]: Domain service errors (validation, lookups, AI output)
//! - [`ConfigError`]: Configuration errors
//!
//! HTTP status mapping lives in [`crate::server::ApiError`].
//! All errors implement `Send + Sync` for async compatibility.

use thiserror::Error;

/// Top-level application error.
///
/// This is the main error type returned by startup and wiring code.
/// It wraps all subsystem errors for unified error handling.
#[derive(Debug, Error)]
pub enum AppError {
    /// Anthropic API error.
    #[error("Anthropic API error: {0}")]
    Anthropic(#[from] AnthropicError),

    /// Image generation error.
    #[error("Image API error: {0}")]
    Image(#[from] ImageError),

    /// Quran API error.
    #[error("Quran API error: {0}")]
    Quran(#[from] QuranError),

    /// Storage error.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Service error.
    #[error("Service error: {0}")]
    Service(#[from] ServiceError),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Server I/O error (bind, accept).
    #[error("Server error: {message}")]
    Server {
        /// Description of the failure.
        message: String,
    },
}

/// Anthropic API errors.
///
/// These errors represent failures when communicating with the Anthropic API.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AnthropicError {
    /// Authentication failed due to invalid API key.
    #[error("Authentication failed: invalid API key")]
    AuthenticationFailed,

    /// Request was rate limited.
    #[error("Rate limited: retry after {retry_after_seconds}s")]
    RateLimited {
        /// Seconds to wait before retrying.
        retry_after_seconds: u64,
    },

    /// The requested model is overloaded.
    #[error("Model overloaded: {model}")]
    ModelOverloaded {
        /// The model that is overloaded.
        model: String,
    },

    /// Request timed out.
    #[error("Request timeout after {timeout_ms}ms")]
    Timeout {
        /// Timeout duration in milliseconds.
        timeout_ms: u64,
    },

    /// Invalid request parameters.
    #[error("Invalid request: {message}")]
    InvalidRequest {
        /// Description of what's invalid.
        message: String,
    },

    /// Network communication error.
    #[error("Network error: {message}")]
    Network {
        /// Description of the network error.
        message: String,
    },

    /// Unexpected response from the API.
    #[error("Unexpected response: {message}")]
    UnexpectedResponse {
        /// Description of what was unexpected.
        message: String,
    },
}

/// Image generation API errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ImageError {
    /// No image API key was configured.
    #[error("Image generation is not configured")]
    NotConfigured,

    /// Authentication failed due to invalid API key.
    #[error("Authentication failed: invalid API key")]
    AuthenticationFailed,

    /// The prompt was rejected by the provider.
    #[error("Invalid request: {message}")]
    InvalidRequest {
        /// Provider message.
        message: String,
    },

    /// Request was rate limited.
    #[error("Rate limited by image provider")]
    RateLimited,

    /// Request timed out.
    #[error("Request timeout after {timeout_ms}ms")]
    Timeout {
        /// Timeout duration in milliseconds.
        timeout_ms: u64,
    },

    /// Network communication error.
    #[error("Network error: {message}")]
    Network {
        /// Description of the network error.
        message: String,
    },

    /// Unexpected response from the API.
    #[error("Unexpected response: {message}")]
    UnexpectedResponse {
        /// Description of what was unexpected.
        message: String,
    },
}

/// Quran text API errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum QuranError {
    /// Reference is not of the form `surah:ayah` or a verse number.
    #[error("Invalid verse reference: {reference}")]
    InvalidReference {
        /// The rejected reference.
        reference: String,
    },

    /// The API has no such verse.
    #[error("Verse not found: {reference}")]
    NotFound {
        /// The reference that was not found.
        reference: String,
    },

    /// Request timed out.
    #[error("Request timeout after {timeout_ms}ms")]
    Timeout {
        /// Timeout duration in milliseconds.
        timeout_ms: u64,
    },

    /// Network communication error.
    #[error("Network error: {message}")]
    Network {
        /// Description of the network error.
        message: String,
    },

    /// Unexpected response from the API.
    #[error("Unexpected response: {message}")]
    UnexpectedResponse {
        /// Description of what was unexpected.
        message: String,
    },
}

/// Storage errors.
///
/// These errors represent failures in database operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StorageError {
    /// Failed to connect to the database.
    #[error("Database connection failed: {message}")]
    ConnectionFailed {
        /// Description of the connection failure.
        message: String,
    },

    /// A database query failed.
    #[error("Query failed: {query} - {message}")]
    QueryFailed {
        /// The query that failed (may be truncated).
        query: String,
        /// Description of the failure.
        message: String,
    },

    /// Record not found (or owned by another user).
    #[error("{entity} not found: {id}")]
    NotFound {
        /// Entity kind, e.g. `reflection`.
        entity: String,
        /// The identifier that was not found.
        id: String,
    },

    /// Database migration failed.
    #[error("Migration failed: {version} - {message}")]
    MigrationFailed {
        /// The migration version that failed.
        version: String,
        /// Description of the failure.
        message: String,
    },

    /// Internal storage error.
    #[error("Internal storage error: {message}")]
    Internal {
        /// Description of the internal error.
        message: String,
    },
}

impl StorageError {
    /// Shorthand for a [`StorageError::NotFound`].
    #[must_use]
    pub fn not_found(entity: &str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity: entity.to_string(),
            id: id.into(),
        }
    }
}

/// Domain service errors.
///
/// These errors represent failures while executing a user-facing operation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ServiceError {
    /// Missing required field.
    #[error("Missing required field: {field}")]
    MissingField {
        /// The missing field name.
        field: String,
    },

    /// Invalid value for a field.
    #[error("Invalid value for {field}: {reason}")]
    InvalidValue {
        /// The field name.
        field: String,
        /// Why the value is invalid.
        reason: String,
    },

    /// Requested record does not exist.
    #[error("{resource} not found: {id}")]
    NotFound {
        /// Resource kind.
        resource: String,
        /// Requested identifier.
        id: String,
    },

    /// JSON parsing of a model response failed.
    #[error("JSON parsing failed: {message}")]
    JsonParseFailed {
        /// Description of the parsing error.
        message: String,
    },

    /// An upstream provider is unavailable.
    #[error("API unavailable: {message}")]
    ApiUnavailable {
        /// Description of why the API is unavailable.
        message: String,
    },

    /// Operation timed out.
    #[error("Operation timed out after {elapsed_ms}ms")]
    Timeout {
        /// Elapsed time in milliseconds.
        elapsed_ms: u64,
    },

    /// Persistence failed.
    #[error("Storage failure: {message}")]
    Storage {
        /// Description of the storage failure.
        message: String,
    },
}

impl ServiceError {
    /// Shorthand for a [`ServiceError::InvalidValue`].
    #[must_use]
    pub fn invalid(field: &str, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            field: field.to_string(),
            reason: reason.into(),
        }
    }
}

impl From<StorageError> for ServiceError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::NotFound { entity, id } => Self::NotFound {
                resource: entity,
                id,
            },
            other => Self::Storage {
                message: other.to_string(),
            },
        }
    }
}

impl From<QuranError> for ServiceError {
    fn from(err: QuranError) -> Self {
        match err {
            QuranError::InvalidReference { reference } => Self::InvalidValue {
                field: "reference".to_string(),
                reason: format!("'{reference}' is not a valid surah:ayah reference"),
            },
            QuranError::NotFound { reference } => Self::NotFound {
                resource: "verse".to_string(),
                id: reference,
            },
            other => Self::ApiUnavailable {
                message: other.to_string(),
            },
        }
    }
}

impl From<ImageError> for ServiceError {
    fn from(err: ImageError) -> Self {
        match err {
            ImageError::InvalidRequest { message } => Self::InvalidValue {
                field: "prompt".to_string(),
                reason: message,
            },
            other => Self::ApiUnavailable {
                message: other.to_string(),
            },
        }
    }
}

/// Configuration errors.
///
/// These errors represent failures in configuration loading and validation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Required configuration is missing.
    #[error("Missing required: {var}")]
    MissingRequired {
        /// The missing variable name.
        var: String,
    },

    /// Configuration value is invalid.
    #[error("Invalid value for {var}: {reason}")]
    InvalidValue {
        /// The variable name.
        var: String,
        /// Why the value is invalid.
        reason: String,
    },
}
