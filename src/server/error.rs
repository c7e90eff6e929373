//! HTTP error mapping and the response envelope.
//!
//! Every response body has the shape
//! `{"success": bool, "data": ..., "message": ...}`.

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

use crate::error::{ServiceError, StorageError};

/// Response envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiResponse<T> {
    /// Whether the request succeeded.
    pub success: bool,
    /// Payload, `null` on errors and bare acknowledgements.
    pub data: Option<T>,
    /// Human-readable note.
    pub message: Option<String>,
}

impl<T> ApiResponse<T> {
    /// Successful response carrying `data`.
    pub const fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
        }
    }

    /// Successful response with a note.
    pub fn success_with_message(data: T, message: impl Into<String>) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: Some(message.into()),
        }
    }
}

impl ApiResponse<()> {
    /// Successful response without a payload.
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            success: true,
            data: None,
            message: Some(message.into()),
        }
    }

    /// Failed response.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            message: Some(message.into()),
        }
    }
}

/// Error returned by route handlers.
#[derive(Debug, Error)]
pub enum ApiError {
    /// A domain operation failed.
    #[error(transparent)]
    Service(#[from] ServiceError),

    /// Missing or malformed `x-user-id`.
    #[error("Unauthorized: {message}")]
    Unauthorized {
        /// Why the caller was rejected.
        message: String,
    },

    /// Malformed path, query or body.
    #[error("Bad request: {message}")]
    BadRequest {
        /// What could not be parsed.
        message: String,
    },
}

impl ApiError {
    /// Shorthand for [`ApiError::Unauthorized`].
    #[must_use]
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized {
            message: message.into(),
        }
    }

    /// Shorthand for [`ApiError::BadRequest`].
    #[must_use]
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest {
            message: message.into(),
        }
    }

    /// HTTP status for this error.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
            Self::BadRequest { .. } => StatusCode::BAD_REQUEST,
            Self::Service(err) => match err {
                ServiceError::MissingField { .. } | ServiceError::InvalidValue { .. } => {
                    StatusCode::BAD_REQUEST
                }
                ServiceError::NotFound { .. } => StatusCode::NOT_FOUND,
                ServiceError::ApiUnavailable { .. }
                | ServiceError::Timeout { .. }
                | ServiceError::JsonParseFailed { .. } => StatusCode::SERVICE_UNAVAILABLE,
                ServiceError::Storage { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }

    /// Message shown to the client.
    ///
    /// Internal failures are not described to the caller.
    #[must_use]
    pub fn public_message(&self) -> String {
        match self.status() {
            StatusCode::INTERNAL_SERVER_ERROR => "Internal server error".to_string(),
            StatusCode::SERVICE_UNAVAILABLE => match self {
                Self::Service(ServiceError::JsonParseFailed { .. }) => {
                    "The AI service returned an unreadable answer, please retry".to_string()
                }
                other => other.to_string(),
            },
            _ => self.to_string(),
        }
    }
}

impl From<StorageError> for ApiError {
    fn from(err: StorageError) -> Self {
        Self::Service(err.into())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::bad_request(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::bad_request(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        Self::bad_request(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(status = status.as_u16(), error = %self, "Request failed");
        } else {
            tracing::warn!(status = status.as_u16(), error = %self, "Request rejected");
        }
        (status, Json(ApiResponse::error(self.public_message()))).into_response()
    }
}
