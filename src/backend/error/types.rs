/**
 * Backend Error Types
 *
 * This module defines error types specific to the backend server.
 * These errors are returned by HTTP handlers and converted to HTTP responses.
 *
 * # Error Types
 *
 * - `HandlerError` - A request-level failure with an explicit status code
 * - `InternalError` - Unexpected server-side failure
 * - `SharedError` - Validation failures and illegal status transitions
 * - `DatabaseError` - Any `sqlx` failure
 * - `SerializationError` - JSON encoding failure
 *
 * # Error Categories
 *
 * ## Handler Errors
 *
 * Handler errors occur when processing HTTP requests:
 * - Missing or invalid bearer token (401)
 * - Caller lacks membership or admin rights (403)
 * - Referenced user, chat, group or message is absent (404)
 * - Upload larger than the configured limit (413)
 *
 * ## Server Errors
 *
 * Database and internal errors always surface as a generic 500 message.
 * Their details are logged, never sent to the client.
 */

use thiserror::Error;
use axum::http::StatusCode;
use crate::shared::{FieldError, SharedError};

/// Message sent to clients for every 500 response
pub const INTERNAL_MESSAGE: &str = "Internal server error";

/// Backend-specific error types
///
/// Each variant can be converted to an HTTP response.
///
/// # Usage
///
/// ```rust
/// use palaver::backend::error::BackendError;
/// use axum::http::StatusCode;
///
/// let err = BackendError::not_found("Chat not found");
/// assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
///
/// let err = BackendError::handler(StatusCode::BAD_REQUEST, "Invalid request");
/// assert_eq!(err.message(), "Invalid request");
/// ```
#[derive(Debug, Error)]
pub enum BackendError {
    /// Handler error (e.g., bad token, missing record, forbidden action)
    #[error("Handler error: {message}")]
    HandlerError {
        /// HTTP status code for this error
        status: StatusCode,
        /// Human-readable error message
        message: String,
    },

    /// Unexpected server-side failure (hashing, file system, token signing)
    #[error("Internal error: {message}")]
    InternalError {
        /// Logged, not returned
        message: String,
    },

    /// Shared error (validation, status transitions)
    #[error(transparent)]
    SharedError(#[from] SharedError),

    /// Database error
    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

impl BackendError {
    /// Create a new handler error with a status code
    ///
    /// # Arguments
    ///
    /// * `status` - HTTP status code
    /// * `message` - Error message
    pub fn handler(status: StatusCode, message: impl Into<String>) -> Self {
        Self::HandlerError {
            status,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::handler(StatusCode::BAD_REQUEST, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::handler(StatusCode::UNAUTHORIZED, message)
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::handler(StatusCode::FORBIDDEN, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::handler(StatusCode::NOT_FOUND, message)
    }

    pub fn payload_too_large(message: impl Into<String>) -> Self {
        Self::handler(StatusCode::PAYLOAD_TOO_LARGE, message)
    }

    /// Create a new internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::InternalError {
            message: message.into(),
        }
    }

    /// Single-field validation error
    pub fn validation(field: &str, message: &str) -> Self {
        Self::SharedError(SharedError::validation(field, message))
    }

    /// Get the HTTP status code for this error
    ///
    /// # Status Code Mapping
    ///
    /// - `HandlerError` - Uses the status code from the error
    /// - `SharedError` - 400 for validation, 409 for transitions
    /// - `DatabaseError` - 409 on a unique violation, otherwise 500
    /// - everything else - 500 Internal Server Error
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::HandlerError { status, .. } => *status,
            Self::SharedError(err) => match err {
                SharedError::ValidationError { .. } => StatusCode::BAD_REQUEST,
                SharedError::InvalidTransition { .. } => StatusCode::CONFLICT,
            },
            Self::DatabaseError(err) if is_unique_violation(err) => StatusCode::CONFLICT,
            Self::DatabaseError(_) | Self::InternalError { .. } | Self::SerializationError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Get the client-facing error message
    pub fn message(&self) -> String {
        match self {
            Self::HandlerError { message, .. } => message.clone(),
            Self::SharedError(err) => err.to_string(),
            Self::DatabaseError(err) if is_unique_violation(err) => {
                "Resource already exists".to_string()
            }
            Self::DatabaseError(_) | Self::InternalError { .. } | Self::SerializationError(_) => {
                INTERNAL_MESSAGE.to_string()
            }
        }
    }

    /// Field-level details, present only for validation failures
    pub fn fields(&self) -> Option<&[FieldError]> {
        match self {
            Self::SharedError(SharedError::ValidationError { errors }) => Some(errors),
            _ => None,
        }
    }
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.is_unique_violation())
}
