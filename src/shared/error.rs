//! Shared Error Types
//!
//! This module defines the domain errors that do not depend on the HTTP layer.
//! They are produced by input validation and by the status transition tables,
//! and the backend converts them into HTTP responses.
//!
//! # Error Categories
//!
//! - `ValidationError` - one or more request fields failed validation
//! - `InvalidTransition` - a status change not allowed by its transition table
//!
//! # Usage
//!
//! ```rust
//! use palaver::shared::error::{FieldErrors, SharedError};
//!
//! let mut errors = FieldErrors::default();
//! errors.check(false, "content", "Message content cannot be empty");
//! assert!(matches!(errors.finish(), Err(SharedError::ValidationError { .. })));
//! ```
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A single field-level validation failure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    /// Name of the offending request field
    pub field: String,
    /// Human-readable reason
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Shared error types raised below the HTTP layer
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SharedError {
    /// Request validation failed on one or more fields
    #[error("{}", summarize(.errors))]
    ValidationError {
        /// Every failing field, in the order it was checked
        errors: Vec<FieldError>,
    },

    /// A status change that the entity's transition table forbids
    #[error("Cannot change {entity} status from {from} to {to}")]
    InvalidTransition {
        /// Entity kind ("message", "contact")
        entity: &'static str,
        from: String,
        to: String,
    },
}

impl SharedError {
    /// Create a validation error for a single field
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ValidationError {
            errors: vec![FieldError::new(field, message)],
        }
    }

    /// Create a transition error
    pub fn transition(entity: &'static str, from: impl ToString, to: impl ToString) -> Self {
        Self::InvalidTransition {
            entity,
            from: from.to_string(),
            to: to.to_string(),
        }
    }
}

fn summarize(errors: &[FieldError]) -> String {
    match errors.first() {
        Some(first) if errors.len() == 1 => first.message.clone(),
        Some(first) => format!("{} (and {} more)", first.message, errors.len() - 1),
        None => "Validation failed".to_string(),
    }
}

/// Collects field errors while a request is checked
#[derive(Debug, Default)]
pub struct FieldErrors(Vec<FieldError>);

impl FieldErrors {
    /// Record `message` against `field` unless `ok` holds
    pub fn check(&mut self, ok: bool, field: &str, message: &str) -> &mut Self {
        if !ok {
            self.0.push(FieldError::new(field, message));
        }
        self
    }

    pub fn push(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.push(FieldError::new(field, message));
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// `Ok(())` when nothing was recorded
    pub fn finish(self) -> Result<(), SharedError> {
        if self.0.is_empty() {
            Ok(())
        } else {
            Err(SharedError::ValidationError { errors: self.0 })
        }
    }
}
