//! Shared Module
//!
//! This module contains types and data structures that do not depend on the
//! HTTP server: stored records, request and response bodies, status transition
//! tables and domain errors.
//!
//! # Overview
//!
//! Everything here serializes with serde and compiles without the `ssr`
//! feature, so a client can reuse the same types.

/// Shared error types
pub mod error;

/// Messaging records and wire types
pub mod messaging;

/// Re-export commonly used types for convenience
pub use error::{FieldError, FieldErrors, SharedError};
