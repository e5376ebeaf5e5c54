//! Common test utilities and helpers
//!
//! This module provides shared utilities for all tests including:
//! - An in-memory application harness driven with `tower::ServiceExt::oneshot`
//! - Authentication helpers for signing users up and in
//! - Assertion macros for the JSON error shape

#![allow(dead_code)]

pub mod app;
pub mod assertions;
pub mod auth_helpers;

// Re-export commonly used utilities
pub use app::*;
pub use auth_helpers::*;
