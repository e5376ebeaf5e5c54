//! Middleware Module
//!
//! This module contains the HTTP middleware and request extractors shared by
//! the handlers.
//!
//! # Architecture
//!
//! - **`auth`** - Bearer token guard and the `AuthUser` extractor
//! - **`base_url`** - `BaseUrl` extractor for absolute media URLs
//! - **`json`** - `JsonBody` extractor with JSON error responses
//! - **`path`** / **`query`** - `PathParams` and `QueryParams` with JSON error responses
//!
//! # Example
//!
//! ```rust,no_run
//! use palaver::backend::middleware::{AuthUser, BaseUrl};
//!
//! async fn handler(AuthUser(user): AuthUser, base: BaseUrl) -> String {
//!     format!("{} via {}", user.username, base.0)
//! }
//! ```

pub mod auth;
pub mod base_url;
pub mod json;
pub mod path;
pub mod query;

pub use auth::{auth_middleware, AuthUser, AuthenticatedUser};
pub use base_url::BaseUrl;
pub use json::JsonBody;
pub use path::PathParams;
pub use query::QueryParams;
