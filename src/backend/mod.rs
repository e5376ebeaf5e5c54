//! Backend Module
//!
//! This module contains all server-side code for palaver: an Axum HTTP
//! server exposing accounts, contacts, one-to-one chats, groups, messages
//! and notifications as JSON over a SQLite database.
//!
//! This module is only compiled when the `ssr` feature is enabled.
//!
//! # Architecture
//!
//! - **`server`** - Configuration, application state, initialization
//! - **`routes`** - Router assembly (`/users`, `/api`, `/health`, static files)
//! - **`auth`** - Users, JWT tokens, account and profile handlers
//! - **`contacts`** - Directed contact records
//! - **`chats`** - One-to-one chats
//! - **`messages`** - Sending messages and delivery status
//! - **`groups`** - Groups, memberships and the admin gate
//! - **`notifications`** - Per-user notifications
//! - **`uploads`** - Image uploads for profile pictures and group icons
//! - **`middleware`** - Auth guard and request extractors
//! - **`error`** - `BackendError` and its JSON response
//!
//! # State Management
//!
//! `AppState` holds the connection pool, the configuration and the token
//! issuer. It is built once and never mutated, so handlers share it without
//! locks. Multi-step writes run inside one `sqlx` transaction.
//!
//! # Example
//!
//! ```rust,no_run
//! use palaver::backend::server::{create_app, ServerConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let (app, _pool) = create_app(ServerConfig::from_env()).await?;
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:5000").await?;
//! axum::serve(listener, app).await?;
//! # Ok(())
//! # }
//! ```

/// Authentication and user management
pub mod auth;

/// One-to-one chats
pub mod chats;

/// Contact records
pub mod contacts;

/// Backend error types
pub mod error;

/// Groups and memberships
pub mod groups;

/// Messages and delivery status
pub mod messages;

/// Middleware for request processing
pub mod middleware;

/// Notifications
pub mod notifications;

/// Route configuration
pub mod routes;

/// Server setup and configuration
pub mod server;

/// Image uploads
pub mod uploads;

/// Re-export commonly used types
pub use error::BackendError;
pub use server::{create_app, AppState, ServerConfig};
