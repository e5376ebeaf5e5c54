//! Palaver - Messaging Backend
//!
//! Palaver is a messaging backend built with Axum and SQLite. Users sign up,
//! sign in with a bearer token, keep a contact list, talk one-to-one or in
//! groups, track message delivery status and collect notifications.
//!
//! # Module Structure
//!
//! - **`shared`** - Serializable domain types and their state machines
//!   - Users, contacts, chats, groups, messages, notifications
//!   - Validation and transition errors
//!
//! - **`backend`** - Server-side code (only compiled with the `ssr` feature)
//!   - Axum router, handlers and auth middleware
//!   - SQLite persistence through `sqlx`
//!   - Image uploads and static file serving
//!
//! # Feature Flags
//!
//! - **`ssr`** (default) - Enables the backend modules and the server binary
//!
//! # Usage
//!
//! ```rust,no_run
//! use palaver::backend::server::{create_app, ServerConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let (app, pool) = create_app(ServerConfig::from_env()).await?;
//! // Serve `app` with axum::serve, then close `pool` on shutdown
//! # Ok(())
//! # }
//! ```
//!
//! # Error Handling
//!
//! - `shared::SharedError` for validation failures and illegal state transitions
//! - `backend::BackendError` for everything a handler can return; it renders
//!   as `{ "error": { "message", "status", "fields"? } }`

/// Shared types and data structures
pub mod shared;

/// Backend server-side code
#[cfg(feature = "ssr")]
pub mod backend;
