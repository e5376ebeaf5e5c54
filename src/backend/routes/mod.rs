//! Route Configuration Module
//!
//! This module configures all HTTP routes for the backend server.
//! Routes are organized by functionality into focused submodules.
//!
//! - **`router`** - Main router creation, health check and fallback
//! - **`user_routes`** - Account routes under `/users`
//! - **`api_routes`** - Contacts, chats, messages, groups and notifications under `/api`

pub mod api_routes;
pub mod router;
pub mod user_routes;

pub use router::create_router;
