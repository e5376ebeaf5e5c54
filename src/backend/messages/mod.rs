//! Messages Module
//!
//! Storage and delivery-status handling for chat and group messages.
//!
//! - **`db`** - Database operations
//! - **`handlers`** - HTTP handlers for `/api/messages`, plus the pagination
//!   and content helpers used by chats and groups

pub mod db;
pub mod handlers;

pub use handlers::{send_message, update_message_status, Pagination};
