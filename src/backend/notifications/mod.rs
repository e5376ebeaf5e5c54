//! Notifications Module
//!
//! Notifications are written by other operations (messages, group changes)
//! and deleted when the user acknowledges them.

pub mod db;
pub mod handlers;

pub use handlers::{list_notifications, mark_all_as_read, mark_as_read};
