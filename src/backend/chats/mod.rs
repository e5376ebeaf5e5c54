//! Chats Module
//!
//! One-to-one conversations between two users.
//!
//! - **`db`** - Database operations
//! - **`handlers`** - HTTP handlers for `/api/chats`

pub mod db;
pub mod handlers;

pub use handlers::{create_chat, delete_chat, get_chat_messages, list_chats};
