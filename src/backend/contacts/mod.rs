//! Contacts Module
//!
//! Directed contact records and their status transitions.
//!
//! - **`db`** - Database operations
//! - **`handlers`** - HTTP handlers for `/api/contacts`

pub mod db;
pub mod handlers;

pub use handlers::{add_contact, block_contact, delete_contact, list_contacts, list_contacts_by_status};
