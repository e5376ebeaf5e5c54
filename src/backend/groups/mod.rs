//! Groups Module
//!
//! Named conversations with many members, some of which are admins.
//!
//! - **`access`** - `GroupAccess`, the member/admin gate used by every handler
//! - **`db`** - Database operations for groups and memberships
//! - **`handlers`** - HTTP handlers for `/api/groups`
//! - **`view`** - Populated group responses

pub mod access;
pub mod db;
pub mod handlers;
pub mod view;

pub use access::GroupAccess;
pub use handlers::{
    add_members, appoint_admin, create_group, delete_group, get_group, get_group_messages, leave_group,
    list_groups, remove_member, send_group_message, update_group,
};
