//! Messaging Module
//!
//! This module contains all the record and wire types for the messaging system:
//!
//! - `UserProfile` - Public view of an account
//! - `Contact` - A directed contact record with a status
//! - `Chat` - A one-to-one conversation
//! - `Group` - A many-member conversation with admins
//! - `ChatMessage` - A message in a chat or group
//! - `Notification` - A pending notice for one user
//!
//! # Usage
//!
//! ```rust
//! use palaver::shared::messaging::{ContactStatus, MessageStatus};
//!
//! assert!(MessageStatus::Sent.transition(MessageStatus::Delivered).is_ok());
//! assert!(ContactStatus::Pending.can_become(ContactStatus::Blocked));
//! ```

use serde::{Deserialize, Serialize};

pub mod chat;
pub mod contact;
pub mod group;
pub mod message;
pub mod notification;
pub mod user;

// Re-export all types
pub use chat::{Chat, ChatResponse, ChatView, DeleteChatResponse, ListChatsResponse};
pub use contact::{Contact, ContactChangedResponse, ContactEntry, ContactStatus, ListContactsResponse};
pub use group::{
    AddMembersRequest, CreateGroupRequest, Group, GroupDeletedResponse, GroupMember,
    GroupMemberView, GroupResponse, GroupView, LeaveGroupResponse, ListGroupsResponse,
};
pub use message::{
    ChatMessage, ListMessagesResponse, MessageStatus, MessageStatusResponse, MessageView,
    ParentKind, SendMessageRequest, SendMessageResponse,
};
pub use notification::{ListNotificationsResponse, Notification};
pub use user::{ProfileResponse, SenderRef, UserProfile, UserStatus};

/// Plain acknowledgement body
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }
}
