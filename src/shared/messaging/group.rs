//! Group Data Structures
//!
//! Groups hold any number of members, a subset of which are admins. A group
//! always keeps at least one admin, and every admin is a member.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::message::ChatMessage;
use super::user::{SenderRef, UserProfile};

/// Represents a stored group
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Group {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    /// Relative icon path, if one was uploaded
    pub icon: Option<String>,
    pub last_message_id: Option<Uuid>,
    pub last_message_sender_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Membership row
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct GroupMember {
    pub user_id: Uuid,
    pub is_admin: bool,
    pub joined_at: DateTime<Utc>,
}

/// Member with profile populated
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GroupMemberView {
    #[serde(flatten)]
    pub user: UserProfile,
    pub is_admin: bool,
}

/// A group with members and last message populated
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GroupView {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    /// Absolute icon URL
    pub icon: Option<String>,
    pub members: Vec<GroupMemberView>,
    pub admins: Vec<Uuid>,
    pub last_message: Option<ChatMessage>,
    pub last_message_sender: Option<SenderRef>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl GroupView {
    pub fn is_member(&self, user_id: Uuid) -> bool {
        self.members.iter().any(|m| m.user.id == user_id)
    }
}

/// Request to create a group
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateGroupRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Initial members besides the creator
    #[serde(default)]
    pub members: Vec<Uuid>,
}

/// Request to add members
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddMembersRequest {
    #[serde(default)]
    pub members: Vec<Uuid>,
}

/// Response carrying one group
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupResponse {
    pub message: String,
    pub group: GroupView,
}

/// Response for listing groups
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListGroupsResponse {
    pub groups: Vec<GroupView>,
}

/// Response after leaving a group
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeaveGroupResponse {
    pub message: String,
    pub groups: Vec<GroupView>,
}

/// Response without a payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupDeletedResponse {
    pub message: String,
}
