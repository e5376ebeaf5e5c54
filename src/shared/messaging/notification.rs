//! Notification Data Structure

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A pending notification for one user
///
/// Notifications are deleted when acknowledged.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Notification {
    pub id: Uuid,
    pub user_id: Uuid,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

impl Notification {
    pub fn new(user_id: Uuid, content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }

    pub fn new_message(user_id: Uuid, sender_username: &str) -> Self {
        Self::new(user_id, format!("You have a new message from {sender_username}."))
    }

    pub fn added_to_group(user_id: Uuid, group_name: &str) -> Self {
        Self::new(user_id, format!("You have been added to {group_name} group."))
    }

    pub fn removed_from_group(user_id: Uuid, group_name: &str) -> Self {
        Self::new(user_id, format!("You have been removed from {group_name} group."))
    }

    pub fn appointed_admin(user_id: Uuid, group_name: &str) -> Self {
        Self::new(user_id, format!("You are now an admin of {group_name} group."))
    }
}

/// Response for listing notifications
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListNotificationsResponse {
    pub notifications: Vec<Notification>,
}
