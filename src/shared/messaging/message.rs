//! Chat Message Data Structure
//!
//! Represents a message posted to a one-to-one chat or to a group. Content is
//! fixed at creation; only the delivery status moves afterwards.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::user::SenderRef;
use crate::shared::error::SharedError;

/// Kind of container a message belongs to
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ParentKind {
    Chat,
    Group,
}

impl ParentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ParentKind::Chat => "chat",
            ParentKind::Group => "group",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "chat" => Some(ParentKind::Chat),
            "group" => Some(ParentKind::Group),
            _ => None,
        }
    }
}

/// Delivery status of a message
///
/// Moves forward one step at a time: `sent -> delivered -> read`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum MessageStatus {
    #[default]
    Sent,
    Delivered,
    Read,
}

impl MessageStatus {
    pub const ALL: [MessageStatus; 3] = [
        MessageStatus::Sent,
        MessageStatus::Delivered,
        MessageStatus::Read,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MessageStatus::Sent => "sent",
            MessageStatus::Delivered => "delivered",
            MessageStatus::Read => "read",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "sent" => Some(MessageStatus::Sent),
            "delivered" => Some(MessageStatus::Delivered),
            "read" => Some(MessageStatus::Read),
            _ => None,
        }
    }

    /// The only status reachable in one step, if any
    pub fn next(self) -> Option<MessageStatus> {
        match self {
            MessageStatus::Sent => Some(MessageStatus::Delivered),
            MessageStatus::Delivered => Some(MessageStatus::Read),
            MessageStatus::Read => None,
        }
    }

    /// Checked transition; re-applying the current status is a no-op
    pub fn transition(self, target: MessageStatus) -> Result<MessageStatus, SharedError> {
        if target == self || self.next() == Some(target) {
            Ok(target)
        } else {
            Err(SharedError::transition("message", self, target))
        }
    }
}

impl std::fmt::Display for MessageStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Represents a stored message
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChatMessage {
    /// Unique message ID
    pub id: Uuid,
    /// User who sent the message
    pub sender_id: Uuid,
    /// Chat or group this message belongs to
    pub parent_id: Uuid,
    pub parent_kind: ParentKind,
    pub content: String,
    pub status: MessageStatus,
    /// When the message was sent
    pub timestamp: DateTime<Utc>,
}

impl ChatMessage {
    /// Create a new message in the `sent` state
    pub fn new(sender_id: Uuid, parent_id: Uuid, parent_kind: ParentKind, content: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            sender_id,
            parent_id,
            parent_kind,
            content,
            status: MessageStatus::Sent,
            timestamp: Utc::now(),
        }
    }
}

/// A listed message with its sender's username
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MessageView {
    #[serde(flatten)]
    pub message: ChatMessage,
    pub sender: SenderRef,
}

/// Request to send a message
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SendMessageRequest {
    #[serde(default)]
    pub content: String,
}

/// Response after sending a message
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SendMessageResponse {
    pub msg: String,
    pub message: ChatMessage,
}

/// Response type for listing messages
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListMessagesResponse {
    pub messages: Vec<MessageView>,
    /// Set when a `limit` was given and more messages may follow
    pub has_more: bool,
}

/// Response after a status change
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageStatusResponse {
    pub msg: String,
    pub message: ChatMessage,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_message_is_sent() {
        let message = ChatMessage::new(Uuid::new_v4(), Uuid::new_v4(), ParentKind::Chat, "hi".into());
        assert_eq!(message.status, MessageStatus::Sent);
    }

    #[test]
    fn test_forward_steps_are_allowed() {
        assert_eq!(MessageStatus::Sent.transition(MessageStatus::Delivered), Ok(MessageStatus::Delivered));
        assert_eq!(MessageStatus::Delivered.transition(MessageStatus::Read), Ok(MessageStatus::Read));
    }

    #[test]
    fn test_read_requires_delivered_first() {
        assert!(MessageStatus::Sent.transition(MessageStatus::Read).is_err());
    }

    #[test]
    fn test_status_never_moves_backward() {
        assert!(MessageStatus::Read.transition(MessageStatus::Delivered).is_err());
        assert!(MessageStatus::Delivered.transition(MessageStatus::Sent).is_err());
    }

    #[test]
    fn test_view_flattens_message_fields() {
        let message = ChatMessage::new(Uuid::new_v4(), Uuid::new_v4(), ParentKind::Group, "yo".into());
        let view = MessageView {
            sender: SenderRef { id: message.sender_id, username: "ann".into() },
            message,
        };
        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["content"], "yo");
        assert_eq!(json["parent_kind"], "group");
        assert_eq!(json["sender"]["username"], "ann");
    }
}
