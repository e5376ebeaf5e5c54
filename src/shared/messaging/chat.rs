//! Chat Data Structure
//!
//! A one-to-one conversation. Participants are stored as an ordered pair so
//! that each unordered pair of users maps to at most one chat.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::message::ChatMessage;
use super::user::UserProfile;

/// Represents a stored one-to-one chat
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Chat {
    pub id: Uuid,
    /// Participant IDs, smallest first
    pub participants: [Uuid; 2],
    pub last_message_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Chat {
    /// Order two user IDs the way they are stored
    pub fn pair(a: Uuid, b: Uuid) -> [Uuid; 2] {
        if a <= b {
            [a, b]
        } else {
            [b, a]
        }
    }

    pub fn has_participant(&self, user_id: Uuid) -> bool {
        self.participants.contains(&user_id)
    }
}

/// A chat with participants and last message populated
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChatView {
    pub id: Uuid,
    pub participants: Vec<UserProfile>,
    pub last_message: Option<ChatMessage>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Response for create-or-find
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatResponse {
    pub msg: String,
    pub chat: ChatView,
}

/// Response for listing chats
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListChatsResponse {
    pub chats: Vec<ChatView>,
}

/// Response after deleting a chat
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteChatResponse {
    pub msg: String,
    pub chats: Vec<ChatView>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pair_is_order_independent() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        assert_eq!(Chat::pair(a, b), Chat::pair(b, a));
        let [first, second] = Chat::pair(a, b);
        assert!(first < second);
    }

    #[test]
    fn test_has_participant() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let now = Utc::now();
        let chat = Chat {
            id: Uuid::new_v4(),
            participants: Chat::pair(a, b),
            last_message_id: None,
            created_at: now,
            updated_at: now,
        };
        assert!(chat.has_participant(a));
        assert!(chat.has_participant(b));
        assert!(!chat.has_participant(Uuid::new_v4()));
    }
}
