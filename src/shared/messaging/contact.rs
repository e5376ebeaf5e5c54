//! Contact Data Structure
//!
//! A contact is a directed relationship record: `user_id` keeps an entry for
//! `contact_user_id` with a status. The reverse direction is a separate record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::user::UserProfile;
use crate::shared::error::SharedError;

/// Status of a contact record
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum ContactStatus {
    /// Created implicitly by a first message, not yet confirmed
    #[default]
    Pending,
    /// Explicitly added by the owner
    Accepted,
    Rejected,
    /// Owner refuses messages from the target
    Blocked,
}

impl ContactStatus {
    pub const ALL: [ContactStatus; 4] = [
        ContactStatus::Pending,
        ContactStatus::Accepted,
        ContactStatus::Rejected,
        ContactStatus::Blocked,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ContactStatus::Pending => "pending",
            ContactStatus::Accepted => "accepted",
            ContactStatus::Rejected => "rejected",
            ContactStatus::Blocked => "blocked",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "pending" => Some(ContactStatus::Pending),
            "accepted" => Some(ContactStatus::Accepted),
            "rejected" => Some(ContactStatus::Rejected),
            "blocked" => Some(ContactStatus::Blocked),
            _ => None,
        }
    }

    /// Whether the transition table allows moving to `next`
    ///
    /// Staying in the same status is always allowed.
    pub fn can_become(self, next: ContactStatus) -> bool {
        use ContactStatus::*;
        self == next
            || matches!(
                (self, next),
                (Pending, Accepted | Rejected | Blocked)
                    | (Accepted, Blocked)
                    | (Rejected, Accepted | Blocked)
                    | (Blocked, Accepted)
            )
    }

    /// Checked transition
    pub fn transition(self, next: ContactStatus) -> Result<ContactStatus, SharedError> {
        if self.can_become(next) {
            Ok(next)
        } else {
            Err(SharedError::transition("contact", self, next))
        }
    }
}

impl std::fmt::Display for ContactStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A stored contact record
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Contact {
    /// Unique contact ID
    pub id: Uuid,
    /// The user who owns this contact entry
    pub user_id: Uuid,
    /// The user ID of the contact
    pub contact_user_id: Uuid,
    pub status: ContactStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A contact record with the target's profile populated
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ContactEntry {
    pub id: Uuid,
    pub status: ContactStatus,
    pub contact: UserProfile,
    pub created_at: DateTime<Utc>,
}

/// Response type for listing contacts
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListContactsResponse {
    pub contacts: Vec<ContactEntry>,
}

/// Response after adding or blocking a contact
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContactChangedResponse {
    pub message: String,
    pub contact: Contact,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_round_trips_through_str() {
        for status in ContactStatus::ALL {
            assert_eq!(ContactStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(ContactStatus::parse("friends"), None);
    }

    #[test]
    fn test_block_allowed_from_every_status() {
        for status in ContactStatus::ALL {
            assert!(status.can_become(ContactStatus::Blocked));
        }
    }

    #[test]
    fn test_blocked_cannot_go_back_to_pending() {
        let result = ContactStatus::Blocked.transition(ContactStatus::Pending);
        assert!(matches!(result, Err(SharedError::InvalidTransition { entity: "contact", .. })));
    }

    #[test]
    fn test_re_adding_unblocks() {
        assert_eq!(
            ContactStatus::Blocked.transition(ContactStatus::Accepted),
            Ok(ContactStatus::Accepted)
        );
    }
}
