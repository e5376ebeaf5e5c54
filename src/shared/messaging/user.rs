//! User Profile Data Structure
//!
//! The public view of an account. The password hash lives only on the
//! backend's `User` row and never reaches these types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Picture shown until the user uploads their own
pub const DEFAULT_PROFILE_PICTURE: &str = "/images/blank-profile-picture.png";

/// Default "about" line for new accounts
pub const DEFAULT_ABOUT: &str = "Just chatting here!";

/// Presence flag shown next to a profile
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum UserStatus {
    Online,
    #[default]
    Offline,
}

impl UserStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserStatus::Online => "Online",
            UserStatus::Offline => "Offline",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "online" => Some(UserStatus::Online),
            "offline" => Some(UserStatus::Offline),
            _ => None,
        }
    }
}

impl std::fmt::Display for UserStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Profile returned to clients
///
/// `profile_picture` is an absolute URL once it leaves the server.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserProfile {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub profile_picture: String,
    pub about: String,
    pub status: UserStatus,
    pub created_at: DateTime<Utc>,
}

/// Compact sender reference attached to listed messages
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SenderRef {
    pub id: Uuid,
    pub username: String,
}

/// Response wrapper for profile endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileResponse {
    pub user: UserProfile,
}
