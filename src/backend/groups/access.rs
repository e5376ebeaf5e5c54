//! Group access checks
//!
//! `GroupAccess` loads a group and the caller's membership once. Handlers
//! then ask it for the capability they need instead of inspecting member
//! lists themselves.

use sqlx::SqliteConnection;
use uuid::Uuid;

use super::db;
use crate::backend::error::BackendError;
use crate::shared::messaging::{Group, GroupMember};

#[derive(Debug, Clone)]
pub struct GroupAccess {
    pub group: Group,
    pub user_id: Uuid,
    membership: Option<GroupMember>,
}

impl GroupAccess {
    /// Load the group for `user_id`
    ///
    /// # Errors
    ///
    /// 404 if the group does not exist.
    pub async fn load(
        conn: &mut SqliteConnection,
        group_id: Uuid,
        user_id: Uuid,
    ) -> Result<Self, BackendError> {
        let group = db::get_group(&mut *conn, group_id)
            .await?
            .ok_or_else(|| BackendError::not_found("Group not found"))?;
        let membership = db::get_membership(&mut *conn, group_id, user_id).await?;

        Ok(Self { group, user_id, membership })
    }

    pub fn is_member(&self) -> bool {
        self.membership.is_some()
    }

    pub fn is_admin(&self) -> bool {
        self.membership.is_some_and(|m| m.is_admin)
    }

    /// 403 unless the caller is a member
    pub fn require_member(&self) -> Result<&GroupMember, BackendError> {
        self.membership.as_ref().ok_or_else(|| {
            tracing::warn!("User {} is not a member of group {}", self.user_id, self.group.id);
            BackendError::forbidden("You are not a member of this group")
        })
    }

    /// 403 unless the caller is an admin
    pub fn require_admin(&self) -> Result<&GroupMember, BackendError> {
        match self.membership.as_ref() {
            Some(member) if member.is_admin => Ok(member),
            _ => {
                tracing::warn!("User {} is not an admin of group {}", self.user_id, self.group.id);
                Err(BackendError::forbidden("Only admins can manage this group"))
            }
        }
    }
}
