//! Populated group views

use sqlx::SqliteConnection;
use uuid::Uuid;

use super::db;
use crate::backend::auth::users::{get_user_by_id, get_users_by_ids};
use crate::backend::error::BackendError;
use crate::backend::messages::db::get_message;
use crate::backend::middleware::BaseUrl;
use crate::shared::messaging::{Group, GroupMemberView, GroupView};

/// Populate members, admins and the last message of a group
pub async fn group_view(conn: &mut SqliteConnection, base: &BaseUrl, group: Group) -> Result<GroupView, BackendError> {
    let memberships = db::list_members(&mut *conn, group.id).await?;
    let ids: Vec<Uuid> = memberships.iter().map(|m| m.user_id).collect();
    let users = get_users_by_ids(&mut *conn, &ids).await?;

    let members = memberships
        .iter()
        .filter_map(|m| {
            let user = users.iter().find(|u| u.id == m.user_id)?;
            Some(GroupMemberView {
                user: user.to_profile(base),
                is_admin: m.is_admin,
            })
        })
        .collect();
    let admins = memberships.iter().filter(|m| m.is_admin).map(|m| m.user_id).collect();

    let last_message = match group.last_message_id {
        Some(id) => get_message(&mut *conn, id).await?,
        None => None,
    };
    let last_message_sender = match group.last_message_sender_id {
        Some(id) => get_user_by_id(&mut *conn, id).await?.map(|u| u.sender_ref()),
        None => None,
    };

    Ok(GroupView {
        id: group.id,
        name: group.name,
        description: group.description,
        icon: base.absolute_opt(group.icon.as_deref()),
        members,
        admins,
        last_message,
        last_message_sender,
        created_at: group.created_at,
        updated_at: group.updated_at,
    })
}

/// Every group the user belongs to, most recently updated first
pub async fn groups_for(conn: &mut SqliteConnection, base: &BaseUrl, user_id: Uuid) -> Result<Vec<GroupView>, BackendError> {
    let mut views = Vec::new();
    for group in db::list_groups_for(&mut *conn, user_id).await? {
        views.push(group_view(conn, base, group).await?);
    }
    Ok(views)
}
