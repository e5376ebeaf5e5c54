//! Group HTTP Handlers
//!
//! Every route loads a [`GroupAccess`] first and asks it for the member or
//! admin capability. Multi-step changes run in one transaction together
//! with the notifications they produce.

use std::sync::Arc;

use axum::{
    extract::{Multipart, State},
    Json,
};
use sqlx::{SqliteConnection, SqlitePool};
use uuid::Uuid;

use super::access::GroupAccess;
use super::db;
use super::view::{group_view, groups_for};
use crate::backend::auth::users::get_users_by_ids;
use crate::backend::error::BackendError;
use crate::backend::messages::db::{delete_messages_for, insert_message};
use crate::backend::messages::handlers::{message_content, message_page};
use crate::backend::messages::Pagination;
use crate::backend::middleware::{AuthUser, BaseUrl, JsonBody, PathParams, QueryParams};
use crate::backend::notifications::db::create_notification;
use crate::backend::server::config::{begin_write, ServerConfig};
use crate::backend::uploads::{discard_image, read_form, UploadKind};
use crate::shared::messaging::{
    AddMembersRequest, ChatMessage, CreateGroupRequest, GroupDeletedResponse, GroupResponse, GroupView,
    LeaveGroupResponse, ListGroupsResponse, ListMessagesResponse, Notification, ParentKind,
    SendMessageRequest, SendMessageResponse,
};
use crate::shared::FieldErrors;

/// Deduplicate requested member IDs, dropping `skip`, and flag unknown users
async fn resolve_members(
    conn: &mut SqliteConnection,
    requested: &[Uuid],
    skip: Uuid,
    errors: &mut FieldErrors,
) -> Result<Vec<Uuid>, BackendError> {
    let mut ids: Vec<Uuid> = Vec::with_capacity(requested.len());
    for id in requested {
        if *id != skip && !ids.contains(id) {
            ids.push(*id);
        }
    }

    let users = get_users_by_ids(&mut *conn, &ids).await?;
    for id in &ids {
        if !users.iter().any(|u| u.id == *id) {
            errors.push("members", format!("User {id} does not exist"));
        }
    }
    Ok(ids)
}

fn group_response(message: &str, group: GroupView) -> Json<GroupResponse> {
    Json(GroupResponse {
        message: message.to_string(),
        group,
    })
}

/// POST /api/groups
///
/// The caller becomes the first member and sole admin.
pub async fn create_group(
    State(pool): State<SqlitePool>,
    AuthUser(auth): AuthUser,
    base: BaseUrl,
    JsonBody(request): JsonBody<CreateGroupRequest>,
) -> Result<Json<GroupResponse>, BackendError> {
    let name = request.name.trim().to_string();
    let description = request.description.as_deref().unwrap_or_default().trim().to_string();

    let mut tx = begin_write(&pool).await?;

    let mut errors = FieldErrors::default();
    errors.check(!name.is_empty(), "name", "Group name cannot be empty");
    let members = resolve_members(&mut tx, &request.members, auth.user_id, &mut errors).await?;
    errors.finish()?;

    let group = db::create_group(&mut *tx, &name, &description).await?;
    db::add_member(&mut *tx, group.id, auth.user_id, true).await?;
    for member in &members {
        db::add_member(&mut *tx, group.id, *member, false).await?;
        create_notification(&mut *tx, &Notification::added_to_group(*member, &group.name)).await?;
    }

    let view = group_view(&mut tx, &base, group).await?;
    tx.commit().await?;

    tracing::info!("Group {} created by {} with {} members", view.id, auth.user_id, view.members.len());
    Ok(group_response("Group created successfully", view))
}

/// GET /api/groups
pub async fn list_groups(
    State(pool): State<SqlitePool>,
    AuthUser(auth): AuthUser,
    base: BaseUrl,
) -> Result<Json<ListGroupsResponse>, BackendError> {
    let mut conn = pool.acquire().await?;
    let groups = groups_for(&mut conn, &base, auth.user_id).await?;
    Ok(Json(ListGroupsResponse { groups }))
}

/// GET /api/groups/{group_id}
pub async fn get_group(
    State(pool): State<SqlitePool>,
    AuthUser(auth): AuthUser,
    base: BaseUrl,
    PathParams(group_id): PathParams<Uuid>,
) -> Result<Json<GroupResponse>, BackendError> {
    let mut conn = pool.acquire().await?;
    let access = GroupAccess::load(&mut conn, group_id, auth.user_id).await?;
    access.require_member()?;

    let view = group_view(&mut conn, &base, access.group).await?;
    Ok(group_response("Group found", view))
}

/// PUT /api/groups/{group_id}
///
/// Multipart fields: `name`, `description`, file `groupIcon`. The icon is
/// written once the fields are valid and removed again if the update fails.
pub async fn update_group(
    State(pool): State<SqlitePool>,
    State(config): State<Arc<ServerConfig>>,
    AuthUser(auth): AuthUser,
    base: BaseUrl,
    PathParams(group_id): PathParams<Uuid>,
    multipart: Multipart,
) -> Result<Json<GroupResponse>, BackendError> {
    // Check before anything is written to disk.
    {
        let mut conn = pool.acquire().await?;
        GroupAccess::load(&mut conn, group_id, auth.user_id).await?.require_admin()?;
    }

    let mut form = read_form(multipart, &config, UploadKind::GroupIcon).await?;
    let name = form.text("name");
    if form.fields.contains_key("name") && name.is_none() {
        return Err(BackendError::validation("name", "Group name cannot be empty"));
    }
    let changes = GroupChanges {
        name,
        description: form.fields.get("description").map(|d| d.trim().to_string()),
        icon: form.save_image(&config).await?,
    };

    let view = match apply_group_changes(&pool, &base, group_id, auth.user_id, &changes).await {
        Ok(view) => view,
        Err(e) => {
            discard_image(&config, changes.icon.as_deref()).await;
            return Err(e);
        }
    };

    tracing::info!("Group {} updated by {}", group_id, auth.user_id);
    Ok(group_response("Group updated successfully", view))
}

struct GroupChanges {
    name: Option<String>,
    description: Option<String>,
    icon: Option<String>,
}

async fn apply_group_changes(
    pool: &SqlitePool,
    base: &BaseUrl,
    group_id: Uuid,
    user_id: Uuid,
    changes: &GroupChanges,
) -> Result<GroupView, BackendError> {
    let mut tx = begin_write(pool).await?;
    // Rights may have changed while the form was uploading.
    GroupAccess::load(&mut tx, group_id, user_id).await?.require_admin()?;

    let group = db::update_group(
        &mut *tx,
        group_id,
        changes.name.as_deref(),
        changes.description.as_deref(),
        changes.icon.as_deref(),
    )
    .await?;
    let view = group_view(&mut tx, base, group).await?;
    tx.commit().await?;
    Ok(view)
}

/// PUT /api/groups/{group_id}/members
pub async fn add_members(
    State(pool): State<SqlitePool>,
    AuthUser(auth): AuthUser,
    base: BaseUrl,
    PathParams(group_id): PathParams<Uuid>,
    JsonBody(request): JsonBody<AddMembersRequest>,
) -> Result<Json<GroupResponse>, BackendError> {
    let mut tx = begin_write(&pool).await?;
    let access = GroupAccess::load(&mut tx, group_id, auth.user_id).await?;
    access.require_admin()?;

    let mut errors = FieldErrors::default();
    let requested = resolve_members(&mut tx, &request.members, auth.user_id, &mut errors).await?;
    errors.finish()?;

    let mut added = Vec::new();
    for member in requested {
        if db::add_member(&mut *tx, group_id, member, false).await? {
            create_notification(&mut *tx, &Notification::added_to_group(member, &access.group.name)).await?;
            added.push(member);
        }
    }

    let message = if added.is_empty() {
        "No new members to add"
    } else {
        db::touch_group(&mut *tx, group_id).await?;
        "Members added successfully"
    };

    let group = db::get_group(&mut *tx, group_id)
        .await?
        .ok_or_else(|| BackendError::not_found("Group not found"))?;
    let view = group_view(&mut tx, &base, group).await?;
    tx.commit().await?;

    tracing::info!("{} members added to group {}", added.len(), group_id);
    Ok(group_response(message, view))
}

/// PUT /api/groups/{group_id}/members/{user_id}
pub async fn remove_member(
    State(pool): State<SqlitePool>,
    AuthUser(auth): AuthUser,
    base: BaseUrl,
    PathParams((group_id, user_id)): PathParams<(Uuid, Uuid)>,
) -> Result<Json<GroupResponse>, BackendError> {
    let mut tx = begin_write(&pool).await?;
    let access = GroupAccess::load(&mut tx, group_id, auth.user_id).await?;
    access.require_admin()?;

    let target = db::get_membership(&mut *tx, group_id, user_id)
        .await?
        .ok_or_else(|| BackendError::not_found("Member not found"))?;

    if target.is_admin && db::count_admins(&mut *tx, group_id).await? <= 1 {
        return Err(BackendError::bad_request("Cannot remove the last admin"));
    }

    db::remove_member(&mut *tx, group_id, user_id).await?;
    db::touch_group(&mut *tx, group_id).await?;
    create_notification(&mut *tx, &Notification::removed_from_group(user_id, &access.group.name)).await?;

    let group = db::get_group(&mut *tx, group_id)
        .await?
        .ok_or_else(|| BackendError::not_found("Group not found"))?;
    let view = group_view(&mut tx, &base, group).await?;
    tx.commit().await?;

    tracing::info!("User {} removed from group {} by {}", user_id, group_id, auth.user_id);
    Ok(group_response("Member removed successfully", view))
}

/// PUT /api/groups/{group_id}/admin/{user_id}
pub async fn appoint_admin(
    State(pool): State<SqlitePool>,
    AuthUser(auth): AuthUser,
    base: BaseUrl,
    PathParams((group_id, user_id)): PathParams<(Uuid, Uuid)>,
) -> Result<Json<GroupResponse>, BackendError> {
    let mut tx = begin_write(&pool).await?;
    let access = GroupAccess::load(&mut tx, group_id, auth.user_id).await?;
    access.require_admin()?;

    let target = db::get_membership(&mut *tx, group_id, user_id)
        .await?
        .ok_or_else(|| BackendError::bad_request("User must be a member of the group"))?;

    let message = if target.is_admin {
        "User is already an admin"
    } else {
        db::set_admin(&mut *tx, group_id, user_id, true).await?;
        db::touch_group(&mut *tx, group_id).await?;
        create_notification(&mut *tx, &Notification::appointed_admin(user_id, &access.group.name)).await?;
        tracing::info!("User {} is now an admin of group {}", user_id, group_id);
        "New admin appointed successfully"
    };

    let group = db::get_group(&mut *tx, group_id)
        .await?
        .ok_or_else(|| BackendError::not_found("Group not found"))?;
    let view = group_view(&mut tx, &base, group).await?;
    tx.commit().await?;

    Ok(group_response(message, view))
}

/// PUT /api/groups/{group_id}/leave
pub async fn leave_group(
    State(pool): State<SqlitePool>,
    AuthUser(auth): AuthUser,
    base: BaseUrl,
    PathParams(group_id): PathParams<Uuid>,
) -> Result<Json<LeaveGroupResponse>, BackendError> {
    let mut tx = begin_write(&pool).await?;
    let access = GroupAccess::load(&mut tx, group_id, auth.user_id).await?;
    access.require_member()?;

    if access.is_admin() && db::count_admins(&mut *tx, group_id).await? <= 1 {
        return Err(BackendError::bad_request("Appoint an admin before leaving"));
    }

    db::remove_member(&mut *tx, group_id, auth.user_id).await?;
    db::touch_group(&mut *tx, group_id).await?;
    let groups = groups_for(&mut tx, &base, auth.user_id).await?;
    tx.commit().await?;

    tracing::info!("User {} left group {}", auth.user_id, group_id);
    Ok(Json(LeaveGroupResponse {
        message: "User left the group successfully".to_string(),
        groups,
    }))
}

/// DELETE /api/groups/{group_id}
pub async fn delete_group(
    State(pool): State<SqlitePool>,
    AuthUser(auth): AuthUser,
    PathParams(group_id): PathParams<Uuid>,
) -> Result<Json<GroupDeletedResponse>, BackendError> {
    let mut tx = begin_write(&pool).await?;
    GroupAccess::load(&mut tx, group_id, auth.user_id).await?.require_admin()?;

    let removed = delete_messages_for(&mut *tx, group_id).await?;
    db::delete_group(&mut tx, group_id).await?;
    tx.commit().await?;

    tracing::info!("Group {} deleted by {} ({} messages)", group_id, auth.user_id, removed);
    Ok(Json(GroupDeletedResponse {
        message: "Group deleted successfully".to_string(),
    }))
}

/// POST /api/groups/{group_id}/messages
pub async fn send_group_message(
    State(pool): State<SqlitePool>,
    AuthUser(auth): AuthUser,
    PathParams(group_id): PathParams<Uuid>,
    JsonBody(request): JsonBody<SendMessageRequest>,
) -> Result<Json<SendMessageResponse>, BackendError> {
    let content = message_content(request)?;

    let mut tx = begin_write(&pool).await?;
    GroupAccess::load(&mut tx, group_id, auth.user_id).await?.require_member()?;

    let message = ChatMessage::new(auth.user_id, group_id, ParentKind::Group, content);
    insert_message(&mut *tx, &message).await?;
    db::set_last_message(&mut *tx, group_id, message.id, auth.user_id, message.timestamp).await?;
    tx.commit().await?;

    tracing::info!("Message {} sent to group {} by {}", message.id, group_id, auth.user_id);
    Ok(Json(SendMessageResponse {
        msg: "Message sent to group successfully".to_string(),
        message,
    }))
}

/// GET /api/groups/{group_id}/messages
pub async fn get_group_messages(
    State(pool): State<SqlitePool>,
    AuthUser(auth): AuthUser,
    PathParams(group_id): PathParams<Uuid>,
    QueryParams(page): QueryParams<Pagination>,
) -> Result<Json<ListMessagesResponse>, BackendError> {
    let mut conn = pool.acquire().await?;
    GroupAccess::load(&mut conn, group_id, auth.user_id).await?.require_member()?;
    message_page(&mut conn, group_id, page).await.map(Json)
}
