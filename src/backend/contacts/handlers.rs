//! Contact HTTP Handlers
//!
//! All routes require authentication; every record they touch is owned by
//! the caller.

use axum::{extract::State, Json};
use sqlx::SqlitePool;
use uuid::Uuid;

use super::db;
use crate::backend::auth::users::{get_user_by_id, get_users_by_ids};
use crate::backend::error::BackendError;
use crate::backend::middleware::{AuthUser, BaseUrl, PathParams};
use crate::backend::server::config::begin_write;
use crate::shared::messaging::{
    ContactChangedResponse, ContactEntry, ContactStatus, ListContactsResponse, MessageResponse,
};

/// Reject self-targets and unknown users before touching contacts
async fn require_other_user(pool: &SqlitePool, caller: Uuid, target: Uuid) -> Result<(), BackendError> {
    if caller == target {
        return Err(BackendError::bad_request("You cannot add yourself as a contact"));
    }
    get_user_by_id(pool, target)
        .await?
        .ok_or_else(|| BackendError::not_found("User not found"))?;
    Ok(())
}

async fn change_contact(
    pool: &SqlitePool,
    caller: Uuid,
    target: Uuid,
    status: ContactStatus,
) -> Result<ContactChangedResponse, BackendError> {
    require_other_user(pool, caller, target).await?;

    let mut tx = begin_write(&pool).await?;
    let contact = db::upsert_contact(&mut tx, caller, target, status).await?;
    tx.commit().await?;

    tracing::info!("Contact {} -> {} is now {}", caller, target, contact.status);

    let message = match status {
        ContactStatus::Blocked => "Contact blocked successfully",
        _ => "Contact added successfully",
    };
    Ok(ContactChangedResponse {
        message: message.to_string(),
        contact,
    })
}

/// POST /api/contacts/{contact_id}
pub async fn add_contact(
    State(pool): State<SqlitePool>,
    AuthUser(auth): AuthUser,
    PathParams(contact_id): PathParams<Uuid>,
) -> Result<Json<ContactChangedResponse>, BackendError> {
    change_contact(&pool, auth.user_id, contact_id, ContactStatus::Accepted)
        .await
        .map(Json)
}

/// PUT /api/contacts/{contact_id}/block
pub async fn block_contact(
    State(pool): State<SqlitePool>,
    AuthUser(auth): AuthUser,
    PathParams(contact_id): PathParams<Uuid>,
) -> Result<Json<ContactChangedResponse>, BackendError> {
    change_contact(&pool, auth.user_id, contact_id, ContactStatus::Blocked)
        .await
        .map(Json)
}

/// Caller's contacts with the target profile populated
async fn contacts_for(
    pool: &SqlitePool,
    base: &BaseUrl,
    owner_id: Uuid,
    status: Option<ContactStatus>,
) -> Result<ListContactsResponse, BackendError> {
    let contacts = db::list_contacts(pool, owner_id, status).await?;
    let ids: Vec<Uuid> = contacts.iter().map(|c| c.contact_user_id).collect();
    let users = get_users_by_ids(pool, &ids).await?;

    let contacts = contacts
        .into_iter()
        .filter_map(|contact| {
            let user = users.iter().find(|u| u.id == contact.contact_user_id)?;
            Some(ContactEntry {
                id: contact.id,
                status: contact.status,
                contact: user.to_profile(base),
                created_at: contact.created_at,
            })
        })
        .collect();

    Ok(ListContactsResponse { contacts })
}

/// GET /api/contacts
pub async fn list_contacts(
    State(pool): State<SqlitePool>,
    AuthUser(auth): AuthUser,
    base: BaseUrl,
) -> Result<Json<ListContactsResponse>, BackendError> {
    contacts_for(&pool, &base, auth.user_id, None).await.map(Json)
}

/// GET /api/contacts/{status}
pub async fn list_contacts_by_status(
    State(pool): State<SqlitePool>,
    AuthUser(auth): AuthUser,
    base: BaseUrl,
    PathParams(status): PathParams<String>,
) -> Result<Json<ListContactsResponse>, BackendError> {
    let status = ContactStatus::parse(&status).ok_or_else(|| {
        BackendError::validation("status", "Status must be one of pending, accepted, rejected, blocked")
    })?;
    contacts_for(&pool, &base, auth.user_id, Some(status)).await.map(Json)
}

/// DELETE /api/contacts/{contact_id}
pub async fn delete_contact(
    State(pool): State<SqlitePool>,
    AuthUser(auth): AuthUser,
    PathParams(contact_id): PathParams<Uuid>,
) -> Result<Json<MessageResponse>, BackendError> {
    if !db::delete_contact(&pool, auth.user_id, contact_id).await? {
        return Err(BackendError::not_found("Contact not found"));
    }

    tracing::info!("Contact {} -> {} deleted", auth.user_id, contact_id);
    Ok(Json(MessageResponse::new("Contact deleted successfully")))
}
