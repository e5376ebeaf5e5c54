//! Message HTTP Handlers
//!
//! Sending a direct message and moving a message through its delivery
//! states. The pagination and content helpers here are shared with the chat
//! and group handlers.

use axum::{extract::State, Json};
use serde::Deserialize;
use sqlx::{SqliteConnection, SqlitePool};
use uuid::Uuid;

use super::db;
use crate::backend::auth::users::get_user_by_id;
use crate::backend::chats::db as chats_db;
use crate::backend::contacts::db as contacts_db;
use crate::backend::error::BackendError;
use crate::backend::groups::GroupAccess;
use crate::backend::middleware::{AuthUser, JsonBody, PathParams};
use crate::backend::notifications::db::create_notification;
use crate::backend::server::config::begin_write;
use crate::shared::messaging::{
    ChatMessage, ContactStatus, ListMessagesResponse, MessageStatus, MessageStatusResponse, Notification,
    ParentKind, SendMessageRequest, SendMessageResponse,
};

/// `?limit=&offset=` for message listings
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct Pagination {
    pub limit: Option<u32>,
    #[serde(default)]
    pub offset: u32,
}

/// Load one page of a chat's or group's messages
pub async fn message_page(
    conn: &mut SqliteConnection,
    parent_id: Uuid,
    page: Pagination,
) -> Result<ListMessagesResponse, BackendError> {
    let messages = db::list_messages(&mut *conn, parent_id, page.limit, page.offset).await?;
    let has_more = page.limit.is_some_and(|limit| limit > 0 && messages.len() == limit as usize);

    Ok(ListMessagesResponse { messages, has_more })
}

/// Trimmed message content, or a field error when nothing is left
pub fn message_content(request: SendMessageRequest) -> Result<String, BackendError> {
    let content = request.content.trim();
    if content.is_empty() {
        return Err(BackendError::validation("content", "Message content cannot be empty"));
    }
    Ok(content.to_string())
}

/// POST /api/messages/{receiver_id}/send
pub async fn send_message(
    State(pool): State<SqlitePool>,
    AuthUser(auth): AuthUser,
    PathParams(receiver_id): PathParams<Uuid>,
    JsonBody(request): JsonBody<SendMessageRequest>,
) -> Result<Json<SendMessageResponse>, BackendError> {
    let content = message_content(request)?;

    if receiver_id == auth.user_id {
        return Err(BackendError::bad_request("You cannot send a message to yourself"));
    }

    let mut tx = begin_write(&pool).await?;

    let receiver = get_user_by_id(&mut *tx, receiver_id)
        .await?
        .ok_or_else(|| BackendError::not_found("User not found"))?;

    let receiver_view = contacts_db::get_contact(&mut *tx, receiver.id, auth.user_id).await?;
    if receiver_view.is_some_and(|c| c.status == ContactStatus::Blocked) {
        tracing::warn!("User {} is blocked by {}", auth.user_id, receiver.id);
        return Err(BackendError::forbidden(
            "Can't send message to this user because you're blocked",
        ));
    }

    if contacts_db::get_contact(&mut *tx, auth.user_id, receiver.id).await?.is_none() {
        contacts_db::create_contact(&mut *tx, auth.user_id, receiver.id, ContactStatus::Pending).await?;
    }

    let (chat, _) = chats_db::find_or_create_chat(&mut tx, auth.user_id, receiver.id).await?;
    let message = ChatMessage::new(auth.user_id, chat.id, ParentKind::Chat, content);
    db::insert_message(&mut *tx, &message).await?;
    chats_db::set_last_message(&mut *tx, chat.id, message.id, message.timestamp).await?;
    create_notification(&mut *tx, &Notification::new_message(receiver.id, &auth.username)).await?;

    tx.commit().await?;

    tracing::info!("Message {} sent from {} to {}", message.id, auth.user_id, receiver.id);

    Ok(Json(SendMessageResponse {
        msg: "Message sent successfully".to_string(),
        message,
    }))
}

/// Whether `user_id` may see the message's chat or group
async fn can_access_parent(
    conn: &mut SqliteConnection,
    message: &ChatMessage,
    user_id: Uuid,
) -> Result<bool, BackendError> {
    let allowed = match message.parent_kind {
        ParentKind::Chat => chats_db::get_chat(&mut *conn, message.parent_id)
            .await?
            .is_some_and(|chat| chat.has_participant(user_id)),
        ParentKind::Group => GroupAccess::load(&mut *conn, message.parent_id, user_id)
            .await?
            .is_member(),
    };
    Ok(allowed)
}

/// PUT /api/messages/{msg_id}/update/{status}
pub async fn update_message_status(
    State(pool): State<SqlitePool>,
    AuthUser(auth): AuthUser,
    PathParams((message_id, status)): PathParams<(Uuid, String)>,
) -> Result<Json<MessageStatusResponse>, BackendError> {
    let target = match MessageStatus::parse(&status) {
        Some(status @ (MessageStatus::Delivered | MessageStatus::Read)) => status,
        _ => {
            return Err(BackendError::validation(
                "status",
                "Status must be either delivered or read",
            ))
        }
    };

    let mut tx = begin_write(&pool).await?;

    let message = db::get_message(&mut *tx, message_id)
        .await?
        .ok_or_else(|| BackendError::not_found("Message not found"))?;

    if message.sender_id == auth.user_id {
        return Err(BackendError::forbidden("You cannot update the status of your own message"));
    }
    if !can_access_parent(&mut tx, &message, auth.user_id).await? {
        return Err(BackendError::forbidden("You are not a participant of this conversation"));
    }

    let next = message.status.transition(target).inspect_err(|_| {
        tracing::warn!(
            "Rejected message {} status change {} -> {}",
            message.id,
            message.status,
            target
        );
    })?;

    let message = if next == message.status {
        message
    } else {
        db::set_message_status(&mut *tx, message.id, next).await?
    };
    tx.commit().await?;

    Ok(Json(MessageStatusResponse {
        msg: format!("Message status updated to {next}"),
        message,
    }))
}
