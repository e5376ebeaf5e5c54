//! Chat HTTP Handlers

use axum::{extract::State, http::StatusCode, Json};
use sqlx::{SqliteConnection, SqlitePool};
use uuid::Uuid;

use super::db;
use crate::backend::auth::users::{get_user_by_id, get_users_by_ids};
use crate::backend::error::BackendError;
use crate::backend::messages::db::{delete_messages_for, get_message};
use crate::backend::messages::handlers::message_page;
use crate::backend::messages::Pagination;
use crate::backend::middleware::{AuthUser, BaseUrl, PathParams, QueryParams};
use crate::backend::server::config::begin_write;
use crate::shared::messaging::{
    Chat, ChatResponse, ChatView, DeleteChatResponse, ListChatsResponse, ListMessagesResponse,
};

/// Populate participants and the last message
async fn chat_view(conn: &mut SqliteConnection, base: &BaseUrl, chat: Chat) -> Result<ChatView, BackendError> {
    let users = get_users_by_ids(&mut *conn, &chat.participants).await?;
    let participants = chat
        .participants
        .iter()
        .filter_map(|id| users.iter().find(|u| u.id == *id))
        .map(|u| u.to_profile(base))
        .collect();

    let last_message = match chat.last_message_id {
        Some(id) => get_message(&mut *conn, id).await?,
        None => None,
    };

    Ok(ChatView {
        id: chat.id,
        participants,
        last_message,
        created_at: chat.created_at,
        updated_at: chat.updated_at,
    })
}

async fn chats_for(conn: &mut SqliteConnection, base: &BaseUrl, user_id: Uuid) -> Result<Vec<ChatView>, BackendError> {
    let mut views = Vec::new();
    for chat in db::list_chats(&mut *conn, user_id).await? {
        views.push(chat_view(conn, base, chat).await?);
    }
    Ok(views)
}

/// Load a chat the caller participates in
async fn participant_chat(conn: &mut SqliteConnection, chat_id: Uuid, user_id: Uuid) -> Result<Chat, BackendError> {
    let chat = db::get_chat(&mut *conn, chat_id)
        .await?
        .ok_or_else(|| BackendError::not_found("Chat not found"))?;

    if !chat.has_participant(user_id) {
        tracing::warn!("User {} is not a participant of chat {}", user_id, chat_id);
        return Err(BackendError::forbidden("You are not a participant of this chat"));
    }
    Ok(chat)
}

/// POST /api/chats/{other_user_id}
///
/// Returns the existing chat for the pair when there is one.
pub async fn create_chat(
    State(pool): State<SqlitePool>,
    AuthUser(auth): AuthUser,
    base: BaseUrl,
    PathParams(other_id): PathParams<Uuid>,
) -> Result<(StatusCode, Json<ChatResponse>), BackendError> {
    if other_id == auth.user_id {
        return Err(BackendError::bad_request("You cannot start a chat with yourself"));
    }

    let mut tx = begin_write(&pool).await?;
    get_user_by_id(&mut *tx, other_id)
        .await?
        .ok_or_else(|| BackendError::not_found("User not found"))?;

    let (chat, created) = db::find_or_create_chat(&mut tx, auth.user_id, other_id).await?;
    let chat = chat_view(&mut tx, &base, chat).await?;
    tx.commit().await?;

    if created {
        tracing::info!("Chat {} created between {} and {}", chat.id, auth.user_id, other_id);
        Ok((
            StatusCode::CREATED,
            Json(ChatResponse { msg: "Chat created successfully".to_string(), chat }),
        ))
    } else {
        Ok((
            StatusCode::OK,
            Json(ChatResponse { msg: "Chat already exists".to_string(), chat }),
        ))
    }
}

/// GET /api/chats
pub async fn list_chats(
    State(pool): State<SqlitePool>,
    AuthUser(auth): AuthUser,
    base: BaseUrl,
) -> Result<Json<ListChatsResponse>, BackendError> {
    let mut conn = pool.acquire().await?;
    let chats = chats_for(&mut conn, &base, auth.user_id).await?;
    Ok(Json(ListChatsResponse { chats }))
}

/// GET /api/chats/{chat_id}/messages
pub async fn get_chat_messages(
    State(pool): State<SqlitePool>,
    AuthUser(auth): AuthUser,
    PathParams(chat_id): PathParams<Uuid>,
    QueryParams(page): QueryParams<Pagination>,
) -> Result<Json<ListMessagesResponse>, BackendError> {
    let mut conn = pool.acquire().await?;
    let chat = participant_chat(&mut conn, chat_id, auth.user_id).await?;
    message_page(&mut conn, chat.id, page).await.map(Json)
}

/// DELETE /api/chats/{chat_id}
///
/// Removes the chat for both participants along with its messages.
pub async fn delete_chat(
    State(pool): State<SqlitePool>,
    AuthUser(auth): AuthUser,
    base: BaseUrl,
    PathParams(chat_id): PathParams<Uuid>,
) -> Result<Json<DeleteChatResponse>, BackendError> {
    let mut tx = begin_write(&pool).await?;
    let chat = participant_chat(&mut tx, chat_id, auth.user_id).await?;

    let removed = delete_messages_for(&mut *tx, chat.id).await?;
    db::delete_chat(&mut *tx, chat.id).await?;
    let chats = chats_for(&mut tx, &base, auth.user_id).await?;
    tx.commit().await?;

    tracing::info!("Chat {} deleted by {} ({} messages)", chat.id, auth.user_id, removed);

    Ok(Json(DeleteChatResponse {
        msg: "Chat deleted successfully".to_string(),
        chats,
    }))
}
