//! Notification HTTP Handlers

use axum::{extract::State, Json};
use sqlx::SqlitePool;
use uuid::Uuid;

use super::db;
use crate::backend::error::BackendError;
use crate::backend::middleware::{AuthUser, PathParams};
use crate::shared::messaging::{ListNotificationsResponse, MessageResponse};

/// GET /api/notifications
pub async fn list_notifications(
    State(pool): State<SqlitePool>,
    AuthUser(auth): AuthUser,
) -> Result<Json<ListNotificationsResponse>, BackendError> {
    let notifications = db::list_notifications(&pool, auth.user_id).await?;
    Ok(Json(ListNotificationsResponse { notifications }))
}

/// PUT /api/notifications/{notification_id}/read
///
/// Acknowledging a notification deletes it.
pub async fn mark_as_read(
    State(pool): State<SqlitePool>,
    AuthUser(auth): AuthUser,
    PathParams(notification_id): PathParams<Uuid>,
) -> Result<Json<MessageResponse>, BackendError> {
    if !db::delete_notification(&pool, auth.user_id, notification_id).await? {
        return Err(BackendError::not_found("Notification not found"));
    }
    Ok(Json(MessageResponse::new("Notification cleared")))
}

/// PUT /api/notifications/read
pub async fn mark_all_as_read(
    State(pool): State<SqlitePool>,
    AuthUser(auth): AuthUser,
) -> Result<Json<MessageResponse>, BackendError> {
    let cleared = db::delete_all_notifications(&pool, auth.user_id).await?;
    tracing::info!("Cleared {} notifications for {}", cleared, auth.username);
    Ok(Json(MessageResponse::new("All notifications cleared")))
}
