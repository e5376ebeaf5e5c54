//! Database operations for notifications

use sqlx::{sqlite::SqliteRow, Row, SqliteExecutor};
use uuid::Uuid;

use crate::shared::messaging::Notification;

fn notification_from_row(row: &SqliteRow) -> Result<Notification, sqlx::Error> {
    Ok(Notification {
        id: row.try_get("id")?,
        user_id: row.try_get("user_id")?,
        content: row.try_get("content")?,
        timestamp: row.try_get("created_at")?,
    })
}

/// Store a notification
pub async fn create_notification<'e>(
    db: impl SqliteExecutor<'e>,
    notification: &Notification,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO notifications (id, user_id, content, created_at) VALUES (?, ?, ?, ?)",
    )
    .bind(notification.id)
    .bind(notification.user_id)
    .bind(&notification.content)
    .bind(notification.timestamp)
    .execute(db)
    .await?;

    Ok(())
}

/// A user's notifications, newest first
pub async fn list_notifications<'e>(
    db: impl SqliteExecutor<'e>,
    user_id: Uuid,
) -> Result<Vec<Notification>, sqlx::Error> {
    let rows = sqlx::query(
        r#"
        SELECT id, user_id, content, created_at
        FROM notifications
        WHERE user_id = ?
        ORDER BY created_at DESC, rowid DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(db)
    .await?;

    rows.iter().map(notification_from_row).collect()
}

/// Delete one notification owned by `user_id`
pub async fn delete_notification<'e>(
    db: impl SqliteExecutor<'e>,
    user_id: Uuid,
    notification_id: Uuid,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM notifications WHERE id = ? AND user_id = ?")
        .bind(notification_id)
        .bind(user_id)
        .execute(db)
        .await?;

    Ok(result.rows_affected() > 0)
}

/// Delete all of a user's notifications, returning how many were removed
pub async fn delete_all_notifications<'e>(
    db: impl SqliteExecutor<'e>,
    user_id: Uuid,
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM notifications WHERE user_id = ?")
        .bind(user_id)
        .execute(db)
        .await?;

    Ok(result.rows_affected())
}
