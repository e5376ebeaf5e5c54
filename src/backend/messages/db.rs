//! Database operations for messages
//!
//! Messages belong to a chat or a group (`parent_kind`). Content is never
//! updated; only `status` changes after insertion.

use sqlx::{sqlite::SqliteRow, Row, SqliteExecutor};
use uuid::Uuid;

use crate::shared::messaging::{ChatMessage, MessageStatus, MessageView, ParentKind, SenderRef};

const MESSAGE_COLUMNS: &str = "id, sender_id, parent_id, parent_kind, content, status, created_at";

fn decode_error(what: &str, value: &str) -> sqlx::Error {
    sqlx::Error::Decode(format!("unknown {what} {value:?}").into())
}

fn message_from_row(row: &SqliteRow) -> Result<ChatMessage, sqlx::Error> {
    let kind: String = row.try_get("parent_kind")?;
    let status: String = row.try_get("status")?;
    Ok(ChatMessage {
        id: row.try_get("id")?,
        sender_id: row.try_get("sender_id")?,
        parent_id: row.try_get("parent_id")?,
        parent_kind: ParentKind::parse(&kind).ok_or_else(|| decode_error("parent kind", &kind))?,
        content: row.try_get("content")?,
        status: MessageStatus::parse(&status).ok_or_else(|| decode_error("message status", &status))?,
        timestamp: row.try_get("created_at")?,
    })
}

/// Store a new message
pub async fn insert_message<'e>(
    db: impl SqliteExecutor<'e>,
    message: &ChatMessage,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO messages (id, sender_id, parent_id, parent_kind, content, status, created_at)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(message.id)
    .bind(message.sender_id)
    .bind(message.parent_id)
    .bind(message.parent_kind.as_str())
    .bind(&message.content)
    .bind(message.status.as_str())
    .bind(message.timestamp)
    .execute(db)
    .await?;

    Ok(())
}

/// Get a message by ID
pub async fn get_message<'e>(
    db: impl SqliteExecutor<'e>,
    id: Uuid,
) -> Result<Option<ChatMessage>, sqlx::Error> {
    let row = sqlx::query(&format!("SELECT {MESSAGE_COLUMNS} FROM messages WHERE id = ?"))
        .bind(id)
        .fetch_optional(db)
        .await?;

    row.as_ref().map(message_from_row).transpose()
}

/// Overwrite a message's status
///
/// Callers check the transition table first.
pub async fn set_message_status<'e>(
    db: impl SqliteExecutor<'e>,
    id: Uuid,
    status: MessageStatus,
) -> Result<ChatMessage, sqlx::Error> {
    let row = sqlx::query(&format!(
        "UPDATE messages SET status = ? WHERE id = ? RETURNING {MESSAGE_COLUMNS}"
    ))
    .bind(status.as_str())
    .bind(id)
    .fetch_one(db)
    .await?;

    message_from_row(&row)
}

/// Messages of a chat or group in send order, with sender usernames
///
/// `limit = None` returns everything after `offset`.
pub async fn list_messages<'e>(
    db: impl SqliteExecutor<'e>,
    parent_id: Uuid,
    limit: Option<u32>,
    offset: u32,
) -> Result<Vec<MessageView>, sqlx::Error> {
    let rows = sqlx::query(
        r#"
        SELECT m.id, m.sender_id, m.parent_id, m.parent_kind, m.content, m.status, m.created_at,
               u.username AS sender_username
        FROM messages m
        JOIN users u ON u.id = m.sender_id
        WHERE m.parent_id = ?
        ORDER BY m.created_at ASC, m.rowid ASC
        LIMIT ? OFFSET ?
        "#,
    )
    .bind(parent_id)
    .bind(limit.map_or(-1, i64::from))
    .bind(i64::from(offset))
    .fetch_all(db)
    .await?;

    rows.iter()
        .map(|row| {
            let message = message_from_row(row)?;
            Ok(MessageView {
                sender: SenderRef {
                    id: message.sender_id,
                    username: row.try_get("sender_username")?,
                },
                message,
            })
        })
        .collect()
}

/// Delete every message of a chat or group
pub async fn delete_messages_for<'e>(
    db: impl SqliteExecutor<'e>,
    parent_id: Uuid,
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM messages WHERE parent_id = ?")
        .bind(parent_id)
        .execute(db)
        .await?;

    Ok(result.rows_affected())
}
