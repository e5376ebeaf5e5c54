//! Database operations for one-to-one chats
//!
//! Participants are stored as `participant_a < participant_b`, and the pair
//! is unique, so each unordered pair of users has at most one chat.

use chrono::{DateTime, Utc};
use sqlx::{sqlite::SqliteRow, Row, SqliteConnection, SqliteExecutor};
use uuid::Uuid;

use crate::shared::messaging::Chat;

const CHAT_COLUMNS: &str = "id, participant_a, participant_b, last_message_id, created_at, updated_at";

fn chat_from_row(row: &SqliteRow) -> Result<Chat, sqlx::Error> {
    Ok(Chat {
        id: row.try_get("id")?,
        participants: [row.try_get("participant_a")?, row.try_get("participant_b")?],
        last_message_id: row.try_get("last_message_id")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

/// Get a chat by ID
pub async fn get_chat<'e>(db: impl SqliteExecutor<'e>, id: Uuid) -> Result<Option<Chat>, sqlx::Error> {
    let row = sqlx::query(&format!("SELECT {CHAT_COLUMNS} FROM chats WHERE id = ?"))
        .bind(id)
        .fetch_optional(db)
        .await?;

    row.as_ref().map(chat_from_row).transpose()
}

/// Find the chat between two users, in either order
pub async fn find_chat<'e>(
    db: impl SqliteExecutor<'e>,
    user_a: Uuid,
    user_b: Uuid,
) -> Result<Option<Chat>, sqlx::Error> {
    let [a, b] = Chat::pair(user_a, user_b);
    let row = sqlx::query(&format!(
        "SELECT {CHAT_COLUMNS} FROM chats WHERE participant_a = ? AND participant_b = ?"
    ))
    .bind(a)
    .bind(b)
    .fetch_optional(db)
    .await?;

    row.as_ref().map(chat_from_row).transpose()
}

/// Create a chat between two distinct users
pub async fn create_chat<'e>(
    db: impl SqliteExecutor<'e>,
    user_a: Uuid,
    user_b: Uuid,
) -> Result<Chat, sqlx::Error> {
    let [a, b] = Chat::pair(user_a, user_b);
    let now = Utc::now();
    let row = sqlx::query(&format!(
        r#"
        INSERT INTO chats (id, participant_a, participant_b, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?)
        RETURNING {CHAT_COLUMNS}
        "#
    ))
    .bind(Uuid::new_v4())
    .bind(a)
    .bind(b)
    .bind(now)
    .bind(now)
    .fetch_one(db)
    .await?;

    chat_from_row(&row)
}

/// Existing chat for the pair, or a new one; `true` when created
pub async fn find_or_create_chat(
    conn: &mut SqliteConnection,
    user_a: Uuid,
    user_b: Uuid,
) -> Result<(Chat, bool), sqlx::Error> {
    if let Some(chat) = find_chat(&mut *conn, user_a, user_b).await? {
        return Ok((chat, false));
    }
    let chat = create_chat(&mut *conn, user_a, user_b).await?;
    Ok((chat, true))
}

/// Point the chat at its newest message
pub async fn set_last_message<'e>(
    db: impl SqliteExecutor<'e>,
    chat_id: Uuid,
    message_id: Uuid,
    at: DateTime<Utc>,
) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE chats SET last_message_id = ?, updated_at = ? WHERE id = ?")
        .bind(message_id)
        .bind(at)
        .bind(chat_id)
        .execute(db)
        .await?;

    Ok(())
}

/// Chats containing the user, most recently updated first
pub async fn list_chats<'e>(db: impl SqliteExecutor<'e>, user_id: Uuid) -> Result<Vec<Chat>, sqlx::Error> {
    let rows = sqlx::query(&format!(
        r#"
        SELECT {CHAT_COLUMNS}
        FROM chats
        WHERE participant_a = ? OR participant_b = ?
        ORDER BY updated_at DESC, rowid DESC
        "#
    ))
    .bind(user_id)
    .bind(user_id)
    .fetch_all(db)
    .await?;

    rows.iter().map(chat_from_row).collect()
}

/// Delete the chat row
pub async fn delete_chat<'e>(db: impl SqliteExecutor<'e>, id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM chats WHERE id = ?")
        .bind(id)
        .execute(db)
        .await?;

    Ok(result.rows_affected() > 0)
}
