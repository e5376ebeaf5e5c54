//! Database operations for groups and memberships

use chrono::{DateTime, Utc};
use sqlx::{sqlite::SqliteRow, Row, SqliteExecutor};
use uuid::Uuid;

use crate::shared::messaging::{Group, GroupMember};

const GROUP_COLUMNS: &str =
    "id, name, description, icon, last_message_id, last_message_sender_id, created_at, updated_at";

fn group_from_row(row: &SqliteRow) -> Result<Group, sqlx::Error> {
    Ok(Group {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        description: row.try_get("description")?,
        icon: row.try_get("icon")?,
        last_message_id: row.try_get("last_message_id")?,
        last_message_sender_id: row.try_get("last_message_sender_id")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

fn member_from_row(row: &SqliteRow) -> Result<GroupMember, sqlx::Error> {
    Ok(GroupMember {
        user_id: row.try_get("user_id")?,
        is_admin: row.try_get("is_admin")?,
        joined_at: row.try_get("joined_at")?,
    })
}

/// Get a group by ID
pub async fn get_group<'e>(db: impl SqliteExecutor<'e>, id: Uuid) -> Result<Option<Group>, sqlx::Error> {
    let row = sqlx::query(&format!("SELECT {GROUP_COLUMNS} FROM chat_groups WHERE id = ?"))
        .bind(id)
        .fetch_optional(db)
        .await?;

    row.as_ref().map(group_from_row).transpose()
}

/// Insert a group with no members
pub async fn create_group<'e>(
    db: impl SqliteExecutor<'e>,
    name: &str,
    description: &str,
) -> Result<Group, sqlx::Error> {
    let now = Utc::now();
    let row = sqlx::query(&format!(
        r#"
        INSERT INTO chat_groups (id, name, description, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?)
        RETURNING {GROUP_COLUMNS}
        "#
    ))
    .bind(Uuid::new_v4())
    .bind(name)
    .bind(description)
    .bind(now)
    .bind(now)
    .fetch_one(db)
    .await?;

    group_from_row(&row)
}

/// Change name, description or icon; `None` keeps the stored value
pub async fn update_group<'e>(
    db: impl SqliteExecutor<'e>,
    id: Uuid,
    name: Option<&str>,
    description: Option<&str>,
    icon: Option<&str>,
) -> Result<Group, sqlx::Error> {
    let row = sqlx::query(&format!(
        r#"
        UPDATE chat_groups
        SET name = COALESCE(?, name),
            description = COALESCE(?, description),
            icon = COALESCE(?, icon),
            updated_at = ?
        WHERE id = ?
        RETURNING {GROUP_COLUMNS}
        "#
    ))
    .bind(name)
    .bind(description)
    .bind(icon)
    .bind(Utc::now())
    .bind(id)
    .fetch_one(db)
    .await?;

    group_from_row(&row)
}

/// Point the group at its newest message and sender
pub async fn set_last_message<'e>(
    db: impl SqliteExecutor<'e>,
    group_id: Uuid,
    message_id: Uuid,
    sender_id: Uuid,
    at: DateTime<Utc>,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "UPDATE chat_groups SET last_message_id = ?, last_message_sender_id = ?, updated_at = ? WHERE id = ?",
    )
    .bind(message_id)
    .bind(sender_id)
    .bind(at)
    .bind(group_id)
    .execute(db)
    .await?;

    Ok(())
}

/// Bump `updated_at` after a membership change
pub async fn touch_group<'e>(db: impl SqliteExecutor<'e>, group_id: Uuid) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE chat_groups SET updated_at = ? WHERE id = ?")
        .bind(Utc::now())
        .bind(group_id)
        .execute(db)
        .await?;

    Ok(())
}

/// Groups the user belongs to, most recently updated first
pub async fn list_groups_for<'e>(db: impl SqliteExecutor<'e>, user_id: Uuid) -> Result<Vec<Group>, sqlx::Error> {
    let rows = sqlx::query(
        r#"
        SELECT g.id, g.name, g.description, g.icon, g.last_message_id, g.last_message_sender_id,
               g.created_at, g.updated_at
        FROM chat_groups g
        JOIN group_members gm ON gm.group_id = g.id
        WHERE gm.user_id = ?
        ORDER BY g.updated_at DESC, g.rowid DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(db)
    .await?;

    rows.iter().map(group_from_row).collect()
}

/// Delete the group row and its memberships
pub async fn delete_group(conn: &mut sqlx::SqliteConnection, id: Uuid) -> Result<bool, sqlx::Error> {
    sqlx::query("DELETE FROM group_members WHERE group_id = ?")
        .bind(id)
        .execute(&mut *conn)
        .await?;
    let result = sqlx::query("DELETE FROM chat_groups WHERE id = ?")
        .bind(id)
        .execute(&mut *conn)
        .await?;

    Ok(result.rows_affected() > 0)
}

/// Add a member; `false` if they already belonged to the group
pub async fn add_member<'e>(
    db: impl SqliteExecutor<'e>,
    group_id: Uuid,
    user_id: Uuid,
    is_admin: bool,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        r#"
        INSERT INTO group_members (group_id, user_id, is_admin, joined_at)
        VALUES (?, ?, ?, ?)
        ON CONFLICT (group_id, user_id) DO NOTHING
        "#,
    )
    .bind(group_id)
    .bind(user_id)
    .bind(is_admin)
    .bind(Utc::now())
    .execute(db)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// Membership row for one user, if any
pub async fn get_membership<'e>(
    db: impl SqliteExecutor<'e>,
    group_id: Uuid,
    user_id: Uuid,
) -> Result<Option<GroupMember>, sqlx::Error> {
    let row = sqlx::query(
        "SELECT user_id, is_admin, joined_at FROM group_members WHERE group_id = ? AND user_id = ?",
    )
    .bind(group_id)
    .bind(user_id)
    .fetch_optional(db)
    .await?;

    row.as_ref().map(member_from_row).transpose()
}

/// All members in join order
pub async fn list_members<'e>(db: impl SqliteExecutor<'e>, group_id: Uuid) -> Result<Vec<GroupMember>, sqlx::Error> {
    let rows = sqlx::query(
        r#"
        SELECT user_id, is_admin, joined_at
        FROM group_members
        WHERE group_id = ?
        ORDER BY joined_at ASC, rowid ASC
        "#,
    )
    .bind(group_id)
    .fetch_all(db)
    .await?;

    rows.iter().map(member_from_row).collect()
}

pub async fn remove_member<'e>(
    db: impl SqliteExecutor<'e>,
    group_id: Uuid,
    user_id: Uuid,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM group_members WHERE group_id = ? AND user_id = ?")
        .bind(group_id)
        .bind(user_id)
        .execute(db)
        .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn set_admin<'e>(
    db: impl SqliteExecutor<'e>,
    group_id: Uuid,
    user_id: Uuid,
    is_admin: bool,
) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE group_members SET is_admin = ? WHERE group_id = ? AND user_id = ?")
        .bind(is_admin)
        .bind(group_id)
        .bind(user_id)
        .execute(db)
        .await?;

    Ok(())
}

pub async fn count_admins<'e>(db: impl SqliteExecutor<'e>, group_id: Uuid) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar("SELECT COUNT(*) FROM group_members WHERE group_id = ? AND is_admin = 1")
        .bind(group_id)
        .fetch_one(db)
        .await
}
