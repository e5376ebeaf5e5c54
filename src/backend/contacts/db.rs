//! Database operations for contacts
//!
//! One row per directed (owner, target) pair, enforced by a unique index.

use chrono::Utc;
use sqlx::{sqlite::SqliteRow, Row, SqliteConnection, SqliteExecutor};
use uuid::Uuid;

use crate::backend::error::BackendError;
use crate::shared::messaging::{Contact, ContactStatus};

const CONTACT_COLUMNS: &str = "id, user_id, contact_user_id, status, created_at, updated_at";

fn contact_from_row(row: &SqliteRow) -> Result<Contact, sqlx::Error> {
    let status: String = row.try_get("status")?;
    Ok(Contact {
        id: row.try_get("id")?,
        user_id: row.try_get("user_id")?,
        contact_user_id: row.try_get("contact_user_id")?,
        status: ContactStatus::parse(&status)
            .ok_or_else(|| sqlx::Error::Decode(format!("unknown contact status {status:?}").into()))?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

/// Get the owner's record for a target, if any
pub async fn get_contact<'e>(
    db: impl SqliteExecutor<'e>,
    owner_id: Uuid,
    target_id: Uuid,
) -> Result<Option<Contact>, sqlx::Error> {
    let row = sqlx::query(&format!(
        "SELECT {CONTACT_COLUMNS} FROM contacts WHERE user_id = ? AND contact_user_id = ?"
    ))
    .bind(owner_id)
    .bind(target_id)
    .fetch_optional(db)
    .await?;

    row.as_ref().map(contact_from_row).transpose()
}

/// Insert a new record
pub async fn create_contact<'e>(
    db: impl SqliteExecutor<'e>,
    owner_id: Uuid,
    target_id: Uuid,
    status: ContactStatus,
) -> Result<Contact, sqlx::Error> {
    let now = Utc::now();
    let row = sqlx::query(&format!(
        r#"
        INSERT INTO contacts (id, user_id, contact_user_id, status, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?)
        RETURNING {CONTACT_COLUMNS}
        "#
    ))
    .bind(Uuid::new_v4())
    .bind(owner_id)
    .bind(target_id)
    .bind(status.as_str())
    .bind(now)
    .bind(now)
    .fetch_one(db)
    .await?;

    contact_from_row(&row)
}

async fn set_status<'e>(
    db: impl SqliteExecutor<'e>,
    contact_id: Uuid,
    status: ContactStatus,
) -> Result<Contact, sqlx::Error> {
    let row = sqlx::query(&format!(
        "UPDATE contacts SET status = ?, updated_at = ? WHERE id = ? RETURNING {CONTACT_COLUMNS}"
    ))
    .bind(status.as_str())
    .bind(Utc::now())
    .bind(contact_id)
    .fetch_one(db)
    .await?;

    contact_from_row(&row)
}

/// Create the record with `status`, or move the existing one there
///
/// The move goes through the contact transition table; re-applying the
/// current status leaves the row untouched.
pub async fn upsert_contact(
    conn: &mut SqliteConnection,
    owner_id: Uuid,
    target_id: Uuid,
    status: ContactStatus,
) -> Result<Contact, BackendError> {
    match get_contact(&mut *conn, owner_id, target_id).await? {
        None => Ok(create_contact(&mut *conn, owner_id, target_id, status).await?),
        Some(existing) if existing.status == status => Ok(existing),
        Some(existing) => {
            let next = existing.status.transition(status).inspect_err(|e| {
                tracing::warn!("Contact {} rejected: {}", existing.id, e);
            })?;
            Ok(set_status(&mut *conn, existing.id, next).await?)
        }
    }
}

/// Owner's records, optionally filtered by status, oldest first
pub async fn list_contacts<'e>(
    db: impl SqliteExecutor<'e>,
    owner_id: Uuid,
    status: Option<ContactStatus>,
) -> Result<Vec<Contact>, sqlx::Error> {
    let rows = sqlx::query(&format!(
        r#"
        SELECT {CONTACT_COLUMNS}
        FROM contacts
        WHERE user_id = ? AND (? IS NULL OR status = ?)
        ORDER BY created_at ASC, rowid ASC
        "#
    ))
    .bind(owner_id)
    .bind(status.map(|s| s.as_str()))
    .bind(status.map(|s| s.as_str()))
    .fetch_all(db)
    .await?;

    rows.iter().map(contact_from_row).collect()
}

/// Delete the owner's record for a target, returning whether one existed
pub async fn delete_contact<'e>(
    db: impl SqliteExecutor<'e>,
    owner_id: Uuid,
    target_id: Uuid,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM contacts WHERE user_id = ? AND contact_user_id = ?")
        .bind(owner_id)
        .bind(target_id)
        .execute(db)
        .await?;

    Ok(result.rows_affected() > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::auth::users::create_user;
    use crate::shared::SharedError;
    use assert_matches::assert_matches;
    use crate::backend::server::config::{load_database, ServerConfig};
    use sqlx::SqlitePool;

    async fn setup() -> (SqlitePool, Uuid, Uuid) {
        let config = ServerConfig {
            database_url: "sqlite::memory:".to_string(),
            ..ServerConfig::default()
        };
        let pool = load_database(&config).await.unwrap();
        let a = create_user(&pool, "alice", "alice@example.com", "h").await.unwrap();
        let b = create_user(&pool, "bob", "bob@example.com", "h").await.unwrap();
        (pool, a.id, b.id)
    }

    #[tokio::test]
    async fn test_upsert_creates_then_transitions() {
        let (pool, a, b) = setup().await;
        let mut conn = pool.acquire().await.unwrap();

        let created = upsert_contact(&mut conn, a, b, ContactStatus::Pending).await.unwrap();
        assert_eq!(created.status, ContactStatus::Pending);

        let blocked = upsert_contact(&mut conn, a, b, ContactStatus::Blocked).await.unwrap();
        assert_eq!(blocked.id, created.id);
        assert_eq!(blocked.status, ContactStatus::Blocked);
    }

    #[tokio::test]
    async fn test_upsert_rejects_illegal_transition() {
        let (pool, a, b) = setup().await;
        let mut conn = pool.acquire().await.unwrap();

        upsert_contact(&mut conn, a, b, ContactStatus::Blocked).await.unwrap();
        let err = upsert_contact(&mut conn, a, b, ContactStatus::Pending).await.unwrap_err();
        assert_eq!(err.status_code(), axum::http::StatusCode::CONFLICT);
        assert_matches!(err, BackendError::SharedError(SharedError::InvalidTransition { .. }));
    }

    #[tokio::test]
    async fn test_list_filters_by_status() {
        let (pool, a, b) = setup().await;
        create_contact(&pool, a, b, ContactStatus::Accepted).await.unwrap();

        assert_eq!(list_contacts(&pool, a, None).await.unwrap().len(), 1);
        assert_eq!(list_contacts(&pool, a, Some(ContactStatus::Accepted)).await.unwrap().len(), 1);
        assert!(list_contacts(&pool, a, Some(ContactStatus::Blocked)).await.unwrap().is_empty());
        assert!(list_contacts(&pool, b, None).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_is_directional() {
        let (pool, a, b) = setup().await;
        create_contact(&pool, a, b, ContactStatus::Accepted).await.unwrap();
        create_contact(&pool, b, a, ContactStatus::Accepted).await.unwrap();

        assert!(delete_contact(&pool, a, b).await.unwrap());
        assert!(!delete_contact(&pool, a, b).await.unwrap());
        assert!(get_contact(&pool, b, a).await.unwrap().is_some());
    }
}
