/**
 * User Model and Database Operations
 *
 * This module handles user data and database operations. Query functions take
 * any SQLite executor so they can run against the pool or inside a
 * transaction.
 */

use chrono::{DateTime, Utc};
use sqlx::SqliteExecutor;
use uuid::Uuid;

use crate::backend::middleware::BaseUrl;
use crate::shared::messaging::{SenderRef, UserProfile, UserStatus};

const USER_COLUMNS: &str =
    "id, username, email, password_hash, profile_picture, about, status, created_at, updated_at";

/// User struct representing a user in the database
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct User {
    /// Unique user ID (UUID)
    pub id: Uuid,
    /// Username (unique, 3-30 chars, alphanumeric + underscore)
    pub username: String,
    /// User email address
    pub email: String,
    /// Hashed password (bcrypt)
    pub password_hash: String,
    /// Relative path of the profile picture
    pub profile_picture: String,
    pub about: String,
    /// `Online` or `Offline`
    pub status: String,
    /// Created at timestamp
    pub created_at: DateTime<Utc>,
    /// Updated at timestamp
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Public profile with an absolute picture URL
    pub fn to_profile(&self, base: &BaseUrl) -> UserProfile {
        UserProfile {
            id: self.id,
            username: self.username.clone(),
            email: self.email.clone(),
            profile_picture: base.absolute(&self.profile_picture),
            about: self.about.clone(),
            status: UserStatus::parse(&self.status).unwrap_or_default(),
            created_at: self.created_at,
        }
    }

    pub fn sender_ref(&self) -> SenderRef {
        SenderRef {
            id: self.id,
            username: self.username.clone(),
        }
    }
}

/// Fields a user may change on their own profile
#[derive(Debug, Clone, Default)]
pub struct ProfileChanges {
    pub about: Option<String>,
    pub status: Option<UserStatus>,
    pub profile_picture: Option<String>,
}

/// Create a new user
///
/// # Arguments
/// * `db` - Pool or transaction
/// * `username` - User's chosen username
/// * `email` - User email
/// * `password_hash` - Hashed password
///
/// # Returns
/// Created user or error
pub async fn create_user<'e>(
    db: impl SqliteExecutor<'e>,
    username: &str,
    email: &str,
    password_hash: &str,
) -> Result<User, sqlx::Error> {
    let now = Utc::now();

    sqlx::query_as::<_, User>(&format!(
        r#"
        INSERT INTO users (id, username, email, password_hash, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?)
        RETURNING {USER_COLUMNS}
        "#
    ))
    .bind(Uuid::new_v4())
    .bind(username)
    .bind(email)
    .bind(password_hash)
    .bind(now)
    .bind(now)
    .fetch_one(db)
    .await
}

/// Get user by email
pub async fn get_user_by_email<'e>(
    db: impl SqliteExecutor<'e>,
    email: &str,
) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(&format!(
        "SELECT {USER_COLUMNS} FROM users WHERE email = ? COLLATE NOCASE"
    ))
    .bind(email)
    .fetch_optional(db)
    .await
}

/// Get user by username
pub async fn get_user_by_username<'e>(
    db: impl SqliteExecutor<'e>,
    username: &str,
) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(&format!(
        "SELECT {USER_COLUMNS} FROM users WHERE username = ?"
    ))
    .bind(username)
    .fetch_optional(db)
    .await
}

/// Get user by ID
pub async fn get_user_by_id<'e>(
    db: impl SqliteExecutor<'e>,
    id: Uuid,
) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?"))
        .bind(id)
        .fetch_optional(db)
        .await
}

/// Get several users at once, in no particular order
///
/// Unknown IDs are simply absent from the result.
pub async fn get_users_by_ids<'e>(
    db: impl SqliteExecutor<'e>,
    ids: &[Uuid],
) -> Result<Vec<User>, sqlx::Error> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }

    let placeholders = vec!["?"; ids.len()].join(", ");
    let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id IN ({placeholders})");
    let mut query = sqlx::query_as::<_, User>(&sql);
    for id in ids {
        query = query.bind(*id);
    }
    query.fetch_all(db).await
}

/// Apply profile changes and return the updated row
///
/// Returns `None` if the user does not exist.
pub async fn update_profile<'e>(
    db: impl SqliteExecutor<'e>,
    id: Uuid,
    changes: &ProfileChanges,
) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(&format!(
        r#"
        UPDATE users
        SET about = COALESCE(?, about),
            status = COALESCE(?, status),
            profile_picture = COALESCE(?, profile_picture),
            updated_at = ?
        WHERE id = ?
        RETURNING {USER_COLUMNS}
        "#
    ))
    .bind(changes.about.as_deref())
    .bind(changes.status.map(|s| s.as_str()))
    .bind(changes.profile_picture.as_deref())
    .bind(Utc::now())
    .bind(id)
    .fetch_optional(db)
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::server::config::{load_database, ServerConfig};
    use sqlx::SqlitePool;

    async fn pool() -> SqlitePool {
        let config = ServerConfig {
            database_url: "sqlite::memory:".to_string(),
            ..ServerConfig::default()
        };
        load_database(&config).await.unwrap()
    }

    #[tokio::test]
    async fn test_create_and_lookup_user() {
        let pool = pool().await;
        let user = create_user(&pool, "alice", "alice@example.com", "hash").await.unwrap();

        assert_eq!(user.about, "Just chatting here!");
        assert_eq!(user.status, "Offline");

        let by_email = get_user_by_email(&pool, "ALICE@example.com").await.unwrap().unwrap();
        assert_eq!(by_email.id, user.id);
        let by_name = get_user_by_username(&pool, "alice").await.unwrap().unwrap();
        assert_eq!(by_name.id, user.id);
        assert!(get_user_by_id(&pool, Uuid::new_v4()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_username_is_unique_violation() {
        let pool = pool().await;
        create_user(&pool, "alice", "a@example.com", "hash").await.unwrap();
        let err = create_user(&pool, "alice", "b@example.com", "hash").await.unwrap_err();
        assert!(matches!(err, sqlx::Error::Database(db) if db.is_unique_violation()));
    }

    #[tokio::test]
    async fn test_update_profile_keeps_unset_fields() {
        let pool = pool().await;
        let user = create_user(&pool, "bob", "bob@example.com", "hash").await.unwrap();
        let changes = ProfileChanges {
            status: Some(UserStatus::Online),
            ..ProfileChanges::default()
        };
        let updated = update_profile(&pool, user.id, &changes).await.unwrap().unwrap();
        assert_eq!(updated.status, "Online");
        assert_eq!(updated.about, user.about);
    }

    #[tokio::test]
    async fn test_get_users_by_ids_skips_unknown() {
        let pool = pool().await;
        let user = create_user(&pool, "carol", "carol@example.com", "hash").await.unwrap();
        let users = get_users_by_ids(&pool, &[user.id, Uuid::new_v4()]).await.unwrap();
        assert_eq!(users.len(), 1);
    }

    #[test]
    fn test_profile_uses_absolute_picture() {
        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            username: "dave".into(),
            email: "dave@example.com".into(),
            password_hash: "secret-hash".into(),
            profile_picture: "/images/blank-profile-picture.png".into(),
            about: "hi".into(),
            status: "Online".into(),
            created_at: now,
            updated_at: now,
        };
        let profile = user.to_profile(&BaseUrl("http://localhost:3000".into()));
        assert_eq!(profile.profile_picture, "http://localhost:3000/images/blank-profile-picture.png");
        assert_eq!(profile.status, UserStatus::Online);
        let json = serde_json::to_string(&profile).unwrap();
        assert!(!json.contains("secret-hash"));
    }
}
