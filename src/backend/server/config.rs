/**
 * Server Configuration
 *
 * This module handles loading of server configuration and the SQLite
 * connection pool.
 *
 * # Configuration Sources
 *
 * Configuration is read from environment variables (a `.env` file is loaded
 * by the binary first), with defaults suitable for local development.
 *
 * # Error Handling
 *
 * Unparseable values are logged and replaced by their default. Database
 * connection and migration failures are returned to the caller, since the
 * server cannot do anything useful without storage.
 */

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};
use sqlx::{Sqlite, Transaction};

const DEV_JWT_SECRET: &str = "palaver-dev-secret-change-me";

/// How long a connection waits for another writer before giving up
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Runtime configuration for the server
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Port to listen on
    pub port: u16,
    /// SQLite connection string
    pub database_url: String,
    pub db_max_connections: u32,
    /// HS256 signing secret
    pub jwt_secret: String,
    /// Token lifetime in days
    pub token_ttl_days: i64,
    pub bcrypt_cost: u32,
    /// Static files root; uploads land in `<public_dir>/uploads`
    pub public_dir: PathBuf,
    /// Per-file upload limit in bytes
    pub max_upload_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            database_url: "sqlite://palaver.db?mode=rwc".to_string(),
            db_max_connections: 10,
            jwt_secret: DEV_JWT_SECRET.to_string(),
            token_ttl_days: 7,
            bcrypt_cost: bcrypt::DEFAULT_COST,
            public_dir: PathBuf::from("public"),
            max_upload_bytes: 1_000_000,
        }
    }
}

impl ServerConfig {
    /// Build the configuration from environment variables
    ///
    /// | Variable | Default |
    /// |---|---|
    /// | `SERVER_PORT` | 3000 |
    /// | `DATABASE_URL` | `sqlite://palaver.db?mode=rwc` |
    /// | `DB_MAX_CONNECTIONS` | 10 |
    /// | `JWT_SECRET` | development secret |
    /// | `TOKEN_TTL_DAYS` | 7 |
    /// | `BCRYPT_COST` | `bcrypt::DEFAULT_COST` |
    /// | `PUBLIC_DIR` | `public` |
    /// | `MAX_UPLOAD_BYTES` | 1000000 |
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let jwt_secret = match std::env::var("JWT_SECRET") {
            Ok(secret) if !secret.is_empty() => secret,
            _ => {
                tracing::warn!("JWT_SECRET not set, using the development secret");
                defaults.jwt_secret
            }
        };

        Self {
            port: parse_env("SERVER_PORT", defaults.port),
            database_url: std::env::var("DATABASE_URL").unwrap_or(defaults.database_url),
            db_max_connections: parse_env("DB_MAX_CONNECTIONS", defaults.db_max_connections),
            jwt_secret,
            token_ttl_days: parse_env("TOKEN_TTL_DAYS", defaults.token_ttl_days),
            bcrypt_cost: parse_env("BCRYPT_COST", defaults.bcrypt_cost),
            public_dir: std::env::var("PUBLIC_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.public_dir),
            max_upload_bytes: parse_env("MAX_UPLOAD_BYTES", defaults.max_upload_bytes),
        }
    }

    /// Directory uploaded files are written to
    pub fn uploads_dir(&self) -> PathBuf {
        self.public_dir.join("uploads")
    }

    fn is_in_memory(&self) -> bool {
        self.database_url.contains(":memory:") || self.database_url.contains("mode=memory")
    }
}

fn parse_env<T>(key: &str, default: T) -> T
where
    T: FromStr + std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) => match raw.trim().parse() {
            Ok(value) => value,
            Err(_) => {
                tracing::warn!("Invalid {}={:?}, using default {}", key, raw, default);
                default
            }
        },
        Err(_) => default,
    }
}

/// Open the connection pool and run migrations
///
/// # Errors
///
/// Returns the `sqlx` error if the URL is invalid, the database cannot be
/// opened, or a migration fails.
pub async fn load_database(config: &ServerConfig) -> Result<SqlitePool, sqlx::Error> {
    tracing::info!("Connecting to database...");

    let mut options = SqliteConnectOptions::from_str(&config.database_url)?
        .create_if_missing(true)
        .foreign_keys(true)
        .busy_timeout(BUSY_TIMEOUT);
    if !config.is_in_memory() {
        options = options.journal_mode(SqliteJournalMode::Wal);
    }

    let mut pool_options = SqlitePoolOptions::new().max_connections(config.db_max_connections);
    if config.is_in_memory() {
        // Every connection to `:memory:` is a separate database, so the one
        // connection must never be recycled.
        pool_options = pool_options
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None);
    } else {
        pool_options = pool_options.acquire_timeout(Duration::from_secs(10));
    }

    let pool = pool_options.connect_with(options).await?;
    tracing::info!("Database connection pool created successfully");

    tracing::info!("Running database migrations...");
    sqlx::migrate!().run(&pool).await?;
    tracing::info!("Database migrations completed successfully");

    Ok(pool)
}

/// Start a transaction that takes the write lock up front
///
/// A deferred transaction that reads first cannot upgrade its lock while
/// another reader holds one, and SQLite fails it immediately with
/// `SQLITE_BUSY` instead of waiting. `BEGIN IMMEDIATE` waits on the busy
/// timeout instead, so concurrent writers queue up.
pub async fn begin_write(pool: &SqlitePool) -> Result<Transaction<'static, Sqlite>, sqlx::Error> {
    pool.begin_with("BEGIN IMMEDIATE").await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ServerConfig::default();
        assert_eq!(config.port, 3000);
        assert_eq!(config.token_ttl_days, 7);
        assert_eq!(config.max_upload_bytes, 1_000_000);
        assert_eq!(config.uploads_dir(), PathBuf::from("public/uploads"));
    }

    #[test]
    fn test_in_memory_detection() {
        let config = ServerConfig {
            database_url: "sqlite::memory:".to_string(),
            ..ServerConfig::default()
        };
        assert!(config.is_in_memory());
        assert!(!ServerConfig::default().is_in_memory());
    }

    #[tokio::test]
    async fn test_load_database_runs_migrations() {
        let config = ServerConfig {
            database_url: "sqlite::memory:".to_string(),
            ..ServerConfig::default()
        };
        let pool = load_database(&config).await.unwrap();
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(count, 0);
    }

    #[tokio::test]
    async fn test_file_database_uses_wal() {
        let dir = tempfile::tempdir().unwrap();
        let config = ServerConfig {
            database_url: format!("sqlite://{}?mode=rwc", dir.path().join("wal.db").display()),
            ..ServerConfig::default()
        };
        let pool = load_database(&config).await.unwrap();
        let mode: String = sqlx::query_scalar("PRAGMA journal_mode").fetch_one(&pool).await.unwrap();
        assert_eq!(mode, "wal");

        let mut tx = begin_write(&pool).await.unwrap();
        sqlx::query("DELETE FROM notifications").execute(&mut *tx).await.unwrap();
        tx.commit().await.unwrap();
    }
}
