/**
 * Application State Management
 *
 * This module defines the application state structure and implements
 * the necessary `FromRef` traits for Axum state extraction.
 *
 * # Architecture
 *
 * `AppState` is built once in `create_app` and cloned into every handler:
 * - the SQLite connection pool
 * - the immutable server configuration
 * - the token issuer holding the signing secret
 *
 * Nothing in it is mutated after start-up, so no locks are involved.
 *
 * # Example
 *
 * ```rust,no_run
 * use palaver::backend::server::state::AppState;
 * use axum::extract::State;
 * use sqlx::SqlitePool;
 *
 * async fn handler(State(pool): State<SqlitePool>) {
 *     // Query with the pool
 * }
 * ```
 */

use std::sync::Arc;

use axum::extract::FromRef;
use sqlx::SqlitePool;

use crate::backend::auth::sessions::TokenIssuer;
use crate::backend::server::config::ServerConfig;

/// Application state shared by all handlers
#[derive(Clone, Debug)]
pub struct AppState {
    /// Database connection pool
    pub db: SqlitePool,
    /// Server configuration
    pub config: Arc<ServerConfig>,
    /// JWT issuer/verifier
    pub tokens: Arc<TokenIssuer>,
}

impl AppState {
    pub fn new(db: SqlitePool, config: ServerConfig) -> Self {
        let tokens = TokenIssuer::new(&config.jwt_secret, config.token_ttl_days);
        Self {
            db,
            config: Arc::new(config),
            tokens: Arc::new(tokens),
        }
    }
}

/// Lets handlers take `State<SqlitePool>` directly
impl FromRef<AppState> for SqlitePool {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.db.clone()
    }
}

impl FromRef<AppState> for Arc<ServerConfig> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.config.clone()
    }
}

impl FromRef<AppState> for Arc<TokenIssuer> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.tokens.clone()
    }
}
