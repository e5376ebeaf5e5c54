/**
 * Server Initialization
 *
 * This module handles the initialization and setup of the Axum HTTP server.
 *
 * # Initialization Process
 *
 * 1. Open the SQLite pool and run migrations
 * 2. Make sure the upload directories exist
 * 3. Build `AppState`
 * 4. Create and configure the router
 */

use axum::Router;
use sqlx::SqlitePool;

use crate::backend::error::BackendError;
use crate::backend::routes::router::create_router;
use crate::backend::server::config::{load_database, ServerConfig};
use crate::backend::server::state::AppState;
use crate::backend::uploads::UploadKind;

/// Create and configure the Axum application
///
/// # Returns
///
/// The router ready to serve, plus the pool so the caller can close it on
/// shutdown.
///
/// # Errors
///
/// Fails if the database cannot be opened or migrated, or if the upload
/// directories cannot be created.
pub async fn create_app(config: ServerConfig) -> Result<(Router, SqlitePool), BackendError> {
    tracing::info!("Initializing palaver backend server");

    let pool = load_database(&config).await?;

    for kind in UploadKind::ALL {
        let dir = kind.dir(&config);
        tokio::fs::create_dir_all(&dir).await.map_err(|e| {
            BackendError::internal(format!("Failed to create {}: {}", dir.display(), e))
        })?;
    }

    let app_state = AppState::new(pool.clone(), config);
    let app = create_router(app_state);

    tracing::info!("Router configured");

    Ok((app, pool))
}
