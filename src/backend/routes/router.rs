/**
 * Router Configuration
 *
 * This module provides the main router creation function that combines
 * all route configurations into a single Axum router.
 *
 * # Route Order
 *
 * 1. `/health`
 * 2. Account routes under `/users`
 * 3. API routes under `/api`
 * 4. Fallback: static files from the public directory, then a JSON 404
 */

use axum::{
    extract::DefaultBodyLimit,
    handler::HandlerWithoutStateExt,
    response::Json,
    routing::get,
    Router,
};
use serde::Serialize;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};

use crate::backend::error::BackendError;
use crate::backend::routes::api_routes::api_routes;
use crate::backend::routes::user_routes::user_routes;
use crate::backend::server::state::AppState;
use crate::backend::uploads::FORM_OVERHEAD_BYTES;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

/// GET /health
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

async fn not_found() -> BackendError {
    BackendError::not_found("Not found")
}

/// Create the Axum router with all routes configured
///
/// # Arguments
///
/// * `app_state` - Pool, configuration and token issuer
///
/// # Returns
///
/// Configured Axum Router ready to serve requests
pub fn create_router(app_state: AppState) -> Router<()> {
    let body_limit = app_state.config.max_upload_bytes + FORM_OVERHEAD_BYTES;
    let static_files = ServeDir::new(&app_state.config.public_dir).not_found_service(not_found.into_service());

    Router::new()
        .route("/health", get(health))
        .nest("/users", user_routes(app_state.clone()))
        .nest("/api", api_routes(app_state.clone()))
        .fallback_service(static_files)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive())
                .layer(DefaultBodyLimit::max(body_limit)),
        )
        .with_state(app_state)
}
