/**
 * Sign-in Handler
 *
 * This module implements the user authentication handler for POST /users/signin.
 *
 * # Authentication Process
 *
 * 1. Look up user by username, or by email when the identifier contains `@`
 * 2. Verify password using bcrypt
 * 3. Generate JWT token
 *
 * # Security
 *
 * - Unknown identifier and wrong password return the same 400
 *   `Invalid credentials` response
 * - Passwords are never logged or returned
 */

use axum::{extract::State, response::Json};
use sqlx::SqlitePool;
use std::sync::Arc;

use crate::backend::auth::handlers::types::{SigninRequest, SigninResponse};
use crate::backend::auth::sessions::TokenIssuer;
use crate::backend::auth::users::{get_user_by_email, get_user_by_username};
use crate::backend::error::BackendError;
use crate::backend::middleware::JsonBody;
use crate::shared::FieldErrors;

async fn verify_password(password: String, hash: String) -> Result<bool, BackendError> {
    tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash))
        .await
        .map_err(|e| BackendError::internal(format!("Verification task failed: {e}")))?
        .map_err(|e| BackendError::internal(format!("Password verification error: {e}")))
}

/// Sign-in handler
///
/// # Errors
///
/// * `400 Bad Request` - Missing fields, or invalid credentials
/// * `500 Internal Server Error` - Database, bcrypt or signing failure
///
/// # Example Response
///
/// ```json
/// { "message": "Signed In successfully", "token": "eyJhbGciOiJIUzI1NiIs..." }
/// ```
pub async fn signin(
    State(pool): State<SqlitePool>,
    State(tokens): State<Arc<TokenIssuer>>,
    JsonBody(request): JsonBody<SigninRequest>,
) -> Result<Json<SigninResponse>, BackendError> {
    let identifier = request.identifier.trim();

    let mut errors = FieldErrors::default();
    errors
        .check(!identifier.is_empty(), "identifier", "Username or Email is required")
        .check(!request.password.is_empty(), "password", "Password is required");
    errors.finish()?;

    tracing::info!("Sign-in request for: {}", identifier);

    let user = if identifier.contains('@') {
        get_user_by_email(&pool, identifier).await?
    } else {
        get_user_by_username(&pool, identifier).await?
    };

    let Some(user) = user else {
        tracing::warn!("User not found: {}", identifier);
        return Err(BackendError::bad_request("Invalid credentials"));
    };

    if !verify_password(request.password, user.password_hash.clone()).await? {
        tracing::warn!("Invalid password for user: {}", user.username);
        return Err(BackendError::bad_request("Invalid credentials"));
    }

    let token = tokens
        .issue(user.id)
        .map_err(|e| BackendError::internal(format!("Failed to create token: {e}")))?;

    tracing::info!("User signed in: {} ({})", user.username, user.id);

    Ok(Json(SigninResponse {
        message: "Signed In successfully".to_string(),
        token,
    }))
}
