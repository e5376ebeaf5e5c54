/**
 * Signup Handler
 *
 * This module implements the user registration handler for POST /users/signup.
 *
 * # Registration Process
 *
 * 1. Validate username, email and password, collecting every field error
 * 2. Check that username and email are free
 * 3. Hash password using bcrypt
 * 4. Create user in database
 *
 * # Validation
 *
 * - Username: 3-30 chars, starts with a letter, letters/digits/underscore
 * - Email: `local@domain.tld` shape
 * - Password: at least 6 characters
 */

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, response::Json};
use sqlx::SqlitePool;

use crate::backend::auth::handlers::types::SignupRequest;
use crate::backend::auth::users::{create_user, get_user_by_email, get_user_by_username};
use crate::backend::error::BackendError;
use crate::backend::middleware::JsonBody;
use crate::backend::server::config::ServerConfig;
use crate::shared::messaging::MessageResponse;
use crate::shared::FieldErrors;

pub const MIN_PASSWORD_LEN: usize = 6;

/// Validate username format
///
/// Usernames must be:
/// - 3-30 characters long
/// - Contain only alphanumeric characters and underscores
/// - Start with a letter
pub fn is_valid_username(username: &str) -> bool {
    if username.len() < 3 || username.len() > 30 {
        return false;
    }

    let mut chars = username.chars();

    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() => {}
        _ => return false,
    }

    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Basic `local@domain.tld` check
pub fn is_valid_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') || email.chars().any(char::is_whitespace) {
        return false;
    }
    match domain.rsplit_once('.') {
        Some((host, tld)) => !host.is_empty() && tld.len() >= 2,
        None => false,
    }
}

fn validate(request: &SignupRequest) -> Result<(), BackendError> {
    let mut errors = FieldErrors::default();

    if request.username.is_empty() {
        errors.push("username", "Username is required");
    } else {
        errors.check(
            is_valid_username(&request.username),
            "username",
            "Username must be 3-30 chars, start with a letter, and contain only letters, numbers, and underscores",
        );
    }

    if request.email.is_empty() {
        errors.push("email", "Email is required");
    } else {
        errors.check(is_valid_email(&request.email), "email", "Invalid email format");
    }

    if request.password.is_empty() {
        errors.push("password", "Password is required");
    } else {
        errors.check(
            request.password.chars().count() >= MIN_PASSWORD_LEN,
            "password",
            "Password must be at least 6 characters long",
        );
    }

    Ok(errors.finish()?)
}

/// Hash off the async runtime; bcrypt is deliberately slow
pub async fn hash_password(password: String, cost: u32) -> Result<String, BackendError> {
    tokio::task::spawn_blocking(move || bcrypt::hash(password, cost))
        .await
        .map_err(|e| BackendError::internal(format!("Hashing task failed: {e}")))?
        .map_err(|e| BackendError::internal(format!("Failed to hash password: {e}")))
}

/// Sign up handler
///
/// # Errors
///
/// * `400 Bad Request` - Field validation failed, or username/email already taken
/// * `500 Internal Server Error` - Hashing or database failure
///
/// # Example Request
///
/// ```http
/// POST /users/signup HTTP/1.1
/// Content-Type: application/json
///
/// { "username": "alice", "email": "alice@example.com", "password": "hunter22" }
/// ```
///
/// # Example Response
///
/// ```json
/// { "message": "Signed up successfully" }
/// ```
pub async fn signup(
    State(pool): State<SqlitePool>,
    State(config): State<Arc<ServerConfig>>,
    JsonBody(mut request): JsonBody<SignupRequest>,
) -> Result<(StatusCode, Json<MessageResponse>), BackendError> {
    request.username = request.username.trim().to_string();
    request.email = request.email.trim().to_lowercase();
    tracing::info!("Signup request for username: {}, email: {}", request.username, request.email);

    validate(&request)?;

    if get_user_by_username(&pool, &request.username).await?.is_some() {
        tracing::warn!("Username already exists: {}", request.username);
        return Err(BackendError::bad_request("Username is already taken"));
    }

    if get_user_by_email(&pool, &request.email).await?.is_some() {
        tracing::warn!("Email already exists: {}", request.email);
        return Err(BackendError::bad_request("Email is already taken"));
    }

    let password_hash = hash_password(request.password, config.bcrypt_cost).await?;
    let user = create_user(&pool, &request.username, &request.email, &password_hash).await?;

    tracing::info!("User created: {} ({})", user.username, user.id);

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::new("Signed up successfully")),
    ))
}
