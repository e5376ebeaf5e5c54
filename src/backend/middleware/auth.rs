/**
 * Authentication Middleware
 *
 * This module provides middleware for protecting routes that require
 * user authentication. It extracts and verifies JWT tokens from the
 * Authorization header and provides the resolved user to handlers.
 */

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts},
    middleware::Next,
    response::Response,
};
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::backend::auth::sessions::TokenError;
use crate::backend::auth::users::get_user_by_id;
use crate::backend::error::BackendError;
use crate::backend::server::state::AppState;

/// Authenticated user resolved from the bearer token
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub user_id: Uuid,
    pub username: String,
}

/// Authentication middleware
///
/// This middleware:
/// 1. Extracts the JWT token from the Authorization header
/// 2. Verifies signature and expiry
/// 3. Resolves the user from the database
/// 4. Attaches `AuthenticatedUser` to the request extensions
///
/// Returns 401 `Unauthorized` for a missing/invalid token or unknown user,
/// and 401 `Token expired` for an expired one.
pub async fn auth_middleware(
    State(app_state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, BackendError> {
    let token = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| {
            tracing::warn!("Missing or malformed Authorization header");
            BackendError::unauthorized("Unauthorized")
        })?;

    let user_id = app_state.tokens.verify(token).map_err(|e| {
        tracing::warn!("Rejected token: {}", e);
        match e {
            TokenError::Expired => BackendError::unauthorized("Token expired"),
            TokenError::Invalid => BackendError::unauthorized("Unauthorized"),
        }
    })?;

    let user = resolve_user(&app_state.db, user_id).await?;
    request.extensions_mut().insert(user);

    Ok(next.run(request).await)
}

/// Look up the token's user, mapping "no such user" to 401
async fn resolve_user(pool: &SqlitePool, user_id: Uuid) -> Result<AuthenticatedUser, BackendError> {
    let user = get_user_by_id(pool, user_id).await?.ok_or_else(|| {
        tracing::warn!("Token for unknown user {}", user_id);
        BackendError::unauthorized("Unauthorized")
    })?;

    Ok(AuthenticatedUser {
        user_id: user.id,
        username: user.username,
    })
}

/// Axum extractor for the authenticated user
///
/// Only valid on routes behind `auth_middleware`; elsewhere it rejects with 401.
#[derive(Clone, Debug)]
pub struct AuthUser(pub AuthenticatedUser);

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = BackendError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user = parts
            .extensions
            .get::<AuthenticatedUser>()
            .cloned()
            .ok_or_else(|| {
                tracing::warn!("AuthenticatedUser not found in request extensions");
                BackendError::unauthorized("Unauthorized")
            })?;

        Ok(AuthUser(user))
    }
}
