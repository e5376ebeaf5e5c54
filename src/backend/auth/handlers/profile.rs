/**
 * Profile Handlers
 *
 * - GET /users/profile - the caller's own profile
 * - PUT /users/profile - update about/status and optionally the picture
 * - GET /users/{user_id}/profile - another user's public profile
 *
 * All three require a valid bearer token. Profiles never include the
 * password hash, and `profile_picture` is returned as an absolute URL.
 */

use std::sync::Arc;

use axum::{
    extract::{Multipart, State},
    response::Json,
};
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::backend::auth::users::{get_user_by_id, update_profile as store_profile, ProfileChanges};
use crate::backend::error::BackendError;
use crate::backend::middleware::{AuthUser, BaseUrl, PathParams};
use crate::backend::server::config::ServerConfig;
use crate::backend::uploads::{discard_image, read_form, UploadKind};
use crate::shared::messaging::{ProfileResponse, UserStatus};
use crate::shared::FieldErrors;

/// Longest accepted "about" text
pub const MAX_ABOUT_LEN: usize = 200;

/// Get current user handler
pub async fn get_profile(
    State(pool): State<SqlitePool>,
    AuthUser(auth): AuthUser,
    base: BaseUrl,
) -> Result<Json<ProfileResponse>, BackendError> {
    let user = get_user_by_id(&pool, auth.user_id)
        .await?
        .ok_or_else(|| BackendError::not_found("User not found"))?;

    Ok(Json(ProfileResponse {
        user: user.to_profile(&base),
    }))
}

/// Get another user's profile
pub async fn get_user_profile(
    State(pool): State<SqlitePool>,
    AuthUser(_auth): AuthUser,
    base: BaseUrl,
    PathParams(user_id): PathParams<Uuid>,
) -> Result<Json<ProfileResponse>, BackendError> {
    let user = get_user_by_id(&pool, user_id).await?.ok_or_else(|| {
        tracing::debug!("Profile lookup for unknown user {}", user_id);
        BackendError::not_found("User not found")
    })?;

    Ok(Json(ProfileResponse {
        user: user.to_profile(&base),
    }))
}

/// Update the caller's profile from a multipart form
///
/// Fields: `about`, `status` (`Online`/`Offline`), file `profilePicture`.
/// Fields that are absent keep their stored value. The picture is written
/// only after the text fields pass validation.
pub async fn update_profile(
    State(pool): State<SqlitePool>,
    State(config): State<Arc<ServerConfig>>,
    AuthUser(auth): AuthUser,
    base: BaseUrl,
    multipart: Multipart,
) -> Result<Json<ProfileResponse>, BackendError> {
    let mut form = read_form(multipart, &config, UploadKind::ProfilePicture).await?;

    let about = form.text("about");
    let status = form.text("status");
    let parsed_status = status.as_deref().map(UserStatus::parse);

    let mut errors = FieldErrors::default();
    errors
        .check(
            about.as_ref().map_or(true, |a| a.chars().count() <= MAX_ABOUT_LEN),
            "about",
            "About must be at most 200 characters",
        )
        .check(
            !matches!(parsed_status, Some(None)),
            "status",
            "Status must be Online or Offline",
        );
    errors.finish()?;

    let changes = ProfileChanges {
        about,
        status: parsed_status.flatten(),
        profile_picture: form.save_image(&config).await?,
    };

    let stored = store_profile(&pool, auth.user_id, &changes)
        .await
        .map_err(BackendError::from)
        .and_then(|user| user.ok_or_else(|| BackendError::not_found("User not found")));
    let user = match stored {
        Ok(user) => user,
        Err(e) => {
            discard_image(&config, changes.profile_picture.as_deref()).await;
            return Err(e);
        }
    };

    tracing::info!("Profile updated for {}", user.username);

    Ok(Json(ProfileResponse {
        user: user.to_profile(&base),
    }))
}
