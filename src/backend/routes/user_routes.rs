/**
 * Account Routes
 *
 * Mounted under `/users`.
 *
 * # Routes
 *
 * ## Public
 * - `POST /users/signup` - User registration
 * - `POST /users/signin` - Sign in with username or email
 * - `POST /users/validate-token` - Check a token without side effects
 *
 * ## Authenticated
 * - `GET /users/profile` - Caller's profile
 * - `PUT /users/profile` - Update about/status/picture (multipart)
 * - `GET /users/{user_id}/profile` - Another user's profile
 */

use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use crate::backend::auth::{get_profile, get_user_profile, signin, signup, update_profile, validate_token};
use crate::backend::middleware::auth_middleware;
use crate::backend::server::state::AppState;

/// Build the `/users` router
///
/// The auth guard is applied with `route_layer`, so it only runs for the
/// profile routes and unmatched paths still fall through to the fallback.
pub fn user_routes(state: AppState) -> Router<AppState> {
    let protected = Router::new()
        .route("/profile", get(get_profile).put(update_profile))
        .route("/{user_id}/profile", get(get_user_profile))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware));

    Router::new()
        .route("/signup", post(signup))
        .route("/signin", post(signin))
        .route("/validate-token", post(validate_token))
        .merge(protected)
}
