//! POST /users/validate-token: reports whether a token is currently valid.

use std::sync::Arc;

use axum::{extract::State, response::Json};

use crate::backend::auth::handlers::types::{ValidateTokenRequest, ValidateTokenResponse};
use crate::backend::auth::sessions::TokenIssuer;
use crate::backend::error::BackendError;
use crate::backend::middleware::JsonBody;

/// No side effects and no authentication
pub async fn validate_token(
    State(tokens): State<Arc<TokenIssuer>>,
    JsonBody(request): JsonBody<ValidateTokenRequest>,
) -> Result<Json<ValidateTokenResponse>, BackendError> {
    let valid = tokens.verify(request.token.trim()).is_ok();
    Ok(Json(ValidateTokenResponse { valid }))
}
