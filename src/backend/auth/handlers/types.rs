/**
 * Authentication Handler Types
 *
 * This module defines the request and response types used by the account
 * handlers. Missing fields deserialize to empty strings so that they are
 * reported as field errors rather than body rejections.
 */

use serde::{Deserialize, Serialize};

/// Sign up request
#[derive(Deserialize, Serialize, Debug, Default)]
pub struct SignupRequest {
    /// User's chosen username (3-30 chars, alphanumeric + underscore)
    #[serde(default)]
    pub username: String,
    /// User's email address
    #[serde(default)]
    pub email: String,
    /// User's password (will be hashed before storage)
    #[serde(default)]
    pub password: String,
}

/// Sign in request
#[derive(Deserialize, Serialize, Debug, Default)]
pub struct SigninRequest {
    /// Username or email
    #[serde(default)]
    pub identifier: String,
    #[serde(default)]
    pub password: String,
}

/// Sign in response
#[derive(Serialize, Deserialize, Debug)]
pub struct SigninResponse {
    pub message: String,
    /// JWT token for authentication
    pub token: String,
}

/// Token validation request
#[derive(Deserialize, Serialize, Debug)]
pub struct ValidateTokenRequest {
    #[serde(default)]
    pub token: String,
}

/// Token validation response
#[derive(Serialize, Deserialize, Debug, PartialEq, Eq)]
pub struct ValidateTokenResponse {
    pub valid: bool,
}
