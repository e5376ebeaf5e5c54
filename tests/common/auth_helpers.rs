//! Authentication test helpers
//!
//! Provides utilities for creating test users through the public API and
//! minting tokens directly.

use axum::http::{Method, StatusCode};
use chrono::Utc;
use serde_json::json;
use uuid::Uuid;

use palaver::backend::auth::sessions::{Claims, TokenIssuer};

use super::app::{TestApp, TEST_JWT_SECRET};

pub const TEST_PASSWORD: &str = "secret-password";

/// Signed-in test user
#[derive(Debug, Clone)]
pub struct TestUser {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub token: String,
}

impl TestUser {
    pub fn token(&self) -> &str {
        &self.token
    }
}

/// Sign a user up, sign in and resolve their ID
pub async fn create_test_user(app: &TestApp, username: &str) -> TestUser {
    let email = format!("{username}@example.com");

    let signup = app
        .request(
            Method::POST,
            "/users/signup",
            None,
            Some(json!({ "username": username, "email": email, "password": TEST_PASSWORD })),
        )
        .await;
    assert_eq!(signup.status, StatusCode::CREATED, "signup failed: {:?}", signup.body);

    let token = sign_in(app, username, TEST_PASSWORD).await;
    let profile = app.get("/users/profile", &token).await;
    assert_eq!(profile.status, StatusCode::OK, "profile failed: {:?}", profile.body);

    let id = profile.body["user"]["id"]
        .as_str()
        .and_then(|id| Uuid::parse_str(id).ok())
        .expect("profile carries an id");

    TestUser {
        id,
        username: username.to_string(),
        email,
        token,
    }
}

/// Sign in and return the token
pub async fn sign_in(app: &TestApp, identifier: &str, password: &str) -> String {
    let response = app
        .request(
            Method::POST,
            "/users/signin",
            None,
            Some(json!({ "identifier": identifier, "password": password })),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK, "signin failed: {:?}", response.body);

    response.body["token"]
        .as_str()
        .expect("signin returns a token")
        .to_string()
}

/// Token signed with the test secret that expired an hour ago
pub fn expired_token(user_id: Uuid) -> String {
    let issuer = TokenIssuer::new(TEST_JWT_SECRET, 7);
    let now = Utc::now().timestamp();
    issuer
        .encode_claims(&Claims {
            sub: user_id.to_string(),
            iat: now - 7200,
            exp: now - 3600,
        })
        .expect("Failed to encode claims")
}

/// Token for `user_id` signed with the test secret
pub fn token_for(user_id: Uuid) -> String {
    TokenIssuer::new(TEST_JWT_SECRET, 7)
        .issue(user_id)
        .expect("Failed to issue token")
}
