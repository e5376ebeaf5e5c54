//! Account API integration tests
//!
//! Sign-up, sign-in, token validation, the auth guard and profiles.

mod common;

use axum::http::{Method, StatusCode};
use pretty_assertions::assert_eq;
use serde_json::json;
use uuid::Uuid;

use common::*;

async fn signup(app: &TestApp, username: &str, email: &str, password: &str) -> TestResponse {
    app.request(
        Method::POST,
        "/users/signup",
        None,
        Some(json!({ "username": username, "email": email, "password": password })),
    )
    .await
}

#[tokio::test]
async fn test_signup_success() {
    let app = TestApp::new().await;

    let response = signup(&app, "alice", "alice@example.com", "hunter22").await;

    assert_eq!(response.status, StatusCode::CREATED);
    assert_eq!(response.body["message"], "Signed up successfully");
}

#[tokio::test]
async fn test_signup_stores_one_hashed_account() {
    let app = TestApp::new().await;

    let first = signup(&app, "alice", "alice@example.com", "hunter22").await;
    let again = signup(&app, "alice", "alice@example.com", "hunter22").await;
    assert_eq!(first.status, StatusCode::CREATED);
    assert_eq!(again.status, StatusCode::BAD_REQUEST);

    let hashes: Vec<String> = sqlx::query_scalar("SELECT password_hash FROM users WHERE username = ?")
        .bind("alice")
        .fetch_all(&app.pool)
        .await
        .unwrap();
    assert_eq!(hashes.len(), 1);
    assert_ne!(hashes[0], "hunter22");
    assert!(bcrypt::verify("hunter22", &hashes[0]).unwrap());
}

#[tokio::test]
async fn test_signup_reports_every_invalid_field() {
    let app = TestApp::new().await;

    let response = signup(&app, "1x", "not-an-email", "123").await;

    assert_field_error!(response, "username");
    assert_field_error!(response, "email");
    assert_field_error!(response, "password");
}

#[tokio::test]
async fn test_signup_duplicate_username() {
    let app = TestApp::new().await;
    create_test_user(&app, "alice").await;

    let response = signup(&app, "alice", "other@example.com", "hunter22").await;

    assert_error!(response, StatusCode::BAD_REQUEST, "Username is already taken");
}

#[tokio::test]
async fn test_signup_duplicate_email_ignores_case() {
    let app = TestApp::new().await;
    create_test_user(&app, "alice").await;

    let response = signup(&app, "alicia", "ALICE@example.com", "hunter22").await;

    assert_error!(response, StatusCode::BAD_REQUEST, "Email is already taken");
}

#[tokio::test]
async fn test_signin_with_username_or_email() {
    let app = TestApp::new().await;
    let alice = create_test_user(&app, "alice").await;

    let by_name = sign_in(&app, "alice", TEST_PASSWORD).await;
    let by_email = sign_in(&app, &alice.email, TEST_PASSWORD).await;

    for token in [by_name, by_email] {
        let profile = app.get("/users/profile", &token).await;
        assert_eq!(profile.status, StatusCode::OK);
        assert_eq!(profile.body["user"]["username"], "alice");
    }
}

#[tokio::test]
async fn test_signin_wrong_password_is_generic() {
    let app = TestApp::new().await;
    create_test_user(&app, "alice").await;

    let wrong_password = app
        .request(
            Method::POST,
            "/users/signin",
            None,
            Some(json!({ "identifier": "alice", "password": "nope-nope" })),
        )
        .await;
    let unknown_user = app
        .request(
            Method::POST,
            "/users/signin",
            None,
            Some(json!({ "identifier": "nobody", "password": "nope-nope" })),
        )
        .await;

    assert_error!(wrong_password, StatusCode::BAD_REQUEST, "Invalid credentials");
    assert_error!(unknown_user, StatusCode::BAD_REQUEST, "Invalid credentials");
}

#[tokio::test]
async fn test_signin_missing_fields() {
    let app = TestApp::new().await;

    let response = app
        .request(Method::POST, "/users/signin", None, Some(json!({})))
        .await;

    assert_field_error!(response, "identifier");
    assert_field_error!(response, "password");
}

#[tokio::test]
async fn test_malformed_json_uses_error_shape() {
    let app = TestApp::new().await;

    let request = axum::http::Request::builder()
        .method(Method::POST)
        .uri("/users/signup")
        .header("content-type", "application/json")
        .body(axum::body::Body::from("{not json"))
        .unwrap();
    let response = app.send(request).await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["error"]["status"], 400);
}

#[tokio::test]
async fn test_validate_token() {
    let app = TestApp::new().await;
    let alice = create_test_user(&app, "alice").await;

    let valid = app
        .request(
            Method::POST,
            "/users/validate-token",
            None,
            Some(json!({ "token": alice.token })),
        )
        .await;
    let garbage = app
        .request(
            Method::POST,
            "/users/validate-token",
            None,
            Some(json!({ "token": "garbage" })),
        )
        .await;

    assert_eq!(valid.body, json!({ "valid": true }));
    assert_eq!(garbage.body, json!({ "valid": false }));
}

#[tokio::test]
async fn test_guard_rejects_missing_and_bad_tokens() {
    let app = TestApp::new().await;

    let missing = app.request(Method::GET, "/api/contacts", None, None).await;
    let bad = app.get("/api/contacts", "not-a-jwt").await;

    assert_error!(missing, StatusCode::UNAUTHORIZED, "Unauthorized");
    assert_error!(bad, StatusCode::UNAUTHORIZED, "Unauthorized");
}

#[tokio::test]
async fn test_guard_reports_expired_token() {
    let app = TestApp::new().await;
    let alice = create_test_user(&app, "alice").await;

    let response = app.get("/api/contacts", &expired_token(alice.id)).await;

    assert_error!(response, StatusCode::UNAUTHORIZED, "Token expired");
}

#[tokio::test]
async fn test_guard_rejects_token_for_unknown_user() {
    let app = TestApp::new().await;

    let response = app.get("/users/profile", &token_for(Uuid::new_v4())).await;

    assert_error!(response, StatusCode::UNAUTHORIZED, "Unauthorized");
}

#[tokio::test]
async fn test_profile_has_absolute_picture_and_no_hash() {
    let app = TestApp::new().await;
    let alice = create_test_user(&app, "alice").await;

    let response = app.get("/users/profile", alice.token()).await;

    let user = &response.body["user"];
    assert_eq!(user["about"], "Just chatting here!");
    assert_eq!(user["status"], "Offline");
    assert_eq!(
        user["profile_picture"],
        format!("http://{TEST_HOST}/images/blank-profile-picture.png")
    );
    assert!(user.get("password_hash").is_none());
}

#[tokio::test]
async fn test_other_user_profile() {
    let app = TestApp::new().await;
    let alice = create_test_user(&app, "alice").await;
    let bob = create_test_user(&app, "bob").await;

    let found = app.get(&format!("/users/{}/profile", bob.id), alice.token()).await;
    let missing = app
        .get(&format!("/users/{}/profile", Uuid::new_v4()), alice.token())
        .await;

    assert_eq!(found.status, StatusCode::OK);
    assert_eq!(found.body["user"]["username"], "bob");
    assert_error!(missing, StatusCode::NOT_FOUND, "User not found");
}

#[tokio::test]
async fn test_update_profile_fields() {
    let app = TestApp::new().await;
    let alice = create_test_user(&app, "alice").await;

    let form = MultipartBody::default()
        .text("about", "Rustacean")
        .text("status", "Online");
    let response = app
        .multipart(Method::PUT, "/users/profile", alice.token(), form)
        .await;

    assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);
    assert_eq!(response.body["user"]["about"], "Rustacean");
    assert_eq!(response.body["user"]["status"], "Online");
}

#[tokio::test]
async fn test_update_profile_rejects_unknown_status() {
    let app = TestApp::new().await;
    let alice = create_test_user(&app, "alice").await;

    let form = MultipartBody::default().text("status", "Away");
    let response = app
        .multipart(Method::PUT, "/users/profile", alice.token(), form)
        .await;

    assert_field_error!(response, "status");
}

#[tokio::test]
async fn test_health() {
    let app = TestApp::new().await;

    let response = app.request(Method::GET, "/health", None, None).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["status"], "ok");
}

#[tokio::test]
async fn test_unknown_path_is_json_404() {
    let app = TestApp::new().await;

    let response = app.request(Method::GET, "/no/such/page", None, None).await;

    assert_error!(response, StatusCode::NOT_FOUND);
}
