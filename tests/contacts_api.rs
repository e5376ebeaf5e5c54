//! Contacts API integration tests

mod common;

use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::json;
use uuid::Uuid;

use common::*;

#[tokio::test]
async fn test_add_contact_populates_profile() {
    let app = TestApp::new().await;
    let alice = create_test_user(&app, "alice").await;
    let bob = create_test_user(&app, "bob").await;

    let added = app
        .post(&format!("/api/contacts/{}", bob.id), alice.token(), json!({}))
        .await;
    assert_eq!(added.status, StatusCode::OK, "{:?}", added.body);
    assert_eq!(added.body["message"], "Contact added successfully");
    assert_eq!(added.body["contact"]["status"], "accepted");

    let listed = app.get("/api/contacts", alice.token()).await;
    let contacts = listed.body["contacts"].as_array().unwrap();
    assert_eq!(contacts.len(), 1);
    assert_eq!(contacts[0]["contact"]["username"], "bob");
    assert_eq!(contacts[0]["status"], "accepted");
    assert!(contacts[0]["contact"]["profile_picture"]
        .as_str()
        .unwrap()
        .starts_with(&format!("http://{TEST_HOST}/")));
}

#[tokio::test]
async fn test_contacts_are_directed() {
    let app = TestApp::new().await;
    let alice = create_test_user(&app, "alice").await;
    let bob = create_test_user(&app, "bob").await;

    app.post(&format!("/api/contacts/{}", bob.id), alice.token(), json!({}))
        .await;

    let bobs = app.get("/api/contacts", bob.token()).await;
    assert_eq!(bobs.body["contacts"], json!([]));
}

#[tokio::test]
async fn test_add_self_or_unknown_user() {
    let app = TestApp::new().await;
    let alice = create_test_user(&app, "alice").await;

    let own = app
        .post(&format!("/api/contacts/{}", alice.id), alice.token(), json!({}))
        .await;
    let unknown = app
        .post(&format!("/api/contacts/{}", Uuid::new_v4()), alice.token(), json!({}))
        .await;

    assert_error!(own, StatusCode::BAD_REQUEST);
    assert_error!(unknown, StatusCode::NOT_FOUND, "User not found");
}

#[tokio::test]
async fn test_block_then_unblock_by_adding() {
    let app = TestApp::new().await;
    let alice = create_test_user(&app, "alice").await;
    let bob = create_test_user(&app, "bob").await;

    let blocked = app
        .put(&format!("/api/contacts/{}/block", bob.id), alice.token(), None)
        .await;
    assert_eq!(blocked.body["message"], "Contact blocked successfully");
    assert_eq!(blocked.body["contact"]["status"], "blocked");

    let readded = app
        .post(&format!("/api/contacts/{}", bob.id), alice.token(), json!({}))
        .await;
    assert_eq!(readded.status, StatusCode::OK);
    assert_eq!(readded.body["contact"]["status"], "accepted");
}

#[tokio::test]
async fn test_list_by_status() {
    let app = TestApp::new().await;
    let alice = create_test_user(&app, "alice").await;
    let bob = create_test_user(&app, "bob").await;
    let carol = create_test_user(&app, "carol").await;

    app.post(&format!("/api/contacts/{}", bob.id), alice.token(), json!({}))
        .await;
    app.put(&format!("/api/contacts/{}/block", carol.id), alice.token(), None)
        .await;

    let blocked = app.get("/api/contacts/blocked", alice.token()).await;
    let contacts = blocked.body["contacts"].as_array().unwrap();
    assert_eq!(contacts.len(), 1);
    assert_eq!(contacts[0]["contact"]["username"], "carol");

    let pending = app.get("/api/contacts/pending", alice.token()).await;
    assert_eq!(pending.body["contacts"], json!([]));
}

#[tokio::test]
async fn test_list_by_unknown_status() {
    let app = TestApp::new().await;
    let alice = create_test_user(&app, "alice").await;

    let response = app.get("/api/contacts/friends", alice.token()).await;

    assert_field_error!(response, "status");
}

#[tokio::test]
async fn test_delete_contact() {
    let app = TestApp::new().await;
    let alice = create_test_user(&app, "alice").await;
    let bob = create_test_user(&app, "bob").await;

    app.post(&format!("/api/contacts/{}", bob.id), alice.token(), json!({}))
        .await;

    let deleted = app
        .delete(&format!("/api/contacts/{}", bob.id), alice.token())
        .await;
    let again = app
        .delete(&format!("/api/contacts/{}", bob.id), alice.token())
        .await;

    assert_eq!(deleted.body["message"], "Contact deleted successfully");
    assert_error!(again, StatusCode::NOT_FOUND, "Contact not found");
}

#[tokio::test]
async fn test_first_message_creates_pending_contact() {
    let app = TestApp::new().await;
    let alice = create_test_user(&app, "alice").await;
    let bob = create_test_user(&app, "bob").await;

    let sent = app
        .post(
            &format!("/api/messages/{}/send", bob.id),
            alice.token(),
            json!({ "content": "hi bob" }),
        )
        .await;
    assert_eq!(sent.status, StatusCode::OK, "{:?}", sent.body);

    let pending = app.get("/api/contacts/pending", alice.token()).await;
    let contacts = pending.body["contacts"].as_array().unwrap();
    assert_eq!(contacts.len(), 1);
    assert_eq!(contacts[0]["contact"]["username"], "bob");

    // Accepting later goes through the transition table
    let accepted = app
        .post(&format!("/api/contacts/{}", bob.id), alice.token(), json!({}))
        .await;
    assert_eq!(accepted.body["contact"]["status"], "accepted");
}
