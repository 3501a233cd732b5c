//! Integration tests for signup, tokens, and the user endpoints.
//!
//! These tests require a running API server (cargo run -p bramble-api)
//! backed by a migrated database.
//!
//! Run with: cargo test -p bramble-integration-tests -- --ignored

#![allow(clippy::unwrap_used)]

use reqwest::StatusCode;
use serde_json::{Value, json};
use uuid::Uuid;

use bramble_integration_tests::{base_url, client, login, signup};

#[tokio::test]
#[ignore = "Requires a running API server"]
async fn test_signup_and_login() {
    let client = client();
    let user = signup(&client).await;

    assert!(!user.token.is_empty());

    // A second login also works and mints a fresh token
    let token = login(&client, &user.email, &user.password).await;
    assert!(!token.is_empty());
}

#[tokio::test]
#[ignore = "Requires a running API server"]
async fn test_signup_rejects_invalid_fields() {
    let client = client();
    let base_url = base_url();

    // Bad email shape
    let resp = client
        .post(format!("{base_url}/users"))
        .json(&json!({ "email": "not-an-email", "password": "test password" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = resp.json().await.unwrap();
    assert!(body["errors"]["email"].is_array());

    // Short password
    let resp = client
        .post(format!("{base_url}/users"))
        .json(&json!({ "email": format!("{}@test.io", Uuid::new_v4()), "password": "short" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = resp.json().await.unwrap();
    assert!(body["errors"]["password"].is_array());
}

#[tokio::test]
#[ignore = "Requires a running API server"]
async fn test_duplicate_email_rejected() {
    let client = client();
    let base_url = base_url();
    let user = signup(&client).await;

    let resp = client
        .post(format!("{base_url}/users"))
        .json(&json!({ "email": user.email, "password": "test password" }))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[ignore = "Requires a running API server"]
async fn test_bad_credentials_rejected() {
    let client = client();
    let base_url = base_url();
    let user = signup(&client).await;

    let resp = client
        .post(format!("{base_url}/tokens"))
        .json(&json!({ "email": user.email, "password": "wrong password" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let resp = client
        .post(format!("{base_url}/tokens"))
        .json(&json!({ "email": "nobody@test.io", "password": "test password" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[ignore = "Requires a running API server"]
async fn test_show_profile_is_self_only() {
    let client = client();
    let base_url = base_url();
    let user = signup(&client).await;
    let other = signup(&client).await;

    // Own profile
    let resp = client
        .get(format!("{base_url}/users/{}", user.id))
        .bearer_auth(&user.token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["email"], user.email);
    assert!(body["products"].is_array());

    // Someone else's profile
    let resp = client
        .get(format!("{base_url}/users/{}", other.id))
        .bearer_auth(&user.token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    // No token at all
    let resp = client
        .get(format!("{base_url}/users/{}", user.id))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
#[ignore = "Requires a running API server"]
async fn test_update_and_delete_own_account() {
    let client = client();
    let base_url = base_url();
    let user = signup(&client).await;

    // Update the password only
    let resp = client
        .put(format!("{base_url}/users/{}", user.id))
        .bearer_auth(&user.token)
        .json(&json!({ "password": "a brand new password" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    // Old password no longer works, new one does
    let resp = client
        .post(format!("{base_url}/tokens"))
        .json(&json!({ "email": user.email, "password": user.password }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let token = login(&client, &user.email, "a brand new password").await;

    // Delete the account
    let resp = client
        .delete(format!("{base_url}/users/{}", user.id))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    // The token now references a missing user
    let resp = client
        .get(format!("{base_url}/users/{}", user.id))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}
