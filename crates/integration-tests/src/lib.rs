//! Integration tests for Bramble Market.
//!
//! # Running Tests
//!
//! ```bash
//! # Start the database and apply migrations
//! cargo run -p bramble-cli -- migrate
//!
//! # Start the API
//! cargo run -p bramble-api
//!
//! # Run the ignored end-to-end tests
//! cargo test -p bramble-integration-tests -- --ignored
//! ```
//!
//! The tests talk to a running server over HTTP; `BRAMBLE_BASE_URL`
//! overrides the default `http://localhost:3000`.

use reqwest::Client;
use serde_json::{Value, json};
use uuid::Uuid;

/// Base URL for the API (configurable via environment).
#[must_use]
pub fn base_url() -> String {
    std::env::var("BRAMBLE_BASE_URL").unwrap_or_else(|_| "http://localhost:3000".to_string())
}

/// Plain HTTP client.
///
/// # Panics
///
/// Panics if the client cannot be built.
#[must_use]
pub fn client() -> Client {
    Client::builder().build().expect("Failed to create HTTP client")
}

/// A registered test user with their credentials and token.
pub struct TestUser {
    pub id: i64,
    pub email: String,
    pub password: String,
    pub token: String,
}

/// Sign up a fresh user with a unique email and log them in.
///
/// # Panics
///
/// Panics if signup or login fails.
pub async fn signup(client: &Client) -> TestUser {
    let base_url = base_url();
    let email = format!("{}@test.io", Uuid::new_v4());
    let password = "test password".to_string();

    let resp = client
        .post(format!("{base_url}/users"))
        .json(&json!({ "email": email, "password": password }))
        .send()
        .await
        .expect("Failed to sign up");
    assert_eq!(resp.status(), reqwest::StatusCode::CREATED);

    let body: Value = resp.json().await.expect("Failed to read signup response");
    let id = body["id"].as_i64().expect("signup response carries the id");

    let token = login(client, &email, &password).await;

    TestUser {
        id,
        email,
        password,
        token,
    }
}

/// Obtain an access token for existing credentials.
///
/// # Panics
///
/// Panics if the token request fails.
pub async fn login(client: &Client, email: &str, password: &str) -> String {
    let base_url = base_url();

    let resp = client
        .post(format!("{base_url}/tokens"))
        .json(&json!({ "email": email, "password": password }))
        .send()
        .await
        .expect("Failed to request token");
    assert_eq!(resp.status(), reqwest::StatusCode::OK);

    let body: Value = resp.json().await.expect("Failed to read token response");
    body["token"]
        .as_str()
        .expect("token response carries the token")
        .to_string()
}

/// Create a product owned by `user`.
///
/// # Panics
///
/// Panics if the request fails.
pub async fn create_product(
    client: &Client,
    user: &TestUser,
    title: &str,
    price: &str,
    published: bool,
    quantity: i32,
) -> Value {
    let base_url = base_url();

    let resp = client
        .post(format!("{base_url}/products"))
        .bearer_auth(&user.token)
        .json(&json!({
            "title": title,
            "price": price,
            "published": published,
            "quantity": quantity,
        }))
        .send()
        .await
        .expect("Failed to create product");
    assert_eq!(resp.status(), reqwest::StatusCode::CREATED);

    resp.json().await.expect("Failed to read product response")
}
