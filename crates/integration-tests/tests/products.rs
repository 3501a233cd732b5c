//! Integration tests for the product endpoints.
//!
//! These tests require a running API server (cargo run -p bramble-api)
//! backed by a migrated database.
//!
//! Run with: cargo test -p bramble-integration-tests -- --ignored

#![allow(clippy::unwrap_used)]

use reqwest::StatusCode;
use serde_json::{Value, json};
use uuid::Uuid;

use bramble_integration_tests::{base_url, client, create_product, signup};

#[tokio::test]
#[ignore = "Requires a running API server"]
async fn test_create_requires_auth() {
    let client = client();
    let base_url = base_url();

    let resp = client
        .post(format!("{base_url}/products"))
        .json(&json!({ "title": "TV", "price": "100" }))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
#[ignore = "Requires a running API server"]
async fn test_create_validates_fields() {
    let client = client();
    let base_url = base_url();
    let user = signup(&client).await;

    let resp = client
        .post(format!("{base_url}/products"))
        .bearer_auth(&user.token)
        .json(&json!({ "title": "", "price": "-5" }))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = resp.json().await.unwrap();
    assert!(body["errors"]["title"].is_array());
    assert!(body["errors"]["price"].is_array());
}

#[tokio::test]
#[ignore = "Requires a running API server"]
async fn test_search_returns_only_published() {
    let client = client();
    let base_url = base_url();
    let user = signup(&client).await;
    let marker = Uuid::new_v4().to_string();

    create_product(&client, &user, &format!("{marker} live"), "10", true, 5).await;
    create_product(&client, &user, &format!("{marker} draft"), "10", false, 5).await;

    let resp = client
        .get(format!("{base_url}/products"))
        .query(&[("title", marker.as_str())])
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = resp.json().await.unwrap();
    let data = body["data"].as_array().unwrap();
    assert_eq!(data.len(), 1);
    assert_eq!(data[0]["published"], true);
    assert!(body["links"]["next"].is_string());
}

#[tokio::test]
#[ignore = "Requires a running API server"]
async fn test_search_price_bounds() {
    let client = client();
    let base_url = base_url();
    let user = signup(&client).await;
    let marker = Uuid::new_v4().to_string();

    create_product(&client, &user, &format!("{marker} cheap"), "50", true, 5).await;
    create_product(&client, &user, &format!("{marker} dear"), "900", true, 5).await;

    let resp = client
        .get(format!("{base_url}/products"))
        .query(&[("title", marker.as_str()), ("priceMin", "500")])
        .send()
        .await
        .unwrap();
    let body: Value = resp.json().await.unwrap();
    let data = body["data"].as_array().unwrap();
    assert_eq!(data.len(), 1);
    assert_eq!(data[0]["title"], format!("{marker} dear"));

    let resp = client
        .get(format!("{base_url}/products"))
        .query(&[("title", marker.as_str()), ("priceMax", "100")])
        .send()
        .await
        .unwrap();
    let body: Value = resp.json().await.unwrap();
    let data = body["data"].as_array().unwrap();
    assert_eq!(data.len(), 1);
    assert_eq!(data[0]["title"], format!("{marker} cheap"));
}

#[tokio::test]
#[ignore = "Requires a running API server"]
async fn test_show_unknown_product_is_404() {
    let client = client();
    let base_url = base_url();

    let resp = client
        .get(format!("{base_url}/products/{}", i32::MAX))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore = "Requires a running API server"]
async fn test_update_and_delete_are_owner_only() {
    let client = client();
    let base_url = base_url();
    let owner = signup(&client).await;
    let stranger = signup(&client).await;

    let product = create_product(&client, &owner, "Chair", "30", true, 5).await;
    let product_id = product["id"].as_i64().unwrap();

    // A stranger may not update it
    let resp = client
        .put(format!("{base_url}/products/{product_id}"))
        .bearer_auth(&stranger.token)
        .json(&json!({ "price": "1" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    // The owner may
    let resp = client
        .put(format!("{base_url}/products/{product_id}"))
        .bearer_auth(&owner.token)
        .json(&json!({ "price": "35", "published": false }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let resp = client
        .get(format!("{base_url}/products/{product_id}"))
        .send()
        .await
        .unwrap();
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["price"], "35");
    assert_eq!(body["published"], false);

    // A stranger may not delete it either
    let resp = client
        .delete(format!("{base_url}/products/{product_id}"))
        .bearer_auth(&stranger.token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let resp = client
        .delete(format!("{base_url}/products/{product_id}"))
        .bearer_auth(&owner.token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let resp = client
        .get(format!("{base_url}/products/{product_id}"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
