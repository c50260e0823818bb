//! Integration tests for accounts and carts: signup, login, profile CRUD,
//! and the idempotent cart operations.

use serde_json::json;

mod common;
use common::{TestServer, TEST_PASSWORD};

// ============================================================================
// Signup / Login
// ============================================================================

#[tokio::test]
async fn signup_then_duplicate_username_conflicts() {
    // ---
    let server = TestServer::new().await;
    server.signup("asha").await;

    // Same username again: 409, regardless of the other fields.
    let response = server
        .client
        .post(server.url("/users/signup"))
        .json(&json!({
            "username": "asha",
            "password": "a-different-password",
        }))
        .send()
        .await
        .expect("signup request");

    assert_eq!(response.status(), 409);
    let body: serde_json::Value = response.json().await.unwrap();
    assert!(body["error"]
        .as_str()
        .unwrap()
        .to_lowercase()
        .contains("username"));
}

#[tokio::test]
async fn signup_requires_username_and_password() {
    // ---
    let server = TestServer::new().await;

    let response = server
        .client
        .post(server.url("/users/signup"))
        .json(&json!({ "username": "ghost" }))
        .send()
        .await
        .expect("signup request");

    assert_eq!(response.status(), 400);
    let body: serde_json::Value = response.json().await.unwrap();
    assert!(body["error"].as_str().unwrap().contains("password"));

    let response = server
        .client
        .post(server.url("/users/signup"))
        .json(&json!({ "password": TEST_PASSWORD }))
        .send()
        .await
        .expect("signup request");

    assert_eq!(response.status(), 400);
}

#[tokio::test]
async fn login_issues_a_token_with_identity() {
    // ---
    let server = TestServer::new().await;
    server.signup("asha").await;

    let response = server
        .client
        .post(server.url("/users/login"))
        .json(&json!({ "username": "asha", "password": TEST_PASSWORD }))
        .send()
        .await
        .expect("login request");

    assert_eq!(response.status(), 200);
    let body: serde_json::Value = response.json().await.unwrap();
    assert!(!body["token"].as_str().unwrap().is_empty());
    assert_eq!(body["user"]["username"], "asha");
    assert_eq!(body["user"]["role"], "customer");
}

#[tokio::test]
async fn bad_credentials_get_the_same_vague_401() {
    // ---
    let server = TestServer::new().await;
    server.signup("asha").await;

    let wrong_password = server
        .client
        .post(server.url("/users/login"))
        .json(&json!({ "username": "asha", "password": "not-it" }))
        .send()
        .await
        .unwrap();
    let unknown_user = server
        .client
        .post(server.url("/users/login"))
        .json(&json!({ "username": "nobody", "password": TEST_PASSWORD }))
        .send()
        .await
        .unwrap();

    assert_eq!(wrong_password.status(), 401);
    assert_eq!(unknown_user.status(), 401);

    let a: serde_json::Value = wrong_password.json().await.unwrap();
    let b: serde_json::Value = unknown_user.json().await.unwrap();
    assert_eq!(a["error"], b["error"], "responses must not leak which part failed");
}

// ============================================================================
// Profile
// ============================================================================

#[tokio::test]
async fn profile_requires_a_valid_token() {
    // ---
    let server = TestServer::new().await;

    let no_token = server
        .client
        .get(server.url("/users/profile"))
        .send()
        .await
        .unwrap();
    assert_eq!(no_token.status(), 401);

    let garbage_token = server
        .client
        .get(server.url("/users/profile"))
        .bearer_auth("not-a-real-token")
        .send()
        .await
        .unwrap();
    assert_eq!(garbage_token.status(), 401);
}

#[tokio::test]
async fn profile_read_never_carries_the_password_hash() {
    // ---
    let server = TestServer::new().await;
    let token = server.signup_and_login("asha").await;

    let response = server
        .client
        .get(server.url("/users/profile"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 200);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["username"], "asha");
    assert_eq!(body["phone"], "555-0100");
    assert!(body.get("passwordHash").is_none());
    assert!(body.get("password").is_none());
}

#[tokio::test]
async fn profile_update_merges_allowed_fields_only() {
    // ---
    let server = TestServer::new().await;
    let token = server.signup_and_login("asha").await;

    let form = reqwest::multipart::Form::new()
        .text("phone", "555-4242")
        .text("location", "Mumbai")
        // Not on the allow-list; must be ignored.
        .text("role", "admin");

    let response = server
        .client
        .put(server.url("/users/profile"))
        .bearer_auth(&token)
        .multipart(form)
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 200);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["phone"], "555-4242");
    assert_eq!(body["location"], "Mumbai");
    assert_eq!(body["firstName"], "Test", "untouched field must survive");
    assert_eq!(body["role"], "customer", "role is not client-assignable");
}

#[tokio::test]
async fn profile_update_with_profile_image_stores_a_reference() {
    // ---
    let server = TestServer::new().await;
    let token = server.signup_and_login("asha").await;

    let form = reqwest::multipart::Form::new()
        .part("profileImage", common::image_part("me.jpg"));

    let response = server
        .client
        .put(server.url("/users/profile"))
        .bearer_auth(&token)
        .multipart(form)
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 200);
    let body: serde_json::Value = response.json().await.unwrap();
    let reference = body["profileImage"].as_str().unwrap();
    assert!(reference.starts_with("/uploads/"));

    // The stored file is served statically.
    let file = server
        .client
        .get(server.url(reference))
        .send()
        .await
        .unwrap();
    assert_eq!(file.status(), 200);
}

#[tokio::test]
async fn username_change_to_a_taken_name_conflicts() {
    // ---
    let server = TestServer::new().await;
    server.signup("taken").await;
    let token = server.signup_and_login("asha").await;

    let form = reqwest::multipart::Form::new().text("username", "taken");
    let response = server
        .client
        .put(server.url("/users/profile"))
        .bearer_auth(&token)
        .multipart(form)
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 409);
}

#[tokio::test]
async fn empty_profile_update_is_rejected() {
    // ---
    let server = TestServer::new().await;
    let token = server.signup_and_login("asha").await;

    let form = reqwest::multipart::Form::new().text("role", "admin");
    let response = server
        .client
        .put(server.url("/users/profile"))
        .bearer_auth(&token)
        .multipart(form)
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 400);
}

#[tokio::test]
async fn deleted_accounts_cannot_log_back_in() {
    // ---
    let server = TestServer::new().await;
    let token = server.signup_and_login("asha").await;

    let response = server
        .client
        .delete(server.url("/users/profile"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);

    // The token still verifies but the account is gone.
    let profile = server
        .client
        .get(server.url("/users/profile"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(profile.status(), 404);

    let login = server
        .client
        .post(server.url("/users/login"))
        .json(&json!({ "username": "asha", "password": TEST_PASSWORD }))
        .send()
        .await
        .unwrap();
    assert_eq!(login.status(), 401);
}

// ============================================================================
// Cart
// ============================================================================

#[tokio::test]
async fn cart_add_is_idempotent() {
    // ---
    let server = TestServer::new().await;
    let seller = server.signup_and_login("seller").await;
    let buyer = server.signup_and_login("buyer").await;
    let listing = server.create_listing(&seller).await;
    let listing_id = listing["id"].as_str().unwrap();

    for _ in 0..2 {
        let response = server
            .client
            .post(server.url("/users/cart"))
            .bearer_auth(&buyer)
            .json(&json!({ "bikeId": listing_id }))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), 200);
    }

    let cart = server
        .client
        .get(server.url("/users/cart"))
        .bearer_auth(&buyer)
        .send()
        .await
        .unwrap();
    let body: serde_json::Value = cart.json().await.unwrap();
    let entries = body.as_array().unwrap();
    assert_eq!(entries.len(), 1, "adding twice keeps exactly one reference");
    assert_eq!(entries[0]["brand"], "Honda");
}

#[tokio::test]
async fn cart_remove_of_an_absent_listing_is_a_noop() {
    // ---
    let server = TestServer::new().await;
    let buyer = server.signup_and_login("buyer").await;

    let response = server
        .client
        .delete(server.url("/users/cart"))
        .bearer_auth(&buyer)
        .json(&json!({ "bikeId": uuid::Uuid::new_v4() }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 200);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body.as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn cart_round_trip_add_then_remove() {
    // ---
    let server = TestServer::new().await;
    let seller = server.signup_and_login("seller").await;
    let buyer = server.signup_and_login("buyer").await;
    let listing = server.create_listing(&seller).await;
    let listing_id = listing["id"].as_str().unwrap();

    let added = server
        .client
        .post(server.url("/users/cart"))
        .bearer_auth(&buyer)
        .json(&json!({ "bikeId": listing_id }))
        .send()
        .await
        .unwrap();
    let refs: serde_json::Value = added.json().await.unwrap();
    assert_eq!(refs.as_array().unwrap().len(), 1);

    let removed = server
        .client
        .delete(server.url("/users/cart"))
        .bearer_auth(&buyer)
        .json(&json!({ "bikeId": listing_id }))
        .send()
        .await
        .unwrap();
    let refs: serde_json::Value = removed.json().await.unwrap();
    assert_eq!(refs.as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn cart_skips_references_to_deleted_listings() {
    // ---
    let server = TestServer::new().await;
    let seller = server.signup_and_login("seller").await;
    let buyer = server.signup_and_login("buyer").await;
    let listing = server.create_listing(&seller).await;
    let listing_id = listing["id"].as_str().unwrap();

    server
        .client
        .post(server.url("/users/cart"))
        .bearer_auth(&buyer)
        .json(&json!({ "bikeId": listing_id }))
        .send()
        .await
        .unwrap();

    // Seller deletes the bike; the buyer's dangling reference is skipped.
    let deleted = server
        .client
        .delete(server.url(&format!("/bikes/{listing_id}")))
        .bearer_auth(&seller)
        .send()
        .await
        .unwrap();
    assert_eq!(deleted.status(), 200);

    let cart = server
        .client
        .get(server.url("/users/cart"))
        .bearer_auth(&buyer)
        .send()
        .await
        .unwrap();
    let body: serde_json::Value = cart.json().await.unwrap();
    assert_eq!(body.as_array().unwrap().len(), 0);
}
