//! Black-box smoke tests: operational endpoints, unknown routes,
//! malformed payloads, and concurrent request handling.

mod common;
use common::TestServer;

#[tokio::test]
async fn health_endpoint_works() {
    // ---
    let server = TestServer::new().await;

    let response = server
        .client
        .get(server.url("/health"))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: serde_json::Value = response.json().await.expect("Failed to read response body");
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn full_health_check_pings_the_store() {
    // ---
    let server = TestServer::new().await;

    let response = server
        .client
        .get(server.url("/health?mode=full"))
        .send()
        .await
        .expect("Failed to send request");

    // The in-memory store always answers its ping.
    assert_eq!(response.status(), 200);
}

#[tokio::test]
async fn root_endpoint_lists_the_api() {
    // ---
    let server = TestServer::new().await;

    let response = server
        .client
        .get(server.url("/"))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 200);

    let body = response.text().await.expect("Failed to read response body");
    assert!(body.contains("/bikes"));
    assert!(body.contains("/users/signup"));
}

#[tokio::test]
async fn metrics_endpoint_responds() {
    // ---
    let server = TestServer::new().await;

    let response = server
        .client
        .get(server.url("/metrics"))
        .send()
        .await
        .expect("Failed to send request");

    // No-op metrics render an empty exposition, but the endpoint is live.
    assert_eq!(response.status(), 200);
}

#[tokio::test]
async fn invalid_routes_return_404() {
    // ---
    let server = TestServer::new().await;

    let response = server
        .client
        .get(server.url("/nonexistent"))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 404);
}

#[tokio::test]
async fn server_handles_concurrent_requests() {
    // ---
    let server = TestServer::new().await;

    // Make multiple concurrent requests
    let futures = (0..10).map(|_| server.client.get(server.url("/health")).send());

    let responses = futures::future::join_all(futures).await;

    // All requests should succeed
    for response in responses {
        let response = response.expect("Request should succeed");
        assert_eq!(response.status(), 200);
    }
}

#[tokio::test]
async fn server_handles_malformed_json() {
    // ---
    let server = TestServer::new().await;

    // Send malformed JSON to the login endpoint
    let response = server
        .client
        .post(server.url("/users/login"))
        .header("content-type", "application/json")
        .body("{ invalid json }")
        .send()
        .await
        .expect("Failed to send request");

    // Should return 400 Bad Request
    assert_eq!(response.status(), 400);
}
