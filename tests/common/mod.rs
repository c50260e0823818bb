// Test helpers are intentionally partially used
#![allow(dead_code)]

use motomarket::domain::{RepositoryPtr, Role, User};
use motomarket::{
    create_memory_repository, create_noop_metrics, create_router, AppState, AuthKeys, FileStore,
};
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::time::sleep;

/// Password every test account uses.
pub const TEST_PASSWORD: &str = "secret-pass";

// ============================================================================
// Test Setup
// ============================================================================

/// A real server on an ephemeral port over the in-memory store.
///
/// Each instance is fully hermetic: its own repository, its own upload
/// directory, its own signing secret. The repository handle is exposed so
/// tests can seed state (admin accounts, historical sale dates) that no
/// public endpoint creates.
pub struct TestServer {
    pub addr: std::net::SocketAddr,
    pub client: Client,
    pub repository: RepositoryPtr,
    _uploads: tempfile::TempDir,
}

impl TestServer {
    // ---
    pub async fn new() -> Self {
        // ---
        let repository = create_memory_repository();
        let metrics = create_noop_metrics().expect("noop metrics");
        let uploads = tempfile::tempdir().expect("upload dir");
        let files = FileStore::new(uploads.path(), 5 * 1024 * 1024);
        files.init().await.expect("upload dir init");
        let auth = AuthKeys::new("integration-test-secret", Duration::from_secs(3600));

        let app = create_router(AppState::new(repository.clone(), metrics, auth, files));
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        // Spawn the server in the background
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        // Give the server a moment to start
        sleep(Duration::from_millis(100)).await;

        let client = Client::new();

        Self {
            addr,
            client,
            repository,
            _uploads: uploads,
        }
    }

    pub fn url(&self, path: &str) -> String {
        // ---
        format!("http://{}{}", self.addr, path)
    }

    // ------------------------------------------------------------------------
    // Account helpers
    // ------------------------------------------------------------------------

    /// Sign up a customer account through the API.
    pub async fn signup(&self, username: &str) {
        // ---
        let response = self
            .client
            .post(self.url("/users/signup"))
            .json(&serde_json::json!({
                "username": username,
                "password": TEST_PASSWORD,
                "firstName": "Test",
                "lastName": "User",
                "phone": "555-0100",
                "location": "Pune",
                "address": "12 MG Road",
            }))
            .send()
            .await
            .expect("signup request");

        assert_eq!(response.status(), 201, "signup should succeed");
    }

    /// Log in and return the bearer token.
    pub async fn login(&self, username: &str) -> String {
        // ---
        let response = self
            .client
            .post(self.url("/users/login"))
            .json(&serde_json::json!({
                "username": username,
                "password": TEST_PASSWORD,
            }))
            .send()
            .await
            .expect("login request");

        assert_eq!(response.status(), 200, "login should succeed");
        let body: serde_json::Value = response.json().await.expect("login body");
        body["token"].as_str().expect("token in response").to_string()
    }

    pub async fn signup_and_login(&self, username: &str) -> String {
        // ---
        self.signup(username).await;
        self.login(username).await
    }

    /// Seed an admin account directly in the store (no public endpoint
    /// creates one) and log it in.
    pub async fn create_admin(&self, username: &str) -> String {
        // ---
        let mut admin = User::new(
            "Site".to_string(),
            "Admin".to_string(),
            username.to_string(),
            bcrypt::hash(TEST_PASSWORD, 4).expect("test hash"),
            "555-0199".to_string(),
            "HQ".to_string(),
            "1 Admin Way".to_string(),
        );
        admin.role = Role::Admin;
        self.repository
            .create_user(admin)
            .await
            .expect("seed admin");

        self.login(username).await
    }

    // ------------------------------------------------------------------------
    // Listing helpers
    // ------------------------------------------------------------------------

    /// Create a listing through the API and return its JSON document.
    pub async fn create_listing(&self, token: &str) -> serde_json::Value {
        // ---
        let response = self
            .client
            .post(self.url("/bikes"))
            .bearer_auth(token)
            .multipart(listing_form(&[]))
            .send()
            .await
            .expect("create listing request");

        assert_eq!(response.status(), 201, "listing creation should succeed");
        response.json().await.expect("listing body")
    }
}

/// The standard listing form (one image attached), with field overrides.
///
/// Overriding a field to `""` makes the server treat it as absent.
pub fn listing_form(overrides: &[(&str, &str)]) -> Form {
    // ---
    let mut fields = vec![
        ("brand".to_string(), "Honda".to_string()),
        ("model".to_string(), "CB350".to_string()),
        ("location".to_string(), "Pune".to_string()),
        ("price".to_string(), "50000".to_string()),
        ("description".to_string(), "Single owner, serviced on schedule".to_string()),
        ("color".to_string(), "red".to_string()),
        ("ownersCount".to_string(), "1".to_string()),
        ("kilometresRun".to_string(), "1000".to_string()),
        ("modelYear".to_string(), "2020".to_string()),
    ];

    for (key, value) in overrides {
        match fields.iter_mut().find(|(k, _)| k == key) {
            Some(field) => field.1 = value.to_string(),
            None => fields.push((key.to_string(), value.to_string())),
        }
    }

    let mut form = Form::new();
    for (key, value) in fields {
        form = form.text(key, value);
    }

    form.part("images", image_part("bike.jpg"))
}

/// A fake image upload part. The server only checks the content type and
/// size, so a handful of bytes is enough.
pub fn image_part(file_name: &'static str) -> Part {
    // ---
    Part::bytes(b"fake-jpeg-bytes".to_vec())
        .file_name(file_name)
        .mime_str("image/jpeg")
        .expect("image mime")
}
