//! Application state management.
//!
//! This module defines the shared state structure that gets passed to all
//! Axum handlers via the `State` extractor. The `AppState` contains shared
//! resources like the document-store repository, metrics implementation,
//! token key material, and the upload file store.
//!
//! The state is designed to be cheaply cloneable (using `Arc` internally
//! where needed) so it can be passed efficiently to each request handler
//! without expensive copying of resources.

use std::sync::Arc;

use crate::auth::AuthKeys;
use crate::domain::{MetricsPtr, RepositoryPtr};
use crate::infrastructure::FileStore;

/// Shared application state passed to all Axum handlers.
///
/// This struct serves as the Dependency Injection container for the
/// application. Handlers depend on the `Repository` and `Metrics`
/// abstractions, not concrete backends, so tests can assemble a state over
/// the in-memory store while production runs against Redis.
///
/// # Lifecycle
///
/// 1. Created once during application startup (or per test server)
/// 2. Attached to the Axum router via `.with_state(app_state)`
/// 3. Cloned automatically by Axum for each incoming HTTP request
/// 4. Handlers extract via `State(state): State<AppState>`
#[derive(Clone)]
pub struct AppState {
    /// Repository abstraction for the document store (users, listings).
    repository: RepositoryPtr,

    /// Metrics implementation for recording application events.
    ///
    /// Either Prometheus-backed (production) or no-op (testing/development).
    metrics: MetricsPtr,

    /// Token signing/verification keys plus token lifetime.
    ///
    /// Wrapped in `Arc`: the decoding key is consulted on every
    /// authenticated request.
    auth: Arc<AuthKeys>,

    /// Upload directory manager for listing media and profile images.
    files: FileStore,
}

impl AppState {
    // ---

    pub fn new(
        repository: RepositoryPtr,
        metrics: MetricsPtr,
        auth: AuthKeys,
        files: FileStore,
    ) -> Self {
        // ---
        AppState {
            repository,
            metrics,
            auth: Arc::new(auth),
            files,
        }
    }

    /// Get a reference to the repository implementation.
    pub fn repository(&self) -> &RepositoryPtr {
        // ---
        &self.repository
    }

    /// Get a reference to the metrics implementation.
    pub fn metrics(&self) -> &MetricsPtr {
        // ---
        &self.metrics
    }

    /// Get a reference to the token key material.
    pub fn auth(&self) -> &AuthKeys {
        // ---
        &self.auth
    }

    /// Get a reference to the upload file store.
    pub fn files(&self) -> &FileStore {
        // ---
        &self.files
    }
}
