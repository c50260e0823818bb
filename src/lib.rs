// src/lib.rs
use anyhow::Result;
use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get, patch, post},
    Router,
};
use std::env;
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};

use handlers::health_check;
use handlers::metrics_handler;
use handlers::root_handler;

// Public exports (visible outside this module)
pub mod domain;

// Internal-only exports (sibling access within this module)
mod app_state;
mod auth;
mod config;
mod error;
mod handlers;
mod infrastructure;

// Hoist up only the public symbol(s)
pub use app_state::AppState;
pub use auth::{AdminUser, AuthKeys, AuthUser};
pub use error::{ApiError, ApiResult};

pub use config::*;

// Publicly expose the infrastructure creation functions
pub use infrastructure::{
    create_memory_repository, // ---
    create_noop_metrics,
    create_prom_metrics,
    create_redis_repository,
    FileStore,
};

/// Build application state from the environment: config, store backend,
/// metrics backend, token keys, upload directory.
pub async fn create_app_state() -> Result<AppState> {
    // ---
    // Load all configuration from environment
    let config = AppConfig::from_env()?;

    // Determine metrics implementation from environment
    let metrics_type = env::var("MOTO_METRICS_TYPE").unwrap_or_else(|_| "noop".to_string());
    let metrics = if metrics_type == "prom" {
        create_prom_metrics()?
    } else {
        create_noop_metrics()?
    };

    // Create infrastructure dependencies
    let repository = match &config.store {
        StoreConfig::Redis { url } => create_redis_repository(url)?,
        StoreConfig::Memory => create_memory_repository(),
    };

    let files = FileStore::from_config(&config.uploads);
    files.init().await?;

    let auth = AuthKeys::from_config(&config.auth);

    Ok(AppState::new(repository, metrics, auth, files))
}

/// Build the HTTP router from the environment.
pub async fn create_app() -> Result<Router> {
    // ---
    tracing_subscriber::fmt::try_init().ok(); // ✅ Ignores if already initialized

    let app_state = create_app_state().await?;
    Ok(create_router(app_state))
}

/// Build the HTTP router over an already-assembled [`AppState`].
///
/// Tests use this directly with the in-memory store; production goes
/// through [`create_app`].
pub fn create_router(app_state: AppState) -> Router {
    // ---
    let uploads_dir = app_state.files().root().to_path_buf();

    // Room for a full set of listing uploads (5 images + 3 RC + 3
    // insurance) plus the text fields in a single multipart body.
    let body_limit = app_state.files().max_file_bytes() * 12;

    Router::new()
        .route("/", get(root_handler))
        .route("/health", get(health_check))
        .route("/metrics", get(metrics_handler))
        .nest(
            "/users",
            Router::new()
                .route("/signup", post(handlers::signup))
                .route("/login", post(handlers::login))
                .route(
                    "/profile",
                    get(handlers::get_profile)
                        .put(handlers::update_profile)
                        .delete(handlers::delete_account),
                )
                .route(
                    "/cart",
                    post(handlers::add_to_cart)
                        .get(handlers::get_cart)
                        .delete(handlers::remove_from_cart),
                ),
        )
        .nest(
            "/bikes",
            Router::new()
                .route("/", post(handlers::create_listing).get(handlers::list_listings))
                .route(
                    "/{id}",
                    get(handlers::get_listing)
                        .put(handlers::update_listing)
                        .delete(handlers::delete_listing),
                )
                .route("/{id}/sold", patch(handlers::mark_sold))
                .route("/{id}/available", patch(handlers::mark_available))
                .route("/{id}/book", post(handlers::book_listing))
                .route("/{id}/book/{buyer_id}", delete(handlers::remove_booking))
                .route("/{id}/pdf", get(handlers::listing_pdf)),
        )
        .nest(
            "/admin",
            Router::new()
                .route("/stats", get(handlers::stats))
                .route("/users", get(handlers::list_users))
                .route("/bikes", get(handlers::list_all_listings))
                .route("/sales-report", get(handlers::sales_report)),
        )
        .nest_service("/uploads", ServeDir::new(uploads_dir))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}
