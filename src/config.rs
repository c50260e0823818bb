// src/config.rs

//! Application configuration loaded from environment variables.
//!
//! This module defines all startup-time configuration for the service.
//! Configuration is validated eagerly and failures are treated as
//! deployment errors rather than recoverable runtime conditions.

use anyhow::Result;
use std::path::PathBuf;
use std::time::Duration;

// ============================================================
// Local macros (config-only, intentionally explicit)
// ============================================================

/// Reads a required environment variable.
///
/// # Behavior
/// - Fails fast if the variable is missing
/// - Produces a clear, human-readable error message
/// - Intended for startup-time configuration validation
///
/// Missing configuration is treated as a deployment error,
/// not a recoverable runtime condition.
macro_rules! required_env {
    // ---
    ($key:literal) => {
        std::env::var($key)
            .map_err(|_| anyhow::anyhow!(concat!("Missing required configuration: ", $key)))?
    };
}

/// Reads an optional environment variable and attempts to parse it.
///
/// If the variable is missing or cannot be parsed, the provided
/// default value is used. This macro is appropriate for non-critical
/// tuning parameters where fallback behavior is acceptable.
macro_rules! optional_env_parse {
    // ---
    ($key:literal, $ty:ty, $default:expr) => {
        std::env::var($key)
            .ok()
            .and_then(|v| v.parse::<$ty>().ok())
            .unwrap_or($default)
    };
}

#[cfg(test)]
/// Asserts that a configuration constructor fails due to a missing
/// required environment variable.
///
/// This macro is intended for config unit tests only and enforces
/// consistent error messages across failure cases.
macro_rules! assert_missing_config {
    // ---
    ($expr:expr, $key:literal) => {{
        let err = $expr.expect_err("expected configuration error");
        assert!(
            err.to_string()
                .contains(concat!("Missing required configuration: ", $key)),
            "unexpected error: {err}"
        );
    }};
}

// ============================================================
// Public configuration facade
// ============================================================

/// Aggregated application configuration.
///
/// This is the single source of truth for startup configuration.
/// All required configuration is validated eagerly during initialization.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub store: store::StoreConfig,
    pub auth: auth::AuthConfig,
    pub uploads: uploads::UploadConfig,
}

impl AppConfig {
    /// Loads and validates all application configuration from the environment.
    ///
    /// # Errors
    /// Returns an error if any required configuration is missing or invalid.
    /// This function is intended to be called exactly once at startup.
    pub fn from_env() -> Result<Self> {
        // ---
        Ok(Self {
            store: store::StoreConfig::from_env()?,
            auth: auth::AuthConfig::from_env()?,
            uploads: uploads::UploadConfig::from_env()?,
        })
    }
}

// ============================================================
// Document store configuration
// ============================================================

mod store {
    // ---
    use super::*;

    /// Which repository backend to run against.
    #[derive(Debug, Clone)]
    pub enum StoreConfig {
        /// Redis-backed document store. The only production backend.
        Redis { url: String },

        /// Process-local store for tests and quick local development.
        Memory,
    }

    impl StoreConfig {
        /// Builds a [`StoreConfig`] from environment variables.
        ///
        /// `MOTO_STORE_TYPE` selects the backend (`redis`, the default, or
        /// `memory`). The Redis connection string is only required when the
        /// Redis backend is selected.
        ///
        /// # Errors
        /// Returns an error if required configuration is missing or the
        /// store type is unrecognized.
        pub fn from_env() -> Result<Self> {
            // ---
            let store_type =
                std::env::var("MOTO_STORE_TYPE").unwrap_or_else(|_| "redis".to_string());

            match store_type.as_str() {
                "redis" => Ok(StoreConfig::Redis {
                    url: required_env!("MOTO_REDIS_URL"),
                }),
                "memory" => Ok(StoreConfig::Memory),
                other => anyhow::bail!("Unknown MOTO_STORE_TYPE: {other}"),
            }
        }
    }
}
pub use store::StoreConfig;

// ============================================================
// Auth configuration
// ============================================================

mod auth {
    // ---
    use super::*;

    /// Bearer-token configuration.
    ///
    /// The signing secret has no fallback on purpose: starting up with a
    /// well-known default would make every issued token forgeable.
    #[derive(Debug, Clone)]
    pub struct AuthConfig {
        /// HMAC secret used to sign and verify bearer tokens.
        pub token_secret: String,

        /// Token lifetime. Tokens are not refreshable; expiry forces
        /// re-login. Defaults to 1 day.
        pub token_ttl: Duration,
    }

    impl AuthConfig {
        /// Builds an [`AuthConfig`] from environment variables.
        ///
        /// # Errors
        /// Returns an error if the signing secret is missing. Auth
        /// configuration is considered security-critical and must be
        /// explicitly provided.
        pub fn from_env() -> Result<Self> {
            // ---
            let token_secret = required_env!("MOTO_JWT_SECRET");
            let ttl_secs = optional_env_parse!("MOTO_TOKEN_TTL_SEC", u64, 86_400);

            Ok(Self {
                token_secret,
                token_ttl: Duration::from_secs(ttl_secs),
            })
        }
    }
}
pub use auth::AuthConfig;

// ============================================================
// Upload configuration
// ============================================================

mod uploads {
    // ---
    use super::*;

    /// File-upload configuration for listing media and profile images.
    #[derive(Debug, Clone)]
    pub struct UploadConfig {
        /// Directory uploaded files are written to. Created at startup and
        /// served statically under `/uploads`. Defaults to `uploads`.
        pub dir: PathBuf,

        /// Per-file size cap in bytes. Defaults to 5 MB.
        pub max_file_bytes: usize,
    }

    impl UploadConfig {
        /// Builds an [`UploadConfig`] from environment variables.
        pub fn from_env() -> Result<Self> {
            // ---
            let dir = std::env::var("MOTO_UPLOAD_DIR").unwrap_or_else(|_| "uploads".to_string());
            let max_file_bytes =
                optional_env_parse!("MOTO_MAX_UPLOAD_BYTES", usize, 5 * 1024 * 1024);

            Ok(Self {
                dir: PathBuf::from(dir),
                max_file_bytes,
            })
        }
    }
}
pub use uploads::UploadConfig;

// ============================================================
// Tests
// ============================================================
