//! Bearer-token authentication.
//!
//! Login issues a signed HS256 token carrying the user's id and role;
//! every protected route re-verifies it statelessly through the
//! [`AuthUser`] extractor. Tokens expire after a fixed window and are not
//! refreshable, so expiry forces a fresh login.

use axum::extract::FromRequestParts;
use axum::http::{header, request::Parts};
use chrono::Utc;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use uuid::Uuid;

use crate::app_state::AppState;
use crate::config::AuthConfig;
use crate::domain::{Role, User};
use crate::error::ApiError;

// ---

/// Signed token payload: identity, role, and validity window.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    // ---
    pub sub: Uuid,
    pub role: Role,
    pub iat: i64,
    pub exp: i64,
}

// ---

/// Key material and token lifetime, shared through [`AppState`].
///
/// Derived once at startup from the required signing secret; there is no
/// fallback secret.
#[derive(Clone)]
pub struct AuthKeys {
    // ---
    encoding: EncodingKey,
    decoding: DecodingKey,
    token_ttl: Duration,
}

impl AuthKeys {
    // ---
    pub fn new(secret: &str, token_ttl: Duration) -> Self {
        // ---
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            token_ttl,
        }
    }

    pub fn from_config(config: &AuthConfig) -> Self {
        // ---
        Self::new(&config.token_secret, config.token_ttl)
    }

    /// Issues a bearer token for a freshly authenticated user.
    pub fn issue(&self, user: &User) -> Result<String, ApiError> {
        // ---
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: user.id,
            role: user.role,
            iat: now,
            exp: now + self.token_ttl.as_secs() as i64,
        };

        jsonwebtoken::encode(&Header::default(), &claims, &self.encoding)
            .map_err(|e| ApiError::Upstream(anyhow::anyhow!("failed to sign token: {e}")))
    }

    /// Verifies signature and expiry, yielding the caller's identity.
    pub fn verify(&self, token: &str) -> Result<AuthUser, ApiError> {
        // ---
        let data = jsonwebtoken::decode::<Claims>(token, &self.decoding, &Validation::default())
            .map_err(|e| {
                tracing::debug!("Token verification failed: {e}");
                ApiError::Unauthenticated("token is not valid".to_string())
            })?;

        Ok(AuthUser {
            id: data.claims.sub,
            role: data.claims.role,
        })
    }
}

// ---

/// Identity attached to a request by a valid bearer token.
///
/// Extracting this from a request performs the whole auth gate: requests
/// without a valid token are rejected before any handler state is touched.
#[derive(Debug, Clone, Copy)]
pub struct AuthUser {
    // ---
    pub id: Uuid,
    pub role: Role,
}

impl FromRequestParts<AppState> for AuthUser {
    // ---
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        // ---
        let header_value = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .ok_or_else(|| {
                ApiError::Unauthenticated("no token, authorization denied".to_string())
            })?;

        // Tolerate a bare token the way the login form once sent it.
        let token = header_value.strip_prefix("Bearer ").unwrap_or(header_value);

        state.auth().verify(token)
    }
}

// ---

/// An [`AuthUser`] whose role is `admin`. Routes extract this to gate the
/// reporting surface.
#[derive(Debug, Clone, Copy)]
pub struct AdminUser(pub AuthUser);

impl FromRequestParts<AppState> for AdminUser {
    // ---
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        // ---
        let user = AuthUser::from_request_parts(parts, state).await?;

        if user.role != Role::Admin {
            return Err(ApiError::forbidden());
        }

        Ok(AdminUser(user))
    }
}

// ---

/// Hashes a password for storage.
pub fn hash_password(password: &str) -> Result<String, ApiError> {
    // ---
    bcrypt::hash(password, bcrypt::DEFAULT_COST)
        .map_err(|e| ApiError::Upstream(anyhow::anyhow!("failed to hash password: {e}")))
}

/// Checks a login attempt against the stored hash.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, ApiError> {
    // ---
    bcrypt::verify(password, hash)
        .map_err(|e| ApiError::Upstream(anyhow::anyhow!("failed to verify password: {e}")))
}
