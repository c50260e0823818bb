// src/error.rs

//! API error taxonomy.
//!
//! Every handler failure maps onto one of these variants. Validation and
//! authorization variants carry messages meant for the caller; `Upstream`
//! wraps unanticipated store/file failures, which are logged server-side
//! and surfaced with the underlying message attached.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::handlers::ErrorResponse;

/// Handler-level result alias.
pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Error)]
pub enum ApiError {
    /// Missing or malformed required field. The message names the field.
    #[error("{0}")]
    Validation(String),

    /// Missing, invalid, or expired bearer token; failed login.
    #[error("{0}")]
    Unauthenticated(String),

    /// Role or ownership check failed.
    #[error("{0}")]
    Forbidden(String),

    /// Referenced id absent.
    #[error("{0}")]
    NotFound(String),

    /// Duplicate username, duplicate booking, booking a sold listing.
    #[error("{0}")]
    Conflict(String),

    /// Store, filesystem, or rendering operation failed for an
    /// unanticipated reason.
    #[error(transparent)]
    Upstream(#[from] anyhow::Error),
}

impl ApiError {
    /// Shorthand for a 403 with the standard message.
    pub fn forbidden() -> Self {
        // ---
        ApiError::Forbidden("forbidden".to_string())
    }

    fn status(&self) -> StatusCode {
        // ---
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthenticated(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Upstream(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        // ---
        let message = match &self {
            ApiError::Upstream(err) => {
                tracing::error!("Upstream failure: {err:?}");
                format!("internal error: {err}")
            }
            other => other.to_string(),
        };

        (self.status(), Json(ErrorResponse { error: message })).into_response()
    }
}
