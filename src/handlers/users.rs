//! Account handlers: signup, login, and self-service profile CRUD.

use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::app_state::AppState;
use crate::auth::{hash_password, verify_password, AuthUser};
use crate::domain::{Role, User, UserView};
use crate::error::{ApiError, ApiResult};
use crate::handlers::forms::UploadForm;
use crate::handlers::shared_types::MessageResponse;

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    // ---
    pub username: Option<String>,
    pub password: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub location: Option<String>,
    pub address: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    // ---
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    // ---
    pub token: String,
    pub user: SessionUser,
}

/// The slice of the account the client keeps around for UI branching.
#[derive(Debug, Serialize)]
pub struct SessionUser {
    // ---
    pub id: Uuid,
    pub username: String,
    pub role: Role,
}

fn required(value: Option<String>, label: &str) -> Result<String, ApiError> {
    // ---
    value
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| ApiError::Validation(format!("{label} is required.")))
}

// ============================================================================
// Signup / Login
// ============================================================================

/// Handler for creating an account (POST /users/signup).
///
/// Usernames are unique across all accounts; a taken username responds
/// with `409 Conflict`. The password is stored as a bcrypt hash, and
/// every new account starts as a customer - the role is not
/// client-assignable.
#[tracing::instrument(skip(state, req))]
pub async fn signup(
    State(state): State<AppState>,
    Json(req): Json<SignupRequest>,
) -> ApiResult<(StatusCode, Json<MessageResponse>)> {
    // ---
    let username = required(req.username, "username")?;
    let password = required(req.password, "password")?;

    if state
        .repository()
        .get_user_by_username(&username)
        .await?
        .is_some()
    {
        return Err(ApiError::Conflict("username already exists".to_string()));
    }

    let user = User::new(
        req.first_name.unwrap_or_default(),
        req.last_name.unwrap_or_default(),
        username.clone(),
        hash_password(&password)?,
        req.phone.unwrap_or_default(),
        req.location.unwrap_or_default(),
        req.address.unwrap_or_default(),
    );

    state.repository().create_user(user).await?;
    state.metrics().record_user_signup();

    tracing::info!("New account: {username}");

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::new("Signup successful")),
    ))
}

/// Handler for issuing a bearer token (POST /users/login).
///
/// Unknown usernames and wrong passwords get the same deliberately vague
/// `401` so the endpoint cannot be used to probe for accounts.
#[tracing::instrument(skip(state, req))]
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Json<LoginResponse>> {
    // ---
    let user = state
        .repository()
        .get_user_by_username(&req.username)
        .await?
        .ok_or_else(|| ApiError::Unauthenticated("invalid credentials".to_string()))?;

    if !verify_password(&req.password, &user.password_hash)? {
        return Err(ApiError::Unauthenticated("invalid credentials".to_string()));
    }

    let token = state.auth().issue(&user)?;

    tracing::info!("Login: {}", user.username);

    Ok(Json(LoginResponse {
        token,
        user: SessionUser {
            id: user.id,
            username: user.username,
            role: user.role,
        },
    }))
}

// ============================================================================
// Profile
// ============================================================================

/// Handler for reading the caller's own profile (GET /users/profile).
///
/// The response never carries the password hash.
#[tracing::instrument(skip(state, auth))]
pub async fn get_profile(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<UserView>> {
    // ---
    let user = state
        .repository()
        .get_user_by_id(auth.id)
        .await?
        .ok_or_else(|| ApiError::NotFound("user not found".to_string()))?;

    Ok(Json(UserView::from(user)))
}

/// Handler for updating the caller's own profile (PUT /users/profile).
///
/// Multipart form: any subset of the allow-listed scalar fields plus an
/// optional `profileImage` file. Changing the username re-checks
/// uniqueness; changing the password re-hashes it. Role and cart are not
/// reachable from this endpoint.
#[tracing::instrument(skip(state, auth, multipart))]
pub async fn update_profile(
    State(state): State<AppState>,
    auth: AuthUser,
    multipart: Multipart,
) -> ApiResult<Json<UserView>> {
    // ---
    let mut form = UploadForm::collect(state.files(), multipart, &["profileImage"]).await?;

    let mut user = state
        .repository()
        .get_user_by_id(auth.id)
        .await?
        .ok_or_else(|| ApiError::NotFound("user not found".to_string()))?;

    let mut changed = false;

    if let Some(new_username) = form.text("username") {
        if new_username != user.username {
            let taken = state
                .repository()
                .get_user_by_username(new_username)
                .await?
                .map_or(false, |other| other.id != user.id);
            if taken {
                return Err(ApiError::Conflict("username already exists".to_string()));
            }
            user.username = new_username.to_string();
            changed = true;
        }
    }

    if let Some(password) = form.text("password") {
        user.password_hash = hash_password(password)?;
        changed = true;
    }

    // Plain scalar merges; empty submissions already count as absent.
    let scalar_fields: [(&str, &mut String); 5] = [
        ("firstName", &mut user.first_name),
        ("lastName", &mut user.last_name),
        ("phone", &mut user.phone),
        ("location", &mut user.location),
        ("address", &mut user.address),
    ];
    for (key, target) in scalar_fields {
        if let Some(value) = form.text(key) {
            *target = value.to_string();
            changed = true;
        }
    }

    if let Some(images) = form.take_files("profileImage") {
        // A repeated file input keeps only the latest upload.
        if let Some(reference) = images.into_iter().next_back() {
            user.profile_image = Some(reference);
            changed = true;
        }
    }

    if !changed {
        return Err(ApiError::Validation("no valid updates provided".to_string()));
    }

    state.repository().update_user(user.clone()).await?;

    Ok(Json(UserView::from(user)))
}

/// Handler for deleting the caller's own account (DELETE /users/profile).
#[tracing::instrument(skip(state, auth))]
pub async fn delete_account(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<MessageResponse>> {
    // ---
    state.repository().delete_user(auth.id).await?;

    Ok(Json(MessageResponse::new("Account deleted")))
}
