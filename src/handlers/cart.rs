//! Cart handlers.
//!
//! The cart is a working set of listing references on the user document.
//! Every operation keys off the authenticated identity, so a caller can
//! only ever touch their own cart. Add and remove are both idempotent.

use axum::{extract::State, Json};
use serde::Deserialize;
use uuid::Uuid;

use crate::app_state::AppState;
use crate::auth::AuthUser;
use crate::domain::Listing;
use crate::error::{ApiError, ApiResult};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartRequest {
    // ---
    pub bike_id: Uuid,
}

async fn load_caller(state: &AppState, auth: AuthUser) -> ApiResult<crate::domain::User> {
    // ---
    state
        .repository()
        .get_user_by_id(auth.id)
        .await?
        .ok_or_else(|| ApiError::NotFound("user not found".to_string()))
}

/// Handler for adding a listing to the cart (POST /users/cart).
///
/// Idempotent: a listing already present stays a single entry. No
/// availability check happens here - a sold listing may sit in a cart.
/// Returns the updated list of references.
#[tracing::instrument(skip(state, auth, req))]
pub async fn add_to_cart(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<CartRequest>,
) -> ApiResult<Json<Vec<Uuid>>> {
    // ---
    let mut user = load_caller(&state, auth).await?;

    if user.add_to_cart(req.bike_id) {
        state.repository().update_user(user.clone()).await?;
    }

    Ok(Json(user.cart))
}

/// Handler for reading the cart (GET /users/cart).
///
/// Resolves each reference to the full listing; references whose listing
/// has since been deleted are silently skipped.
#[tracing::instrument(skip(state, auth))]
pub async fn get_cart(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<Vec<Listing>>> {
    // ---
    let user = load_caller(&state, auth).await?;

    let mut listings = Vec::with_capacity(user.cart.len());
    for listing_id in user.cart {
        if let Some(listing) = state.repository().get_listing(listing_id).await? {
            listings.push(listing);
        }
    }

    Ok(Json(listings))
}

/// Handler for removing a listing from the cart (DELETE /users/cart).
///
/// Removing a reference that is not present is a no-op, not an error.
/// Returns the updated list of references.
#[tracing::instrument(skip(state, auth, req))]
pub async fn remove_from_cart(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<CartRequest>,
) -> ApiResult<Json<Vec<Uuid>>> {
    // ---
    let mut user = load_caller(&state, auth).await?;

    user.remove_from_cart(req.bike_id);
    state.repository().update_user(user.clone()).await?;

    Ok(Json(user.cart))
}
