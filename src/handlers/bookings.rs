//! Booking handlers.
//!
//! Booking expresses a buyer's interest in a listing and snapshots their
//! contact details onto it for the seller. The transition rules live on
//! the `Listing` type; these handlers only translate refusals into the
//! HTTP taxonomy.

use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;

use crate::app_state::AppState;
use crate::auth::AuthUser;
use crate::domain::{BookingRefused, Listing};
use crate::error::{ApiError, ApiResult};
use crate::handlers::listings::load_managed_listing;

/// Handler for booking a listing (POST /bikes/{id}/book).
///
/// Any authenticated user may book an unsold listing once. A second
/// attempt by the same buyer and any attempt against a sold listing both
/// respond `409 Conflict`. The buyer's current username, phone, and
/// location are snapshotted onto the listing.
#[tracing::instrument(skip(state, auth, listing_id))]
pub async fn book_listing(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(listing_id): Path<Uuid>,
) -> ApiResult<Json<Listing>> {
    // ---
    let mut listing = state
        .repository()
        .get_listing(listing_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("bike not found".to_string()))?;

    let buyer = state
        .repository()
        .get_user_by_id(auth.id)
        .await?
        .ok_or_else(|| ApiError::NotFound("user not found".to_string()))?;

    listing.book(&buyer).map_err(|refusal| match refusal {
        BookingRefused::ListingSold => {
            ApiError::Conflict("this bike has already been sold".to_string())
        }
        BookingRefused::AlreadyBooked => {
            ApiError::Conflict("you have already booked this bike".to_string())
        }
    })?;

    state.repository().update_listing(listing.clone()).await?;
    state.metrics().record_booking_created();

    tracing::info!("Booking: {} on listing {}", buyer.username, listing.id);

    Ok(Json(listing))
}

/// Handler for removing a buyer's booking (DELETE /bikes/{id}/book/{buyer_id}).
///
/// Owner or admin only. Removing a buyer who has no booking entry is an
/// idempotent no-op.
#[tracing::instrument(skip(state, auth))]
pub async fn remove_booking(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((listing_id, buyer_id)): Path<(Uuid, Uuid)>,
) -> ApiResult<Json<Listing>> {
    // ---
    let mut listing = load_managed_listing(&state, listing_id, auth).await?;

    listing.remove_booking(buyer_id);
    state.repository().update_listing(listing.clone()).await?;

    Ok(Json(listing))
}
