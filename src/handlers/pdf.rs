//! Listing PDF export.

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
};
use uuid::Uuid;

use crate::app_state::AppState;
use crate::auth::AuthUser;
use crate::error::{ApiError, ApiResult};
use crate::infrastructure::render_listing_summary;

/// Handler for downloading a listing summary (GET /bikes/{id}/pdf).
///
/// Authenticated. Streams a one-page PDF report of the listing with the
/// owner's contact details joined in, as an attachment named after the
/// listing id.
#[tracing::instrument(skip(state, _auth, listing_id))]
pub async fn listing_pdf(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(listing_id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    // ---
    let listing = state
        .repository()
        .get_listing(listing_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("bike not found".to_string()))?;

    let owner = state.repository().get_user_by_id(listing.owner).await?;

    let bytes = render_listing_summary(&listing, owner.as_ref())?;

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"bike_{}.pdf\"", listing.id),
            ),
        ],
        bytes,
    ))
}
