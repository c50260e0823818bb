//! Listing lifecycle handlers.
//!
//! Create/update/delete enforce the owner-or-admin rule; the
//! sold/available transitions are gated the same way. Reads are public
//! and return denormalized views with the owner's public fields joined
//! in.

use axum::{
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use serde::Deserialize;
use std::collections::HashMap;
use uuid::Uuid;

use crate::app_state::AppState;
use crate::auth::AuthUser;
use crate::domain::{Listing, ListingQuery, ListingView, User};
use crate::error::{ApiError, ApiResult};
use crate::handlers::forms::UploadForm;
use crate::handlers::shared_types::MessageResponse;

// ============================================================================
// Shared helpers
// ============================================================================

async fn load_listing(state: &AppState, listing_id: Uuid) -> ApiResult<Listing> {
    // ---
    state
        .repository()
        .get_listing(listing_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("bike not found".to_string()))
}

/// Fetch a listing and check the caller may manage it.
pub(super) async fn load_managed_listing(
    state: &AppState,
    listing_id: Uuid,
    auth: AuthUser,
) -> ApiResult<Listing> {
    // ---
    let listing = load_listing(state, listing_id).await?;

    if !listing.managed_by(auth.id, auth.role) {
        return Err(ApiError::forbidden());
    }

    Ok(listing)
}

/// Join owner fields into a batch of listings, fetching each distinct
/// owner once.
pub(super) async fn join_owners(
    state: &AppState,
    listings: Vec<Listing>,
) -> ApiResult<Vec<ListingView>> {
    // ---
    let mut owners: HashMap<Uuid, Option<User>> = HashMap::new();

    let mut views = Vec::with_capacity(listings.len());
    for listing in listings {
        let owner_id = listing.owner;
        if !owners.contains_key(&owner_id) {
            let owner = state.repository().get_user_by_id(owner_id).await?;
            owners.insert(owner_id, owner);
        }
        let owner = owners.get(&owner_id).and_then(Option::as_ref);
        views.push(ListingView::joined(listing, owner));
    }

    Ok(views)
}

// ============================================================================
// Create
// ============================================================================

/// Handler for creating a listing (POST /bikes).
///
/// Multipart form: descriptive attributes as text fields plus optional
/// `images`, `rc`, and `insurance` file sequences. The four numeric
/// fields are each independently validated and the error names the field;
/// uploaded files must be images under the size cap.
///
/// Responds `201 Created` with the persisted record (`sold` starts
/// false).
#[tracing::instrument(skip(state, auth, multipart))]
pub async fn create_listing(
    State(state): State<AppState>,
    auth: AuthUser,
    multipart: Multipart,
) -> ApiResult<(StatusCode, Json<Listing>)> {
    // ---
    let mut form = UploadForm::collect(state.files(), multipart, &["images", "rc", "insurance"])
        .await?;

    // Numeric fields first, each checked independently.
    let owners_count = form.require_number::<u32>("ownersCount", "Number of owners")?;
    let kilometres_run = form.require_number::<u32>("kilometresRun", "Kilometres run")?;
    let model_year = form.require_number::<i32>("modelYear", "Model year")?;
    let price = form.require_number::<i64>("price", "Price")?;

    let brand = form.require_text("brand", "Brand")?;
    let model = form.require_text("model", "Model")?;
    let location = form.require_text("location", "Location")?;
    let description = form.require_text("description", "Description")?;
    let color = form.require_text("color", "Color")?;

    let posted_on = form
        .optional_datetime("postedOn", "Posted on")?
        .unwrap_or_else(Utc::now);

    let listing = Listing {
        id: Uuid::new_v4(),
        brand,
        model,
        location,
        price,
        description,
        color,
        owners_count,
        kilometres_run,
        model_year,
        images: form.take_files("images").unwrap_or_default(),
        rc: form.take_files("rc").unwrap_or_default(),
        insurance: form.take_files("insurance").unwrap_or_default(),
        owner: auth.id,
        posted_on,
        created_at: Utc::now(),
        sold: false,
        sold_at: None,
        booked_buyers: Vec::new(),
    };

    state.repository().create_listing(listing.clone()).await?;
    state.metrics().record_listing_created();

    tracing::info!("Listing created: {} {} ({})", listing.brand, listing.model, listing.id);

    Ok((StatusCode::CREATED, Json(listing)))
}

// ============================================================================
// Read
// ============================================================================

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrowseParams {
    // ---
    pub location: Option<String>,
    pub model: Option<String>,
    pub owner: Option<Uuid>,
    pub min_price: Option<i64>,
    pub max_price: Option<i64>,
}

impl From<BrowseParams> for ListingQuery {
    fn from(params: BrowseParams) -> Self {
        // ---
        ListingQuery {
            location: params.location,
            model: params.model,
            owner: params.owner,
            min_price: params.min_price,
            max_price: params.max_price,
        }
    }
}

/// Handler for browsing listings (GET /bikes).
///
/// Unauthenticated. Supports equality filters on location, model, and
/// owner plus a minPrice/maxPrice range (applied when both bounds are
/// given). Owner username and location are joined into each result.
#[tracing::instrument(skip(state, params))]
pub async fn list_listings(
    State(state): State<AppState>,
    Query(params): Query<BrowseParams>,
) -> ApiResult<Json<Vec<ListingView>>> {
    // ---
    let listings = state
        .repository()
        .list_listings(&ListingQuery::from(params))
        .await?;

    Ok(Json(join_owners(&state, listings).await?))
}

/// Handler for reading one listing (GET /bikes/{id}).
///
/// Unauthenticated; `404` when the id is unknown.
#[tracing::instrument(skip(state, listing_id))]
pub async fn get_listing(
    State(state): State<AppState>,
    Path(listing_id): Path<Uuid>,
) -> ApiResult<Json<ListingView>> {
    // ---
    let listing = load_listing(&state, listing_id).await?;
    let owner = state.repository().get_user_by_id(listing.owner).await?;

    Ok(Json(ListingView::joined(listing, owner.as_ref())))
}

// ============================================================================
// Update / Delete
// ============================================================================

/// Handler for updating a listing (PUT /bikes/{id}).
///
/// Owner or admin only. Scalar fields merge through an explicit
/// allow-list with per-field validation; a file category supplied in the
/// form replaces that category's entire stored sequence, while categories
/// without new files are left untouched. The owner reference is
/// immutable.
#[tracing::instrument(skip(state, auth, multipart))]
pub async fn update_listing(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(listing_id): Path<Uuid>,
    multipart: Multipart,
) -> ApiResult<Json<Listing>> {
    // ---
    let mut form = UploadForm::collect(state.files(), multipart, &["images", "rc", "insurance"])
        .await?;

    let mut listing = load_managed_listing(&state, listing_id, auth).await?;

    let scalar_fields: [(&str, &mut String); 5] = [
        ("brand", &mut listing.brand),
        ("model", &mut listing.model),
        ("location", &mut listing.location),
        ("description", &mut listing.description),
        ("color", &mut listing.color),
    ];
    for (key, target) in scalar_fields {
        if let Some(value) = form.text(key) {
            *target = value.to_string();
        }
    }

    if let Some(price) = form.optional_number("price", "Price")? {
        listing.price = price;
    }
    if let Some(owners_count) = form.optional_number("ownersCount", "Number of owners")? {
        listing.owners_count = owners_count;
    }
    if let Some(kilometres_run) = form.optional_number("kilometresRun", "Kilometres run")? {
        listing.kilometres_run = kilometres_run;
    }
    if let Some(model_year) = form.optional_number("modelYear", "Model year")? {
        listing.model_year = model_year;
    }
    if let Some(posted_on) = form.optional_datetime("postedOn", "Posted on")? {
        listing.posted_on = posted_on;
    }

    // Whole-category replacement, never a merge.
    if let Some(images) = form.take_files("images") {
        listing.images = images;
    }
    if let Some(rc) = form.take_files("rc") {
        listing.rc = rc;
    }
    if let Some(insurance) = form.take_files("insurance") {
        listing.insurance = insurance;
    }

    state.repository().update_listing(listing.clone()).await?;

    Ok(Json(listing))
}

/// Handler for deleting a listing (DELETE /bikes/{id}).
///
/// Owner or admin only.
#[tracing::instrument(skip(state, auth, listing_id))]
pub async fn delete_listing(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(listing_id): Path<Uuid>,
) -> ApiResult<Json<MessageResponse>> {
    // ---
    let listing = load_managed_listing(&state, listing_id, auth).await?;

    state.repository().delete_listing(listing.id).await?;

    tracing::info!("Listing deleted: {}", listing.id);

    Ok(Json(MessageResponse::new("Bike deleted")))
}

// ============================================================================
// Status transitions
// ============================================================================

/// Handler for marking a listing sold (PATCH /bikes/{id}/sold).
///
/// Owner or admin only. Sets `sold` and stamps `soldAt`; marking an
/// already-sold listing keeps the original sale time. Existing booking
/// entries stay on the record.
#[tracing::instrument(skip(state, auth, listing_id))]
pub async fn mark_sold(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(listing_id): Path<Uuid>,
) -> ApiResult<Json<Listing>> {
    // ---
    let mut listing = load_managed_listing(&state, listing_id, auth).await?;

    let was_sold = listing.sold;
    listing.mark_sold(Utc::now());
    state.repository().update_listing(listing.clone()).await?;

    if !was_sold {
        state.metrics().record_listing_sold();
    }

    Ok(Json(listing))
}

/// Handler for relisting a sold bike (PATCH /bikes/{id}/available).
///
/// Owner or admin only. Clears `sold` and `soldAt`.
#[tracing::instrument(skip(state, auth, listing_id))]
pub async fn mark_available(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(listing_id): Path<Uuid>,
) -> ApiResult<Json<Listing>> {
    // ---
    let mut listing = load_managed_listing(&state, listing_id, auth).await?;

    listing.mark_available();
    state.repository().update_listing(listing.clone()).await?;

    Ok(Json(listing))
}
