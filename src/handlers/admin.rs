//! Admin dashboard handlers: read-only aggregation over the stores.
//!
//! Every route here extracts [`AdminUser`], so non-admin callers are
//! rejected with `403` before any store access.

use axum::{extract::State, Json};
use chrono::Datelike;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::app_state::AppState;
use crate::auth::AdminUser;
use crate::domain::{ListingQuery, ListingView, Role, UserView};
use crate::error::ApiResult;
use crate::handlers::listings::join_owners;

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsResponse {
    // ---
    pub total_sales: usize,
    pub total_users: usize,
}

/// One month's worth of completed sales.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct SalesBucket {
    // ---
    pub year: i32,
    pub month: u32,
    pub sales: usize,
}

/// Handler for the dashboard headline numbers (GET /admin/stats).
///
/// Sold-listing count and customer-account count.
#[tracing::instrument(skip(state, _admin))]
pub async fn stats(
    State(state): State<AppState>,
    _admin: AdminUser,
) -> ApiResult<Json<StatsResponse>> {
    // ---
    let listings = state
        .repository()
        .list_listings(&ListingQuery::default())
        .await?;
    let customers = state.repository().list_users(Some(Role::Customer)).await?;

    Ok(Json(StatsResponse {
        total_sales: listings.iter().filter(|l| l.sold).count(),
        total_users: customers.len(),
    }))
}

/// Handler for the dashboard user table (GET /admin/users).
///
/// Customer accounts only, without password hashes.
#[tracing::instrument(skip(state, _admin))]
pub async fn list_users(
    State(state): State<AppState>,
    _admin: AdminUser,
) -> ApiResult<Json<Vec<UserView>>> {
    // ---
    let customers = state.repository().list_users(Some(Role::Customer)).await?;

    Ok(Json(customers.into_iter().map(UserView::from).collect()))
}

/// Handler for the dashboard listing table (GET /admin/bikes).
///
/// Unfiltered dump with owner usernames joined in.
#[tracing::instrument(skip(state, _admin))]
pub async fn list_all_listings(
    State(state): State<AppState>,
    _admin: AdminUser,
) -> ApiResult<Json<Vec<ListingView>>> {
    // ---
    let listings = state
        .repository()
        .list_listings(&ListingQuery::default())
        .await?;

    Ok(Json(join_owners(&state, listings).await?))
}

/// Handler for the monthly sales rollup (GET /admin/sales-report).
///
/// Sold listings grouped by the calendar year/month of their sale
/// timestamp, in ascending chronological order. Listings never sold are
/// excluded.
#[tracing::instrument(skip(state, _admin))]
pub async fn sales_report(
    State(state): State<AppState>,
    _admin: AdminUser,
) -> ApiResult<Json<Vec<SalesBucket>>> {
    // ---
    let listings = state
        .repository()
        .list_listings(&ListingQuery::default())
        .await?;

    // BTreeMap keeps (year, month) keys chronologically sorted.
    let mut buckets: BTreeMap<(i32, u32), usize> = BTreeMap::new();
    for listing in listings {
        if let Some(sold_at) = listing.sold_at.filter(|_| listing.sold) {
            *buckets.entry((sold_at.year(), sold_at.month())).or_default() += 1;
        }
    }

    let report = buckets
        .into_iter()
        .map(|((year, month), sales)| SalesBucket { year, month, sales })
        .collect();

    Ok(Json(report))
}
