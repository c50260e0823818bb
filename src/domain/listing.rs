//! Bike listings and their sale/booking lifecycle.
//!
//! A listing moves between `available` and `sold` in both directions
//! (relisting is supported). The transition methods here are the only
//! mutators of the `sold`/`sold_at` pair and of the booking list, which
//! keeps `sold == true ⇔ sold_at.is_some()` structural and lets booking
//! rules be checked in one place.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::User;

/// Snapshot of a buyer taken when they booked a listing.
///
/// Deliberately not live-synced with the user record: the seller sees the
/// contact details as they were at booking time.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingEntry {
    // ---
    pub user_id: Uuid,
    pub username: String,
    pub contact: String,
    pub location: String,
    pub booked_at: DateTime<Utc>,
}

impl BookingEntry {
    /// Capture a buyer's current profile.
    pub fn snapshot_of(buyer: &User) -> Self {
        // ---
        BookingEntry {
            user_id: buyer.id,
            username: buyer.username.clone(),
            contact: buyer.phone.clone(),
            location: buyer.location.clone(),
            booked_at: Utc::now(),
        }
    }
}

/// Why a booking attempt was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookingRefused {
    /// The listing is already marked sold.
    ListingSold,
    /// This buyer already has a booking entry on the listing.
    AlreadyBooked,
}

/// A bike offered for sale, as stored in the document store.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Listing {
    // ---
    pub id: Uuid,
    pub brand: String,
    pub model: String,
    pub location: String,
    pub price: i64,
    pub description: String,
    pub color: String,
    pub owners_count: u32,
    pub kilometres_run: u32,
    pub model_year: i32,
    pub images: Vec<String>,
    pub rc: Vec<String>,
    pub insurance: Vec<String>,

    /// Weak reference into the user store; set at creation, never changed.
    pub owner: Uuid,

    pub posted_on: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub sold: bool,
    pub sold_at: Option<DateTime<Utc>>,
    pub booked_buyers: Vec<BookingEntry>,
}

impl Listing {
    // ---

    /// True when `user_id`/`role` may manage this listing (update, delete,
    /// status transitions, booking removal).
    pub fn managed_by(&self, user_id: Uuid, role: super::Role) -> bool {
        // ---
        self.owner == user_id || role == super::Role::Admin
    }

    /// Transition `available → sold`. Idempotent on an already-sold
    /// listing: the original sale timestamp is kept.
    pub fn mark_sold(&mut self, at: DateTime<Utc>) {
        // ---
        if !self.sold {
            self.sold = true;
            self.sold_at = Some(at);
        }
    }

    /// Transition `sold → available`, clearing the sale timestamp.
    pub fn mark_available(&mut self) {
        // ---
        self.sold = false;
        self.sold_at = None;
    }

    /// Record a buyer's interest. Refused when the listing is sold or the
    /// buyer already booked it; booking entries survive a later sale.
    pub fn book(&mut self, buyer: &User) -> Result<(), BookingRefused> {
        // ---
        if self.sold {
            return Err(BookingRefused::ListingSold);
        }
        if self.booked_buyers.iter().any(|b| b.user_id == buyer.id) {
            return Err(BookingRefused::AlreadyBooked);
        }

        self.booked_buyers.push(BookingEntry::snapshot_of(buyer));
        Ok(())
    }

    /// Drop the booking entry for `buyer_id`, if there is one. Idempotent.
    pub fn remove_booking(&mut self, buyer_id: Uuid) {
        // ---
        self.booked_buyers.retain(|b| b.user_id != buyer_id);
    }
}

/// Equality/range filters for the public listing index.
///
/// The price range only applies when both bounds are present, matching the
/// browse form which always submits the two together.
#[derive(Debug, Clone, Default)]
pub struct ListingQuery {
    // ---
    pub location: Option<String>,
    pub model: Option<String>,
    pub owner: Option<Uuid>,
    pub min_price: Option<i64>,
    pub max_price: Option<i64>,
}

impl ListingQuery {
    // ---
    pub fn matches(&self, listing: &Listing) -> bool {
        // ---
        if let Some(location) = &self.location {
            if listing.location != *location {
                return false;
            }
        }
        if let Some(model) = &self.model {
            if listing.model != *model {
                return false;
            }
        }
        if let Some(owner) = self.owner {
            if listing.owner != owner {
                return false;
            }
        }
        if let (Some(min), Some(max)) = (self.min_price, self.max_price) {
            if listing.price < min || listing.price > max {
                return false;
            }
        }
        true
    }
}

/// Owner fields joined into a [`ListingView`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OwnerRef {
    // ---
    pub id: Uuid,
    pub username: String,
    pub location: String,
}

/// Denormalized listing for read endpoints: the stored record with the
/// owner's public fields joined in. A deleted owner joins as `None`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingView {
    // ---
    #[serde(flatten)]
    pub listing: ListingFields,
    pub owner: Option<OwnerRef>,
}

/// All [`Listing`] fields except `owner`, so the view can replace the bare
/// id with the joined [`OwnerRef`] under the same key.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingFields {
    // ---
    pub id: Uuid,
    pub brand: String,
    pub model: String,
    pub location: String,
    pub price: i64,
    pub description: String,
    pub color: String,
    pub owners_count: u32,
    pub kilometres_run: u32,
    pub model_year: i32,
    pub images: Vec<String>,
    pub rc: Vec<String>,
    pub insurance: Vec<String>,
    pub posted_on: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub sold: bool,
    pub sold_at: Option<DateTime<Utc>>,
    pub booked_buyers: Vec<BookingEntry>,
}

impl ListingView {
    /// Join a listing with its owner's public fields.
    pub fn joined(listing: Listing, owner: Option<&User>) -> Self {
        // ---
        let owner = owner.map(|user| OwnerRef {
            id: user.id,
            username: user.username.clone(),
            location: user.location.clone(),
        });

        ListingView {
            listing: ListingFields {
                id: listing.id,
                brand: listing.brand,
                model: listing.model,
                location: listing.location,
                price: listing.price,
                description: listing.description,
                color: listing.color,
                owners_count: listing.owners_count,
                kilometres_run: listing.kilometres_run,
                model_year: listing.model_year,
                images: listing.images,
                rc: listing.rc,
                insurance: listing.insurance,
                posted_on: listing.posted_on,
                created_at: listing.created_at,
                sold: listing.sold,
                sold_at: listing.sold_at,
                booked_buyers: listing.booked_buyers,
            },
            owner,
        }
    }
}
