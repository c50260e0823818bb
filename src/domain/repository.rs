use super::{Listing, ListingQuery, Role, User};
use anyhow::Result;
use std::sync::Arc;
use uuid::Uuid;

/// Abstraction over the marketplace document store.
///
/// Users and listings are whole documents addressed by id; saves replace
/// the entire document (last write wins, per-document atomicity is the
/// store's only guarantee). Filtering stays simple enough for any backend
/// to evaluate without query planning.
#[async_trait::async_trait]
pub trait Repository: Send + Sync {
    // ---
    /// Persist a new user.
    async fn create_user(&self, user: User) -> Result<()>;

    /// Get user by ID.
    async fn get_user_by_id(&self, user_id: Uuid) -> Result<Option<User>>;

    /// Get user by username.
    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>>;

    /// Replace a user document (profile edits, cart changes).
    async fn update_user(&self, user: User) -> Result<()>;

    /// Delete a user by ID.
    async fn delete_user(&self, user_id: Uuid) -> Result<()>;

    /// All users with the given role, or every user when `None`.
    async fn list_users(&self, role: Option<Role>) -> Result<Vec<User>>;

    /// Persist a new listing.
    async fn create_listing(&self, listing: Listing) -> Result<()>;

    /// Get listing by ID.
    async fn get_listing(&self, listing_id: Uuid) -> Result<Option<Listing>>;

    /// Replace a listing document.
    async fn update_listing(&self, listing: Listing) -> Result<()>;

    /// Delete a listing by ID. Returns whether a document was removed.
    async fn delete_listing(&self, listing_id: Uuid) -> Result<bool>;

    /// All listings matching the query filters.
    async fn list_listings(&self, query: &ListingQuery) -> Result<Vec<Listing>>;

    /// Connectivity probe for the full health check.
    async fn ping(&self) -> Result<()>;
}

/// Type alias for any backend that implements Repository.
pub type RepositoryPtr = Arc<dyn Repository>;
