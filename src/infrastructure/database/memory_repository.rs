//! In-memory repository backend.
//!
//! Backs the test suites and `MOTO_STORE_TYPE=memory` local development.
//! Documents live in process-local maps with the same whole-document
//! replace semantics as the Redis backend.

use anyhow::{anyhow, Result};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use uuid::Uuid;

use crate::domain::{Listing, ListingQuery, Repository, RepositoryPtr, Role, User};

pub fn create_memory_repository() -> RepositoryPtr {
    // ---
    Arc::new(MemoryRepository::default())
}

#[derive(Default)]
pub struct MemoryRepository {
    // ---
    users: RwLock<HashMap<Uuid, User>>,
    listings: RwLock<HashMap<Uuid, Listing>>,
}

impl MemoryRepository {
    // ---
    fn users_read(&self) -> Result<std::sync::RwLockReadGuard<'_, HashMap<Uuid, User>>> {
        // ---
        self.users.read().map_err(|_| anyhow!("user table poisoned"))
    }

    fn users_write(&self) -> Result<std::sync::RwLockWriteGuard<'_, HashMap<Uuid, User>>> {
        // ---
        self.users
            .write()
            .map_err(|_| anyhow!("user table poisoned"))
    }

    fn listings_read(&self) -> Result<std::sync::RwLockReadGuard<'_, HashMap<Uuid, Listing>>> {
        // ---
        self.listings
            .read()
            .map_err(|_| anyhow!("listing table poisoned"))
    }

    fn listings_write(&self) -> Result<std::sync::RwLockWriteGuard<'_, HashMap<Uuid, Listing>>> {
        // ---
        self.listings
            .write()
            .map_err(|_| anyhow!("listing table poisoned"))
    }
}

#[async_trait::async_trait]
impl Repository for MemoryRepository {
    // ---
    async fn create_user(&self, user: User) -> Result<()> {
        // ---
        self.users_write()?.insert(user.id, user);
        Ok(())
    }

    async fn get_user_by_id(&self, user_id: Uuid) -> Result<Option<User>> {
        // ---
        Ok(self.users_read()?.get(&user_id).cloned())
    }

    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>> {
        // ---
        Ok(self
            .users_read()?
            .values()
            .find(|u| u.username == username)
            .cloned())
    }

    async fn update_user(&self, user: User) -> Result<()> {
        // ---
        self.users_write()?.insert(user.id, user);
        Ok(())
    }

    async fn delete_user(&self, user_id: Uuid) -> Result<()> {
        // ---
        self.users_write()?.remove(&user_id);
        Ok(())
    }

    async fn list_users(&self, role: Option<Role>) -> Result<Vec<User>> {
        // ---
        let users = self.users_read()?;
        let mut matched: Vec<User> = users
            .values()
            .filter(|u| role.map_or(true, |r| u.role == r))
            .cloned()
            .collect();

        // Stable output for dashboard tables.
        matched.sort_by_key(|u| u.created_at);
        Ok(matched)
    }

    async fn create_listing(&self, listing: Listing) -> Result<()> {
        // ---
        self.listings_write()?.insert(listing.id, listing);
        Ok(())
    }

    async fn get_listing(&self, listing_id: Uuid) -> Result<Option<Listing>> {
        // ---
        Ok(self.listings_read()?.get(&listing_id).cloned())
    }

    async fn update_listing(&self, listing: Listing) -> Result<()> {
        // ---
        self.listings_write()?.insert(listing.id, listing);
        Ok(())
    }

    async fn delete_listing(&self, listing_id: Uuid) -> Result<bool> {
        // ---
        Ok(self.listings_write()?.remove(&listing_id).is_some())
    }

    async fn list_listings(&self, query: &ListingQuery) -> Result<Vec<Listing>> {
        // ---
        let listings = self.listings_read()?;
        let mut matched: Vec<Listing> = listings
            .values()
            .filter(|l| query.matches(l))
            .cloned()
            .collect();

        matched.sort_by_key(|l| l.created_at);
        Ok(matched)
    }

    async fn ping(&self) -> Result<()> {
        // ---
        Ok(())
    }
}
