//! Redis-backed document store.
//!
//! Each user and listing is one JSON document under a typed key
//! (`user:{id}`, `bike:{id}`), with id sets (`users`, `bikes`) for
//! enumeration and a `user:username:{name}` index for login lookups.
//! Saves replace the whole document; Redis's per-key atomicity is the only
//! write guarantee, and query filters are evaluated in-process so the
//! store never sees more than GET/SET/DEL/SADD/SMEMBERS.

use anyhow::{Context, Result};
use redis::aio::MultiplexedConnection;
use redis::{AsyncCommands, Client};
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::{Listing, ListingQuery, Repository, RepositoryPtr, Role, User};

const USERS_SET: &str = "users";
const LISTINGS_SET: &str = "bikes";

pub fn create_redis_repository(url: &str) -> Result<RepositoryPtr> {
    // ---
    let client = Client::open(url).context("invalid Redis connection string")?;
    Ok(Arc::new(RedisRepository::new(client)))
}

pub struct RedisRepository {
    // ---
    client: Client,
}

impl RedisRepository {
    // ---
    pub fn new(client: Client) -> Self {
        // ---
        Self { client }
    }

    /// Creates a new multiplexed connection; one per operation, the same
    /// way handlers opened connections before the repository existed.
    async fn conn(&self) -> Result<MultiplexedConnection> {
        // ---
        self.client
            .get_multiplexed_async_connection()
            .await
            .context("failed to connect to Redis")
    }

    fn user_key(user_id: Uuid) -> String {
        // ---
        format!("user:{user_id}")
    }

    fn username_key(username: &str) -> String {
        // ---
        format!("user:username:{username}")
    }

    fn listing_key(listing_id: Uuid) -> String {
        // ---
        format!("bike:{listing_id}")
    }

    async fn load_user(conn: &mut MultiplexedConnection, user_id: Uuid) -> Result<Option<User>> {
        // ---
        let json: Option<String> = conn.get(Self::user_key(user_id)).await?;
        json.map(|j| serde_json::from_str(&j).context("corrupt user document"))
            .transpose()
    }

    async fn load_listing(
        conn: &mut MultiplexedConnection,
        listing_id: Uuid,
    ) -> Result<Option<Listing>> {
        // ---
        let json: Option<String> = conn.get(Self::listing_key(listing_id)).await?;
        json.map(|j| serde_json::from_str(&j).context("corrupt listing document"))
            .transpose()
    }

    async fn store_user(conn: &mut MultiplexedConnection, user: &User) -> Result<()> {
        // ---
        let json = serde_json::to_string(user)?;
        let _: () = conn.set(Self::user_key(user.id), json).await?;
        let _: () = conn
            .set(Self::username_key(&user.username), user.id.to_string())
            .await?;
        Ok(())
    }
}

#[async_trait::async_trait]
impl Repository for RedisRepository {
    // ---
    async fn create_user(&self, user: User) -> Result<()> {
        // ---
        let mut conn = self.conn().await?;
        Self::store_user(&mut conn, &user).await?;
        let _: () = conn.sadd(USERS_SET, user.id.to_string()).await?;
        Ok(())
    }

    async fn get_user_by_id(&self, user_id: Uuid) -> Result<Option<User>> {
        // ---
        let mut conn = self.conn().await?;
        Self::load_user(&mut conn, user_id).await
    }

    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>> {
        // ---
        let mut conn = self.conn().await?;

        let id: Option<String> = conn.get(Self::username_key(username)).await?;
        let Some(id) = id else {
            return Ok(None);
        };

        let user_id = Uuid::parse_str(&id).context("corrupt username index")?;
        Self::load_user(&mut conn, user_id).await
    }

    async fn update_user(&self, user: User) -> Result<()> {
        // ---
        let mut conn = self.conn().await?;

        // A username change leaves a stale index entry behind; drop it.
        if let Some(previous) = Self::load_user(&mut conn, user.id).await? {
            if previous.username != user.username {
                let _: () = conn.del(Self::username_key(&previous.username)).await?;
            }
        }

        Self::store_user(&mut conn, &user).await
    }

    async fn delete_user(&self, user_id: Uuid) -> Result<()> {
        // ---
        let mut conn = self.conn().await?;

        if let Some(user) = Self::load_user(&mut conn, user_id).await? {
            let _: () = conn.del(Self::username_key(&user.username)).await?;
        }
        let _: () = conn.del(Self::user_key(user_id)).await?;
        let _: () = conn.srem(USERS_SET, user_id.to_string()).await?;
        Ok(())
    }

    async fn list_users(&self, role: Option<Role>) -> Result<Vec<User>> {
        // ---
        let mut conn = self.conn().await?;

        let ids: Vec<String> = conn.smembers(USERS_SET).await?;
        let mut users = Vec::with_capacity(ids.len());
        for id in ids {
            let user_id = Uuid::parse_str(&id).context("corrupt users set")?;
            // A member without a document means a concurrent delete; skip it.
            if let Some(user) = Self::load_user(&mut conn, user_id).await? {
                if role.map_or(true, |r| user.role == r) {
                    users.push(user);
                }
            }
        }

        users.sort_by_key(|u| u.created_at);
        Ok(users)
    }

    async fn create_listing(&self, listing: Listing) -> Result<()> {
        // ---
        let mut conn = self.conn().await?;

        let json = serde_json::to_string(&listing)?;
        let _: () = conn.set(Self::listing_key(listing.id), json).await?;
        let _: () = conn.sadd(LISTINGS_SET, listing.id.to_string()).await?;
        Ok(())
    }

    async fn get_listing(&self, listing_id: Uuid) -> Result<Option<Listing>> {
        // ---
        let mut conn = self.conn().await?;
        Self::load_listing(&mut conn, listing_id).await
    }

    async fn update_listing(&self, listing: Listing) -> Result<()> {
        // ---
        let mut conn = self.conn().await?;

        let json = serde_json::to_string(&listing)?;
        let _: () = conn.set(Self::listing_key(listing.id), json).await?;
        Ok(())
    }

    async fn delete_listing(&self, listing_id: Uuid) -> Result<bool> {
        // ---
        let mut conn = self.conn().await?;

        let deleted: u64 = conn.del(Self::listing_key(listing_id)).await?;
        let _: () = conn.srem(LISTINGS_SET, listing_id.to_string()).await?;
        Ok(deleted > 0)
    }

    async fn list_listings(&self, query: &ListingQuery) -> Result<Vec<Listing>> {
        // ---
        let mut conn = self.conn().await?;

        let ids: Vec<String> = conn.smembers(LISTINGS_SET).await?;
        let mut listings = Vec::with_capacity(ids.len());
        for id in ids {
            let listing_id = Uuid::parse_str(&id).context("corrupt bikes set")?;
            if let Some(listing) = Self::load_listing(&mut conn, listing_id).await? {
                if query.matches(&listing) {
                    listings.push(listing);
                }
            }
        }

        listings.sort_by_key(|l| l.created_at);
        Ok(listings)
    }

    async fn ping(&self) -> Result<()> {
        // ---
        let mut conn = self.conn().await?;
        let _: String = conn.ping().await?;
        Ok(())
    }
}
