use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Account role. Admins see the reporting endpoints and may manage any
/// listing; everyone else is a customer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    Customer,
    Admin,
}

/// A marketplace account as stored in the document store.
///
/// The `cart` holds listing ids with set semantics: membership matters,
/// order and duplicates do not.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    // ---
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub username: String,
    pub password_hash: String,
    pub phone: String,
    pub location: String,
    pub address: String,
    pub profile_image: Option<String>,
    pub role: Role,
    pub cart: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
}

impl User {
    // ---
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        first_name: String,
        last_name: String,
        username: String,
        password_hash: String,
        phone: String,
        location: String,
        address: String,
    ) -> Self {
        // ---
        Self {
            id: Uuid::new_v4(),
            first_name,
            last_name,
            username,
            password_hash,
            phone,
            location,
            address,
            profile_image: None,
            role: Role::default(),
            cart: Vec::new(),
            created_at: Utc::now(),
        }
    }

    /// Add a listing to the cart. Idempotent: a listing already present is
    /// left alone. Returns whether the cart changed.
    pub fn add_to_cart(&mut self, listing_id: Uuid) -> bool {
        // ---
        if self.cart.contains(&listing_id) {
            return false;
        }
        self.cart.push(listing_id);
        true
    }

    /// Remove a listing from the cart. Removing an absent listing is a
    /// no-op, not an error.
    pub fn remove_from_cart(&mut self, listing_id: Uuid) {
        // ---
        self.cart.retain(|id| *id != listing_id);
    }
}

/// API projection of a [`User`]: everything except the password hash.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserView {
    // ---
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub username: String,
    pub phone: String,
    pub location: String,
    pub address: String,
    pub profile_image: Option<String>,
    pub role: Role,
    pub cart: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserView {
    fn from(user: User) -> Self {
        // ---
        UserView {
            id: user.id,
            first_name: user.first_name,
            last_name: user.last_name,
            username: user.username,
            phone: user.phone,
            location: user.location,
            address: user.address,
            profile_image: user.profile_image,
            role: user.role,
            cart: user.cart,
            created_at: user.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    // ---
    use super::*;

    fn sample_user() -> User {
        // ---
        User::new(
            "Asha".to_string(),
            "Rao".to_string(),
            "asha".to_string(),
            "$2b$10$hash".to_string(),
            "555-0100".to_string(),
            "Pune".to_string(),
            "12 MG Road".to_string(),
        )
    }

    #[test]
    fn new_users_are_customers_with_empty_carts() {
        // ---
        let user = sample_user();
        assert_eq!(user.role, Role::Customer);
        assert!(user.cart.is_empty());
        assert!(user.profile_image.is_none());
    }

    #[test]
    fn cart_add_is_idempotent() {
        // ---
        let mut user = sample_user();
        let listing = Uuid::new_v4();

        assert!(user.add_to_cart(listing));
        assert!(!user.add_to_cart(listing));
        assert_eq!(user.cart.len(), 1);
    }

    #[test]
    fn cart_remove_of_absent_listing_is_a_noop() {
        // ---
        let mut user = sample_user();
        let kept = Uuid::new_v4();
        user.add_to_cart(kept);

        user.remove_from_cart(Uuid::new_v4());
        assert_eq!(user.cart, vec![kept]);

        user.remove_from_cart(kept);
        assert!(user.cart.is_empty());
    }

    #[test]
    fn view_serialization_has_no_password_hash() {
        // ---
        let view = UserView::from(sample_user());
        let json = serde_json::to_value(&view).unwrap();
        assert!(json.get("passwordHash").is_none());
        assert!(json.get("password").is_none());
        assert_eq!(json["username"], "asha");
        assert_eq!(json["role"], "customer");
    }
}
