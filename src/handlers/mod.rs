// Gateway module - controls public API for handlers
// Modules are private, only exported symbols are public

mod admin;
mod bookings;
mod cart;
mod forms;
mod health;
mod listings;
mod metrics;
mod pdf;
mod root;
mod shared_types;
mod users;

// Core handlers
pub use health::health_check;
pub use metrics::metrics_handler;
pub use root::root_handler;

// Account and cart handlers
pub use cart::{add_to_cart, get_cart, remove_from_cart};
pub use users::{delete_account, get_profile, login, signup, update_profile};

// Listing lifecycle handlers
pub use listings::{
    create_listing, delete_listing, get_listing, list_listings, mark_available, mark_sold,
    update_listing,
};

// Booking and export handlers
pub use bookings::{book_listing, remove_booking};
pub use pdf::listing_pdf;

// Admin reporting handlers
pub use admin::{list_all_listings, list_users, sales_report, stats};

// Shared wire types
pub use shared_types::{ErrorResponse, MessageResponse};
