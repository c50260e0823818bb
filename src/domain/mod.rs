mod listing;
mod metrics;
mod repository;
mod user;

// Publicly expose the Metrics abstraction
pub use metrics::{Metrics, MetricsPtr};

// Publicly expose the storage abstraction and entities
pub use listing::{BookingEntry, BookingRefused, Listing, ListingQuery, ListingView, OwnerRef};
pub use repository::{Repository, RepositoryPtr};
pub use user::{Role, User, UserView};
