mod database;
mod files;
pub mod metrics;
mod pdf;

// Re-export the factory functions and file-store handle for easy access
pub use database::{create_memory_repository, create_redis_repository};
pub use files::FileStore;
pub use metrics::{create_noop_metrics, create_prom_metrics};
pub use pdf::render_listing_summary;
