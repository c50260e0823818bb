use std::sync::Arc;
use std::time::Instant;

/// Abstraction for application metrics (counters, histograms).
pub trait Metrics: Send + Sync + 'static {
    // ---
    /// Render current metrics in Prometheus text format.
    fn render(&self) -> String;

    /// Record a completed signup.
    fn record_user_signup(&self);

    /// Record a "listing created" event.
    fn record_listing_created(&self);

    /// Record a listing transitioning to sold.
    fn record_listing_sold(&self);

    /// Record a booking placed on a listing.
    fn record_booking_created(&self);

    /// Record HTTP request duration and labels.
    fn record_http_request(&self, start: Instant, path: &str, method: &str, status: u16);
}

/// Type alias for any backend that implements Metrics.
pub type MetricsPtr = Arc<dyn Metrics>;
