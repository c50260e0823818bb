use metrics::{counter, histogram};
use std::time::Instant;

/// Increment a counter for completed signups.
pub fn increment_user_signup() {
    counter!("users_signed_up_total").increment(1);
}

/// Increment a counter for created listings.
pub fn increment_listing_created() {
    counter!("listings_created_total").increment(1);
}

/// Increment a counter for listings marked sold.
pub fn increment_listing_sold() {
    counter!("listings_sold_total").increment(1);
}

/// Increment a counter for bookings placed on listings.
pub fn increment_booking_created() {
    counter!("bookings_created_total").increment(1);
}

/// Track HTTP request latency using a histogram.
pub fn track_http_request(start: Instant) {
    let elapsed = start.elapsed();
    histogram!("http_request_duration_seconds").record(elapsed);
}
