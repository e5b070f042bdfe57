use lazy_static::lazy_static;
use prometheus::{Counter, Gauge, Histogram, register_counter, register_gauge, register_histogram};


lazy_static! {
    pub static ref REQUEST_TOTAL: Counter =
        register_counter!("waitlist_requests_total", "Total number of waitlist submissions").unwrap();
    pub static ref THROTTLE_DENIED: Counter =
        register_counter!("waitlist_throttle_denied_total", "Submissions rejected by the throttle").unwrap();
    pub static ref SIGNUPS_TOTAL: Counter =
        register_counter!("waitlist_signups_total", "Contacts created and confirmed").unwrap();
    pub static ref UPSTREAM_LATENCY: Histogram = register_histogram!(
        "waitlist_upstream_latency_seconds",
        "Time spent in contact creation plus confirmation email"
    )
    .unwrap();
    pub static ref TRACKED_CLIENTS: Gauge =
        register_gauge!("waitlist_throttle_tracked_clients", "Clients held by the throttle after the last sweep").unwrap();
}
