mod health;
mod metrics;
mod waitlist;

pub use health::health_handler;
pub use metrics::metrics_handler;
pub use waitlist::{throttle_middleware, waitlist_handler};
