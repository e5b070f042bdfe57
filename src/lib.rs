//! Waitlist gateway
//!
//! Accepts `POST /api/waitlist` signups, throttles them per client IP,
//! sanitizes and validates the address, adds it to a Brevo contact list and
//! sends a confirmation email.

pub mod app;
pub mod brevo;
pub mod client_ip;
pub mod clock;
pub mod config;
pub mod confirmation;
pub mod email;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod models;
pub mod rate_limit;
pub mod state;
pub mod upstream;

pub use rate_limit::{Decision, Throttle, ThrottleConfig};
pub use state::AppState;
