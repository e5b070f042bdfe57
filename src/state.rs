use std::sync::Arc;
use crate::rate_limit::Throttle;
use crate::upstream::WaitlistProvider;
// app's shared state

pub struct AppState {
    pub throttle: Throttle,
    pub provider: Arc<dyn WaitlistProvider>,
    pub trust_proxy: bool, // take client IP from X-Forwarded-For
}

impl AppState {
    pub fn new(throttle: Throttle, provider: Arc<dyn WaitlistProvider>, trust_proxy: bool) -> Self {
        Self {
            throttle,
            provider,
            trust_proxy,
        }
    }
}
