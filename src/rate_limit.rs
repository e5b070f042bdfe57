use dashmap::DashMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

use crate::clock::Clock;
use crate::metrics::TRACKED_CLIENTS;

// bucket shared by every request whose client could not be identified
pub const UNATTRIBUTED_CLIENT: &str = "unknown";

#[derive(Debug, Clone)]
pub struct ThrottleConfig {
    // admitted requests per client inside one window
    pub max_requests: usize,
    pub window: Duration,
    // chance (0.0..=1.0) that a check also sweeps the whole registry
    pub sweep_probability: f64,
}

impl Default for ThrottleConfig {
    fn default() -> Self {
        Self {
            max_requests: 3,
            window: Duration::from_secs(60),
            sweep_probability: 0.01,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Admit,
    Deny,
}

impl Decision {
    pub fn is_admitted(self) -> bool {
        self == Decision::Admit
    }
}

// Sliding-window throttle keyed by client id (usually the IP).
// Read, prune and append for one client all run under its DashMap entry guard.
pub struct Throttle {
    windows: DashMap<String, Vec<i64>>,
    config: ThrottleConfig,
    clock: Arc<dyn Clock>,
}

impl Throttle {
    pub fn new(config: ThrottleConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            windows: DashMap::new(),
            config,
            clock,
        }
    }

    pub fn config(&self) -> &ThrottleConfig {
        &self.config
    }

    pub fn check(&self, client_id: &str) -> Decision {
        self.admit(client_id, self.clock.now_millis())
    }

    // window is pruned in both branches, `now` recorded only on admit
    pub fn admit(&self, client_id: &str, now: i64) -> Decision {
        let key = if client_id.is_empty() {
            UNATTRIBUTED_CLIENT
        } else {
            client_id
        };
        let window = self.window_millis();

        let decision = {
            let mut timestamps = self.windows.entry(key.to_string()).or_default();
            timestamps.retain(|&t| now - t < window);

            if timestamps.len() >= self.config.max_requests {
                Decision::Deny
            } else {
                timestamps.push(now);
                Decision::Admit
            }
        };

        // entry guard must be gone before sweeping, retain locks every shard
        if self.should_sweep() {
            self.sweep(now);
        }

        decision
    }

    // forget clients with no timestamp inside the window; returns how many went
    pub fn sweep(&self, now: i64) -> usize {
        let window = self.window_millis();
        let before = self.windows.len();

        self.windows.retain(|_, timestamps| {
            timestamps.retain(|&t| now - t < window);
            !timestamps.is_empty()
        });

        let remaining = self.windows.len();
        let removed = before.saturating_sub(remaining);
        TRACKED_CLIENTS.set(remaining as f64);
        debug!(removed, remaining, "Throttle sweep finished");
        removed
    }

    pub fn tracked_clients(&self) -> usize {
        self.windows.len()
    }

    // stale timestamps included
    pub fn recorded(&self, client_id: &str) -> usize {
        self.windows.get(client_id).map_or(0, |t| t.len())
    }

    fn window_millis(&self) -> i64 {
        i64::try_from(self.config.window.as_millis()).unwrap_or(i64::MAX)
    }

    fn should_sweep(&self) -> bool {
        let p = self.config.sweep_probability;
        p > 0.0 && rand::random::<f64>() < p
    }
}
