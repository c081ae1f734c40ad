//! Configuration schema definitions.
//!
//! The load balancer consumes exactly three values: the ordered upstream
//! list, the listening port and the health-check interval.

use serde::Deserialize;
use std::time::Duration;
use url::Url;

/// Default listening port.
pub const DEFAULT_PORT: u16 = 3030;

/// Default health-check interval in seconds.
pub const DEFAULT_HEALTH_CHECK_INTERVAL_SECS: u64 = 20;

/// Root configuration for the load balancer.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct LbConfig {
    /// Upstream servers, in round-robin order.
    pub backends: Vec<Url>,

    /// Port to serve on.
    pub port: u16,

    /// Health check interval in seconds.
    pub health_check_interval_secs: u64,
}

impl LbConfig {
    /// The health-check interval as a `Duration`.
    pub fn health_check_interval(&self) -> Duration {
        Duration::from_secs(self.health_check_interval_secs)
    }
}

impl Default for LbConfig {
    fn default() -> Self {
        Self {
            backends: Vec::new(),
            port: DEFAULT_PORT,
            health_check_interval_secs: DEFAULT_HEALTH_CHECK_INTERVAL_SECS,
        }
    }
}
