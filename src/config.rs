//! Cluster Configuration
//!
//! All timing and resource tunables in one place, passed around by handle so
//! tests can construct isolated instances with short timeouts instead of
//! waiting on production values.

use std::time::Duration;

/// Tunables shared by the gateway and the storage nodes.
#[derive(Debug, Clone)]
pub struct ClusterConfig {
    /// A node with no heartbeat for longer than this is considered inactive.
    pub heartbeat_timeout: Duration,
    /// Period of the liveness monitor sweep. Must be shorter than
    /// `heartbeat_timeout`; together they bound the worst-case leaderless
    /// window to one sweep period plus the timeout.
    pub sweep_interval: Duration,
    /// How often a storage node sends HEARTBEAT to the gateway.
    pub heartbeat_interval: Duration,
    /// Timeout on every outbound HTTP call (forwarding, fan-out, reads).
    pub request_timeout: Duration,
    /// Maximum number of in-flight replication fan-out requests.
    pub fanout_limit: usize,
}

impl Default for ClusterConfig {
    fn default() -> Self {
        Self {
            heartbeat_timeout: Duration::from_millis(5000),
            sweep_interval: Duration::from_millis(1500),
            heartbeat_interval: Duration::from_millis(2000),
            request_timeout: Duration::from_millis(500),
            fanout_limit: 8,
        }
    }
}
