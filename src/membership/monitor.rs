//! Liveness Monitor
//!
//! A single background loop that periodically reclassifies every node from
//! heartbeat recency and then asks the election coordinator to repair the
//! leader invariant.
//!
//! Heartbeat arrival is event-driven and per-node; leader validity is
//! checked periodically and cluster-wide. Keeping the two apart bounds the
//! worst-case leaderless window to one sweep period plus the heartbeat
//! timeout, instead of reconciling on every single heartbeat.

use std::sync::Arc;

use super::election::ElectionCoordinator;
use super::registry::NodeRegistry;

pub struct LivenessMonitor {
    registry: Arc<NodeRegistry>,
    election: Arc<ElectionCoordinator>,
}

impl LivenessMonitor {
    pub fn new(registry: Arc<NodeRegistry>, election: Arc<ElectionCoordinator>) -> Arc<Self> {
        Arc::new(Self { registry, election })
    }

    /// Spawns the sweep loop and returns immediately.
    pub fn start(self: Arc<Self>) {
        let interval = self.registry.config().sweep_interval;
        tracing::info!("Liveness monitor started (sweep every {:?})", interval);

        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            loop {
                ticker.tick().await;
                self.tick().await;
            }
        });
    }

    /// One full pass: recompute liveness for every record, then reconcile.
    pub async fn tick(&self) {
        self.registry.sweep().await;
        self.election.reconcile().await;
    }
}
