//! Election Coordinator
//!
//! Enforces the single-leader invariant without a distributed vote: the
//! gateway is the sole arbiter. Reconciliation keeps the recorded leader
//! while it is active and otherwise promotes the active node with the lowest
//! id, demoting every other record inside the same write lock.
//!
//! Lowest-id selection is deliberate: picking "whichever active node an
//! unordered scan yields first" would make election outcomes depend on table
//! iteration order and be untestable.

use std::sync::Arc;
use std::time::Instant;

use super::registry::{refresh_active, NodeRegistry};
use super::types::{NodeRecord, NodeRole};

pub struct ElectionCoordinator {
    registry: Arc<NodeRegistry>,
}

impl ElectionCoordinator {
    pub fn new(registry: Arc<NodeRegistry>) -> Arc<Self> {
        Arc::new(Self { registry })
    }

    /// Repairs the single-leader invariant. Called by the liveness monitor
    /// after every sweep and lazily before serving any write.
    ///
    /// Liveness is recomputed here as well, so a leader that died between
    /// sweeps is caught by the next write without waiting for the monitor.
    pub async fn reconcile(&self) {
        let mut inner = self.registry.inner().write().await;
        refresh_active(&mut inner, self.registry.config(), Instant::now());

        // Keep the recorded leader while it is active.
        let mut leader = inner.leader.clone().filter(|leader_id| {
            inner
                .nodes
                .get(leader_id)
                .map(|record| record.active)
                .unwrap_or(false)
        });

        // Otherwise promote the lowest-id active node, if any.
        if leader.is_none() {
            leader = inner
                .nodes
                .values()
                .filter(|record| record.active)
                .map(|record| record.id.clone())
                .min();

            match &leader {
                Some(new_leader) => {
                    tracing::info!("Election complete: new leader is {}", new_leader);
                }
                None => {
                    if inner.leader.is_some() {
                        tracing::warn!(
                            "No active node available to lead; cluster is leaderless"
                        );
                    }
                }
            }
        }

        // Roles are enforced every pass: exactly the recorded leader holds
        // the Leader role, everyone else is a follower. A stale Leader
        // record would otherwise resurface as a second leader once its
        // node heartbeats again. A demoted node does not reclaim
        // leadership on return; it rejoins as follower.
        for record in inner.nodes.values_mut() {
            record.role = if Some(&record.id) == leader.as_ref() {
                NodeRole::Leader
            } else {
                NodeRole::Follower
            };
        }
        inner.leader = leader;
    }

    /// Resolves the node writes must go to, reconciling first. `None` means
    /// the cluster is leaderless and the write path must fail.
    pub async fn active_leader(&self) -> Option<NodeRecord> {
        self.reconcile().await;

        let inner = self.registry.inner().read().await;
        let leader_id = inner.leader.as_ref()?;
        inner
            .nodes
            .get(leader_id)
            .filter(|record| record.active)
            .cloned()
    }
}
