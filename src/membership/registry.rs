//! Node Registry
//!
//! The authoritative in-memory table of every storage node the gateway has
//! ever seen, plus the round-robin cursor for read routing.
//!
//! All table state (records and the current-leader id) lives behind one
//! `RwLock` so that election reconciliation, which rewrites several records'
//! roles together, runs as a single critical section: an observer taking the
//! read lock can never catch the table with two leaders mid-update.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

use tokio::sync::RwLock;

use super::types::{NodeId, NodeRecord, NodeRole, NodeStatus};
use crate::config::ClusterConfig;

pub(crate) struct RegistryInner {
    pub nodes: HashMap<NodeId, NodeRecord>,
    /// Id of the node the gateway currently considers leader, if any.
    pub leader: Option<NodeId>,
}

pub struct NodeRegistry {
    config: ClusterConfig,
    inner: RwLock<RegistryInner>,
    /// Monotonic read-dispatch counter; wraps modulo the active-set size at
    /// lookup time.
    rr_cursor: AtomicU64,
}

impl NodeRegistry {
    pub fn new(config: ClusterConfig) -> Arc<Self> {
        Arc::new(Self {
            config,
            inner: RwLock::new(RegistryInner {
                nodes: HashMap::new(),
                leader: None,
            }),
            rr_cursor: AtomicU64::new(0),
        })
    }

    pub fn config(&self) -> &ClusterConfig {
        &self.config
    }

    pub(crate) fn inner(&self) -> &RwLock<RegistryInner> {
        &self.inner
    }

    /// Inserts or replaces a node record.
    ///
    /// The effective role is decided here, not by the node: the first node
    /// registered while no leader is recorded becomes leader regardless of
    /// its hint; everyone else comes in as follower.
    pub async fn register(&self, id: NodeId, address: SocketAddr, role_hint: NodeRole) {
        let mut inner = self.inner.write().await;

        let current_leader = inner.leader.clone();
        let role = match current_leader {
            None => {
                inner.leader = Some(id.clone());
                tracing::info!("Node {} registered as current LEADER", id);
                NodeRole::Leader
            }
            Some(leader_id) if leader_id == id => NodeRole::Leader,
            Some(leader_id) => {
                tracing::info!(
                    "Node {} registered as FOLLOWER (current leader: {})",
                    id,
                    leader_id
                );
                NodeRole::Follower
            }
        };

        tracing::info!(
            "Register: node {} at {} (hint={}, effective={})",
            id,
            address,
            role_hint,
            role
        );

        inner.nodes.insert(
            id.clone(),
            NodeRecord {
                id,
                address,
                role,
                last_heartbeat: Instant::now(),
                active: true,
            },
        );
    }

    /// Refreshes the heartbeat timestamp for a known node. A heartbeat from
    /// an id that never registered is logged and dropped; it must not create
    /// a record.
    pub async fn heartbeat(&self, id: &NodeId) {
        let mut inner = self.inner.write().await;
        match inner.nodes.get_mut(id) {
            Some(record) => {
                record.last_heartbeat = Instant::now();
            }
            None => {
                tracing::warn!("Heartbeat from unknown node: {}", id);
            }
        }
    }

    /// Recomputes the `active` flag of every record from heartbeat recency.
    /// Transitions are logged on edges only.
    pub async fn sweep(&self) {
        let mut inner = self.inner.write().await;
        refresh_active(&mut inner, &self.config, Instant::now());
    }

    /// Read-only projection of the whole table, for STATUS.
    pub async fn snapshot(&self) -> Vec<NodeStatus> {
        let inner = self.inner.read().await;
        let now = Instant::now();
        let mut statuses: Vec<NodeStatus> = inner
            .nodes
            .values()
            .map(|record| NodeStatus {
                id: record.id.clone(),
                address: record.address,
                role: record.role,
                active: record.active,
                last_heartbeat_ms: now.duration_since(record.last_heartbeat).as_millis() as u64,
            })
            .collect();
        statuses.sort_by(|a, b| a.id.cmp(&b.id));
        statuses
    }

    /// Snapshot of all active nodes, sorted by id so the round-robin cycle
    /// order is stable for a given active set.
    pub async fn active_nodes(&self) -> Vec<NodeRecord> {
        let inner = self.inner.read().await;
        let mut nodes: Vec<NodeRecord> = inner
            .nodes
            .values()
            .filter(|record| record.active)
            .cloned()
            .collect();
        nodes.sort_by(|a, b| a.id.cmp(&b.id));
        nodes
    }

    /// Active non-leader nodes, the replication fan-out targets.
    pub async fn active_followers(&self) -> Vec<NodeRecord> {
        let inner = self.inner.read().await;
        let mut nodes: Vec<NodeRecord> = inner
            .nodes
            .values()
            .filter(|record| record.active && record.role != NodeRole::Leader)
            .cloned()
            .collect();
        nodes.sort_by(|a, b| a.id.cmp(&b.id));
        nodes
    }

    /// Picks the next node for a read in round-robin order over the current
    /// active set. The cursor only ever increases; a changed cluster size
    /// changes the cycle length going forward, never indexes out of range.
    pub async fn pick_read_node(&self) -> Option<NodeRecord> {
        let nodes = self.active_nodes().await;
        if nodes.is_empty() {
            return None;
        }
        let cursor = self.rr_cursor.fetch_add(1, Ordering::Relaxed);
        let idx = (cursor % nodes.len() as u64) as usize;
        Some(nodes[idx].clone())
    }
}

/// Recomputes `active` for every record in place. This is the only place the
/// flag changes, so active/inactive edges are logged here exactly once no
/// matter whether a periodic sweep or a lazy election pass noticed first.
pub(crate) fn refresh_active(inner: &mut RegistryInner, config: &ClusterConfig, now: Instant) {
    for record in inner.nodes.values_mut() {
        let was_active = record.active;
        let is_active = now.duration_since(record.last_heartbeat) <= config.heartbeat_timeout;
        record.active = is_active;

        if was_active && !is_active {
            tracing::warn!("Node {} went INACTIVE (no heartbeat)", record.id);
        } else if !was_active && is_active {
            tracing::info!("Node {} is ACTIVE again", record.id);
        }
    }
}
