//! Request Router / Load Balancer
//!
//! Resolves every client operation to a storage node and drives the
//! best-effort replication fan-out. Failure policy per class: routing
//! failures (no leader, no node) go back to the caller, who may retry;
//! fan-out failures are logged and dropped — the leader's answer already
//! went out and no backfill mechanism exists. Nothing here retries.

use std::sync::Arc;

use thiserror::Error;
use tokio::sync::Semaphore;

use crate::membership::election::ElectionCoordinator;
use crate::membership::registry::NodeRegistry;
use crate::membership::types::{NodeRecord, NodeStatus};
use crate::replica::protocol::{WriteAck, ENDPOINT_APPEND, ENDPOINT_GET, ENDPOINT_SET};

/// Routing error taxonomy. `NoLeader` and `NoNode` are service-unavailable
/// conditions; `Upstream` means the chosen node did not answer usefully.
#[derive(Debug, Error)]
pub enum RouterError {
    #[error("no leader available")]
    NoLeader,
    #[error("no node available")]
    NoNode,
    #[error("upstream request failed: {0}")]
    Upstream(String),
}

impl From<reqwest::Error> for RouterError {
    fn from(err: reqwest::Error) -> Self {
        RouterError::Upstream(err.to_string())
    }
}

pub struct RequestRouter {
    registry: Arc<NodeRegistry>,
    election: Arc<ElectionCoordinator>,
    http_client: reqwest::Client,
    /// Bounds in-flight fan-out requests so write bursts cannot grow tasks
    /// without limit.
    fanout_permits: Arc<Semaphore>,
}

impl RequestRouter {
    pub fn new(registry: Arc<NodeRegistry>, election: Arc<ElectionCoordinator>) -> Arc<Self> {
        let fanout_limit = registry.config().fanout_limit;
        Arc::new(Self {
            registry,
            election,
            http_client: reqwest::Client::new(),
            fanout_permits: Arc::new(Semaphore::new(fanout_limit)),
        })
    }

    /// Write path. Forwards to the active leader and, once the leader has
    /// acknowledged, spawns the follower fan-out without awaiting it.
    pub async fn set(&self, key: String, value: String) -> Result<WriteAck, RouterError> {
        let leader = self
            .election
            .active_leader()
            .await
            .ok_or(RouterError::NoLeader)?;

        tracing::debug!("SET {}={} routed to leader {}", key, value, leader.id);

        let response = self
            .http_client
            .get(format!("{}{}", leader.base_url(), ENDPOINT_SET))
            .query(&[("key", key.as_str()), ("value", value.as_str())])
            .timeout(self.registry.config().request_timeout)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(RouterError::Upstream(format!(
                "leader {} answered {}",
                leader.id,
                response.status()
            )));
        }

        let ack: WriteAck = response.json().await?;

        self.spawn_fanout(&leader, ack.index, key, value).await;

        Ok(ack)
    }

    /// Best-effort relay of an acknowledged entry to every active follower.
    /// Fire-and-forget: per-follower failures are logged and ignored, and a
    /// slow follower blocks neither the client response nor its peers.
    async fn spawn_fanout(&self, leader: &NodeRecord, index: u64, key: String, value: String) {
        let followers = self.registry.active_followers().await;
        let timeout = self.registry.config().request_timeout;

        for follower in followers {
            if follower.id == leader.id {
                continue;
            }

            let client = self.http_client.clone();
            let permits = self.fanout_permits.clone();
            let key = key.clone();
            let value = value.clone();

            tokio::spawn(async move {
                // Closed only on shutdown, at which point dropping the
                // relay is fine.
                let Ok(_permit) = permits.acquire_owned().await else {
                    return;
                };

                let result = client
                    .get(format!("{}{}", follower.base_url(), ENDPOINT_APPEND))
                    .query(&[
                        ("index", index.to_string().as_str()),
                        ("key", key.as_str()),
                        ("value", value.as_str()),
                    ])
                    .timeout(timeout)
                    .send()
                    .await;

                match result {
                    Ok(response) if response.status().is_success() => {
                        tracing::debug!("Replicated index {} to follower {}", index, follower.id);
                    }
                    Ok(response) => {
                        tracing::warn!(
                            "Follower {} rejected index {}: {}",
                            follower.id,
                            index,
                            response.status()
                        );
                    }
                    Err(e) => {
                        tracing::warn!(
                            "Failed to replicate index {} to follower {}: {}",
                            index,
                            follower.id,
                            e
                        );
                    }
                }
            });
        }
    }

    /// Read path. Round-robin over the active set; `Ok(None)` is a clean
    /// "key not found" from the chosen node.
    pub async fn get(&self, key: &str) -> Result<Option<String>, RouterError> {
        let node = self
            .registry
            .pick_read_node()
            .await
            .ok_or(RouterError::NoNode)?;

        tracing::debug!("GET {} routed to {}", key, node.id);

        let response = self
            .http_client
            .get(format!("{}{}", node.base_url(), ENDPOINT_GET))
            .query(&[("key", key)])
            .timeout(self.registry.config().request_timeout)
            .send()
            .await?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(RouterError::Upstream(format!(
                "node {} answered {}",
                node.id,
                response.status()
            )));
        }

        Ok(Some(response.text().await?))
    }

    /// Read-only projection of the registry; no side effects.
    pub async fn status(&self) -> Vec<NodeStatus> {
        self.registry.snapshot().await
    }
}
