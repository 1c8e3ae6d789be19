//! Gateway Beacon
//!
//! Announces this node to the gateway's registry and keeps proving liveness.
//! One REGISTER at startup, then HEARTBEAT datagrams on a fixed interval.
//! Send failures are logged and the loop keeps going; a missed heartbeat can
//! only ever mark this node inactive, never kill it.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tokio::net::UdpSocket;

use crate::config::ClusterConfig;
use crate::membership::types::{NodeId, NodeRole, RegistryMessage};

pub struct GatewayBeacon {
    node_id: NodeId,
    /// Address other cluster members reach this node's HTTP API on.
    advertised_addr: SocketAddr,
    gateway_addr: SocketAddr,
    role_hint: NodeRole,
    socket: UdpSocket,
    config: ClusterConfig,
}

impl GatewayBeacon {
    pub async fn new(
        node_id: NodeId,
        advertised_addr: SocketAddr,
        gateway_addr: SocketAddr,
        role_hint: NodeRole,
        config: ClusterConfig,
    ) -> Result<Arc<Self>> {
        let socket = UdpSocket::bind("0.0.0.0:0").await?;
        Ok(Arc::new(Self {
            node_id,
            advertised_addr,
            gateway_addr,
            role_hint,
            socket,
            config,
        }))
    }

    /// Sends REGISTER, then spawns the heartbeat loop and returns. A failed
    /// REGISTER never stops the node: the send is logged and the heartbeat
    /// loop runs regardless, like any other dropped datagram.
    pub async fn start(self: Arc<Self>) {
        if let Err(e) = self.register().await {
            tracing::warn!("Node {}: REGISTER send failed: {}", self.node_id, e);
        }

        let beacon = self.clone();
        tokio::spawn(async move {
            beacon.heartbeat_loop().await;
        });
    }

    async fn register(&self) -> Result<()> {
        let msg = RegistryMessage::Register {
            id: self.node_id.clone(),
            address: self.advertised_addr,
            role_hint: self.role_hint,
        };
        self.send(&msg).await?;
        tracing::info!(
            "Node {}: REGISTER sent to gateway {} (hint={})",
            self.node_id,
            self.gateway_addr,
            self.role_hint
        );
        Ok(())
    }

    async fn heartbeat_loop(&self) {
        let mut ticker = tokio::time::interval(self.config.heartbeat_interval);
        let msg = RegistryMessage::Heartbeat {
            id: self.node_id.clone(),
        };

        loop {
            ticker.tick().await;
            if let Err(e) = self.send(&msg).await {
                tracing::warn!("Node {}: heartbeat send failed: {}", self.node_id, e);
            }
        }
    }

    async fn send(&self, msg: &RegistryMessage) -> Result<()> {
        self.socket
            .send_to(msg.encode().as_bytes(), self.gateway_addr)
            .await?;
        Ok(())
    }
}
