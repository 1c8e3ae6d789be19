//! Gateway UDP Listeners
//!
//! Two datagram loops on separate sockets:
//!
//! - the **registry listener** consumes REGISTER/HEARTBEAT datagrams from
//!   storage nodes and feeds the node table. Malformed datagrams are logged
//!   and dropped; they never create registry state.
//! - the **command listener** speaks the shared client grammar, one command
//!   per datagram, reply sent back to the sender address.

use std::sync::Arc;

use anyhow::Result;
use tokio::net::UdpSocket;

use super::command;
use super::router::RequestRouter;
use crate::membership::registry::NodeRegistry;
use crate::membership::types::RegistryMessage;

pub async fn run_registry_listener(socket: UdpSocket, registry: Arc<NodeRegistry>) -> Result<()> {
    tracing::info!(
        "Registry UDP listener on {} (REGISTER + HEARTBEAT)",
        socket.local_addr()?
    );

    let mut buf = vec![0u8; 1024];
    loop {
        let (len, src) = socket.recv_from(&mut buf).await?;

        let Ok(raw) = std::str::from_utf8(&buf[..len]) else {
            tracing::warn!("Non-UTF8 registry datagram from {}", src);
            continue;
        };

        match RegistryMessage::parse(raw) {
            Ok(RegistryMessage::Register {
                id,
                address,
                role_hint,
            }) => {
                registry.register(id, address, role_hint).await;
            }
            Ok(RegistryMessage::Heartbeat { id }) => {
                registry.heartbeat(&id).await;
            }
            Err(e) => {
                tracing::warn!("Dropped registry datagram from {}: {}", src, e);
            }
        }
    }
}

pub async fn run_command_listener(socket: UdpSocket, router: Arc<RequestRouter>) -> Result<()> {
    tracing::info!("UDP command server listening on {}", socket.local_addr()?);

    let mut buf = vec![0u8; 1024];
    loop {
        let (len, src) = socket.recv_from(&mut buf).await?;

        let Ok(raw) = std::str::from_utf8(&buf[..len]) else {
            tracing::warn!("Non-UTF8 command datagram from {}", src);
            continue;
        };

        let reply = command::execute(&router, raw.trim()).await;
        if let Err(e) = socket.send_to(reply.as_bytes(), src).await {
            tracing::warn!("Failed to answer UDP client {}: {}", src, e);
        }
    }
}
