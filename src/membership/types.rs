use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Instant;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub String);

impl NodeId {
    /// Generates a random id for nodes started without an explicit `--id`.
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Default for NodeId {
    fn default() -> Self {
        Self::new()
    }
}

/// Role a node holds inside the cluster. At most one active node holds
/// `Leader` after any completed reconciliation pass.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum NodeRole {
    Leader,
    Follower,
}

impl fmt::Display for NodeRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeRole::Leader => write!(f, "LEADER"),
            NodeRole::Follower => write!(f, "FOLLOWER"),
        }
    }
}

impl FromStr for NodeRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "LEADER" => Ok(NodeRole::Leader),
            "FOLLOWER" => Ok(NodeRole::Follower),
            other => Err(format!("unknown role: {}", other)),
        }
    }
}

/// One entry in the gateway's node table.
///
/// Created on REGISTER, refreshed on HEARTBEAT, reclassified by the liveness
/// sweep and the election pass. Records are never removed: a node that stops
/// heartbeating goes inactive and keeps its slot, so it can come back and
/// resume its prior role if no reconciliation demoted it in the meantime.
#[derive(Debug, Clone)]
pub struct NodeRecord {
    pub id: NodeId,
    /// Address the gateway forwards client operations to.
    pub address: SocketAddr,
    /// Effective role, assigned by the gateway. The hint a node sends in its
    /// REGISTER is advisory only.
    pub role: NodeRole,
    pub last_heartbeat: Instant,
    /// Derived liveness flag: `now - last_heartbeat <= heartbeat_timeout`.
    /// Recomputed on every sweep and on every election decision.
    pub active: bool,
}

impl NodeRecord {
    pub fn base_url(&self) -> String {
        format!("http://{}", self.address)
    }
}

/// Read-only projection of a `NodeRecord` served by STATUS.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeStatus {
    pub id: NodeId,
    pub address: SocketAddr,
    pub role: NodeRole,
    pub active: bool,
    /// Milliseconds since the last heartbeat arrived.
    pub last_heartbeat_ms: u64,
}

/// The registry wire protocol. Nodes push these as single UDP datagrams:
///
/// ```text
/// REGISTER;<id>;<ip>;<port>;<role-hint>
/// HEARTBEAT;<id>
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryMessage {
    Register {
        id: NodeId,
        address: SocketAddr,
        role_hint: NodeRole,
    },
    Heartbeat {
        id: NodeId,
    },
}

impl RegistryMessage {
    /// Parses one datagram. Malformed input is an error for the listener to
    /// log and drop; it never creates registry state.
    pub fn parse(raw: &str) -> Result<Self, String> {
        let parts: Vec<&str> = raw.trim().split(';').collect();
        match parts.as_slice() {
            ["REGISTER", id, ip, port, role] => {
                let port: u16 = port
                    .parse()
                    .map_err(|_| format!("invalid port in REGISTER: {}", port))?;
                let ip = ip
                    .parse()
                    .map_err(|_| format!("invalid ip in REGISTER: {}", ip))?;
                // An unrecognized hint degrades to Follower; the gateway
                // overrides the hint anyway.
                let role_hint = role.parse().unwrap_or(NodeRole::Follower);
                Ok(RegistryMessage::Register {
                    id: NodeId(id.to_string()),
                    address: SocketAddr::new(ip, port),
                    role_hint,
                })
            }
            ["HEARTBEAT", id] => Ok(RegistryMessage::Heartbeat {
                id: NodeId(id.to_string()),
            }),
            _ => Err(format!("unrecognized registry datagram: {}", raw.trim())),
        }
    }

    pub fn encode(&self) -> String {
        match self {
            RegistryMessage::Register {
                id,
                address,
                role_hint,
            } => format!(
                "REGISTER;{};{};{};{}",
                id,
                address.ip(),
                address.port(),
                role_hint
            ),
            RegistryMessage::Heartbeat { id } => format!("HEARTBEAT;{}", id),
        }
    }
}
