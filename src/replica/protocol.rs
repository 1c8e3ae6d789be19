//! Node Network Protocol
//!
//! Defines the HTTP endpoints a storage node exposes and the query/response
//! shapes used on them. The gateway's router imports the same definitions for
//! its forwarding client, so both sides of the wire share one contract.
//!
//! All three operations are query-parameter GETs, matching the client-facing
//! transports' text grammar one-to-one.

use serde::{Deserialize, Serialize};

// --- Endpoints ---

/// Leader write: `GET /set?key=..&value=..` -> `WriteAck` with the index the
/// leader assigned.
pub const ENDPOINT_SET: &str = "/set";
/// Local read: `GET /get?key=..` -> the raw value, or 404.
pub const ENDPOINT_GET: &str = "/get";
/// Replication relay, leader -> follower via the gateway:
/// `GET /append?index=..&key=..&value=..` -> `WriteAck` echoing the index.
pub const ENDPOINT_APPEND: &str = "/append";

// --- Query parameters ---

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetParams {
    pub key: String,
    pub value: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetParams {
    pub key: String,
}

/// Parameters of a relayed entry. `index` is the originating leader's local
/// index; the receiving node stores it verbatim.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppendParams {
    pub index: u64,
    pub key: String,
    pub value: String,
}

// --- Responses ---

/// Acknowledgment for `/set` and `/append`.
///
/// On `/set` the `index` field carries the index the leader just assigned,
/// which is what the gateway fans out to followers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WriteAck {
    pub ok: bool,
    pub index: u64,
}
