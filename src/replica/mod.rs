//! Replica Module
//!
//! Everything that runs inside a storage node: the replicated log & apply
//! engine, the node's HTTP surface, and the UDP beacon that keeps the
//! gateway's registry informed.
//!
//! ## Write semantics
//! Writes are best-effort single-writer: the leader assigns a strictly
//! increasing per-node index, applies locally, and answers the client as
//! soon as the local apply completes. Followers receive the same entry via
//! the gateway's fan-out and apply it under the leader's index with no
//! contiguity check. The log is append-only and in-memory; it makes the
//! apply order inspectable, it does not support recovery.
//!
//! ## Submodules
//! - **`types`**: the log entry record.
//! - **`protocol`**: the node HTTP API contract, shared with the gateway's
//!   forwarding client.
//! - **`engine`**: the per-node log/apply engine.
//! - **`handlers`**: axum adapters over the engine.
//! - **`beacon`**: REGISTER + periodic HEARTBEAT toward the gateway.

pub mod beacon;
pub mod engine;
pub mod handlers;
pub mod protocol;
pub mod types;
