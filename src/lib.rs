//! Distributed Key-Value Cluster Library
//!
//! This library crate defines the core modules that make up the cluster.
//! It serves as the foundation for the two binary executables
//! (`gateway` and `node`).
//!
//! ## Architecture Modules
//! The system is composed of four loosely coupled subsystems:
//!
//! - **`config`**: Cluster tunables (heartbeat timeout, sweep interval,
//!   request timeout, fan-out bound) injected by handle instead of living in
//!   process-wide constants.
//! - **`membership`**: The coordination layer owned by the gateway. Tracks
//!   every known storage node, reclassifies liveness from heartbeat recency,
//!   and enforces the single-leader invariant through gateway-arbitrated
//!   election.
//! - **`replica`**: The storage-node side. An append-only in-memory log with
//!   a synchronous apply path into the local key/value map, plus the UDP
//!   beacon that registers and heartbeats against the gateway.
//! - **`gateway`**: The request router / load balancer. Resolves writes to
//!   the current leader, fans writes out best-effort to active followers,
//!   round-robins reads across active nodes, and exposes the same four
//!   logical operations over HTTP, TCP lines, and UDP datagrams.

pub mod config;
pub mod gateway;
pub mod membership;
pub mod replica;
