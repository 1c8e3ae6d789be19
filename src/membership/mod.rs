//! Membership & Election Module
//!
//! The gateway-owned coordination layer. Storage nodes announce themselves
//! with REGISTER and keep proving liveness with HEARTBEAT datagrams; this
//! module turns those signals into an authoritative node table and keeps the
//! single-leader invariant repaired.
//!
//! ## Core Mechanisms
//! - **Registry**: concurrent table of every node ever seen. Nodes are never
//!   deleted; a silent node is marked inactive and may return later.
//! - **Liveness Sweep**: `active` is always recomputed from heartbeat recency
//!   against the configured timeout, never flipped by a write path.
//! - **Gateway-Arbitrated Election**: no distributed vote. The gateway keeps
//!   the recorded leader while it is active and otherwise promotes the
//!   lowest-id active node, demoting everyone else in the same critical
//!   section.

pub mod election;
pub mod monitor;
pub mod registry;
pub mod types;

#[cfg(test)]
mod tests;
