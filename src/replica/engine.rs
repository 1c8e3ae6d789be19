//! Replicated Log & Apply Engine
//!
//! Sequences this node's writes, applies them to the local key/value map,
//! and records every applied entry in an append-only in-memory log.
//!
//! Index assignment is not independent of the append, so both happen under
//! one mutex: concurrent writes on the same node cannot interleave counter
//! bumps with map application. Reads go straight to the `DashMap` and never
//! take the log lock.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::Mutex;

use super::types::LogEntry;
use crate::membership::types::NodeId;

struct LogInner {
    entries: Vec<LogEntry>,
    /// Next index to assign to a locally originated write. Strictly
    /// increasing for the lifetime of the process, never reset.
    next_index: u64,
}

pub struct ReplicaEngine {
    pub id: NodeId,
    log: Mutex<LogInner>,
    store: DashMap<String, String>,
    last_applied: AtomicU64,
}

impl ReplicaEngine {
    pub fn new(id: NodeId) -> Arc<Self> {
        Arc::new(Self {
            id,
            log: Mutex::new(LogInner {
                entries: Vec::new(),
                next_index: 1,
            }),
            store: DashMap::new(),
            last_applied: AtomicU64::new(0),
        })
    }

    /// Accepts a client write on the node currently acting as leader.
    ///
    /// Assigns the next local index, appends, and applies to the local map
    /// before returning, so the write is immediately visible to local reads.
    /// Replication to followers is the gateway's job and is never awaited
    /// here; the returned index is what gets relayed.
    pub async fn local_write(&self, key: String, value: String) -> u64 {
        let mut log = self.log.lock().await;
        let index = log.next_index;
        log.next_index += 1;

        let entry = LogEntry { index, key, value };
        tracing::debug!("Node {}: local write {}={} (index {})", self.id, entry.key, entry.value, index);

        self.apply_entry(&entry);
        log.entries.push(entry);

        index
    }

    /// Applies an entry relayed from the leader.
    ///
    /// The entry is stored under the sender's index as-is. No contiguity
    /// check is made against the local tail: duplicates and gaps are
    /// accepted idempotently and the last apply for a key wins in the map.
    /// A follower that missed entries stays stale until a later write for
    /// the same key arrives; there is no catch-up.
    pub async fn remote_apply(&self, index: u64, key: String, value: String) {
        let mut log = self.log.lock().await;
        let entry = LogEntry { index, key, value };
        tracing::debug!(
            "Node {}: applying relayed entry {}={} (index {})",
            self.id,
            entry.key,
            entry.value,
            index
        );

        self.apply_entry(&entry);
        log.entries.push(entry);
    }

    /// Local map lookup; no consistency guarantee beyond what this node has
    /// applied so far.
    pub fn get(&self, key: &str) -> Option<String> {
        self.store.get(key).map(|v| v.value().clone())
    }

    pub fn last_applied_index(&self) -> u64 {
        self.last_applied.load(Ordering::Relaxed)
    }

    pub async fn log_len(&self) -> usize {
        self.log.lock().await.entries.len()
    }

    /// Snapshot of the log for inspection. The log exists to make the apply
    /// order observable, nothing else reads it.
    pub async fn log_entries(&self) -> Vec<LogEntry> {
        self.log.lock().await.entries.clone()
    }

    fn apply_entry(&self, entry: &LogEntry) {
        self.store.insert(entry.key.clone(), entry.value.clone());
        self.last_applied.store(entry.index, Ordering::Relaxed);
    }
}
