use serde::{Deserialize, Serialize};

/// One accepted write, owned by the node that appended it.
///
/// `index` is unique per originating node and assigned at local append time.
/// There is no cluster-wide numbering: each node counts for itself and the
/// gateway never renumbers entries it relays.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LogEntry {
    pub index: u64,
    pub key: String,
    pub value: String,
}
