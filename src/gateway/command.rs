//! Transport-Agnostic Command Handler
//!
//! The text grammar shared by the TCP and UDP client transports:
//!
//! ```text
//! SET <key> <value>
//! GET <key>
//! STATUS
//! ```
//!
//! Parsing and execution live here once; the transports only frame.

use super::router::{RequestRouter, RouterError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Set { key: String, value: String },
    Get { key: String },
    Status,
}

impl Command {
    /// Parses one command line. Errors are client faults, phrased as the
    /// reply to send back.
    pub fn parse(line: &str) -> Result<Self, String> {
        let mut parts = line.split_whitespace();
        let Some(op) = parts.next() else {
            return Err("ERROR: empty command".to_string());
        };

        match op.to_ascii_uppercase().as_str() {
            "SET" => match (parts.next(), parts.next()) {
                (Some(key), Some(value)) => Ok(Command::Set {
                    key: key.to_string(),
                    value: value.to_string(),
                }),
                _ => Err("ERROR: usage: SET <key> <value>".to_string()),
            },
            "GET" => match parts.next() {
                Some(key) => Ok(Command::Get {
                    key: key.to_string(),
                }),
                None => Err("ERROR: usage: GET <key>".to_string()),
            },
            "STATUS" => Ok(Command::Status),
            other => Err(format!("ERROR: unknown command: {}", other)),
        }
    }
}

/// Parses and executes one command line, returning the text reply.
pub async fn execute(router: &RequestRouter, line: &str) -> String {
    let command = match Command::parse(line) {
        Ok(command) => command,
        Err(reply) => return reply,
    };

    match command {
        Command::Set { key, value } => match router.set(key.clone(), value.clone()).await {
            Ok(ack) => format!("OK: set {}={} (index {})", key, value, ack.index),
            Err(e) => format!("ERROR: {}", e),
        },
        Command::Get { key } => match router.get(&key).await {
            Ok(Some(value)) => value,
            Ok(None) => "not found".to_string(),
            Err(e) => format!("ERROR: {}", e),
        },
        Command::Status => {
            let statuses = router.status().await;
            if statuses.is_empty() {
                return "no nodes registered".to_string();
            }
            statuses
                .iter()
                .map(|s| {
                    format!(
                        "{} | {} | active={} | last_heartbeat_ms={}",
                        s.id, s.role, s.active, s.last_heartbeat_ms
                    )
                })
                .collect::<Vec<_>>()
                .join("\n")
        }
    }
}

/// Maps a routing error onto the HTTP status the query-parameter transport
/// answers with.
pub fn http_status(err: &RouterError) -> axum::http::StatusCode {
    match err {
        RouterError::NoLeader | RouterError::NoNode => {
            axum::http::StatusCode::SERVICE_UNAVAILABLE
        }
        RouterError::Upstream(_) => axum::http::StatusCode::BAD_GATEWAY,
    }
}
