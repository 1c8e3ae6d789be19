//! Storage node process.
//!
//! Serves the node HTTP API (`/set`, `/get`, `/append`) and keeps the
//! gateway informed through the UDP beacon. The role flag is only a hint;
//! the gateway decides the effective role.

use std::net::SocketAddr;
use std::time::Duration;

use kv_cluster::config::ClusterConfig;
use kv_cluster::membership::types::{NodeId, NodeRole};
use kv_cluster::replica::beacon::GatewayBeacon;
use kv_cluster::replica::engine::ReplicaEngine;
use kv_cluster::replica::handlers;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let args: Vec<String> = std::env::args().collect();

    let mut bind_addr: SocketAddr = "127.0.0.1:5000".parse()?;
    let mut gateway_addr: SocketAddr = "127.0.0.1:8000".parse()?;
    let mut node_id: Option<NodeId> = None;
    let mut role_hint = NodeRole::Follower;
    let mut config = ClusterConfig::default();

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--bind" => {
                bind_addr = args[i + 1].parse()?;
                i += 2;
            }
            "--gateway" => {
                gateway_addr = args[i + 1].parse()?;
                i += 2;
            }
            "--id" => {
                node_id = Some(NodeId(args[i + 1].clone()));
                i += 2;
            }
            "--role" => {
                role_hint = args[i + 1]
                    .parse()
                    .map_err(|e: String| anyhow::anyhow!(e))?;
                i += 2;
            }
            "--heartbeat-interval-ms" => {
                config.heartbeat_interval = Duration::from_millis(args[i + 1].parse()?);
                i += 2;
            }
            "--help" | "-h" => {
                eprintln!("Usage: node [--bind <addr:port>] [--gateway <addr:port>]");
                eprintln!("            [--id <id>] [--role LEADER|FOLLOWER]");
                eprintln!("            [--heartbeat-interval-ms <n>]");
                eprintln!("Example: node --bind 127.0.0.1:5000 --gateway 127.0.0.1:8000 --id A1");
                std::process::exit(0);
            }
            _ => {
                i += 1;
            }
        }
    }

    let node_id = node_id.unwrap_or_default();
    tracing::info!(
        "Starting node {} on {} (gateway {}, hint={})",
        node_id,
        bind_addr,
        gateway_addr,
        role_hint
    );

    // 1. Log/apply engine:
    let engine = ReplicaEngine::new(node_id.clone());

    // 2. Beacon: REGISTER once, then periodic HEARTBEAT.
    let beacon = GatewayBeacon::new(node_id, bind_addr, gateway_addr, role_hint, config).await?;
    beacon.start().await;

    // 3. Node HTTP API:
    let listener = tokio::net::TcpListener::bind(bind_addr).await?;
    tracing::info!("Node HTTP API listening on {}", bind_addr);
    axum::serve(listener, handlers::app(engine)).await?;

    Ok(())
}
