//! Gateway process.
//!
//! Owns the node registry, runs the liveness monitor, and serves the client
//! transports. Listener ports are derived from the base bind address:
//! registry UDP at the bind port, client UDP at +1, TCP at +2, HTTP at +1000.

use std::net::SocketAddr;
use std::time::Duration;

use kv_cluster::config::ClusterConfig;
use kv_cluster::gateway::router::RequestRouter;
use kv_cluster::gateway::{http, tcp, udp, ListenAddrs};
use kv_cluster::membership::election::ElectionCoordinator;
use kv_cluster::membership::monitor::LivenessMonitor;
use kv_cluster::membership::registry::NodeRegistry;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let args: Vec<String> = std::env::args().collect();

    let mut bind_addr: SocketAddr = "127.0.0.1:8000".parse()?;
    let mut config = ClusterConfig::default();

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--bind" => {
                bind_addr = args[i + 1].parse()?;
                i += 2;
            }
            "--heartbeat-timeout-ms" => {
                config.heartbeat_timeout = Duration::from_millis(args[i + 1].parse()?);
                i += 2;
            }
            "--sweep-interval-ms" => {
                config.sweep_interval = Duration::from_millis(args[i + 1].parse()?);
                i += 2;
            }
            "--request-timeout-ms" => {
                config.request_timeout = Duration::from_millis(args[i + 1].parse()?);
                i += 2;
            }
            "--fanout-limit" => {
                config.fanout_limit = args[i + 1].parse()?;
                i += 2;
            }
            "--help" | "-h" => {
                eprintln!("Usage: gateway [--bind <addr:port>] [--heartbeat-timeout-ms <n>]");
                eprintln!("               [--sweep-interval-ms <n>] [--request-timeout-ms <n>]");
                eprintln!("               [--fanout-limit <n>]");
                eprintln!("Example: gateway --bind 127.0.0.1:8000");
                std::process::exit(0);
            }
            _ => {
                i += 1;
            }
        }
    }

    tracing::info!("Starting gateway (registry UDP on {})", bind_addr);

    // 1. Registry + election + monitor:
    let registry = NodeRegistry::new(config);
    let election = ElectionCoordinator::new(registry.clone());
    LivenessMonitor::new(registry.clone(), election.clone()).start();

    // 2. Router:
    let router = RequestRouter::new(registry.clone(), election);

    // 3. Registry listener (REGISTER + HEARTBEAT):
    let registry_socket = tokio::net::UdpSocket::bind(bind_addr).await?;
    let registry_handle = registry.clone();
    tokio::spawn(async move {
        if let Err(e) = udp::run_registry_listener(registry_socket, registry_handle).await {
            tracing::error!("Registry listener stopped: {}", e);
        }
    });

    // 4. Client transports: UDP commands, TCP lines, HTTP.
    let listen_addrs = ListenAddrs::derive(bind_addr)?;

    let command_socket = tokio::net::UdpSocket::bind(listen_addrs.command_udp).await?;
    let command_router = router.clone();
    tokio::spawn(async move {
        if let Err(e) = udp::run_command_listener(command_socket, command_router).await {
            tracing::error!("UDP command server stopped: {}", e);
        }
    });

    let tcp_listener = tokio::net::TcpListener::bind(listen_addrs.tcp).await?;
    let tcp_router = router.clone();
    tokio::spawn(async move {
        if let Err(e) = tcp::run(tcp_listener, tcp_router).await {
            tracing::error!("TCP command server stopped: {}", e);
        }
    });

    tracing::info!("HTTP server listening on {}", listen_addrs.http);

    let listener = tokio::net::TcpListener::bind(listen_addrs.http).await?;
    axum::serve(listener, http::app(router)).await?;

    Ok(())
}
