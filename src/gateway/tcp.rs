//! Gateway TCP Adapter
//!
//! Line-oriented framing over the shared command grammar: one command per
//! line, one reply line back, `QUIT` closes the connection. A failed
//! connection degrades that client only.

use std::sync::Arc;

use anyhow::Result;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};

use super::command;
use super::router::RequestRouter;

pub async fn run(listener: TcpListener, router: Arc<RequestRouter>) -> Result<()> {
    tracing::info!("TCP command server listening on {}", listener.local_addr()?);

    loop {
        let (stream, peer) = listener.accept().await?;
        let router = router.clone();

        tokio::spawn(async move {
            if let Err(e) = handle_connection(stream, router).await {
                tracing::warn!("TCP connection from {} ended with error: {}", peer, e);
            }
        });
    }
}

async fn handle_connection(stream: TcpStream, router: Arc<RequestRouter>) -> Result<()> {
    let (read_half, mut write_half) = stream.into_split();
    let mut lines = BufReader::new(read_half).lines();

    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line.eq_ignore_ascii_case("QUIT") {
            write_half.write_all(b"bye\n").await?;
            break;
        }

        let reply = command::execute(&router, line).await;
        write_half.write_all(reply.as_bytes()).await?;
        write_half.write_all(b"\n").await?;
    }

    Ok(())
}
