//! Gateway Module
//!
//! The request router / load balancer and its transports. The gateway is the
//! cluster's sole arbiter: it owns the registry, runs the liveness monitor,
//! decides who leads, and is the only component clients ever talk to.
//!
//! ## Request flow
//! - **SET** resolves the active leader (electing lazily if the recorded one
//!   died), forwards the write, then fans the entry out best-effort to every
//!   active follower. The client sees the leader's result only.
//! - **GET** round-robins across the active set and answers with whatever
//!   that node has applied so far.
//! - **STATUS** projects the registry read-only.
//!
//! ## Transports
//! The same four logical operations are reachable three ways: HTTP query
//! parameters, line-oriented TCP, and UDP datagrams. The command grammar is
//! parsed and executed once in `command`; `tcp` and `udp` are framing
//! adapters over it, and `udp` also hosts the REGISTER/HEARTBEAT listener.

use std::net::SocketAddr;

pub mod command;
pub mod http;
pub mod router;
pub mod tcp;
pub mod udp;


/// Client listener addresses derived from the registry bind address: UDP
/// commands at +1, line-oriented TCP at +2, HTTP at +1000.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListenAddrs {
    pub command_udp: SocketAddr,
    pub tcp: SocketAddr,
    pub http: SocketAddr,
}

impl ListenAddrs {
    /// Fails when the bind port sits too close to the top of the range for
    /// the offsets to fit in a u16.
    pub fn derive(bind: SocketAddr) -> anyhow::Result<Self> {
        let base = bind.port();
        if base > u16::MAX - 1000 {
            anyhow::bail!(
                "bind port {} leaves no room for the derived listeners (+1, +2, +1000)",
                base
            );
        }
        Ok(Self {
            command_udp: SocketAddr::new(bind.ip(), base + 1),
            tcp: SocketAddr::new(bind.ip(), base + 2),
            http: SocketAddr::new(bind.ip(), base + 1000),
        })
    }
}
