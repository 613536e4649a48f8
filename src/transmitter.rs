//! Fire-and-forget UDP transmission to a fixed destination.

use crate::error::{Result, StreamError};
use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr};
use tokio::net::{lookup_host, UdpSocket};

/// Resolve `host:port` once, preferring an IPv4 address when the host has both.
pub async fn resolve_destination(host: &str, port: u16) -> Result<SocketAddr> {
    let addrs: Vec<SocketAddr> = lookup_host((host, port))
        .await
        .map_err(|source| StreamError::Resolve {
            host: host.to_string(),
            port,
            source,
        })?
        .collect();

    addrs
        .iter()
        .find(|addr| addr.is_ipv4())
        .or_else(|| addrs.first())
        .copied()
        .ok_or_else(|| StreamError::NoAddress {
            host: host.to_string(),
            port,
        })
}

/// Outbound-only datagram socket bound to an ephemeral local port.
///
/// Never connected: every message is a standalone `send_to`, with no
/// handshake and no acknowledgment.
pub struct UdpTransmitter {
    socket: UdpSocket,
    destination: SocketAddr,
}

impl UdpTransmitter {
    pub async fn bind(destination: SocketAddr) -> Result<Self> {
        let local: SocketAddr = if destination.is_ipv4() {
            (Ipv4Addr::UNSPECIFIED, 0).into()
        } else {
            (Ipv6Addr::UNSPECIFIED, 0).into()
        };
        let socket = UdpSocket::bind(local).await.map_err(StreamError::Bind)?;
        tracing::debug!(
            "UDP socket bound to {:?}, sending to {}",
            socket.local_addr().ok(),
            destination
        );
        Ok(Self {
            socket,
            destination,
        })
    }

    /// Send one message as a single datagram.
    pub async fn send(&self, payload: &[u8]) -> Result<usize> {
        self.socket
            .send_to(payload, self.destination)
            .await
            .map_err(|source| StreamError::Send {
                destination: self.destination,
                source,
            })
    }

    pub fn destination(&self) -> SocketAddr {
        self.destination
    }
}
