use crate::domain::error::{TermLinkError, TermLinkResult};
use socket2::{Domain, Protocol, Socket, Type};
use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4};
use std::time::Duration;
use tokio::net::UdpSocket;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

/// One datagram heard on the discovery port
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeerAnnouncement {
    /// Sender IP address
    pub address: String,
    /// Advertised device name
    pub name: String,
}

impl PeerAnnouncement {
    pub fn from_datagram(sender: SocketAddr, payload: &[u8]) -> Self {
        let name = String::from_utf8_lossy(payload)
            .trim_matches(|c: char| c.is_whitespace() || c == '\0')
            .to_string();
        Self {
            address: sender.ip().to_string(),
            name,
        }
    }
}

/// Pause after a failed receive, doubled per consecutive failure
const RECV_RETRY_DELAY: Duration = Duration::from_millis(100);
const MAX_RECV_RETRY_DELAY: Duration = Duration::from_secs(5);
/// Consecutive failures after which the listener gives up
const MAX_RECV_FAILURES: u32 = 20;

/// Back-off for a run of failed receives
#[derive(Debug, Default)]
struct RecvBackoff {
    failures: u32,
}

impl RecvBackoff {
    /// Record a failure. Returns how long to wait, or `None` once the
    /// listener should stop.
    fn failed(&mut self) -> Option<Duration> {
        self.failures += 1;
        if self.failures >= MAX_RECV_FAILURES {
            return None;
        }
        let delay = RECV_RETRY_DELAY.saturating_mul(1 << (self.failures - 1).min(16));
        Some(delay.min(MAX_RECV_RETRY_DELAY))
    }

    fn succeeded(&mut self) {
        self.failures = 0;
    }
}

/// Passive listener for peer announcements.
pub struct DiscoveryListener {
    socket: UdpSocket,
}

impl DiscoveryListener {
    /// Bind to `port` on all IPv4 interfaces with address sharing enabled,
    /// so several instances can listen at once.
    pub fn bind(port: u16) -> TermLinkResult<Self> {
        let discovery_error = |e: std::io::Error| TermLinkError::Discovery {
            message: format!("Failed to bind discovery port {}: {}", port, e),
        };

        let socket = Socket::new(Domain::IPV4, Type::DGRAM, Some(Protocol::UDP)).map_err(discovery_error)?;
        socket.set_reuse_address(true).map_err(discovery_error)?;
        #[cfg(all(unix, not(any(target_os = "solaris", target_os = "illumos"))))]
        socket.set_reuse_port(true).map_err(discovery_error)?;
        socket.set_broadcast(true).map_err(discovery_error)?;
        socket.set_nonblocking(true).map_err(discovery_error)?;
        socket
            .bind(&SocketAddrV4::new(Ipv4Addr::UNSPECIFIED, port).into())
            .map_err(discovery_error)?;

        let socket = UdpSocket::from_std(socket.into()).map_err(discovery_error)?;
        info!("Listening for peer announcements on UDP port {}", port);
        Ok(Self { socket })
    }

    pub fn local_addr(&self) -> TermLinkResult<SocketAddr> {
        Ok(self.socket.local_addr()?)
    }

    /// Forward every announcement to `announcements` until the receiver goes away.
    pub fn spawn(self, announcements: mpsc::UnboundedSender<PeerAnnouncement>) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut buffer = vec![0u8; 1500];
            let mut backoff = RecvBackoff::default();
            loop {
                match self.socket.recv_from(&mut buffer).await {
                    Ok((n, sender)) => {
                        backoff.succeeded();
                        debug!("Got a UDP frame from {} ({} bytes)", sender, n);
                        let announcement = PeerAnnouncement::from_datagram(sender, &buffer[..n]);
                        if announcements.send(announcement).is_err() {
                            break;
                        }
                    }
                    Err(e) => match backoff.failed() {
                        Some(delay) => {
                            if backoff.failures == 1 {
                                warn!("Discovery receive failed: {}", e);
                            } else {
                                debug!("Discovery receive failed again: {}", e);
                            }
                            tokio::time::sleep(delay).await;
                        }
                        None => {
                            error!("Discovery receive keeps failing ({}); listener stopped", e);
                            break;
                        }
                    },
                }
            }
        })
    }
}
