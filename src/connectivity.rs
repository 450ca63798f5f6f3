//! Network reachability check used before catalog fetches and to explain
//! playback failures.

use std::net::{AddrParseError, IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr, UdpSocket};

use tracing::debug;

use crate::config::ConnectivitySettings;

/// Reports whether a network path is currently usable.
///
/// Answers are never cached; every call checks again.
pub trait ConnectivityProbe: Send + Sync {
    fn is_available(&self) -> bool;
}

/// Asks the kernel for a route to a fixed IP address.
///
/// Connecting a UDP socket only selects a route and a source address, so a
/// check sends no packets and never blocks on DNS or a handshake. It is cheap
/// enough to run on the UI thread.
#[derive(Debug, Clone)]
pub struct RouteProbe {
    target: SocketAddr,
}

impl RouteProbe {
    /// `settings.host` must be an IP literal.
    pub fn new(settings: &ConnectivitySettings) -> Result<Self, AddrParseError> {
        let ip: IpAddr = settings.host.trim().parse()?;
        Ok(Self {
            target: SocketAddr::new(ip, settings.port),
        })
    }
}

impl ConnectivityProbe for RouteProbe {
    fn is_available(&self) -> bool {
        let local = match self.target {
            SocketAddr::V4(_) => SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), 0),
            SocketAddr::V6(_) => SocketAddr::new(IpAddr::V6(Ipv6Addr::UNSPECIFIED), 0),
        };

        let socket = match UdpSocket::bind(local) {
            Ok(socket) => socket,
            Err(e) => {
                debug!(error = %e, "connectivity check: bind failed");
                return false;
            }
        };

        match socket.connect(self.target) {
            Ok(()) => true,
            Err(e) => {
                debug!(target = %self.target, error = %e, "connectivity check: no route");
                false
            }
        }
    }
}
