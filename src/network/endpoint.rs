//! Endpoints and strict IPv4 address parsing.
//!
//! Hosts are accepted only as dotted-decimal IPv4 literals such as
//! `127.0.0.1`. There is no name resolution and no fallback: anything else is
//! rejected with [`ConnError::InvalidAddress`] before a socket is allocated.

use core::fmt;
use core::net::{Ipv4Addr, SocketAddrV4};
use core::str::FromStr;

use crate::network::error::ConnError;

/// Default port for the `http` scheme.
pub const HTTP_PORT: u16 = 80;

/// The transport kind of an [`Endpoint`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Transport {
    /// HTTP/1.1 over a stream socket.
    Http,
    /// Raw stream socket.
    Tcp,
    /// Datagram socket.
    Udp,
}

impl Transport {
    /// The URI scheme used when parsing and printing endpoints.
    pub fn scheme(&self) -> &'static str {
        match self {
            Transport::Http => "http",
            Transport::Tcp => "tcp",
            Transport::Udp => "udp",
        }
    }

    fn from_scheme(scheme: &str) -> Option<Self> {
        match scheme {
            "http" => Some(Transport::Http),
            "tcp" => Some(Transport::Tcp),
            "udp" => Some(Transport::Udp),
            _ => None,
        }
    }
}

/// Parses a dotted-decimal IPv4 literal.
///
/// Exactly four decimal octets in `0..=255` are accepted. Hostnames, IPv6
/// literals, surrounding whitespace and octets with leading zeros are all
/// rejected.
pub fn parse_ipv4(host: &str) -> Result<Ipv4Addr, ConnError> {
    Ipv4Addr::from_str(host).map_err(|_| ConnError::InvalidAddress)
}

/// A remote peer: IPv4 address, port and transport. Immutable once built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Endpoint {
    addr: Ipv4Addr,
    port: u16,
    transport: Transport,
}

impl Endpoint {
    pub fn new(host: &str, port: u16, transport: Transport) -> Result<Self, ConnError> {
        Ok(Self {
            addr: parse_ipv4(host)?,
            port,
            transport,
        })
    }

    /// An HTTP endpoint on port 80.
    pub fn http(host: &str) -> Result<Self, ConnError> {
        Self::new(host, HTTP_PORT, Transport::Http)
    }

    pub fn tcp(host: &str, port: u16) -> Result<Self, ConnError> {
        Self::new(host, port, Transport::Tcp)
    }

    pub fn udp(host: &str, port: u16) -> Result<Self, ConnError> {
        Self::new(host, port, Transport::Udp)
    }

    pub fn addr(&self) -> Ipv4Addr {
        self.addr
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn transport(&self) -> Transport {
        self.transport
    }

    pub fn socket_addr(&self) -> SocketAddrV4 {
        SocketAddrV4::new(self.addr, self.port)
    }
}

/// Parses `<scheme>://<a.b.c.d>[:<port>]`.
///
/// `tcp` and `udp` require an explicit port, `http` defaults to 80. A trailing
/// `/` is tolerated so that `http://10.0.0.1/` parses.
impl FromStr for Endpoint {
    type Err = ConnError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (scheme, rest) = s.split_once("://").ok_or(ConnError::InvalidAddress)?;
        let transport = Transport::from_scheme(scheme).ok_or(ConnError::InvalidAddress)?;
        let authority = rest.strip_suffix('/').unwrap_or(rest);

        let (host, port) = match authority.split_once(':') {
            Some((host, port)) => {
                let port = port.parse::<u16>().map_err(|_| ConnError::InvalidAddress)?;
                (host, port)
            }
            None if transport == Transport::Http => (authority, HTTP_PORT),
            None => return Err(ConnError::InvalidAddress),
        };

        Self::new(host, port, transport)
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}://{}:{}", self.transport.scheme(), self.addr, self.port)
    }
}

/// The resolved address of a datagram peer.
///
/// Returned by `open_udp` and required on every subsequent send.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PeerAddress(SocketAddrV4);

impl PeerAddress {
    pub fn new(addr: Ipv4Addr, port: u16) -> Self {
        Self(SocketAddrV4::new(addr, port))
    }

    pub fn socket_addr(&self) -> SocketAddrV4 {
        self.0
    }
}

impl From<SocketAddrV4> for PeerAddress {
    fn from(addr: SocketAddrV4) -> Self {
        Self(addr)
    }
}

impl From<Endpoint> for PeerAddress {
    fn from(endpoint: Endpoint) -> Self {
        Self(endpoint.socket_addr())
    }
}

impl fmt::Display for PeerAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}
