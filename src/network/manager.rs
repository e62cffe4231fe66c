//! Connection Manager
//!
//! Turns a host, port and transport into a live channel or a typed
//! [`ConnError`], under the deadlines configured in [`Options`]. Every call
//! blocks the calling thread and holds no state beyond its options, so
//! independent callers need no coordination. Nothing is retried.

use tracing::debug;

use crate::config::Options;
use crate::network::application::http::{Client, Request};
use crate::network::error::ConnError;
use crate::network::transport::{Channel, TcpConnection, UdpConnection};
use crate::network::{Close, Connect, Endpoint, PeerAddress, Transport};

#[derive(Debug, Clone, Default)]
pub struct ConnectionManager {
    options: Options,
}

impl ConnectionManager {
    pub fn new(options: Options) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Fetches `path` from `host` on port 80 and returns every byte the peer
    /// sends until it closes the stream.
    ///
    /// The request is `GET {path} HTTP/1.1` with only `Host` and
    /// `Connection: close` headers. Read failures other than an expired
    /// deadline end the response early instead of failing the call, unless
    /// [`Options::strict_reads`] is set.
    ///
    /// The read deadline bounds each individual read, not the whole call. A
    /// peer that keeps sending a little data within every deadline can keep
    /// this call blocked indefinitely.
    pub fn open_http(&self, host: &str, path: &str) -> Result<Vec<u8>, ConnError> {
        let endpoint = Endpoint::http(host)?;
        let request = Request::get(path, host);
        // Reject unframeable requests before touching the network.
        request.encode()?;

        let connection = self.connect_stream(endpoint)?;
        let mut client = Client::new(connection).strict_reads(self.options.strict_reads);
        let response = client.get(&request)?;
        client.into_inner().close()?;

        debug!(%endpoint, path, bytes = response.len(), "http exchange complete");
        Ok(response)
    }

    /// Connects a stream to `host:port` and hands it back open. No bytes are
    /// sent or read.
    pub fn open_tcp(&self, host: &str, port: u16) -> Result<TcpConnection, ConnError> {
        let endpoint = Endpoint::tcp(host, port)?;
        self.connect_stream(endpoint)
    }

    /// Creates a datagram socket and resolves the peer address that every
    /// later send must name. Only [`ConnError::InvalidAddress`] and
    /// [`ConnError::SocketCreateFailed`] can occur.
    pub fn open_udp(&self, host: &str, port: u16) -> Result<(UdpConnection, PeerAddress), ConnError> {
        let endpoint = Endpoint::udp(host, port)?;
        let mut connection = UdpConnection::new();
        connection.open(&self.options)?;
        Ok((connection, PeerAddress::from(endpoint)))
    }

    /// Opens whichever transport `endpoint` names as a byte channel.
    ///
    /// HTTP endpoints yield a plain stream to their port; framing is left to
    /// the caller.
    pub fn open(&self, endpoint: &Endpoint) -> Result<Channel, ConnError> {
        match endpoint.transport() {
            Transport::Tcp | Transport::Http => self.connect_stream(*endpoint).map(Channel::Stream),
            Transport::Udp => {
                let mut connection = UdpConnection::new();
                connection.open(&self.options)?;
                let peer = PeerAddress::from(*endpoint);
                Ok(Channel::Datagram(connection.into_channel(peer)))
            }
        }
    }

    fn connect_stream(&self, endpoint: Endpoint) -> Result<TcpConnection, ConnError> {
        let mut connection = TcpConnection::new(endpoint);
        connection.open(&self.options)?;
        Ok(connection)
    }
}

/// Opens a [`Channel`] from endpoint text such as `tcp://10.0.0.5:9000`.
impl Connect for ConnectionManager {
    type Connection = Channel;
    type Error = ConnError;

    fn connect(&mut self, remote: &str) -> Result<Self::Connection, Self::Error> {
        let endpoint: Endpoint = remote.parse()?;
        self.open(&endpoint)
    }
}
