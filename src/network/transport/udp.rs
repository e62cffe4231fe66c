use std::io;
use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4, UdpSocket as StdUdpSocket};

use socket2::{Domain, Protocol, SockAddr, Socket, Type};
use tracing::{debug, trace, warn};

use super::io_error;
use crate::config::Options;
use crate::network::error::ConnError;
use crate::network::{Close, Connection, PeerAddress, Read, State, UdpSocket, Write};

/// A datagram socket bound to an ephemeral local port.
///
/// There is no handshake, so opening can only fail while allocating or
/// binding the socket.
#[derive(Debug, Default)]
pub struct UdpConnection {
    socket: Option<StdUdpSocket>,
    state: State,
}

impl UdpConnection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocates the socket, binds it to `0.0.0.0:0` and applies the read
    /// and write deadlines.
    pub fn open(&mut self, options: &Options) -> Result<(), ConnError> {
        match self.state {
            State::Unopened => {}
            State::Open => return Ok(()),
            State::Closed | State::Failed => return Err(ConnError::NotOpen),
        }

        match bind_datagram(options) {
            Ok(socket) => {
                debug!(local = ?socket.local_addr().ok(), "datagram socket open");
                self.socket = Some(socket);
                self.state = self.state.after_open(true);
                Ok(())
            }
            Err(err) => {
                self.state = self.state.after_open(false);
                Err(err)
            }
        }
    }

    pub fn state(&self) -> State {
        self.state
    }

    pub fn local_addr(&self) -> Result<SocketAddr, ConnError> {
        self.socket
            .as_ref()
            .ok_or(ConnError::NotOpen)?
            .local_addr()
            .map_err(|e| io_error(&e))
    }

    /// Fixes the peer so the socket can be used as a byte [`Connection`].
    pub fn into_channel(self, peer: PeerAddress) -> UdpChannel {
        UdpChannel { inner: self, peer }
    }

    fn socket(&self) -> Result<&StdUdpSocket, ConnError> {
        self.socket.as_ref().ok_or(ConnError::NotOpen)
    }
}

fn bind_datagram(options: &Options) -> Result<StdUdpSocket, ConnError> {
    let socket = Socket::new(Domain::IPV4, Type::DGRAM, Some(Protocol::UDP)).map_err(|e| {
        warn!(error = %e, "datagram socket allocation failed");
        ConnError::SocketCreateFailed
    })?;
    let local = SockAddr::from(SocketAddrV4::new(Ipv4Addr::UNSPECIFIED, 0));
    socket.bind(&local).map_err(|e| {
        warn!(error = %e, "datagram socket bind failed");
        ConnError::SocketCreateFailed
    })?;

    let socket = StdUdpSocket::from(socket);
    socket
        .set_read_timeout(options.read_timeout())
        .and_then(|()| socket.set_write_timeout(options.write_timeout()))
        .map_err(|e| {
            warn!(error = %e, "datagram socket deadline setup failed");
            ConnError::SocketCreateFailed
        })?;
    Ok(socket)
}

impl UdpSocket for UdpConnection {
    type Error = ConnError;

    fn send_to(&mut self, peer: &PeerAddress, buf: &[u8]) -> Result<usize, Self::Error> {
        self.socket()?
            .send_to(buf, peer.socket_addr())
            .map_err(|e| io_error(&e))
    }

    fn recv_from(&mut self, buf: &mut [u8]) -> Result<(usize, PeerAddress), Self::Error> {
        let socket = self.socket()?;
        loop {
            match socket.recv_from(buf) {
                Ok((n, SocketAddr::V4(from))) => return Ok((n, PeerAddress::from(from))),
                Ok((_, SocketAddr::V6(_))) => return Err(ConnError::IoError),
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(io_error(&e)),
            }
        }
    }
}

impl Close for UdpConnection {
    type Error = ConnError;

    fn close(&mut self) -> Result<(), Self::Error> {
        if self.socket.take().is_some() {
            self.state = self.state.after_close();
            debug!("datagram socket closed");
        }
        Ok(())
    }
}

impl Drop for UdpConnection {
    fn drop(&mut self) {
        let _ = self.close();
    }
}

/// A datagram socket fixed to one peer.
///
/// Writes send one datagram each to the peer; reads return the next datagram
/// from that peer and skip datagrams from anyone else.
#[derive(Debug)]
pub struct UdpChannel {
    inner: UdpConnection,
    peer: PeerAddress,
}

impl UdpChannel {
    pub fn peer(&self) -> PeerAddress {
        self.peer
    }

    pub fn state(&self) -> State {
        self.inner.state()
    }

    pub fn local_addr(&self) -> Result<SocketAddr, ConnError> {
        self.inner.local_addr()
    }
}

impl Read for UdpChannel {
    type Error = ConnError;

    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        loop {
            let (n, from) = self.inner.recv_from(buf)?;
            if from == self.peer {
                return Ok(n);
            }
            trace!(%from, expected = %self.peer, "dropping datagram from unexpected peer");
        }
    }
}

impl Write for UdpChannel {
    type Error = ConnError;

    fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
        let peer = self.peer;
        self.inner.send_to(&peer, buf)
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

impl Close for UdpChannel {
    type Error = ConnError;

    fn close(&mut self) -> Result<(), Self::Error> {
        self.inner.close()
    }
}

impl Connection for UdpChannel {}
