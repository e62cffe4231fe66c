use std::io::{self, Read as IoRead, Write as IoWrite};
use std::net::{Shutdown, SocketAddr, SocketAddrV4, TcpStream};

use socket2::{Domain, Protocol, SockAddr, Socket, Type};
use tracing::{debug, warn};

use super::{connect_error, io_error};
use crate::config::Options;
use crate::network::error::ConnError;
use crate::network::{Close, Connection, Endpoint, Read, State, Write};

/// A stream connection that owns exactly one socket.
///
/// Created `Unopened`; [`open`](Self::open) moves it to `Open` or `Failed`.
/// Closing, explicitly or by dropping, releases the socket and marks the
/// connection `Closed` in the same step.
#[derive(Debug)]
pub struct TcpConnection {
    peer: SocketAddrV4,
    stream: Option<TcpStream>,
    state: State,
}

impl TcpConnection {
    pub fn new(endpoint: Endpoint) -> Self {
        Self {
            peer: endpoint.socket_addr(),
            stream: None,
            state: State::Unopened,
        }
    }

    /// Allocates the socket and completes the handshake within the connect
    /// deadline, then applies the read and write deadlines.
    ///
    /// Opening an already open connection does nothing. Opening a closed or
    /// failed one returns [`ConnError::NotOpen`].
    pub fn open(&mut self, options: &Options) -> Result<(), ConnError> {
        match self.state {
            State::Unopened => {}
            State::Open => return Ok(()),
            State::Closed | State::Failed => return Err(ConnError::NotOpen),
        }

        match connect_stream(self.peer, options) {
            Ok(stream) => {
                debug!(peer = %self.peer, "stream open");
                self.stream = Some(stream);
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

    pub fn peer(&self) -> SocketAddrV4 {
        self.peer
    }

    pub fn local_addr(&self) -> Result<SocketAddr, ConnError> {
        self.stream
            .as_ref()
            .ok_or(ConnError::NotOpen)?
            .local_addr()
            .map_err(|e| io_error(&e))
    }

    fn stream(&mut self) -> Result<&mut TcpStream, ConnError> {
        self.stream.as_mut().ok_or(ConnError::NotOpen)
    }
}

fn connect_stream(peer: SocketAddrV4, options: &Options) -> Result<TcpStream, ConnError> {
    let socket = Socket::new(Domain::IPV4, Type::STREAM, Some(Protocol::TCP)).map_err(|e| {
        warn!(%peer, error = %e, "stream socket allocation failed");
        ConnError::SocketCreateFailed
    })?;

    let target = SockAddr::from(peer);
    let connected = match options.connect_timeout() {
        Some(timeout) => socket.connect_timeout(&target, timeout),
        None => socket.connect(&target),
    };
    // `socket` is dropped on every early return below, releasing the handle.
    connected.map_err(|e| {
        let err = connect_error(&e);
        warn!(%peer, error = %e, kind = %err, "connect failed");
        err
    })?;

    let stream = TcpStream::from(socket);
    stream
        .set_read_timeout(options.read_timeout())
        .and_then(|()| stream.set_write_timeout(options.write_timeout()))
        .map_err(|e| io_error(&e))?;
    Ok(stream)
}

impl Read for TcpConnection {
    type Error = ConnError;

    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        let stream = self.stream()?;
        loop {
            match stream.read(buf) {
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                result => return result.map_err(|e| io_error(&e)),
            }
        }
    }
}

impl Write for TcpConnection {
    type Error = ConnError;

    /// Writes all of `buf` before returning.
    fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
        self.stream()?.write_all(buf).map_err(|e| io_error(&e))?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        self.stream()?.flush().map_err(|e| io_error(&e))
    }
}

impl Close for TcpConnection {
    type Error = ConnError;

    fn close(&mut self) -> Result<(), Self::Error> {
        if let Some(stream) = self.stream.take() {
            self.state = self.state.after_close();
            debug!(peer = %self.peer, "stream closed");
            if let Err(e) = stream.shutdown(Shutdown::Both) {
                // Peer already gone; the handle is released by the drop either way.
                debug!(peer = %self.peer, error = %e, "shutdown after peer close");
            }
        }
        Ok(())
    }
}

impl Connection for TcpConnection {}

impl Drop for TcpConnection {
    fn drop(&mut self) {
        let _ = self.close();
    }
}
