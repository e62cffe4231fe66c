//! Socket-backed transports.
//!
//! Sockets are allocated through `socket2` so that a failure to create the
//! handle ([`ConnError::SocketCreateFailed`]) is distinguishable from a failed
//! handshake ([`ConnError::ConnectFailed`]). Once connected, the handle is
//! converted into the matching `std::net` type.

use std::io;

use crate::network::error::ConnError;
use crate::network::{Close, Connection, Read, State, Write};

pub mod tcp;
pub mod udp;

pub use tcp::TcpConnection;
pub use udp::{UdpChannel, UdpConnection};

/// Classifies an I/O failure on an open handle.
pub(crate) fn io_error(err: &io::Error) -> ConnError {
    match err.kind() {
        io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut => ConnError::Timeout,
        _ => ConnError::IoError,
    }
}

/// Classifies a failed connect.
pub(crate) fn connect_error(err: &io::Error) -> ConnError {
    match err.kind() {
        io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut => ConnError::Timeout,
        _ => ConnError::ConnectFailed,
    }
}

/// Any transport opened from an [`Endpoint`](crate::network::Endpoint).
#[derive(Debug)]
pub enum Channel {
    Stream(TcpConnection),
    Datagram(UdpChannel),
}

impl Channel {
    pub fn state(&self) -> State {
        match self {
            Channel::Stream(c) => c.state(),
            Channel::Datagram(c) => c.state(),
        }
    }
}

impl Read for Channel {
    type Error = ConnError;

    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        match self {
            Channel::Stream(c) => c.read(buf),
            Channel::Datagram(c) => c.read(buf),
        }
    }
}

impl Write for Channel {
    type Error = ConnError;

    fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
        match self {
            Channel::Stream(c) => c.write(buf),
            Channel::Datagram(c) => c.write(buf),
        }
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        match self {
            Channel::Stream(c) => c.flush(),
            Channel::Datagram(c) => c.flush(),
        }
    }
}

impl Close for Channel {
    type Error = ConnError;

    fn close(&mut self) -> Result<(), Self::Error> {
        match self {
            Channel::Stream(c) => c.close(),
            Channel::Datagram(c) => c.close(),
        }
    }
}

impl Connection for Channel {}
