//! A transport abstraction layer
//!
//! This module defines the byte-channel traits every transport implements,
//! together with strict endpoint parsing, the connection lifecycle and, with
//! the `std` feature, the socket-backed transports and the
//! [`ConnectionManager`](manager::ConnectionManager).
//!
//! Hardware buses (Serial, I2C, SPI, CAN) and higher-level protocols (MQTT,
//! FTP) are not implemented here. They are expected to implement or consume
//! the same [`Connection`] traits once a transport-level channel exists.

#![deny(unsafe_code)]

/// Common error types for connection operations
pub mod error;

/// Endpoints, peer addresses and strict IPv4 parsing
pub mod endpoint;

/// Connection lifecycle states
pub mod state;

/// Application protocols layered over a [`Connection`]
pub mod application;

/// Socket-backed stream and datagram transports
#[cfg(feature = "std")]
pub mod transport;

/// Opening transports from endpoints
#[cfg(feature = "std")]
pub mod manager;

pub use endpoint::{Endpoint, PeerAddress, Transport};
pub use error::ConnError;
pub use state::State;

/// Re-exports of common traits
pub mod prelude {
    pub use super::{Close, Connect, Connection, Read, UdpSocket, Write};
}

/// Reads bytes from a channel.
pub trait Read {
    /// Associated error type
    type Error: core::fmt::Debug;
    /// Read data from the channel. `Ok(0)` means the peer closed the stream.
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error>;
}

/// Writes bytes to a channel.
pub trait Write {
    /// Associated error type
    type Error: core::fmt::Debug;
    /// Write data to the channel
    fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error>;
    /// Flush the write buffer
    fn flush(&mut self) -> Result<(), Self::Error>;
}

/// Releases a channel's handle.
pub trait Close {
    /// Associated error type
    type Error: core::fmt::Debug;
    /// Close the channel. Closing an already closed channel is a no-op that
    /// returns `Ok(())`.
    fn close(&mut self) -> Result<(), Self::Error>;
}

/// A bidirectional byte channel.
///
/// This is the capability other protocol stacks build on: anything that can
/// read, write and close bytes qualifies, whether it is a TCP stream, a UDP
/// socket bound to a single peer or a UART driver living outside this crate.
pub trait Connection: Read + Write + Close {}

/// A synchronous connector (client)
pub trait Connect {
    /// Associated connection type
    type Connection: Connection;
    /// Associated error type
    type Error: core::fmt::Debug;
    /// Open a connection to `remote`
    fn connect(&mut self, remote: &str) -> Result<Self::Connection, Self::Error>;
}

/// A connectionless datagram socket.
///
/// No handshake takes place, so the peer must be supplied on every send.
pub trait UdpSocket {
    /// Associated error type
    type Error: core::fmt::Debug;
    /// Send one datagram to `peer`
    fn send_to(&mut self, peer: &PeerAddress, buf: &[u8]) -> Result<usize, Self::Error>;
    /// Receive one datagram and report who sent it
    fn recv_from(&mut self, buf: &mut [u8]) -> Result<(usize, PeerAddress), Self::Error>;
}
