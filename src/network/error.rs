//! Common error types for connection operations

use core::fmt;

/// The error type returned by every connection operation.
///
/// This enum is deliberately small and `Copy` so it stays usable in `no_std`
/// environments. Socket-level `std::io::Error`s are classified into one of
/// these variants at the transport boundary.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum ConnError {
    /// The host is not a dotted-decimal IPv4 literal, or the endpoint text is
    /// malformed.
    InvalidAddress,
    /// The underlying socket could not be allocated or bound.
    SocketCreateFailed,
    /// The stream handshake was refused or the peer was unreachable.
    ConnectFailed,
    /// A connect, read or write deadline expired.
    Timeout,
    /// A send or receive failed after the connection was open.
    IoError,
    /// An operation was attempted on a connection that is not open.
    NotOpen,
    /// A request could not be framed, or a response was malformed.
    ProtocolError,
}

impl fmt::Display for ConnError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            ConnError::InvalidAddress => "invalid address",
            ConnError::SocketCreateFailed => "socket creation failed",
            ConnError::ConnectFailed => "connection failed",
            ConnError::Timeout => "operation timed out",
            ConnError::IoError => "i/o error on open connection",
            ConnError::NotOpen => "connection is not open",
            ConnError::ProtocolError => "protocol error",
        };
        f.write_str(msg)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ConnError {}

#[cfg(feature = "defmt")]
impl defmt::Format for ConnError {
    fn format(&self, f: defmt::Formatter) {
        match self {
            ConnError::InvalidAddress => defmt::write!(f, "InvalidAddress"),
            ConnError::SocketCreateFailed => defmt::write!(f, "SocketCreateFailed"),
            ConnError::ConnectFailed => defmt::write!(f, "ConnectFailed"),
            ConnError::Timeout => defmt::write!(f, "Timeout"),
            ConnError::IoError => defmt::write!(f, "IoError"),
            ConnError::NotOpen => defmt::write!(f, "NotOpen"),
            ConnError::ProtocolError => defmt::write!(f, "ProtocolError"),
        }
    }
}
