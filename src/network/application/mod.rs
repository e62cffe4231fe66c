//! # Application Layer Protocols
//!
//! Application protocols in this module work with any type implementing
//! [`Connection`](crate::network::Connection), so they run unchanged over a
//! socket-backed [`TcpConnection`](crate::network::transport::TcpConnection)
//! or over a caller-supplied channel.
//!
//! ## Available Protocols
//!
//! - **[`http`]**: HTTP/1.1 `GET` with `Connection: close`, read until the
//!   peer closes the stream

/// HTTP client implementation.
///
/// Provides request framing, response parsing and the read-until-close loop.
pub mod http;
