//! # libconn - transport connection toolkit
//!
//! One connection abstraction over HTTP, TCP and UDP with the same lifecycle,
//! deadline and error semantics for every transport.
//!
//! ## Features
//!
//! - **Strict endpoints**: hosts must be dotted-decimal IPv4 literals; there is
//!   no name resolution
//! - **Typed failures**: every operation returns a [`network::ConnError`]
//! - **Deadlines**: connect, read and write honour [`config::Options`]
//! - **Deterministic cleanup**: connections release their socket on `close`
//!   or when dropped, and `close` is idempotent
//! - **Byte-channel traits**: [`network::Connection`] lets other protocol
//!   stacks run over any transport
//!
//! ## Usage
//!
//! ```rust,no_run
//! use libconn::config::Options;
//! use libconn::network::manager::ConnectionManager;
//! use libconn::network::prelude::*;
//!
//! # fn main() -> Result<(), libconn::network::ConnError> {
//! let manager = ConnectionManager::new(Options::default());
//!
//! let response = manager.open_http("93.184.216.34", "/")?;
//! println!("{}", String::from_utf8_lossy(&response));
//!
//! let mut tcp = manager.open_tcp("93.184.216.34", 80)?;
//! tcp.write(b"Hello, TCP!")?;
//! tcp.close()?;
//!
//! let (mut udp, peer) = manager.open_udp("93.184.216.34", 12345)?;
//! udp.send_to(&peer, b"Hello, UDP!")?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Optional Features
//!
//! - `std` (default): socket-backed transports, the connection manager and
//!   `tracing` events. Without it the crate is `no_std` and provides the
//!   traits, endpoint parsing, HTTP framing and options.
//! - `defmt`: `defmt::Format` for errors and state enums

#![cfg_attr(not(feature = "std"), no_std)]
#![warn(missing_debug_implementations)]

/// Byte-channel traits, endpoints, lifecycle and transports.
pub mod network;

/// Deadlines and read behaviour.
pub mod config;
