//! HTTP/1.1 `GET` over a byte channel.
//!
//! The request sent is always exactly
//!
//! ```text
//! GET {path} HTTP/1.1\r\n
//! Host: {host}\r\n
//! Connection: close\r\n
//! \r\n
//! ```
//!
//! and the response is every byte the peer sends until it closes the stream.
//! Framing and parsing need no allocator; collecting the response into a
//! `Vec` requires the `std` feature.
//!
//! ```rust
//! use libconn::network::application::http::{Request, Response};
//!
//! let request = Request::get("/status", "10.0.0.1");
//! let bytes = request.encode().unwrap();
//! assert!(bytes.starts_with(b"GET /status HTTP/1.1\r\n"));
//!
//! let response = Response::parse(b"HTTP/1.1 200 OK\r\nServer: x\r\n\r\nhello").unwrap();
//! assert_eq!(response.status_code, 200);
//! assert_eq!(response.body, b"hello");
//! ```

/// HTTP client implementation and supporting types.
pub mod client;

pub use client::{Client, Header, Method, Request, Response};
