//! Walks through the three transports against one host.
//!
//! 1. HTTP `GET /` on port 80, printing the response body to stdout
//! 2. TCP to port 80, sending a short text payload
//! 3. UDP to port 12345, sending a short text payload
//!
//! A failing step is reported on stderr and the walkthrough moves on; the
//! process always exits with status 0.
//!
//! ```text
//! LIBCONN_DEMO_HOST=127.0.0.1 RUST_LOG=libconn=debug cargo run --example protocols
//! ```

use dotenvy::dotenv;
use std::env;
use std::io::Write as _;

use libconn::config::Options;
use libconn::network::application::http::Response;
use libconn::network::manager::ConnectionManager;
use libconn::network::prelude::*;
use libconn::network::ConnError;
use tracing_subscriber::EnvFilter;

const DEFAULT_HOST: &str = "93.184.216.34";
const UDP_PORT: u16 = 12345;

fn main() {
    dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let host = env::var("LIBCONN_DEMO_HOST").unwrap_or(DEFAULT_HOST.to_string());
    let options = match env::var("LIBCONN_OPTIONS") {
        Ok(json) => Options::from_json(&json).unwrap_or_else(|e| {
            eprintln!("Ignoring LIBCONN_OPTIONS: {e}");
            Options::default()
        }),
        Err(_) => Options::default(),
    };
    let manager = ConnectionManager::new(options);

    println!("Connecting to HTTP server...");
    if let Err(e) = http_step(&manager, &host) {
        eprintln!("HTTP step failed: {e}");
    }

    println!("\nConnecting to TCP server...");
    if let Err(e) = tcp_step(&manager, &host) {
        eprintln!("TCP step failed: {e}");
    }

    println!("\nConnecting to UDP server...");
    if let Err(e) = udp_step(&manager, &host) {
        eprintln!("UDP step failed: {e}");
    }
}

fn http_step(manager: &ConnectionManager, host: &str) -> Result<(), ConnError> {
    let raw = manager.open_http(host, "/")?;
    let body = match Response::parse(&raw) {
        Ok(response) => response.body,
        // Not recognisably HTTP; show everything that arrived.
        Err(_) => raw.as_slice(),
    };
    let mut stdout = std::io::stdout().lock();
    stdout
        .write_all(body)
        .and_then(|()| stdout.flush())
        .map_err(|_| ConnError::IoError)
}

fn tcp_step(manager: &ConnectionManager, host: &str) -> Result<(), ConnError> {
    let mut conn = manager.open_tcp(host, 80)?;
    conn.write(b"Hello, TCP!")?;
    conn.close()
}

fn udp_step(manager: &ConnectionManager, host: &str) -> Result<(), ConnError> {
    let (mut udp, peer) = manager.open_udp(host, UDP_PORT)?;
    udp.send_to(&peer, b"Hello, UDP!")?;
    udp.close()
}
