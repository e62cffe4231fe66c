//! Connection options.
//!
//! Deadlines are stored as whole milliseconds so that options can be loaded
//! from a small JSON document on targets without an allocator:
//!
//! ```rust
//! use libconn::config::Options;
//!
//! let opts = Options::from_json(r#"{"connect_timeout_ms": 1000, "strict_reads": true}"#).unwrap();
//! assert_eq!(opts.connect_timeout_ms, 1000);
//! assert_eq!(opts.read_timeout_ms, 10_000);
//! assert!(opts.strict_reads);
//! ```

use core::time::Duration;
use serde::Deserialize;

/// Deadline applied to connect, read and write when none is configured.
pub const DEFAULT_TIMEOUT_MS: u32 = 10_000;

/// Error returned when options cannot be loaded.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// The document is not valid JSON or has a field of the wrong type.
    Malformed,
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ConfigError::Malformed => f.write_str("malformed options document"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ConfigError {}

/// Deadlines and read behaviour for every connection a manager opens.
///
/// A timeout of `0` disables that deadline and lets the operation block for
/// as long as the operating system allows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Options {
    pub connect_timeout_ms: u32,
    pub read_timeout_ms: u32,
    pub write_timeout_ms: u32,
    /// Report failed reads as [`ConnError::IoError`](crate::network::ConnError::IoError)
    /// instead of treating them as end of stream.
    pub strict_reads: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            connect_timeout_ms: DEFAULT_TIMEOUT_MS,
            read_timeout_ms: DEFAULT_TIMEOUT_MS,
            write_timeout_ms: DEFAULT_TIMEOUT_MS,
            strict_reads: false,
        }
    }
}

impl Options {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        serde_json_core::from_str::<Options>(json)
            .map(|(opts, _)| opts)
            .map_err(|_| ConfigError::Malformed)
    }

    pub fn connect_timeout(&self) -> Option<Duration> {
        deadline(self.connect_timeout_ms)
    }

    pub fn read_timeout(&self) -> Option<Duration> {
        deadline(self.read_timeout_ms)
    }

    pub fn write_timeout(&self) -> Option<Duration> {
        deadline(self.write_timeout_ms)
    }

    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout_ms = millis(timeout);
        self
    }

    pub fn with_read_timeout(mut self, timeout: Duration) -> Self {
        self.read_timeout_ms = millis(timeout);
        self
    }

    pub fn with_write_timeout(mut self, timeout: Duration) -> Self {
        self.write_timeout_ms = millis(timeout);
        self
    }

    pub fn with_strict_reads(mut self, strict: bool) -> Self {
        self.strict_reads = strict;
        self
    }
}

fn deadline(ms: u32) -> Option<Duration> {
    (ms > 0).then(|| Duration::from_millis(u64::from(ms)))
}

// Sub-millisecond durations round up so a tiny non-zero deadline never turns
// into "no deadline".
fn millis(timeout: Duration) -> u32 {
    let ms = timeout.as_nanos().div_ceil(1_000_000);
    u32::try_from(ms).unwrap_or(u32::MAX)
}
