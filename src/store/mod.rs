//! Backing-store subsystem.
//!
//! # Data Flow
//! ```text
//! Request arrives
//!     → connection gate asks cache.ensure()
//!     → warm: cached handle returned, zero I/O
//!     → cold: one bounded connect + ping, handle cached on success
//!     → handle (a pooled driver client) shared with route groups
//! ```
//!
//! # Design Decisions
//! - Exactly one authoritative connection handle per process; the host
//!   recycles the whole process, so the cache's lifetime is the process's
//! - Failures are surfaced, never cached; the next request retries
//! - The connect primitive sits behind the `Connector` trait so tests can
//!   substitute a counting fake for the real driver

pub mod cache;

pub use cache::{ConnectionCache, Connector, MongoConnector, StoreHandle, StoreStatus};

use std::time::Duration;
use thiserror::Error;

/// Failures surfaced by the connection cache.
#[derive(Debug, Error)]
pub enum StoreError {
    /// No connection string was configured for this process.
    #[error("no backing store connection string configured")]
    MissingUri,

    /// The connection string could not be parsed by the driver.
    #[error("invalid backing store connection string: {0}")]
    InvalidUri(#[source] mongodb::error::Error),

    /// The store did not answer the verification ping.
    #[error("backing store unreachable: {0}")]
    Unreachable(#[source] mongodb::error::Error),

    /// The connect attempt exceeded the configured bound.
    #[error("backing store connect timed out after {0:?}")]
    Timeout(Duration),
}
