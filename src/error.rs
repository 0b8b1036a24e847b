//! src/error.rs
//!
//! Central error type for seedcrawl.
//!
//! Only *fatal* conditions live here: bad configuration before the pool
//! starts, or a worker/reporter task that failed to join. Per-URL
//! failures (bad parse, DNS miss, refused connect, capped download) are
//! silent discards inside the pipeline and never reach this type.

use std::{error::Error, fmt};

/// Top-level error type for the application.
///
/// Each variant wraps a concrete error from another library (e.g.
/// `std::io`, `tokio`), or represents an application-specific condition
/// (e.g. a zero worker count).
#[derive(Debug)]
pub enum CrawlerError {
    /// The requested worker count was below 1.
    InvalidThreadCount,

    /// Wrapper for file/stream I/O errors (opening or reading the URL list).
    Io(std::io::Error),

    /// An async task failed to join (panic/cancellation surfaced as `JoinError`).
    Join(tokio::task::JoinError),
}

/// Human-readable error messages.
///
/// `Display` is what gets shown to users by default (e.g. when `main`
/// returns `Err` and the runtime prints it).
impl fmt::Display for CrawlerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CrawlerError::InvalidThreadCount =>
                write!(f, "number of worker threads must be at least 1"),

            CrawlerError::Io(e) =>
                write!(f, "io error: {}", e),

            CrawlerError::Join(e) =>
                write!(f, "task join error: {}", e),
        }
    }
}

impl Error for CrawlerError {}

/// Allow `std::io::Error` to be converted into `CrawlerError::Io`
/// automatically, so the `?` operator works in places like
/// `let file = File::open(path)?;`.
impl From<std::io::Error> for CrawlerError {
    fn from(e: std::io::Error) -> Self {
        CrawlerError::Io(e)
    }
}

/// Convert Tokio task join failures into `CrawlerError::Join`.
///
/// This surfaces panics/cancellations from spawned tasks back to `main`.
impl From<tokio::task::JoinError> for CrawlerError {
    fn from(e: tokio::task::JoinError) -> Self {
        CrawlerError::Join(e)
    }
}
