//! Error types for store operations.

use std::time::Duration;

use thiserror::Error;

use crate::cookie::CookieToken;

/// Errors that can occur during store operations.
#[derive(Error, Debug)]
pub enum StoreError {
    /// I/O error while loading records.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// Journal backend error.
    #[error("journal error: {0}")]
    Journal(#[from] infoevents_journal::JournalError),
    /// The resource was already disposed.
    #[error("{resource} already disposed")]
    Disposed {
        /// Kind of resource (connection, registry, repository).
        resource: &'static str,
    },
    /// The store does not know this paging cookie (expired or released).
    #[error("unknown paging cookie {0}")]
    UnknownCookie(CookieToken),
    /// Query execution exceeded its timeout.
    #[error("query timed out after {elapsed:?} (limit {limit:?})")]
    Timeout {
        /// Time the execution took or would have taken.
        elapsed: Duration,
        /// Configured timeout.
        limit: Duration,
    },
    /// The store refused or failed the request.
    #[error("store unavailable: {0}")]
    Unavailable(String),
    /// Repository registry could not be built.
    #[error("registry error: {0}")]
    Registry(String),
    /// Query shape or options are invalid.
    #[error("invalid query: {0}")]
    InvalidQuery(String),
}
