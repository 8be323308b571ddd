//! Backing-store client surface for information events.
//!
//! This crate provides:
//! - The store traits a query session consumes: [`ConnectionProvider`],
//!   [`Connection`], [`RepositoryRegistry`], [`InfoRepository`], [`PagedQuery`]
//! - Composable filter expressions over record fields
//! - Disposable [`PagingCookie`] handles backed by a server-side cursor table
//! - An in-memory backend ([`MemoryStore`]) that can be filled from a journal
//! - Record readers over journals, with optional filtering

#![deny(missing_docs)]

/// Disposable paging cookies.
pub mod cookie;
/// Error types for store operations.
pub mod error;
/// Filter expressions over record fields.
pub mod filter;
/// Journal-backed record reader.
pub mod journal;
/// In-memory backend.
pub mod memory;
/// Query requests, options and pages.
pub mod query;
/// Store traits.
pub mod traits;

pub use cookie::{CookieToken, CursorRegistry, PagingCookie};
pub use error::StoreError;
pub use filter::{Comparison, FilterElement, FilteredReader, RecordFilter, TextField};
pub use journal::JournalRecordReader;
pub use memory::{
    MemoryConnection, MemoryQuery, MemoryRegistry, MemoryRepository, MemoryStore, StoreStats,
};
pub use query::{OrderBy, QueryOptions, QueryRequest, RecordPage, SortDirection, SortField};
pub use traits::{
    Connection, ConnectionProvider, InfoRepository, PagedQuery, RecordReader,
    RepositoryRegistry, TableConfiguration,
};
pub use infoevents_journal::ReadMode;
