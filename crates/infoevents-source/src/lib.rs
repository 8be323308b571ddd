//! Paginated query sessions over information events.
//!
//! A [`QuerySession`] takes caller arguments (`From`, `Until`, `Search term`),
//! turns them into a store filter once, and then serves the matching records
//! newest first, one bounded page per [`next_page`](QuerySession::next_page)
//! call, until a page comes back empty.
//!
//! This crate provides:
//! - Argument and output column declarations ([`ARGUMENTS`], [`COLUMNS`])
//! - The filter builder ([`build_filter`])
//! - The cursor manager that owns the session's single paging cookie
//! - The page fetcher and row mapper
//! - The session state machine and its configuration
//!
//! ```no_run
//! use infoevents_source::{ArgumentValue, ArgumentValues, QuerySession, SessionConfig, FROM};
//! use infoevents_store::MemoryStore;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let store = MemoryStore::new();
//! let mut session = QuerySession::new(SessionConfig::default())?;
//! session.initialize(store)?;
//! session.process_arguments(
//!     &ArgumentValues::new().with(FROM, ArgumentValue::Timestamp("2025-01-01T00:00:00Z".parse()?)),
//! )?;
//! session.prepare_fetch()?;
//! loop {
//!     let page = session.next_page()?;
//!     if !page.has_next_page {
//!         break;
//!     }
//!     for row in &page.rows {
//!         println!("{} {}", row.time, row.origin);
//!     }
//! }
//! session.destroy();
//! # Ok(())
//! # }
//! ```
#![deny(missing_docs)]

/// Input argument declarations and captured values.
pub mod args;
/// Output column declarations and rows.
pub mod columns;
/// Session configuration.
pub mod config;
/// Paging cookie ownership for one session.
pub mod cursor;
/// Error types for query sessions.
pub mod error;
/// One page fetch cycle.
pub mod fetch;
/// Filter construction from query parameters.
pub mod filter;
/// Record to row projection.
pub mod mapper;
/// Captured query parameters.
pub mod params;
/// Session state machine.
pub mod session;

pub use args::{
    ArgumentKind, ArgumentSpec, ArgumentValue, ArgumentValues, ARGUMENTS, FROM, SEARCH_TERM, UNTIL,
};
pub use columns::{Cell, ColumnKind, ColumnSpec, OutputRow, COLUMNS};
pub use config::SessionConfig;
pub use cursor::CursorManager;
pub use error::SourceError;
pub use fetch::{Page, PageFetcher};
pub use filter::build_filter;
pub use mapper::map_record;
pub use params::QueryParameters;
pub use session::{QuerySession, SessionPhase};
