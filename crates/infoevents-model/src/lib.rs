//! Record and identifier types for the information events feed.
//!
//! Every crate in the workspace speaks in terms of [`InfoRecord`]: the journal
//! stores it, the store filters and pages it, the source projects it into
//! output rows.
//!
#![deny(missing_docs)]

/// Identifiers attached to information events.
pub mod identifiers;
/// The information event record.
pub mod record;
/// Timestamp parsing helpers.
pub mod time;
/// Validation errors for model primitives.
pub mod validation;

pub use identifiers::TreeId;
pub use record::InfoRecord;
pub use time::{parse_timestamp, parse_utc};
pub use validation::ValidationError;
