//! Append-only journal format for information event records.
//!
//! A journal is a 16-byte header followed by length-prefixed frames. Record
//! frames carry one [`InfoRecord`](infoevents_model::InfoRecord) serialized as
//! JSON; frames of unknown kinds are skipped by readers so the format can grow
//! without breaking older tools.
//!
//! ```rust,no_run
//! use infoevents_journal::{JournalReader, JournalWriter, ReadMode, WriteOptions};
//! # use infoevents_model::{parse_timestamp, InfoRecord, TreeId};
//! # let record = InfoRecord {
//! #     element_name: "Encoder 1".into(),
//! #     parameter_name: "CPU overload".into(),
//! #     value: "97 %".into(),
//! #     time_of_arrival: parse_timestamp("2025-01-01T00:00:00Z")?,
//! #     tree_id: TreeId::new(1, 1),
//! # };
//!
//! let mut writer = JournalWriter::open("events.iej", WriteOptions::default())?;
//! writer.append_record(&record)?;
//! writer.finish()?;
//!
//! let mut reader = JournalReader::open("events.iej", ReadMode::Strict)?;
//! while let Some(record) = reader.read_record()? {
//!     println!("{} {}", record.tree_id, record.parameter_name);
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![deny(missing_docs)]

/// Error types for journal operations.
pub mod errors;
/// Header and frame layout.
pub mod frame;
/// Journal reader implementation.
pub mod reader;
/// Journal writer implementation.
pub mod writer;

pub use errors::JournalError;
pub use frame::{FrameKind, JournalHeader, RecordFrame};
pub use reader::{JournalReader, ReadMode};
pub use writer::{JournalWriter, WriteOptions};
