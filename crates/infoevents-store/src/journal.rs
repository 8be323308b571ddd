//! Journal-backed record reader.

use std::path::Path;

use infoevents_journal::{JournalReader, ReadMode};
use infoevents_model::InfoRecord;

use crate::error::StoreError;
use crate::traits::RecordReader;

/// Reads records from a journal file.
pub struct JournalRecordReader {
    reader: JournalReader,
}

impl JournalRecordReader {
    /// Opens a journal file.
    pub fn open<P: AsRef<Path>>(path: P, mode: ReadMode) -> Result<Self, StoreError> {
        Ok(Self {
            reader: JournalReader::open(path, mode)?,
        })
    }
}

impl RecordReader for JournalRecordReader {
    fn read_next(&mut self) -> Result<Option<InfoRecord>, StoreError> {
        Ok(self.reader.read_record()?)
    }
}
