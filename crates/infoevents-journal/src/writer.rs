use std::fs::{File, OpenOptions};
use std::io::{self, Read, Seek, Write};
use std::path::Path;

use infoevents_model::InfoRecord;

use crate::errors::JournalError;
use crate::frame::{FrameKind, JournalHeader, RecordFrame};

/// Options for journal writing.
#[derive(Debug, Clone)]
pub struct WriteOptions {
    /// Whether to fsync after each append (default: false).
    pub sync: bool,
    /// Whether to create the file if it doesn't exist (default: true).
    pub create: bool,
    /// Whether to keep existing frames; `false` truncates to the header (default: true).
    pub append: bool,
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self {
            sync: false,
            create: true,
            append: true,
        }
    }
}

/// Append-only writer for journal files.
///
/// An empty file receives a fresh header; an existing file must already carry
/// a valid one.
pub struct JournalWriter {
    file: File,
    sync: bool,
}

impl JournalWriter {
    /// Opens or creates a journal file for writing.
    ///
    /// # Errors
    ///
    /// Returns [`JournalError`] if the file cannot be opened, is not a
    /// journal, or is non-empty but shorter than a header.
    pub fn open<P: AsRef<Path>>(path: P, options: WriteOptions) -> Result<Self, JournalError> {
        let mut file = OpenOptions::new()
            .create(options.create)
            .read(true)
            .write(true)
            .open(path)?;

        let len = file.metadata()?.len();
        let header_len = JournalHeader::SIZE as u64;

        if len == 0 {
            file.write_all(&JournalHeader::current().encode())?;
        } else if len < header_len {
            return Err(JournalError::FileNotEmpty);
        } else {
            let mut header = [0u8; JournalHeader::SIZE];
            file.seek(io::SeekFrom::Start(0))?;
            file.read_exact(&mut header)?;
            JournalHeader::decode(&header)?;

            if options.append {
                file.seek(io::SeekFrom::End(0))?;
            } else {
                file.set_len(header_len)?;
                file.seek(io::SeekFrom::Start(header_len))?;
            }
        }

        let mut writer = Self {
            file,
            sync: options.sync,
        };
        writer.flush()?;
        Ok(writer)
    }

    /// Appends one record as a `Record` frame.
    pub fn append_record(&mut self, record: &InfoRecord) -> Result<(), JournalError> {
        let payload = serde_json::to_vec(record)?;
        self.append_raw(FrameKind::Record, &payload)
    }

    /// Appends a raw frame with the given kind and payload.
    pub fn append_raw(&mut self, kind: FrameKind, payload: &[u8]) -> Result<(), JournalError> {
        let frame = RecordFrame::new(kind, payload.len())?;
        self.file.write_all(&frame.encode())?;
        self.file.write_all(payload)?;
        self.flush()
    }

    /// Flushes and closes the journal.
    pub fn finish(mut self) -> Result<(), JournalError> {
        self.flush()
    }

    fn flush(&mut self) -> Result<(), JournalError> {
        self.file.flush()?;
        if self.sync {
            self.file.sync_all()?;
        }
        Ok(())
    }
}
