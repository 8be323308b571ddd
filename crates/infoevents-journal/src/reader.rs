use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;

use infoevents_model::InfoRecord;

use crate::errors::JournalError;
use crate::frame::{FrameKind, JournalHeader, RecordFrame};

/// How a reader treats a frame cut short by the end of the file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadMode {
    /// Truncated frames are errors.
    Strict,
    /// Truncation is treated as end-of-file.
    Permissive,
}

/// Sequential reader over a journal file.
///
/// Reads are forward-only; the reader never seeks backwards.
pub struct JournalReader {
    input: BufReader<File>,
    mode: ReadMode,
    position: u64,
}

impl JournalReader {
    /// Opens a journal file and validates its header.
    ///
    /// # Errors
    ///
    /// Returns [`JournalError`] if the file cannot be opened or the header is
    /// invalid.
    pub fn open<P: AsRef<Path>>(path: P, mode: ReadMode) -> Result<Self, JournalError> {
        let mut input = BufReader::new(File::open(path)?);

        let mut header = [0u8; JournalHeader::SIZE];
        input.read_exact(&mut header).map_err(|e| match e.kind() {
            io::ErrorKind::UnexpectedEof => {
                JournalError::InvalidHeader("file shorter than header".to_string())
            }
            _ => JournalError::Io(e),
        })?;
        JournalHeader::decode(&header)?;

        Ok(Self {
            input,
            mode,
            position: JournalHeader::SIZE as u64,
        })
    }

    /// Byte offset of the next frame.
    pub fn position(&self) -> u64 {
        self.position
    }

    /// Reads the next frame.
    ///
    /// Returns `Ok(None)` at end-of-file, or on truncation in permissive mode.
    pub fn read_frame(&mut self) -> Result<Option<(FrameKind, Vec<u8>)>, JournalError> {
        let frame_offset = self.position;

        let mut header = [0u8; RecordFrame::SIZE];
        match read_full(&mut self.input, &mut header)? {
            0 => return Ok(None),
            n if n < header.len() => return self.truncated(frame_offset),
            _ => {}
        }
        let frame = RecordFrame::decode(&header, frame_offset)?;

        let mut payload = vec![0u8; frame.len as usize];
        if read_full(&mut self.input, &mut payload)? < payload.len() {
            return self.truncated(frame_offset);
        }

        self.position += (RecordFrame::SIZE + payload.len()) as u64;
        Ok(Some((frame.kind, payload)))
    }

    /// Reads the next record, skipping frames of unknown kinds.
    ///
    /// # Errors
    ///
    /// Returns [`JournalError`] on malformed frames, payloads that are not
    /// record JSON, truncation in strict mode, or I/O failure.
    pub fn read_record(&mut self) -> Result<Option<InfoRecord>, JournalError> {
        loop {
            let payload_offset = self.position + RecordFrame::SIZE as u64;
            match self.read_frame()? {
                None => return Ok(None),
                Some((FrameKind::Record, payload)) => {
                    let record = serde_json::from_slice(&payload).map_err(|source| {
                        JournalError::InvalidRecord {
                            offset: payload_offset,
                            source,
                        }
                    })?;
                    return Ok(Some(record));
                }
                Some((FrameKind::Unknown(_), _)) => continue,
            }
        }
    }

    fn truncated<T>(&self, offset: u64) -> Result<Option<T>, JournalError> {
        match self.mode {
            ReadMode::Permissive => Ok(None),
            ReadMode::Strict => Err(JournalError::TruncatedFrame { offset }),
        }
    }
}

impl Iterator for JournalReader {
    type Item = Result<InfoRecord, JournalError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.read_record().transpose()
    }
}

/// Fills `buf` as far as the input allows and returns the byte count read.
fn read_full<R: Read>(input: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match input.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}
