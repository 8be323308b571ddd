use thiserror::Error;

/// Errors that can occur during journal operations.
#[derive(Error, Debug)]
pub enum JournalError {
    /// I/O error during read or write.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// Invalid file header (magic, version, flags or reserved bytes).
    #[error("invalid journal header: {0}")]
    InvalidHeader(String),
    /// Invalid frame structure.
    #[error("invalid frame at offset {offset}: {reason}")]
    InvalidFrame {
        /// Byte offset where the frame starts.
        offset: u64,
        /// Reason for invalidity.
        reason: String,
    },
    /// Payload exceeds the frame size ceiling.
    #[error("payload size {size} exceeds maximum {max}")]
    PayloadTooLarge {
        /// Actual payload size.
        size: usize,
        /// Maximum allowed size.
        max: u32,
    },
    /// Record payload is not valid record JSON.
    #[error("invalid record payload at offset {offset}: {source}")]
    InvalidRecord {
        /// Byte offset of the payload.
        offset: u64,
        /// Underlying decode error.
        #[source]
        source: serde_json::Error,
    },
    /// Record could not be encoded.
    #[error("record encoding failed: {0}")]
    Encode(#[from] serde_json::Error),
    /// File is too short to hold a header but is not empty.
    #[error("file is not empty; cannot initialize header")]
    FileNotEmpty,
    /// Truncated frame detected in strict mode.
    #[error("truncated frame at offset {offset}")]
    TruncatedFrame {
        /// Byte offset where truncation occurred.
        offset: u64,
    },
}
