use crate::errors::JournalError;

/// Journal file magic bytes.
pub const MAGIC: &[u8; 4] = b"IEJ1";

/// Current journal format version.
pub const VERSION: u16 = 0x0001;

/// Largest payload a single frame may carry: 16 MiB.
pub const MAX_PAYLOAD_SIZE: u32 = 16 * 1024 * 1024;

const KIND_RECORD: u8 = 0x01;

/// Journal file header.
///
/// Layout (16 bytes): magic `IEJ1`, version (u16 LE), flags (u16 LE, zero),
/// eight reserved zero bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JournalHeader {
    /// Format version.
    pub version: u16,
}

impl JournalHeader {
    /// Encoded header size.
    pub const SIZE: usize = 16;

    /// Header for the current format version.
    pub fn current() -> Self {
        Self { version: VERSION }
    }

    /// Encodes the header.
    pub fn encode(&self) -> [u8; Self::SIZE] {
        let mut bytes = [0u8; Self::SIZE];
        bytes[..4].copy_from_slice(MAGIC);
        bytes[4..6].copy_from_slice(&self.version.to_le_bytes());
        bytes
    }

    /// Decodes and validates a header.
    pub fn decode(bytes: &[u8]) -> Result<Self, JournalError> {
        let bytes: &[u8; Self::SIZE] = bytes
            .get(..Self::SIZE)
            .and_then(|b| b.try_into().ok())
            .ok_or_else(|| {
                JournalError::InvalidHeader(format!("header too short: {} bytes", bytes.len()))
            })?;

        if &bytes[..4] != MAGIC {
            return Err(JournalError::InvalidHeader(format!(
                "invalid magic: {:?}",
                &bytes[..4]
            )));
        }

        let version = u16::from_le_bytes([bytes[4], bytes[5]]);
        if version != VERSION {
            return Err(JournalError::InvalidHeader(format!(
                "unsupported version: 0x{:04x}, expected 0x{:04x}",
                version, VERSION
            )));
        }

        let flags = u16::from_le_bytes([bytes[6], bytes[7]]);
        if flags != 0 {
            return Err(JournalError::InvalidHeader(format!(
                "non-zero flags: 0x{:04x}",
                flags
            )));
        }

        if bytes[8..].iter().any(|b| *b != 0) {
            return Err(JournalError::InvalidHeader(
                "non-zero reserved bytes".to_string(),
            ));
        }

        Ok(Self { version })
    }
}

/// Kind of a frame's payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameKind {
    /// One `InfoRecord` as UTF-8 JSON.
    Record,
    /// Kind this reader does not understand; skipped on read.
    Unknown(u8),
}

impl From<u8> for FrameKind {
    fn from(byte: u8) -> Self {
        match byte {
            KIND_RECORD => FrameKind::Record,
            other => FrameKind::Unknown(other),
        }
    }
}

impl From<FrameKind> for u8 {
    fn from(kind: FrameKind) -> Self {
        match kind {
            FrameKind::Record => KIND_RECORD,
            FrameKind::Unknown(b) => b,
        }
    }
}

/// Frame header preceding every payload.
///
/// Layout (8 bytes): kind, three reserved zero bytes, payload length (u32 LE).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordFrame {
    /// Payload kind.
    pub kind: FrameKind,
    /// Payload length in bytes.
    pub len: u32,
}

impl RecordFrame {
    /// Encoded frame header size.
    pub const SIZE: usize = 8;

    /// Creates a frame header for a payload of `len` bytes.
    pub fn new(kind: FrameKind, len: usize) -> Result<Self, JournalError> {
        match u32::try_from(len) {
            Ok(len) if len <= MAX_PAYLOAD_SIZE => Ok(Self { kind, len }),
            _ => Err(JournalError::PayloadTooLarge {
                size: len,
                max: MAX_PAYLOAD_SIZE,
            }),
        }
    }

    /// Encodes the frame header.
    pub fn encode(&self) -> [u8; Self::SIZE] {
        let mut bytes = [0u8; Self::SIZE];
        bytes[0] = self.kind.into();
        bytes[4..].copy_from_slice(&self.len.to_le_bytes());
        bytes
    }

    /// Decodes a frame header found at `offset`.
    pub fn decode(bytes: &[u8; Self::SIZE], offset: u64) -> Result<Self, JournalError> {
        if bytes[1..4] != [0u8; 3] {
            return Err(JournalError::InvalidFrame {
                offset,
                reason: "non-zero reserved bytes".to_string(),
            });
        }

        let len = u32::from_le_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]);
        if len > MAX_PAYLOAD_SIZE {
            return Err(JournalError::InvalidFrame {
                offset,
                reason: format!("payload size {} exceeds maximum {}", len, MAX_PAYLOAD_SIZE),
            });
        }

        Ok(Self {
            kind: FrameKind::from(bytes[0]),
            len,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_round_trip() {
        let header = JournalHeader::current();
        assert_eq!(JournalHeader::decode(&header.encode()).unwrap(), header);
    }

    #[test]
    fn header_rejects_foreign_magic() {
        let mut bytes = JournalHeader::current().encode();
        bytes[..4].copy_from_slice(b"NRJ1");
        assert!(JournalHeader::decode(&bytes).is_err());
    }

    #[test]
    fn header_rejects_unknown_version() {
        let mut bytes = JournalHeader::current().encode();
        bytes[4] = 0x02;
        let err = JournalHeader::decode(&bytes).unwrap_err();
        assert!(err.to_string().contains("version"));
    }

    #[test]
    fn header_rejects_flags() {
        let mut bytes = JournalHeader::current().encode();
        bytes[6] = 0x01;
        assert!(JournalHeader::decode(&bytes).is_err());
    }

    #[test]
    fn header_rejects_short_input() {
        assert!(JournalHeader::decode(b"IEJ1").is_err());
    }

    #[test]
    fn frame_rejects_oversized_payload() {
        assert!(RecordFrame::new(FrameKind::Record, MAX_PAYLOAD_SIZE as usize + 1).is_err());
    }

    #[test]
    fn frame_rejects_reserved_bytes() {
        let mut bytes = RecordFrame::new(FrameKind::Record, 100).unwrap().encode();
        bytes[2] = 0x01;
        let err = RecordFrame::decode(&bytes, 16).unwrap_err();
        assert!(matches!(err, JournalError::InvalidFrame { offset: 16, .. }));
    }

    #[test]
    fn unknown_kind_keeps_its_byte() {
        let kind = FrameKind::from(0xEE);
        assert_eq!(kind, FrameKind::Unknown(0xEE));
        assert_eq!(u8::from(kind), 0xEE);
    }
}
