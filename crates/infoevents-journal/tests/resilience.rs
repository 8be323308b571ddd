use infoevents_journal::frame::MAX_PAYLOAD_SIZE;
use infoevents_journal::{
    FrameKind, JournalError, JournalReader, JournalWriter, ReadMode, WriteOptions,
};
use infoevents_model::{parse_timestamp, InfoRecord, TreeId};
use std::fs;
use std::io::{Seek, Write};
use tempfile::TempDir;

fn make_record(id: u32) -> InfoRecord {
    InfoRecord {
        element_name: "Router 7".to_string(),
        parameter_name: "Link state".to_string(),
        value: "down".to_string(),
        time_of_arrival: parse_timestamp("2025-06-01T08:30:00+02:00").unwrap(),
        tree_id: TreeId::new(7, id),
    }
}

fn write_journal(path: &std::path::Path, ids: &[u32]) {
    let mut writer = JournalWriter::open(path, WriteOptions::default()).unwrap();
    for id in ids {
        writer.append_record(&make_record(*id)).unwrap();
    }
    writer.finish().unwrap();
}

#[test]
fn test_payload_size_limit() {
    let temp_dir = TempDir::new().unwrap();
    let journal_path = temp_dir.path().join("test.iej");

    let oversized = vec![0u8; MAX_PAYLOAD_SIZE as usize + 1];
    let mut writer = JournalWriter::open(&journal_path, WriteOptions::default()).unwrap();

    match writer.append_raw(FrameKind::Record, &oversized) {
        Err(JournalError::PayloadTooLarge { size, max }) => {
            assert_eq!(size, MAX_PAYLOAD_SIZE as usize + 1);
            assert_eq!(max, MAX_PAYLOAD_SIZE);
        }
        other => panic!("expected PayloadTooLarge, got {:?}", other.map(|_| ())),
    }
}

#[test]
fn test_frame_reserved_bytes_must_be_zero() {
    let temp_dir = TempDir::new().unwrap();
    let journal_path = temp_dir.path().join("test.iej");
    write_journal(&journal_path, &[1]);

    let mut file = fs::OpenOptions::new()
        .write(true)
        .open(&journal_path)
        .unwrap();
    file.seek(std::io::SeekFrom::Start(16 + 1)).unwrap();
    file.write_all(&[0x01]).unwrap();
    drop(file);

    let mut reader = JournalReader::open(&journal_path, ReadMode::Strict).unwrap();
    assert!(matches!(
        reader.read_frame(),
        Err(JournalError::InvalidFrame { offset: 16, .. })
    ));
}

#[test]
fn test_header_reserved_bytes_must_be_zero() {
    let temp_dir = TempDir::new().unwrap();
    let journal_path = temp_dir.path().join("test.iej");
    write_journal(&journal_path, &[1]);

    let mut file = fs::OpenOptions::new()
        .write(true)
        .open(&journal_path)
        .unwrap();
    file.seek(std::io::SeekFrom::Start(8)).unwrap();
    file.write_all(&[0xAA; 8]).unwrap();
    drop(file);

    assert!(JournalReader::open(&journal_path, ReadMode::Strict).is_err());
}

#[test]
fn test_partial_write_handling() {
    let temp_dir = TempDir::new().unwrap();
    let journal_path = temp_dir.path().join("test.iej");
    write_journal(&journal_path, &[1, 2]);

    let first_end = {
        let mut reader = JournalReader::open(&journal_path, ReadMode::Strict).unwrap();
        reader.read_record().unwrap().unwrap();
        reader.position()
    };

    let file = fs::OpenOptions::new()
        .write(true)
        .open(&journal_path)
        .unwrap();
    file.set_len(first_end + 10).unwrap();
    drop(file);

    {
        let mut reader = JournalReader::open(&journal_path, ReadMode::Strict).unwrap();
        assert_eq!(reader.read_record().unwrap().unwrap().tree_id.id, 1);
        assert!(matches!(
            reader.read_record(),
            Err(JournalError::TruncatedFrame { offset }) if offset == first_end
        ));
    }

    {
        let mut reader = JournalReader::open(&journal_path, ReadMode::Permissive).unwrap();
        assert_eq!(reader.read_record().unwrap().unwrap().tree_id.id, 1);
        assert!(reader.read_record().unwrap().is_none());
    }
}

#[test]
fn test_truncated_frame_header() {
    let temp_dir = TempDir::new().unwrap();
    let journal_path = temp_dir.path().join("test.iej");
    write_journal(&journal_path, &[]);

    let mut file = fs::OpenOptions::new()
        .append(true)
        .open(&journal_path)
        .unwrap();
    file.write_all(&[0x01, 0x00, 0x00]).unwrap();
    drop(file);

    let mut strict = JournalReader::open(&journal_path, ReadMode::Strict).unwrap();
    assert!(strict.read_record().is_err());

    let mut permissive = JournalReader::open(&journal_path, ReadMode::Permissive).unwrap();
    assert!(permissive.read_record().unwrap().is_none());
}

#[test]
fn test_unknown_frame_kind_skipped() {
    let temp_dir = TempDir::new().unwrap();
    let journal_path = temp_dir.path().join("test.iej");
    write_journal(&journal_path, &[1]);

    let mut file = fs::OpenOptions::new()
        .append(true)
        .open(&journal_path)
        .unwrap();
    let mut frame_header = [0u8; 8];
    frame_header[0] = 0xFF;
    frame_header[4..8].copy_from_slice(&10u32.to_le_bytes());
    file.write_all(&frame_header).unwrap();
    file.write_all(b"unknown123").unwrap();
    drop(file);

    {
        let mut writer = JournalWriter::open(&journal_path, WriteOptions::default()).unwrap();
        writer.append_record(&make_record(2)).unwrap();
        writer.finish().unwrap();
    }

    let reader = JournalReader::open(&journal_path, ReadMode::Strict).unwrap();
    let ids: Vec<u32> = reader.map(|r| r.unwrap().tree_id.id).collect();
    assert_eq!(ids, vec![1, 2]);
}

#[test]
fn test_garbage_record_payload_reports_offset() {
    let temp_dir = TempDir::new().unwrap();
    let journal_path = temp_dir.path().join("test.iej");

    {
        let mut writer = JournalWriter::open(&journal_path, WriteOptions::default()).unwrap();
        writer.append_raw(FrameKind::Record, b"{not json").unwrap();
        writer.finish().unwrap();
    }

    let mut reader = JournalReader::open(&journal_path, ReadMode::Permissive).unwrap();
    assert!(matches!(
        reader.read_record(),
        Err(JournalError::InvalidRecord { offset: 24, .. })
    ));
}
