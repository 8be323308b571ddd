use infoevents_journal::{JournalReader, JournalWriter, ReadMode, WriteOptions};
use infoevents_model::{parse_timestamp, InfoRecord, TreeId};
use std::fs;
use tempfile::TempDir;

fn make_record(id: u32, parameter: &str) -> InfoRecord {
    InfoRecord {
        element_name: "Encoder 1".to_string(),
        parameter_name: parameter.to_string(),
        value: format!("value {}", id),
        time_of_arrival: parse_timestamp("2025-01-01T00:00:00Z").unwrap(),
        tree_id: TreeId::new(100, id),
    }
}

#[test]
fn test_write_read_round_trip() {
    let temp_dir = TempDir::new().unwrap();
    let journal_path = temp_dir.path().join("test.iej");

    {
        let mut writer = JournalWriter::open(&journal_path, WriteOptions::default()).unwrap();
        writer.append_record(&make_record(1, "CPU overload")).unwrap();
        writer.append_record(&make_record(2, "Fan speed")).unwrap();
        writer.finish().unwrap();
    }

    let mut reader = JournalReader::open(&journal_path, ReadMode::Strict).unwrap();
    let first = reader.read_record().unwrap().unwrap();
    let second = reader.read_record().unwrap().unwrap();
    assert_eq!(first, make_record(1, "CPU overload"));
    assert_eq!(second, make_record(2, "Fan speed"));
    assert!(reader.read_record().unwrap().is_none());
}

#[test]
fn test_append_to_existing() {
    let temp_dir = TempDir::new().unwrap();
    let journal_path = temp_dir.path().join("test.iej");

    for id in 1..=2 {
        let mut writer = JournalWriter::open(&journal_path, WriteOptions::default()).unwrap();
        writer.append_record(&make_record(id, "CPU overload")).unwrap();
        writer.finish().unwrap();
    }

    let reader = JournalReader::open(&journal_path, ReadMode::Strict).unwrap();
    let ids: Vec<u32> = reader.map(|r| r.unwrap().tree_id.id).collect();
    assert_eq!(ids, vec![1, 2]);
}

#[test]
fn test_truncate_on_open_without_append() {
    let temp_dir = TempDir::new().unwrap();
    let journal_path = temp_dir.path().join("test.iej");

    {
        let mut writer = JournalWriter::open(&journal_path, WriteOptions::default()).unwrap();
        writer.append_record(&make_record(1, "CPU overload")).unwrap();
        writer.finish().unwrap();
    }

    {
        let options = WriteOptions {
            append: false,
            ..WriteOptions::default()
        };
        let mut writer = JournalWriter::open(&journal_path, options).unwrap();
        writer.append_record(&make_record(9, "Fan speed")).unwrap();
        writer.finish().unwrap();
    }

    let reader = JournalReader::open(&journal_path, ReadMode::Strict).unwrap();
    let ids: Vec<u32> = reader.map(|r| r.unwrap().tree_id.id).collect();
    assert_eq!(ids, vec![9]);
}

#[test]
fn test_sync_option() {
    let temp_dir = TempDir::new().unwrap();
    let journal_path = temp_dir.path().join("test.iej");

    let options = WriteOptions {
        sync: true,
        ..WriteOptions::default()
    };
    let mut writer = JournalWriter::open(&journal_path, options).unwrap();
    writer.append_record(&make_record(1, "CPU overload")).unwrap();
    writer.finish().unwrap();

    let mut reader = JournalReader::open(&journal_path, ReadMode::Strict).unwrap();
    assert_eq!(reader.read_record().unwrap().unwrap().tree_id.id, 1);
}

#[test]
fn test_invalid_header_rejected() {
    let temp_dir = TempDir::new().unwrap();
    let journal_path = temp_dir.path().join("test.iej");

    fs::write(&journal_path, b"INVALID HEADER DATA").unwrap();
    assert!(JournalReader::open(&journal_path, ReadMode::Strict).is_err());
    assert!(JournalWriter::open(&journal_path, WriteOptions::default()).is_err());
}

#[test]
fn test_short_non_empty_file_rejected_by_writer() {
    let temp_dir = TempDir::new().unwrap();
    let journal_path = temp_dir.path().join("test.iej");

    fs::write(&journal_path, b"IEJ").unwrap();
    assert!(matches!(
        JournalWriter::open(&journal_path, WriteOptions::default()),
        Err(infoevents_journal::JournalError::FileNotEmpty)
    ));
}

#[test]
fn test_empty_file_creates_header() {
    let temp_dir = TempDir::new().unwrap();
    let journal_path = temp_dir.path().join("test.iej");

    fs::File::create(&journal_path).unwrap();
    {
        let mut writer = JournalWriter::open(&journal_path, WriteOptions::default()).unwrap();
        writer.append_record(&make_record(1, "CPU overload")).unwrap();
        writer.finish().unwrap();
    }

    assert!(fs::metadata(&journal_path).unwrap().len() > 16);
    let mut reader = JournalReader::open(&journal_path, ReadMode::Strict).unwrap();
    assert!(reader.read_record().unwrap().is_some());
}

#[test]
fn test_header_only_journal_is_empty() {
    let temp_dir = TempDir::new().unwrap();
    let journal_path = temp_dir.path().join("test.iej");

    JournalWriter::open(&journal_path, WriteOptions::default())
        .unwrap()
        .finish()
        .unwrap();

    let mut reader = JournalReader::open(&journal_path, ReadMode::Strict).unwrap();
    assert!(reader.read_record().unwrap().is_none());
    assert_eq!(reader.position(), 16);
}
