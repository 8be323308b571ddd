//! Generate command implementation.

use chrono::{DateTime, FixedOffset, TimeDelta};
use infoevents_journal::{JournalWriter, WriteOptions};
use infoevents_model::{parse_timestamp, InfoRecord, TreeId};
use sha2::{Digest, Sha256};

use crate::path;

const ELEMENTS: [&str; 5] = [
    "Encoder 1",
    "Encoder 2",
    "Decoder Rack A",
    "IP Gateway",
    "Satellite Receiver",
];

const PARAMETERS: [&str; 6] = [
    "CPU overload",
    "Memory overload",
    "Fan speed",
    "Link state",
    "Input bitrate",
    "Temperature",
];

/// Deterministic bytes for record `index` under `seed`.
fn derive(seed: u64, index: u32) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(seed.to_le_bytes());
    hasher.update(index.to_le_bytes());
    hasher.finalize().into()
}

/// Arrival time of record `index`, or `None` when it falls outside chrono's range.
fn arrival_at(
    start: DateTime<FixedOffset>,
    step_secs: u32,
    index: u32,
) -> Option<DateTime<FixedOffset>> {
    let offset = i64::from(step_secs).checked_mul(i64::from(index))?;
    start.checked_add_signed(TimeDelta::try_seconds(offset)?)
}

fn build_record(seed: u64, index: u32, arrival: DateTime<FixedOffset>) -> InfoRecord {
    let bytes = derive(seed, index);
    let parameter = PARAMETERS[bytes[1] as usize % PARAMETERS.len()];
    let reading = u16::from_le_bytes([bytes[2], bytes[3]]);

    let value = match parameter {
        "Link state" if reading % 2 == 0 => "Up".to_string(),
        "Link state" => "Down".to_string(),
        "Fan speed" => format!("{} rpm", 800 + reading % 3000),
        "Input bitrate" => format!("{} kbps", reading),
        "Temperature" => format!("{} deg C", 20 + reading % 70),
        _ => format!("{} %", reading % 101),
    };

    InfoRecord {
        element_name: ELEMENTS[bytes[0] as usize % ELEMENTS.len()].to_string(),
        parameter_name: parameter.to_string(),
        value,
        time_of_arrival: arrival,
        tree_id: TreeId::new(1 + (seed % 1000) as u32, index + 1),
    }
}

pub fn run(
    output: String,
    seed: u64,
    count: u32,
    start: String,
    step_secs: u32,
    force: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let output_path = path::validate_journal_path(&output, true)
        .map_err(|e| format!("Invalid output path: {}", e))?;
    if output_path.exists() {
        if !force {
            return Err(format!("File {} already exists. Use --force to overwrite", output).into());
        }
        std::fs::remove_file(&output_path)?;
    }

    let start = parse_timestamp(&start).map_err(|e| format!("Invalid start timestamp: {}", e))?;

    if let Some(last) = count.checked_sub(1) {
        if arrival_at(start, step_secs, last).is_none() {
            return Err(format!(
                "arrival time out of range: {} records every {}s from {}",
                count, step_secs, start
            )
            .into());
        }
    }

    let mut writer = JournalWriter::open(&output_path, WriteOptions::default())
        .map_err(|e| format!("Failed to open journal for writing: {}", e))?;

    for index in 0..count {
        let arrival = arrival_at(start, step_secs, index).ok_or("arrival time out of range")?;
        writer.append_record(&build_record(seed, index, arrival))?;
    }
    writer.finish()?;

    tracing::info!(count, seed, "journal generated");
    println!("Generated {} records to {}", count, output);
    Ok(())
}
