//! Output formatting utilities.

use infoevents_model::InfoRecord;
use infoevents_source::{OutputRow, COLUMNS};

/// Time slot fits RFC 3339 with nanoseconds.
const WIDTHS: [usize; 4] = [20, 24, 16, 30];

/// Formats a journal record as a table row.
pub fn format_record_row(record: &InfoRecord) -> String {
    format!(
        "{:<30} {:<20} {:<24} {:<16} {}",
        record.time_of_arrival.to_rfc3339(),
        truncate(&record.element_name, 20),
        truncate(&record.parameter_name, 24),
        truncate(&record.value, 16),
        record.tree_id
    )
}

/// Prints the journal record table header.
#[allow(clippy::print_literal)]
pub fn print_record_header() {
    println!(
        "{:<30} {:<20} {:<24} {:<16} {}",
        "TIME_OF_ARRIVAL", "ELEMENT", "PARAMETER", "VALUE", "TREE_ID"
    );
    println!("{}", "-".repeat(106));
}

/// Formats an output row in column order.
pub fn format_output_row(row: &OutputRow) -> String {
    let cells = row.cells();
    let mut line = String::new();
    for (idx, cell) in cells.iter().enumerate() {
        let text = cell.to_string();
        match WIDTHS.get(idx) {
            Some(width) => line.push_str(&format!("{:<w$} ", truncate(&text, *width), w = *width)),
            None => line.push_str(&text),
        }
    }
    line
}

/// Prints the output column header.
pub fn print_output_header() {
    let mut line = String::new();
    for (idx, column) in COLUMNS.iter().enumerate() {
        match WIDTHS.get(idx) {
            Some(width) => line.push_str(&format!("{:<w$} ", column.name.to_uppercase(), w = *width)),
            None => line.push_str(&column.name.to_uppercase()),
        }
    }
    println!("{}", line);
    println!("{}", "-".repeat(106));
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Timelike, Utc};

    #[test]
    fn truncate_respects_char_boundaries() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("Température élevée", 8), "Tempé...");
    }

    #[test]
    fn time_cell_keeps_subsecond_digits() {
        let row = OutputRow {
            origin: "Encoder 1".to_string(),
            kind: "CPU overload".to_string(),
            value: "97".to_string(),
            time: Utc
                .with_ymd_and_hms(2025, 1, 1, 0, 0, 0)
                .unwrap()
                .with_nanosecond(123_456_789)
                .unwrap(),
            id: "346/1".to_string(),
        };
        let line = format_output_row(&row);
        assert!(line.contains("2025-01-01T00:00:00.123456789Z"), "{}", line);
        assert!(line.ends_with("346/1"));
    }
}
