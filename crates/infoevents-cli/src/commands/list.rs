//! List command implementation.

use clap::Args;
use infoevents_model::parse_utc;
use infoevents_store::{
    Comparison, FilterElement, FilteredReader, JournalRecordReader, ReadMode, RecordReader,
    TextField,
};

use crate::output;
use crate::path;

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Path to journal file
    journal: String,
    /// Output as JSON lines
    #[arg(long)]
    json: bool,
    /// Stop after printing N records (default: unlimited)
    #[arg(long)]
    max_records: Option<u64>,
    /// Case-insensitive text matched against the element name
    #[arg(long)]
    element: Option<String>,
    /// Only records that arrived exactly at this instant (RFC 3339)
    #[arg(long, conflicts_with_all = ["after", "at_or_before"])]
    at: Option<String>,
    /// Only records that arrived strictly after this instant (RFC 3339)
    #[arg(long)]
    after: Option<String>,
    /// Only records that arrived at or before this instant (RFC 3339)
    #[arg(long)]
    at_or_before: Option<String>,
    /// Skip a truncated tail instead of failing
    #[arg(long)]
    permissive: bool,
}

/// Journal order is arrival order on disk, so every predicate here is a
/// plain scan filter. An empty conjunction lists everything.
fn record_filter(args: &ListArgs) -> Result<FilterElement, Box<dyn std::error::Error>> {
    let mut filter = FilterElement::And(Vec::new());

    let bounds = [
        ("--at", &args.at, Comparison::Equal),
        ("--after", &args.after, Comparison::GreaterThan),
        ("--at-or-before", &args.at_or_before, Comparison::LessThanOrEqual),
    ];
    for (flag, raw, op) in bounds {
        if let Some(raw) = raw {
            let at = parse_utc(raw).map_err(|e| format!("Invalid {} timestamp: {}", flag, e))?;
            filter = filter.and(FilterElement::time_of_arrival(op, at));
        }
    }

    if let Some(element) = args.element.as_deref().filter(|e| !e.trim().is_empty()) {
        filter = filter.and(FilterElement::contains(TextField::ElementName, element));
    }
    Ok(filter)
}

pub fn run(args: ListArgs) -> Result<(), Box<dyn std::error::Error>> {
    let journal_path = path::validate_journal_path(&args.journal, false)
        .map_err(|e| format!("Invalid journal path: {}", e))?;
    let filter = record_filter(&args)?;
    tracing::debug!(filter = %filter, "listing journal");

    let mode = if args.permissive {
        ReadMode::Permissive
    } else {
        ReadMode::Strict
    };
    let reader = JournalRecordReader::open(&journal_path, mode).map_err(|e| {
        let sanitized = path::sanitize_path_for_error(&journal_path);
        format!("Failed to open journal file: {}: {}", sanitized, e)
    })?;
    let mut records = FilteredReader::new(reader, filter);

    if !args.json {
        output::print_record_header();
    }

    let mut printed: u64 = 0;
    while args.max_records.map_or(true, |max| printed < max) {
        let Some(record) = records.read_next()? else {
            break;
        };
        if args.json {
            println!("{}", serde_json::to_string(&record)?);
        } else {
            println!("{}", output::format_record_row(&record));
        }
        printed += 1;
    }

    tracing::debug!(records = printed, "journal listed");
    Ok(())
}
