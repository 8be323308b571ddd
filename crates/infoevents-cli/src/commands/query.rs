//! Query command implementation.

use clap::Args;
use infoevents_source::{ArgumentValues, QuerySession, SessionConfig, FROM, SEARCH_TERM, UNTIL};
use infoevents_store::{JournalRecordReader, MemoryStore, ReadMode};

use crate::output;
use crate::path;

#[derive(Args, Debug)]
pub struct QueryArgs {
    /// Path to journal file
    journal: String,
    /// Inclusive lower bound on arrival time (RFC 3339)
    #[arg(long)]
    from: String,
    /// Exclusive upper bound on arrival time (RFC 3339)
    #[arg(long)]
    until: Option<String>,
    /// Case-insensitive text matched against parameter name and value
    #[arg(long)]
    search: Option<String>,
    /// Session configuration file (JSON)
    #[arg(long)]
    config: Option<String>,
    /// Records per page (overrides the configuration file)
    #[arg(long)]
    page_size: Option<usize>,
    /// Overall result cap (overrides the configuration file)
    #[arg(long)]
    limit: Option<usize>,
    /// Page execution timeout in seconds (overrides the configuration file)
    #[arg(long)]
    timeout_secs: Option<u64>,
    /// Stop after N pages (default: until an empty page)
    #[arg(long)]
    max_pages: Option<usize>,
    /// Skip a truncated tail instead of failing
    #[arg(long)]
    permissive: bool,
    /// Output rows as JSON lines
    #[arg(long)]
    json: bool,
}

fn session_config(args: &QueryArgs) -> Result<SessionConfig, Box<dyn std::error::Error>> {
    let mut config = match &args.config {
        Some(file) => SessionConfig::load(file)?,
        None => SessionConfig::default(),
    };
    if let Some(page_size) = args.page_size {
        config.page_size = page_size;
    }
    if let Some(limit) = args.limit {
        config.limit = limit;
    }
    if let Some(timeout_secs) = args.timeout_secs {
        config.timeout_secs = timeout_secs;
    }
    config.validate()?;
    Ok(config)
}

fn argument_values(args: &QueryArgs) -> Result<ArgumentValues, Box<dyn std::error::Error>> {
    let mut values = ArgumentValues::new();
    values.parse(FROM, &args.from)?;
    if let Some(until) = &args.until {
        values.parse(UNTIL, until)?;
    }
    if let Some(term) = &args.search {
        values.parse(SEARCH_TERM, term)?;
    }
    Ok(values)
}

pub fn run(args: QueryArgs) -> Result<(), Box<dyn std::error::Error>> {
    let journal_path = path::validate_journal_path(&args.journal, false)
        .map_err(|e| format!("Invalid journal path: {}", e))?;
    let config = session_config(&args)?;
    let values = argument_values(&args)?;

    let mode = if args.permissive {
        ReadMode::Permissive
    } else {
        ReadMode::Strict
    };
    let reader = JournalRecordReader::open(&journal_path, mode).map_err(|e| {
        let sanitized = path::sanitize_path_for_error(&journal_path);
        format!("Failed to open journal file: {}: {}", sanitized, e)
    })?;
    let store = MemoryStore::new();
    let loaded = store.load(reader)?;
    tracing::info!(records = loaded, "journal loaded");

    let mut session = QuerySession::new(config)?;
    session.initialize(store)?;
    session.process_arguments(&values)?;
    session.prepare_fetch()?;

    if !args.json {
        output::print_output_header();
    }

    let mut pages = 0;
    let mut rows = 0;
    loop {
        if args.max_pages.is_some_and(|max| pages >= max) {
            break;
        }
        let page = session.next_page()?;
        pages += 1;
        rows += page.rows.len();
        tracing::info!(page = pages, rows = page.rows.len(), "page served");

        for row in &page.rows {
            if args.json {
                println!("{}", serde_json::to_string(row)?);
            } else {
                println!("{}", output::format_output_row(row));
            }
        }
        if !page.has_next_page {
            break;
        }
    }

    session.destroy();
    tracing::info!(pages, rows, "query finished");
    Ok(())
}
