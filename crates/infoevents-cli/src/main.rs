//! Infoevents CLI - generate, inspect and query information event journals.

use clap::{Parser, Subcommand};

mod commands;
mod logging;
mod output;
mod path;

use commands::{columns, gen, list, query};

#[derive(Parser)]
#[command(name = "infoevents")]
#[command(about = "Information event journal and query session CLI")]
struct Cli {
    /// Log filter used when RUST_LOG is unset (e.g. info, debug, infoevents_source=trace)
    #[arg(long, global = true, default_value = "info")]
    log_level: String,
    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    log_json: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a deterministic journal of synthetic information events
    Gen {
        /// Output journal path
        #[arg(long)]
        output: String,
        /// Seed for deterministic content
        #[arg(long, default_value_t = 1)]
        seed: u64,
        /// Number of records to write
        #[arg(long, default_value_t = 100)]
        count: u32,
        /// Arrival time of the first record (RFC 3339)
        #[arg(long, default_value = "2025-01-01T00:00:00Z")]
        start: String,
        /// Seconds between consecutive records
        #[arg(long, default_value_t = 60)]
        step_secs: u32,
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
    /// List records in a journal
    List(list::ListArgs),
    /// Run a paged query session over a journal
    Query(query::QueryArgs),
    /// Show the declared query arguments and output columns
    Columns,
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = logging::init(&cli.log_level, cli.log_json) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    let result = match cli.command {
        Commands::Gen {
            output,
            seed,
            count,
            start,
            step_secs,
            force,
        } => gen::run(output, seed, count, start, step_secs, force),
        Commands::List(args) => list::run(args),
        Commands::Query(args) => query::run(args),
        Commands::Columns => columns::run(),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
