//! ICE CLI - audit and replay tooling for exported event logs.

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;
mod input;
mod output;

use commands::{fingerprint, replay, taxonomy, verify};

#[derive(Parser)]
#[command(name = "ice")]
#[command(about = "ICE runtime event log audit and replay CLI")]
struct Cli {
    /// Log emitter decisions to stderr (overridden by ICE_LOG)
    #[arg(long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the event vocabulary with categories and authorized origins
    Taxonomy {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Compute the integrity fingerprint of one event record
    Fingerprint {
        /// Input JSON file (or stdin if not provided)
        input: Option<String>,
        /// Also print the canonical bytes that were hashed
        #[arg(long)]
        canonical: bool,
    },
    /// Check the integrity of every record in a JSON Lines export
    Verify {
        /// Path to JSON Lines file
        file: String,
        /// Exit with error code if any record fails
        #[arg(long)]
        strict: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Re-emit every record of a JSON Lines export through a fresh emitter
    Replay {
        /// Path to JSON Lines file
        file: String,
        /// Check timestamps per run instead of across all runs
        #[arg(long)]
        per_run: bool,
        /// Print accepted events as JSON Lines
        #[arg(long)]
        json: bool,
        /// Only print accepted events of this type (with --json)
        #[arg(long = "type")]
        event_type: Option<String>,
        /// Exit with error code if any record is rejected
        #[arg(long)]
        strict: bool,
        /// Stop after reading N records (default: unlimited)
        #[arg(long)]
        max_events: Option<usize>,
    },
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_env("ICE_LOG").unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Taxonomy { json } => taxonomy::run(json),
        Commands::Fingerprint { input, canonical } => fingerprint::run(input, canonical),
        Commands::Verify { file, strict, json } => verify::run(file, strict, json),
        Commands::Replay {
            file,
            per_run,
            json,
            event_type,
            strict,
            max_events,
        } => replay::run(replay::ReplayArgs {
            file,
            per_run,
            json,
            event_type,
            strict,
            max_events,
        }),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
