mod commands;
mod config;
mod fixture;
mod render;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

/// Output format for CLI responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    Text,
    Json,
}

/// Watch will registries on a ledger.
#[derive(Parser)]
#[command(name = "willwatch", version, about = "Will registry synchronization")]
struct Cli {
    /// Output format (text or json)
    #[arg(long, global = true, default_value = "text", value_enum)]
    output: OutputFormat,

    /// Suppress non-essential output
    #[arg(long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one synchronization pass and print the snapshot
    Sync {
        /// Path to the ledger fixture JSON file
        #[arg(long)]
        ledger: PathBuf,
        /// Address whose own will should be reported
        #[arg(long)]
        caller: Option<String>,
        /// Observation time (unix seconds); defaults to the fixture's timestamp
        #[arg(long)]
        at: Option<u64>,
        /// Path to a TOML config file
        #[arg(long)]
        config: Option<PathBuf>,
        /// Maximum concurrent record lookups
        #[arg(long)]
        max_parallel: Option<usize>,
    },

    /// Show the normalized record and status of one testator
    Status {
        /// Path to the ledger fixture JSON file
        #[arg(long)]
        ledger: PathBuf,
        /// Testator address
        address: String,
        /// Observation time (unix seconds); defaults to the fixture's timestamp
        #[arg(long)]
        at: Option<u64>,
    },
}

fn main() {
    init_logging();
    let cli = Cli::parse();

    match cli.command {
        Commands::Sync {
            ledger,
            caller,
            at,
            config,
            max_parallel,
        } => {
            let args = commands::sync::SyncArgs {
                ledger,
                caller,
                at,
                config,
                max_parallel,
            };
            commands::sync::cmd_sync(&args, cli.output, cli.quiet);
        }
        Commands::Status {
            ledger,
            address,
            at,
        } => {
            commands::status::cmd_status(&ledger, &address, at, cli.output, cli.quiet);
        }
    }
}

/// Log to stderr, filtered by `WILLWATCH_LOG` (default `warn`).
fn init_logging() {
    let filter =
        EnvFilter::try_from_env("WILLWATCH_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

pub(crate) fn report_error(msg: &str, output: OutputFormat, quiet: bool) {
    if quiet {
        return;
    }
    match output {
        OutputFormat::Text => eprintln!("{}", msg),
        OutputFormat::Json => {
            eprintln!("{}", serde_json::json!({ "error": msg }));
        }
    }
}

/// Report `msg` and exit with status 1.
pub(crate) fn fail(msg: &str, output: OutputFormat, quiet: bool) -> ! {
    report_error(msg, output, quiet);
    process::exit(1);
}

/// Build a runtime for one command's async work.
pub(crate) fn runtime(output: OutputFormat, quiet: bool) -> tokio::runtime::Runtime {
    match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => fail(
            &format!("error: failed to create tokio runtime: {}", e),
            output,
            quiet,
        ),
    }
}
