use std::path::PathBuf;

use willwatch_ledger::Address;
use willwatch_sync::{RefreshOutcome, SyncEngine, WillRegistry};

use crate::config::{read_config, CliConfig};
use crate::fixture::load_ledger;
use crate::{fail, render, runtime, OutputFormat};

use super::observation_clock;

pub(crate) struct SyncArgs {
    pub ledger: PathBuf,
    pub caller: Option<String>,
    pub at: Option<u64>,
    pub config: Option<PathBuf>,
    pub max_parallel: Option<usize>,
}

pub(crate) fn cmd_sync(args: &SyncArgs, output: OutputFormat, quiet: bool) {
    // Flags override the config file.
    let file_config = match &args.config {
        Some(path) => {
            read_config(path).unwrap_or_else(|e| fail(&format!("error: {}", e), output, quiet))
        }
        None => CliConfig::default(),
    };
    let mut sync_config = file_config.sync;
    if let Some(n) = args.max_parallel {
        sync_config.max_parallel = n;
    }
    let caller = args
        .caller
        .as_deref()
        .or(file_config.caller.as_deref())
        .map(|raw| {
            raw.parse::<Address>()
                .unwrap_or_else(|e| fail(&format!("error: {}", e), output, quiet))
        });

    let ledger = load_ledger(&args.ledger).unwrap_or_else(|e| fail(&e, output, quiet));
    let clock = observation_clock(args.at, &ledger);
    let engine = SyncEngine::new(ledger)
        .with_clock(clock)
        .with_config(sync_config);
    let registry = WillRegistry::new(engine, caller);

    let rt = runtime(output, quiet);
    let snapshot = match rt.block_on(registry.refresh()) {
        Ok(RefreshOutcome::Committed(snapshot)) => snapshot,
        Ok(RefreshOutcome::AlreadyInFlight) => registry.current(),
        Err(e) => fail(&format!("error: {}", e), output, quiet),
    };

    if quiet {
        return;
    }
    match output {
        OutputFormat::Json => match serde_json::to_string_pretty(&*snapshot) {
            Ok(json) => println!("{}", json),
            Err(e) => fail(
                &format!("error: failed to serialize snapshot: {}", e),
                output,
                quiet,
            ),
        },
        OutputFormat::Text => {
            print!("{}", render::snapshot_text(&snapshot, registry.caller()));
        }
    }
}
