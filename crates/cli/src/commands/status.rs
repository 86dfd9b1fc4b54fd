use std::path::Path;

use willwatch_ledger::{Address, BlockRange, LedgerClient};
use willwatch_sync::{
    backfill_created_at, creation_times, derive_status, normalize, Clock, TimeRemaining, WillView,
};

use crate::fixture::load_ledger;
use crate::{fail, render, runtime, OutputFormat};

use super::observation_clock;

pub(crate) fn cmd_status(
    ledger_path: &Path,
    address: &str,
    at: Option<u64>,
    output: OutputFormat,
    quiet: bool,
) {
    let owner: Address = address
        .parse()
        .unwrap_or_else(|e| fail(&format!("error: {}", e), output, quiet));
    let ledger = load_ledger(ledger_path).unwrap_or_else(|e| fail(&e, output, quiet));
    let now = observation_clock(at, &ledger).now();

    let rt = runtime(output, quiet);
    let raw = match rt.block_on(ledger.get_record(&owner)) {
        Ok(raw) => raw,
        Err(e) => fail(&format!("error: {}", e), output, quiet),
    };
    let events = match rt.block_on(ledger.query_creation_log(BlockRange::all())) {
        Ok(events) => events,
        Err(e) => fail(&format!("error: {}", e), output, quiet),
    };
    let mut record = normalize(&owner, &raw);
    backfill_created_at(&mut record, &creation_times(&events));
    let status = derive_status(&record, now);
    let view = WillView { record, status };

    if quiet {
        return;
    }
    match output {
        OutputFormat::Json => {
            let remaining = TimeRemaining::until_expiry(&view.record, now);
            let body = serde_json::json!({
                "record": view.record,
                "status": view.status,
                "expiresAt": view.record.expiry(),
                "secondsRemaining": remaining.seconds,
                "observedAt": now,
            });
            match serde_json::to_string_pretty(&body) {
                Ok(json) => println!("{}", json),
                Err(e) => fail(
                    &format!("error: failed to serialize record: {}", e),
                    output,
                    quiet,
                ),
            }
        }
        OutputFormat::Text => print!("{}", render::will_text(&view, now)),
    }
}
