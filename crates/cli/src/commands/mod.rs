pub(crate) mod status;
pub(crate) mod sync;

use std::sync::Arc;

use willwatch_ledger::InMemoryLedger;
use willwatch_sync::{Clock, FixedClock, SystemClock};

/// Clock for a command: `--at` if given, else the fixture's own timestamp,
/// else wall-clock time.
pub(crate) fn observation_clock(at: Option<u64>, ledger: &InMemoryLedger) -> Arc<dyn Clock> {
    let fixture_time = Some(ledger.timestamp()).filter(|ts| *ts > 0);
    match at.or(fixture_time) {
        Some(now) => Arc::new(FixedClock::new(now)),
        None => Arc::new(SystemClock),
    }
}
