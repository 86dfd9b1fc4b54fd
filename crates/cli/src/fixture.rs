use std::path::Path;

use willwatch_ledger::{InMemoryLedger, LedgerFixture};

/// Load an [`InMemoryLedger`] from a fixture JSON file.
pub(crate) fn load_ledger(path: &Path) -> Result<InMemoryLedger, String> {
    let content = std::fs::read_to_string(path)
        .map_err(|_| format!("error: ledger file not found: {}", path.display()))?;
    let fixture: LedgerFixture = serde_json::from_str(&content)
        .map_err(|e| format!("error: invalid JSON in {}: {}", path.display(), e))?;
    Ok(InMemoryLedger::from_fixture(fixture))
}
