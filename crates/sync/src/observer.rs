//! Observability hook for synchronization passes.
//!
//! The engine and registry report what happens during a pass through a
//! [`SyncObserver`] handed to them at construction, rather than logging
//! from global state. [`TracingObserver`] forwards to `tracing`.

use willwatch_ledger::{Address, LedgerError};

use crate::error::SyncError;
use crate::snapshot::RegistrySnapshot;

/// Receives pass lifecycle events. All methods default to no-ops.
pub trait SyncObserver: Send + Sync {
    /// Discovery finished; `candidates` lookups are about to run.
    fn pass_started(&self, candidates: usize) {
        let _ = candidates;
    }

    /// A candidate's lookup failed and it was left out of the pass.
    fn record_skipped(&self, owner: &Address, error: &LedgerError) {
        let _ = (owner, error);
    }

    /// A discovery call failed; the pass was abandoned.
    fn discovery_failed(&self, error: &SyncError) {
        let _ = error;
    }

    /// A snapshot was published.
    fn pass_committed(&self, snapshot: &RegistrySnapshot) {
        let _ = snapshot;
    }

    /// A refresh was requested while another was in flight and was dropped.
    fn refresh_rejected(&self) {}
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl SyncObserver for NoopObserver {}

/// Emits structured `tracing` events under the `willwatch::sync` target.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl SyncObserver for TracingObserver {
    fn pass_started(&self, candidates: usize) {
        tracing::debug!(target: "willwatch::sync", candidates, "sync pass started");
    }

    fn record_skipped(&self, owner: &Address, error: &LedgerError) {
        tracing::warn!(
            target: "willwatch::sync",
            owner = %owner,
            error = %error,
            "skipping will record"
        );
    }

    fn discovery_failed(&self, error: &SyncError) {
        tracing::error!(target: "willwatch::sync", error = %error, "sync pass aborted");
    }

    fn pass_committed(&self, snapshot: &RegistrySnapshot) {
        tracing::info!(
            target: "willwatch::sync",
            records = snapshot.all_records.len(),
            skipped = snapshot.skipped.len(),
            created = snapshot.total_created_count,
            aggregate_balance = %snapshot.aggregate_balance,
            observed_at = snapshot.observed_at,
            "snapshot committed"
        );
    }

    fn refresh_rejected(&self) {
        tracing::debug!(target: "willwatch::sync", "refresh already in flight; request dropped");
    }
}
