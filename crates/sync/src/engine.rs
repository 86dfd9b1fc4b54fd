//! The synchronization engine: one pass from ledger state to snapshot.
//!
//! A pass runs in four steps:
//! 1. Discovery: creation-log scan and testator enumeration, concurrently.
//!    Either failing aborts the pass.
//! 2. Candidate set: enumerated testators plus the caller, deduplicated.
//! 3. Lookup: each candidate's record is fetched (bounded parallelism),
//!    normalized, and given a status. Failed lookups are skipped.
//! 4. Aggregation into a [`RegistrySnapshot`].
//!
//! The engine holds no state between passes and never publishes anything;
//! committing the snapshot is the registry's job.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use futures::stream::{FuturesUnordered, StreamExt};
use tokio::sync::Semaphore;
use willwatch_ledger::{Address, CreationEvent, LedgerClient, LedgerError, RawRecord};

use crate::clock::{Clock, SystemClock};
use crate::config::SyncConfig;
use crate::error::{DiscoveryStage, SyncError};
use crate::normalize::{backfill_created_at, creation_times, normalize};
use crate::observer::{SyncObserver, TracingObserver};
use crate::record::WillView;
use crate::snapshot::{RegistrySnapshot, SkippedRecord};
use crate::status::derive_status;

pub struct SyncEngine<L> {
    ledger: L,
    clock: Arc<dyn Clock>,
    observer: Arc<dyn SyncObserver>,
    config: SyncConfig,
}

impl<L: LedgerClient> SyncEngine<L> {
    /// Engine over `ledger` with wall-clock time, `tracing` output, and the
    /// default configuration.
    pub fn new(ledger: L) -> Self {
        SyncEngine {
            ledger,
            clock: Arc::new(SystemClock),
            observer: Arc::new(TracingObserver),
            config: SyncConfig::default(),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_observer(mut self, observer: Arc<dyn SyncObserver>) -> Self {
        self.observer = observer;
        self
    }

    pub fn with_config(mut self, config: SyncConfig) -> Self {
        self.config = config;
        self
    }

    pub fn ledger(&self) -> &L {
        &self.ledger
    }

    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    pub(crate) fn observer(&self) -> &dyn SyncObserver {
        self.observer.as_ref()
    }

    /// Run one pass and return the snapshot it produced.
    ///
    /// `caller` is looked up even if the enumeration does not (yet) list it.
    pub async fn run(&self, caller: Option<&Address>) -> Result<RegistrySnapshot, SyncError> {
        let (events, testators) = match self.discover().await {
            Ok(found) => found,
            Err(err) => {
                self.observer.discovery_failed(&err);
                return Err(err);
            }
        };

        let candidates: BTreeSet<Address> = testators.into_iter().chain(caller.cloned()).collect();
        self.observer.pass_started(candidates.len());

        let now = self.clock.now();
        let created_at = creation_times(&events);
        let mut views = BTreeMap::new();
        let mut skipped = Vec::new();

        for (owner, result) in self.fetch_all(candidates).await {
            match result {
                Ok(raw) => {
                    let mut record = normalize(&owner, &raw);
                    backfill_created_at(&mut record, &created_at);
                    let status = derive_status(&record, now);
                    views.insert(owner, WillView { record, status });
                }
                Err(err) => {
                    self.observer.record_skipped(&owner, &err);
                    skipped.push(SkippedRecord {
                        owner,
                        reason: err.to_string(),
                    });
                }
            }
        }

        Ok(RegistrySnapshot::assemble(caller, views, skipped, &events, now))
    }

    async fn discover(&self) -> Result<(Vec<CreationEvent>, Vec<Address>), SyncError> {
        let range = self.config.block_range();
        tokio::try_join!(
            async {
                self.ledger
                    .query_creation_log(range)
                    .await
                    .map_err(|source| SyncError::Discovery {
                        stage: DiscoveryStage::CreationLog,
                        source,
                    })
            },
            async {
                self.ledger
                    .enumerate_testators()
                    .await
                    .map_err(|source| SyncError::Discovery {
                        stage: DiscoveryStage::TestatorEnumeration,
                        source,
                    })
            },
        )
    }

    /// Look up every candidate with at most `max_parallel` lookups in
    /// flight. Results come back in completion order.
    async fn fetch_all(
        &self,
        candidates: BTreeSet<Address>,
    ) -> Vec<(Address, Result<RawRecord, LedgerError>)> {
        let semaphore = Semaphore::new(self.config.permits());
        let semaphore = &semaphore;
        let mut pending: FuturesUnordered<_> = candidates
            .into_iter()
            .map(|owner| async move {
                let result = match semaphore.acquire().await {
                    Ok(_permit) => self.ledger.get_record(&owner).await,
                    Err(_) => Err(LedgerError::Rpc("lookup semaphore closed".to_string())),
                };
                (owner, result)
            })
            .collect();

        let mut results = Vec::with_capacity(pending.len());
        while let Some(item) = pending.next().await {
            results.push(item);
        }
        results
    }
}

// ──────────────────────────────────────────────
// Tests
// ──────────────────────────────────────────────
