//! The will registry: owns the current snapshot and serializes refreshes.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock};

use willwatch_ledger::{Address, LedgerClient, LedgerMutator, MutationReceipt, WillMutation};

use crate::engine::SyncEngine;
use crate::error::{RegistryError, SyncError};
use crate::snapshot::RegistrySnapshot;

/// Whether a refresh is running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncState {
    Idle,
    Syncing,
}

/// Result of a successful call to [`WillRegistry::refresh`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// The pass completed and its snapshot is now current.
    Committed(Arc<RegistrySnapshot>),
    /// Another refresh was already running; nothing was done.
    AlreadyInFlight,
}

impl RefreshOutcome {
    pub fn snapshot(&self) -> Option<&Arc<RegistrySnapshot>> {
        match self {
            RefreshOutcome::Committed(snapshot) => Some(snapshot),
            RefreshOutcome::AlreadyInFlight => None,
        }
    }
}

/// Holds the last committed snapshot for one caller (or none, in observer
/// mode) and refreshes it from the ledger on request.
///
/// At most one refresh runs at a time; requests arriving while one is in
/// flight are dropped, not queued. The snapshot is replaced only when a pass
/// completes, so readers never see a partial result.
pub struct WillRegistry<L> {
    engine: SyncEngine<L>,
    caller: Option<Address>,
    state: Mutex<SyncState>,
    snapshot: RwLock<Arc<RegistrySnapshot>>,
}

/// Marks the registry as syncing for as long as it lives.
struct InFlight<'a> {
    state: &'a Mutex<SyncState>,
}

impl<'a> InFlight<'a> {
    fn acquire(state: &'a Mutex<SyncState>) -> Option<Self> {
        let mut current = lock(state);
        match *current {
            SyncState::Syncing => None,
            SyncState::Idle => {
                *current = SyncState::Syncing;
                Some(InFlight { state })
            }
        }
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        *lock(self.state) = SyncState::Idle;
    }
}

fn lock(state: &Mutex<SyncState>) -> MutexGuard<'_, SyncState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

impl<L: LedgerClient> WillRegistry<L> {
    pub fn new(engine: SyncEngine<L>, caller: Option<Address>) -> Self {
        WillRegistry {
            engine,
            caller,
            state: Mutex::new(SyncState::Idle),
            snapshot: RwLock::new(Arc::new(RegistrySnapshot::default())),
        }
    }

    pub fn caller(&self) -> Option<&Address> {
        self.caller.as_ref()
    }

    pub fn engine(&self) -> &SyncEngine<L> {
        &self.engine
    }

    pub fn state(&self) -> SyncState {
        *lock(&self.state)
    }

    /// The last committed snapshot. Empty until the first pass succeeds.
    pub fn current(&self) -> Arc<RegistrySnapshot> {
        self.snapshot
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn is_own_active(&self) -> bool {
        self.current().is_own_active()
    }

    /// Run a pass and publish its snapshot.
    ///
    /// On a discovery failure the previous snapshot stays current. Dropping
    /// the returned future before it completes publishes nothing and
    /// returns the registry to [`SyncState::Idle`].
    pub async fn refresh(&self) -> Result<RefreshOutcome, SyncError> {
        let Some(_guard) = InFlight::acquire(&self.state) else {
            self.engine.observer().refresh_rejected();
            return Ok(RefreshOutcome::AlreadyInFlight);
        };

        let snapshot = Arc::new(self.engine.run(self.caller.as_ref()).await?);
        *self
            .snapshot
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Arc::clone(&snapshot);
        self.engine.observer().pass_committed(&snapshot);
        Ok(RefreshOutcome::Committed(snapshot))
    }

    /// Submit `mutation` as the caller, wait for the ledger to confirm it,
    /// then refresh.
    pub async fn submit<M>(
        &self,
        mutator: &M,
        mutation: WillMutation,
    ) -> Result<(MutationReceipt, RefreshOutcome), RegistryError>
    where
        M: LedgerMutator + ?Sized,
    {
        let sender = self.caller.as_ref().ok_or(RegistryError::NoCaller)?;
        mutation.validate()?;
        let receipt = mutator.submit(sender, mutation).await?;
        let outcome = self.refresh().await?;
        Ok((receipt, outcome))
    }
}

// ──────────────────────────────────────────────
// Tests
// ──────────────────────────────────────────────
