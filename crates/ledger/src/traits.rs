use std::sync::Arc;

use async_trait::async_trait;

use crate::address::Address;
use crate::error::LedgerError;
use crate::mutation::{MutationReceipt, WillMutation};
use crate::record::{BlockRange, CreationEvent, RawRecord};

/// Read access to the will contract on an external ledger.
///
/// The ledger is authoritative and treated as a black box. Implementations
/// own their transport concerns (retries, rate limits, per-call deadlines);
/// a call that gives up surfaces as an ordinary `LedgerError`.
///
/// ## Thread Safety
///
/// Implementations must be `Send + Sync` so one client can serve many
/// concurrent point lookups within a synchronization pass.
#[async_trait]
pub trait LedgerClient: Send + Sync {
    /// Replay the append-only `WillCreated` log over `range`, oldest first.
    async fn query_creation_log(&self, range: BlockRange)
        -> Result<Vec<CreationEvent>, LedgerError>;

    /// Every address that has ever created a will.
    ///
    /// May contain duplicates and addresses whose will is long gone.
    async fn enumerate_testators(&self) -> Result<Vec<Address>, LedgerError>;

    /// Current storage record for `owner`, in whatever shape the ledger
    /// returns. Addresses without a will typically yield an all-zero record
    /// rather than an error.
    async fn get_record(&self, owner: &Address) -> Result<RawRecord, LedgerError>;
}

/// Write access to the will contract.
///
/// `submit` resolves only once the mutation is confirmed on the ledger, so a
/// successful return is the signal that a refresh will observe it.
#[async_trait]
pub trait LedgerMutator: Send + Sync {
    async fn submit(
        &self,
        sender: &Address,
        mutation: WillMutation,
    ) -> Result<MutationReceipt, LedgerError>;
}

#[async_trait]
impl<T: LedgerClient + ?Sized> LedgerClient for Arc<T> {
    async fn query_creation_log(
        &self,
        range: BlockRange,
    ) -> Result<Vec<CreationEvent>, LedgerError> {
        (**self).query_creation_log(range).await
    }

    async fn enumerate_testators(&self) -> Result<Vec<Address>, LedgerError> {
        (**self).enumerate_testators().await
    }

    async fn get_record(&self, owner: &Address) -> Result<RawRecord, LedgerError> {
        (**self).get_record(owner).await
    }
}

#[async_trait]
impl<T: LedgerMutator + ?Sized> LedgerMutator for Arc<T> {
    async fn submit(
        &self,
        sender: &Address,
        mutation: WillMutation,
    ) -> Result<MutationReceipt, LedgerError> {
        (**self).submit(sender, mutation).await
    }
}
