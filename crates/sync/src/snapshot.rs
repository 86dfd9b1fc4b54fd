use std::collections::BTreeMap;

use serde::Serialize;
use willwatch_ledger::{amount, Address, Amount, CreationEvent};

use crate::record::WillView;
use crate::status::DerivedStatus;

/// A candidate whose lookup failed during a pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedRecord {
    pub owner: Address,
    pub reason: String,
}

/// The registry's view of the ledger as of one completed pass.
///
/// Built once, never edited; a refresh replaces it wholesale.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrySnapshot {
    /// The caller's own will, if it has a non-empty one.
    pub own_record: Option<WillView>,
    /// Every non-empty will discovered in the pass, keyed by owner.
    pub all_records: BTreeMap<Address, WillView>,
    /// Sum of `balance` over `all_records`.
    #[serde(with = "amount")]
    pub aggregate_balance: Amount,
    /// Number of creation-log entries, including wills since executed or
    /// cancelled.
    pub total_created_count: u64,
    /// Sum of balances at creation time over the creation log.
    #[serde(with = "amount")]
    pub created_value: Amount,
    /// Observation time the statuses were derived at.
    pub observed_at: u64,
    /// Candidates left out because their lookup failed.
    pub skipped: Vec<SkippedRecord>,
}

impl RegistrySnapshot {
    /// Aggregate the per-candidate results of a pass into a snapshot.
    ///
    /// `views` is keyed by owner, so the result does not depend on the
    /// order lookups completed in.
    pub(crate) fn assemble(
        caller: Option<&Address>,
        views: BTreeMap<Address, WillView>,
        mut skipped: Vec<SkippedRecord>,
        events: &[CreationEvent],
        observed_at: u64,
    ) -> Self {
        let all_records: BTreeMap<Address, WillView> = views
            .into_iter()
            .filter(|(_, view)| view.status != DerivedStatus::Empty)
            .collect();
        let own_record = caller.and_then(|c| all_records.get(c).cloned());
        let aggregate_balance = all_records
            .values()
            .fold(0u128, |acc, view| acc.saturating_add(view.record.balance));
        let created_value = events
            .iter()
            .fold(0u128, |acc, event| acc.saturating_add(event.balance));
        skipped.sort_by(|a, b| a.owner.cmp(&b.owner));

        RegistrySnapshot {
            own_record,
            all_records,
            aggregate_balance,
            total_created_count: events.len() as u64,
            created_value,
            observed_at,
            skipped,
        }
    }

    pub fn get(&self, owner: &Address) -> Option<&WillView> {
        self.all_records.get(owner)
    }

    pub fn records(&self) -> impl Iterator<Item = &WillView> + '_ {
        self.all_records.values()
    }

    pub fn with_status(&self, status: DerivedStatus) -> impl Iterator<Item = &WillView> + '_ {
        self.all_records.values().filter(move |v| v.status == status)
    }

    /// Wills that are funded and not yet executed or cancelled.
    pub fn live_count(&self) -> usize {
        self.records().filter(|v| v.status.is_live()).count()
    }

    /// True when the caller has a will that is active or awaiting execution.
    pub fn is_own_active(&self) -> bool {
        self.own_record
            .as_ref()
            .is_some_and(|view| view.status.is_live())
    }
}
