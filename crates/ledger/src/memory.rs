//! In-memory ledger with will-contract semantics.
//!
//! Backs tests and the CLI's fixture mode. Records are stored raw, in
//! whatever shape the fixture supplies, so consumers see the same shape
//! variety a real RPC adapter produces. Faults (unreadable records, failing
//! discovery calls, slow lookups) can be injected per address.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::abi::{self, WillField};
use crate::address::Address;
use crate::error::LedgerError;
use crate::mutation::{MutationReceipt, WillMutation};
use crate::record::{BlockRange, CreationEvent, RawRecord};
use crate::traits::{LedgerClient, LedgerMutator};

/// Serialized starting state for an [`InMemoryLedger`].
///
/// ```json
/// {
///   "blockNumber": 12,
///   "timestamp": 1700000000,
///   "records": { "0xab..": [["0xcd.."], ["5"], false, 1699990000, false, "5", 86400] },
///   "testators": ["0xab.."],
///   "creationLog": [{ "blockNumber": 3, "owner": "0xab..", "balance": "5", "inactivityTimeout": 86400 }],
///   "unavailable": []
/// }
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerFixture {
    #[serde(default)]
    pub block_number: u64,
    #[serde(default)]
    pub timestamp: u64,
    #[serde(default)]
    pub records: BTreeMap<Address, RawRecord>,
    #[serde(default)]
    pub testators: Vec<Address>,
    #[serde(default)]
    pub creation_log: Vec<CreationEvent>,
    /// Addresses whose lookups fail.
    #[serde(default)]
    pub unavailable: BTreeSet<Address>,
}

#[derive(Debug, Default)]
struct LedgerState {
    block_number: u64,
    timestamp: u64,
    records: BTreeMap<Address, RawRecord>,
    testators: Vec<Address>,
    creation_log: Vec<CreationEvent>,
    unavailable: BTreeSet<Address>,
    discovery_failure: Option<LedgerError>,
    latency: BTreeMap<Address, Duration>,
}

#[derive(Debug, Default)]
pub struct InMemoryLedger {
    state: Mutex<LedgerState>,
    lookups: AtomicUsize,
}

impl InMemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_fixture(fixture: LedgerFixture) -> Self {
        InMemoryLedger {
            state: Mutex::new(LedgerState {
                block_number: fixture.block_number,
                timestamp: fixture.timestamp,
                records: fixture.records,
                testators: fixture.testators,
                creation_log: fixture.creation_log,
                unavailable: fixture.unavailable,
                ..LedgerState::default()
            }),
            lookups: AtomicUsize::new(0),
        }
    }

    fn state(&self) -> MutexGuard<'_, LedgerState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    // ── Clock ────────────────────────────────────────────────────────────────

    pub fn timestamp(&self) -> u64 {
        self.state().timestamp
    }

    pub fn block_number(&self) -> u64 {
        self.state().block_number
    }

    pub fn set_time(&self, timestamp: u64) {
        self.state().timestamp = timestamp;
    }

    pub fn advance_time(&self, seconds: u64) {
        let mut state = self.state();
        state.timestamp = state.timestamp.saturating_add(seconds);
    }

    // ── Direct seeding (bypasses contract rules) ─────────────────────────────

    /// Store a raw record as-is. Does not touch the log or testator list.
    pub fn insert_record(&self, owner: Address, raw: RawRecord) {
        self.state().records.insert(owner, raw);
    }

    pub fn push_testator(&self, owner: Address) {
        self.state().testators.push(owner);
    }

    pub fn push_creation_event(&self, event: CreationEvent) {
        self.state().creation_log.push(event);
    }

    pub fn record(&self, owner: &Address) -> Option<RawRecord> {
        self.state().records.get(owner).cloned()
    }

    // ── Fault injection ──────────────────────────────────────────────────────

    pub fn set_unavailable(&self, owner: &Address, unavailable: bool) {
        let mut state = self.state();
        if unavailable {
            state.unavailable.insert(owner.clone());
        } else {
            state.unavailable.remove(owner);
        }
    }

    /// Make both discovery calls fail with `error` until cleared with `None`.
    pub fn fail_discovery(&self, error: Option<LedgerError>) {
        self.state().discovery_failure = error;
    }

    /// Delay lookups of `owner` by `delay`.
    pub fn set_latency(&self, owner: &Address, delay: Duration) {
        self.state().latency.insert(owner.clone(), delay);
    }

    /// Number of `get_record` calls served so far.
    pub fn lookup_count(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }

    fn check_discovery(&self) -> Result<(), LedgerError> {
        match &self.state().discovery_failure {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }
}

/// What an unset mapping slot reads as: the zero tuple.
fn zero_record() -> RawRecord {
    json!([[], [], false, 0, false, "0", 0])
}

fn uint(raw: &RawRecord, slot: WillField) -> u128 {
    abi::field(raw, slot).and_then(abi::decode_uint).unwrap_or(0)
}

fn flag(raw: &RawRecord, slot: WillField) -> bool {
    abi::field(raw, slot)
        .and_then(abi::decode_bool)
        .unwrap_or(false)
}

fn is_live(raw: &RawRecord) -> bool {
    uint(raw, WillField::Balance) > 0
        && !flag(raw, WillField::Executed)
        && !flag(raw, WillField::Cancelled)
}

fn rejected(reason: impl Into<String>) -> LedgerError {
    LedgerError::Rejected {
        reason: reason.into(),
    }
}

impl LedgerState {
    fn live_record_mut(&mut self, owner: &Address) -> Result<&mut RawRecord, LedgerError> {
        match self.records.get_mut(owner) {
            Some(raw) if is_live(raw) => Ok(raw),
            _ => Err(rejected(format!("{} has no active will", owner))),
        }
    }

    fn apply(&mut self, sender: &Address, mutation: &WillMutation) -> Result<(), LedgerError> {
        let now = self.timestamp;
        match mutation {
            WillMutation::Create {
                beneficiaries,
                allocations,
                inactivity_timeout,
                deposit,
            } => {
                if self.records.get(sender).is_some_and(is_live) {
                    return Err(rejected(format!("{} already has an active will", sender)));
                }
                let record = json!({
                    "beneficiaries": beneficiaries,
                    "amounts": allocations.iter().copied().map(abi::encode_uint).collect::<Vec<_>>(),
                    "executed": false,
                    "lastPing": now,
                    "cancelled": false,
                    "balance": abi::encode_uint(*deposit),
                    "deathTimeout": inactivity_timeout,
                    "createdAt": now,
                });
                self.records.insert(sender.clone(), record);
                self.testators.push(sender.clone());
                self.creation_log.push(CreationEvent {
                    block_number: self.block_number + 1,
                    timestamp: Some(now),
                    owner: sender.clone(),
                    beneficiaries: beneficiaries.clone(),
                    allocations: allocations.clone(),
                    balance: *deposit,
                    inactivity_timeout: *inactivity_timeout,
                });
            }
            WillMutation::Ping => {
                let raw = self.live_record_mut(sender)?;
                abi::set_field(raw, WillField::LastLiveness, json!(now));
            }
            WillMutation::Cancel => {
                let raw = self.live_record_mut(sender)?;
                abi::set_field(raw, WillField::Cancelled, Value::Bool(true));
                abi::set_field(raw, WillField::Balance, abi::encode_uint(0));
            }
            WillMutation::Execute { testator } => {
                let raw = self.live_record_mut(testator)?;
                let last = uint(raw, WillField::LastLiveness);
                let timeout = uint(raw, WillField::InactivityTimeout);
                if u128::from(now) < last.saturating_add(timeout) {
                    return Err(rejected(format!(
                        "inactivity timeout for {} has not elapsed",
                        testator
                    )));
                }
                abi::set_field(raw, WillField::Executed, Value::Bool(true));
                abi::set_field(raw, WillField::Balance, abi::encode_uint(0));
            }
        }
        self.block_number += 1;
        Ok(())
    }
}

#[async_trait]
impl LedgerClient for InMemoryLedger {
    async fn query_creation_log(
        &self,
        range: BlockRange,
    ) -> Result<Vec<CreationEvent>, LedgerError> {
        self.check_discovery()?;
        Ok(self
            .state()
            .creation_log
            .iter()
            .filter(|e| range.contains(e.block_number))
            .cloned()
            .collect())
    }

    async fn enumerate_testators(&self) -> Result<Vec<Address>, LedgerError> {
        self.check_discovery()?;
        Ok(self.state().testators.clone())
    }

    async fn get_record(&self, owner: &Address) -> Result<RawRecord, LedgerError> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        let (delay, result) = {
            let state = self.state();
            let result = if state.unavailable.contains(owner) {
                Err(LedgerError::Unavailable {
                    address: owner.to_string(),
                })
            } else {
                Ok(state.records.get(owner).cloned().unwrap_or_else(zero_record))
            };
            (state.latency.get(owner).copied(), result)
        };
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        result
    }
}

#[async_trait]
impl LedgerMutator for InMemoryLedger {
    async fn submit(
        &self,
        sender: &Address,
        mutation: WillMutation,
    ) -> Result<MutationReceipt, LedgerError> {
        mutation
            .validate()
            .map_err(|e| rejected(e.to_string()))?;
        let mut state = self.state();
        state.apply(sender, &mutation)?;
        Ok(MutationReceipt {
            kind: mutation.kind(),
            sender: sender.clone(),
            block_number: state.block_number,
        })
    }
}

// ──────────────────────────────────────────────
// Tests
// ──────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Amount;

    fn addr(n: u8) -> Address {
        Address::from(format!("0x{:040x}", n))
    }

    fn create(deposit: Amount, timeout: u64) -> WillMutation {
        WillMutation::Create {
            beneficiaries: vec![addr(2)],
            allocations: vec![deposit],
            inactivity_timeout: timeout,
            deposit,
        }
    }

    fn balance_of(ledger: &InMemoryLedger, owner: &Address) -> u128 {
        ledger
            .record(owner)
            .map(|raw| uint(&raw, WillField::Balance))
            .unwrap_or(0)
    }

    #[tokio::test]
    async fn unknown_owner_reads_zero_record() {
        let ledger = InMemoryLedger::new();
        let raw = ledger.get_record(&addr(1)).await.unwrap();
        assert_eq!(raw, zero_record());
        assert_eq!(ledger.lookup_count(), 1);
    }

    #[tokio::test]
    async fn create_writes_record_log_and_testator() {
        let ledger = InMemoryLedger::new();
        ledger.set_time(1_000);
        let receipt = ledger.submit(&addr(1), create(50, 500)).await.unwrap();
        assert_eq!(receipt.block_number, 1);

        let raw = ledger.get_record(&addr(1)).await.unwrap();
        assert_eq!(uint(&raw, WillField::Balance), 50);
        assert_eq!(uint(&raw, WillField::LastLiveness), 1_000);
        assert_eq!(uint(&raw, WillField::CreatedAt), 1_000);

        let log = ledger.query_creation_log(BlockRange::all()).await.unwrap();
        assert_eq!(log.len(), 1);
        assert_eq!(log[0].timestamp, Some(1_000));
        assert_eq!(ledger.enumerate_testators().await.unwrap(), vec![addr(1)]);
    }

    #[tokio::test]
    async fn second_create_while_live_is_rejected() {
        let ledger = InMemoryLedger::new();
        ledger.submit(&addr(1), create(5, 10)).await.unwrap();
        let err = ledger.submit(&addr(1), create(5, 10)).await.unwrap_err();
        assert!(matches!(err, LedgerError::Rejected { .. }));
    }

    #[tokio::test]
    async fn invalid_create_is_rejected_before_applying() {
        let ledger = InMemoryLedger::new();
        let err = ledger.submit(&addr(1), create(0, 10)).await.unwrap_err();
        assert!(matches!(err, LedgerError::Rejected { .. }));
        assert!(ledger.record(&addr(1)).is_none());
        assert_eq!(ledger.block_number(), 0);
    }

    #[tokio::test]
    async fn execute_requires_elapsed_timeout() {
        let ledger = InMemoryLedger::new();
        ledger.set_time(1_000);
        ledger.submit(&addr(1), create(5, 500)).await.unwrap();

        ledger.set_time(1_499);
        let early = ledger
            .submit(&addr(3), WillMutation::Execute { testator: addr(1) })
            .await;
        assert!(matches!(early, Err(LedgerError::Rejected { .. })));

        ledger.set_time(1_500);
        ledger
            .submit(&addr(3), WillMutation::Execute { testator: addr(1) })
            .await
            .unwrap();
        let raw = ledger.record(&addr(1)).unwrap();
        assert!(flag(&raw, WillField::Executed));
        assert_eq!(balance_of(&ledger, &addr(1)), 0);
    }

    #[tokio::test]
    async fn ping_resets_liveness_on_positional_record() {
        let ledger = InMemoryLedger::new();
        ledger.insert_record(addr(1), json!([["0xaa"], ["5"], false, 100, false, "5", 50]));
        ledger.set_time(900);
        ledger.submit(&addr(1), WillMutation::Ping).await.unwrap();
        let raw = ledger.record(&addr(1)).unwrap();
        assert!(raw.is_array());
        assert_eq!(uint(&raw, WillField::LastLiveness), 900);
    }

    #[tokio::test]
    async fn cancel_zeroes_balance_and_blocks_further_mutation() {
        let ledger = InMemoryLedger::new();
        ledger.submit(&addr(1), create(5, 10)).await.unwrap();
        ledger.submit(&addr(1), WillMutation::Cancel).await.unwrap();
        assert_eq!(balance_of(&ledger, &addr(1)), 0);
        assert!(ledger.submit(&addr(1), WillMutation::Ping).await.is_err());
        // A cancelled will no longer blocks a fresh one.
        ledger.submit(&addr(1), create(7, 10)).await.unwrap();
        assert_eq!(ledger.enumerate_testators().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn injected_faults() {
        let ledger = InMemoryLedger::new();
        ledger.set_unavailable(&addr(1), true);
        assert!(matches!(
            ledger.get_record(&addr(1)).await,
            Err(LedgerError::Unavailable { .. })
        ));
        ledger.set_unavailable(&addr(1), false);
        assert!(ledger.get_record(&addr(1)).await.is_ok());

        ledger.fail_discovery(Some(LedgerError::Rpc("node down".into())));
        assert!(ledger.enumerate_testators().await.is_err());
        assert!(ledger.query_creation_log(BlockRange::all()).await.is_err());
        ledger.fail_discovery(None);
        assert!(ledger.enumerate_testators().await.is_ok());
    }

    #[tokio::test]
    async fn creation_log_honours_range() {
        let ledger = InMemoryLedger::new();
        for block in [1, 5, 9] {
            ledger.push_creation_event(CreationEvent {
                block_number: block,
                timestamp: None,
                owner: addr(1),
                beneficiaries: vec![],
                allocations: vec![],
                balance: 1,
                inactivity_timeout: 1,
            });
        }
        let log = ledger
            .query_creation_log(BlockRange {
                from: 2,
                to: Some(9),
            })
            .await
            .unwrap();
        let blocks: Vec<u64> = log.iter().map(|e| e.block_number).collect();
        assert_eq!(blocks, vec![5, 9]);
    }

    #[tokio::test]
    async fn fixture_round_trip_through_json() {
        let fixture: LedgerFixture = serde_json::from_value(json!({
            "blockNumber": 4,
            "timestamp": 77,
            "records": { "0xAA": { "balance": "3" } },
            "testators": ["0xaa", "0xAA"],
            "creationLog": [],
            "unavailable": ["0xbb"]
        }))
        .unwrap();
        let ledger = InMemoryLedger::from_fixture(fixture);
        assert_eq!(ledger.timestamp(), 77);
        assert_eq!(ledger.block_number(), 4);
        assert_eq!(balance_of(&ledger, &Address::from("0xaa")), 3);
        assert_eq!(ledger.enumerate_testators().await.unwrap().len(), 2);
        assert!(ledger.get_record(&Address::from("0xbb")).await.is_err());
    }
}
