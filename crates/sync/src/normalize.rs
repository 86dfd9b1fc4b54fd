//! Raw ledger record → [`WillRecord`].
//!
//! Decoding never fails. Missing or undecodable fields take their default
//! (empty sequence, zero, `false`); a scalar where a sequence belongs is
//! treated as a one-element sequence; beneficiaries and allocations are
//! truncated to the shorter of the two so they always pair up. Elements
//! that do not decode keep their position (zero address / zero amount) so
//! the pairing of the remaining elements is preserved.

use std::collections::HashMap;

use serde_json::Value;
use willwatch_ledger::abi::{self, WillField};
use willwatch_ledger::{Address, Amount, CreationEvent, RawRecord};

use crate::record::WillRecord;

/// Normalize the record stored under `owner`.
pub fn normalize(owner: &Address, raw: &RawRecord) -> WillRecord {
    let mut beneficiaries: Vec<Address> = sequence(raw, WillField::Beneficiaries)
        .into_iter()
        .map(|v| abi::decode_address(v).unwrap_or_else(Address::zero))
        .collect();
    let mut allocations: Vec<Amount> = sequence(raw, WillField::Allocations)
        .into_iter()
        .map(|v| abi::decode_uint(v).unwrap_or(0))
        .collect();

    let paired = beneficiaries.len().min(allocations.len());
    beneficiaries.truncate(paired);
    allocations.truncate(paired);

    WillRecord {
        owner: owner.clone(),
        beneficiaries,
        allocations,
        balance: uint(raw, WillField::Balance),
        created_at: seconds(raw, WillField::CreatedAt),
        last_liveness: seconds(raw, WillField::LastLiveness),
        inactivity_timeout: seconds(raw, WillField::InactivityTimeout),
        executed: flag(raw, WillField::Executed),
        cancelled: flag(raw, WillField::Cancelled),
    }
}

/// Newest creation timestamp per owner. Events without a timestamp are
/// ignored; later events in `events` win.
pub fn creation_times(events: &[CreationEvent]) -> HashMap<Address, u64> {
    let mut times = HashMap::new();
    for event in events {
        if let Some(ts) = event.timestamp {
            times.insert(event.owner.clone(), ts);
        }
    }
    times
}

/// Fill in `created_at` from the creation log when the record has none.
pub fn backfill_created_at(record: &mut WillRecord, times: &HashMap<Address, u64>) {
    if record.created_at == 0 {
        if let Some(ts) = times.get(&record.owner) {
            record.created_at = *ts;
        }
    }
}

fn sequence(raw: &RawRecord, slot: WillField) -> Vec<&Value> {
    match abi::field(raw, slot) {
        None => Vec::new(),
        Some(Value::Array(items)) => items.iter().collect(),
        Some(scalar) => vec![scalar],
    }
}

fn uint(raw: &RawRecord, slot: WillField) -> Amount {
    abi::field(raw, slot).and_then(abi::decode_uint).unwrap_or(0)
}

fn seconds(raw: &RawRecord, slot: WillField) -> u64 {
    u64::try_from(uint(raw, slot)).unwrap_or(u64::MAX)
}

fn flag(raw: &RawRecord, slot: WillField) -> bool {
    abi::field(raw, slot)
        .and_then(abi::decode_bool)
        .unwrap_or(false)
}

// ──────────────────────────────────────────────
// Tests
// ──────────────────────────────────────────────
