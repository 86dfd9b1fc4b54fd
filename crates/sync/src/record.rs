use serde::{Deserialize, Serialize};
use willwatch_ledger::{amount, amount_list, Address, Amount};

use crate::status::DerivedStatus;

/// The canonical, typed form of a will as seen at one point in time.
///
/// Always satisfies `beneficiaries.len() == allocations.len()`; the
/// normalizer enforces this when building it from raw ledger data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WillRecord {
    pub owner: Address,
    pub beneficiaries: Vec<Address>,
    #[serde(with = "amount_list")]
    pub allocations: Vec<Amount>,
    #[serde(with = "amount")]
    pub balance: Amount,
    /// Creation time (seconds). `0` when neither the record nor the
    /// creation log says.
    pub created_at: u64,
    /// Time of the last liveness ping (seconds).
    pub last_liveness: u64,
    /// Seconds of inactivity after which the will becomes executable.
    pub inactivity_timeout: u64,
    pub executed: bool,
    pub cancelled: bool,
}

impl WillRecord {
    /// The all-zero record the ledger reports for an address without a will.
    pub fn empty(owner: Address) -> Self {
        WillRecord {
            owner,
            beneficiaries: Vec::new(),
            allocations: Vec::new(),
            balance: 0,
            created_at: 0,
            last_liveness: 0,
            inactivity_timeout: 0,
            executed: false,
            cancelled: false,
        }
    }

    /// Moment the will becomes executable absent a ping. Saturates rather
    /// than wrapping for absurd timeouts.
    pub fn expiry(&self) -> u64 {
        self.last_liveness.saturating_add(self.inactivity_timeout)
    }

    pub fn is_terminal(&self) -> bool {
        self.executed || self.cancelled
    }

    /// Beneficiaries paired with their allocations.
    pub fn shares(&self) -> impl Iterator<Item = (&Address, Amount)> + '_ {
        self.beneficiaries
            .iter()
            .zip(self.allocations.iter().copied())
    }
}

/// A record together with the status derived for it in the same pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WillView {
    pub record: WillRecord,
    pub status: DerivedStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expiry_saturates() {
        let mut record = WillRecord::empty(Address::from("0xaa"));
        record.last_liveness = u64::MAX - 1;
        record.inactivity_timeout = 10;
        assert_eq!(record.expiry(), u64::MAX);
    }

    #[test]
    fn serializes_amounts_as_strings() {
        let mut record = WillRecord::empty(Address::from("0xaa"));
        record.beneficiaries = vec![Address::from("0xbb")];
        record.allocations = vec![u128::MAX];
        record.balance = u128::MAX;
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["balance"], serde_json::json!(u128::MAX.to_string()));
        assert_eq!(json["lastLiveness"], serde_json::json!(0));
        let back: WillRecord = serde_json::from_value(json).unwrap();
        assert_eq!(back, record);
    }
}
