use serde::{Deserialize, Serialize};

use crate::address::Address;

/// Amount in the ledger's smallest unit (wei).
pub type Amount = u128;

/// A will record exactly as the ledger returned it.
///
/// The shape is not trusted: it may be a positional tuple, a named object,
/// `null`, or something else entirely. See [`crate::abi`].
pub type RawRecord = serde_json::Value;

/// One entry of the append-only `WillCreated` event log.
///
/// Events record the will as it was at creation time and are never
/// updated afterwards, even when the will is pinged, cancelled, or executed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreationEvent {
    pub block_number: u64,
    /// Block timestamp (seconds), when the adapter can supply it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<u64>,
    pub owner: Address,
    #[serde(default)]
    pub beneficiaries: Vec<Address>,
    #[serde(default, with = "amount_list")]
    pub allocations: Vec<Amount>,
    #[serde(with = "amount")]
    pub balance: Amount,
    pub inactivity_timeout: u64,
}

/// Inclusive block range for log queries. `to: None` means the chain head.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BlockRange {
    pub from: u64,
    pub to: Option<u64>,
}

impl BlockRange {
    /// Genesis to head.
    pub fn all() -> Self {
        Self::default()
    }

    pub fn contains(&self, block: u64) -> bool {
        block >= self.from && self.to.map_or(true, |to| block <= to)
    }
}

/// Amounts serialize as decimal strings and deserialize from either a
/// string or a JSON number.
pub mod amount {
    use serde::{Deserialize, Deserializer, Serializer};

    use super::Amount;

    #[derive(Deserialize)]
    #[serde(untagged)]
    pub(super) enum Repr {
        Number(serde_json::Number),
        Text(String),
    }

    impl Repr {
        pub(super) fn into_amount<E: serde::de::Error>(self) -> Result<Amount, E> {
            match self {
                Repr::Number(n) => n
                    .to_string()
                    .parse::<Amount>()
                    .map_err(|e| E::custom(format!("invalid amount {}: {}", n, e))),
                Repr::Text(s) => s
                    .trim()
                    .parse::<Amount>()
                    .map_err(|e| E::custom(format!("invalid amount '{}': {}", s, e))),
            }
        }
    }

    pub fn serialize<S: Serializer>(value: &Amount, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Amount, D::Error> {
        Repr::deserialize(deserializer)?.into_amount()
    }
}

/// Sequence form of [`amount`].
pub mod amount_list {
    use serde::ser::SerializeSeq;
    use serde::{Deserialize, Deserializer, Serializer};

    use super::amount::Repr;
    use super::Amount;

    pub fn serialize<S: Serializer>(values: &[Amount], serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(values.len()))?;
        for v in values {
            seq.serialize_element(&v.to_string())?;
        }
        seq.end()
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Vec<Amount>, D::Error> {
        Vec::<Repr>::deserialize(deserializer)?
            .into_iter()
            .map(Repr::into_amount)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn creation_event_accepts_string_and_number_amounts() {
        let event: CreationEvent = serde_json::from_value(serde_json::json!({
            "blockNumber": 7,
            "owner": "0xAA",
            "beneficiaries": ["0xbb"],
            "allocations": [1, "2000000000000000000000"],
            "balance": "2000000000000000000001",
            "inactivityTimeout": 600
        }))
        .unwrap();
        assert_eq!(event.owner, Address::from("0xaa"));
        assert_eq!(event.allocations, vec![1, 2_000_000_000_000_000_000_000]);
        assert_eq!(event.balance, 2_000_000_000_000_000_000_001);
        assert_eq!(event.timestamp, None);
    }

    #[test]
    fn amounts_past_u64_parse_exactly_from_numbers() {
        let event: CreationEvent = serde_json::from_str(
            r#"{
                "blockNumber": 3,
                "owner": "0xaa",
                "allocations": [20000000000000000001, 7],
                "balance": 340282366920938463463374607431768211455,
                "inactivityTimeout": 60
            }"#,
        )
        .unwrap();
        assert_eq!(event.allocations, vec![20_000_000_000_000_000_001, 7]);
        assert_eq!(event.balance, u128::MAX);
    }

    #[test]
    fn fractional_or_negative_amounts_are_rejected() {
        for balance in ["1.5", "-3", "340282366920938463463374607431768211456"] {
            let json = format!(
                r#"{{ "blockNumber": 1, "owner": "0xaa", "balance": {}, "inactivityTimeout": 1 }}"#,
                balance
            );
            assert!(serde_json::from_str::<CreationEvent>(&json).is_err(), "{}", balance);
        }
    }

    #[test]
    fn creation_event_rejects_bad_amount() {
        let result: Result<CreationEvent, _> = serde_json::from_value(serde_json::json!({
            "blockNumber": 1,
            "owner": "0xaa",
            "balance": "ten",
            "inactivityTimeout": 1
        }));
        assert!(result.is_err());
    }

    #[test]
    fn block_range_bounds() {
        assert!(BlockRange::all().contains(0));
        assert!(BlockRange::all().contains(u64::MAX));
        let r = BlockRange {
            from: 5,
            to: Some(10),
        };
        assert!(!r.contains(4));
        assert!(r.contains(5));
        assert!(r.contains(10));
        assert!(!r.contains(11));
    }
}
