//! Field layout of the will contract's storage record.
//!
//! Ledger clients hand back a will either as a positional tuple (a JSON
//! array in declaration order) or as a named object keyed by the contract's
//! ABI names. [`field`] and [`set_field`] are the only places that know the
//! difference; everything above them addresses fields by [`WillField`].

use serde_json::Value;

use crate::address::Address;

/// One slot of the will storage record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WillField {
    Beneficiaries,
    Allocations,
    Executed,
    LastLiveness,
    Cancelled,
    Balance,
    InactivityTimeout,
    CreatedAt,
}

impl WillField {
    /// Declaration order of the positional tuple.
    pub const ORDER: [WillField; 8] = [
        WillField::Beneficiaries,
        WillField::Allocations,
        WillField::Executed,
        WillField::LastLiveness,
        WillField::Cancelled,
        WillField::Balance,
        WillField::InactivityTimeout,
        WillField::CreatedAt,
    ];

    pub fn position(self) -> usize {
        match self {
            WillField::Beneficiaries => 0,
            WillField::Allocations => 1,
            WillField::Executed => 2,
            WillField::LastLiveness => 3,
            WillField::Cancelled => 4,
            WillField::Balance => 5,
            WillField::InactivityTimeout => 6,
            WillField::CreatedAt => 7,
        }
    }

    pub fn abi_name(self) -> &'static str {
        match self {
            WillField::Beneficiaries => "beneficiaries",
            WillField::Allocations => "amounts",
            WillField::Executed => "executed",
            WillField::LastLiveness => "lastPing",
            WillField::Cancelled => "cancelled",
            WillField::Balance => "balance",
            WillField::InactivityTimeout => "deathTimeout",
            WillField::CreatedAt => "createdAt",
        }
    }
}

/// Look up a field in a raw record of either shape.
///
/// Returns `None` for missing slots, explicit nulls, and records that are
/// neither arrays nor objects.
pub fn field(raw: &Value, slot: WillField) -> Option<&Value> {
    let value = match raw {
        Value::Array(items) => items.get(slot.position()),
        Value::Object(map) => map.get(slot.abi_name()),
        _ => None,
    }?;
    if value.is_null() {
        None
    } else {
        Some(value)
    }
}

/// Write a field into a raw record, preserving its shape.
///
/// Positional records are padded with nulls up to the slot. A record that
/// is neither an array nor an object is replaced by a named object.
pub fn set_field(raw: &mut Value, slot: WillField, value: Value) {
    match raw {
        Value::Array(items) => {
            let pos = slot.position();
            if items.len() <= pos {
                items.resize(pos + 1, Value::Null);
            }
            items[pos] = value;
        }
        Value::Object(map) => {
            map.insert(slot.abi_name().to_string(), value);
        }
        other => {
            let mut map = serde_json::Map::new();
            map.insert(slot.abi_name().to_string(), value);
            *other = Value::Object(map);
        }
    }
}

/// Decode an unsigned integer from a JSON number, decimal string, or `0x`
/// hex string.
///
/// Numbers keep their literal digits, so wei amounts past `u64::MAX`
/// decode exactly.
pub fn decode_uint(value: &Value) -> Option<u128> {
    match value {
        Value::Number(n) => n
            .as_u64()
            .map(u128::from)
            .or_else(|| n.to_string().parse::<u128>().ok()),
        Value::String(s) => {
            let s = s.trim();
            if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
                if hex.is_empty() {
                    return Some(0);
                }
                u128::from_str_radix(hex, 16).ok()
            } else {
                s.parse::<u128>().ok()
            }
        }
        _ => None,
    }
}

/// Decode a boolean from a JSON bool, `0`/`1`, or `"true"`/`"false"`.
pub fn decode_bool(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::Number(n) => match n.as_u64() {
            Some(0) => Some(false),
            Some(1) => Some(true),
            _ => None,
        },
        Value::String(s) => match s.trim() {
            "true" | "1" => Some(true),
            "false" | "0" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

pub fn decode_address(value: &Value) -> Option<Address> {
    value.as_str().map(Address::from)
}

/// Encode an amount the way ledger RPC clients do (decimal string), since
/// JSON numbers cannot carry the full 256-bit range.
pub fn encode_uint(value: u128) -> Value {
    Value::String(value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn positional_and_named_lookups_agree() {
        let positional = json!([["0xaa"], ["5"], false, 1000, false, "5", 500]);
        let named = json!({
            "beneficiaries": ["0xaa"],
            "amounts": ["5"],
            "executed": false,
            "lastPing": 1000,
            "cancelled": false,
            "balance": "5",
            "deathTimeout": 500
        });
        for slot in WillField::ORDER {
            assert_eq!(field(&positional, slot), field(&named, slot), "{slot:?}");
        }
    }

    #[test]
    fn null_and_scalar_records_have_no_fields() {
        assert!(field(&Value::Null, WillField::Balance).is_none());
        assert!(field(&json!(42), WillField::Balance).is_none());
        assert!(field(&json!({"balance": null}), WillField::Balance).is_none());
    }

    #[test]
    fn set_field_pads_positional_records() {
        let mut raw = json!([["0xaa"]]);
        set_field(&mut raw, WillField::Balance, json!("7"));
        assert_eq!(raw.as_array().map(Vec::len), Some(6));
        assert_eq!(field(&raw, WillField::Balance), Some(&json!("7")));
        assert!(field(&raw, WillField::Executed).is_none());
    }

    #[test]
    fn set_field_replaces_scalar_records() {
        let mut raw = json!("garbage");
        set_field(&mut raw, WillField::Cancelled, json!(true));
        assert_eq!(raw, json!({"cancelled": true}));
    }

    #[test]
    fn decode_uint_forms() {
        assert_eq!(decode_uint(&json!(12)), Some(12));
        assert_eq!(decode_uint(&json!("12")), Some(12));
        assert_eq!(decode_uint(&json!("0x1f")), Some(31));
        assert_eq!(decode_uint(&json!("0x")), Some(0));
        assert_eq!(
            decode_uint(&json!("1000000000000000000000")),
            Some(1_000_000_000_000_000_000_000)
        );
        assert_eq!(decode_uint(&json!(-1)), None);
        assert_eq!(decode_uint(&json!(1.5)), None);
        assert_eq!(decode_uint(&json!("abc")), None);
        assert_eq!(decode_uint(&json!(true)), None);
    }

    #[test]
    fn decode_uint_numbers_past_u64() {
        let big: Value = serde_json::from_str("20000000000000000000").unwrap();
        assert_eq!(decode_uint(&big), Some(20_000_000_000_000_000_000));
        let max: Value = serde_json::from_str("340282366920938463463374607431768211455").unwrap();
        assert_eq!(decode_uint(&max), Some(u128::MAX));
        let over: Value = serde_json::from_str("340282366920938463463374607431768211456").unwrap();
        assert_eq!(decode_uint(&over), None);
        let huge_float: Value = serde_json::from_str("2e19").unwrap();
        assert_eq!(decode_uint(&huge_float), None);
    }

    #[test]
    fn decode_bool_forms() {
        assert_eq!(decode_bool(&json!(true)), Some(true));
        assert_eq!(decode_bool(&json!(0)), Some(false));
        assert_eq!(decode_bool(&json!("true")), Some(true));
        assert_eq!(decode_bool(&json!(2)), None);
        assert_eq!(decode_bool(&json!("yes")), None);
    }
}
