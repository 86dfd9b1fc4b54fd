use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A ledger account address.
///
/// Stored in lowercase so that checksum-cased and lowercase spellings of the
/// same account compare, hash, and order identically. Construction from
/// ledger data (`From<String>`) is lenient; parsing user input (`FromStr`)
/// requires a well-formed `0x` + 40 hex digit address.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct Address(String);

impl Address {
    pub const ZERO_HEX: &'static str = "0x0000000000000000000000000000000000000000";

    pub fn zero() -> Self {
        Address(Self::ZERO_HEX.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_zero(&self) -> bool {
        let digits = self.0.strip_prefix("0x").unwrap_or(&self.0);
        !digits.is_empty() && digits.bytes().all(|b| b == b'0')
    }

    /// `0x1234...abcd` form for display in narrow columns.
    pub fn short(&self) -> String {
        if self.0.len() <= 10 || !self.0.is_ascii() {
            return self.0.clone();
        }
        format!("{}...{}", &self.0[..6], &self.0[self.0.len() - 4..])
    }
}

impl From<String> for Address {
    fn from(s: String) -> Self {
        Address(s.trim().to_ascii_lowercase())
    }
}

impl From<&str> for Address {
    fn from(s: &str) -> Self {
        Address::from(s.to_string())
    }
}

impl From<Address> for String {
    fn from(a: Address) -> Self {
        a.0
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Error returned when parsing a malformed address.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid address '{0}': expected 0x followed by 40 hex digits")]
pub struct AddressParseError(pub String);

impl FromStr for Address {
    type Err = AddressParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let digits = trimmed
            .strip_prefix("0x")
            .or_else(|| trimmed.strip_prefix("0X"))
            .ok_or_else(|| AddressParseError(s.to_string()))?;
        if digits.len() != 40 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(AddressParseError(s.to_string()));
        }
        Ok(Address::from(trimmed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MIXED: &str = "0xAbCdEf0123456789aBcDeF0123456789ABCDEF01";

    #[test]
    fn mixed_case_spellings_are_equal() {
        let a = Address::from(MIXED);
        let b = Address::from(MIXED.to_lowercase());
        assert_eq!(a, b);
        assert_eq!(a.as_str(), "0xabcdef0123456789abcdef0123456789abcdef01");
    }

    #[test]
    fn parse_rejects_malformed() {
        assert!("0x1234".parse::<Address>().is_err());
        assert!("abcdef0123456789abcdef0123456789abcdef01"
            .parse::<Address>()
            .is_err());
        assert!("0xzzcdef0123456789abcdef0123456789abcdef01"
            .parse::<Address>()
            .is_err());
        assert!(MIXED.parse::<Address>().is_ok());
    }

    #[test]
    fn zero_address() {
        assert!(Address::zero().is_zero());
        assert!(!Address::from(MIXED).is_zero());
    }

    #[test]
    fn short_form() {
        assert_eq!(Address::from(MIXED).short(), "0xabcd...ef01");
        assert_eq!(Address::from("0x12").short(), "0x12");
    }

    #[test]
    fn serde_normalizes_case() {
        let a: Address = serde_json::from_str(&format!("\"{MIXED}\"")).unwrap();
        assert_eq!(a, Address::from(MIXED.to_lowercase()));
        assert_eq!(
            serde_json::to_string(&a).unwrap(),
            "\"0xabcdef0123456789abcdef0123456789abcdef01\""
        );
    }
}
