//! Account address type, rendered as `0x`-prefixed hex.

use crate::error::AddressError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// A 20-byte account address on either chain.
///
/// Serialised as its `0x…` string form so that configuration files and wire
/// payloads use the same representation.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Address([u8; 20]);

impl Address {
    /// The all-zero address. Never a valid owner or counterpart.
    pub const ZERO: Self = Self([0u8; 20]);

    pub const LEN: usize = 20;

    pub fn new(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }

    /// Build an address whose low 8 bytes hold `value` (big-endian).
    pub fn from_low_u64(value: u64) -> Self {
        let mut bytes = [0u8; 20];
        bytes[12..].copy_from_slice(&value.to_be_bytes());
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 20]
    }
}

impl FromStr for Address {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s
            .strip_prefix("0x")
            .or_else(|| s.strip_prefix("0X"))
            .ok_or_else(|| AddressError::MissingPrefix(s.to_string()))?;
        if digits.len() != Self::LEN * 2 {
            return Err(AddressError::WrongLength {
                expected: Self::LEN * 2,
                actual: digits.len(),
            });
        }
        let mut bytes = [0u8; 20];
        hex::decode_to_slice(digits, &mut bytes)
            .map_err(|e| AddressError::InvalidHex(e.to_string()))?;
        Ok(Self(bytes))
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address(0x{}…)", hex::encode(&self.0[..4]))
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_and_displays_lowercase_hex() {
        let raw = "0x5d2c31ce16924c2a71d317e5bbfd5ce387854039";
        let addr: Address = raw.parse().unwrap();
        assert_eq!(addr.to_string(), raw);
    }

    #[test]
    fn accepts_mixed_case() {
        let addr: Address = "0x5d2C31ce16924C2a71D317e5BbFd5ce387854039".parse().unwrap();
        assert_eq!(addr.as_bytes()[0], 0x5d);
    }

    #[test]
    fn rejects_missing_prefix() {
        let err = "5d2c31ce16924c2a71d317e5bbfd5ce387854039"
            .parse::<Address>()
            .unwrap_err();
        assert!(matches!(err, AddressError::MissingPrefix(_)));
    }

    #[test]
    fn rejects_short_input() {
        let err = "0x1234".parse::<Address>().unwrap_err();
        assert!(matches!(
            err,
            AddressError::WrongLength { expected: 40, actual: 4 }
        ));
    }

    #[test]
    fn rejects_non_hex() {
        let err = "0xzz2c31ce16924c2a71d317e5bbfd5ce387854039"
            .parse::<Address>()
            .unwrap_err();
        assert!(matches!(err, AddressError::InvalidHex(_)));
    }

    #[test]
    fn from_low_u64_is_distinct_and_nonzero() {
        assert_ne!(Address::from_low_u64(1), Address::from_low_u64(2));
        assert!(!Address::from_low_u64(1).is_zero());
        assert!(Address::ZERO.is_zero());
    }
}
