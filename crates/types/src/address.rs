//! Account addresses
//!
//! An address is 32 raw bytes. Its text form is the letter `m` followed by
//! the bytes in lowercase hex, which is also how it appears in JSON and in
//! genesis files.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AddressError {
    #[error("address must start with 'm'")]
    InvalidPrefix,
    #[error("address must be {expected} characters, got {actual}")]
    InvalidLength { expected: usize, actual: usize },
    #[error("address payload is not hex: {0}")]
    InvalidHex(#[from] hex::FromHexError),
    #[error("address payload does not decode to 32 bytes")]
    InvalidPayloadLength,
}

pub const ADDRESS_PREFIX: char = 'm';
pub const ADDRESS_BYTES: usize = 32;
/// `m` plus two hex digits per byte.
pub const ADDRESS_STRING_LENGTH: usize = 1 + ADDRESS_BYTES * 2;

const MODULE_ACCOUNT_DOMAIN: &[u8] = b"epochmint/module/";

pub fn encode_address(bytes: &[u8; ADDRESS_BYTES]) -> String {
    format!("{ADDRESS_PREFIX}{}", hex::encode(bytes))
}

pub fn decode_address(address: &str) -> Result<[u8; ADDRESS_BYTES], AddressError> {
    let payload = address
        .strip_prefix(ADDRESS_PREFIX)
        .ok_or(AddressError::InvalidPrefix)?;
    if address.len() != ADDRESS_STRING_LENGTH {
        return Err(AddressError::InvalidLength {
            expected: ADDRESS_STRING_LENGTH,
            actual: address.len(),
        });
    }

    let mut bytes = [0u8; ADDRESS_BYTES];
    hex::decode_to_slice(payload, &mut bytes).map_err(|err| match err {
        hex::FromHexError::InvalidStringLength => AddressError::InvalidPayloadLength,
        other => AddressError::InvalidHex(other),
    })?;
    Ok(bytes)
}

/// Deterministic account id owned by a module rather than a key pair.
///
/// Nobody holds a private key for these accounts; funds only move out of
/// them through the owning module's own logic.
pub fn module_address(module: &str) -> Address {
    let mut hasher = blake3::Hasher::new();
    hasher.update(MODULE_ACCOUNT_DOMAIN);
    hasher.update(module.as_bytes());
    Address(*hasher.finalize().as_bytes())
}

/// Account address, serialised as its string form in JSON.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Address(pub [u8; ADDRESS_BYTES]);

impl Address {
    pub fn as_bytes(&self) -> &[u8; ADDRESS_BYTES] {
        &self.0
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&encode_address(&self.0))
    }
}

impl FromStr for Address {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        decode_address(s).map(Address)
    }
}

impl From<[u8; ADDRESS_BYTES]> for Address {
    fn from(value: [u8; ADDRESS_BYTES]) -> Self {
        Address(value)
    }
}

impl From<Address> for String {
    fn from(value: Address) -> Self {
        encode_address(&value.0)
    }
}

impl TryFrom<String> for Address {
    type Error = AddressError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        decode_address(&value).map(Address)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_payload(prefix: &str, payload: &str) -> String {
        format!("{prefix}{payload}")
    }

    #[test]
    fn text_form_is_prefixed_hex() {
        let address = Address([0xAB; ADDRESS_BYTES]);
        let text = address.to_string();
        assert_eq!(text, with_payload("m", &"ab".repeat(ADDRESS_BYTES)));
        assert_eq!(text.parse::<Address>().unwrap(), address);
    }

    #[test]
    fn decode_reports_what_is_wrong() {
        assert_eq!(
            decode_address(&with_payload("x", &"00".repeat(ADDRESS_BYTES))),
            Err(AddressError::InvalidPrefix)
        );
        assert_eq!(
            decode_address(&with_payload("m", &"00".repeat(ADDRESS_BYTES - 1))),
            Err(AddressError::InvalidLength {
                expected: ADDRESS_STRING_LENGTH,
                actual: ADDRESS_STRING_LENGTH - 2,
            })
        );
        assert!(matches!(
            decode_address(&with_payload("m", &"gg".repeat(ADDRESS_BYTES))),
            Err(AddressError::InvalidHex(_))
        ));
    }

    #[test]
    fn errors_compare_by_value() {
        let a = "m".parse::<Address>().unwrap_err();
        let b = "m".parse::<Address>().unwrap_err();
        assert_eq!(a, b);
        assert_ne!(a, AddressError::InvalidPrefix);
    }

    #[test]
    fn module_addresses_are_stable_and_distinct() {
        assert_eq!(module_address("mint"), module_address("mint"));
        assert_ne!(module_address("mint"), module_address("fee_collector"));
    }

    #[test]
    fn address_serializes_as_string() {
        let addr = Address([7u8; ADDRESS_BYTES]);
        let json = serde_json::to_string(&addr).unwrap();
        assert_eq!(json, format!("\"{}\"", addr));

        let back: Address = serde_json::from_str(&json).unwrap();
        assert_eq!(back, addr);

        assert!(serde_json::from_str::<Address>("\"mzz\"").is_err());
    }
}
