//! Account address parsing, validation, and creation.
//!
//! An address is the bech32 (`erd1...`) encoding of a 32-byte ed25519
//! public key. Also parses the payloads a QR scan can return.

use crate::constants::{ADDRESS_HRP, KEY_SIZE};
use bech32::{FromBase32, ToBase32, Variant};
use std::fmt;
use thiserror::Error;

/// URI scheme accepted from QR payloads.
const URI_SCHEME: &str = "multiversx:";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AddressError {
    #[error("address must be a non-empty string")]
    Empty,

    #[error("bech32 decode error: {0}")]
    Bech32(String),

    #[error("wrong address prefix: expected \"{expected}\", got \"{actual}\"")]
    WrongHrp { expected: &'static str, actual: String },

    #[error("invalid data length: expected {expected} bytes, got {actual}")]
    InvalidDataLength { expected: usize, actual: usize },

    #[error("address must use bech32 checksum, not bech32m")]
    WrongVariant,
}

/// A decoded account address.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Address {
    pubkey: [u8; KEY_SIZE],
}

impl Address {
    /// Build from a raw ed25519 public key.
    pub fn from_public_key(pubkey: [u8; KEY_SIZE]) -> Self {
        Self { pubkey }
    }

    /// Parse and validate a bech32 address.
    pub fn from_bech32(s: &str) -> Result<Self, AddressError> {
        let s = s.trim();
        if s.is_empty() {
            return Err(AddressError::Empty);
        }

        let (hrp, data, variant) =
            bech32::decode(s).map_err(|e| AddressError::Bech32(e.to_string()))?;
        if hrp != ADDRESS_HRP {
            return Err(AddressError::WrongHrp {
                expected: ADDRESS_HRP,
                actual: hrp,
            });
        }
        if variant != Variant::Bech32 {
            return Err(AddressError::WrongVariant);
        }

        let bytes =
            Vec::<u8>::from_base32(&data).map_err(|e| AddressError::Bech32(e.to_string()))?;
        if bytes.len() != KEY_SIZE {
            return Err(AddressError::InvalidDataLength {
                expected: KEY_SIZE,
                actual: bytes.len(),
            });
        }

        let mut pubkey = [0u8; KEY_SIZE];
        pubkey.copy_from_slice(&bytes);
        Ok(Self { pubkey })
    }

    /// Bech32 string form.
    pub fn to_bech32(&self) -> String {
        // Encoding a 32-byte payload under a constant valid HRP cannot fail.
        bech32::encode(ADDRESS_HRP, self.pubkey.to_base32(), Variant::Bech32)
            .unwrap_or_default()
    }

    pub fn public_key(&self) -> &[u8; KEY_SIZE] {
        &self.pubkey
    }

    /// Hex of the public key, as some gateway endpoints expect it.
    pub fn to_hex(&self) -> String {
        hex::encode(self.pubkey)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_bech32())
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", self.to_bech32())
    }
}

impl std::str::FromStr for Address {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, AddressError> {
        Self::from_bech32(s)
    }
}

/// Check whether a string is a valid account address.
pub fn is_valid_address(s: &str) -> bool {
    Address::from_bech32(s).is_ok()
}

/// Recipient decoded from a scanned QR payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScannedRecipient {
    pub address: Address,
    /// Amount as written in the URI (display units), if any.
    pub amount: Option<String>,
}

/// Parse a QR payload: either a bare address or `multiversx:<address>[?amount=..]`.
pub fn parse_scanned_recipient(payload: &str) -> Result<ScannedRecipient, AddressError> {
    let payload = payload.trim();
    let body = payload.strip_prefix(URI_SCHEME).unwrap_or(payload);

    let (addr_part, query) = match body.split_once('?') {
        Some((a, q)) => (a, Some(q)),
        None => (body, None),
    };

    let address = Address::from_bech32(addr_part)?;
    let amount = query.and_then(|q| {
        q.split('&')
            .filter_map(|pair| pair.split_once('='))
            .find(|(k, _)| *k == "amount")
            .map(|(_, v)| v.to_string())
    });

    Ok(ScannedRecipient { address, amount })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bech32_roundtrip() {
        let addr = Address::from_public_key([7u8; 32]);
        let s = addr.to_bech32();
        assert!(s.starts_with("erd1"));
        assert_eq!(s.len(), 62);
        assert_eq!(Address::from_bech32(&s).unwrap(), addr);
    }

    #[test]
    fn test_known_address() {
        // Zero key encodes to the well-known system address.
        let addr = Address::from_public_key([0u8; 32]);
        assert_eq!(
            addr.to_bech32(),
            "erd1qqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqq6gq4hu"
        );
    }

    #[test]
    fn test_empty_rejected() {
        assert_eq!(Address::from_bech32("  "), Err(AddressError::Empty));
    }

    #[test]
    fn test_wrong_hrp_rejected() {
        let other = bech32::encode("xyz", [1u8; 32].to_base32(), Variant::Bech32).unwrap();
        assert!(matches!(
            Address::from_bech32(&other),
            Err(AddressError::WrongHrp { .. })
        ));
    }

    #[test]
    fn test_wrong_length_rejected() {
        let short = bech32::encode("erd", [1u8; 20].to_base32(), Variant::Bech32).unwrap();
        assert!(matches!(
            Address::from_bech32(&short),
            Err(AddressError::InvalidDataLength { expected: 32, actual: 20 })
        ));
    }

    #[test]
    fn test_corrupted_checksum_rejected() {
        let mut s = Address::from_public_key([9u8; 32]).to_bech32();
        let last = s.pop().unwrap();
        s.push(if last == 'q' { 'p' } else { 'q' });
        assert!(!is_valid_address(&s));
    }

    #[test]
    fn test_parse_scanned_bare_address() {
        let addr = Address::from_public_key([3u8; 32]);
        let scanned = parse_scanned_recipient(&format!(" {} ", addr)).unwrap();
        assert_eq!(scanned.address, addr);
        assert_eq!(scanned.amount, None);
    }

    #[test]
    fn test_parse_scanned_uri_with_amount() {
        let addr = Address::from_public_key([4u8; 32]);
        let payload = format!("multiversx:{}?label=coffee&amount=1.25", addr);
        let scanned = parse_scanned_recipient(&payload).unwrap();
        assert_eq!(scanned.address, addr);
        assert_eq!(scanned.amount.as_deref(), Some("1.25"));
    }

    #[test]
    fn test_parse_scanned_garbage() {
        assert!(parse_scanned_recipient("hello world").is_err());
    }
}
