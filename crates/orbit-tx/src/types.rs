//! Typed transaction structures.
//!
//! The field order of [`Transaction`] is the canonical order of the JSON
//! serialization that gets signed; do not reorder fields.

use base64::Engine;
use serde::{Serialize, Serializer};

// ─── Payments ───────────────────────────────────────────────────────────────

/// What a transfer moves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payment {
    /// Native EGLD, in base units.
    Egld(u128),
    /// A fungible ESDT token, in the token's base units.
    Esdt { token: String, amount: u128 },
}

impl Payment {
    pub fn amount(&self) -> u128 {
        match self {
            Payment::Egld(amount) => *amount,
            Payment::Esdt { amount, .. } => *amount,
        }
    }

    pub fn is_esdt(&self) -> bool {
        matches!(self, Payment::Esdt { .. })
    }
}

// ─── Core Transaction Type ──────────────────────────────────────────────────

fn serialize_value<S: Serializer>(value: &u128, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(&value.to_string())
}

fn serialize_data<S: Serializer>(data: &[u8], s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(&base64::engine::general_purpose::STANDARD.encode(data))
}

/// A transaction as submitted to `/transaction/send`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub nonce: u64,
    /// EGLD value in base units; serialized as a decimal string.
    #[serde(serialize_with = "serialize_value")]
    pub value: u128,
    pub receiver: String,
    pub sender: String,
    pub gas_price: u64,
    pub gas_limit: u64,
    /// Raw data field; serialized as base64 and omitted when empty.
    #[serde(serialize_with = "serialize_data", skip_serializing_if = "Vec::is_empty")]
    pub data: Vec<u8>,
    #[serde(rename = "chainID")]
    pub chain_id: String,
    pub version: u32,
    /// Hex signature; absent until signed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signature: Option<String>,
}

impl Transaction {
    pub fn is_signed(&self) -> bool {
        self.signature.is_some()
    }

    /// Total fee ceiling: `gas_limit * gas_price`.
    pub fn max_fee(&self) -> u128 {
        self.gas_limit as u128 * self.gas_price as u128
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tx() -> Transaction {
        Transaction {
            nonce: 1,
            value: 10,
            receiver: "erd1r".into(),
            sender: "erd1s".into(),
            gas_price: 1_000_000_000,
            gas_limit: 50_000,
            data: Vec::new(),
            chain_id: "D".into(),
            version: 1,
            signature: None,
        }
    }

    #[test]
    fn test_json_field_order_and_omissions() {
        let json = serde_json::to_string(&tx()).unwrap();
        assert_eq!(
            json,
            r#"{"nonce":1,"value":"10","receiver":"erd1r","sender":"erd1s","gasPrice":1000000000,"gasLimit":50000,"chainID":"D","version":1}"#
        );
    }

    #[test]
    fn test_data_is_base64() {
        let mut t = tx();
        t.data = b"hello".to_vec();
        t.signature = Some("ab".into());
        let v = serde_json::to_value(&t).unwrap();
        assert_eq!(v["data"], "aGVsbG8=");
        assert_eq!(v["signature"], "ab");
    }

    #[test]
    fn test_max_fee() {
        assert_eq!(tx().max_fee(), 50_000u128 * 1_000_000_000);
    }
}
