//! Orbit transaction construction and signing.
//!
//! Provides the typed transaction structure, a builder for EGLD and ESDT
//! transfers, gas estimation, and ed25519 signing. Delegates low-level
//! crypto to orbit-crypto.

pub mod types;
pub mod builder;
pub mod fee;
pub mod sign;

pub use types::{Payment, Transaction};
pub use builder::TransactionBuilder;
pub use fee::GasSchedule;
pub use sign::{sign_transaction, verify_transaction};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TxError {
    #[error("serialization error: {0}")]
    Serialize(String),

    #[error("invalid transaction: {0}")]
    Invalid(String),

    #[error("missing transaction field: {0}")]
    Missing(&'static str),

    #[error("signing error: {0}")]
    Signing(String),
}
