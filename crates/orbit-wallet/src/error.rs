//! Wallet error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum WalletError {
    #[error("key derivation failed: {0}")]
    KeyDerivation(String),

    #[error("invalid mnemonic: {0}")]
    InvalidMnemonic(#[from] orbit_types::MnemonicError),

    #[error("storage error: {0}")]
    Storage(String),

    #[error("RPC error: {0}")]
    Rpc(#[from] orbit_rpc::RpcError),

    #[error("encryption error: {0}")]
    Encryption(String),

    #[error("decryption failed (wrong passphrase or corrupted data)")]
    DecryptionFailed,

    #[error("invalid address: {0}")]
    InvalidAddress(#[from] orbit_types::AddressError),

    #[error("invalid amount: {0}")]
    InvalidAmount(#[from] orbit_types::AmountError),

    #[error("transaction error: {0}")]
    Transaction(#[from] orbit_tx::TxError),

    #[error("no wallet has been created yet")]
    NoWallet,

    #[error("onboarding: {0}")]
    Onboarding(String),

    #[error("insufficient balance: need {need}, have {have}")]
    InsufficientBalance { need: u128, have: u128 },

    #[error("{0}")]
    Other(String),
}

impl From<orbit_crypto::CryptoError> for WalletError {
    fn from(e: orbit_crypto::CryptoError) -> Self {
        WalletError::KeyDerivation(e.to_string())
    }
}

/// Why a claim trigger was rejected or failed.
#[derive(Debug, Error)]
pub enum ClaimError {
    #[error("a claim is already in progress")]
    ClaimInProgress,

    #[error("claim not ready: {remaining_secs}s remaining")]
    ClaimNotReady { remaining_secs: u64 },

    #[error("no wallet address stored")]
    NoWallet,

    #[error("reward transfer failed: {0}")]
    Relay(String),

    #[error("storage error: {0}")]
    Storage(String),
}

/// Rejections from the PIN pad.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PinError {
    #[error("PIN must be 4 or 6 digits, got {0}")]
    InvalidLength(usize),

    #[error("PIN already submitted")]
    AlreadySubmitted,

    #[error("wrong PIN, try again")]
    Retry,
}
