//! Core types and constants for the Orbit wallet.
//!
//! This crate provides the foundational types used across all Orbit crates:
//! network configurations, address encoding/decoding, mnemonic seed phrases,
//! token amount formatting, and the keys of the persisted local state.

pub mod address;
pub mod amount;
pub mod constants;
pub mod mnemonic;

pub use address::{parse_scanned_recipient, Address, AddressError, ScannedRecipient};
pub use amount::{format_amount, parse_amount, AmountError};
pub use constants::Network;
pub use mnemonic::{MnemonicError, MnemonicWords};
