//! MultiversX network constants, derivation parameters, and Orbit defaults.
//!
//! Reference: mx-chain-go config, mx-sdk-js-core `constants.ts`

use serde::{Deserialize, Serialize};

// =============================================================================
// Network Types
// =============================================================================

/// Network type identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Network {
    Mainnet,
    Devnet,
    Testnet,
}

impl Network {
    /// Chain ID that every transaction on this network must carry.
    pub fn chain_id(&self) -> &'static str {
        match self {
            Network::Mainnet => "1",
            Network::Devnet => "D",
            Network::Testnet => "T",
        }
    }

    /// Public gateway (proxy) URL for this network.
    pub fn default_gateway_url(&self) -> &'static str {
        match self {
            Network::Mainnet => "https://gateway.multiversx.com",
            Network::Devnet => "https://devnet-gateway.multiversx.com",
            Network::Testnet => "https://testnet-gateway.multiversx.com",
        }
    }

    /// Lower-case name, as used for data directories and CLI flags.
    pub fn name(&self) -> &'static str {
        match self {
            Network::Mainnet => "mainnet",
            Network::Devnet => "devnet",
            Network::Testnet => "testnet",
        }
    }
}

impl std::fmt::Display for Network {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for Network {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, String> {
        match s.to_lowercase().as_str() {
            "mainnet" | "main" => Ok(Network::Mainnet),
            "devnet" | "dev" => Ok(Network::Devnet),
            "testnet" | "test" => Ok(Network::Testnet),
            _ => Err(format!(
                "unknown network: {} (use mainnet, devnet, or testnet)",
                s
            )),
        }
    }
}

// =============================================================================
// Addresses & Keys
// =============================================================================

/// Bech32 human-readable part of account addresses.
pub const ADDRESS_HRP: &str = "erd";

/// Public key / secret key length (ed25519).
pub const KEY_SIZE: usize = 32;

/// SLIP-0044 coin type registered for EGLD.
pub const COIN_TYPE: u32 = 508;

/// Number of words in a freshly generated mnemonic.
pub const MNEMONIC_WORD_COUNT: usize = 24;

// =============================================================================
// Tokens & Gas
// =============================================================================

/// Native token ticker.
pub const EGLD_TICKER: &str = "EGLD";

/// Decimals of the native token (1 EGLD = 10^18 base units).
pub const EGLD_DECIMALS: u32 = 18;

/// Default minimum gas price, used when the network config is unavailable.
pub const DEFAULT_MIN_GAS_PRICE: u64 = 1_000_000_000;

/// Default minimum gas limit of a plain transfer.
pub const DEFAULT_MIN_GAS_LIMIT: u64 = 50_000;

/// Default gas charged per byte of the data field.
pub const DEFAULT_GAS_PER_DATA_BYTE: u64 = 1_500;

/// Extra gas for the `ESDTTransfer` built-in function.
pub const ESDT_TRANSFER_EXTRA_GAS: u64 = 250_000;

/// Transaction version used when signing over the JSON serialization.
pub const TX_VERSION: u32 = 1;

// =============================================================================
// Reward Accrual
// =============================================================================

/// Milliseconds in one hour.
pub const MS_PER_HOUR: i64 = 60 * 60 * 1000;

/// Length of a mining window (2 hours).
pub const DEFAULT_WINDOW_DURATION_MS: i64 = 2 * MS_PER_HOUR;

/// Reward units accrued per hour of an open window.
pub const DEFAULT_REWARD_RATE: u64 = 1_000;

/// Ticker of the reward token.
pub const REWARD_TOKEN_TICKER: &str = "ORB";

/// Decimals of the reward token.
pub const REWARD_TOKEN_DECIMALS: u32 = 18;

// =============================================================================
// Persisted State Keys
// =============================================================================

/// Keys of the local key-value store. All values are strings.
pub mod storage_keys {
    /// Window start, millisecond epoch.
    pub const START_TIME: &str = "startTime";
    /// Window end, millisecond epoch.
    pub const END_TIME: &str = "endTime";
    /// Bech32 address of the onboarded wallet.
    pub const WALLET_ADDRESS: &str = "walletAddress";
    /// Encrypted mnemonic envelope (JSON).
    pub const MNEMONIC_WORDS: &str = "mnemonicWords";
    /// `"true"` once onboarding completed.
    pub const HAS_VISITED: &str = "hasVisited";
}
