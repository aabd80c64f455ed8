//! Wallet configuration.
//!
//! Loaded from `config.json` in the data directory when present; missing
//! fields fall back to the network defaults.

use crate::encryption::KdfParams;
use crate::error::WalletError;
use orbit_types::constants::{
    DEFAULT_REWARD_RATE, DEFAULT_WINDOW_DURATION_MS, REWARD_TOKEN_DECIMALS, REWARD_TOKEN_TICKER,
};
use orbit_types::Network;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

pub const CONFIG_FILE: &str = "config.json";

/// Relayer endpoint used when none is configured.
pub const DEFAULT_RELAYER_URL: &str = "http://127.0.0.1:8080";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrbitConfig {
    pub network: Network,
    pub gateway_url: String,
    pub relayer_url: String,
    /// ESDT identifier of the reward token (e.g. `ORB-a1b2c3`). Empty until
    /// the token is issued on the selected network.
    pub reward_token: String,
    pub reward_decimals: u32,
    /// Reward units accrued per hour.
    pub reward_rate: u64,
    pub window_duration_ms: i64,
    /// Accrual stops after this long even if the window is longer.
    pub max_accrual_ms: i64,
    pub kdf: KdfParams,
    pub request_timeout_secs: u64,
}

impl Default for OrbitConfig {
    fn default() -> Self {
        Self::for_network(Network::Devnet)
    }
}

impl OrbitConfig {
    pub fn for_network(network: Network) -> Self {
        Self {
            network,
            gateway_url: network.default_gateway_url().to_string(),
            relayer_url: DEFAULT_RELAYER_URL.to_string(),
            reward_token: String::new(),
            reward_decimals: REWARD_TOKEN_DECIMALS,
            reward_rate: DEFAULT_REWARD_RATE,
            window_duration_ms: DEFAULT_WINDOW_DURATION_MS,
            max_accrual_ms: DEFAULT_WINDOW_DURATION_MS,
            kdf: KdfParams::default(),
            request_timeout_secs: 30,
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn reward_ticker(&self) -> &str {
        match self.reward_token.split_once('-') {
            Some((ticker, _)) => ticker,
            None if self.reward_token.is_empty() => REWARD_TOKEN_TICKER,
            None => &self.reward_token,
        }
    }

    /// Reject settings the accrual engine cannot work with.
    pub fn validate(&self) -> Result<(), WalletError> {
        if self.window_duration_ms <= 0 {
            return Err(WalletError::Other("window duration must be positive".into()));
        }
        if self.max_accrual_ms <= 0 {
            return Err(WalletError::Other("max accrual duration must be positive".into()));
        }
        if self.gateway_url.is_empty() {
            return Err(WalletError::Other("gateway URL is empty".into()));
        }
        Ok(())
    }

    /// Load `config.json` from `dir`, or the network defaults if absent.
    pub fn load(dir: &Path, network: Network) -> Result<Self, WalletError> {
        let path = dir.join(CONFIG_FILE);
        if !path.exists() {
            log::debug!("no {} in {}, using {} defaults", CONFIG_FILE, dir.display(), network);
            return Ok(Self::for_network(network));
        }

        let raw = std::fs::read_to_string(&path)
            .map_err(|e| WalletError::Storage(format!("read {}: {}", path.display(), e)))?;
        let mut config: OrbitConfig = serde_json::from_str(&raw)
            .map_err(|e| WalletError::Storage(format!("parse {}: {}", path.display(), e)))?;
        if config.network != network {
            log::warn!(
                "{} is for {}, overriding with {}",
                path.display(),
                config.network,
                network
            );
            config.network = network;
        }
        config.validate()?;
        log::info!("loaded config from {}", path.display());
        Ok(config)
    }

    pub fn save(&self, dir: &Path) -> Result<(), WalletError> {
        std::fs::create_dir_all(dir)
            .map_err(|e| WalletError::Storage(format!("create {}: {}", dir.display(), e)))?;
        let path = dir.join(CONFIG_FILE);
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| WalletError::Storage(e.to_string()))?;
        std::fs::write(&path, json)
            .map_err(|e| WalletError::Storage(format!("write {}: {}", path.display(), e)))
    }
}
