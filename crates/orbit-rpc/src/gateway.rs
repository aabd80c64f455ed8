//! Gateway (proxy) client.
//!
//! Typed async methods for the MultiversX gateway endpoints the wallet
//! needs: account state, token balances, network config, transaction
//! submission and status.

use crate::client::{RpcClient, RpcConfig};
use crate::error::RpcError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

// =============================================================================
// Response Types
// =============================================================================

/// Account state from `/address/{address}`.
#[derive(Debug, Clone, Deserialize)]
pub struct AccountInfo {
    pub address: String,
    pub nonce: u64,
    /// EGLD balance in base units, as a decimal string.
    pub balance: String,
    #[serde(default)]
    pub username: String,
}

impl AccountInfo {
    /// EGLD balance in base units.
    pub fn balance_base_units(&self) -> Result<u128, RpcError> {
        parse_balance(&self.balance, "account balance")
    }
}

/// One fungible token balance from `/address/{address}/esdt`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EsdtBalance {
    pub token_identifier: String,
    pub balance: String,
}

impl EsdtBalance {
    pub fn balance_base_units(&self) -> Result<u128, RpcError> {
        parse_balance(&self.balance, &self.token_identifier)
    }
}

/// Subset of `/network/config` used for transaction construction.
#[derive(Debug, Clone, Deserialize)]
pub struct NetworkConfig {
    #[serde(rename = "erd_chain_id")]
    pub chain_id: String,
    #[serde(rename = "erd_min_gas_price")]
    pub min_gas_price: u64,
    #[serde(rename = "erd_min_gas_limit")]
    pub min_gas_limit: u64,
    #[serde(rename = "erd_gas_per_data_byte")]
    pub gas_per_data_byte: u64,
    #[serde(rename = "erd_min_transaction_version", default = "default_tx_version")]
    pub min_transaction_version: u32,
    /// Catch-all for additional fields.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

fn default_tx_version() -> u32 {
    1
}

/// Result of `/transaction/send`.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SendTxResult {
    pub tx_hash: String,
}

fn parse_balance(s: &str, context: &str) -> Result<u128, RpcError> {
    s.parse::<u128>().map_err(|e| RpcError::InvalidResponse {
        context: context.to_string(),
        reason: format!("balance {:?}: {}", s, e),
    })
}

fn take_field(mut val: Value, field: &str, context: &str) -> Result<Value, RpcError> {
    val.get_mut(field)
        .map(Value::take)
        .ok_or_else(|| RpcError::NoData {
            context: format!("{}({})", context, field),
        })
}

// =============================================================================
// GatewayClient
// =============================================================================

/// Async client for the MultiversX gateway.
pub struct GatewayClient {
    client: RpcClient,
}

impl GatewayClient {
    /// Create a gateway client connected to the given URL.
    pub fn new(url: &str) -> Self {
        Self {
            client: RpcClient::new(url),
        }
    }

    /// Create with full configuration.
    pub fn with_config(config: RpcConfig) -> Self {
        Self {
            client: RpcClient::with_config(config),
        }
    }

    /// Get the underlying RPC client for custom calls.
    pub fn client(&self) -> &RpcClient {
        &self.client
    }

    // =========================================================================
    // Accounts
    // =========================================================================

    /// Account nonce and EGLD balance.
    pub async fn get_account(&self, address: &str) -> Result<AccountInfo, RpcError> {
        let data = self.client.get(&format!("/address/{}", address)).await?;
        let account = take_field(data, "account", "get_account")?;
        Ok(serde_json::from_value(account)?)
    }

    /// All fungible token balances of an account, keyed by identifier.
    pub async fn get_esdt_balances(
        &self,
        address: &str,
    ) -> Result<BTreeMap<String, EsdtBalance>, RpcError> {
        let data = self
            .client
            .get(&format!("/address/{}/esdt", address))
            .await?;
        let esdts = take_field(data, "esdts", "get_esdt_balances")?;
        Ok(serde_json::from_value(esdts)?)
    }

    /// Balance of a single token, zero if the account never held it.
    pub async fn get_esdt_balance(&self, address: &str, token: &str) -> Result<u128, RpcError> {
        let balances = self.get_esdt_balances(address).await?;
        match balances.get(token) {
            Some(b) => b.balance_base_units(),
            None => Ok(0),
        }
    }

    // =========================================================================
    // Network
    // =========================================================================

    /// Chain id, gas price and gas limit parameters.
    pub async fn get_network_config(&self) -> Result<NetworkConfig, RpcError> {
        let data = self.client.get("/network/config").await?;
        let config = take_field(data, "config", "get_network_config")?;
        Ok(serde_json::from_value(config)?)
    }

    // =========================================================================
    // Transactions
    // =========================================================================

    /// Submit a signed transaction. Returns its hash.
    pub async fn send_transaction<T: Serialize>(&self, tx: &T) -> Result<String, RpcError> {
        let body = serde_json::to_value(tx)?;
        let data = self.client.post("/transaction/send", &body).await?;
        let result: SendTxResult = serde_json::from_value(data)?;
        log::info!("transaction submitted: {}", result.tx_hash);
        Ok(result.tx_hash)
    }

    /// Processing status of a transaction (`pending`, `success`, `fail`, ...).
    pub async fn get_transaction_status(&self, tx_hash: &str) -> Result<String, RpcError> {
        let data = self
            .client
            .get(&format!("/transaction/{}/status", tx_hash))
            .await?;
        let status = take_field(data, "status", "get_transaction_status")?;
        status
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| RpcError::InvalidResponse {
                context: "get_transaction_status".to_string(),
                reason: format!("status is not a string: {}", status),
            })
    }
}
