//! On-chain wallet operations.
//!
//! Balance queries and transfers against the MultiversX gateway. Every call
//! is a single attempt; failures are returned to the caller as-is.

use crate::config::OrbitConfig;
use crate::error::WalletError;
use crate::vault;
use orbit_rpc::{GatewayClient, RpcConfig};
use orbit_tx::{sign_transaction, GasSchedule, Payment, TransactionBuilder};
use orbit_types::{Address, MnemonicWords};

/// Balances shown on the dashboard, in base units.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Balances {
    pub egld: u128,
    pub reward: u128,
}

/// Balances plus the error that replaced them with zero, if any.
#[derive(Debug)]
pub struct BalanceReport {
    pub balances: Balances,
    pub warning: Option<WalletError>,
}

pub struct Wallet {
    gateway: GatewayClient,
    config: OrbitConfig,
}

impl Wallet {
    pub fn new(config: OrbitConfig) -> Self {
        let gateway = GatewayClient::with_config(RpcConfig {
            url: config.gateway_url.clone(),
            timeout: config.request_timeout(),
        });
        Self { gateway, config }
    }

    pub fn gateway(&self) -> &GatewayClient {
        &self.gateway
    }

    pub fn config(&self) -> &OrbitConfig {
        &self.config
    }

    /// EGLD and reward-token balances of `address`.
    pub async fn balances(&self, address: &Address) -> Result<Balances, WalletError> {
        let bech32 = address.to_bech32();
        let account = self.gateway.get_account(&bech32).await?;
        let egld = account.balance_base_units()?;
        let reward = if self.config.reward_token.is_empty() {
            0
        } else {
            self.gateway
                .get_esdt_balance(&bech32, &self.config.reward_token)
                .await?
        };
        Ok(Balances { egld, reward })
    }

    /// Like [`Wallet::balances`], but a failed fetch shows as zero balances
    /// with the error attached.
    pub async fn balances_or_zero(&self, address: &Address) -> BalanceReport {
        match self.balances(address).await {
            Ok(balances) => BalanceReport {
                balances,
                warning: None,
            },
            Err(e) => {
                log::warn!("balance fetch for {} failed: {}", address, e);
                BalanceReport {
                    balances: Balances::default(),
                    warning: Some(e),
                }
            }
        }
    }

    /// Build, sign and submit a transfer. Returns the transaction hash.
    pub async fn send(
        &self,
        words: &MnemonicWords,
        receiver: &Address,
        payment: Payment,
    ) -> Result<String, WalletError> {
        let keypair = vault::derive_keypair(words)?;
        let sender = Address::from_public_key(keypair.public_key());
        let sender_bech32 = sender.to_bech32();

        let account = self.gateway.get_account(&sender_bech32).await?;
        let network = self.gateway.get_network_config().await?;
        if network.chain_id != self.config.network.chain_id() {
            log::warn!(
                "gateway chain id {} differs from configured {} ({})",
                network.chain_id,
                self.config.network.chain_id(),
                self.config.network
            );
        }

        let tx = TransactionBuilder::new(&network.chain_id)
            .nonce(account.nonce)
            .sender(sender)
            .receiver(*receiver)
            .payment(payment.clone())
            .gas_schedule(GasSchedule::from(&network))
            .build()?;

        let egld = account.balance_base_units()?;
        let need = tx.value + tx.max_fee();
        if need > egld {
            return Err(WalletError::InsufficientBalance { need, have: egld });
        }
        if let Payment::Esdt { token, amount } = &payment {
            let have = self.gateway.get_esdt_balance(&sender_bech32, token).await?;
            if *amount > have {
                return Err(WalletError::InsufficientBalance {
                    need: *amount,
                    have,
                });
            }
        }

        let signed = sign_transaction(tx, &keypair)?;
        let hash = self.gateway.send_transaction(&signed).await?;
        log::info!("submitted tx {} (nonce {})", hash, signed.nonce);
        Ok(hash)
    }

    pub async fn transaction_status(&self, tx_hash: &str) -> Result<String, WalletError> {
        Ok(self.gateway.get_transaction_status(tx_hash).await?)
    }
}
