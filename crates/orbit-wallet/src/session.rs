//! A running wallet session.
//!
//! Owns the store, clock, vault, claim controller and gateway client for as
//! long as the front-end is open, and drives the 1-second dashboard ticker.

use crate::accrual::{greeting, AccrualEngine, AccrualWindow, Clock, Countdown, SystemClock};
use crate::claim::{ClaimController, ClaimOutcome, RewardRelayer};
use crate::config::OrbitConfig;
use crate::error::{ClaimError, WalletError};
use crate::navigation::{self, Route};
use crate::onboarding::Onboarding;
use crate::storage::{FileStore, KeyValueStore};
use crate::vault::MnemonicVault;
use crate::wallet::{BalanceReport, Wallet};
use orbit_rpc::{RelayerClient, RpcConfig};
use orbit_tx::Payment;
use orbit_types::constants::storage_keys;
use orbit_types::{Address, MnemonicWords};
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

/// Name of the state file inside the data directory.
pub const STATE_FILE: &str = "state.json";

pub const TICK_INTERVAL: Duration = Duration::from_secs(1);

/// One tick's view of the dashboard.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardSnapshot {
    pub greeting: String,
    pub window: AccrualWindow,
    pub remaining_seconds: u64,
    pub countdown: Countdown,
    /// Elapsed share of the window, 0-100.
    pub percentage: f64,
    /// Reward units accrued so far.
    pub reward: u64,
    pub claimable: bool,
    pub claim_in_progress: bool,
}

fn build_snapshot(
    engine: &AccrualEngine,
    claims: &ClaimController,
    user_name: &str,
) -> Result<DashboardSnapshot, WalletError> {
    let window = engine.get_or_init_window()?;
    let now = engine.now_ms();
    let remaining = window.remaining_seconds(now);
    let in_progress = claims.in_progress();
    Ok(DashboardSnapshot {
        greeting: greeting(user_name, engine.clock().local_hour()),
        window,
        remaining_seconds: remaining,
        countdown: Countdown::from_seconds(remaining),
        percentage: window.elapsed_fraction(now) * 100.0,
        reward: engine.accrued_reward(&window, now),
        claimable: window.is_elapsed(now) && !in_progress,
        claim_in_progress: in_progress,
    })
}

pub struct Session {
    config: OrbitConfig,
    store: Arc<dyn KeyValueStore>,
    engine: Arc<AccrualEngine>,
    claims: Arc<ClaimController>,
    vault: MnemonicVault,
    wallet: Wallet,
    user_name: String,
    ticker: Mutex<Option<JoinHandle<()>>>,
}

impl Session {
    pub fn new(
        config: OrbitConfig,
        store: Arc<dyn KeyValueStore>,
        clock: Arc<dyn Clock>,
        relayer: Arc<dyn RewardRelayer>,
        user_name: &str,
    ) -> Result<Self, WalletError> {
        config.validate()?;
        let engine = Arc::new(AccrualEngine::new(
            store.clone(),
            clock,
            config.window_duration_ms,
            config.reward_rate,
            config.max_accrual_ms,
        ));
        let claims = Arc::new(ClaimController::new(engine.clone(), store.clone(), relayer));
        let vault = MnemonicVault::new(store.clone(), config.kdf);
        let wallet = Wallet::new(config.clone());

        Ok(Self {
            config,
            store,
            engine,
            claims,
            vault,
            wallet,
            user_name: user_name.trim().to_string(),
            ticker: Mutex::new(None),
        })
    }

    /// Session backed by `<data_dir>/state.json`, the system clock and the
    /// configured relayer.
    pub fn open(config: OrbitConfig, data_dir: &Path, user_name: &str) -> Result<Self, WalletError> {
        let store = Arc::new(FileStore::open(data_dir.join(STATE_FILE))?);
        let relayer = Arc::new(RelayerClient::with_config(RpcConfig {
            url: config.relayer_url.clone(),
            timeout: config.request_timeout(),
        }));
        log::debug!("session opened in {}", data_dir.display());
        Self::new(config, store, Arc::new(SystemClock), relayer, user_name)
    }

    pub fn config(&self) -> &OrbitConfig {
        &self.config
    }

    pub fn store(&self) -> &Arc<dyn KeyValueStore> {
        &self.store
    }

    pub fn vault(&self) -> &MnemonicVault {
        &self.vault
    }

    pub fn wallet(&self) -> &Wallet {
        &self.wallet
    }

    pub fn user_name(&self) -> &str {
        &self.user_name
    }

    pub fn has_visited(&self) -> Result<bool, WalletError> {
        Ok(self.store.get(storage_keys::HAS_VISITED)?.as_deref() == Some("true"))
    }

    /// Stored wallet address. A malformed entry reads as no wallet.
    pub fn wallet_address(&self) -> Result<Option<Address>, WalletError> {
        let Some(raw) = self.store.get(storage_keys::WALLET_ADDRESS)? else {
            return Ok(None);
        };
        match Address::from_bech32(raw.trim()) {
            Ok(address) => Ok(Some(address)),
            Err(e) => {
                log::warn!("ignoring stored wallet address {:?}: {}", raw, e);
                Ok(None)
            }
        }
    }

    /// Where `path` leads for this session.
    pub fn navigate(&self, path: &str) -> Result<Route, WalletError> {
        Ok(navigation::resolve(path, self.has_visited()?))
    }

    pub fn onboarding(&self) -> Onboarding<'_> {
        Onboarding::new(&self.vault, self.store.as_ref())
    }

    pub fn window(&self) -> Result<AccrualWindow, WalletError> {
        self.engine.get_or_init_window()
    }

    pub fn snapshot(&self) -> Result<DashboardSnapshot, WalletError> {
        build_snapshot(&self.engine, &self.claims, &self.user_name)
    }

    /// Start publishing a snapshot every second. Replaces any running ticker.
    ///
    /// Must be called from within a tokio runtime. The ticker stops on
    /// [`Session::shutdown`], on drop, or once every receiver is gone.
    pub fn start_ticker(&self) -> Result<watch::Receiver<DashboardSnapshot>, WalletError> {
        let (tx, rx) = watch::channel(self.snapshot()?);
        let engine = self.engine.clone();
        let claims = self.claims.clone();
        let user_name = self.user_name.clone();

        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval(TICK_INTERVAL);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                interval.tick().await;
                match build_snapshot(&engine, &claims, &user_name) {
                    Ok(snapshot) => {
                        if tx.send(snapshot).is_err() {
                            break;
                        }
                    }
                    Err(e) => log::warn!("dashboard tick failed: {}", e),
                }
            }
            log::debug!("dashboard ticker stopped");
        });

        let mut ticker = self
            .ticker
            .lock()
            .map_err(|_| WalletError::Other("ticker lock poisoned".into()))?;
        if let Some(previous) = ticker.replace(handle) {
            previous.abort();
        }
        Ok(rx)
    }

    /// Stop the ticker. Idempotent.
    pub fn shutdown(&self) {
        if let Ok(mut ticker) = self.ticker.lock() {
            if let Some(handle) = ticker.take() {
                handle.abort();
                log::debug!("session shut down");
            }
        }
    }

    pub fn claim_in_progress(&self) -> bool {
        self.claims.in_progress()
    }

    pub async fn claim(&self) -> Result<ClaimOutcome, ClaimError> {
        self.claims.claim().await
    }

    pub fn reset_window(&self) -> Result<AccrualWindow, WalletError> {
        self.engine.reset_window()
    }

    pub fn unlock(&self, passphrase: &str) -> Result<MnemonicWords, WalletError> {
        self.vault.unlock(passphrase)
    }

    /// Balances of the stored wallet; zero with a warning on network errors.
    pub async fn balances(&self) -> Result<BalanceReport, WalletError> {
        let address = self.wallet_address()?.ok_or(WalletError::NoWallet)?;
        Ok(self.wallet.balances_or_zero(&address).await)
    }

    /// Send from the wallet whose unlocked phrase is `words`.
    pub async fn send(
        &self,
        words: &MnemonicWords,
        receiver: &Address,
        payment: Payment,
    ) -> Result<String, WalletError> {
        self.wallet.send(words, receiver, payment).await
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.shutdown();
    }
}
