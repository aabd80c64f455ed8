//! Claiming a finished accrual window.
//!
//! A claim asks the reward relayer to pay out the window and, only once the
//! relayer confirms, starts a new window at the claim instant. At most one
//! claim is in flight per controller.

use crate::accrual::{AccrualEngine, AccrualWindow};
use crate::error::ClaimError;
use crate::storage::KeyValueStore;
use async_trait::async_trait;
use orbit_rpc::{ClaimReceipt, ClaimRequest, RelayerClient, RpcError};
use orbit_types::constants::storage_keys;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Pays rewards on the wallet's behalf.
#[async_trait]
pub trait RewardRelayer: Send + Sync {
    async fn disburse(&self, request: &ClaimRequest) -> Result<ClaimReceipt, RpcError>;
}

#[async_trait]
impl RewardRelayer for RelayerClient {
    async fn disburse(&self, request: &ClaimRequest) -> Result<ClaimReceipt, RpcError> {
        self.submit_claim(request).await
    }
}

/// Result of a successful claim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClaimOutcome {
    pub tx_hash: String,
    /// Reward units paid.
    pub amount: u64,
    pub claimed_window: AccrualWindow,
    pub new_window: AccrualWindow,
}

/// Holds the in-flight flag for the duration of one claim.
struct ClaimGuard<'a> {
    flag: &'a AtomicBool,
}

impl<'a> ClaimGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self { flag })
    }
}

impl Drop for ClaimGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

pub struct ClaimController {
    engine: Arc<AccrualEngine>,
    store: Arc<dyn KeyValueStore>,
    relayer: Arc<dyn RewardRelayer>,
    in_flight: AtomicBool,
}

impl ClaimController {
    pub fn new(
        engine: Arc<AccrualEngine>,
        store: Arc<dyn KeyValueStore>,
        relayer: Arc<dyn RewardRelayer>,
    ) -> Self {
        Self {
            engine,
            store,
            relayer,
            in_flight: AtomicBool::new(false),
        }
    }

    pub fn in_progress(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Claim the current window.
    ///
    /// Rejected while another claim is running, before the window has
    /// elapsed, or when no wallet address is stored. A relayer failure leaves
    /// the persisted window untouched.
    pub async fn claim(&self) -> Result<ClaimOutcome, ClaimError> {
        let _guard = ClaimGuard::acquire(&self.in_flight).ok_or(ClaimError::ClaimInProgress)?;

        let window = self
            .engine
            .get_or_init_window()
            .map_err(|e| ClaimError::Storage(e.to_string()))?;
        let now = self.engine.now_ms();
        if !window.is_elapsed(now) {
            return Err(ClaimError::ClaimNotReady {
                remaining_secs: window.remaining_seconds(now),
            });
        }

        let address = self
            .store
            .get(storage_keys::WALLET_ADDRESS)
            .map_err(|e| ClaimError::Storage(e.to_string()))?
            .filter(|a| !a.trim().is_empty())
            .ok_or(ClaimError::NoWallet)?;

        let amount = self.engine.accrued_reward(&window, now);
        let request = ClaimRequest {
            address,
            amount: amount.to_string(),
            window_start: window.start_time,
            window_end: window.end_time,
        };

        log::info!("claiming {} reward units for {}", amount, request.address);
        let receipt = self.relayer.disburse(&request).await.map_err(|e| {
            log::warn!("reward transfer failed: {}", e);
            ClaimError::Relay(e.to_string())
        })?;

        let new_window = self
            .engine
            .start_window_at(now)
            .map_err(|e| ClaimError::Storage(e.to_string()))?;
        log::info!("claim paid in tx {}", receipt.tx_hash);

        Ok(ClaimOutcome {
            tx_hash: receipt.tx_hash,
            amount,
            claimed_window: window,
            new_window,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::accrual::ManualClock;
    use crate::storage::MemoryStore;
    use orbit_types::constants::MS_PER_HOUR;
    use std::sync::Mutex;

    const T: i64 = 1_700_000_000_000;
    const ADDR: &str = "erd1qyu5wthldzr8wx5c9ucg8kjagg0jfs53s8nr3zpz3hypefsdd8ssycr6th";

    #[derive(Default)]
    struct FakeRelayer {
        fail: bool,
        requests: Mutex<Vec<ClaimRequest>>,
    }

    #[async_trait]
    impl RewardRelayer for FakeRelayer {
        async fn disburse(&self, request: &ClaimRequest) -> Result<ClaimReceipt, RpcError> {
            self.requests.lock().unwrap().push(request.clone());
            if self.fail {
                return Err(RpcError::NoData {
                    context: "claims".into(),
                });
            }
            Ok(ClaimReceipt {
                tx_hash: "ab12".into(),
            })
        }
    }

    struct Fixture {
        store: Arc<MemoryStore>,
        clock: Arc<ManualClock>,
        engine: Arc<AccrualEngine>,
        relayer: Arc<FakeRelayer>,
        controller: ClaimController,
    }

    fn fixture(fail: bool) -> Fixture {
        let store = Arc::new(MemoryStore::new());
        let clock = Arc::new(ManualClock::new(T));
        let engine = Arc::new(AccrualEngine::new(
            store.clone(),
            clock.clone(),
            2 * MS_PER_HOUR,
            1_000,
            2 * MS_PER_HOUR,
        ));
        let relayer = Arc::new(FakeRelayer {
            fail,
            ..Default::default()
        });
        let controller = ClaimController::new(engine.clone(), store.clone(), relayer.clone());
        Fixture {
            store,
            clock,
            engine,
            relayer,
            controller,
        }
    }

    #[tokio::test]
    async fn test_not_ready() {
        let f = fixture(false);
        f.store.set(storage_keys::WALLET_ADDRESS, ADDR).unwrap();
        f.clock.advance_ms(MS_PER_HOUR);
        let err = f.controller.claim().await.unwrap_err();
        assert!(matches!(err, ClaimError::ClaimNotReady { remaining_secs: 3600 }));
        assert!(f.relayer.requests.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_window_boundary() {
        let f = fixture(false);
        f.store.set(storage_keys::WALLET_ADDRESS, ADDR).unwrap();
        let window = f.engine.get_or_init_window().unwrap();

        for before in [500, 1] {
            f.clock.set(window.end_time - before);
            let err = f.controller.claim().await.unwrap_err();
            assert!(matches!(err, ClaimError::ClaimNotReady { remaining_secs: 0 }));
        }
        assert!(f.relayer.requests.lock().unwrap().is_empty());
        assert_eq!(f.engine.load_window().unwrap(), Some(window));

        f.clock.set(window.end_time);
        let outcome = f.controller.claim().await.unwrap();
        assert_eq!(outcome.amount, 2_000);
        assert_eq!(outcome.new_window.start_time, window.end_time);
    }

    #[tokio::test]
    async fn test_clock_behind_window_start() {
        let f = fixture(false);
        f.store.set(storage_keys::WALLET_ADDRESS, ADDR).unwrap();
        f.engine.start_window_at(T + MS_PER_HOUR).unwrap();

        let err = f.controller.claim().await.unwrap_err();
        assert!(matches!(err, ClaimError::ClaimNotReady { remaining_secs: 10_800 }));
        assert!(f.relayer.requests.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_no_wallet() {
        let f = fixture(false);
        f.engine.get_or_init_window().unwrap();
        f.clock.advance_ms(2 * MS_PER_HOUR);
        assert!(matches!(f.controller.claim().await, Err(ClaimError::NoWallet)));
        assert!(f.relayer.requests.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_success_starts_new_window_at_claim_instant() {
        let f = fixture(false);
        f.store.set(storage_keys::WALLET_ADDRESS, ADDR).unwrap();
        let first = f.engine.get_or_init_window().unwrap();
        f.clock.advance_ms(2 * MS_PER_HOUR + 60_000);

        let outcome = f.controller.claim().await.unwrap();
        assert_eq!(outcome.amount, 2_000);
        assert_eq!(outcome.tx_hash, "ab12");
        assert_eq!(outcome.claimed_window, first);
        assert_eq!(outcome.new_window.start_time, T + 2 * MS_PER_HOUR + 60_000);
        assert_eq!(f.engine.load_window().unwrap(), Some(outcome.new_window));
        assert!(!f.controller.in_progress());

        let requests = f.relayer.requests.lock().unwrap();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].amount, "2000");
        assert_eq!(requests[0].window_start, T);
    }

    #[tokio::test]
    async fn test_relay_failure_keeps_window() {
        let f = fixture(true);
        f.store.set(storage_keys::WALLET_ADDRESS, ADDR).unwrap();
        let first = f.engine.get_or_init_window().unwrap();
        f.clock.advance_ms(3 * MS_PER_HOUR);

        assert!(matches!(f.controller.claim().await, Err(ClaimError::Relay(_))));
        assert_eq!(f.engine.load_window().unwrap(), Some(first));
        assert!(!f.controller.in_progress());
    }
}
