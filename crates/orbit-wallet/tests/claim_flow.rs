//! Dashboard and claim flow through a full session, with a scripted clock
//! and relayer.

use async_trait::async_trait;
use orbit_rpc::{ClaimReceipt, ClaimRequest, RpcError};
use orbit_types::constants::{storage_keys, MS_PER_HOUR};
use orbit_wallet::{
    ClaimError, KdfParams, KeyValueStore, ManualClock, MemoryStore, OrbitConfig, RewardRelayer,
    Session,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Notify;

const T: i64 = 1_700_000_000_000;
const ADDR: &str = "erd1qyu5wthldzr8wx5c9ucg8kjagg0jfs53s8nr3zpz3hypefsdd8ssycr6th";

/// Relayer that signals when a request arrives and waits to be released.
#[derive(Default)]
struct GatedRelayer {
    entered: Notify,
    release: Notify,
    calls: AtomicUsize,
}

#[async_trait]
impl RewardRelayer for GatedRelayer {
    async fn disburse(&self, _request: &ClaimRequest) -> Result<ClaimReceipt, RpcError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.entered.notify_one();
        self.release.notified().await;
        Ok(ClaimReceipt {
            tx_hash: "feed".into(),
        })
    }
}

fn config() -> OrbitConfig {
    let mut cfg = OrbitConfig::default();
    cfg.kdf = KdfParams::insecure_fast();
    cfg
}

fn session(relayer: Arc<GatedRelayer>) -> (Session, Arc<MemoryStore>, Arc<ManualClock>) {
    let store = Arc::new(MemoryStore::new());
    let clock = Arc::new(ManualClock::new(T));
    let session = Session::new(config(), store.clone(), clock.clone(), relayer, "Ada").unwrap();
    (session, store, clock)
}

#[tokio::test]
async fn test_snapshot_over_window() {
    let (session, _store, clock) = session(Arc::new(GatedRelayer::default()));

    let s = session.snapshot().unwrap();
    assert_eq!(s.countdown.to_string(), "02:00:00");
    assert_eq!(s.percentage, 0.0);
    assert_eq!(s.reward, 0);
    assert!(!s.claimable);

    clock.advance_ms(MS_PER_HOUR);
    let s = session.snapshot().unwrap();
    assert_eq!(s.countdown.to_string(), "01:00:00");
    assert_eq!(s.percentage, 50.0);
    assert_eq!(s.reward, 1_000);

    // Countdown reads zero in the final second but the claim stays closed.
    clock.set(T + 2 * MS_PER_HOUR - 1);
    let s = session.snapshot().unwrap();
    assert_eq!(s.countdown.to_string(), "00:00:00");
    assert!(!s.claimable);

    clock.set(T + 2 * MS_PER_HOUR + 60_000);
    let s = session.snapshot().unwrap();
    assert_eq!(s.remaining_seconds, 0);
    assert_eq!(s.percentage, 100.0);
    assert_eq!(s.reward, 2_000);
    assert!(s.claimable);
}

#[tokio::test]
async fn test_concurrent_claim_rejected() {
    let relayer = Arc::new(GatedRelayer::default());
    let (session, store, clock) = session(relayer.clone());
    store.set(storage_keys::WALLET_ADDRESS, ADDR).unwrap();
    session.window().unwrap();
    clock.advance_ms(2 * MS_PER_HOUR);

    let first = session.claim();
    let second = async {
        relayer.entered.notified().await;
        let snapshot = session.snapshot().unwrap();
        let result = session.claim().await;
        relayer.release.notify_one();
        (snapshot, result)
    };
    let (first, (snapshot, second)) = tokio::join!(first, second);

    assert!(snapshot.claim_in_progress);
    assert!(!snapshot.claimable);
    assert!(matches!(second, Err(ClaimError::ClaimInProgress)));
    let outcome = first.unwrap();
    assert_eq!(outcome.tx_hash, "feed");
    assert_eq!(relayer.calls.load(Ordering::SeqCst), 1);
    assert!(!session.claim_in_progress());

    // The new window starts at the claim instant, so the next claim waits.
    assert_eq!(session.window().unwrap().start_time, T + 2 * MS_PER_HOUR);
    assert!(matches!(
        session.claim().await,
        Err(ClaimError::ClaimNotReady { remaining_secs: 7200 })
    ));
}

#[tokio::test]
async fn test_reset_window() {
    let (session, _store, clock) = session(Arc::new(GatedRelayer::default()));
    session.window().unwrap();
    clock.advance_ms(MS_PER_HOUR);
    let w = session.reset_window().unwrap();
    assert_eq!(w.start_time, T + MS_PER_HOUR);
    assert_eq!(session.snapshot().unwrap().reward, 0);
}

#[tokio::test]
async fn test_ticker_publishes_and_stops() {
    let (session, _store, _clock) = session(Arc::new(GatedRelayer::default()));
    let mut rx = session.start_ticker().unwrap();
    assert!(rx.borrow().greeting.starts_with("Good "));

    tokio::time::timeout(Duration::from_secs(3), rx.changed())
        .await
        .expect("no tick within 3s")
        .expect("ticker stopped early");

    session.shutdown();
    loop {
        match tokio::time::timeout(Duration::from_secs(3), rx.changed()).await {
            Ok(Ok(())) => continue,
            Ok(Err(_)) => break,
            Err(_) => panic!("ticker still running after shutdown"),
        }
    }
}
