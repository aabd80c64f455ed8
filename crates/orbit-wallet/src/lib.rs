//! Orbit wallet core.
//!
//! Provides the reward timer and claim flow, the encrypted mnemonic vault
//! with its PIN pad, onboarding, navigation, and the session that ties them
//! to local storage and the MultiversX gateway.

pub mod error;
pub mod storage;
pub mod encryption;
pub mod vault;
pub mod pin;
pub mod host;
pub mod accrual;
pub mod claim;
pub mod config;
pub mod wallet;
pub mod onboarding;
pub mod navigation;
pub mod session;

pub use error::{ClaimError, PinError, WalletError};
pub use storage::{FileStore, KeyValueStore, MemoryStore};
pub use encryption::{EncryptedSecret, KdfParams};
pub use vault::{derive_address, derive_keypair, MnemonicVault};
pub use pin::{PinPad, PinState, PinSubmitError};
pub use host::{Feedback, Host, ImpactStyle, NoopHost, NotificationKind};
pub use accrual::{AccrualEngine, AccrualWindow, Clock, Countdown, ManualClock, SystemClock};
pub use claim::{ClaimController, ClaimOutcome, RewardRelayer};
pub use config::OrbitConfig;
pub use wallet::{BalanceReport, Balances, Wallet};
pub use onboarding::{Onboarding, OnboardingStep};
pub use navigation::{Route, Tab};
pub use session::{DashboardSnapshot, Session};
