//! Reward timer and accrual.
//!
//! A window runs from `start_time` to `end_time` (millisecond epoch). Rewards
//! accrue linearly at `rate` units per hour from the start, capped at the
//! max accrual duration and frozen once the window has elapsed. All time
//! arithmetic is integer milliseconds; the clock is injected so tests can
//! drive it.

use crate::error::WalletError;
use crate::storage::KeyValueStore;
use chrono::Timelike;
use orbit_types::constants::{storage_keys, MS_PER_HOUR};
use std::fmt;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

// ─── Clock ──────────────────────────────────────────────────────────────────

pub trait Clock: Send + Sync {
    /// Current wall-clock time, millisecond epoch.
    fn now_ms(&self) -> i64;

    /// Hour of day (0-23) in the user's local time zone.
    fn local_hour(&self) -> u32;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> i64 {
        chrono::Utc::now().timestamp_millis()
    }

    fn local_hour(&self) -> u32 {
        chrono::Local::now().hour()
    }
}

/// A clock that only moves when told to. Local hour is taken as UTC.
#[derive(Debug, Default)]
pub struct ManualClock {
    now: AtomicI64,
}

impl ManualClock {
    pub fn new(now_ms: i64) -> Self {
        Self {
            now: AtomicI64::new(now_ms),
        }
    }

    pub fn set(&self, now_ms: i64) {
        self.now.store(now_ms, Ordering::SeqCst);
    }

    pub fn advance_ms(&self, ms: i64) {
        self.now.fetch_add(ms, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> i64 {
        self.now.load(Ordering::SeqCst)
    }

    fn local_hour(&self) -> u32 {
        (self.now_ms().rem_euclid(24 * MS_PER_HOUR) / MS_PER_HOUR) as u32
    }
}

// ─── Window ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccrualWindow {
    pub start_time: i64,
    pub end_time: i64,
}

impl AccrualWindow {
    /// A window of `duration_ms` starting at `start_ms`.
    pub fn starting_at(start_ms: i64, duration_ms: i64) -> Self {
        Self {
            start_time: start_ms,
            end_time: start_ms.saturating_add(duration_ms.max(1)),
        }
    }

    pub fn duration_ms(&self) -> i64 {
        self.end_time - self.start_time
    }

    pub fn is_valid(&self) -> bool {
        self.end_time > self.start_time
    }

    /// Fraction of the window elapsed, clamped to `[0, 1]`.
    pub fn elapsed_fraction(&self, now_ms: i64) -> f64 {
        let total = self.duration_ms();
        if total <= 0 {
            return 1.0;
        }
        let elapsed = (now_ms - self.start_time).clamp(0, total);
        elapsed as f64 / total as f64
    }

    /// Whole seconds until the window ends, never negative.
    pub fn remaining_seconds(&self, now_ms: i64) -> u64 {
        let remaining = self.end_time.saturating_sub(now_ms);
        if remaining <= 0 {
            0
        } else {
            (remaining / 1000) as u64
        }
    }

    /// True once `now` has reached the end of the window. The countdown
    /// already reads zero during the final second; this does not.
    pub fn is_elapsed(&self, now_ms: i64) -> bool {
        now_ms >= self.end_time
    }

    /// Reward accrued by `now`: `floor(hours_elapsed * rate)` where the
    /// elapsed time is clamped to `[0, min(max_accrual_ms, duration)]`.
    pub fn accrued_reward(&self, now_ms: i64, rate: u64, max_accrual_ms: i64) -> u64 {
        let cap = max_accrual_ms.min(self.duration_ms()).max(0);
        let elapsed = (now_ms - self.start_time).clamp(0, cap);
        let reward = elapsed as u128 * rate as u128 / MS_PER_HOUR as u128;
        u64::try_from(reward).unwrap_or(u64::MAX)
    }
}

/// Remaining time split for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Countdown {
    pub hours: u64,
    pub minutes: u64,
    pub seconds: u64,
}

impl Countdown {
    pub fn from_seconds(total: u64) -> Self {
        Self {
            hours: total / 3600,
            minutes: (total % 3600) / 60,
            seconds: total % 60,
        }
    }
}

impl fmt::Display for Countdown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}:{:02}", self.hours, self.minutes, self.seconds)
    }
}

/// Time-of-day greeting. A blank name is shown as "User".
pub fn greeting(user_name: &str, local_hour: u32) -> String {
    let name = match user_name.trim() {
        "" => "User",
        name => name,
    };
    let part = if local_hour < 12 {
        "morning"
    } else if local_hour < 18 {
        "afternoon"
    } else {
        "evening"
    };
    format!("Good {}, {}", part, name)
}

// ─── Persistence ────────────────────────────────────────────────────────────

/// Window parameters plus the store and clock they act on.
pub struct AccrualEngine {
    store: Arc<dyn KeyValueStore>,
    clock: Arc<dyn Clock>,
    window_duration_ms: i64,
    rate: u64,
    max_accrual_ms: i64,
}

impl AccrualEngine {
    pub fn new(
        store: Arc<dyn KeyValueStore>,
        clock: Arc<dyn Clock>,
        window_duration_ms: i64,
        rate: u64,
        max_accrual_ms: i64,
    ) -> Self {
        Self {
            store,
            clock,
            window_duration_ms,
            rate,
            max_accrual_ms,
        }
    }

    pub fn clock(&self) -> &Arc<dyn Clock> {
        &self.clock
    }

    pub fn now_ms(&self) -> i64 {
        self.clock.now_ms()
    }

    pub fn rate(&self) -> u64 {
        self.rate
    }

    /// The persisted window, if present and well-formed.
    pub fn load_window(&self) -> Result<Option<AccrualWindow>, WalletError> {
        let start = self.store.get(storage_keys::START_TIME)?;
        let end = self.store.get(storage_keys::END_TIME)?;
        let (Some(start), Some(end)) = (start, end) else {
            return Ok(None);
        };

        let parsed = start
            .trim()
            .parse::<i64>()
            .ok()
            .zip(end.trim().parse::<i64>().ok())
            .map(|(start_time, end_time)| AccrualWindow {
                start_time,
                end_time,
            })
            .filter(AccrualWindow::is_valid);
        if parsed.is_none() {
            log::warn!("discarding malformed stored window ({:?}, {:?})", start, end);
        }
        Ok(parsed)
    }

    pub fn store_window(&self, window: &AccrualWindow) -> Result<(), WalletError> {
        self.store
            .set(storage_keys::START_TIME, &window.start_time.to_string())?;
        self.store
            .set(storage_keys::END_TIME, &window.end_time.to_string())
    }

    /// Persist and return a new window starting at `start_ms`.
    pub fn start_window_at(&self, start_ms: i64) -> Result<AccrualWindow, WalletError> {
        let window = AccrualWindow::starting_at(start_ms, self.window_duration_ms);
        self.store_window(&window)?;
        log::debug!("started window {} -> {}", window.start_time, window.end_time);
        Ok(window)
    }

    /// The persisted window, creating one that starts now if none exists.
    pub fn get_or_init_window(&self) -> Result<AccrualWindow, WalletError> {
        match self.load_window()? {
            Some(window) => Ok(window),
            None => self.start_window_at(self.now_ms()),
        }
    }

    /// Discard the current window and start a fresh one now.
    pub fn reset_window(&self) -> Result<AccrualWindow, WalletError> {
        self.store.remove(storage_keys::START_TIME)?;
        self.store.remove(storage_keys::END_TIME)?;
        log::info!("accrual window reset");
        self.start_window_at(self.now_ms())
    }

    pub fn accrued_reward(&self, window: &AccrualWindow, now_ms: i64) -> u64 {
        window.accrued_reward(now_ms, self.rate, self.max_accrual_ms)
    }
}
