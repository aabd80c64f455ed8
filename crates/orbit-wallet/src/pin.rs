//! PIN pad state machine.
//!
//! Collects up to six digits, accepts a submit at exactly four or six, and
//! returns to an empty pad when the entered PIN fails to unlock the vault.
//! Every input emits its haptic signal through the [`Host`].

use crate::error::{PinError, WalletError};
use crate::host::{Feedback, Host, ImpactStyle, NotificationKind};
use std::sync::Arc;
use zeroize::Zeroizing;

pub const MAX_PIN_LEN: usize = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PinState {
    /// Digits entered so far.
    Entering(usize),
    Submitted,
}

pub struct PinPad {
    host: Arc<dyn Host>,
    digits: Zeroizing<String>,
    submitted: bool,
}

impl PinPad {
    pub fn new(host: Arc<dyn Host>) -> Self {
        Self {
            host,
            digits: Zeroizing::new(String::with_capacity(MAX_PIN_LEN)),
            submitted: false,
        }
    }

    pub fn state(&self) -> PinState {
        if self.submitted {
            PinState::Submitted
        } else {
            PinState::Entering(self.digits.len())
        }
    }

    /// Masked rendering of the entered digits.
    pub fn masked(&self) -> String {
        "●".repeat(self.digits.len())
    }

    fn emit(&self, feedback: Feedback) -> Feedback {
        self.host.feedback(feedback);
        feedback
    }

    /// Append a digit. Ignored (no haptic) when the pad is full, submitted,
    /// or `digit` is not 0-9.
    pub fn press_digit(&mut self, digit: u8) -> Option<Feedback> {
        if self.submitted || digit > 9 || self.digits.len() >= MAX_PIN_LEN {
            return None;
        }
        self.digits.push(char::from(b'0' + digit));
        Some(self.emit(Feedback::Impact(ImpactStyle::Soft)))
    }

    pub fn backspace(&mut self) -> Feedback {
        if !self.submitted {
            self.digits.pop();
        }
        self.emit(Feedback::Impact(ImpactStyle::Light))
    }

    /// Submit the entered PIN. Accepted only at length 4 or 6.
    pub fn submit(&mut self) -> Result<Zeroizing<String>, PinError> {
        if self.submitted {
            return Err(PinError::AlreadySubmitted);
        }
        let len = self.digits.len();
        if len != 4 && len != MAX_PIN_LEN {
            self.emit(Feedback::Notification(NotificationKind::Error));
            return Err(PinError::InvalidLength(len));
        }
        self.submitted = true;
        self.emit(Feedback::Notification(NotificationKind::Success));
        Ok(Zeroizing::new(self.digits.as_str().to_string()))
    }

    /// The submitted PIN did not unlock: clear and allow another attempt.
    pub fn reject(&mut self) -> PinError {
        self.digits.clear();
        self.submitted = false;
        self.emit(Feedback::Notification(NotificationKind::Error));
        PinError::Retry
    }

    /// Clear without signalling (e.g. the prompt was closed).
    pub fn clear(&mut self) {
        self.digits.clear();
        self.submitted = false;
    }

    /// Submit and hand the PIN to `unlock`.
    ///
    /// A [`WalletError::DecryptionFailed`] from `unlock` resets the pad and is
    /// reported as [`PinError::Retry`]; any other error is passed through.
    pub fn submit_with<T>(
        &mut self,
        unlock: impl FnOnce(&str) -> Result<T, WalletError>,
    ) -> Result<T, PinSubmitError> {
        let pin = self.submit().map_err(PinSubmitError::Pin)?;
        match unlock(pin.as_str()) {
            Ok(value) => Ok(value),
            Err(WalletError::DecryptionFailed) => Err(PinSubmitError::Pin(self.reject())),
            Err(other) => {
                self.clear();
                Err(PinSubmitError::Wallet(other))
            }
        }
    }
}

/// Failure of [`PinPad::submit_with`].
#[derive(Debug, thiserror::Error)]
pub enum PinSubmitError {
    #[error(transparent)]
    Pin(PinError),

    #[error(transparent)]
    Wallet(WalletError),
}
