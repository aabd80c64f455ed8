//! Host application collaborator (haptics and QR scanning).
//!
//! In the Mini App this is the Telegram client; the CLI supplies a terminal
//! implementation.

/// Haptic impact styles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImpactStyle {
    Light,
    Medium,
    Heavy,
    Rigid,
    Soft,
}

/// Haptic notification kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Warning,
    Error,
}

/// One haptic signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Feedback {
    Impact(ImpactStyle),
    Notification(NotificationKind),
}

pub trait Host: Send + Sync {
    /// Fire-and-forget impact haptic.
    fn impact(&self, style: ImpactStyle);

    /// Fire-and-forget notification haptic.
    fn notify(&self, kind: NotificationKind);

    /// Open the host QR scanner. `None` if the user closed it.
    fn scan_qr(&self) -> Option<String>;

    fn feedback(&self, feedback: Feedback) {
        match feedback {
            Feedback::Impact(style) => self.impact(style),
            Feedback::Notification(kind) => self.notify(kind),
        }
    }
}

/// Host without haptics or a scanner.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopHost;

impl Host for NoopHost {
    fn impact(&self, _style: ImpactStyle) {}

    fn notify(&self, _kind: NotificationKind) {}

    fn scan_qr(&self) -> Option<String> {
        None
    }
}

/// Open the scanner and decode the payload into a recipient.
///
/// `Ok(None)` when the user closed the scanner without a result.
pub fn scan_recipient(
    host: &dyn Host,
) -> Result<Option<orbit_types::ScannedRecipient>, orbit_types::AddressError> {
    match host.scan_qr() {
        Some(payload) => orbit_types::parse_scanned_recipient(&payload).map(Some),
        None => Ok(None),
    }
}
