//! Lifecycle status derived from a normalized record and an observation time.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::record::WillRecord;

/// Where a will is in its lifecycle. Derived on every pass, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DerivedStatus {
    /// Funded, and the inactivity timeout has not elapsed.
    Active,
    /// Funded, and the inactivity timeout has elapsed; anyone may execute.
    ReadyToExecute,
    Executed,
    Cancelled,
    /// Read-only presentation of `ReadyToExecute`. Never produced by
    /// [`derive_status`]; see [`DerivedStatus::presented`].
    Expired,
    /// No funded will at this address.
    Empty,
}

/// The context a status is shown in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusView {
    /// The viewer can act on the will (execute it, ping it).
    Actionable,
    /// Display only.
    ReadOnly,
}

/// Derive the status of `record` at time `now` (seconds).
///
/// Precedence: executed, cancelled, empty balance, then the inactivity
/// clock. The expiry boundary is inclusive: at exactly
/// `last_liveness + inactivity_timeout` the will is ready to execute.
pub fn derive_status(record: &WillRecord, now: u64) -> DerivedStatus {
    if record.executed {
        DerivedStatus::Executed
    } else if record.cancelled {
        DerivedStatus::Cancelled
    } else if record.balance == 0 {
        DerivedStatus::Empty
    } else if now >= record.expiry() {
        DerivedStatus::ReadyToExecute
    } else {
        DerivedStatus::Active
    }
}

impl DerivedStatus {
    /// Active or awaiting execution.
    pub fn is_live(self) -> bool {
        matches!(
            self,
            DerivedStatus::Active | DerivedStatus::ReadyToExecute | DerivedStatus::Expired
        )
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, DerivedStatus::Executed | DerivedStatus::Cancelled)
    }

    /// Map to the variant shown in `view`: read-only contexts show an
    /// executable will as `Expired`.
    pub fn presented(self, view: StatusView) -> DerivedStatus {
        match (self, view) {
            (DerivedStatus::ReadyToExecute, StatusView::ReadOnly) => DerivedStatus::Expired,
            (DerivedStatus::Expired, StatusView::Actionable) => DerivedStatus::ReadyToExecute,
            (status, _) => status,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            DerivedStatus::Active => "Active",
            DerivedStatus::ReadyToExecute => "Ready to Execute",
            DerivedStatus::Executed => "Executed",
            DerivedStatus::Cancelled => "Cancelled",
            DerivedStatus::Expired => "Expired",
            DerivedStatus::Empty => "Empty",
        }
    }
}

impl fmt::Display for DerivedStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ──────────────────────────────────────────────
// Countdown
// ──────────────────────────────────────────────

/// Signed time left until a will's inactivity timeout elapses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TimeRemaining {
    /// Seconds until expiry; zero or negative once expired.
    pub seconds: i64,
}

impl TimeRemaining {
    pub fn until_expiry(record: &WillRecord, now: u64) -> Self {
        let delta = i128::from(record.expiry()) - i128::from(now);
        let seconds = delta.clamp(i128::from(i64::MIN), i128::from(i64::MAX)) as i64;
        TimeRemaining { seconds }
    }

    pub fn is_expired(&self) -> bool {
        self.seconds <= 0
    }

    /// `(days, hours, minutes, seconds)` of the remaining time; all zero
    /// once expired.
    pub fn parts(&self) -> (u64, u64, u64, u64) {
        let total = u64::try_from(self.seconds).unwrap_or(0);
        (
            total / 86_400,
            (total % 86_400) / 3_600,
            (total % 3_600) / 60,
            total % 60,
        )
    }
}

impl fmt::Display for TimeRemaining {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_expired() {
            return f.write_str("expired");
        }
        let (d, h, m, s) = self.parts();
        write!(f, "{}d {}h {}m {}s", d, h, m, s)
    }
}

// ──────────────────────────────────────────────
// Tests
// ──────────────────────────────────────────────
