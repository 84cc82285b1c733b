//! Cooperative cancellation for long scrapes.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Why a [`CancellationToken`] stopped a scrape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CancelReason {
    /// `cancel()` was called on the token or one of its clones.
    Requested,

    /// The deadline attached to the token passed.
    DeadlineExceeded,
}

impl std::fmt::Display for CancelReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CancelReason::Requested => write!(f, "cancellation requested"),
            CancelReason::DeadlineExceeded => write!(f, "deadline exceeded"),
        }
    }
}

/// Cancellation signal polled by the scraper between lines.
///
/// Clones share the same flag, so cancelling any clone cancels all of them.
/// Tokens derived with [`CancellationToken::with_deadline`] also share the
/// flag but carry their own deadline, which lets a long-lived parent (one per
/// table) hand out per-query children.
///
/// # Thread Safety
///
/// `CancellationToken` is `Clone + Send + Sync`; `cancel()` is idempotent.
#[derive(Clone, Debug, Default)]
pub struct CancellationToken {
    flag: Arc<AtomicBool>,
    deadline: Option<Instant>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Release);
    }

    /// Child token sharing this token's flag, expiring at `deadline` or at
    /// this token's own deadline, whichever comes first.
    pub fn with_deadline(&self, deadline: Instant) -> Self {
        let deadline = match self.deadline {
            Some(existing) => existing.min(deadline),
            None => deadline,
        };

        CancellationToken {
            flag: Arc::clone(&self.flag),
            deadline: Some(deadline),
        }
    }

    /// Like [`CancellationToken::with_deadline`], measured from now.
    ///
    /// A timeout too large to represent leaves the deadline unchanged.
    pub fn with_timeout(&self, timeout: Duration) -> Self {
        match Instant::now().checked_add(timeout) {
            Some(deadline) => self.with_deadline(deadline),
            None => self.clone(),
        }
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// An explicit `cancel()` wins over an expired deadline.
    pub fn cancel_reason(&self) -> Option<CancelReason> {
        if self.flag.load(Ordering::Acquire) {
            return Some(CancelReason::Requested);
        }

        match self.deadline {
            Some(deadline) if Instant::now() >= deadline => Some(CancelReason::DeadlineExceeded),
            _ => None,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel_reason().is_some()
    }
}
