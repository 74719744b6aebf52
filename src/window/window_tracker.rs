use std::time::{Duration, Instant};

use tokio::sync::Mutex;

use crate::Window;

/// Point-in-time view of one bucket's window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowSnapshot {
    /// Calls allowed per window.
    pub limit: u64,
    /// Calls consumed in the live window (0 if the window has elapsed).
    pub consumed: u64,
    /// Calls left before the bucket goes on cooldown.
    pub remaining: u64,
    /// Time until the live window resets, `None` if no window is running.
    pub resets_in: Option<Duration>,
}

pub(crate) enum AcquireOutcome {
    /// Consumption recorded; carries the count after the increment.
    Admitted { consumed: u64 },
    /// Over the limit, nothing recorded.
    RateLimited {
        retry_after: Duration,
        resets_at: Instant,
    },
    /// The tracker was evicted from its cache while the caller waited for it.
    Retired,
}

#[derive(Debug, Default)]
pub(crate) struct WindowState {
    pub consumed: u64,
    /// `None` until the first acquisition starts a window.
    pub deadline: Option<Instant>,
    pub retired: bool,
}

impl WindowState {
    pub fn has_active_cooldown(&self, now: Instant) -> bool {
        self.consumed > 0 && self.deadline.is_some_and(|deadline| now < deadline)
    }

    /// Consumption that still counts at `now`.
    pub fn live_consumed(&self, now: Instant) -> u64 {
        if self.has_active_cooldown(now) {
            self.consumed
        } else {
            0
        }
    }

    pub fn try_consume(&mut self, limit: u64, window: &Window, now: Instant) -> AcquireOutcome {
        let deadline = match self.deadline {
            Some(deadline) if now < deadline => deadline,
            _ => {
                let deadline = window.next_deadline(now);
                self.consumed = 0;
                self.deadline = Some(deadline);
                deadline
            }
        };

        if self.consumed < limit {
            self.consumed += 1;
            return AcquireOutcome::Admitted {
                consumed: self.consumed,
            };
        }

        AcquireOutcome::RateLimited {
            retry_after: deadline.saturating_duration_since(now),
            resets_at: deadline,
        }
    } // end method try_consume

    pub fn snapshot(&self, limit: u64, now: Instant) -> WindowSnapshot {
        let consumed = self.live_consumed(now).min(limit);
        let resets_in = self
            .deadline
            .filter(|deadline| now < *deadline)
            .map(|deadline| deadline - now);

        WindowSnapshot {
            limit,
            consumed,
            remaining: limit - consumed,
            resets_in,
        }
    }
}

/// Consumption tracker for a single bucket.
///
/// All reads and writes of the window go through one async mutex, which is the
/// bucket's exclusive hold: concurrent acquisitions on the same bucket are
/// serialised, acquisitions on different buckets never touch the same lock.
/// The hold is only kept for the check-and-increment, never while the guarded
/// call runs.
pub(crate) struct WindowTracker {
    limit: u64,
    window: Window,
    state: Mutex<WindowState>,
}

impl WindowTracker {
    pub(crate) fn new(limit: u64, window: Window) -> Self {
        Self {
            limit,
            window,
            state: Mutex::new(WindowState::default()),
        }
    } // end constructor

    /// Wait for the bucket's hold, then consume one call if the window allows.
    pub(crate) async fn acquire(&self) -> AcquireOutcome {
        let mut state = self.state.lock().await;

        if state.retired {
            return AcquireOutcome::Retired;
        }

        state.try_consume(self.limit, &self.window, Instant::now())
    } // end method acquire

    #[cfg(test)]
    pub(crate) async fn hold(&self) -> tokio::sync::MutexGuard<'_, WindowState> {
        self.state.lock().await
    }

    pub(crate) async fn snapshot(&self) -> WindowSnapshot {
        self.state.lock().await.snapshot(self.limit, Instant::now())
    }

    /// Mark the tracker retired if it may be evicted at `now`.
    ///
    /// Never waits: a tracker whose hold is taken is mid-acquisition and only
    /// `force` evicts it.
    pub(crate) fn try_retire(&self, now: Instant, force: bool) -> bool {
        let Ok(mut state) = self.state.try_lock() else {
            return force;
        };

        if force || !state.has_active_cooldown(now) {
            state.retired = true;
            return true;
        }

        false
    } // end method try_retire
} // end of impl
