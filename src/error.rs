use std::{
    fmt,
    sync::Arc,
    time::{Duration, Instant},
};

use crate::{BucketKey, CooldownId, Window};

/// Error type for this crate.
#[derive(Debug, thiserror::Error)]
pub enum CooldownError {
    /// The call limit was rejected (must be greater than 0).
    #[error("invalid call limit: {0}")]
    InvalidCallLimit(String),

    /// The window was rejected (a fixed window must be longer than 0).
    #[error("invalid window: {0}")]
    InvalidWindow(String),

    /// The sweep interval was rejected (must be greater than 0).
    #[error("invalid sweep interval: {0}")]
    InvalidSweepInterval(String),

    /// The background sweeper could not be spawned.
    #[error("no async runtime available: {0}")]
    RuntimeUnavailable(String),

    /// A call was rejected because its bucket is on cooldown.
    #[error(transparent)]
    OnCooldown(#[from] CallableOnCooldown),
}

/// A call was rejected because its bucket has used up the current window.
///
/// This is the only rejection callers ever see. The crate never retries on
/// its own; use [`retry_after`](Self::retry_after) to decide whether to wait,
/// queue, or drop the call.
#[derive(Debug, Clone)]
pub struct CallableOnCooldown {
    /// The bucket that ran out of calls.
    pub bucket: BucketKey,
    /// Time left until the bucket's window resets.
    pub retry_after: Duration,
    /// Monotonic instant at which the window resets.
    pub resets_at: Instant,
    /// Calls allowed per window by the rejecting cooldown.
    pub limit: u64,
    /// Window of the rejecting cooldown.
    pub window: Window,
    /// Identifier of the rejecting cooldown, if it was given one.
    pub cooldown_id: Option<CooldownId>,
    /// Name of the wrapped callable, if the cooldown is attached to one.
    pub callable: Option<Arc<str>>,
}

impl fmt::Display for CallableOnCooldown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.callable {
            Some(callable) => write!(f, "{callable} is on cooldown")?,
            None => f.write_str("callable is on cooldown")?,
        }

        write!(
            f,
            " for bucket {} ({} calls per {}), retry after {}ms",
            self.bucket,
            self.limit,
            self.window,
            self.retry_after.as_millis()
        )
    }
}

impl std::error::Error for CallableOnCooldown {}
