//! The cooldown coordinator.
//!
//! A [`Cooldown`] owns one bucket cache and enforces one limit/window pair over
//! it. It resolves call arguments to buckets, performs the per-bucket
//! check-and-increment, and answers introspection queries. Several cooldowns
//! can guard the same callable; see [`CooledDown`](crate::CooledDown).

use std::{
    future::Future,
    sync::{Arc, OnceLock},
    time::Duration,
};

use chrono::NaiveTime;

use crate::{
    BucketKey, BucketStrategy, CallArgs, CallLimit, CallableOnCooldown, CooldownError, CooldownId,
    SweepIntervalMs, Window, WindowSnapshot,
    cache::{BucketCache, Sweeper},
    window::AcquireOutcome,
};

/// Configuration for a [`Cooldown`].
///
/// # Examples
///
/// ```
/// use std::time::Duration;
///
/// use cooldowns::{BucketStrategy, CallLimit, CooldownOptions, SweepIntervalMs, Window};
///
/// let options = CooldownOptions {
///     limit: CallLimit::try_from(5u64).unwrap(),
///     window: Window::try_from(Duration::from_secs(60)).unwrap(),
///     strategy: BucketStrategy::Positional,
///     cooldown_id: Some("per-user".into()),
///     sweep_interval_ms: SweepIntervalMs::default(),
/// };
/// # let _ = options;
/// ```
#[derive(Clone, Debug)]
pub struct CooldownOptions {
    /// Calls admitted per bucket per window.
    pub limit: CallLimit,
    /// When each bucket's consumption resets.
    pub window: Window,
    /// How call arguments map to buckets.
    pub strategy: BucketStrategy,
    /// Optional identifier, used to pick this cooldown out of a stack.
    pub cooldown_id: Option<CooldownId>,
    /// How often idle buckets are swept from the cache.
    pub sweep_interval_ms: SweepIntervalMs,
}

/// Call-rate limiter for one callable, partitioned into buckets.
///
/// # Semantics
///
/// - **Exact per bucket:** the check and the increment happen under the
///   bucket's own lock, so for a limit of N exactly N calls per window are
///   admitted no matter how many tasks race on the bucket
/// - **Independent buckets:** calls on different buckets never wait for each
///   other
/// - **No queueing:** an over-limit call fails at once with
///   [`CallableOnCooldown`]; it never waits for the window to reset
/// - **Windows start on use:** a fixed window opens with the first call made
///   after the previous one elapsed
///
/// # Memory
///
/// Buckets are created on first use. A background sweeper, started by
/// [`Cooldown::new`], evicts buckets without live consumption every
/// [`SweepIntervalMs`]. It is stopped when the cooldown is dropped.
///
/// # Examples
///
/// ```no_run
/// use std::time::Duration;
///
/// use cooldowns::{BucketStrategy, Cooldown, call_args};
///
/// # async fn run() -> Result<(), cooldowns::CooldownError> {
/// let cooldown = Cooldown::fixed(2, Duration::from_secs(1), BucketStrategy::All)?;
///
/// let args = call_args!["user_123"];
/// cooldown.enter(&args).await?;
/// cooldown.enter(&args).await?;
/// assert_eq!(cooldown.remaining_calls(&args).await, 0);
/// assert!(cooldown.enter(&args).await.is_err());
/// # Ok(())
/// # }
/// ```
pub struct Cooldown {
    limit: CallLimit,
    window: Window,
    strategy: BucketStrategy,
    cooldown_id: Option<CooldownId>,
    callable: OnceLock<Arc<str>>,
    cache: Arc<BucketCache>,
    sweeper: Sweeper,
}

impl Cooldown {
    /// Create a cooldown and start its sweeper.
    ///
    /// With the `rt-tokio` feature this must be called from within a Tokio
    /// runtime, otherwise [`CooldownError::RuntimeUnavailable`] is returned.
    pub fn new(options: CooldownOptions) -> Result<Self, CooldownError> {
        let CooldownOptions {
            limit,
            window,
            strategy,
            cooldown_id,
            sweep_interval_ms,
        } = options;

        window.validate()?;

        let cache = Arc::new(BucketCache::new(*limit, window));
        let sweeper = Sweeper::new(Duration::from_millis(*sweep_interval_ms));
        sweeper.start(&cache)?;

        Ok(Self {
            limit,
            window,
            strategy,
            cooldown_id,
            callable: OnceLock::new(),
            cache,
            sweeper,
        })
    } // end constructor

    /// Cooldown allowing `limit` calls per bucket every `period`.
    pub fn fixed(
        limit: u64,
        period: Duration,
        strategy: BucketStrategy,
    ) -> Result<Self, CooldownError> {
        Self::new(CooldownOptions {
            limit: CallLimit::try_from(limit)?,
            window: Window::try_from(period)?,
            strategy,
            cooldown_id: None,
            sweep_interval_ms: SweepIntervalMs::default(),
        })
    }

    /// Cooldown allowing `limit` calls per bucket until the next local `at`,
    /// recurring daily.
    pub fn daily(
        limit: u64,
        at: NaiveTime,
        strategy: BucketStrategy,
    ) -> Result<Self, CooldownError> {
        Self::new(CooldownOptions {
            limit: CallLimit::try_from(limit)?,
            window: Window::from(at),
            strategy,
            cooldown_id: None,
            sweep_interval_ms: SweepIntervalMs::default(),
        })
    }

    /// Calls admitted per bucket per window.
    pub fn limit(&self) -> u64 {
        *self.limit
    }

    /// The reset schedule.
    pub fn window(&self) -> Window {
        self.window
    }

    /// The bucket strategy.
    pub fn strategy(&self) -> &BucketStrategy {
        &self.strategy
    }

    /// The identifier given at construction, if any.
    pub fn cooldown_id(&self) -> Option<&CooldownId> {
        self.cooldown_id.as_ref()
    }

    /// Name of the callable this cooldown guards, once it has been attached.
    pub fn callable(&self) -> Option<&str> {
        self.callable.get().map(|name| &**name)
    }

    /// Record the guarded callable's name. Only the first call has an effect.
    pub(crate) fn attach(&self, callable: Arc<str>) {
        let _ = self.callable.set(callable);
    }

    /// Bucket that `args` fall into. Pure: no cache access.
    pub fn get_bucket(&self, args: &CallArgs) -> BucketKey {
        self.strategy.resolve(args)
    }

    /// Consume one call from `bucket`.
    ///
    /// Waits only for the bucket's lock, never for the window. The bucket is
    /// created if it is not tracked yet.
    pub async fn acquire(&self, bucket: &BucketKey) -> Result<(), CallableOnCooldown> {
        loop {
            let tracker = self.cache.get_or_create(bucket);

            match tracker.acquire().await {
                AcquireOutcome::Admitted { consumed } => {
                    tracing::trace!(bucket = %bucket, consumed, limit = *self.limit, "cooldown.admit");
                    return Ok(());
                }
                AcquireOutcome::RateLimited {
                    retry_after,
                    resets_at,
                } => {
                    tracing::debug!(
                        bucket = %bucket,
                        retry_after_ms = retry_after.as_millis() as u64,
                        "cooldown.reject"
                    );

                    return Err(CallableOnCooldown {
                        bucket: bucket.clone(),
                        retry_after,
                        resets_at,
                        limit: *self.limit,
                        window: self.window,
                        cooldown_id: self.cooldown_id.clone(),
                        callable: self.callable.get().cloned(),
                    });
                }
                // Evicted while we waited for it; the cache hands out a fresh one.
                AcquireOutcome::Retired => continue,
            }
        }
    } // end method acquire

    /// Resolve the bucket for `args` and consume one call from it.
    ///
    /// Returns the bucket that was charged.
    pub async fn enter(&self, args: &CallArgs) -> Result<BucketKey, CallableOnCooldown> {
        let bucket = self.get_bucket(args);
        self.acquire(&bucket).await?;
        Ok(bucket)
    }

    /// Run `fut` if a call with `args` is admitted.
    ///
    /// The future runs after the bucket's lock has been released. Errors from
    /// `fut` are returned unchanged.
    pub async fn run<Fut, T, E>(&self, args: &CallArgs, fut: Fut) -> Result<T, E>
    where
        Fut: Future<Output = Result<T, E>>,
        E: From<CallableOnCooldown>,
    {
        self.enter(args).await?;
        fut.await
    }

    /// Calls left for the bucket of `args` in its live window.
    ///
    /// Returns the full limit for a bucket that is not tracked or whose window
    /// has elapsed. Never creates a bucket.
    pub async fn remaining_calls(&self, args: &CallArgs) -> u64 {
        let bucket = self.get_bucket(args);

        match self.cache.lookup(&bucket) {
            None => *self.limit,
            Some(tracker) => tracker.snapshot().await.remaining,
        }
    }

    /// Snapshot of `bucket`'s window, `None` if the bucket is not tracked.
    pub async fn window_state(&self, bucket: &BucketKey) -> Option<WindowSnapshot> {
        let tracker = self.cache.lookup(bucket)?;
        Some(tracker.snapshot().await)
    }

    /// Evict `bucket`, or every bucket when `None`.
    ///
    /// Buckets with live consumption are kept unless `force` is set, in which
    /// case their count is discarded and the next call starts a new window.
    /// Returns how many buckets were evicted.
    pub fn reset(&self, bucket: Option<&BucketKey>, force: bool) -> usize {
        let evicted = self.cache.clear(bucket, force);
        tracing::debug!(evicted, force, "cooldown.reset");
        evicted
    }

    /// Number of buckets currently in the cache.
    pub fn tracked_buckets(&self) -> usize {
        self.cache.len()
    }

    /// Start the sweeper again after [`stop_sweeper`](Self::stop_sweeper).
    /// No-op if it is running.
    pub fn start_sweeper(&self) -> Result<(), CooldownError> {
        self.sweeper.start(&self.cache)
    }

    /// Stop the background sweeper. Idempotent.
    pub fn stop_sweeper(&self) {
        self.sweeper.stop();
    }

    /// Whether the background sweeper is running.
    pub fn is_sweeping(&self) -> bool {
        self.sweeper.is_running()
    }
} // end of impl

impl std::fmt::Debug for Cooldown {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cooldown")
            .field("limit", &*self.limit)
            .field("window", &self.window)
            .field("strategy", &self.strategy)
            .field("cooldown_id", &self.cooldown_id)
            .field("callable", &self.callable.get())
            .finish_non_exhaustive()
    }
}
