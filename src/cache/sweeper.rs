use std::{
    sync::{Arc, Mutex, PoisonError, Weak},
    time::Duration,
};

use crate::{
    CooldownError,
    cache::BucketCache,
    runtime::{TaskHandle, cancel_task, new_interval, spawn_task, tick},
};

/// Background task that periodically evicts idle buckets from a cache.
///
/// At most one loop runs per sweeper. Starting a running sweeper and stopping
/// a stopped one are no-ops. The loop is cancelled when the sweeper is dropped.
pub(crate) struct Sweeper {
    interval: Duration,
    handle: Mutex<Option<TaskHandle>>,
}

impl Sweeper {
    pub(crate) fn new(interval: Duration) -> Self {
        Self {
            interval,
            handle: Mutex::new(None),
        }
    }

    pub(crate) fn start(&self, cache: &Arc<BucketCache>) -> Result<(), CooldownError> {
        let mut handle = self.handle.lock().unwrap_or_else(PoisonError::into_inner);

        if handle.is_some() {
            return Ok(());
        }

        let cache = Arc::downgrade(cache);
        let interval = self.interval;

        *handle = Some(spawn_task(Self::run(cache, interval))?);

        tracing::info!(interval_ms = interval.as_millis() as u64, "cooldown.sweeper.start");

        Ok(())
    } // end method start

    pub(crate) fn stop(&self) {
        let handle = self
            .handle
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();

        if let Some(handle) = handle {
            cancel_task(handle);
            tracing::info!("cooldown.sweeper.stop");
        }
    } // end method stop

    pub(crate) fn is_running(&self) -> bool {
        self.handle
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    async fn run(weak_cache: Weak<BucketCache>, interval: Duration) {
        let mut interval = new_interval(interval);

        loop {
            tick(&mut interval).await;

            let Some(cache) = weak_cache.upgrade() else {
                break;
            };

            let evicted = cache.clear(None, false);
            if evicted > 0 {
                tracing::debug!(evicted, remaining = cache.len(), "cooldown.sweeper.evict");
            }
        }
    } // end method run
}

impl Drop for Sweeper {
    fn drop(&mut self) {
        self.stop();
    }
}
