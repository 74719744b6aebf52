use std::{sync::Arc, time::Instant};

use dashmap::DashMap;

use crate::{BucketKey, Window, window::WindowTracker};

/// Map of bucket → tracker for one cooldown.
///
/// Trackers are created lazily on first use and all share the owning
/// cooldown's limit and window.
///
/// # Eviction
///
/// A tracker is evictable once it holds no live consumption (never used, or
/// its window elapsed). Eviction marks the tracker retired while holding its
/// lock, so an acquisition that raced with the eviction sees the flag and
/// goes back through [`get_or_create`](Self::get_or_create) instead of
/// counting on a tracker that is no longer in the map.
pub(crate) struct BucketCache {
    limit: u64,
    window: Window,
    trackers: DashMap<BucketKey, Arc<WindowTracker>>,
}

impl BucketCache {
    pub(crate) fn new(limit: u64, window: Window) -> Self {
        Self {
            limit,
            window,
            trackers: DashMap::new(),
        }
    } // end constructor

    /// Tracker for `key`, inserting a fresh one (no window started) if absent.
    pub(crate) fn get_or_create(&self, key: &BucketKey) -> Arc<WindowTracker> {
        if let Some(tracker) = self.trackers.get(key) {
            return Arc::clone(tracker.value());
        }

        let tracker = self.trackers.entry(key.clone()).or_insert_with(|| {
            tracing::debug!(bucket = %key, limit = self.limit, "cooldown.bucket.create");
            Arc::new(WindowTracker::new(self.limit, self.window))
        });

        Arc::clone(tracker.value())
    } // end method get_or_create

    /// Tracker for `key` without creating one. `None` means the bucket is not
    /// tracked, which is distinct from a tracker with nothing consumed.
    pub(crate) fn lookup(&self, key: &BucketKey) -> Option<Arc<WindowTracker>> {
        self.trackers
            .get(key)
            .map(|tracker| Arc::clone(tracker.value()))
    }

    /// Evict `key`, or every key when `None`. Returns how many were evicted.
    ///
    /// Without `force` only idle trackers are evicted.
    pub(crate) fn clear(&self, key: Option<&BucketKey>, force: bool) -> usize {
        let now = Instant::now();

        match key {
            Some(key) => usize::from(self.evict(key, now, force)),
            None => {
                // Snapshot first: evicting while iterating would deadlock on the shard locks.
                let keys: Vec<BucketKey> = self
                    .trackers
                    .iter()
                    .map(|entry| entry.key().clone())
                    .collect();

                keys.iter().filter(|key| self.evict(key, now, force)).count()
            }
        }
    } // end method clear

    fn evict(&self, key: &BucketKey, now: Instant, force: bool) -> bool {
        self.trackers
            .remove_if(key, |_, tracker| tracker.try_retire(now, force))
            .is_some()
    }

    pub(crate) fn len(&self) -> usize {
        self.trackers.len()
    }
} // end of impl
