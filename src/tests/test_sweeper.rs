use std::{sync::Arc, time::Duration};

use crate::{
    BucketKey, BucketStrategy, CallLimit, Cooldown, CooldownOptions, SweepIntervalMs, Window,
    cache::{BucketCache, Sweeper},
    call_args,
    tests::runtime::{async_sleep, block_on},
};

fn sweeping_cooldown(window_ms: u64, sweep_interval_ms: u64) -> Cooldown {
    Cooldown::new(CooldownOptions {
        limit: CallLimit::try_from(10u64).unwrap(),
        window: Window::try_from(Duration::from_millis(window_ms)).unwrap(),
        strategy: BucketStrategy::Positional,
        cooldown_id: None,
        sweep_interval_ms: SweepIntervalMs::try_from(sweep_interval_ms).unwrap(),
    })
    .unwrap()
}

#[test]
fn test_sweeper_evicts_idle_buckets() {
    block_on(async {
        let cooldown = sweeping_cooldown(100, 50);
        assert!(cooldown.is_sweeping());

        cooldown.enter(&call_args!["key1"]).await.unwrap();
        cooldown.enter(&call_args!["key2"]).await.unwrap();
        cooldown.enter(&call_args!["key3"]).await.unwrap();
        assert_eq!(cooldown.tracked_buckets(), 3);

        // Windows elapse after 100ms, the next sweep drops them.
        async_sleep(Duration::from_millis(250)).await;

        assert_eq!(cooldown.tracked_buckets(), 0);
    });
}

#[test]
fn test_sweeper_keeps_active_buckets() {
    block_on(async {
        let cooldown = sweeping_cooldown(500, 50);
        let args = call_args!["key1"];

        cooldown.enter(&args).await.unwrap();

        for _ in 0..4 {
            async_sleep(Duration::from_millis(60)).await;
            assert_eq!(cooldown.tracked_buckets(), 1);
        }

        // Evicting would have reset the count.
        assert_eq!(cooldown.remaining_calls(&args).await, 9);
    });
}

#[test]
fn test_stop_sweeper_prevents_future_eviction() {
    block_on(async {
        let cooldown = sweeping_cooldown(50, 50);

        cooldown.stop_sweeper();
        assert!(!cooldown.is_sweeping());

        cooldown.enter(&call_args!["key1"]).await.unwrap();
        async_sleep(Duration::from_millis(200)).await;

        // Idle but still tracked.
        assert_eq!(cooldown.tracked_buckets(), 1);
        assert_eq!(cooldown.remaining_calls(&call_args!["key1"]).await, 10);
    });
}

#[test]
fn test_stop_sweeper_is_idempotent() {
    block_on(async {
        let cooldown = sweeping_cooldown(50, 50);

        cooldown.stop_sweeper();
        cooldown.stop_sweeper();
        assert!(!cooldown.is_sweeping());
    });
}

#[test]
fn test_start_sweeper_is_idempotent() {
    block_on(async {
        let cooldown = sweeping_cooldown(50, 50);

        cooldown.start_sweeper().unwrap();
        cooldown.start_sweeper().unwrap();
        assert!(cooldown.is_sweeping());

        cooldown.enter(&call_args!["key1"]).await.unwrap();
        async_sleep(Duration::from_millis(200)).await;
        assert_eq!(cooldown.tracked_buckets(), 0);
    });
}

#[test]
fn test_sweeper_restarts_after_stop() {
    block_on(async {
        let cooldown = sweeping_cooldown(50, 50);

        cooldown.stop_sweeper();
        cooldown.enter(&call_args!["key1"]).await.unwrap();
        async_sleep(Duration::from_millis(150)).await;
        assert_eq!(cooldown.tracked_buckets(), 1);

        cooldown.start_sweeper().unwrap();
        assert!(cooldown.is_sweeping());

        async_sleep(Duration::from_millis(150)).await;
        assert_eq!(cooldown.tracked_buckets(), 0);
    });
}

#[test]
fn test_sweeper_never_evicts_limited_bucket() {
    block_on(async {
        let cooldown = Cooldown::new(CooldownOptions {
            limit: CallLimit::try_from(1u64).unwrap(),
            window: Window::try_from(Duration::from_secs(60)).unwrap(),
            strategy: BucketStrategy::All,
            cooldown_id: None,
            sweep_interval_ms: SweepIntervalMs::try_from(20u64).unwrap(),
        })
        .unwrap();
        let args = call_args![1];

        cooldown.enter(&args).await.unwrap();
        async_sleep(Duration::from_millis(120)).await;

        assert!(cooldown.enter(&args).await.is_err());
    });
}

#[test]
fn test_dropping_sweeper_cancels_loop() {
    block_on(async {
        let cache = Arc::new(BucketCache::new(
            1,
            Window::try_from(Duration::from_millis(10)).unwrap(),
        ));
        let sweeper = Sweeper::new(Duration::from_millis(20));
        sweeper.start(&cache).unwrap();

        drop(sweeper);

        // Idle from the start, yet nothing sweeps it.
        cache.get_or_create(&BucketKey::from(call_args!["key1"]));
        async_sleep(Duration::from_millis(100)).await;

        assert_eq!(cache.len(), 1);
    });
}

#[test]
fn test_sweeper_exits_when_cache_is_gone() {
    block_on(async {
        let cache = Arc::new(BucketCache::new(
            1,
            Window::try_from(Duration::from_millis(10)).unwrap(),
        ));
        let weak = Arc::downgrade(&cache);
        let sweeper = Sweeper::new(Duration::from_millis(20));
        sweeper.start(&cache).unwrap();

        drop(cache);
        async_sleep(Duration::from_millis(60)).await;

        // The loop only holds a weak reference.
        assert!(weak.upgrade().is_none());
        sweeper.stop();
    });
}
