use criterion::{Criterion, criterion_group, criterion_main};

// The sweeper needs a Tokio runtime to spawn on; without `rt-tokio` these
// benches compile to no-ops.
#[cfg(feature = "rt-tokio")]
mod enabled {
    use std::{hint::black_box, time::Duration};

    use criterion::Criterion;
    use futures::executor::block_on;
    use tokio::runtime::Runtime;

    use cooldowns::{BucketStrategy, CallArgs, Cooldown, call_args};

    fn cooldown(rt: &Runtime, limit: u64, strategy: BucketStrategy) -> Cooldown {
        let _guard = rt.enter();
        Cooldown::fixed(limit, Duration::from_secs(60), strategy).unwrap()
    }

    pub fn bench_hot_bucket_admitted(c: &mut Criterion) {
        let rt = Runtime::new().unwrap();
        let mut group = c.benchmark_group("local_cooldown/hot_bucket_admitted");
        group.sample_size(200);

        for strategy in [BucketStrategy::All, BucketStrategy::Positional] {
            group.bench_function(format!("enter/strategy={strategy:?}"), |b| {
                let cooldown = cooldown(&rt, u64::MAX, strategy.clone());
                let args = call_args!["user_1"; verbose = true];

                b.iter(|| {
                    black_box(block_on(cooldown.enter(black_box(&args)))).unwrap();
                });
            });
        }

        group.finish();
    }

    pub fn bench_many_buckets_admitted(c: &mut Criterion) {
        let rt = Runtime::new().unwrap();
        let mut group = c.benchmark_group("local_cooldown/many_buckets_admitted");
        group.sample_size(100);

        for bucket_space in [1_000_usize, 100_000] {
            group.bench_function(format!("enter/buckets={bucket_space}"), |b| {
                let cooldown = cooldown(&rt, u64::MAX, BucketStrategy::Positional);
                let args: Vec<CallArgs> = (0..bucket_space)
                    .map(|i| call_args![format!("user_{i}")])
                    .collect();

                // Advance through the bucket space on every iteration.
                let mut idx = 0_usize;

                b.iter(|| {
                    idx = idx.wrapping_add(1);
                    let args = &args[idx % args.len()];
                    black_box(block_on(cooldown.enter(black_box(args)))).unwrap();
                });
            });
        }

        group.finish();
    }

    pub fn bench_reject_path(c: &mut Criterion) {
        let rt = Runtime::new().unwrap();
        let mut group = c.benchmark_group("local_cooldown/reject_path");
        group.sample_size(200);

        group.bench_function("enter/rejected", |b| {
            let cooldown = cooldown(&rt, 10, BucketStrategy::All);
            let args = call_args!["k"];

            // Use up the window so every call takes the reject path.
            for _ in 0..10 {
                block_on(cooldown.enter(&args)).unwrap();
            }

            b.iter(|| {
                black_box(block_on(cooldown.enter(black_box(&args)))).unwrap_err();
            });
        });

        group.bench_function("remaining_calls/rejected", |b| {
            let cooldown = cooldown(&rt, 10, BucketStrategy::All);
            let args = call_args!["k"];

            for _ in 0..10 {
                block_on(cooldown.enter(&args)).unwrap();
            }

            b.iter(|| {
                black_box(block_on(cooldown.remaining_calls(black_box(&args))));
            });
        });

        group.finish();
    }
}

#[cfg(feature = "rt-tokio")]
fn bench_hot_bucket_admitted(c: &mut Criterion) {
    enabled::bench_hot_bucket_admitted(c)
}

#[cfg(not(feature = "rt-tokio"))]
fn bench_hot_bucket_admitted(_: &mut Criterion) {}

#[cfg(feature = "rt-tokio")]
fn bench_many_buckets_admitted(c: &mut Criterion) {
    enabled::bench_many_buckets_admitted(c)
}

#[cfg(not(feature = "rt-tokio"))]
fn bench_many_buckets_admitted(_: &mut Criterion) {}

#[cfg(feature = "rt-tokio")]
fn bench_reject_path(c: &mut Criterion) {
    enabled::bench_reject_path(c)
}

#[cfg(not(feature = "rt-tokio"))]
fn bench_reject_path(_: &mut Criterion) {}

criterion_group!(
    benches,
    bench_hot_bucket_admitted,
    bench_many_buckets_admitted,
    bench_reject_path
);
criterion_main!(benches);
