//! Submission and cooperative-wait throughput

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use depth_pool::prelude::*;

fn submit_and_wait(pool: &ThreadPool, n: u64) -> u64 {
    let handles: Vec<_> = (0..n)
        .map(|i| pool.add_task_with_priority((i % 8) as i32, move || black_box(i) * 2))
        .collect();
    handles
        .into_iter()
        .map(|h| pool.wait_for_task(h).unwrap_or_default())
        .sum()
}

fn bench_submit_wait(c: &mut Criterion) {
    let mut group = c.benchmark_group("submit_wait");

    for threads in [1, 2, 4].iter() {
        let config = Config::builder().num_threads(*threads).build().unwrap();
        let pool = ThreadPool::new(config).expect("Failed to create pool");

        for size in [100u64, 1_000, 10_000].iter() {
            group.bench_with_input(
                BenchmarkId::new(format!("{}-workers", threads), size),
                size,
                |b, &size| b.iter(|| submit_and_wait(&pool, black_box(size))),
            );
        }
    }

    group.finish();
}

fn bench_single_roundtrip(c: &mut Criterion) {
    let pool = ThreadPool::with_threads(2).expect("Failed to create pool");

    c.bench_function("single_roundtrip", |b| {
        b.iter(|| {
            let handle = pool.add_task(|| black_box(1));
            pool.wait_for_task(handle).unwrap_or_default()
        })
    });
}

criterion_group!(benches, bench_submit_wait, bench_single_roundtrip);
criterion_main!(benches);
