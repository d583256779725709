//! Basic benchmarks for the `object_pool` package.

#![allow(
    missing_docs,
    reason = "No need for API documentation in benchmark code"
)]

use std::hint::black_box;
use std::sync::Barrier;
use std::thread;

use criterion::{Criterion, criterion_group, criterion_main};
use object_pool::ObjectPool;

criterion_group!(benches, entrypoint);
criterion_main!(benches);

type TestItem = Vec<u8>;
const TEST_ITEM_SIZE: usize = 4096;

fn factory() -> TestItem {
    vec![0; TEST_ITEM_SIZE]
}

fn entrypoint(c: &mut Criterion) {
    let mut group = c.benchmark_group("op_cycle");

    group.bench_function("warm_acquire_release", |b| {
        let pool = ObjectPool::new(factory);
        pool.prefill(1).unwrap();

        b.iter(|| {
            let object = pool.acquire().unwrap();
            pool.release(black_box(object)).unwrap();
        });
    });

    group.bench_function("warm_acquire_drop", |b| {
        let pool = ObjectPool::new(factory);
        pool.prefill(1).unwrap();

        b.iter(|| {
            drop(black_box(pool.acquire().unwrap()));
        });
    });

    group.bench_function("cold_acquire", |b| {
        b.iter(|| {
            let pool = ObjectPool::new(factory);
            black_box(pool.acquire().unwrap())
        });
    });

    group.bench_function("std_allocate", |b| {
        b.iter(|| black_box(factory()));
    });

    group.finish();

    let mut contended = c.benchmark_group("op_contended");

    contended.bench_function("four_threads_hundred_cycles", |b| {
        const THREADS: usize = 4;
        const CYCLES: usize = 100;

        let pool = ObjectPool::new(factory);
        pool.prefill(THREADS).unwrap();

        b.iter(|| {
            let barrier = Barrier::new(THREADS);

            thread::scope(|s| {
                for _ in 0..THREADS {
                    s.spawn(|| {
                        barrier.wait();

                        for _ in 0..CYCLES {
                            let object = pool.acquire().unwrap();
                            pool.release(black_box(object)).unwrap();
                        }
                    });
                }
            });
        });
    });

    contended.finish();
}
