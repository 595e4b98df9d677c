//! # List Benchmark
//!
//! Measures the cost of the snapshot-per-mutation contract:
//! 1. `push_back` with and without observers
//! 2. `node_at` walks at increasing depth
//! 3. Snapshot iteration vs. list length
//!
//! Run with: cargo bench --package strand_core --bench list_benchmark

#![allow(missing_docs)]

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use strand_core::ConcurrentList;

fn bench_push_back(c: &mut Criterion) {
    let mut group = c.benchmark_group("push_back");

    for len in [16_u64, 256, 4096] {
        group.throughput(Throughput::Elements(1));

        group.bench_with_input(BenchmarkId::new("no_observers", len), &len, |b, &len| {
            let list: ConcurrentList<u64> = (0..len).collect();
            b.iter(|| {
                let h = list.push_back(black_box(len));
                list.remove(h);
            });
        });

        group.bench_with_input(BenchmarkId::new("with_channel", len), &len, |b, &len| {
            let list: ConcurrentList<u64> = (0..len).collect();
            let rx = list.subscribe_channel();
            b.iter(|| {
                let h = list.push_back(black_box(len));
                list.remove(h);
                rx.try_iter().for_each(drop);
            });
        });
    }

    group.finish();
}

fn bench_node_at(c: &mut Criterion) {
    let mut group = c.benchmark_group("node_at");
    let list: ConcurrentList<u64> = (0..10_000).collect();

    for index in [0_usize, 100, 1_000, 9_999] {
        group.bench_with_input(BenchmarkId::from_parameter(index), &index, |b, &index| {
            b.iter(|| list.node_at(black_box(index)));
        });
    }

    group.finish();
}

fn bench_iterate(c: &mut Criterion) {
    let mut group = c.benchmark_group("iterate_snapshot");

    for len in [100_u64, 10_000] {
        let list: ConcurrentList<u64> = (0..len).collect();
        group.throughput(Throughput::Elements(len));
        group.bench_with_input(BenchmarkId::from_parameter(len), &len, |b, _| {
            b.iter(|| list.iter().sum::<u64>());
        });
    }

    group.finish();
}

criterion_group!(benches, bench_push_back, bench_node_at, bench_iterate);
criterion_main!(benches);
