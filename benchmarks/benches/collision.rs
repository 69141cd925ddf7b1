//! Collision engine benchmarks (criterion - wall-clock time).
//!
//! Run all:    cargo bench --manifest-path benchmarks/Cargo.toml --bench collision
//! Filter:     cargo bench --manifest-path benchmarks/Cargo.toml --bench collision -- resolve

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use entities2d::physics::collision;
use entities2d_bench::*;

// ---------------------------------------------------------------------------
// Detection
// ---------------------------------------------------------------------------

fn bench_collide(c: &mut Criterion) {
    let mut group = c.benchmark_group("collide");
    for (name, a, b) in shape_pairs() {
        group.bench_function(name, |bench| {
            bench.iter(|| collision::collide(black_box(&a), black_box(&b)));
        });
    }
    group.finish();
}

// ---------------------------------------------------------------------------
// Resolution
// ---------------------------------------------------------------------------

fn bench_resolve(c: &mut Criterion) {
    let mut group = c.benchmark_group("resolve");
    for (name, a, b) in shape_pairs() {
        group.bench_function(name, |bench| {
            bench.iter_batched(
                || (a, b),
                |(mut a, mut b)| collision::resolve_collision(&mut a, false, &mut b, false),
                criterion::BatchSize::SmallInput,
            );
        });
    }
    group.finish();
}

// ---------------------------------------------------------------------------
// Containment
// ---------------------------------------------------------------------------

fn bench_inside(c: &mut Criterion) {
    let mut group = c.benchmark_group("inside");
    for (name, a, b) in shape_pairs() {
        group.bench_function(name, |bench| {
            bench.iter(|| collision::is_inside(black_box(&a), black_box(&b)));
        });
    }
    group.finish();
}

// ---------------------------------------------------------------------------
// Pool against pool
// ---------------------------------------------------------------------------

fn bench_pool_resolution(c: &mut Criterion) {
    let mut group = c.benchmark_group("resolve/pools");
    group.sample_size(30);
    for &n in &[50, 100, 500] {
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |bench, &n| {
            bench.iter_batched(
                || (setup_pool("movers", n, 1).0, setup_pool("fixed", n, 2).0),
                |(mut movers, mut fixed)| resolve_all(&mut movers, &mut fixed),
                criterion::BatchSize::LargeInput,
            );
        });
    }
    group.finish();
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

criterion_group!(
    benches,
    bench_collide,
    bench_resolve,
    bench_inside,
    bench_pool_resolution,
);
criterion_main!(benches);
