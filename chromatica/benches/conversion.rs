//! Benchmark for frame conversion operations.

use criterion::{criterion_group, criterion_main, Criterion};

fn benchmarks(c: &mut Criterion) {
    chromatica::bench::conversion::benchmarks(c);
}

criterion_group!(benches, benchmarks);
criterion_main!(benches);
