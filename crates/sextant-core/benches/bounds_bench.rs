// File: crates/sextant-core/benches/bounds_bench.rs
// Summary: Nice-bounds computation across axis lengths and value ranges.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, black_box};
use sextant_core::{compute_bounds, HighLow, NumericConfig};

fn bench_bounds(c: &mut Criterion) {
    let numeric = NumericConfig::default();
    let mut group = c.benchmark_group("compute_bounds");
    let ranges = [("unit", HighLow::new(0.0, 1.0)), ("wide", HighLow::new(-12_345.6, 98_765.4)), ("tiny", HighLow::new(1e-7, 3e-7))];
    for (name, high_low) in ranges {
        for &length in &[200.0f64, 2_000.0f64] {
            group.bench_with_input(BenchmarkId::from_parameter(format!("{name}_l{length}")), &length, |b, &l| {
                b.iter(|| black_box(compute_bounds(l, &high_low, 20.0, false, &numeric)));
            });
        }
    }
    group.finish();
}

criterion_group!(benches, bench_bounds);
criterion_main!(benches);
