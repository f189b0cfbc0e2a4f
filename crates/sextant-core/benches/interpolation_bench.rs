// File: crates/sextant-core/benches/interpolation_bench.rs
// Summary: Path strategies over long series with periodic holes.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, black_box};
use sextant_core::{DataValue, Interpolation, PathPoint, SegmentData};

fn gen_points(n: usize) -> Vec<PathPoint> {
    (0..n)
        .map(|i| {
            let y = (i as f64 * 0.01).sin() * 10.0 + (i as f64 * 0.0001);
            // a gap every 500 points
            let coords = (i % 500 != 499).then_some((i as f64, y));
            let value = if coords.is_some() { DataValue::single(y) } else { DataValue::HOLE };
            PathPoint { coords, data: SegmentData { value, index: i, meta: None } }
        })
        .collect()
}

fn bench_interpolation(c: &mut Criterion) {
    let mut group = c.benchmark_group("interpolate");
    for &n in &[1_000usize, 10_000usize] {
        let points = gen_points(n);
        for strategy in [
            Interpolation::none(),
            Interpolation::simple(),
            Interpolation::step(),
            Interpolation::cardinal(),
            Interpolation::monotone(),
        ] {
            let id = format!("{}_n{n}", strategy.name());
            group.bench_with_input(BenchmarkId::from_parameter(id), &points, |b, pts| {
                b.iter(|| black_box(strategy.interpolate(pts).stringify(3)));
            });
        }
    }
    group.finish();
}

criterion_group!(benches, bench_interpolation);
criterion_main!(benches);
