use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use aqalign::align::align;
use aqalign::combine::{median, subtract};
use aqalign::series::Series;

/// Synthetic sensor trace: a slow diurnal swing plus a plume spike.
fn synthetic_series(len: usize, rate: f64, phase: f64) -> Series {
    Series::from_pairs((0..len).map(|i| {
        let t = i as f64 * rate;
        let diurnal = 20.0 + 15.0 * (t / 720.0 + phase).sin();
        let plume = 80.0 * (-((t - 300.0) / 40.0).powi(2)).exp();
        (t, diurnal + plume)
    }))
}

fn bench_align(c: &mut Criterion) {
    let mut group = c.benchmark_group("align");

    for len in [100, 1_000, 5_000] {
        group.throughput(Throughput::Elements(len as u64));
        // Background sampled at a third of the near sensor's rate.
        let source = synthetic_series(len, 1.3, 0.0);
        let target = synthetic_series(len / 3 + 2, 4.0, 0.7);

        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{len}samples")),
            &len,
            |b, _| b.iter(|| align(black_box(&source), black_box(&target)).unwrap()),
        );
    }

    group.finish();
}

fn bench_background_correction(c: &mut Criterion) {
    let mut group = c.benchmark_group("background_correction");

    let near = synthetic_series(5_000, 1.3, 0.0);
    let background = synthetic_series(1_700, 4.0, 0.7);

    group.bench_function("align_and_subtract", |b| {
        b.iter(|| {
            let aligned = align(black_box(&near), black_box(&background)).unwrap();
            subtract(black_box(&near), &aligned)
        })
    });

    group.finish();
}

fn bench_median(c: &mut Criterion) {
    let mut group = c.benchmark_group("median");

    for count in [3, 6, 12] {
        let series: Vec<Series> = (0..count)
            .map(|i| synthetic_series(2_000, 1.0, i as f64 * 0.3))
            .collect();
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{count}sensors")),
            &count,
            |b, _| b.iter(|| median(black_box(&series)).unwrap()),
        );
    }

    group.finish();
}

criterion_group!(benches, bench_align, bench_background_correction, bench_median);
criterion_main!(benches);
