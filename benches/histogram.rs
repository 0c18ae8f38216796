#[path = "../util/util.rs"]
mod util;

use util::benchmark_bitmaps;

use std::time::Duration;

use colortally::{Bitmap, Histogram, SamplingOptions};
use criterion::{
    criterion_group, criterion_main, measurement::WallTime, Bencher, BenchmarkId, Criterion,
    SamplingMode,
};

fn bench(c: &mut Criterion, group: &str, mut f: impl FnMut(&mut Bencher<WallTime>, &Bitmap)) {
    let mut group = c.benchmark_group(group);
    group
        .sample_size(30)
        .noise_threshold(0.05)
        .sampling_mode(SamplingMode::Flat)
        .warm_up_time(Duration::from_millis(500));

    for (name, bitmap) in benchmark_bitmaps() {
        group.bench_with_input(BenchmarkId::from_parameter(name), bitmap, &mut f);
    }
}

fn histogram_exact_single(c: &mut Criterion) {
    let options = SamplingOptions::new();
    bench(c, "histogram_exact_single", |b, bitmap| {
        b.iter(|| Histogram::new(bitmap, &options))
    });
}

fn histogram_coarse_single(c: &mut Criterion) {
    let options = SamplingOptions::coarse();
    bench(c, "histogram_coarse_single", |b, bitmap| {
        b.iter(|| Histogram::new(bitmap, &options))
    });
}

fn histogram_exact_par(c: &mut Criterion) {
    let options = SamplingOptions::new();
    bench(c, "histogram_exact_par", |b, bitmap| {
        b.iter(|| Histogram::new_par(bitmap, &options))
    });
}

fn histogram_coarse_par(c: &mut Criterion) {
    let options = SamplingOptions::coarse();
    bench(c, "histogram_coarse_par", |b, bitmap| {
        b.iter(|| Histogram::new_par(bitmap, &options))
    });
}

criterion_group!(
    benches,
    histogram_exact_single,
    histogram_coarse_single,
    histogram_exact_par,
    histogram_coarse_par,
);
criterion_main!(benches);
