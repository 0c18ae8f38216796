#[path = "../util/util.rs"]
mod util;

use util::benchmark_bitmaps;

use std::time::Duration;

use colortally::{Histogram, PaletteSize, RankedPalette, SamplingOptions};
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, SamplingMode};

fn rank(c: &mut Criterion) {
    let mut group = c.benchmark_group("rank");
    group
        .sample_size(30)
        .noise_threshold(0.05)
        .sampling_mode(SamplingMode::Flat)
        .warm_up_time(Duration::from_millis(500));

    for (name, bitmap) in benchmark_bitmaps() {
        let histogram = Histogram::new(bitmap, &SamplingOptions::new());
        for k in [PaletteSize::DOMINANT, PaletteSize::PALETTE, PaletteSize::from(256u16)] {
            group.bench_with_input(
                BenchmarkId::new(format!("k{k}"), name),
                &histogram,
                |b, histogram| b.iter(|| RankedPalette::from_histogram(histogram, k)),
            );
        }
    }
}

criterion_group!(benches, rank);
criterion_main!(benches);
