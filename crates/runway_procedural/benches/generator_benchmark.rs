//! Benchmark for track generation throughput.
//!
//! TARGET: a generation tick well under 50µs so it never shows in a frame
//!
//! Run with: cargo bench --package runway_procedural --bench generator_benchmark

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use runway_content::ContentLibrary;
use runway_procedural::{
    Channel, GeneratorConfig, SegmentPlacement, TrackGenerator, TrackHost, TrackSeed,
};

const CITY: &str = include_str!("../../../data/content/city.toml");

/// Host that only counts requests, like a pooled spawner would.
#[derive(Default)]
struct CountingHost {
    segments: u64,
    gaps: u64,
}

impl TrackHost for CountingHost {
    fn place_segment(&mut self, placement: &SegmentPlacement<'_>) -> u32 {
        self.segments += 1;
        placement.variant.cells
    }

    fn place_empty(&mut self, _channel: Channel, _position: f32, _cells_before: u32) {
        self.gaps += 1;
    }
}

fn city_generator() -> TrackGenerator {
    let library = ContentLibrary::load_toml_str(CITY).unwrap();
    TrackGenerator::new(library, GeneratorConfig::default(), TrackSeed::new(42)).unwrap()
}

fn benchmark_single_tick(c: &mut Criterion) {
    let mut generator = city_generator();
    let mut host = CountingHost::default();

    c.bench_function("advance_one_tick", |b| {
        b.iter(|| {
            generator.advance(black_box(10.0), 0.5, &mut host);
        });
    });
}

fn benchmark_long_run(c: &mut Criterion) {
    let mut group = c.benchmark_group("endless_run");
    group.sample_size(20);

    // 10,000 ticks at 10 units = 25,000 cells of track
    group.throughput(Throughput::Elements(10_000));
    group.bench_function("10k_ticks", |b| {
        b.iter(|| {
            let mut generator = city_generator();
            let mut host = CountingHost::default();
            for tick in 0..10_000u32 {
                let progress = tick as f32 / 10_000.0;
                generator.advance(10.0, progress, &mut host);
            }
            black_box(host.segments + host.gaps)
        });
    });

    group.finish();
}

fn benchmark_content_load(c: &mut Criterion) {
    c.bench_function("content_load_and_validate", |b| {
        b.iter(|| black_box(ContentLibrary::load_toml_str(black_box(CITY)).unwrap()));
    });
}

criterion_group! {
    name = benches;
    config = Criterion::default();
    targets = benchmark_single_tick,
              benchmark_long_run,
              benchmark_content_load
}

criterion_main!(benches);
