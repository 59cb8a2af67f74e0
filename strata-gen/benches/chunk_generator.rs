#![allow(missing_docs)]
//! Benchmarks for chunk generation.

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use std::sync::Arc;

use strata_gen::{
    ChunkPos, GeneratorSettings, HeightmapType, MultiNoiseBiomeSource, NoiseChunkGenerator,
};

const SEED: u64 = 12345;

fn create_generator() -> NoiseChunkGenerator {
    NoiseChunkGenerator::new(
        SEED,
        GeneratorSettings::overworld(),
        Arc::new(MultiNoiseBiomeSource::overworld()),
    )
    .expect("overworld settings are valid")
}

fn bench_fill_chunk(c: &mut Criterion) {
    let generator = create_generator();
    let mut group = c.benchmark_group("fill_from_noise");

    // Positions spread out to see the variance between terrain types
    for (x, z) in [(0, 0), (100, 100), (1000, 1000)] {
        group.bench_with_input(
            BenchmarkId::new("chunk", format!("({x},{z})")),
            &(x, z),
            |b, &(x, z)| {
                b.iter(|| {
                    let chunk = generator.create_proto_chunk(ChunkPos::new(x, z));
                    generator.create_biomes(&chunk).expect("fresh chunk");
                    generator.fill_from_noise(black_box(&chunk)).expect("biomes done");
                    black_box(chunk);
                });
            },
        );
    }

    group.finish();
}

fn bench_full_generation(c: &mut Criterion) {
    let generator = create_generator();
    c.bench_function("generate_chunk", |b| {
        b.iter(|| black_box(generator.generate(black_box(ChunkPos::new(3, -7)))));
    });
}

fn bench_generator_creation(c: &mut Criterion) {
    c.bench_function("generator_creation", |b| {
        b.iter(|| black_box(create_generator()));
    });
}

fn bench_base_height(c: &mut Criterion) {
    let generator = create_generator();
    c.bench_function("base_height", |b| {
        b.iter(|| {
            black_box(generator.base_height(
                black_box(117),
                black_box(-42),
                HeightmapType::WorldSurfaceWg,
            ))
        });
    });
}

fn bench_multiple_chunks(c: &mut Criterion) {
    let generator = create_generator();
    let mut group = c.benchmark_group("multiple_chunks");

    for count in [4, 9, 16] {
        group.bench_with_input(BenchmarkId::new("adjacent", count), &count, |b, &count| {
            let side = f64::from(count).sqrt() as i32;
            b.iter(|| {
                for x in 0..side {
                    for z in 0..side {
                        black_box(generator.generate(ChunkPos::new(x, z)).expect("generation"));
                    }
                }
            });
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_fill_chunk,
    bench_full_generation,
    bench_generator_creation,
    bench_base_height,
    bench_multiple_chunks,
);
criterion_main!(benches);
