#![allow(missing_docs)]
use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use strata_noise::BlockStateId;
use strata_noise::noise_router::overworld::overworld_router;
use strata_noise::noise_router::{
    ChunkNoiseFunctionBuilderOptions, ChunkNoiseGenerator, ChunkNoiseRouter, FluidPicker,
    NoiseFillConfig, NoiseSettings, ProtoNoiseRouter, SampleOptions, SeedContext,
    UnblendedNoisePos,
};
use strata_noise::random::WorldgenRandomAlgorithm;

const SEED: u64 = 12345;

fn seed_context() -> SeedContext {
    SeedContext::new(
        SEED,
        WorldgenRandomAlgorithm::Xoroshiro,
        NoiseSettings::overworld(),
    )
}

fn chunk_options() -> ChunkNoiseFunctionBuilderOptions {
    ChunkNoiseFunctionBuilderOptions::new(4, 8, 48, 4, 0, 0, 4)
}

fn bench_proto_router_generation(c: &mut Criterion) {
    let base = overworld_router();
    let context = seed_context();
    c.bench_function("proto_noise_router_generation", |b| {
        b.iter(|| black_box(ProtoNoiseRouter::generate(black_box(&base), &context)));
    });
}

fn bench_chunk_router_generation(c: &mut Criterion) {
    let proto = ProtoNoiseRouter::generate(&overworld_router(), &seed_context());
    let options = chunk_options();
    c.bench_function("chunk_noise_router_generation", |b| {
        b.iter(|| black_box(ChunkNoiseRouter::generate(black_box(&proto), &options)));
    });
}

fn bench_density_sample_single(c: &mut Criterion) {
    let proto = ProtoNoiseRouter::generate(&overworld_router(), &seed_context());
    let mut router = ChunkNoiseRouter::generate(&proto, &chunk_options());
    let options = SampleOptions::foreign();
    let pos = UnblendedNoisePos::new(8, 64, 8);
    c.bench_function("density_sample_single", |b| {
        b.iter(|| black_box(router.final_density(black_box(&pos), &options)));
    });
}

/// The full interpolated sweep of one chunk, block states included.
fn bench_chunk_sweep(c: &mut Criterion) {
    let proto = ProtoNoiseRouter::generate(&overworld_router(), &seed_context());
    let config = NoiseFillConfig {
        picker: FluidPicker::new(63, BlockStateId::WATER),
        aquifers_enabled: true,
        ore_veins_enabled: true,
    };
    let settings = proto.settings;
    let (width, height) = (settings.cell_width(), settings.cell_height());

    c.bench_function("chunk_noise_sweep", |b| {
        b.iter(|| {
            let mut generator = ChunkNoiseGenerator::for_chunk(&proto, 0, 0, &config);
            let cells = generator.cell_count_xz();
            let mut solid = 0_usize;

            generator.initialize_first_cell_x();
            for cell_x in 0..cells {
                generator.advance_cell_x(cell_x);
                for cell_z in 0..cells {
                    for cell_y in (0..settings.cell_count_y() as usize).rev() {
                        generator.select_cell_yz(cell_y, cell_z);
                        let start_y = (cell_y as i32 + settings.min_cell_y()) * height;
                        for in_y in (0..height).rev() {
                            generator.update_for_y(start_y + in_y, f64::from(in_y) / f64::from(height));
                            for in_x in 0..width {
                                let x = cell_x as i32 * width + in_x;
                                generator.update_for_x(x, f64::from(in_x) / f64::from(width));
                                for in_z in 0..width {
                                    let z = cell_z as i32 * width + in_z;
                                    generator.update_for_z(z, f64::from(in_z) / f64::from(width));
                                    if generator.sample_block_state().is_none() {
                                        solid += 1;
                                    }
                                }
                            }
                        }
                    }
                }
                generator.swap_slices();
            }
            generator.stop_interpolation();
            black_box(solid)
        });
    });
}

criterion_group!(
    benches,
    bench_proto_router_generation,
    bench_chunk_router_generation,
    bench_density_sample_single,
    bench_chunk_sweep
);
criterion_main!(benches);
