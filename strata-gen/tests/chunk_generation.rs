//! End-to-end generation of overworld chunks.
//!
//! Generation is mostly compared against itself: the same seed must give the
//! same blocks byte for byte, and the single-column queries must agree with
//! the full chunk fill. The surface height at the seed 0 origin is pinned to
//! the value vanilla 1.18.2 generates there.

use std::sync::Arc;

use strata_gen::chunk::missing_bedrock::MissingBedrockBitset;
use strata_gen::chunk::section::Sections;
use strata_gen::surface::SurfaceContext;
use strata_gen::{
    Biome, BlockPos, ChunkPos, ChunkStatus, FixedBiomeSource, GeneratorSettings, HeightmapType,
    MultiNoiseBiomeSource, NoiseChunkGenerator, ProtoChunk, SurfaceSystem,
};
use strata_noise::BlockStateId;
use strata_noise::random::WorldgenRandomAlgorithm;

fn generator(seed: u64, biome: Biome) -> NoiseChunkGenerator {
    NoiseChunkGenerator::new(
        seed,
        GeneratorSettings::overworld(),
        Arc::new(FixedBiomeSource(biome)),
    )
    .expect("overworld settings are valid")
}

fn compute_block_hash(sections: &Sections) -> String {
    let mut ctx = md5::Context::new();
    for section in sections.sections.iter() {
        let section = section.read();
        if section.has_only_air() {
            ctx.consume([0u8]);
        } else {
            for state in section.states() {
                ctx.consume(state.0.to_be_bytes());
            }
        }
    }
    format!("{:x}", ctx.finalize())
}

fn blocks(chunk: &ProtoChunk) -> impl Iterator<Item = (BlockPos, BlockStateId)> + '_ {
    let (base_x, base_z) = (chunk.pos().min_block_x(), chunk.pos().min_block_z());
    (chunk.min_y()..chunk.max_y()).flat_map(move |y| {
        (0..16).flat_map(move |z| {
            (0..16).map(move |x| {
                let pos = BlockPos::new(base_x + x, y, base_z + z);
                (pos, chunk.get_block_state(pos))
            })
        })
    })
}

#[test]
fn clay_bands_are_reproducible() {
    let hash = |seed| {
        let system =
            SurfaceSystem::new(seed, WorldgenRandomAlgorithm::Xoroshiro, BlockStateId::STONE, 63);
        let mut ctx = md5::Context::new();
        for band in system.clay_bands() {
            ctx.consume(band.name().as_bytes());
        }
        format!("{:x}", ctx.finalize())
    };
    assert_eq!(hash(0), hash(0));
    assert_eq!(hash(42), hash(42));
    assert_ne!(hash(0), hash(42));
}

#[test]
fn noise_fill_matches_column_queries() {
    let generator = generator(0, Biome::Plains);
    let chunk = generator.create_proto_chunk(ChunkPos::new(0, 0));
    generator.create_biomes(&chunk).unwrap();
    generator.fill_from_noise(&chunk).unwrap();

    // Column (0, 0) is a river bed: stone up to y = 55, sea water 56..=62.
    assert_eq!(chunk.highest_taken(HeightmapType::WorldSurfaceWg, 0, 0), 62);

    for (x, z) in [(0, 0), (7, 3), (15, 15)] {
        let top = chunk.highest_taken(HeightmapType::WorldSurfaceWg, x, z);
        assert!((62..320).contains(&top), "column ({x}, {z}) tops out at {top}");
        assert_eq!(
            generator.base_height(x, z, HeightmapType::WorldSurfaceWg),
            top + 1,
            "column ({x}, {z})"
        );
        assert_eq!(
            generator.base_height(x, z, HeightmapType::OceanFloorWg),
            chunk.first_available(HeightmapType::OceanFloorWg, x, z),
            "column ({x}, {z})"
        );

        let column = generator.base_column(x, z);
        for y in chunk.min_y()..chunk.max_y() {
            assert_eq!(
                column.get_block(y),
                chunk.get_block_state(BlockPos::new(x, y, z)),
                "block ({x}, {y}, {z})"
            );
        }
    }
}

#[test]
fn generation_is_deterministic() {
    let first = generator(7, Biome::Plains).generate(ChunkPos::new(1, -2)).unwrap();
    let second = generator(7, Biome::Plains).generate(ChunkPos::new(1, -2)).unwrap();

    assert_eq!(compute_block_hash(first.sections()), compute_block_hash(second.sections()));
    assert_eq!(first.post_processing(), second.post_processing());
    for kind in HeightmapType::ALL {
        assert_eq!(first.heightmap_raw(kind), second.heightmap_raw(kind));
    }
    assert_eq!(first.status(), ChunkStatus::Carvers);

    let other_seed = generator(8, Biome::Plains).generate(ChunkPos::new(1, -2)).unwrap();
    assert_ne!(compute_block_hash(first.sections()), compute_block_hash(other_seed.sections()));
}

#[test]
fn scheduled_fluids_are_fluids() {
    let chunk = generator(3, Biome::Ocean).generate(ChunkPos::new(-4, 9)).unwrap();
    for pos in chunk.post_processing() {
        let state = chunk.get_block_state(pos);
        assert!(state.is_fluid(), "{pos:?} holds {}", state.name());
    }
}

#[test]
fn default_rule_lays_bedrock_and_deepslate() {
    let chunk = generator(0, Biome::Plains).generate(ChunkPos::new(2, 2)).unwrap();
    let min_y = chunk.min_y();

    for (pos, state) in blocks(&chunk) {
        if pos.y == min_y {
            assert_eq!(state, BlockStateId::BEDROCK, "{pos:?}");
        }
        if pos.y <= 0 {
            assert_ne!(state, BlockStateId::STONE, "{pos:?}");
        }
        if pos.y >= 8 {
            assert_ne!(state, BlockStateId::DEEPSLATE, "{pos:?}");
        }
        if pos.y > min_y + 4 {
            assert_ne!(state, BlockStateId::BEDROCK, "{pos:?}");
        }
    }
}

#[test]
fn custom_surface_rule_replaces_every_default_block() {
    let generator = generator(5, Biome::Forest)
        .with_surface_rule(|_: &mut SurfaceContext<'_, '_>| Some(BlockStateId::DIRT));
    let chunk = generator.generate(ChunkPos::new(0, 1)).unwrap();

    assert!(blocks(&chunk).all(|(_, state)| state != BlockStateId::STONE));
    assert!(blocks(&chunk).any(|(_, state)| state == BlockStateId::DIRT));
}

#[test]
fn multi_noise_biomes_fill_every_quart() {
    let generator = NoiseChunkGenerator::new(
        0,
        GeneratorSettings::overworld(),
        Arc::new(MultiNoiseBiomeSource::overworld()),
    )
    .unwrap();
    let chunk = generator.create_proto_chunk(ChunkPos::new(10, -3));
    generator.create_biomes(&chunk).unwrap();

    let again = generator.create_proto_chunk(ChunkPos::new(10, -3));
    generator.create_biomes(&again).unwrap();
    for y in (-64 >> 2)..(320 >> 2) {
        for x in 40..44 {
            for z in -12..-8 {
                assert_eq!(chunk.noise_biome(x, y, z), again.noise_biome(x, y, z));
            }
        }
    }
}

#[test]
fn stages_run_in_order() {
    let generator = generator(0, Biome::Plains);
    let chunk = generator.create_proto_chunk(ChunkPos::new(0, 0));

    assert!(generator.fill_from_noise(&chunk).is_err());
    assert!(generator.apply_carvers(&chunk).is_err());
    generator.create_biomes(&chunk).unwrap();
    assert!(generator.build_surface(&chunk).is_err());
    generator.fill_from_noise(&chunk).unwrap();
    assert!(generator.fill_from_noise(&chunk).is_err());
    generator.build_surface(&chunk).unwrap();
    generator.apply_carvers(&chunk).unwrap();
    assert_eq!(chunk.status(), ChunkStatus::Carvers);
}

#[test]
fn retrogen_keeps_old_biomes_and_clears_holes() {
    let generator = generator(0, Biome::Desert);
    let mut chunk = generator.create_proto_chunk(ChunkPos::new(0, 0));
    chunk.fill_biomes_from_noise(|_, y, _| if y < 0 { Biome::River } else { Biome::Forest });

    let mut holes = MissingBedrockBitset::default();
    holes.set_bedrock_hole(3, 5, true);
    chunk.set_below_zero_retrogen(Some(holes));

    generator.create_biomes(&chunk).unwrap();
    assert_eq!(chunk.noise_biome(0, -16, 0), Biome::Forest);
    assert_eq!(chunk.noise_biome(3, 40, 2), Biome::Forest);

    generator.fill_from_noise(&chunk).unwrap();
    for y in chunk.min_y()..chunk.max_y() {
        assert_eq!(chunk.get_block_state(BlockPos::new(3, y, 5)), BlockStateId::AIR);
    }
    assert_eq!(chunk.first_available(HeightmapType::WorldSurfaceWg, 3, 5), chunk.min_y());
    assert!(!chunk.get_block_state(BlockPos::new(4, -60, 5)).is_air());
}
