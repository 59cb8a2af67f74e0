//! Chunk generation on top of `strata_noise`.
//!
//! A [`NoiseChunkGenerator`] walks a [`ProtoChunk`] through the terrain
//! stages in order: biomes, the noise fill, the surface and the (empty)
//! carver stage. Every stage is deterministic for a seed and chunk position.

pub mod biome;
pub mod chunk;
pub mod generator;
pub mod settings;
pub mod surface;

pub use biome::{Biome, BiomeSource, FixedBiomeSource, MultiNoiseBiomeSource};
pub use chunk::proto_chunk::ProtoChunk;
pub use chunk::{BlockPos, ChunkPos, ChunkStatus, HeightmapType};
pub use generator::{NoiseChunkGenerator, NoiseColumn};
pub use settings::GeneratorSettings;
pub use surface::{DefaultSurfaceRule, SurfaceRule, SurfaceSystem};
