//! Density-function router for overworld terrain.
//!
//! The router is built in three stages:
//!
//! 1. [`component::base_noise_router`]: a seed-independent stack of
//!    components assembled by [`DensityFunctionBuilder`] and
//!    [`overworld::overworld_router`].
//! 2. [`component::proto_noise_router`]: the same stack with every noise
//!    instantiated for a world seed and static bounds computed.
//! 3. [`component::chunk_noise_router`]: a per-chunk session where wrappers
//!    become caches and interpolators.
//!
//! [`chunk_noise_generator::ChunkNoiseGenerator`] drives the session sweep and
//! resolves densities into block states through the aquifer and ore samplers.

pub mod aquifer_sampler;
pub mod block_sampler;
pub mod chunk_density_function;
pub mod chunk_noise_generator;
pub mod component;
pub mod density_function;
pub mod fluid_level;
pub mod ore_sampler;
pub mod overworld;
pub mod settings;
pub mod surface_height_sampler;

pub use aquifer_sampler::{
    AquiferSampler, AquiferSamplerImpl, FluidSamplingContext, SeaLevelAquiferSampler,
    WorldAquiferSampler,
};
pub use block_sampler::{BlockStateSampler, ChainedBlockStateSampler};
pub use chunk_density_function::{
    CellCursor, ChunkNoiseFunctionBuilderOptions, Generation, SampleContext, SampleOptions,
};
pub use chunk_noise_generator::{ChunkNoiseGenerator, ClimateSample, NoiseFillConfig};
pub use component::base_noise_router::{
    BaseNoiseFunctionComponent, BaseNoiseRouter, DensityFunctionBuilder, DensityHandle,
};
pub use component::chunk_noise_router::ChunkNoiseRouter;
pub use component::proto_noise_router::{ProtoNoiseRouter, SeedContext};
pub use density_function::{
    IndexToNoisePos, NoiseFunctionComponentRange, NoisePos, UnblendedNoisePos,
};
pub use fluid_level::{FluidLevel, FluidPicker};
pub use ore_sampler::{OreVeinSampler, VeinType};
pub use settings::{NoiseSamplingSettings, NoiseSettings, SlideSettings};
pub use surface_height_sampler::SurfaceHeightEstimator;
