//! Resolution of a block position into a block state.

use crate::BlockStateId;

use super::aquifer_sampler::{AquiferSampler, AquiferSamplerImpl, FluidSamplingContext};
use super::density_function::NoisePos;
use super::ore_sampler::OreVeinSampler;

/// One rule of the chain.
pub enum BlockStateSampler {
    /// Reads the final density and lets the aquifer fill open space.
    Aquifer(AquiferSampler),
    Ore(OreVeinSampler),
}

impl BlockStateSampler {
    pub fn sample(
        &mut self,
        ctx: &mut FluidSamplingContext<'_, '_>,
        pos: &impl NoisePos,
    ) -> Option<BlockStateId> {
        match self {
            Self::Aquifer(aquifer) => {
                let density = ctx.router.final_density(pos, ctx.sample_options);
                aquifer.compute_substance(ctx, pos, density)
            }
            Self::Ore(ore) => ore.sample(ctx.router, pos, ctx.sample_options),
        }
    }
}

/// Rules tried in order; the first `Some` wins.
pub struct ChainedBlockStateSampler {
    samplers: Box<[BlockStateSampler]>,
}

impl ChainedBlockStateSampler {
    #[must_use]
    pub fn new(samplers: Box<[BlockStateSampler]>) -> Self {
        Self { samplers }
    }

    #[must_use]
    pub fn aquifer_only(aquifer: AquiferSampler) -> Self {
        Self::new(Box::new([BlockStateSampler::Aquifer(aquifer)]))
    }

    #[must_use]
    pub fn with_ores(aquifer: AquiferSampler, ore: OreVeinSampler) -> Self {
        Self::new(Box::new([
            BlockStateSampler::Aquifer(aquifer),
            BlockStateSampler::Ore(ore),
        ]))
    }

    /// Block state at `pos`, or `None` for the default solid block.
    pub fn sample(
        &mut self,
        ctx: &mut FluidSamplingContext<'_, '_>,
        pos: &impl NoisePos,
    ) -> Option<BlockStateId> {
        self.samplers
            .iter_mut()
            .find_map(|sampler| sampler.sample(ctx, pos))
    }

    /// Whether the aquifer asked for a fluid tick at the last sampled block.
    #[must_use]
    pub fn should_schedule_fluid_update(&self) -> bool {
        self.samplers.iter().any(|sampler| match sampler {
            BlockStateSampler::Aquifer(aquifer) => aquifer.should_schedule_fluid_update(),
            BlockStateSampler::Ore(_) => false,
        })
    }
}
