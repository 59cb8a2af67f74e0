//! Seeded component stacks.
//!
//! The proto stage turns a seed-independent [`BaseNoiseFunctionComponent`]
//! stack into one where every noise-bearing component owns a sampler seeded
//! for one world, and every component knows its static value bounds. It is
//! built once per world and shared read-only by all chunk sessions.

use std::sync::Arc;

use enum_dispatch::enum_dispatch;

use super::base_noise_router::{
    BaseNoiseFunctionComponent, BaseNoiseRouter, BinaryOperation, LinearOperation, UnaryOperation,
};
use super::chunk_noise_router::{ChunkNoiseFunctionComponent, StaticChunkNoiseFunctionComponentImpl};
use crate::noise::{NoiseParameters, NormalNoise};
use crate::noise_router::chunk_density_function::SampleOptions;
use crate::noise_router::density_function::{
    Binary, BlendedNoiseSampler, Clamp, ClampedYGradient, Constant, IndexToNoisePos, Linear, Noise,
    NoiseFunctionComponentRange, NoisePos, PassThrough, RangeChoice, Shift, ShiftA, ShiftB,
    ShiftedNoise, Slide, StaticIndependentChunkNoiseFunctionComponentImpl, TerrainShaper,
    TerrainShaperSpline, Unary, WeirdScaled, Wrapper,
};
use crate::noise_router::settings::NoiseSettings;
use crate::random::{PositionalRandom, Random, RandomSplitter, WorldgenRandomAlgorithm};

/// Components that read nothing but the sampled position.
#[enum_dispatch(StaticIndependentChunkNoiseFunctionComponentImpl, NoiseFunctionComponentRange)]
#[derive(Clone, Debug)]
pub enum IndependentProtoNoiseFunctionComponent {
    Constant(Constant),
    ClampedYGradient(ClampedYGradient),
    Noise(Noise),
    ShiftA(ShiftA),
    ShiftB(ShiftB),
    Shift(Shift),
    BlendedNoise(BlendedNoiseSampler),
}

/// Components that read earlier entries of the stack.
#[enum_dispatch(StaticChunkNoiseFunctionComponentImpl, NoiseFunctionComponentRange)]
#[derive(Clone, Debug)]
pub enum DependentProtoNoiseFunctionComponent {
    Linear(Linear),
    Unary(Unary),
    Binary(Binary),
    Clamp(Clamp),
    RangeChoice(RangeChoice),
    ShiftedNoise(ShiftedNoise),
    WeirdScaled(WeirdScaled),
    Slide(Slide),
    TerrainShaperSpline(TerrainShaperSpline),
}

#[enum_dispatch(NoiseFunctionComponentRange)]
#[derive(Clone, Debug)]
pub enum ProtoNoiseFunctionComponent {
    Independent(IndependentProtoNoiseFunctionComponent),
    Dependent(DependentProtoNoiseFunctionComponent),
    /// Marks its input for a chunk-session cache or interpolator.
    Wrapper(Wrapper),
    PassThrough(PassThrough),
}

/// Everything needed to seed a component stack for one world.
#[derive(Clone, Debug)]
pub struct SeedContext {
    seed: u64,
    algorithm: WorldgenRandomAlgorithm,
    splitter: RandomSplitter,
    settings: NoiseSettings,
    shaper: Arc<TerrainShaper>,
}

impl SeedContext {
    #[must_use]
    pub fn new(seed: u64, algorithm: WorldgenRandomAlgorithm, settings: NoiseSettings) -> Self {
        Self {
            seed,
            algorithm,
            splitter: algorithm.new_instance(seed).next_positional(),
            settings,
            shaper: Arc::new(TerrainShaper::overworld()),
        }
    }

    #[inline]
    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.seed
    }

    #[inline]
    #[must_use]
    pub const fn settings(&self) -> &NoiseSettings {
        &self.settings
    }

    #[inline]
    #[must_use]
    pub const fn splitter(&self) -> &RandomSplitter {
        &self.splitter
    }

    #[inline]
    const fn legacy(&self) -> bool {
        self.algorithm.is_legacy()
    }

    fn seed_noise(&self, parameters: &NoiseParameters) -> NormalNoise {
        NormalNoise::instantiate(&self.splitter, parameters)
    }

    /// Legacy worlds never shifted their climate, so their shift noise is
    /// built with a single zero-amplitude octave.
    fn shift_noise(&self, parameters: &NoiseParameters) -> NormalNoise {
        if self.legacy() {
            let mut random = self.splitter.with_hash_of(NoiseParameters::SHIFT.id);
            NormalNoise::create_from_random(&mut random, 0, &[0.0])
        } else {
            self.seed_noise(parameters)
        }
    }

    fn shifted_noise(&self, parameters: &NoiseParameters) -> NormalNoise {
        if self.legacy() {
            let legacy_seed = if parameters.id == NoiseParameters::TEMPERATURE.id {
                Some(self.seed)
            } else if parameters.id == NoiseParameters::VEGETATION.id {
                Some(self.seed.wrapping_add(1))
            } else {
                None
            };
            if let Some(seed) = legacy_seed {
                let mut random = self.algorithm.new_instance(seed);
                return NormalNoise::create_legacy_nether_biome(&mut random, -7, &[1.0, 1.0]);
            }
        }
        self.seed_noise(parameters)
    }

    fn blended_noise(&self) -> BlendedNoiseSampler {
        let mut random = if self.legacy() {
            self.algorithm.new_instance(self.seed)
        } else {
            self.splitter.with_hash_of("minecraft:terrain")
        };
        BlendedNoiseSampler::new(
            &mut random,
            &self.settings.sampling,
            self.settings.cell_width(),
            self.settings.cell_height(),
        )
    }
}

fn independent(component: impl Into<IndependentProtoNoiseFunctionComponent>) -> ProtoNoiseFunctionComponent {
    ProtoNoiseFunctionComponent::Independent(component.into())
}

fn dependent(component: impl Into<DependentProtoNoiseFunctionComponent>) -> ProtoNoiseFunctionComponent {
    ProtoNoiseFunctionComponent::Dependent(component.into())
}

fn binary_bounds(operation: BinaryOperation, min1: f64, max1: f64, min2: f64, max2: f64) -> (f64, f64) {
    match operation {
        BinaryOperation::Add => (min1 + min2, max1 + max2),
        BinaryOperation::Min => (min1.min(min2), max1.min(max2)),
        BinaryOperation::Max => (min1.max(min2), max1.max(max2)),
        BinaryOperation::Mul => {
            let both_positive = min1 > 0.0 && min2 > 0.0;
            let both_negative = max1 < 0.0 && max2 < 0.0;
            let min = if both_positive {
                min1 * min2
            } else if both_negative {
                max1 * max2
            } else {
                (min1 * max2).min(max1 * min2)
            };
            let max = if both_positive {
                max1 * max2
            } else if both_negative {
                min1 * min2
            } else {
                (min1 * min2).max(max1 * max2)
            };
            (min, max)
        }
    }
}

/// Seeds one base component. `stack` holds the already converted entries
/// the component may refer to.
///
/// Components without noise or settings pass through with only their
/// bounds computed.
#[allow(clippy::too_many_lines)]
#[must_use]
pub fn reseed(
    component: &BaseNoiseFunctionComponent,
    seed_context: &SeedContext,
    stack: &[ProtoNoiseFunctionComponent],
) -> ProtoNoiseFunctionComponent {
    match *component {
        BaseNoiseFunctionComponent::Constant { value } => independent(Constant::new(value)),
        BaseNoiseFunctionComponent::BlendAlpha => independent(Constant::new(1.0)),
        BaseNoiseFunctionComponent::BlendOffset | BaseNoiseFunctionComponent::Beardifier => {
            independent(Constant::new(0.0))
        }
        BaseNoiseFunctionComponent::BlendDensity { input_index } => ProtoNoiseFunctionComponent::PassThrough(
            PassThrough::new(input_index, f64::NEG_INFINITY, f64::INFINITY),
        ),
        BaseNoiseFunctionComponent::ClampedYGradient { data } => {
            independent(ClampedYGradient::new(data))
        }
        BaseNoiseFunctionComponent::Noise { data } => {
            independent(Noise::new(seed_context.seed_noise(data.noise), data))
        }
        BaseNoiseFunctionComponent::ShiftA { noise } => {
            independent(ShiftA::new(seed_context.shift_noise(noise)))
        }
        BaseNoiseFunctionComponent::ShiftB { noise } => {
            independent(ShiftB::new(seed_context.shift_noise(noise)))
        }
        BaseNoiseFunctionComponent::Shift { noise } => {
            independent(Shift::new(seed_context.shift_noise(noise)))
        }
        BaseNoiseFunctionComponent::BlendedNoise => independent(seed_context.blended_noise()),
        BaseNoiseFunctionComponent::ShiftedNoise {
            shift_x_index,
            shift_y_index,
            shift_z_index,
            data,
        } => dependent(ShiftedNoise::new(
            shift_x_index,
            shift_y_index,
            shift_z_index,
            seed_context.shifted_noise(data.noise),
            data,
        )),
        BaseNoiseFunctionComponent::WeirdScaled { input_index, data } => dependent(WeirdScaled::new(
            input_index,
            seed_context.seed_noise(data.noise),
            data.mapper,
        )),
        BaseNoiseFunctionComponent::TerrainShaperSpline {
            continents_index,
            erosion_index,
            weirdness_index,
            data,
        } => dependent(TerrainShaperSpline::new(
            continents_index,
            erosion_index,
            weirdness_index,
            Arc::clone(&seed_context.shaper),
            data,
        )),
        BaseNoiseFunctionComponent::Slide { input_index } => {
            let input = &stack[input_index];
            dependent(Slide::new(
                input_index,
                seed_context.settings,
                input.min(),
                input.max(),
            ))
        }
        BaseNoiseFunctionComponent::Wrapper {
            input_index,
            wrapper,
        } => {
            let input = &stack[input_index];
            ProtoNoiseFunctionComponent::Wrapper(Wrapper::new(
                input_index,
                wrapper,
                input.min(),
                input.max(),
            ))
        }
        BaseNoiseFunctionComponent::Linear { input_index, data } => {
            let input = &stack[input_index];
            let (min, max) = match data.operation {
                LinearOperation::Add => (input.min() + data.argument, input.max() + data.argument),
                LinearOperation::Mul if data.argument >= 0.0 => {
                    (input.min() * data.argument, input.max() * data.argument)
                }
                LinearOperation::Mul => (input.max() * data.argument, input.min() * data.argument),
            };
            dependent(Linear::new(input_index, min, max, data))
        }
        BaseNoiseFunctionComponent::Unary { input_index, data } => {
            let input = &stack[input_index];
            let at_min = data.apply_density(input.min());
            let at_max = data.apply_density(input.max());
            let (min, max) = match data.operation {
                // Only the lower bound is clamped at zero, so a strictly
                // positive squared input keeps its unsquared minimum.
                UnaryOperation::Abs | UnaryOperation::Square => {
                    (input.min().max(0.0), at_min.max(at_max))
                }
                UnaryOperation::Cube
                | UnaryOperation::HalfNegative
                | UnaryOperation::QuarterNegative
                | UnaryOperation::Squeeze => (at_min, at_max),
            };
            dependent(Unary::new(input_index, min, max, data))
        }
        BaseNoiseFunctionComponent::Binary {
            argument1_index,
            argument2_index,
            data,
        } => {
            let argument1 = &stack[argument1_index];
            let argument2 = &stack[argument2_index];
            let (min1, max1) = (argument1.min(), argument1.max());
            let (min2, max2) = (argument2.min(), argument2.max());
            if matches!(data.operation, BinaryOperation::Min | BinaryOperation::Max)
                && (min1 >= max2 || min2 >= max1)
            {
                log::warn!(
                    "creating a {:?} function between two non-overlapping inputs: [{min1}, {max1}] and [{min2}, {max2}]",
                    data.operation
                );
            }
            let (min, max) = binary_bounds(data.operation, min1, max1, min2, max2);
            dependent(Binary::new(argument1_index, argument2_index, min, max, data))
        }
        BaseNoiseFunctionComponent::Clamp { input_index, data } => {
            dependent(Clamp::new(input_index, data))
        }
        BaseNoiseFunctionComponent::RangeChoice {
            input_index,
            when_in_range_index,
            when_out_range_index,
            data,
        } => {
            let when_in = &stack[when_in_range_index];
            let when_out = &stack[when_out_range_index];
            dependent(RangeChoice::new(
                input_index,
                when_in_range_index,
                when_out_range_index,
                when_in.min().min(when_out.min()),
                when_in.max().max(when_out.max()),
                data,
            ))
        }
    }
}

/// Seeds a whole base stack, entry for entry.
#[must_use]
pub fn generate_proto_stack(
    base_stack: &[BaseNoiseFunctionComponent],
    seed_context: &SeedContext,
) -> Box<[ProtoNoiseFunctionComponent]> {
    let mut stack = Vec::<ProtoNoiseFunctionComponent>::with_capacity(base_stack.len());
    for component in base_stack {
        let converted = reseed(component, seed_context, &stack);
        stack.push(converted);
    }
    stack.into_boxed_slice()
}

/// A seeded overworld router: the component stack, the indices of its named
/// outputs, and the positional factories of the aquifer and ore veins.
#[derive(Clone, Debug)]
pub struct ProtoNoiseRouter {
    pub full_component_stack: Box<[ProtoNoiseFunctionComponent]>,
    pub barrier_noise: usize,
    pub fluid_level_floodedness_noise: usize,
    pub fluid_level_spread_noise: usize,
    pub lava_noise: usize,
    pub temperature: usize,
    pub vegetation: usize,
    pub continents: usize,
    pub erosion: usize,
    pub depth: usize,
    pub ridges: usize,
    pub initial_density_without_jaggedness: usize,
    pub final_density: usize,
    pub vein_toggle: usize,
    pub vein_ridged: usize,
    pub vein_gap: usize,
    pub aquifer_random: RandomSplitter,
    pub ore_random: RandomSplitter,
    pub settings: NoiseSettings,
}

impl ProtoNoiseRouter {
    #[must_use]
    pub fn generate(base: &BaseNoiseRouter, seed_context: &SeedContext) -> Self {
        let full_component_stack = generate_proto_stack(&base.full_component_stack, seed_context);
        let splitter = seed_context.splitter();
        log::debug!(
            "seeded {} density components for seed {}",
            full_component_stack.len(),
            seed_context.seed()
        );

        Self {
            full_component_stack,
            barrier_noise: base.barrier_noise,
            fluid_level_floodedness_noise: base.fluid_level_floodedness_noise,
            fluid_level_spread_noise: base.fluid_level_spread_noise,
            lava_noise: base.lava_noise,
            temperature: base.temperature,
            vegetation: base.vegetation,
            continents: base.continents,
            erosion: base.erosion,
            depth: base.depth,
            ridges: base.ridges,
            initial_density_without_jaggedness: base.initial_density_without_jaggedness,
            final_density: base.final_density,
            vein_toggle: base.vein_toggle,
            vein_ridged: base.vein_ridged,
            vein_gap: base.vein_gap,
            aquifer_random: splitter.with_hash_of("minecraft:aquifer").next_positional(),
            ore_random: splitter.with_hash_of("minecraft:ore").next_positional(),
            settings: *seed_context.settings(),
        }
    }
}

impl ProtoNoiseFunctionComponent {
    /// Samples an independent component at a plain position, outside any
    /// chunk session. Returns `None` for components that read the stack.
    #[must_use]
    pub fn sample_independent(&self, pos: &impl NoisePos) -> Option<f64> {
        match self {
            Self::Independent(component) => Some(component.sample(pos)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::noise_router::component::base_noise_router::DensityFunctionBuilder;
    use crate::noise_router::density_function::UnblendedNoisePos;

    fn context(seed: u64) -> SeedContext {
        SeedContext::new(seed, WorldgenRandomAlgorithm::Xoroshiro, NoiseSettings::overworld())
    }

    #[test]
    fn test_mul_bounds_cover_sign_combinations() {
        assert_eq!(binary_bounds(BinaryOperation::Mul, 1.0, 2.0, 3.0, 4.0), (3.0, 8.0));
        assert_eq!(binary_bounds(BinaryOperation::Mul, -2.0, -1.0, -4.0, -3.0), (3.0, 8.0));
        assert_eq!(binary_bounds(BinaryOperation::Mul, -1.0, 2.0, -3.0, 4.0), (-6.0, 8.0));
    }

    #[test]
    fn test_linear_mul_by_negative_swaps_bounds() {
        let mut builder = DensityFunctionBuilder::new();
        let gradient = builder.y_clamped_gradient(0, 10, -1.0, 3.0);
        let factor = builder.constant(-2.0);
        let scaled = builder.mul(gradient, factor);
        let stack = generate_proto_stack(&builder.build(), &context(0));
        let component = &stack[scaled.index()];
        assert_eq!((component.min(), component.max()), (-6.0, 2.0));
    }

    #[test]
    fn test_abs_bounds_clamp_only_the_minimum() {
        let mut builder = DensityFunctionBuilder::new();
        let gradient = builder.y_clamped_gradient(0, 10, 2.0, 3.0);
        let squared = builder.square(gradient);
        let stack = generate_proto_stack(&builder.build(), &context(0));
        let component = &stack[squared.index()];
        assert_eq!((component.min(), component.max()), (2.0, 9.0));
    }

    #[test]
    fn test_blend_density_is_unbounded() {
        let mut builder = DensityFunctionBuilder::new();
        let one = builder.constant(1.0);
        let blended = builder.blend_density(one);
        let stack = generate_proto_stack(&builder.build(), &context(0));
        let component = &stack[blended.index()];
        assert_eq!(component.min(), f64::NEG_INFINITY);
        assert_eq!(component.max(), f64::INFINITY);
    }

    #[test]
    fn test_same_seed_gives_same_noise() {
        let mut builder = DensityFunctionBuilder::new();
        let noise = builder.noise(&NoiseParameters::CONTINENTALNESS, 0.25, 0.0);
        let base = builder.build();
        let a = generate_proto_stack(&base, &context(42));
        let b = generate_proto_stack(&base, &context(42));
        let c = generate_proto_stack(&base, &context(43));
        let pos = UnblendedNoisePos::new(1000, 0, -300);
        let sample = |stack: &[ProtoNoiseFunctionComponent]| {
            stack[noise.index()].sample_independent(&pos).unwrap_or(f64::NAN)
        };
        assert_eq!(sample(&a).to_bits(), sample(&b).to_bits());
        assert_ne!(sample(&a).to_bits(), sample(&c).to_bits());
    }

    #[test]
    fn test_legacy_shift_noise_is_flat() {
        let legacy = SeedContext::new(7, WorldgenRandomAlgorithm::Legacy, NoiseSettings::overworld());
        let mut builder = DensityFunctionBuilder::new();
        let shift = builder.shift_a(&NoiseParameters::SHIFT);
        let stack = generate_proto_stack(&builder.build(), &legacy);
        let value = stack[shift.index()].sample_independent(&UnblendedNoisePos::new(123, 0, 456));
        assert_eq!(value, Some(0.0));
    }
}
