//! Seed-independent density-function stacks.
//!
//! A stack is a flat list of components where every component only refers to
//! entries before it. [`DensityFunctionBuilder`] appends components and hands
//! back [`DensityHandle`]s, so a sub-graph used in several places is one entry
//! that every user points at.

use rustc_hash::FxHashMap;

use crate::noise::NoiseParameters;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NoiseData {
    pub noise: &'static NoiseParameters,
    pub xz_scale: f64,
    pub y_scale: f64,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ShiftedNoiseData {
    pub noise: &'static NoiseParameters,
    pub xz_scale: f64,
    pub y_scale: f64,
}

/// Maps a rarity input to the coordinate divisor of a weird-scaled sampler.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RarityValueMapper {
    /// Three-dimensional spaghetti caves.
    Type1,
    /// Two-dimensional spaghetti caves.
    Type2,
}

impl RarityValueMapper {
    #[inline]
    #[must_use]
    pub const fn max_rarity(self) -> f64 {
        match self {
            Self::Type1 => 2.0,
            Self::Type2 => 3.0,
        }
    }

    #[inline]
    #[must_use]
    pub fn map(self, value: f64) -> f64 {
        match self {
            Self::Type1 => {
                if value < -0.5 {
                    0.75
                } else if value < 0.0 {
                    1.0
                } else if value < 0.5 {
                    1.5
                } else {
                    2.0
                }
            }
            Self::Type2 => {
                if value < -0.75 {
                    0.5
                } else if value < -0.5 {
                    0.75
                } else if value < 0.5 {
                    1.0
                } else if value < 0.75 {
                    2.0
                } else {
                    3.0
                }
            }
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WeirdScaledData {
    pub noise: &'static NoiseParameters,
    pub mapper: RarityValueMapper,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ClampedYGradientData {
    pub from_y: f64,
    pub to_y: f64,
    pub from_value: f64,
    pub to_value: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BinaryOperation {
    Add,
    Mul,
    Min,
    Max,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BinaryData {
    pub operation: BinaryOperation,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LinearOperation {
    Add,
    Mul,
}

/// A binary operation where one side is a constant.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LinearData {
    pub operation: LinearOperation,
    pub argument: f64,
}

impl LinearData {
    #[inline]
    #[must_use]
    pub fn apply_density(&self, density: f64) -> f64 {
        match self.operation {
            LinearOperation::Add => density + self.argument,
            LinearOperation::Mul => density * self.argument,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UnaryOperation {
    Abs,
    Square,
    Cube,
    HalfNegative,
    QuarterNegative,
    Squeeze,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct UnaryData {
    pub operation: UnaryOperation,
}

impl UnaryData {
    #[inline]
    #[must_use]
    pub fn apply_density(&self, density: f64) -> f64 {
        match self.operation {
            UnaryOperation::Abs => density.abs(),
            UnaryOperation::Square => density * density,
            UnaryOperation::Cube => density * density * density,
            UnaryOperation::HalfNegative => {
                if density > 0.0 {
                    density
                } else {
                    density * 0.5
                }
            }
            UnaryOperation::QuarterNegative => {
                if density > 0.0 {
                    density
                } else {
                    density * 0.25
                }
            }
            UnaryOperation::Squeeze => {
                let clamped = density.clamp(-1.0, 1.0);
                clamped / 2.0 - clamped * clamped * clamped / 24.0
            }
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ClampData {
    pub min_value: f64,
    pub max_value: f64,
}

impl ClampData {
    #[inline]
    #[must_use]
    pub fn apply_density(&self, density: f64) -> f64 {
        density.clamp(self.min_value, self.max_value)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RangeChoiceData {
    pub min_inclusive: f64,
    pub max_exclusive: f64,
}

/// Which of the three terrain-shaper splines a component evaluates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TerrainSplineType {
    Offset,
    Factor,
    Jaggedness,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TerrainShaperSplineData {
    pub spline: TerrainSplineType,
    pub min_value: f64,
    pub max_value: f64,
}

/// The cache or interpolator a chunk session puts in place of a wrapper.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum WrapperType {
    Interpolated,
    CacheFlat,
    Cache2D,
    CacheOnce,
    CellCache,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum BaseNoiseFunctionComponent {
    Beardifier,
    BlendAlpha,
    BlendOffset,
    BlendDensity {
        input_index: usize,
    },
    Constant {
        value: f64,
    },
    ClampedYGradient {
        data: ClampedYGradientData,
    },
    Noise {
        data: NoiseData,
    },
    ShiftA {
        noise: &'static NoiseParameters,
    },
    ShiftB {
        noise: &'static NoiseParameters,
    },
    Shift {
        noise: &'static NoiseParameters,
    },
    ShiftedNoise {
        shift_x_index: usize,
        shift_y_index: usize,
        shift_z_index: usize,
        data: ShiftedNoiseData,
    },
    /// The base 3D terrain noise; its scales come from the noise settings.
    BlendedNoise,
    TerrainShaperSpline {
        continents_index: usize,
        erosion_index: usize,
        weirdness_index: usize,
        data: TerrainShaperSplineData,
    },
    Slide {
        input_index: usize,
    },
    WeirdScaled {
        input_index: usize,
        data: WeirdScaledData,
    },
    Wrapper {
        input_index: usize,
        wrapper: WrapperType,
    },
    Linear {
        input_index: usize,
        data: LinearData,
    },
    Unary {
        input_index: usize,
        data: UnaryData,
    },
    Binary {
        argument1_index: usize,
        argument2_index: usize,
        data: BinaryData,
    },
    Clamp {
        input_index: usize,
        data: ClampData,
    },
    RangeChoice {
        input_index: usize,
        when_in_range_index: usize,
        when_out_range_index: usize,
        data: RangeChoiceData,
    },
}

/// Index of a component in a [`DensityFunctionBuilder`] stack.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct DensityHandle(usize);

impl DensityHandle {
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

/// Identity of a leaf component, used to share identical leaves.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
enum LeafKey {
    Constant(u64),
    ClampedYGradient([u64; 4]),
    Noise(&'static str, u64, u64),
    ShiftA(&'static str),
    ShiftB(&'static str),
    Shift(&'static str),
    BlendedNoise,
    Beardifier,
    BlendAlpha,
    BlendOffset,
}

impl LeafKey {
    fn of(component: &BaseNoiseFunctionComponent) -> Option<Self> {
        Some(match component {
            BaseNoiseFunctionComponent::Constant { value } => Self::Constant(value.to_bits()),
            BaseNoiseFunctionComponent::ClampedYGradient { data } => Self::ClampedYGradient([
                data.from_y.to_bits(),
                data.to_y.to_bits(),
                data.from_value.to_bits(),
                data.to_value.to_bits(),
            ]),
            BaseNoiseFunctionComponent::Noise { data } => Self::Noise(
                data.noise.id,
                data.xz_scale.to_bits(),
                data.y_scale.to_bits(),
            ),
            BaseNoiseFunctionComponent::ShiftA { noise } => Self::ShiftA(noise.id),
            BaseNoiseFunctionComponent::ShiftB { noise } => Self::ShiftB(noise.id),
            BaseNoiseFunctionComponent::Shift { noise } => Self::Shift(noise.id),
            BaseNoiseFunctionComponent::BlendedNoise => Self::BlendedNoise,
            BaseNoiseFunctionComponent::Beardifier => Self::Beardifier,
            BaseNoiseFunctionComponent::BlendAlpha => Self::BlendAlpha,
            BaseNoiseFunctionComponent::BlendOffset => Self::BlendOffset,
            _ => return None,
        })
    }
}

/// Assembles a component stack bottom-up.
///
/// `add` and `mul` with a constant operand fold into a single
/// [`BaseNoiseFunctionComponent::Linear`], checking the first operand first.
#[derive(Default)]
pub struct DensityFunctionBuilder {
    stack: Vec<BaseNoiseFunctionComponent>,
    leaves: FxHashMap<LeafKey, DensityHandle>,
    named: FxHashMap<&'static str, DensityHandle>,
}

impl DensityFunctionBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&mut self, component: BaseNoiseFunctionComponent) -> DensityHandle {
        let key = LeafKey::of(&component);
        if let Some(handle) = key.and_then(|key| self.leaves.get(&key)) {
            return *handle;
        }
        let handle = DensityHandle(self.stack.len());
        self.stack.push(component);
        if let Some(key) = key {
            self.leaves.insert(key, handle);
        }
        handle
    }

    #[must_use]
    pub fn component(&self, handle: DensityHandle) -> &BaseNoiseFunctionComponent {
        &self.stack[handle.0]
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.stack.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }

    /// Names `handle` so later wiring can share it.
    pub fn register(&mut self, name: &'static str, handle: DensityHandle) -> DensityHandle {
        self.named.insert(name, handle);
        handle
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<DensityHandle> {
        self.named.get(name).copied()
    }

    #[must_use]
    pub fn build(self) -> Box<[BaseNoiseFunctionComponent]> {
        self.stack.into_boxed_slice()
    }

    fn constant_value(&self, handle: DensityHandle) -> Option<f64> {
        match self.stack[handle.0] {
            BaseNoiseFunctionComponent::Constant { value } => Some(value),
            _ => None,
        }
    }

    pub fn constant(&mut self, value: f64) -> DensityHandle {
        self.push(BaseNoiseFunctionComponent::Constant { value })
    }

    pub fn zero(&mut self) -> DensityHandle {
        self.constant(0.0)
    }

    pub fn y_clamped_gradient(
        &mut self,
        from_y: i32,
        to_y: i32,
        from_value: f64,
        to_value: f64,
    ) -> DensityHandle {
        self.push(BaseNoiseFunctionComponent::ClampedYGradient {
            data: ClampedYGradientData {
                from_y: f64::from(from_y),
                to_y: f64::from(to_y),
                from_value,
                to_value,
            },
        })
    }

    pub fn noise(
        &mut self,
        noise: &'static NoiseParameters,
        xz_scale: f64,
        y_scale: f64,
    ) -> DensityHandle {
        self.push(BaseNoiseFunctionComponent::Noise {
            data: NoiseData {
                noise,
                xz_scale,
                y_scale,
            },
        })
    }

    /// A unit noise remapped from `[-1, 1]` onto `[from, to]`.
    pub fn mapped_noise(
        &mut self,
        noise: &'static NoiseParameters,
        y_scale: f64,
        from: f64,
        to: f64,
    ) -> DensityHandle {
        let noise = self.noise(noise, 1.0, y_scale);
        self.map_from_unit_to(noise, from, to)
    }

    pub fn map_from_unit_to(&mut self, input: DensityHandle, from: f64, to: f64) -> DensityHandle {
        let center = self.constant((from + to) * 0.5);
        let half_span = self.constant((to - from) * 0.5);
        let scaled = self.mul(half_span, input);
        self.add(center, scaled)
    }

    pub fn shift_a(&mut self, noise: &'static NoiseParameters) -> DensityHandle {
        self.push(BaseNoiseFunctionComponent::ShiftA { noise })
    }

    pub fn shift_b(&mut self, noise: &'static NoiseParameters) -> DensityHandle {
        self.push(BaseNoiseFunctionComponent::ShiftB { noise })
    }

    pub fn shift(&mut self, noise: &'static NoiseParameters) -> DensityHandle {
        self.push(BaseNoiseFunctionComponent::Shift { noise })
    }

    pub fn shifted_noise(
        &mut self,
        shift_x: DensityHandle,
        shift_y: DensityHandle,
        shift_z: DensityHandle,
        xz_scale: f64,
        y_scale: f64,
        noise: &'static NoiseParameters,
    ) -> DensityHandle {
        self.push(BaseNoiseFunctionComponent::ShiftedNoise {
            shift_x_index: shift_x.0,
            shift_y_index: shift_y.0,
            shift_z_index: shift_z.0,
            data: ShiftedNoiseData {
                noise,
                xz_scale,
                y_scale,
            },
        })
    }

    pub fn shifted_noise_2d(
        &mut self,
        shift_x: DensityHandle,
        shift_z: DensityHandle,
        xz_scale: f64,
        noise: &'static NoiseParameters,
    ) -> DensityHandle {
        let zero = self.zero();
        self.shifted_noise(shift_x, zero, shift_z, xz_scale, 0.0, noise)
    }

    pub fn blended_noise(&mut self) -> DensityHandle {
        self.push(BaseNoiseFunctionComponent::BlendedNoise)
    }

    pub fn terrain_shaper_spline(
        &mut self,
        continents: DensityHandle,
        erosion: DensityHandle,
        weirdness: DensityHandle,
        spline: TerrainSplineType,
        min_value: f64,
        max_value: f64,
    ) -> DensityHandle {
        self.push(BaseNoiseFunctionComponent::TerrainShaperSpline {
            continents_index: continents.0,
            erosion_index: erosion.0,
            weirdness_index: weirdness.0,
            data: TerrainShaperSplineData {
                spline,
                min_value,
                max_value,
            },
        })
    }

    pub fn slide(&mut self, input: DensityHandle) -> DensityHandle {
        self.push(BaseNoiseFunctionComponent::Slide {
            input_index: input.0,
        })
    }

    pub fn weird_scaled(
        &mut self,
        input: DensityHandle,
        noise: &'static NoiseParameters,
        mapper: RarityValueMapper,
    ) -> DensityHandle {
        self.push(BaseNoiseFunctionComponent::WeirdScaled {
            input_index: input.0,
            data: WeirdScaledData { noise, mapper },
        })
    }

    pub fn wrap(&mut self, input: DensityHandle, wrapper: WrapperType) -> DensityHandle {
        self.push(BaseNoiseFunctionComponent::Wrapper {
            input_index: input.0,
            wrapper,
        })
    }

    pub fn interpolated(&mut self, input: DensityHandle) -> DensityHandle {
        self.wrap(input, WrapperType::Interpolated)
    }

    pub fn flat_cache(&mut self, input: DensityHandle) -> DensityHandle {
        self.wrap(input, WrapperType::CacheFlat)
    }

    pub fn cache_2d(&mut self, input: DensityHandle) -> DensityHandle {
        self.wrap(input, WrapperType::Cache2D)
    }

    pub fn cache_once(&mut self, input: DensityHandle) -> DensityHandle {
        self.wrap(input, WrapperType::CacheOnce)
    }

    pub fn cache_all_in_cell(&mut self, input: DensityHandle) -> DensityHandle {
        self.wrap(input, WrapperType::CellCache)
    }

    fn binary(
        &mut self,
        operation: BinaryOperation,
        argument1: DensityHandle,
        argument2: DensityHandle,
    ) -> DensityHandle {
        let linear = match operation {
            BinaryOperation::Add => Some(LinearOperation::Add),
            BinaryOperation::Mul => Some(LinearOperation::Mul),
            BinaryOperation::Min | BinaryOperation::Max => None,
        };
        if let Some(linear) = linear {
            let folded = self
                .constant_value(argument1)
                .map(|argument| (argument2, argument))
                .or_else(|| {
                    self.constant_value(argument2)
                        .map(|argument| (argument1, argument))
                });
            if let Some((input, argument)) = folded {
                return self.push(BaseNoiseFunctionComponent::Linear {
                    input_index: input.0,
                    data: LinearData {
                        operation: linear,
                        argument,
                    },
                });
            }
        }

        self.push(BaseNoiseFunctionComponent::Binary {
            argument1_index: argument1.0,
            argument2_index: argument2.0,
            data: BinaryData { operation },
        })
    }

    pub fn add(&mut self, argument1: DensityHandle, argument2: DensityHandle) -> DensityHandle {
        self.binary(BinaryOperation::Add, argument1, argument2)
    }

    pub fn mul(&mut self, argument1: DensityHandle, argument2: DensityHandle) -> DensityHandle {
        self.binary(BinaryOperation::Mul, argument1, argument2)
    }

    pub fn min(&mut self, argument1: DensityHandle, argument2: DensityHandle) -> DensityHandle {
        self.binary(BinaryOperation::Min, argument1, argument2)
    }

    pub fn max(&mut self, argument1: DensityHandle, argument2: DensityHandle) -> DensityHandle {
        self.binary(BinaryOperation::Max, argument1, argument2)
    }

    pub fn unary(&mut self, input: DensityHandle, operation: UnaryOperation) -> DensityHandle {
        self.push(BaseNoiseFunctionComponent::Unary {
            input_index: input.0,
            data: UnaryData { operation },
        })
    }

    pub fn abs(&mut self, input: DensityHandle) -> DensityHandle {
        self.unary(input, UnaryOperation::Abs)
    }

    pub fn square(&mut self, input: DensityHandle) -> DensityHandle {
        self.unary(input, UnaryOperation::Square)
    }

    pub fn cube(&mut self, input: DensityHandle) -> DensityHandle {
        self.unary(input, UnaryOperation::Cube)
    }

    pub fn half_negative(&mut self, input: DensityHandle) -> DensityHandle {
        self.unary(input, UnaryOperation::HalfNegative)
    }

    pub fn quarter_negative(&mut self, input: DensityHandle) -> DensityHandle {
        self.unary(input, UnaryOperation::QuarterNegative)
    }

    pub fn squeeze(&mut self, input: DensityHandle) -> DensityHandle {
        self.unary(input, UnaryOperation::Squeeze)
    }

    pub fn clamp(&mut self, input: DensityHandle, min_value: f64, max_value: f64) -> DensityHandle {
        self.push(BaseNoiseFunctionComponent::Clamp {
            input_index: input.0,
            data: ClampData {
                min_value,
                max_value,
            },
        })
    }

    pub fn range_choice(
        &mut self,
        input: DensityHandle,
        min_inclusive: f64,
        max_exclusive: f64,
        when_in_range: DensityHandle,
        when_out_of_range: DensityHandle,
    ) -> DensityHandle {
        self.push(BaseNoiseFunctionComponent::RangeChoice {
            input_index: input.0,
            when_in_range_index: when_in_range.0,
            when_out_range_index: when_out_of_range.0,
            data: RangeChoiceData {
                min_inclusive,
                max_exclusive,
            },
        })
    }

    pub fn beardifier(&mut self) -> DensityHandle {
        self.push(BaseNoiseFunctionComponent::Beardifier)
    }

    pub fn blend_alpha(&mut self) -> DensityHandle {
        self.push(BaseNoiseFunctionComponent::BlendAlpha)
    }

    pub fn blend_offset(&mut self) -> DensityHandle {
        self.push(BaseNoiseFunctionComponent::BlendOffset)
    }

    pub fn blend_density(&mut self, input: DensityHandle) -> DensityHandle {
        self.push(BaseNoiseFunctionComponent::BlendDensity {
            input_index: input.0,
        })
    }

    /// `start * (1 - delta) + end * delta`, with `delta` evaluated once per point.
    pub fn lerp(
        &mut self,
        delta: DensityHandle,
        start: DensityHandle,
        end: DensityHandle,
    ) -> DensityHandle {
        let delta = self.cache_once(delta);
        let minus_one = self.constant(-1.0);
        let negated = self.mul(delta, minus_one);
        let one = self.constant(1.0);
        let inverse = self.add(negated, one);
        let start = self.mul(start, inverse);
        let end = self.mul(end, delta);
        self.add(start, end)
    }
}

/// Named entry points into a seed-independent component stack.
#[derive(Clone, Debug)]
pub struct BaseNoiseRouter {
    pub full_component_stack: Box<[BaseNoiseFunctionComponent]>,
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
}

impl BaseNoiseRouter {
    /// Router whose named outputs all read `output`, for evaluating a
    /// standalone graph through a chunk session.
    #[must_use]
    pub fn uniform(full_component_stack: Box<[BaseNoiseFunctionComponent]>, output: DensityHandle) -> Self {
        let index = output.index();
        Self {
            full_component_stack,
            barrier_noise: index,
            fluid_level_floodedness_noise: index,
            fluid_level_spread_noise: index,
            lava_noise: index,
            temperature: index,
            vegetation: index,
            continents: index,
            erosion: index,
            depth: index,
            ridges: index,
            initial_density_without_jaggedness: index,
            final_density: index,
            vein_toggle: index,
            vein_ridged: index,
            vein_gap: index,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constants_are_shared() {
        let mut builder = DensityFunctionBuilder::new();
        let a = builder.constant(1.5);
        let b = builder.constant(1.5);
        let c = builder.constant(-1.5);
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(builder.len(), 2);
    }

    #[test]
    fn test_noise_leaves_are_shared() {
        let mut builder = DensityFunctionBuilder::new();
        let a = builder.noise(&NoiseParameters::CAVE_LAYER, 1.0, 8.0);
        let b = builder.noise(&NoiseParameters::CAVE_LAYER, 1.0, 8.0);
        let c = builder.noise(&NoiseParameters::CAVE_LAYER, 1.0, 4.0);
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_constant_operand_folds_into_linear() {
        let mut builder = DensityFunctionBuilder::new();
        let y = builder.y_clamped_gradient(-64, 320, 1.0, -1.0);
        let two = builder.constant(2.0);
        let product = builder.mul(two, y);
        assert_eq!(
            *builder.component(product),
            BaseNoiseFunctionComponent::Linear {
                input_index: y.index(),
                data: LinearData {
                    operation: LinearOperation::Mul,
                    argument: 2.0,
                },
            }
        );

        let minimum = builder.min(two, y);
        assert!(matches!(
            builder.component(minimum),
            BaseNoiseFunctionComponent::Binary { .. }
        ));
    }

    #[test]
    fn test_components_only_reference_earlier_entries() {
        let mut builder = DensityFunctionBuilder::new();
        let y = builder.y_clamped_gradient(0, 10, 0.0, 1.0);
        let n = builder.noise(&NoiseParameters::ORE_GAP, 1.0, 1.0);
        let lerped = builder.lerp(y, n, y);
        assert_eq!(lerped.index(), builder.len() - 1);
        assert!(y.index() < lerped.index() && n.index() < lerped.index());
    }

    #[test]
    fn test_named_registry() {
        let mut builder = DensityFunctionBuilder::new();
        let zero = builder.zero();
        builder.register("minecraft:zero", zero);
        assert_eq!(builder.get("minecraft:zero"), Some(zero));
        assert_eq!(builder.get("minecraft:missing"), None);
    }

    #[test]
    fn test_rarity_mappers() {
        assert_eq!(RarityValueMapper::Type1.map(-0.6), 0.75);
        assert_eq!(RarityValueMapper::Type1.map(0.9), 2.0);
        assert_eq!(RarityValueMapper::Type2.map(-0.9), 0.5);
        assert_eq!(RarityValueMapper::Type2.map(0.8), 3.0);
        assert_eq!(RarityValueMapper::Type1.max_rarity(), 2.0);
        assert_eq!(RarityValueMapper::Type2.max_rarity(), 3.0);
    }
}
