//! Arithmetic density functions: constants, linear maps, binary operations,
//! unary transforms and clamps.

use crate::noise_router::chunk_density_function::SampleOptions;
use crate::noise_router::component::base_noise_router::{
    BinaryData, BinaryOperation, ClampData, LinearData, UnaryData,
};
use crate::noise_router::component::chunk_noise_router::{
    ChunkNoiseFunctionComponent, StaticChunkNoiseFunctionComponentImpl,
};

use super::{
    IndexToNoisePos, NoiseFunctionComponentRange, NoisePos,
    StaticIndependentChunkNoiseFunctionComponentImpl,
};

/// The same value everywhere.
#[derive(Clone, Debug)]
pub struct Constant {
    value: f64,
}

impl Constant {
    #[must_use]
    pub const fn new(value: f64) -> Self {
        Self { value }
    }

    #[inline]
    #[must_use]
    pub const fn value(&self) -> f64 {
        self.value
    }
}

impl NoiseFunctionComponentRange for Constant {
    #[inline]
    fn min(&self) -> f64 {
        self.value
    }

    #[inline]
    fn max(&self) -> f64 {
        self.value
    }
}

impl StaticIndependentChunkNoiseFunctionComponentImpl for Constant {
    fn sample(&self, _pos: &impl NoisePos) -> f64 {
        self.value
    }

    fn fill(&self, array: &mut [f64], _mapper: &impl IndexToNoisePos) {
        array.fill(self.value);
    }
}

/// Adds or multiplies its input by a constant.
#[derive(Clone, Debug)]
pub struct Linear {
    pub input_index: usize,
    min_value: f64,
    max_value: f64,
    data: LinearData,
}

impl Linear {
    #[must_use]
    pub const fn new(input_index: usize, min_value: f64, max_value: f64, data: LinearData) -> Self {
        Self {
            input_index,
            min_value,
            max_value,
            data,
        }
    }

    #[inline]
    #[must_use]
    pub fn apply(&self, input_density: f64) -> f64 {
        self.data.apply_density(input_density)
    }

    #[inline]
    #[must_use]
    pub const fn data(&self) -> &LinearData {
        &self.data
    }
}

impl NoiseFunctionComponentRange for Linear {
    #[inline]
    fn min(&self) -> f64 {
        self.min_value
    }

    #[inline]
    fn max(&self) -> f64 {
        self.max_value
    }
}

impl StaticChunkNoiseFunctionComponentImpl for Linear {
    fn sample(
        &self,
        component_stack: &mut [ChunkNoiseFunctionComponent],
        pos: &impl NoisePos,
        sample_options: &SampleOptions,
    ) -> f64 {
        let input_density = ChunkNoiseFunctionComponent::sample_from_stack(
            &mut component_stack[..=self.input_index],
            pos,
            sample_options,
        );
        self.data.apply_density(input_density)
    }

    fn fill(
        &self,
        component_stack: &mut [ChunkNoiseFunctionComponent],
        array: &mut [f64],
        mapper: &impl IndexToNoisePos,
        sample_options: &mut SampleOptions,
    ) {
        ChunkNoiseFunctionComponent::fill_from_stack(
            &mut component_stack[..=self.input_index],
            array,
            mapper,
            sample_options,
        );
        for value in array {
            *value = self.data.apply_density(*value);
        }
    }
}

/// Combines two inputs.
///
/// Evaluation short-circuits on the first operand:
/// - `Mul` returns 0 without touching the second operand when the first is 0
/// - `Min` keeps the first operand when it is below the second's lower bound
/// - `Max` keeps the first operand when it is above the second's upper bound
#[derive(Clone, Debug)]
pub struct Binary {
    pub input1_index: usize,
    pub input2_index: usize,
    min_value: f64,
    max_value: f64,
    data: BinaryData,
}

impl Binary {
    #[must_use]
    pub const fn new(
        input1_index: usize,
        input2_index: usize,
        min_value: f64,
        max_value: f64,
        data: BinaryData,
    ) -> Self {
        Self {
            input1_index,
            input2_index,
            min_value,
            max_value,
            data,
        }
    }

    #[inline]
    #[must_use]
    pub const fn operation(&self) -> BinaryOperation {
        self.data.operation
    }
}

impl NoiseFunctionComponentRange for Binary {
    #[inline]
    fn min(&self) -> f64 {
        self.min_value
    }

    #[inline]
    fn max(&self) -> f64 {
        self.max_value
    }
}

impl StaticChunkNoiseFunctionComponentImpl for Binary {
    fn sample(
        &self,
        component_stack: &mut [ChunkNoiseFunctionComponent],
        pos: &impl NoisePos,
        sample_options: &SampleOptions,
    ) -> f64 {
        let input1_density = ChunkNoiseFunctionComponent::sample_from_stack(
            &mut component_stack[..=self.input1_index],
            pos,
            sample_options,
        );

        let skip_second = match self.data.operation {
            BinaryOperation::Add => false,
            BinaryOperation::Mul => input1_density == 0.0,
            BinaryOperation::Min => input1_density < component_stack[self.input2_index].min(),
            BinaryOperation::Max => input1_density > component_stack[self.input2_index].max(),
        };
        if skip_second {
            // 0 * x is 0, and min/max with an out-of-range operand is the operand.
            return if self.data.operation == BinaryOperation::Mul {
                0.0
            } else {
                input1_density
            };
        }

        let input2_density = ChunkNoiseFunctionComponent::sample_from_stack(
            &mut component_stack[..=self.input2_index],
            pos,
            sample_options,
        );
        match self.data.operation {
            BinaryOperation::Add => input1_density + input2_density,
            BinaryOperation::Mul => input1_density * input2_density,
            BinaryOperation::Min => input1_density.min(input2_density),
            BinaryOperation::Max => input1_density.max(input2_density),
        }
    }

    fn fill(
        &self,
        component_stack: &mut [ChunkNoiseFunctionComponent],
        array: &mut [f64],
        mapper: &impl IndexToNoisePos,
        sample_options: &mut SampleOptions,
    ) {
        ChunkNoiseFunctionComponent::fill_from_stack(
            &mut component_stack[..=self.input1_index],
            array,
            mapper,
            sample_options,
        );

        match self.data.operation {
            BinaryOperation::Add => {
                // The second operand fills a whole array of its own so caches
                // inside it see the same array pass as the first operand.
                let mut array2 = vec![0.0; array.len()];
                ChunkNoiseFunctionComponent::fill_from_stack(
                    &mut component_stack[..=self.input2_index],
                    &mut array2,
                    mapper,
                    sample_options,
                );
                for (v1, v2) in array.iter_mut().zip(array2.iter()) {
                    *v1 += *v2;
                }
            }
            BinaryOperation::Mul => {
                array.iter_mut().enumerate().for_each(|(index, value)| {
                    if *value != 0.0 {
                        let pos = mapper.at(index, Some(sample_options));
                        let density2 = ChunkNoiseFunctionComponent::sample_from_stack(
                            &mut component_stack[..=self.input2_index],
                            &pos,
                            sample_options,
                        );
                        *value *= density2;
                    }
                });
            }
            BinaryOperation::Min => {
                let input2_min = component_stack[self.input2_index].min();
                array.iter_mut().enumerate().for_each(|(index, value)| {
                    if *value >= input2_min {
                        let pos = mapper.at(index, Some(sample_options));
                        let density2 = ChunkNoiseFunctionComponent::sample_from_stack(
                            &mut component_stack[..=self.input2_index],
                            &pos,
                            sample_options,
                        );
                        *value = value.min(density2);
                    }
                });
            }
            BinaryOperation::Max => {
                let input2_max = component_stack[self.input2_index].max();
                array.iter_mut().enumerate().for_each(|(index, value)| {
                    if *value <= input2_max {
                        let pos = mapper.at(index, Some(sample_options));
                        let density2 = ChunkNoiseFunctionComponent::sample_from_stack(
                            &mut component_stack[..=self.input2_index],
                            &pos,
                            sample_options,
                        );
                        *value = value.max(density2);
                    }
                });
            }
        }
    }
}

/// Applies an [`UnaryOperation`](crate::noise_router::component::base_noise_router::UnaryOperation)
/// to its input.
#[derive(Clone, Debug)]
pub struct Unary {
    pub input_index: usize,
    min_value: f64,
    max_value: f64,
    data: UnaryData,
}

impl Unary {
    #[must_use]
    pub const fn new(input_index: usize, min_value: f64, max_value: f64, data: UnaryData) -> Self {
        Self {
            input_index,
            min_value,
            max_value,
            data,
        }
    }

    #[inline]
    #[must_use]
    pub fn apply(&self, input_density: f64) -> f64 {
        self.data.apply_density(input_density)
    }
}

impl NoiseFunctionComponentRange for Unary {
    #[inline]
    fn min(&self) -> f64 {
        self.min_value
    }

    #[inline]
    fn max(&self) -> f64 {
        self.max_value
    }
}

impl StaticChunkNoiseFunctionComponentImpl for Unary {
    fn sample(
        &self,
        component_stack: &mut [ChunkNoiseFunctionComponent],
        pos: &impl NoisePos,
        sample_options: &SampleOptions,
    ) -> f64 {
        let input_density = ChunkNoiseFunctionComponent::sample_from_stack(
            &mut component_stack[..=self.input_index],
            pos,
            sample_options,
        );
        self.data.apply_density(input_density)
    }

    fn fill(
        &self,
        component_stack: &mut [ChunkNoiseFunctionComponent],
        array: &mut [f64],
        mapper: &impl IndexToNoisePos,
        sample_options: &mut SampleOptions,
    ) {
        ChunkNoiseFunctionComponent::fill_from_stack(
            &mut component_stack[..=self.input_index],
            array,
            mapper,
            sample_options,
        );
        for value in array {
            *value = self.data.apply_density(*value);
        }
    }
}

/// Clamps its input; the bounds are the clamp range itself.
#[derive(Clone, Debug)]
pub struct Clamp {
    pub input_index: usize,
    data: ClampData,
}

impl Clamp {
    #[must_use]
    pub const fn new(input_index: usize, data: ClampData) -> Self {
        Self { input_index, data }
    }
}

impl NoiseFunctionComponentRange for Clamp {
    #[inline]
    fn min(&self) -> f64 {
        self.data.min_value
    }

    #[inline]
    fn max(&self) -> f64 {
        self.data.max_value
    }
}

impl StaticChunkNoiseFunctionComponentImpl for Clamp {
    fn sample(
        &self,
        component_stack: &mut [ChunkNoiseFunctionComponent],
        pos: &impl NoisePos,
        sample_options: &SampleOptions,
    ) -> f64 {
        let input_density = ChunkNoiseFunctionComponent::sample_from_stack(
            &mut component_stack[..=self.input_index],
            pos,
            sample_options,
        );
        self.data.apply_density(input_density)
    }

    fn fill(
        &self,
        component_stack: &mut [ChunkNoiseFunctionComponent],
        array: &mut [f64],
        mapper: &impl IndexToNoisePos,
        sample_options: &mut SampleOptions,
    ) {
        ChunkNoiseFunctionComponent::fill_from_stack(
            &mut component_stack[..=self.input_index],
            array,
            mapper,
            sample_options,
        );
        for value in array {
            *value = self.data.apply_density(*value);
        }
    }
}
