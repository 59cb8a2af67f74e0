//! Gradients, range choices, weird-scaled cave samplers and world slides.

use crate::math::clamped_map;
use crate::noise::NormalNoise;
use crate::noise_router::chunk_density_function::SampleOptions;
use crate::noise_router::component::base_noise_router::{
    ClampedYGradientData, RangeChoiceData, RarityValueMapper,
};
use crate::noise_router::component::chunk_noise_router::{
    ChunkNoiseFunctionComponent, StaticChunkNoiseFunctionComponentImpl,
};
use crate::noise_router::settings::NoiseSettings;

use super::{
    IndexToNoisePos, NoiseFunctionComponentRange, NoisePos,
    StaticIndependentChunkNoiseFunctionComponentImpl,
};

/// Linear ramp over block Y, clamped at both ends.
#[derive(Clone, Debug)]
pub struct ClampedYGradient {
    data: ClampedYGradientData,
}

impl ClampedYGradient {
    #[must_use]
    pub const fn new(data: ClampedYGradientData) -> Self {
        Self { data }
    }
}

impl NoiseFunctionComponentRange for ClampedYGradient {
    #[inline]
    fn min(&self) -> f64 {
        self.data.from_value.min(self.data.to_value)
    }

    #[inline]
    fn max(&self) -> f64 {
        self.data.from_value.max(self.data.to_value)
    }
}

impl StaticIndependentChunkNoiseFunctionComponentImpl for ClampedYGradient {
    fn sample(&self, pos: &impl NoisePos) -> f64 {
        clamped_map(
            f64::from(pos.y()),
            self.data.from_y,
            self.data.to_y,
            self.data.from_value,
            self.data.to_value,
        )
    }
}

/// Picks one of two inputs depending on whether a third lies in
/// `[min_inclusive, max_exclusive)`.
#[derive(Clone, Debug)]
pub struct RangeChoice {
    pub input_index: usize,
    pub when_in_index: usize,
    pub when_out_index: usize,
    min_value: f64,
    max_value: f64,
    data: RangeChoiceData,
}

impl RangeChoice {
    #[must_use]
    pub const fn new(
        input_index: usize,
        when_in_index: usize,
        when_out_index: usize,
        min_value: f64,
        max_value: f64,
        data: RangeChoiceData,
    ) -> Self {
        Self {
            input_index,
            when_in_index,
            when_out_index,
            min_value,
            max_value,
            data,
        }
    }

    #[inline]
    fn branch(&self, input: f64) -> usize {
        if self.data.min_inclusive <= input && input < self.data.max_exclusive {
            self.when_in_index
        } else {
            self.when_out_index
        }
    }
}

impl NoiseFunctionComponentRange for RangeChoice {
    #[inline]
    fn min(&self) -> f64 {
        self.min_value
    }

    #[inline]
    fn max(&self) -> f64 {
        self.max_value
    }
}

impl StaticChunkNoiseFunctionComponentImpl for RangeChoice {
    fn sample(
        &self,
        component_stack: &mut [ChunkNoiseFunctionComponent],
        pos: &impl NoisePos,
        sample_options: &SampleOptions,
    ) -> f64 {
        let input_sample = ChunkNoiseFunctionComponent::sample_from_stack(
            &mut component_stack[..=self.input_index],
            pos,
            sample_options,
        );
        ChunkNoiseFunctionComponent::sample_from_stack(
            &mut component_stack[..=self.branch(input_sample)],
            pos,
            sample_options,
        )
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

        array.iter_mut().enumerate().for_each(|(index, value)| {
            let pos = mapper.at(index, Some(sample_options));
            *value = ChunkNoiseFunctionComponent::sample_from_stack(
                &mut component_stack[..=self.branch(*value)],
                &pos,
                sample_options,
            );
        });
    }
}

/// Samples a noise at a frequency picked by its input's rarity, producing the
/// thin winding shapes of spaghetti caves.
///
/// ```text
/// rarity = mapper(input(pos))
/// sample(pos) = rarity * |noise(x / rarity, y / rarity, z / rarity)|
/// ```
#[derive(Clone, Debug)]
pub struct WeirdScaled {
    pub input_index: usize,
    sampler: NormalNoise,
    mapper: RarityValueMapper,
}

impl WeirdScaled {
    #[must_use]
    pub const fn new(input_index: usize, sampler: NormalNoise, mapper: RarityValueMapper) -> Self {
        Self {
            input_index,
            sampler,
            mapper,
        }
    }

    #[inline]
    fn transform(&self, pos: &impl NoisePos, density: f64) -> f64 {
        let rarity = self.mapper.map(density);
        rarity
            * self
                .sampler
                .get_value(
                    f64::from(pos.x()) / rarity,
                    f64::from(pos.y()) / rarity,
                    f64::from(pos.z()) / rarity,
                )
                .abs()
    }
}

impl NoiseFunctionComponentRange for WeirdScaled {
    #[inline]
    fn min(&self) -> f64 {
        0.0
    }

    #[inline]
    fn max(&self) -> f64 {
        self.mapper.max_rarity() * self.sampler.max_value()
    }
}

impl StaticChunkNoiseFunctionComponentImpl for WeirdScaled {
    fn sample(
        &self,
        component_stack: &mut [ChunkNoiseFunctionComponent],
        pos: &impl NoisePos,
        sample_options: &SampleOptions,
    ) -> f64 {
        let density = ChunkNoiseFunctionComponent::sample_from_stack(
            &mut component_stack[..=self.input_index],
            pos,
            sample_options,
        );
        self.transform(pos, density)
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
        array.iter_mut().enumerate().for_each(|(index, value)| {
            let pos = mapper.at(index, Some(sample_options));
            *value = self.transform(&pos, *value);
        });
    }
}

/// Applies the top and bottom world slides to its input.
#[derive(Clone, Debug)]
pub struct Slide {
    pub input_index: usize,
    settings: NoiseSettings,
    min_value: f64,
    max_value: f64,
}

impl Slide {
    #[must_use]
    pub fn new(input_index: usize, settings: NoiseSettings, input_min: f64, input_max: f64) -> Self {
        let top = settings.top_slide.target;
        let bottom = settings.bottom_slide.target;
        Self {
            input_index,
            settings,
            min_value: input_min.min(bottom.min(top)),
            max_value: input_max.max(bottom.max(top)),
        }
    }
}

impl NoiseFunctionComponentRange for Slide {
    #[inline]
    fn min(&self) -> f64 {
        self.min_value
    }

    #[inline]
    fn max(&self) -> f64 {
        self.max_value
    }
}

impl StaticChunkNoiseFunctionComponentImpl for Slide {
    fn sample(
        &self,
        component_stack: &mut [ChunkNoiseFunctionComponent],
        pos: &impl NoisePos,
        sample_options: &SampleOptions,
    ) -> f64 {
        let density = ChunkNoiseFunctionComponent::sample_from_stack(
            &mut component_stack[..=self.input_index],
            pos,
            sample_options,
        );
        self.settings.apply_slide(density, f64::from(pos.y()))
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
        array.iter_mut().enumerate().for_each(|(index, value)| {
            let pos = mapper.at(index, Some(sample_options));
            *value = self.settings.apply_slide(*value, f64::from(pos.y()));
        });
    }
}
