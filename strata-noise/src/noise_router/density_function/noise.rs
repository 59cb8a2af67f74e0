//! Noise-sampling density functions.

#![allow(clippy::similar_names, clippy::many_single_char_names)]

use crate::math::{clamped_lerp, floor_div};
use crate::noise::{NormalNoise, PerlinNoise, wrap};
use crate::noise_router::chunk_density_function::SampleOptions;
use crate::noise_router::component::base_noise_router::{NoiseData, ShiftedNoiseData};
use crate::noise_router::component::chunk_noise_router::{
    ChunkNoiseFunctionComponent, StaticChunkNoiseFunctionComponentImpl,
};
use crate::noise_router::settings::NoiseSamplingSettings;
use crate::random::RandomSource;

use super::{
    IndexToNoisePos, NoiseFunctionComponentRange, NoisePos,
    StaticIndependentChunkNoiseFunctionComponentImpl,
};

/// Samples a normal noise at scaled block coordinates.
///
/// ```text
/// sample(pos) = noise(x * xz_scale, y * y_scale, z * xz_scale)
/// ```
#[derive(Clone, Debug)]
pub struct Noise {
    sampler: NormalNoise,
    data: NoiseData,
}

impl Noise {
    #[must_use]
    pub const fn new(sampler: NormalNoise, data: NoiseData) -> Self {
        Self { sampler, data }
    }

    #[must_use]
    pub const fn data(&self) -> &NoiseData {
        &self.data
    }
}

impl NoiseFunctionComponentRange for Noise {
    #[inline]
    fn min(&self) -> f64 {
        -self.max()
    }

    #[inline]
    fn max(&self) -> f64 {
        self.sampler.max_value()
    }
}

impl StaticIndependentChunkNoiseFunctionComponentImpl for Noise {
    fn sample(&self, pos: &impl NoisePos) -> f64 {
        self.sampler.get_value(
            f64::from(pos.x()) * self.data.xz_scale,
            f64::from(pos.y()) * self.data.y_scale,
            f64::from(pos.z()) * self.data.xz_scale,
        )
    }
}

#[inline]
fn shift_sample(sampler: &NormalNoise, x: f64, y: f64, z: f64) -> f64 {
    sampler.get_value(x * 0.25, y * 0.25, z * 0.25) * 4.0
}

macro_rules! shift_component {
    ($(#[$meta:meta])* $name:ident, |$pos:ident| ($a:expr, $b:expr, $c:expr)) => {
        $(#[$meta])*
        #[derive(Clone, Debug)]
        pub struct $name {
            sampler: NormalNoise,
        }

        impl $name {
            #[must_use]
            pub const fn new(sampler: NormalNoise) -> Self {
                Self { sampler }
            }
        }

        impl NoiseFunctionComponentRange for $name {
            #[inline]
            fn min(&self) -> f64 {
                -self.max()
            }

            #[inline]
            fn max(&self) -> f64 {
                self.sampler.max_value() * 4.0
            }
        }

        impl StaticIndependentChunkNoiseFunctionComponentImpl for $name {
            fn sample(&self, $pos: &impl NoisePos) -> f64 {
                shift_sample(&self.sampler, $a, $b, $c)
            }
        }
    };
}

shift_component!(
    /// X offset for domain warping: `noise(x / 4, 0, z / 4) * 4`.
    ShiftA,
    |pos| (f64::from(pos.x()), 0.0, f64::from(pos.z()))
);

shift_component!(
    /// Z offset for domain warping, with the axes rotated: `noise(z / 4, x / 4, 0) * 4`.
    ShiftB,
    |pos| (f64::from(pos.z()), f64::from(pos.x()), 0.0)
);

shift_component!(
    /// Full 3D offset: `noise(x / 4, y / 4, z / 4) * 4`.
    Shift,
    |pos| (f64::from(pos.x()), f64::from(pos.y()), f64::from(pos.z()))
);

/// Samples a normal noise at block coordinates displaced by three other
/// stack entries.
///
/// ```text
/// sample(pos) = noise(x * xz_scale + sx(pos), y * y_scale + sy(pos), z * xz_scale + sz(pos))
/// ```
#[derive(Clone, Debug)]
pub struct ShiftedNoise {
    pub shift_x_index: usize,
    pub shift_y_index: usize,
    pub shift_z_index: usize,
    sampler: NormalNoise,
    data: ShiftedNoiseData,
}

impl ShiftedNoise {
    #[must_use]
    pub const fn new(
        shift_x_index: usize,
        shift_y_index: usize,
        shift_z_index: usize,
        sampler: NormalNoise,
        data: ShiftedNoiseData,
    ) -> Self {
        Self {
            shift_x_index,
            shift_y_index,
            shift_z_index,
            sampler,
            data,
        }
    }

    #[must_use]
    pub const fn data(&self) -> &ShiftedNoiseData {
        &self.data
    }
}

impl NoiseFunctionComponentRange for ShiftedNoise {
    #[inline]
    fn min(&self) -> f64 {
        -self.max()
    }

    #[inline]
    fn max(&self) -> f64 {
        self.sampler.max_value()
    }
}

impl StaticChunkNoiseFunctionComponentImpl for ShiftedNoise {
    fn sample(
        &self,
        component_stack: &mut [ChunkNoiseFunctionComponent],
        pos: &impl NoisePos,
        sample_options: &SampleOptions,
    ) -> f64 {
        let shift_x = ChunkNoiseFunctionComponent::sample_from_stack(
            &mut component_stack[..=self.shift_x_index],
            pos,
            sample_options,
        );
        let shift_y = ChunkNoiseFunctionComponent::sample_from_stack(
            &mut component_stack[..=self.shift_y_index],
            pos,
            sample_options,
        );
        let shift_z = ChunkNoiseFunctionComponent::sample_from_stack(
            &mut component_stack[..=self.shift_z_index],
            pos,
            sample_options,
        );

        self.sampler.get_value(
            f64::from(pos.x()) * self.data.xz_scale + shift_x,
            f64::from(pos.y()) * self.data.y_scale + shift_y,
            f64::from(pos.z()) * self.data.xz_scale + shift_z,
        )
    }

    fn fill(
        &self,
        component_stack: &mut [ChunkNoiseFunctionComponent],
        array: &mut [f64],
        mapper: &impl IndexToNoisePos,
        sample_options: &mut SampleOptions,
    ) {
        array.iter_mut().enumerate().for_each(|(index, value)| {
            let pos = mapper.at(index, Some(sample_options));
            *value = self.sample(component_stack, &pos, sample_options);
        });
    }
}

const MAIN_NOISE_SCALE: f64 = 684.412;

/// The base 3D terrain noise.
///
/// Two 16-octave limit noises are blended by an 8-octave main noise. All
/// three are sampled at the coordinates of the noise cell containing the
/// block, so every block of a cell reads the same value.
#[derive(Clone, Debug)]
pub struct BlendedNoiseSampler {
    min_limit_noise: PerlinNoise,
    max_limit_noise: PerlinNoise,
    main_noise: PerlinNoise,
    xz_scale: f64,
    y_scale: f64,
    xz_main_scale: f64,
    y_main_scale: f64,
    cell_width: i32,
    cell_height: i32,
    max_value: f64,
}

impl BlendedNoiseSampler {
    /// Draws the three octave stacks from `random` in order: min limit,
    /// max limit, main.
    #[must_use]
    pub fn new(
        random: &mut RandomSource,
        sampling: &NoiseSamplingSettings,
        cell_width: i32,
        cell_height: i32,
    ) -> Self {
        let min_limit_noise = PerlinNoise::create_legacy_for_blended_noise(random, -15..=0);
        let max_limit_noise = PerlinNoise::create_legacy_for_blended_noise(random, -15..=0);
        let main_noise = PerlinNoise::create_legacy_for_blended_noise(random, -7..=0);

        let xz_scale = MAIN_NOISE_SCALE * sampling.xz_scale;
        let y_scale = MAIN_NOISE_SCALE * sampling.y_scale;
        let max_value = min_limit_noise.max_broken_value(y_scale);

        Self {
            min_limit_noise,
            max_limit_noise,
            main_noise,
            xz_scale,
            y_scale,
            xz_main_scale: xz_scale / sampling.xz_factor,
            y_main_scale: y_scale / sampling.y_factor,
            cell_width,
            cell_height,
            max_value,
        }
    }
}

impl NoiseFunctionComponentRange for BlendedNoiseSampler {
    #[inline]
    fn min(&self) -> f64 {
        -self.max()
    }

    #[inline]
    fn max(&self) -> f64 {
        self.max_value
    }
}

impl StaticIndependentChunkNoiseFunctionComponentImpl for BlendedNoiseSampler {
    fn sample(&self, pos: &impl NoisePos) -> f64 {
        let cell_x = f64::from(floor_div(pos.x(), self.cell_width));
        let cell_y = f64::from(floor_div(pos.y(), self.cell_height));
        let cell_z = f64::from(floor_div(pos.z(), self.cell_width));

        let mut main = 0.0;
        let mut frequency = 1.0;
        for octave in 0..8 {
            if let Some(noise) = self.main_noise.get_octave_noise(octave) {
                let y_scale = self.y_main_scale * frequency;
                main += noise.noise_with_y_scale(
                    wrap(cell_x * self.xz_main_scale * frequency),
                    wrap(cell_y * self.y_main_scale * frequency),
                    wrap(cell_z * self.xz_main_scale * frequency),
                    y_scale,
                    cell_y * y_scale,
                ) / frequency;
            }
            frequency /= 2.0;
        }

        let factor = (main / 10.0 + 1.0) / 2.0;
        let only_max = factor >= 1.0;
        let only_min = factor <= 0.0;

        let mut min_limit = 0.0;
        let mut max_limit = 0.0;
        frequency = 1.0;
        for octave in 0..16 {
            let x = wrap(cell_x * self.xz_scale * frequency);
            let y = wrap(cell_y * self.y_scale * frequency);
            let z = wrap(cell_z * self.xz_scale * frequency);
            let y_scale = self.y_scale * frequency;

            if !only_max && let Some(noise) = self.min_limit_noise.get_octave_noise(octave) {
                min_limit += noise.noise_with_y_scale(x, y, z, y_scale, cell_y * y_scale) / frequency;
            }
            if !only_min && let Some(noise) = self.max_limit_noise.get_octave_noise(octave) {
                max_limit += noise.noise_with_y_scale(x, y, z, y_scale, cell_y * y_scale) / frequency;
            }
            frequency /= 2.0;
        }

        clamped_lerp(min_limit / 512.0, max_limit / 512.0, factor) / 128.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::noise_router::density_function::UnblendedNoisePos;
    use crate::noise_router::settings::NoiseSettings;
    use crate::random::WorldgenRandomAlgorithm;

    fn blended(seed: u64) -> BlendedNoiseSampler {
        let settings = NoiseSettings::overworld();
        let mut random = WorldgenRandomAlgorithm::Legacy.new_instance(seed);
        BlendedNoiseSampler::new(
            &mut random,
            &settings.sampling,
            settings.cell_width(),
            settings.cell_height(),
        )
    }

    #[test]
    fn test_blended_noise_is_constant_within_a_cell() {
        let noise = blended(99);
        let corner = noise.sample(&UnblendedNoisePos::new(8, 16, -4));
        for (dx, dy, dz) in [(1, 0, 0), (3, 7, 3), (0, 5, 2)] {
            let inner = noise.sample(&UnblendedNoisePos::new(8 + dx, 16 + dy, -4 + dz));
            assert_eq!(corner.to_bits(), inner.to_bits());
        }
    }

    #[test]
    fn test_blended_noise_within_bounds() {
        let noise = blended(1);
        for i in -20..20 {
            let v = noise.sample(&UnblendedNoisePos::new(i * 13, i * 5, i * -7));
            assert!(v >= noise.min() && v <= noise.max(), "{v} out of bounds");
        }
    }

    #[test]
    fn test_shift_b_rotates_axes() {
        let mut random = WorldgenRandomAlgorithm::Xoroshiro.new_instance(5);
        let sampler = NormalNoise::create_from_random(&mut random, -3, &[1.0, 1.0, 1.0, 0.0]);
        let shift = Shift::new(sampler.clone());
        let shift_b = ShiftB::new(sampler);
        let b = shift_b.sample(&UnblendedNoisePos::new(40, -5, 12));
        let full = shift.sample(&UnblendedNoisePos::new(12, 40, 0));
        assert_eq!(b.to_bits(), full.to_bits());
        assert!(b.abs() <= shift_b.max());
    }
}
