//! Multi-octave Perlin noise.

use crate::noise::ImprovedNoise;
use crate::random::{PositionalRandom, Random, RandomSource};

/// Coordinates are wrapped into `[-2^24, 2^24)` before sampling to keep precision.
const ROUND_OFF: f64 = 33_554_432.0;

/// Draws skipped in place of an absent octave in the sequential layout.
const OCTAVE_DRAW_COUNT: i32 = 262;

/// Octave stack. `noise_levels[0]` is the lowest frequency octave.
#[derive(Debug, Clone)]
pub struct PerlinNoise {
    noise_levels: Vec<Option<ImprovedNoise>>,
    amplitudes: Vec<f64>,
    first_octave: i32,
    lowest_freq_input_factor: f64,
    lowest_freq_value_factor: f64,
    max_value: f64,
}

impl PerlinNoise {
    /// Positional construction: each octave seeds from `octave_<n>` of a
    /// factory forked off `random`.
    #[must_use]
    pub fn create(random: &mut RandomSource, first_octave: i32, amplitudes: &[f64]) -> Self {
        let splitter = random.next_positional();
        let noise_levels = amplitudes
            .iter()
            .enumerate()
            .map(|(i, &amplitude)| {
                (amplitude != 0.0).then(|| {
                    let octave = first_octave + i as i32;
                    ImprovedNoise::new(&mut splitter.with_hash_of(&format!("octave_{octave}")))
                })
            })
            .collect();

        Self::from_parts(noise_levels, amplitudes, first_octave)
    }

    /// Sequential construction used by legacy worlds and the blended terrain noise.
    ///
    /// The octave at frequency 1 is drawn first, then lower octaves in
    /// descending order. Octaves with zero amplitude still consume their
    /// draws so the remaining octaves line up.
    #[must_use]
    pub fn create_legacy(random: &mut RandomSource, first_octave: i32, amplitudes: &[f64]) -> Self {
        let octaves = amplitudes.len() as i32;
        let zero_octave_index = -first_octave;
        let mut noise_levels = vec![None; amplitudes.len()];

        let first = ImprovedNoise::new(random);
        if (0..octaves).contains(&zero_octave_index)
            && amplitudes[zero_octave_index as usize] != 0.0
        {
            noise_levels[zero_octave_index as usize] = Some(first);
        }

        for index in (0..zero_octave_index).rev() {
            if index < octaves && amplitudes[index as usize] != 0.0 {
                noise_levels[index as usize] = Some(ImprovedNoise::new(random));
            } else {
                random.consume_count(OCTAVE_DRAW_COUNT);
            }
        }

        if zero_octave_index >= octaves {
            log::warn!(
                "perlin noise with first octave {first_octave} has no octave at frequency 1"
            );
        }

        Self::from_parts(noise_levels, amplitudes, first_octave)
    }

    /// Legacy construction from a contiguous octave range such as `-15..=0`,
    /// with every amplitude set to one.
    #[must_use]
    pub fn create_legacy_for_blended_noise(
        random: &mut RandomSource,
        octaves: std::ops::RangeInclusive<i32>,
    ) -> Self {
        let first_octave = *octaves.start();
        let amplitudes = vec![1.0; octaves.count()];
        Self::create_legacy(random, first_octave, &amplitudes)
    }

    fn from_parts(
        noise_levels: Vec<Option<ImprovedNoise>>,
        amplitudes: &[f64],
        first_octave: i32,
    ) -> Self {
        let octaves = amplitudes.len() as i32;
        let lowest_freq_input_factor = 2.0_f64.powi(first_octave);
        let lowest_freq_value_factor = 2.0_f64.powi(octaves - 1) / (2.0_f64.powi(octaves) - 1.0);

        let mut noise = Self {
            noise_levels,
            amplitudes: amplitudes.to_vec(),
            first_octave,
            lowest_freq_input_factor,
            lowest_freq_value_factor,
            max_value: 0.0,
        };
        noise.max_value = noise.edge_value(2.0);
        noise
    }

    /// Sum of `|amplitude| * noise_value` over present octaves, weighted per octave.
    #[must_use]
    pub fn edge_value(&self, noise_value: f64) -> f64 {
        let mut value = 0.0;
        let mut value_factor = self.lowest_freq_value_factor;
        for (level, amplitude) in self.noise_levels.iter().zip(&self.amplitudes) {
            if level.is_some() {
                value += amplitude * noise_value * value_factor;
            }
            value_factor /= 2.0;
        }
        value
    }

    /// Bound used by the blended terrain noise, which samples with a Y scale.
    #[must_use]
    pub fn max_broken_value(&self, y_scale: f64) -> f64 {
        self.edge_value(y_scale + 2.0)
    }

    #[inline]
    #[must_use]
    pub fn get_value(&self, x: f64, y: f64, z: f64) -> f64 {
        self.get_value_with_y_params(x, y, z, 0.0, 0.0, false)
    }

    /// Samples every octave. `y_flat_hack` pins Y to each octave's own origin.
    #[allow(clippy::too_many_arguments)]
    #[must_use]
    pub fn get_value_with_y_params(
        &self,
        x: f64,
        y: f64,
        z: f64,
        y_scale: f64,
        y_max: f64,
        y_flat_hack: bool,
    ) -> f64 {
        let mut value = 0.0;
        let mut input_factor = self.lowest_freq_input_factor;
        let mut value_factor = self.lowest_freq_value_factor;

        for (level, amplitude) in self.noise_levels.iter().zip(&self.amplitudes) {
            if let Some(noise) = level {
                let sample = noise.noise_with_y_scale(
                    wrap(x * input_factor),
                    if y_flat_hack {
                        -noise.yo
                    } else {
                        wrap(y * input_factor)
                    },
                    wrap(z * input_factor),
                    y_scale * input_factor,
                    y_max * input_factor,
                );
                value += amplitude * sample * value_factor;
            }
            input_factor *= 2.0;
            value_factor /= 2.0;
        }

        value
    }

    #[inline]
    #[must_use]
    pub const fn max_value(&self) -> f64 {
        self.max_value
    }

    #[inline]
    #[must_use]
    pub const fn first_octave(&self) -> i32 {
        self.first_octave
    }

    /// Octave by index counted from the highest frequency.
    #[must_use]
    pub fn get_octave_noise(&self, i: usize) -> Option<&ImprovedNoise> {
        let len = self.noise_levels.len();
        if i >= len {
            return None;
        }
        self.noise_levels[len - 1 - i].as_ref()
    }
}

#[inline]
#[must_use]
pub fn wrap(x: f64) -> f64 {
    x - (x / ROUND_OFF + 0.5).floor() * ROUND_OFF
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::WorldgenRandomAlgorithm;

    fn source(seed: u64) -> RandomSource {
        WorldgenRandomAlgorithm::Xoroshiro.new_instance(seed)
    }

    fn legacy_source(seed: u64) -> RandomSource {
        WorldgenRandomAlgorithm::Legacy.new_instance(seed)
    }

    #[test]
    fn test_deterministic() {
        let a = PerlinNoise::create(&mut source(12345), -3, &[1.0, 1.0, 1.0]);
        let b = PerlinNoise::create(&mut source(12345), -3, &[1.0, 1.0, 1.0]);
        assert_eq!(
            a.get_value(100.0, 64.0, 100.0).to_bits(),
            b.get_value(100.0, 64.0, 100.0).to_bits()
        );
    }

    #[test]
    fn test_sequential_creations_differ() {
        let mut random = source(12345);
        let a = PerlinNoise::create(&mut random, -3, &[1.0, 1.0, 1.0]);
        let b = PerlinNoise::create(&mut random, -3, &[1.0, 1.0, 1.0]);
        assert!((a.get_value(100.0, 64.0, 100.0) - b.get_value(100.0, 64.0, 100.0)).abs() > 1e-6);
    }

    #[test]
    fn test_zero_amplitudes_leave_holes() {
        let noise = PerlinNoise::create(&mut source(1), -2, &[1.0, 0.0, 1.0]);
        assert!(noise.noise_levels[0].is_some());
        assert!(noise.noise_levels[1].is_none());
        assert!(noise.noise_levels[2].is_some());
    }

    #[test]
    fn test_legacy_skips_keep_alignment() {
        // The frequency-1 octave is drawn first, so it is identical whether or
        // not lower octaves are present.
        let full = PerlinNoise::create_legacy(&mut legacy_source(7), -2, &[1.0, 1.0, 1.0]);
        let sparse = PerlinNoise::create_legacy(&mut legacy_source(7), -2, &[1.0, 0.0, 1.0]);
        let full_top = full.get_octave_noise(0).map(|n| n.xo.to_bits());
        let sparse_top = sparse.get_octave_noise(0).map(|n| n.xo.to_bits());
        assert_eq!(full_top, sparse_top);

        let full_bottom = full.get_octave_noise(2).map(|n| n.xo.to_bits());
        let sparse_bottom = sparse.get_octave_noise(2).map(|n| n.xo.to_bits());
        assert_eq!(full_bottom, sparse_bottom);
    }

    #[test]
    fn test_blended_range_builds_all_octaves() {
        let noise = PerlinNoise::create_legacy_for_blended_noise(&mut source(3), -15..=0);
        assert_eq!(noise.noise_levels.len(), 16);
        assert!(noise.noise_levels.iter().all(Option::is_some));
        assert_eq!(noise.first_octave(), -15);
    }

    #[test]
    fn test_values_within_max() {
        let noise = PerlinNoise::create(&mut source(42), -4, &[1.0, 1.0, 1.0, 1.0]);
        for i in 0..50 {
            let v = noise.get_value(f64::from(i) * 37.1, 12.5, f64::from(i) * -11.3);
            assert!(v.abs() <= noise.max_value());
        }
    }

    #[test]
    fn test_wrap() {
        assert!((wrap(100.0) - 100.0).abs() < 1e-10);
        assert!((wrap(-100.0) + 100.0).abs() < 1e-10);
        assert!(wrap(100_000_000.0).abs() < ROUND_OFF);
    }
}
