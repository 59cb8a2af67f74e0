//! Double Perlin noise: two octave stacks summed, the second at a slightly
//! higher frequency so their lattices never line up.

use crate::noise::{NoiseParameters, PerlinNoise};
use crate::random::{PositionalRandom, RandomSource, RandomSplitter};

#[allow(clippy::unreadable_literal)]
pub const INPUT_FACTOR: f64 = 1.0181268882175227;

#[allow(clippy::unreadable_literal)]
const TARGET_DEVIATION: f64 = 0.16666666666666666;

#[derive(Debug, Clone)]
pub struct NormalNoise {
    first: PerlinNoise,
    second: PerlinNoise,
    value_factor: f64,
    max_value: f64,
}

impl NormalNoise {
    /// Builds both halves from one stream, in order.
    #[must_use]
    pub fn create_from_random(
        random: &mut RandomSource,
        first_octave: i32,
        amplitudes: &[f64],
    ) -> Self {
        let first = PerlinNoise::create(random, first_octave, amplitudes);
        let second = PerlinNoise::create(random, first_octave, amplitudes);
        Self::finish(first, second, amplitudes)
    }

    /// Builds both halves with the sequential octave layout. Legacy worlds use
    /// this for their temperature and vegetation noises.
    #[must_use]
    pub fn create_legacy_nether_biome(
        random: &mut RandomSource,
        first_octave: i32,
        amplitudes: &[f64],
    ) -> Self {
        let first = PerlinNoise::create_legacy(random, first_octave, amplitudes);
        let second = PerlinNoise::create_legacy(random, first_octave, amplitudes);
        Self::finish(first, second, amplitudes)
    }

    /// Instantiates registry parameters from the stream keyed by their id.
    #[must_use]
    pub fn instantiate(splitter: &RandomSplitter, parameters: &NoiseParameters) -> Self {
        let mut random = splitter.with_hash_of(parameters.id);
        Self::create_from_random(&mut random, parameters.first_octave, parameters.amplitudes)
    }

    fn finish(first: PerlinNoise, second: PerlinNoise, amplitudes: &[f64]) -> Self {
        let mut min_octave = i32::MAX;
        let mut max_octave = i32::MIN;
        for (i, &amplitude) in amplitudes.iter().enumerate() {
            if amplitude != 0.0 {
                min_octave = min_octave.min(i as i32);
                max_octave = max_octave.max(i as i32);
            }
        }

        // An all-zero amplitude list leaves the span at i32::MIN - i32::MAX, which wraps to 1.
        let value_factor =
            TARGET_DEVIATION / expected_deviation(max_octave.wrapping_sub(min_octave));
        let max_value = (first.max_value() + second.max_value()) * value_factor;

        Self {
            first,
            second,
            value_factor,
            max_value,
        }
    }

    #[inline]
    #[must_use]
    pub fn get_value(&self, x: f64, y: f64, z: f64) -> f64 {
        let x2 = x * INPUT_FACTOR;
        let y2 = y * INPUT_FACTOR;
        let z2 = z * INPUT_FACTOR;
        (self.first.get_value(x, y, z) + self.second.get_value(x2, y2, z2)) * self.value_factor
    }

    #[inline]
    #[must_use]
    pub const fn max_value(&self) -> f64 {
        self.max_value
    }
}

#[inline]
fn expected_deviation(octave_span: i32) -> f64 {
    0.1 * (1.0 + 1.0 / f64::from(octave_span + 1))
}

#[cfg(test)]
#[allow(clippy::unreadable_literal)]
mod tests {
    use super::*;
    use crate::random::{Random, WorldgenRandomAlgorithm};

    fn splitter(seed: u64) -> RandomSplitter {
        WorldgenRandomAlgorithm::Xoroshiro
            .new_instance(seed)
            .next_positional()
    }

    #[test]
    fn test_instantiate_is_deterministic() {
        let a = NormalNoise::instantiate(&splitter(12345), &NoiseParameters::SURFACE);
        let b = NormalNoise::instantiate(&splitter(12345), &NoiseParameters::SURFACE);
        assert_eq!(
            a.get_value(100.0, 64.0, 100.0).to_bits(),
            b.get_value(100.0, 64.0, 100.0).to_bits()
        );
    }

    #[test]
    fn test_different_ids_differ() {
        let s = splitter(1);
        let a = NormalNoise::instantiate(&s, &NoiseParameters::SURFACE);
        let b = NormalNoise::instantiate(&s, &NoiseParameters::BADLANDS_SURFACE);
        assert!((a.get_value(10.0, 0.0, 10.0) - b.get_value(10.0, 0.0, 10.0)).abs() > 1e-9);
    }

    #[test]
    fn test_values_within_max() {
        let noise = NormalNoise::instantiate(&splitter(42), &NoiseParameters::CONTINENTALNESS);
        for i in 0..64 {
            let v = noise.get_value(f64::from(i) * 13.7, 0.0, f64::from(i) * 7.9);
            assert!(v.abs() <= noise.max_value());
        }
    }

    #[test]
    fn test_silent_noise_is_zero() {
        let mut random = WorldgenRandomAlgorithm::Xoroshiro.new_instance(3);
        let noise = NormalNoise::create_from_random(&mut random, 0, &[0.0]);
        assert_eq!(noise.get_value(12.5, 3.0, -8.25), 0.0);
        assert_eq!(noise.max_value(), 0.0);
    }

    #[test]
    fn test_expected_deviation() {
        assert!((expected_deviation(0) - 0.2).abs() < 1e-10);
        assert!((expected_deviation(1) - 0.15).abs() < 1e-10);
        assert!((expected_deviation(2) - 0.13333333333333333).abs() < 1e-10);
    }
}
