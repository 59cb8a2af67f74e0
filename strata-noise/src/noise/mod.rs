//! Seeded gradient noise.
//!
//! - [`ImprovedNoise`]: single-octave Perlin noise with a shuffled permutation table
//! - [`PerlinNoise`]: a stack of octaves with per-octave amplitudes
//! - [`NormalNoise`]: two Perlin stacks summed at slightly offset frequencies
//! - [`PerlinSimplexNoise`]: 2D simplex octaves for biome temperature
//! - [`NoiseParameters`]: the registry of named octave/amplitude settings

mod improved_noise;
mod noise_params;
mod normal_noise;
mod perlin_noise;
mod simplex_noise;

pub use improved_noise::ImprovedNoise;
pub use noise_params::NoiseParameters;
pub use normal_noise::NormalNoise;
pub use perlin_noise::{PerlinNoise, wrap};
pub use simplex_noise::{PerlinSimplexNoise, SimplexNoise};

pub use crate::math::{clamped_lerp, clamped_map, floor_div, lerp_f32, map};
