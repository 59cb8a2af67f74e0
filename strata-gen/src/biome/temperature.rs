//! Position-dependent biome temperature.

use std::sync::LazyLock;

use strata_noise::noise::PerlinSimplexNoise;
use strata_noise::random::legacy_random::LegacyRandom;

/// Cools blocks above `y = 80`.
static TEMPERATURE_NOISE: LazyLock<PerlinSimplexNoise> =
    LazyLock::new(|| PerlinSimplexNoise::new(&mut LegacyRandom::from_seed(1234), 0));
static FROZEN_TEMPERATURE_NOISE: LazyLock<PerlinSimplexNoise> =
    LazyLock::new(|| PerlinSimplexNoise::new(&mut LegacyRandom::from_seed(3456), -2));
static BIOME_INFO_NOISE: LazyLock<PerlinSimplexNoise> =
    LazyLock::new(|| PerlinSimplexNoise::new(&mut LegacyRandom::from_seed(2345), 0));

/// Temperature the frozen modifier assigns to its warm patches.
const FROZEN_WARM_PATCH: f32 = 0.2;

/// How a biome's base temperature varies across the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TemperatureModifier {
    None,
    /// Frozen oceans have patches that read as slightly warm.
    Frozen,
}

impl TemperatureModifier {
    #[must_use]
    pub fn modify(self, x: i32, z: i32, temperature: f32) -> f32 {
        match self {
            Self::None => temperature,
            Self::Frozen => {
                let (fx, fz) = (f64::from(x), f64::from(z));
                let frozen = FROZEN_TEMPERATURE_NOISE.get_value(fx * 0.05, fz * 0.05) * 7.0;
                let info = BIOME_INFO_NOISE.get_value(fx * 0.2, fz * 0.2);
                if frozen + info < 0.3 && BIOME_INFO_NOISE.get_value(fx * 0.09, fz * 0.09) < 0.8 {
                    FROZEN_WARM_PATCH
                } else {
                    temperature
                }
            }
        }
    }
}

/// The modified temperature, lowered with height above `y = 80`.
#[must_use]
pub fn height_adjusted(
    modifier: TemperatureModifier,
    base: f32,
    x: i32,
    y: i32,
    z: i32,
) -> f32 {
    let temperature = modifier.modify(x, z, base);
    if y <= 80 {
        return temperature;
    }
    let noise = (TEMPERATURE_NOISE
        .get_value(f64::from(x as f32 / 8.0), f64::from(z as f32 / 8.0))
        * 8.0) as f32;
    temperature - (noise + y as f32 - 80.0) * 0.05 / 40.0
}
