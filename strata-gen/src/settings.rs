//! Generator settings, loadable from JSON.

use std::fs;
use std::path::Path;

use anyhow::{Context, ensure};
use serde::{Deserialize, Serialize};
use strata_noise::BlockStateId;
use strata_noise::noise_router::{FluidPicker, NoiseFillConfig, NoiseSettings};
use strata_noise::random::WorldgenRandomAlgorithm;

/// Lowest block a world may start at.
pub const MIN_BUILD_Y: i32 = -2032;
/// One past the highest block a world may reach.
pub const MAX_BUILD_Y: i32 = 2032;

/// Everything that shapes the terrain of a world apart from its seed.
///
/// Missing JSON fields fall back to the overworld values.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorSettings {
    pub noise: NoiseSettings,
    pub default_block: BlockStateId,
    pub default_fluid: BlockStateId,
    pub sea_level: i32,
    pub aquifers_enabled: bool,
    pub ore_veins_enabled: bool,
    /// Seeds noises with the 48-bit generator older worlds used.
    pub legacy_random_source: bool,
}

impl GeneratorSettings {
    #[must_use]
    pub const fn overworld() -> Self {
        Self {
            noise: NoiseSettings::overworld(),
            default_block: BlockStateId::STONE,
            default_fluid: BlockStateId::WATER,
            sea_level: 63,
            aquifers_enabled: true,
            ore_veins_enabled: true,
            legacy_random_source: false,
        }
    }

    /// Parses and validates settings from a JSON document.
    pub fn from_json(json: &str) -> anyhow::Result<Self> {
        let settings: Self =
            serde_json::from_str(json).context("failed to parse generator settings")?;
        settings.validate()?;
        Ok(settings)
    }

    /// Reads settings from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path)
            .with_context(|| format!("failed to read generator settings from {}", path.display()))?;
        Self::from_json(&json).with_context(|| format!("invalid settings in {}", path.display()))
    }

    /// Checks the shape constraints the chunk layout depends on.
    pub fn validate(&self) -> anyhow::Result<()> {
        let noise = &self.noise;
        ensure!(noise.height > 0, "height must be positive, got {}", noise.height);
        ensure!(
            noise.min_y % 16 == 0 && noise.height % 16 == 0,
            "min_y ({}) and height ({}) must be multiples of 16",
            noise.min_y,
            noise.height
        );
        ensure!(
            noise.min_y >= MIN_BUILD_Y && noise.min_y + noise.height <= MAX_BUILD_Y,
            "world from {} spanning {} blocks leaves the build range",
            noise.min_y,
            noise.height
        );
        ensure!(
            matches!(noise.size_horizontal, 1 | 2 | 4),
            "size_horizontal must divide a chunk, got {}",
            noise.size_horizontal
        );
        ensure!(
            noise.size_vertical > 0 && noise.height % noise.cell_height() == 0,
            "height {} is not a whole number of {}-block cells",
            noise.height,
            noise.cell_height()
        );
        ensure!(
            !self.default_block.is_air() && !self.default_block.is_fluid(),
            "default block {:?} must be solid",
            self.default_block
        );
        ensure!(
            self.default_fluid.is_fluid(),
            "default fluid {:?} is not a fluid",
            self.default_fluid
        );
        Ok(())
    }

    #[must_use]
    pub const fn random_algorithm(&self) -> WorldgenRandomAlgorithm {
        if self.legacy_random_source {
            WorldgenRandomAlgorithm::Legacy
        } else {
            WorldgenRandomAlgorithm::Xoroshiro
        }
    }

    /// Lava below `min(-54, sea_level)`, the default fluid up to sea level.
    #[must_use]
    pub fn fluid_picker(&self) -> FluidPicker {
        FluidPicker::new(self.sea_level, self.default_fluid)
    }

    #[must_use]
    pub fn fill_config(&self) -> NoiseFillConfig {
        NoiseFillConfig {
            picker: self.fluid_picker(),
            aquifers_enabled: self.aquifers_enabled,
            ore_veins_enabled: self.ore_veins_enabled,
        }
    }

    #[must_use]
    pub const fn section_count(&self) -> usize {
        (self.noise.height / 16) as usize
    }
}

impl Default for GeneratorSettings {
    fn default() -> Self {
        Self::overworld()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overworld_is_valid() {
        GeneratorSettings::overworld().validate().unwrap();
        assert_eq!(GeneratorSettings::overworld().section_count(), 24);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let settings = GeneratorSettings::from_json(
            r#"{ "sea_level": 40, "default_block": "minecraft:deepslate", "ore_veins_enabled": false }"#,
        )
        .unwrap();
        assert_eq!(settings.sea_level, 40);
        assert_eq!(settings.default_block, BlockStateId::DEEPSLATE);
        assert!(!settings.ore_veins_enabled);
        assert_eq!(settings.noise, NoiseSettings::overworld());
    }

    #[test]
    fn test_json_round_trip() {
        let settings = GeneratorSettings {
            legacy_random_source: true,
            ..GeneratorSettings::overworld()
        };
        let json = serde_json::to_string(&settings).unwrap();
        assert_eq!(GeneratorSettings::from_json(&json).unwrap(), settings);
        assert_eq!(settings.random_algorithm(), WorldgenRandomAlgorithm::Legacy);
    }

    #[test]
    fn test_rejects_bad_shapes() {
        let mut settings = GeneratorSettings::overworld();
        settings.noise.height = 100;
        assert!(settings.validate().is_err());

        let mut settings = GeneratorSettings::overworld();
        settings.default_fluid = BlockStateId::STONE;
        assert!(settings.validate().is_err());

        assert!(GeneratorSettings::from_json(r#"{ "default_block": "minecraft:cheese" }"#).is_err());
    }
}
