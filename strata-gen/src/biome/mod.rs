//! Biomes and the sources that place them.

pub mod climate;
mod source;
pub mod temperature;

use serde::{Deserialize, Serialize};

pub use climate::{Parameter, ParameterList, ParameterPoint, TargetPoint};
pub use source::{BiomeSource, FixedBiomeSource, MultiNoiseBiomeSource};
pub use temperature::TemperatureModifier;

/// The overworld surface biomes the generator knows how to dress.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Biome {
    #[serde(rename = "minecraft:plains")]
    Plains,
    #[serde(rename = "minecraft:forest")]
    Forest,
    #[serde(rename = "minecraft:snowy_plains")]
    SnowyPlains,
    #[serde(rename = "minecraft:desert")]
    Desert,
    #[serde(rename = "minecraft:badlands")]
    Badlands,
    #[serde(rename = "minecraft:eroded_badlands")]
    ErodedBadlands,
    #[serde(rename = "minecraft:river")]
    River,
    #[serde(rename = "minecraft:beach")]
    Beach,
    #[serde(rename = "minecraft:ocean")]
    Ocean,
    #[serde(rename = "minecraft:deep_ocean")]
    DeepOcean,
    #[serde(rename = "minecraft:frozen_ocean")]
    FrozenOcean,
    #[serde(rename = "minecraft:deep_frozen_ocean")]
    DeepFrozenOcean,
}

impl Biome {
    pub const ALL: [Self; 12] = [
        Self::Plains,
        Self::Forest,
        Self::SnowyPlains,
        Self::Desert,
        Self::Badlands,
        Self::ErodedBadlands,
        Self::River,
        Self::Beach,
        Self::Ocean,
        Self::DeepOcean,
        Self::FrozenOcean,
        Self::DeepFrozenOcean,
    ];

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Plains => "minecraft:plains",
            Self::Forest => "minecraft:forest",
            Self::SnowyPlains => "minecraft:snowy_plains",
            Self::Desert => "minecraft:desert",
            Self::Badlands => "minecraft:badlands",
            Self::ErodedBadlands => "minecraft:eroded_badlands",
            Self::River => "minecraft:river",
            Self::Beach => "minecraft:beach",
            Self::Ocean => "minecraft:ocean",
            Self::DeepOcean => "minecraft:deep_ocean",
            Self::FrozenOcean => "minecraft:frozen_ocean",
            Self::DeepFrozenOcean => "minecraft:deep_frozen_ocean",
        }
    }

    #[must_use]
    pub fn by_name(name: &str) -> Option<Self> {
        let path = name.strip_prefix("minecraft:").unwrap_or(name);
        Self::ALL
            .into_iter()
            .find(|biome| biome.name().strip_prefix("minecraft:") == Some(path))
    }

    /// Temperature before any position-dependent adjustment.
    #[must_use]
    pub const fn base_temperature(self) -> f32 {
        match self {
            Self::Plains | Self::Beach => 0.8,
            Self::Forest => 0.7,
            Self::SnowyPlains | Self::FrozenOcean => 0.0,
            Self::Desert | Self::Badlands | Self::ErodedBadlands => 2.0,
            Self::River | Self::Ocean | Self::DeepOcean | Self::DeepFrozenOcean => 0.5,
        }
    }

    #[must_use]
    pub const fn temperature_modifier(self) -> TemperatureModifier {
        if self.is_frozen_ocean() {
            TemperatureModifier::Frozen
        } else {
            TemperatureModifier::None
        }
    }

    /// Temperature at a block, after the biome's modifier and height cooling.
    #[must_use]
    pub fn temperature(self, x: i32, y: i32, z: i32) -> f32 {
        temperature::height_adjusted(self.temperature_modifier(), self.base_temperature(), x, y, z)
    }

    /// Icebergs in warmer frozen ocean patches are cut two blocks shorter.
    #[must_use]
    pub fn melts_icebergs_slightly(self, x: i32, y: i32, z: i32) -> bool {
        self.temperature(x, y, z) > 0.1
    }

    #[must_use]
    pub const fn is_frozen_ocean(self) -> bool {
        matches!(self, Self::FrozenOcean | Self::DeepFrozenOcean)
    }

    #[must_use]
    pub const fn is_ocean(self) -> bool {
        matches!(
            self,
            Self::Ocean | Self::DeepOcean | Self::FrozenOcean | Self::DeepFrozenOcean
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_round_trip() {
        for biome in Biome::ALL {
            assert_eq!(Biome::by_name(biome.name()), Some(biome));
            let json = serde_json::to_string(&biome).unwrap();
            assert_eq!(json, format!("\"{}\"", biome.name()));
        }
        assert_eq!(Biome::by_name("eroded_badlands"), Some(Biome::ErodedBadlands));
        assert_eq!(Biome::by_name("minecraft:nether_wastes"), None);
    }

    #[test]
    fn test_iceberg_melting_follows_warm_patches() {
        let mut melting = 0;
        let mut solid = 0;
        for x in (-4096..4096).step_by(64) {
            for z in (-4096..4096).step_by(64) {
                // Warm patches lift only the frozen ocean above the threshold.
                assert!(Biome::DeepFrozenOcean.melts_icebergs_slightly(x, 63, z));
                let warm = TemperatureModifier::Frozen.modify(x, z, 0.0) > 0.1;
                assert_eq!(Biome::FrozenOcean.melts_icebergs_slightly(x, 63, z), warm);
                if warm {
                    melting += 1;
                } else {
                    solid += 1;
                }
            }
        }
        assert!(melting > 0 && solid > 0);
    }

    #[test]
    fn test_unmodified_biomes_keep_base_temperature_at_sea_level() {
        for biome in [Biome::Plains, Biome::Desert, Biome::SnowyPlains, Biome::Ocean] {
            assert_eq!(biome.temperature(100, 63, -100), biome.base_temperature());
        }
        assert!(Biome::Plains.temperature(100, 200, -100) < Biome::Plains.base_temperature());
    }
}
