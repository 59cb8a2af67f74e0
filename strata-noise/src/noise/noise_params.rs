//! Registry of named noise parameters.

/// Octave layout for a [`NormalNoise`](super::NormalNoise), keyed by a stable id.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NoiseParameters {
    pub id: &'static str,
    pub first_octave: i32,
    pub amplitudes: &'static [f64],
}

const fn params(id: &'static str, first_octave: i32, amplitudes: &'static [f64]) -> NoiseParameters {
    NoiseParameters {
        id,
        first_octave,
        amplitudes,
    }
}

const TEMPERATURE_AMPLITUDES: &[f64] = &[1.5, 0.0, 1.0, 0.0, 0.0, 0.0];
const VEGETATION_AMPLITUDES: &[f64] = &[1.0, 1.0, 0.0, 0.0, 0.0, 0.0];
const CONTINENTALNESS_AMPLITUDES: &[f64] = &[1.0, 1.0, 2.0, 2.0, 2.0, 1.0, 1.0, 1.0, 1.0];
const EROSION_AMPLITUDES: &[f64] = &[1.0, 1.0, 0.0, 1.0, 1.0];
const SINGLE: &[f64] = &[1.0];

impl NoiseParameters {
    pub const TEMPERATURE: Self = params("minecraft:temperature", -10, TEMPERATURE_AMPLITUDES);
    pub const VEGETATION: Self = params("minecraft:vegetation", -8, VEGETATION_AMPLITUDES);
    pub const CONTINENTALNESS: Self =
        params("minecraft:continentalness", -9, CONTINENTALNESS_AMPLITUDES);
    pub const EROSION: Self = params("minecraft:erosion", -9, EROSION_AMPLITUDES);
    pub const TEMPERATURE_LARGE: Self =
        params("minecraft:temperature_large", -12, TEMPERATURE_AMPLITUDES);
    pub const VEGETATION_LARGE: Self =
        params("minecraft:vegetation_large", -10, VEGETATION_AMPLITUDES);
    pub const CONTINENTALNESS_LARGE: Self = params(
        "minecraft:continentalness_large",
        -11,
        CONTINENTALNESS_AMPLITUDES,
    );
    pub const EROSION_LARGE: Self = params("minecraft:erosion_large", -11, EROSION_AMPLITUDES);
    pub const RIDGE: Self = params("minecraft:ridge", -7, &[1.0, 2.0, 1.0, 0.0, 0.0, 0.0]);
    pub const SHIFT: Self = params("minecraft:offset", -3, &[1.0, 1.0, 1.0, 0.0]);
    pub const AQUIFER_BARRIER: Self = params("minecraft:aquifer_barrier", -3, SINGLE);
    pub const AQUIFER_FLUID_LEVEL_FLOODEDNESS: Self =
        params("minecraft:aquifer_fluid_level_floodedness", -7, SINGLE);
    pub const AQUIFER_LAVA: Self = params("minecraft:aquifer_lava", -1, SINGLE);
    pub const AQUIFER_FLUID_LEVEL_SPREAD: Self =
        params("minecraft:aquifer_fluid_level_spread", -5, SINGLE);
    pub const PILLAR: Self = params("minecraft:pillar", -7, &[1.0, 1.0]);
    pub const PILLAR_RARENESS: Self = params("minecraft:pillar_rareness", -8, SINGLE);
    pub const PILLAR_THICKNESS: Self = params("minecraft:pillar_thickness", -8, SINGLE);
    pub const SPAGHETTI_2D: Self = params("minecraft:spaghetti_2d", -7, SINGLE);
    pub const SPAGHETTI_2D_ELEVATION: Self = params("minecraft:spaghetti_2d_elevation", -8, SINGLE);
    pub const SPAGHETTI_2D_MODULATOR: Self =
        params("minecraft:spaghetti_2d_modulator", -11, SINGLE);
    pub const SPAGHETTI_2D_THICKNESS: Self =
        params("minecraft:spaghetti_2d_thickness", -11, SINGLE);
    pub const SPAGHETTI_3D_1: Self = params("minecraft:spaghetti_3d_1", -7, SINGLE);
    pub const SPAGHETTI_3D_2: Self = params("minecraft:spaghetti_3d_2", -7, SINGLE);
    pub const SPAGHETTI_3D_RARITY: Self = params("minecraft:spaghetti_3d_rarity", -11, SINGLE);
    pub const SPAGHETTI_3D_THICKNESS: Self =
        params("minecraft:spaghetti_3d_thickness", -8, SINGLE);
    pub const SPAGHETTI_ROUGHNESS: Self = params("minecraft:spaghetti_roughness", -5, SINGLE);
    pub const SPAGHETTI_ROUGHNESS_MODULATOR: Self =
        params("minecraft:spaghetti_roughness_modulator", -8, SINGLE);
    pub const CAVE_ENTRANCE: Self = params("minecraft:cave_entrance", -7, &[0.4, 0.5, 1.0]);
    pub const CAVE_LAYER: Self = params("minecraft:cave_layer", -8, SINGLE);
    pub const CAVE_CHEESE: Self = params(
        "minecraft:cave_cheese",
        -8,
        &[0.5, 1.0, 2.0, 1.0, 2.0, 1.0, 0.0, 2.0, 0.0],
    );
    pub const ORE_VEININESS: Self = params("minecraft:ore_veininess", -8, SINGLE);
    pub const ORE_VEIN_A: Self = params("minecraft:ore_vein_a", -7, SINGLE);
    pub const ORE_VEIN_B: Self = params("minecraft:ore_vein_b", -7, SINGLE);
    pub const ORE_GAP: Self = params("minecraft:ore_gap", -5, SINGLE);
    pub const NOODLE: Self = params("minecraft:noodle", -8, SINGLE);
    pub const NOODLE_THICKNESS: Self = params("minecraft:noodle_thickness", -8, SINGLE);
    pub const NOODLE_RIDGE_A: Self = params("minecraft:noodle_ridge_a", -7, SINGLE);
    pub const NOODLE_RIDGE_B: Self = params("minecraft:noodle_ridge_b", -7, SINGLE);
    pub const JAGGED: Self = params("minecraft:jagged", -16, &[1.0; 16]);
    pub const SURFACE: Self = params("minecraft:surface", -6, &[1.0, 1.0, 1.0]);
    pub const SURFACE_SECONDARY: Self =
        params("minecraft:surface_secondary", -6, &[1.0, 1.0, 0.0, 1.0]);
    pub const CLAY_BANDS_OFFSET: Self = params("minecraft:clay_bands_offset", -8, SINGLE);
    pub const BADLANDS_PILLAR: Self =
        params("minecraft:badlands_pillar", -2, &[1.0, 1.0, 1.0, 1.0]);
    pub const BADLANDS_PILLAR_ROOF: Self = params("minecraft:badlands_pillar_roof", -8, SINGLE);
    pub const BADLANDS_SURFACE: Self = params("minecraft:badlands_surface", -6, &[1.0, 1.0, 1.0]);
    pub const ICEBERG_PILLAR: Self = params("minecraft:iceberg_pillar", -6, &[1.0, 1.0, 1.0, 1.0]);
    pub const ICEBERG_PILLAR_ROOF: Self = params("minecraft:iceberg_pillar_roof", -3, SINGLE);
    pub const ICEBERG_SURFACE: Self = params("minecraft:iceberg_surface", -6, &[1.0, 1.0, 1.0]);

    const ALL: &'static [Self] = &[
        Self::TEMPERATURE,
        Self::VEGETATION,
        Self::CONTINENTALNESS,
        Self::EROSION,
        Self::TEMPERATURE_LARGE,
        Self::VEGETATION_LARGE,
        Self::CONTINENTALNESS_LARGE,
        Self::EROSION_LARGE,
        Self::RIDGE,
        Self::SHIFT,
        Self::AQUIFER_BARRIER,
        Self::AQUIFER_FLUID_LEVEL_FLOODEDNESS,
        Self::AQUIFER_LAVA,
        Self::AQUIFER_FLUID_LEVEL_SPREAD,
        Self::PILLAR,
        Self::PILLAR_RARENESS,
        Self::PILLAR_THICKNESS,
        Self::SPAGHETTI_2D,
        Self::SPAGHETTI_2D_ELEVATION,
        Self::SPAGHETTI_2D_MODULATOR,
        Self::SPAGHETTI_2D_THICKNESS,
        Self::SPAGHETTI_3D_1,
        Self::SPAGHETTI_3D_2,
        Self::SPAGHETTI_3D_RARITY,
        Self::SPAGHETTI_3D_THICKNESS,
        Self::SPAGHETTI_ROUGHNESS,
        Self::SPAGHETTI_ROUGHNESS_MODULATOR,
        Self::CAVE_ENTRANCE,
        Self::CAVE_LAYER,
        Self::CAVE_CHEESE,
        Self::ORE_VEININESS,
        Self::ORE_VEIN_A,
        Self::ORE_VEIN_B,
        Self::ORE_GAP,
        Self::NOODLE,
        Self::NOODLE_THICKNESS,
        Self::NOODLE_RIDGE_A,
        Self::NOODLE_RIDGE_B,
        Self::JAGGED,
        Self::SURFACE,
        Self::SURFACE_SECONDARY,
        Self::CLAY_BANDS_OFFSET,
        Self::BADLANDS_PILLAR,
        Self::BADLANDS_PILLAR_ROOF,
        Self::BADLANDS_SURFACE,
        Self::ICEBERG_PILLAR,
        Self::ICEBERG_PILLAR_ROOF,
        Self::ICEBERG_SURFACE,
    ];

    /// Looks up parameters by id, with or without the `minecraft:` namespace.
    #[must_use]
    pub fn by_id(id: &str) -> Option<&'static Self> {
        let id = id.strip_prefix("minecraft:").unwrap_or(id);
        Self::ALL
            .iter()
            .find(|params| params.id.strip_prefix("minecraft:") == Some(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_by_id() {
        assert_eq!(
            NoiseParameters::by_id("minecraft:ridge").map(|p| p.first_octave),
            Some(-7)
        );
        assert_eq!(
            NoiseParameters::by_id("cave_cheese").map(|p| p.amplitudes.len()),
            Some(9)
        );
        assert!(NoiseParameters::by_id("minecraft:missing").is_none());
    }

    #[test]
    fn test_ids_are_unique() {
        for (i, a) in NoiseParameters::ALL.iter().enumerate() {
            for b in &NoiseParameters::ALL[i + 1..] {
                assert_ne!(a.id, b.id);
            }
        }
    }
}
