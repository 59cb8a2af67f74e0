use super::Biome;
use super::climate::{Parameter, ParameterList, ParameterPoint, TargetPoint};

/// Picks the biome of a quart from its sampled climate.
pub trait BiomeSource: Send + Sync {
    /// `last_result` carries state between neighboring lookups of one chunk;
    /// sources that search may use it as a starting guess.
    fn noise_biome(&self, target: &TargetPoint, last_result: &mut Option<usize>) -> Biome;
}

/// One biome everywhere.
#[derive(Clone, Copy, Debug)]
pub struct FixedBiomeSource(pub Biome);

impl BiomeSource for FixedBiomeSource {
    fn noise_biome(&self, _target: &TargetPoint, _last_result: &mut Option<usize>) -> Biome {
        self.0
    }
}

/// Nearest-climate lookup over a parameter list.
#[derive(Clone, Debug)]
pub struct MultiNoiseBiomeSource {
    parameters: ParameterList<Biome>,
}

// Climate bands of the overworld layout.
const FULL: (f32, f32) = (-1.0, 1.0);
const FROZEN: (f32, f32) = (-1.0, -0.45);
const UNFROZEN: (f32, f32) = (-0.45, 1.0);
const TEMPERATE: (f32, f32) = (-0.45, 0.55);
const HOT: (f32, f32) = (0.55, 1.0);
const DRY: (f32, f32) = (-1.0, 0.1);
const HUMID: (f32, f32) = (0.1, 1.0);
const DEEP_OCEAN: (f32, f32) = (-1.05, -0.455);
const OCEAN: (f32, f32) = (-0.455, -0.19);
const COAST: (f32, f32) = (-0.19, -0.11);
const INLAND: (f32, f32) = (-0.11, 1.0);
const RIVER_BANKS: (f32, f32) = (-0.19, 1.0);
const VALLEY_FLOOR: (f32, f32) = (0.55, 1.0);
const VALLEY: (f32, f32) = (-0.05, 0.05);
/// Surface biomes cover depths from the surface to one unit below it.
const SURFACE_DEPTH: (f32, f32) = (0.0, 1.0);

fn surface(
    temperature: (f32, f32),
    humidity: (f32, f32),
    continentalness: (f32, f32),
    erosion: (f32, f32),
    weirdness: (f32, f32),
) -> ParameterPoint {
    let span = |(min, max): (f32, f32)| Parameter::span(min, max);
    ParameterPoint {
        temperature: span(temperature),
        humidity: span(humidity),
        continentalness: span(continentalness),
        erosion: span(erosion),
        depth: span(SURFACE_DEPTH),
        weirdness: span(weirdness),
        offset: 0,
    }
}

impl MultiNoiseBiomeSource {
    #[must_use]
    pub fn new(parameters: ParameterList<Biome>) -> Self {
        Self { parameters }
    }

    /// A coarse overworld layout: oceans by continentalness, rivers in
    /// eroded valleys, and land biomes by temperature and humidity.
    #[must_use]
    pub fn overworld() -> Self {
        Self::new(ParameterList::new(vec![
            (surface(FROZEN, FULL, DEEP_OCEAN, FULL, FULL), Biome::DeepFrozenOcean),
            (surface(UNFROZEN, FULL, DEEP_OCEAN, FULL, FULL), Biome::DeepOcean),
            (surface(FROZEN, FULL, OCEAN, FULL, FULL), Biome::FrozenOcean),
            (surface(UNFROZEN, FULL, OCEAN, FULL, FULL), Biome::Ocean),
            (surface(TEMPERATE, FULL, COAST, FULL, FULL), Biome::Beach),
            (surface(UNFROZEN, FULL, RIVER_BANKS, VALLEY_FLOOR, VALLEY), Biome::River),
            (surface(FROZEN, FULL, INLAND, FULL, FULL), Biome::SnowyPlains),
            (surface(HOT, DRY, INLAND, FULL, FULL), Biome::Desert),
            (surface(HOT, HUMID, INLAND, FULL, (-1.0, 0.0)), Biome::Badlands),
            (surface(HOT, HUMID, INLAND, FULL, (0.0, 1.0)), Biome::ErodedBadlands),
            (surface(TEMPERATE, HUMID, INLAND, FULL, FULL), Biome::Forest),
            (surface(TEMPERATE, DRY, INLAND, FULL, FULL), Biome::Plains),
        ]))
    }

    #[must_use]
    pub fn parameters(&self) -> &ParameterList<Biome> {
        &self.parameters
    }
}

impl BiomeSource for MultiNoiseBiomeSource {
    fn noise_biome(&self, target: &TargetPoint, last_result: &mut Option<usize>) -> Biome {
        *self.parameters.find_value_cached(target, last_result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn biome_at(temperature: f64, humidity: f64, continentalness: f64, weirdness: f64) -> Biome {
        let target =
            TargetPoint::from_floats(temperature, humidity, continentalness, 0.0, 0.0, weirdness);
        MultiNoiseBiomeSource::overworld().noise_biome(&target, &mut None)
    }

    #[test]
    fn test_overworld_layout() {
        assert_eq!(biome_at(-0.8, 0.0, -0.6, 0.3), Biome::DeepFrozenOcean);
        assert_eq!(biome_at(0.0, 0.0, -0.3, 0.3), Biome::Ocean);
        assert_eq!(biome_at(0.0, 0.0, -0.15, 0.3), Biome::Beach);
        assert_eq!(biome_at(0.8, -0.5, 0.4, 0.3), Biome::Desert);
        assert_eq!(biome_at(0.8, 0.5, 0.4, 0.3), Biome::ErodedBadlands);
        assert_eq!(biome_at(0.8, 0.5, 0.4, -0.3), Biome::Badlands);
        assert_eq!(biome_at(0.0, -0.5, 0.4, 0.3), Biome::Plains);
        assert_eq!(biome_at(-0.9, -0.5, 0.4, 0.3), Biome::SnowyPlains);
    }

    #[test]
    fn test_fixed_source() {
        let source = FixedBiomeSource(Biome::Badlands);
        assert_eq!(source.noise_biome(&TargetPoint::default(), &mut None), Biome::Badlands);
    }
}
