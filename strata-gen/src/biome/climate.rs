//! Climate points and nearest-biome lookup.
//!
//! Climate values are quantized to integers (scaled by 10000) before any
//! distance is taken, so lookups do not depend on float rounding.

use strata_noise::noise_router::ClimateSample;

pub const QUANTIZATION_FACTOR: f32 = 10_000.0;
/// The six climate axes plus the offset axis.
pub const PARAMETER_COUNT: usize = 7;

/// `(long)((float) coord * 10000.0F)`.
#[inline]
#[must_use]
pub fn quantize_coord(coord: f64) -> i64 {
    ((coord as f32) * QUANTIZATION_FACTOR) as i64
}

#[inline]
#[must_use]
pub fn unquantize_coord(coord: i64) -> f32 {
    coord as f32 / QUANTIZATION_FACTOR
}

/// A sampled, quantized climate point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TargetPoint {
    pub temperature: i64,
    pub humidity: i64,
    pub continentalness: i64,
    pub erosion: i64,
    pub depth: i64,
    pub weirdness: i64,
}

impl TargetPoint {
    #[must_use]
    pub fn from_floats(
        temperature: f64,
        humidity: f64,
        continentalness: f64,
        erosion: f64,
        depth: f64,
        weirdness: f64,
    ) -> Self {
        Self {
            temperature: quantize_coord(temperature),
            humidity: quantize_coord(humidity),
            continentalness: quantize_coord(continentalness),
            erosion: quantize_coord(erosion),
            depth: quantize_coord(depth),
            weirdness: quantize_coord(weirdness),
        }
    }

    /// The point with a zero offset coordinate appended.
    #[must_use]
    pub const fn to_parameter_array(&self) -> [i64; PARAMETER_COUNT] {
        [
            self.temperature,
            self.humidity,
            self.continentalness,
            self.erosion,
            self.depth,
            self.weirdness,
            0,
        ]
    }
}

impl From<&ClimateSample> for TargetPoint {
    fn from(sample: &ClimateSample) -> Self {
        let [temperature, humidity, continentalness, erosion, depth, weirdness] =
            sample.quantized();
        Self {
            temperature,
            humidity,
            continentalness,
            erosion,
            depth,
            weirdness,
        }
    }
}

/// A closed range on one climate axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Parameter {
    pub min: i64,
    pub max: i64,
}

impl Parameter {
    #[must_use]
    pub const fn new(min: i64, max: i64) -> Self {
        Self { min, max }
    }

    #[must_use]
    pub fn point(value: f32) -> Self {
        Self::span(value, value)
    }

    #[must_use]
    pub fn span(min: f32, max: f32) -> Self {
        debug_assert!(min <= max, "min > max: {min} > {max}");
        Self {
            min: (min * QUANTIZATION_FACTOR) as i64,
            max: (max * QUANTIZATION_FACTOR) as i64,
        }
    }

    /// Zero inside the range, otherwise the gap to the nearest end.
    #[inline]
    #[must_use]
    pub const fn distance(&self, target: i64) -> i64 {
        let above = target - self.max;
        let below = self.min - target;
        if above > 0 {
            above
        } else if below > 0 {
            below
        } else {
            0
        }
    }
}

/// Where a biome sits in climate space.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParameterPoint {
    pub temperature: Parameter,
    pub humidity: Parameter,
    pub continentalness: Parameter,
    pub erosion: Parameter,
    pub depth: Parameter,
    pub weirdness: Parameter,
    /// Pushes the biome away from every target, quantized.
    pub offset: i64,
}

impl ParameterPoint {
    #[must_use]
    pub const fn parameter_space(&self) -> [Parameter; PARAMETER_COUNT] {
        [
            self.temperature,
            self.humidity,
            self.continentalness,
            self.erosion,
            self.depth,
            self.weirdness,
            Parameter::new(self.offset, self.offset),
        ]
    }

    /// Squared distance to `target`; lower is a better match.
    #[must_use]
    pub fn fitness(&self, target: &TargetPoint) -> i64 {
        self.parameter_space()
            .iter()
            .zip(target.to_parameter_array())
            .map(|(parameter, value)| {
                let distance = parameter.distance(value);
                distance * distance
            })
            .sum()
    }
}

/// Biomes paired with their climate points.
#[derive(Debug, Clone)]
pub struct ParameterList<T> {
    values: Vec<(ParameterPoint, T)>,
}

impl<T> ParameterList<T> {
    /// # Panics
    ///
    /// Panics if `values` is empty.
    #[must_use]
    pub fn new(values: Vec<(ParameterPoint, T)>) -> Self {
        assert!(!values.is_empty(), "Need at least one value");
        Self { values }
    }

    #[must_use]
    pub fn values(&self) -> &[(ParameterPoint, T)] {
        &self.values
    }

    /// Nearest value to `target`. Ties keep the earlier entry.
    #[must_use]
    pub fn find_value(&self, target: &TargetPoint) -> &T {
        self.find_value_cached(target, &mut None)
    }

    /// Nearest value, starting from the previous result in `last_result`.
    ///
    /// The previous result only loses to a strictly closer entry, so ties
    /// keep whichever biome a neighboring lookup picked.
    pub fn find_value_cached(&self, target: &TargetPoint, last_result: &mut Option<usize>) -> &T {
        let mut best = last_result
            .filter(|&index| index < self.values.len())
            .map(|index| (index, self.values[index].0.fitness(target)));

        for (index, (point, _)) in self.values.iter().enumerate() {
            let fitness = point.fitness(target);
            if best.is_none_or(|(_, best_fitness)| fitness < best_fitness) {
                best = Some((index, fitness));
            }
        }

        let index = best.map_or(0, |(index, _)| index);
        *last_result = Some(index);
        &self.values[index].1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(temperature: Parameter, offset: i64) -> ParameterPoint {
        let full = Parameter::span(-1.0, 1.0);
        ParameterPoint {
            temperature,
            humidity: full,
            continentalness: full,
            erosion: full,
            depth: full,
            weirdness: full,
            offset,
        }
    }

    #[test]
    fn test_quantize_coord() {
        assert_eq!(quantize_coord(0.0), 0);
        assert_eq!(quantize_coord(1.0), 10_000);
        assert_eq!(quantize_coord(-0.5), -5000);
        assert!((unquantize_coord(-10_000) - -1.0).abs() < 1e-6);
    }

    #[test]
    fn test_parameter_distance() {
        let range = Parameter::span(-0.5, 0.5);
        assert_eq!(range.distance(0), 0);
        assert_eq!(range.distance(7000), 2000);
        assert_eq!(range.distance(-6000), 1000);
    }

    #[test]
    fn test_find_value_picks_nearest() {
        let list = ParameterList::new(vec![
            (point(Parameter::span(-1.0, -0.5), 0), "cold"),
            (point(Parameter::span(0.5, 1.0), 0), "hot"),
        ]);
        let warm = TargetPoint::from_floats(0.3, 0.0, 0.0, 0.0, 0.0, 0.0);
        assert_eq!(*list.find_value(&warm), "hot");
        let chilly = TargetPoint::from_floats(-0.2, 0.0, 0.0, 0.0, 0.0, 0.0);
        assert_eq!(*list.find_value(&chilly), "cold");
    }

    #[test]
    fn test_offset_penalizes() {
        let list = ParameterList::new(vec![
            (point(Parameter::span(-1.0, 1.0), 5000), "far"),
            (point(Parameter::span(-1.0, 1.0), 0), "near"),
        ]);
        assert_eq!(*list.find_value(&TargetPoint::default()), "near");
    }

    #[test]
    fn test_cached_lookup_keeps_tied_previous_result() {
        let everywhere = Parameter::span(-1.0, 1.0);
        let list = ParameterList::new(vec![
            (point(everywhere, 0), "first"),
            (point(everywhere, 0), "second"),
        ]);
        let mut last = Some(1);
        assert_eq!(*list.find_value_cached(&TargetPoint::default(), &mut last), "second");
        assert_eq!(last, Some(1));
        let mut cold = None;
        assert_eq!(*list.find_value_cached(&TargetPoint::default(), &mut cold), "first");
        assert_eq!(cold, Some(0));
    }
}
