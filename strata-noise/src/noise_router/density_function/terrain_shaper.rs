//! Terrain shaping splines.
//!
//! The overworld's offset, factor and jaggedness are nested cubic splines
//! over four climate coordinates. The ridges coordinate is the weirdness
//! folded into peaks and valleys.

use std::sync::Arc;

use crate::math::{clamp, lerp_f32};
use crate::noise_router::chunk_density_function::SampleOptions;
use crate::noise_router::component::base_noise_router::{TerrainShaperSplineData, TerrainSplineType};
use crate::noise_router::component::chunk_noise_router::{
    ChunkNoiseFunctionComponent, StaticChunkNoiseFunctionComponentImpl,
};

use super::{IndexToNoisePos, NoiseFunctionComponentRange, NoisePos};

/// Added to the offset spline so sea level sits at depth zero.
const GLOBAL_OFFSET: f32 = -0.503_75;

/// The input a spline is evaluated along.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SplineCoordinate {
    Continents,
    Erosion,
    Ridges,
    Weirdness,
}

/// The climate values a terrain spline reads.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SplinePoint {
    pub continents: f32,
    pub erosion: f32,
    pub ridges: f32,
    pub weirdness: f32,
}

impl SplinePoint {
    #[must_use]
    pub fn new(continents: f32, erosion: f32, weirdness: f32) -> Self {
        Self {
            continents,
            erosion,
            ridges: peaks_and_valleys(weirdness),
            weirdness,
        }
    }

    #[inline]
    const fn coordinate(&self, coordinate: SplineCoordinate) -> f32 {
        match coordinate {
            SplineCoordinate::Continents => self.continents,
            SplineCoordinate::Erosion => self.erosion,
            SplineCoordinate::Ridges => self.ridges,
            SplineCoordinate::Weirdness => self.weirdness,
        }
    }
}

/// Folds weirdness into the ridges coordinate: -1 in valleys, 1 on peaks.
#[must_use]
pub fn peaks_and_valleys(weirdness: f32) -> f32 {
    -((weirdness.abs() - 0.666_666_7).abs() - 0.333_333_34) * 3.0
}

/// A piecewise cubic Hermite spline whose control values may be splines
/// themselves.
#[derive(Clone, Debug, PartialEq)]
pub enum CubicSpline {
    Constant(f32),
    Multipoint {
        coordinate: SplineCoordinate,
        locations: Box<[f32]>,
        values: Box<[CubicSpline]>,
        derivatives: Box<[f32]>,
    },
}

impl From<f32> for CubicSpline {
    fn from(value: f32) -> Self {
        Self::Constant(value)
    }
}

impl CubicSpline {
    #[must_use]
    pub fn builder(coordinate: SplineCoordinate) -> SplineBuilder {
        SplineBuilder {
            coordinate,
            locations: Vec::new(),
            values: Vec::new(),
            derivatives: Vec::new(),
        }
    }

    #[must_use]
    pub fn apply(&self, point: &SplinePoint) -> f32 {
        let (coordinate, locations, values, derivatives) = match self {
            Self::Constant(value) => return *value,
            Self::Multipoint {
                coordinate,
                locations,
                values,
                derivatives,
            } => (coordinate, locations, values, derivatives),
        };

        let location = point.coordinate(*coordinate);
        let last = locations.len() - 1;
        let above = locations.partition_point(|&l| l <= location);

        if above == 0 {
            return values[0].apply(point) + derivatives[0] * (location - locations[0]);
        }
        let index = above - 1;
        if index == last {
            return values[last].apply(point) + derivatives[last] * (location - locations[last]);
        }

        let lower = locations[index];
        let upper = locations[index + 1];
        let t = (location - lower) / (upper - lower);
        let lower_value = values[index].apply(point);
        let upper_value = values[index + 1].apply(point);
        let lower_slope = derivatives[index] * (upper - lower) - (upper_value - lower_value);
        let upper_slope = -derivatives[index + 1] * (upper - lower) + (upper_value - lower_value);

        lerp_f32(t, lower_value, upper_value)
            + t * (1.0 - t) * lerp_f32(t, lower_slope, upper_slope)
    }
}

pub struct SplineBuilder {
    coordinate: SplineCoordinate,
    locations: Vec<f32>,
    values: Vec<CubicSpline>,
    derivatives: Vec<f32>,
}

impl SplineBuilder {
    #[must_use]
    pub fn point(self, location: f32, value: impl Into<CubicSpline>) -> Self {
        self.point_with_derivative(location, value, 0.0)
    }

    #[must_use]
    pub fn point_with_derivative(
        mut self,
        location: f32,
        value: impl Into<CubicSpline>,
        derivative: f32,
    ) -> Self {
        debug_assert!(
            self.locations.last().is_none_or(|&last| location > last),
            "spline locations must ascend"
        );
        self.locations.push(location);
        self.values.push(value.into());
        self.derivatives.push(derivative);
        self
    }

    #[must_use]
    pub fn build(self) -> CubicSpline {
        CubicSpline::Multipoint {
            coordinate: self.coordinate,
            locations: self.locations.into_boxed_slice(),
            values: self.values.into_boxed_slice(),
            derivatives: self.derivatives.into_boxed_slice(),
        }
    }
}

/// The three overworld terrain splines.
#[derive(Clone, Debug, PartialEq)]
pub struct TerrainShaper {
    offset: CubicSpline,
    factor: CubicSpline,
    jaggedness: CubicSpline,
}

impl TerrainShaper {
    #[must_use]
    pub fn overworld() -> Self {
        use SplineCoordinate::Continents;

        let coast = erosion_offset_spline(-0.15, 0.0, 0.0, 0.1, 0.0, -0.03, false, false);
        let near_inland = erosion_offset_spline(-0.1, 0.03, 0.1, 0.1, 0.01, -0.03, false, false);
        let mid_inland = erosion_offset_spline(-0.1, 0.03, 0.1, 0.7, 0.01, -0.03, true, true);
        let far_inland = erosion_offset_spline(-0.05, 0.03, 0.1, 1.0, 0.01, 0.01, true, true);

        let offset = CubicSpline::builder(Continents)
            .point(-1.1, 0.044)
            .point(-1.02, -0.2222)
            .point(-0.51, -0.2222)
            .point(-0.44, -0.12)
            .point(-0.18, -0.12)
            .point(-0.16, coast.clone())
            .point(-0.15, coast)
            .point(-0.1, near_inland)
            .point(0.25, mid_inland)
            .point(1.0, far_inland)
            .build();

        let factor = CubicSpline::builder(Continents)
            .point(-0.19, 3.95)
            .point(-0.15, erosion_factor(6.25, true))
            .point(-0.1, erosion_factor(5.47, true))
            .point(0.03, erosion_factor(5.08, true))
            .point(0.06, erosion_factor(4.69, false))
            .build();

        let jaggedness = CubicSpline::builder(Continents)
            .point(-0.11, 0.0)
            .point(0.03, erosion_jaggedness_spline(1.0, 0.5, 0.0, 0.0))
            .point(0.65, erosion_jaggedness_spline(1.0, 1.0, 1.0, 0.0))
            .build();

        Self {
            offset,
            factor,
            jaggedness,
        }
    }

    #[must_use]
    pub fn offset(&self, point: &SplinePoint) -> f32 {
        self.offset.apply(point) + GLOBAL_OFFSET
    }

    #[must_use]
    pub fn factor(&self, point: &SplinePoint) -> f32 {
        self.factor.apply(point)
    }

    #[must_use]
    pub fn jaggedness(&self, point: &SplinePoint) -> f32 {
        self.jaggedness.apply(point)
    }

    #[must_use]
    pub fn sample(&self, spline: TerrainSplineType, point: &SplinePoint) -> f32 {
        match spline {
            TerrainSplineType::Offset => self.offset(point),
            TerrainSplineType::Factor => self.factor(point),
            TerrainSplineType::Jaggedness => self.jaggedness(point),
        }
    }
}

impl Default for TerrainShaper {
    fn default() -> Self {
        Self::overworld()
    }
}

fn erosion_jaggedness_spline(
    high_erosion_high_weirdness: f32,
    low_erosion_high_weirdness: f32,
    high_erosion_mid_weirdness: f32,
    low_erosion_mid_weirdness: f32,
) -> CubicSpline {
    let high = ridge_jaggedness_spline(high_erosion_high_weirdness, high_erosion_mid_weirdness);
    let low = ridge_jaggedness_spline(low_erosion_high_weirdness, low_erosion_mid_weirdness);
    CubicSpline::builder(SplineCoordinate::Erosion)
        .point(-1.0, high)
        .point(-0.78, low.clone())
        .point(-0.5775, low)
        .point(-0.375, 0.0)
        .build()
}

fn ridge_jaggedness_spline(high_weirdness: f32, mid_weirdness: f32) -> CubicSpline {
    let low = peaks_and_valleys(0.4);
    let high = peaks_and_valleys(0.566_666_66);
    let mid = (low + high) / 2.0;

    let mid_value = if mid_weirdness > 0.0 {
        weirdness_jaggedness_spline(mid_weirdness)
    } else {
        CubicSpline::Constant(0.0)
    };
    let high_value = if high_weirdness > 0.0 {
        weirdness_jaggedness_spline(high_weirdness)
    } else {
        CubicSpline::Constant(0.0)
    };

    CubicSpline::builder(SplineCoordinate::Ridges)
        .point(low, 0.0)
        .point(mid, mid_value)
        .point(1.0, high_value)
        .build()
}

fn weirdness_jaggedness_spline(magnitude: f32) -> CubicSpline {
    CubicSpline::builder(SplineCoordinate::Weirdness)
        .point(-0.01, 0.63 * magnitude)
        .point(0.01, 0.3 * magnitude)
        .build()
}

fn erosion_factor(value: f32, shattered: bool) -> CubicSpline {
    use SplineCoordinate::{Erosion, Ridges, Weirdness};

    let base = CubicSpline::builder(Weirdness)
        .point(-0.2, 6.3)
        .point(0.2, value)
        .build();
    let builder = CubicSpline::builder(Erosion)
        .point(-0.6, base.clone())
        .point(
            -0.5,
            CubicSpline::builder(Weirdness).point(-0.05, 6.3).point(0.05, 2.67).build(),
        )
        .point(-0.35, base.clone())
        .point(-0.25, base.clone())
        .point(
            -0.1,
            CubicSpline::builder(Weirdness).point(-0.05, 2.67).point(0.05, 6.3).build(),
        )
        .point(0.03, base.clone());

    if shattered {
        let weirdness = CubicSpline::builder(Weirdness)
            .point(0.0, value)
            .point(0.1, 0.625)
            .build();
        let ridges = CubicSpline::builder(Ridges)
            .point(-0.9, value)
            .point(-0.69, weirdness)
            .build();
        builder
            .point(0.35, value)
            .point(0.45, ridges.clone())
            .point(0.55, ridges)
            .point(0.62, value)
            .build()
    } else {
        let valleys = CubicSpline::builder(Ridges)
            .point(-0.7, base.clone())
            .point(-0.15, 1.37)
            .build();
        let peaks = CubicSpline::builder(Ridges)
            .point(0.45, base)
            .point(0.7, 1.56)
            .build();
        builder
            .point(0.05, peaks.clone())
            .point(0.4, peaks)
            .point(0.45, valleys.clone())
            .point(0.55, valleys)
            .point(0.58, value)
            .build()
    }
}

#[inline]
fn slope(y1: f32, y2: f32, x1: f32, x2: f32) -> f32 {
    (y2 - y1) / (x2 - x1)
}

fn mountain_continentalness(ridges: f32, magnitude: f32, cutoff: f32) -> f32 {
    let scale = 1.0 - (1.0 - magnitude) * 0.5;
    let bias = 0.5 * (1.0 - magnitude);
    let value = (ridges + 1.17) * 0.460_829_47 * scale - bias;
    if ridges < cutoff {
        value.max(-0.2222)
    } else {
        value.max(0.0)
    }
}

fn mountain_ridge_zero_continentalness(magnitude: f32) -> f32 {
    let scale = 1.0 - (1.0 - magnitude) * 0.5;
    let bias = 0.5 * (1.0 - magnitude);
    bias / (0.460_829_47 * scale) - 1.17
}

fn mountain_ridge_spline(magnitude: f32, use_max_slope: bool) -> CubicSpline {
    let builder = CubicSpline::builder(SplineCoordinate::Ridges);
    let at_min = mountain_continentalness(-1.0, magnitude, -0.7);
    let at_max = mountain_continentalness(1.0, magnitude, -0.7);
    let zero = mountain_ridge_zero_continentalness(magnitude);

    if -0.65 < zero && zero < 1.0 {
        let at_dip = mountain_continentalness(-0.65, magnitude, -0.7);
        let at_shoulder = mountain_continentalness(-0.75, magnitude, -0.7);
        let low_slope = slope(at_min, at_shoulder, -1.0, -0.75);
        let at_zero = mountain_continentalness(zero, magnitude, -0.7);
        let high_slope = slope(at_zero, at_max, zero, 1.0);
        builder
            .point_with_derivative(-1.0, at_min, low_slope)
            .point(-0.75, at_shoulder)
            .point(-0.65, at_dip)
            .point(zero - 0.01, at_zero)
            .point_with_derivative(zero, at_zero, high_slope)
            .point_with_derivative(1.0, at_max, high_slope)
            .build()
    } else {
        let full_slope = slope(at_min, at_max, -1.0, 1.0);
        let builder = if use_max_slope {
            builder
                .point(-1.0, at_min.max(0.2))
                .point_with_derivative(0.0, lerp_f32(0.5, at_min, at_max), full_slope)
        } else {
            builder.point_with_derivative(-1.0, at_min, full_slope)
        };
        builder.point_with_derivative(1.0, at_max, full_slope).build()
    }
}

#[allow(clippy::too_many_arguments, clippy::fn_params_excessive_bools)]
fn erosion_offset_spline(
    low: f32,
    mid: f32,
    high: f32,
    mountain: f32,
    plain: f32,
    swamp: f32,
    extended: bool,
    use_max_slope: bool,
) -> CubicSpline {
    let mountains_high = mountain_ridge_spline(lerp_f32(mountain, 0.6, 1.5), use_max_slope);
    let mountains_mid = mountain_ridge_spline(lerp_f32(mountain, 0.6, 1.0), use_max_slope);
    let mountains_low = mountain_ridge_spline(mountain, use_max_slope);
    let hills = ridge_spline(
        low - 0.15,
        0.5 * mountain,
        lerp_f32(0.5, 0.5, 0.5) * mountain,
        0.5 * mountain,
        0.6 * mountain,
        0.5,
    );
    let plateaus = ridge_spline(low, plain * mountain, mid * mountain, 0.5 * mountain, 0.6 * mountain, 0.5);
    let plains = ridge_spline(low, plain, plain, mid, high, 0.5);
    let plains_extended = ridge_spline(low, plain, plain, mid, high, 0.5);
    let shattered = CubicSpline::builder(SplineCoordinate::Ridges)
        .point(-1.0, low)
        .point(-0.4, plains.clone())
        .point(0.0, high + 0.07)
        .build();
    let swamps = ridge_spline(-0.02, swamp, swamp, mid, high, 0.0);

    let builder = CubicSpline::builder(SplineCoordinate::Erosion)
        .point(-0.85, mountains_high)
        .point(-0.7, mountains_mid)
        .point(-0.4, mountains_low)
        .point(-0.35, hills)
        .point(-0.1, plateaus)
        .point(0.2, plains);
    let builder = if extended {
        builder
            .point(0.4, plains_extended.clone())
            .point(0.45, shattered.clone())
            .point(0.55, shattered)
            .point(0.58, plains_extended)
    } else {
        builder
    };
    builder.point(0.7, swamps).build()
}

fn ridge_spline(
    valley: f32,
    low: f32,
    mid: f32,
    high: f32,
    peak: f32,
    min_valley_slope: f32,
) -> CubicSpline {
    let valley_slope = (0.5 * (low - valley)).max(min_valley_slope);
    let mid_slope = 5.0 * (mid - low);
    CubicSpline::builder(SplineCoordinate::Ridges)
        .point_with_derivative(-1.0, valley, valley_slope)
        .point_with_derivative(-0.4, low, valley_slope.min(mid_slope))
        .point_with_derivative(0.0, mid, mid_slope)
        .point_with_derivative(0.4, high, 2.0 * (high - mid))
        .point_with_derivative(1.0, peak, 0.7 * (peak - high))
        .build()
}

/// Evaluates one of the terrain splines at the climate of the sampled
/// position, clamped to its declared bounds.
#[derive(Clone, Debug)]
pub struct TerrainShaperSpline {
    pub continents_index: usize,
    pub erosion_index: usize,
    pub weirdness_index: usize,
    shaper: Arc<TerrainShaper>,
    data: TerrainShaperSplineData,
}

impl TerrainShaperSpline {
    #[must_use]
    pub const fn new(
        continents_index: usize,
        erosion_index: usize,
        weirdness_index: usize,
        shaper: Arc<TerrainShaper>,
        data: TerrainShaperSplineData,
    ) -> Self {
        Self {
            continents_index,
            erosion_index,
            weirdness_index,
            shaper,
            data,
        }
    }

    #[inline]
    fn evaluate(&self, continents: f64, erosion: f64, weirdness: f64) -> f64 {
        let point = SplinePoint::new(continents as f32, erosion as f32, weirdness as f32);
        clamp(
            f64::from(self.shaper.sample(self.data.spline, &point)),
            self.data.min_value,
            self.data.max_value,
        )
    }
}

impl NoiseFunctionComponentRange for TerrainShaperSpline {
    #[inline]
    fn min(&self) -> f64 {
        self.data.min_value
    }

    #[inline]
    fn max(&self) -> f64 {
        self.data.max_value
    }
}

impl StaticChunkNoiseFunctionComponentImpl for TerrainShaperSpline {
    fn sample(
        &self,
        component_stack: &mut [ChunkNoiseFunctionComponent],
        pos: &impl NoisePos,
        sample_options: &SampleOptions,
    ) -> f64 {
        let continents = ChunkNoiseFunctionComponent::sample_from_stack(
            &mut component_stack[..=self.continents_index],
            pos,
            sample_options,
        );
        let erosion = ChunkNoiseFunctionComponent::sample_from_stack(
            &mut component_stack[..=self.erosion_index],
            pos,
            sample_options,
        );
        let weirdness = ChunkNoiseFunctionComponent::sample_from_stack(
            &mut component_stack[..=self.weirdness_index],
            pos,
            sample_options,
        );
        self.evaluate(continents, erosion, weirdness)
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_peaks_and_valleys_folds_weirdness() {
        assert!((peaks_and_valleys(0.0) + 1.0).abs() < 1e-6);
        assert!((peaks_and_valleys(2.0 / 3.0) - 1.0).abs() < 1e-6);
        assert!((peaks_and_valleys(-2.0 / 3.0) - 1.0).abs() < 1e-6);
        assert!((peaks_and_valleys(0.4) - 0.2).abs() < 1e-5);
    }

    #[test]
    fn test_spline_hits_control_values() {
        let spline = CubicSpline::builder(SplineCoordinate::Continents)
            .point(-1.0, 2.0)
            .point(0.0, -1.0)
            .point(1.0, 4.0)
            .build();
        let at = |c: f32| spline.apply(&SplinePoint::new(c, 0.0, 0.0));
        assert_eq!(at(-1.0), 2.0);
        assert_eq!(at(0.0), -1.0);
        assert_eq!(at(1.0), 4.0);
        // Zero end derivatives hold the end values flat outside the range.
        assert_eq!(at(-3.0), 2.0);
        assert_eq!(at(5.0), 4.0);
    }

    #[test]
    fn test_spline_extrapolates_along_end_derivatives() {
        let spline = CubicSpline::builder(SplineCoordinate::Erosion)
            .point_with_derivative(0.0, 1.0, 2.0)
            .point_with_derivative(1.0, 3.0, 2.0)
            .build();
        let at = |e: f32| spline.apply(&SplinePoint::new(0.0, e, 0.0));
        assert!((at(-1.0) + 1.0).abs() < 1e-6);
        assert!((at(2.0) - 5.0).abs() < 1e-6);
        // Matching slopes reduce the Hermite segment to a straight line.
        assert!((at(0.5) - 2.0).abs() < 1e-6);
    }

    #[test]
    fn test_nested_splines_read_their_own_coordinate() {
        let inner = CubicSpline::builder(SplineCoordinate::Weirdness)
            .point(-1.0, 0.0)
            .point(1.0, 10.0)
            .build();
        let outer = CubicSpline::builder(SplineCoordinate::Continents)
            .point(0.0, inner)
            .point(1.0, 1.0)
            .build();
        let low = outer.apply(&SplinePoint::new(0.0, 0.0, -1.0));
        let high = outer.apply(&SplinePoint::new(0.0, 0.0, 1.0));
        assert_eq!(low, 0.0);
        assert_eq!(high, 10.0);
    }

    #[test]
    fn test_deep_ocean_offset_is_below_sea_level() {
        let shaper = TerrainShaper::overworld();
        let point = SplinePoint::new(-0.8, 0.0, 0.0);
        assert!((shaper.offset(&point) - (-0.2222 + GLOBAL_OFFSET)).abs() < 1e-6);
    }

    #[test]
    fn test_overworld_splines_stay_in_router_bounds() {
        let shaper = TerrainShaper::overworld();
        for c in -12..=12 {
            for e in -10..=10 {
                for w in -10..=10 {
                    let point = SplinePoint::new(c as f32 / 10.0, e as f32 / 10.0, w as f32 / 10.0);
                    let factor = shaper.factor(&point);
                    let jaggedness = shaper.jaggedness(&point);
                    assert!(factor.is_finite());
                    assert!((-0.01..=1.3).contains(&jaggedness), "{jaggedness}");
                }
            }
        }
    }
}
