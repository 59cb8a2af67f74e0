//! Density function components.
//!
//! A density function maps a block position to a scalar. The generator treats
//! `density > 0` as solid ground and anything else as open space, which the
//! aquifer may then fill.
//!
//! # Component categories
//!
//! Independent components read nothing but the position:
//! - [`Constant`], [`ClampedYGradient`]
//! - [`Noise`], [`ShiftA`], [`ShiftB`], [`Shift`], [`BlendedNoiseSampler`]
//!
//! Dependent components read earlier entries of the component stack:
//! - [`Linear`], [`Binary`], [`Unary`], [`Clamp`], [`RangeChoice`]
//! - [`ShiftedNoise`], [`WeirdScaled`], [`Slide`], [`TerrainShaperSpline`]
//!
//! Every component reports static `[min, max]` bounds through
//! [`NoiseFunctionComponentRange`]. The combinators use them to skip
//! evaluating operands whose value cannot change the result.

use enum_dispatch::enum_dispatch;

#[allow(unused_imports)] // referenced by `enum_dispatch`-generated impls
use super::chunk_density_function::ChunkSpecificNoiseFunctionComponent;
use super::chunk_density_function::SampleOptions;
use super::component::base_noise_router::WrapperType;
#[allow(unused_imports)] // referenced by `enum_dispatch`-generated impls
use super::component::proto_noise_router::{
    DependentProtoNoiseFunctionComponent, IndependentProtoNoiseFunctionComponent,
    ProtoNoiseFunctionComponent,
};

pub mod math;
pub mod misc;
pub mod noise;
pub mod terrain_shaper;

pub use math::{Binary, Clamp, Constant, Linear, Unary};
pub use misc::{ClampedYGradient, RangeChoice, Slide, WeirdScaled};
pub use noise::{BlendedNoiseSampler, Noise, Shift, ShiftA, ShiftB, ShiftedNoise};
pub use terrain_shaper::{CubicSpline, TerrainShaper, TerrainShaperSpline};

/// A block position a density function is sampled at.
pub trait NoisePos {
    fn x(&self) -> i32;
    fn y(&self) -> i32;
    fn z(&self) -> i32;
}

/// Maps an index of an array being filled to the position of that entry.
///
/// Mappers that belong to the session sweep also move the session cursor and
/// generation stamps through `sample_options`.
pub trait IndexToNoisePos {
    fn at(
        &self,
        index: usize,
        sample_options: Option<&mut SampleOptions>,
    ) -> impl NoisePos + 'static;
}

#[enum_dispatch]
pub trait StaticIndependentChunkNoiseFunctionComponentImpl {
    fn sample(&self, pos: &impl NoisePos) -> f64;

    fn fill(&self, array: &mut [f64], mapper: &impl IndexToNoisePos) {
        array.iter_mut().enumerate().for_each(|(index, value)| {
            let pos = mapper.at(index, None);
            *value = self.sample(&pos);
        });
    }
}

/// A plain block position.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct UnblendedNoisePos {
    x: i32,
    y: i32,
    z: i32,
}

impl UnblendedNoisePos {
    #[must_use]
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }
}

impl NoisePos for UnblendedNoisePos {
    #[inline]
    fn x(&self) -> i32 {
        self.x
    }

    #[inline]
    fn y(&self) -> i32 {
        self.y
    }

    #[inline]
    fn z(&self) -> i32 {
        self.z
    }
}

#[enum_dispatch]
pub trait NoiseFunctionComponentRange {
    fn min(&self) -> f64;
    fn max(&self) -> f64;
}

/// A stack entry that a chunk session replaces with a cache or interpolator.
#[derive(Clone, Copy, Debug)]
pub struct Wrapper {
    pub input_index: usize,
    pub wrapper_type: WrapperType,
    min_value: f64,
    max_value: f64,
}

impl Wrapper {
    #[must_use]
    pub const fn new(
        input_index: usize,
        wrapper_type: WrapperType,
        min_value: f64,
        max_value: f64,
    ) -> Self {
        Self {
            input_index,
            wrapper_type,
            min_value,
            max_value,
        }
    }
}

impl NoiseFunctionComponentRange for Wrapper {
    #[inline]
    fn min(&self) -> f64 {
        self.min_value
    }

    #[inline]
    fn max(&self) -> f64 {
        self.max_value
    }
}

/// A stack entry that forwards to another one with its own bounds.
///
/// Blend densities become pass-throughs: with no blending data they return
/// their input unchanged but still report unbounded ranges.
#[derive(Clone, Copy, Debug)]
pub struct PassThrough {
    input_index: usize,
    min_value: f64,
    max_value: f64,
}

impl PassThrough {
    #[must_use]
    pub const fn new(input_index: usize, min_value: f64, max_value: f64) -> Self {
        Self {
            input_index,
            min_value,
            max_value,
        }
    }

    #[must_use]
    pub const fn input_index(&self) -> usize {
        self.input_index
    }
}

impl NoiseFunctionComponentRange for PassThrough {
    #[inline]
    fn min(&self) -> f64 {
        self.min_value
    }

    #[inline]
    fn max(&self) -> f64 {
        self.max_value
    }
}
