//! Large copper and iron ore veins placed during the noise fill.
//!
//! | Type   | Y band      | Ore                | Raw block          | Filler  |
//! |--------|-------------|--------------------|--------------------|---------|
//! | Copper | 0 to 50     | copper ore         | raw copper block   | granite |
//! | Iron   | -60 to -8   | deepslate iron ore | raw iron block     | tuff    |
//!
//! The sign of `vein_toggle` picks the type. Inside the type's band the vein
//! strength `|vein_toggle|` is ramped down over the 20 blocks nearest each
//! band edge. A point-hashed draw then gates the vein, `vein_ridged` must be
//! negative, and a second draw together with `vein_gap` chooses between ore
//! and filler. A third draw picks the rare raw ore block.

use crate::BlockStateId;
use crate::math::clamped_map;
use crate::random::{PositionalRandom, Random, RandomSplitter};

use super::chunk_density_function::SampleOptions;
use super::component::chunk_noise_router::ChunkNoiseRouter;
use super::density_function::NoisePos;

/// Minimum ramped vein strength, `(double) 0.4F`.
const VEIN_THRESHOLD: f64 = 0.4_f32 as f64;
/// Width of the edge ramp in blocks.
const EDGE_RAMP: f64 = 20.0;
/// Strength penalty at the very edge of the band, `(double) -0.2F`.
const EDGE_PENALTY: f64 = -0.2_f32 as f64;
const VEIN_SOLIDNESS: f32 = 0.7;
const MIN_RICHNESS: f64 = 0.1_f32 as f64;
const MAX_RICHNESS: f64 = 0.3_f32 as f64;
const MAX_RICHNESS_THRESHOLD: f64 = 0.6_f32 as f64;
const RAW_ORE_CHANCE: f32 = 0.02;
const SKIP_ORE_IF_GAP_BELOW: f64 = -0.3_f32 as f64;

/// The two vein kinds of the overworld.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VeinType {
    Copper,
    Iron,
}

impl VeinType {
    pub const ALL: [Self; 2] = [Self::Copper, Self::Iron];

    /// Type selected by a `vein_toggle` sample.
    #[inline]
    #[must_use]
    pub fn from_toggle(toggle: f64) -> Self {
        if toggle > 0.0 { Self::Copper } else { Self::Iron }
    }

    #[must_use]
    pub const fn ore(self) -> BlockStateId {
        match self {
            Self::Copper => BlockStateId::COPPER_ORE,
            Self::Iron => BlockStateId::DEEPSLATE_IRON_ORE,
        }
    }

    #[must_use]
    pub const fn raw_ore(self) -> BlockStateId {
        match self {
            Self::Copper => BlockStateId::RAW_COPPER_BLOCK,
            Self::Iron => BlockStateId::RAW_IRON_BLOCK,
        }
    }

    #[must_use]
    pub const fn filler(self) -> BlockStateId {
        match self {
            Self::Copper => BlockStateId::GRANITE,
            Self::Iron => BlockStateId::TUFF,
        }
    }

    /// Lowest Y of the band, inclusive.
    #[must_use]
    pub const fn min_y(self) -> i32 {
        match self {
            Self::Copper => 0,
            Self::Iron => -60,
        }
    }

    /// Highest Y of the band, inclusive.
    #[must_use]
    pub const fn max_y(self) -> i32 {
        match self {
            Self::Copper => 50,
            Self::Iron => -8,
        }
    }

    /// Blocks from `y` to the nearest band edge, or `None` outside the band.
    #[must_use]
    pub const fn distance_to_edge(self, y: i32) -> Option<i32> {
        let to_max = self.max_y() - y;
        let to_min = y - self.min_y();
        if to_min < 0 || to_max < 0 {
            None
        } else if to_min < to_max {
            Some(to_min)
        } else {
            Some(to_max)
        }
    }
}

/// Per-point ore vein override.
pub struct OreVeinSampler {
    random_deriver: RandomSplitter,
}

impl OreVeinSampler {
    #[must_use]
    pub fn new(random_deriver: RandomSplitter) -> Self {
        Self { random_deriver }
    }

    /// Vein block at `pos`, or `None` when no vein passes through it.
    ///
    /// `vein_ridged` is only read once the first draw passes and `vein_gap`
    /// only once the second one does, so cache counters see the same reads as
    /// the lazy evaluation order.
    pub fn sample(
        &self,
        router: &mut ChunkNoiseRouter,
        pos: &impl NoisePos,
        sample_options: &SampleOptions,
    ) -> Option<BlockStateId> {
        let toggle = router.vein_toggle(pos, sample_options);
        let vein = VeinType::from_toggle(toggle);
        let strength = toggle.abs();

        let edge_distance = vein.distance_to_edge(pos.y())?;
        let ramp = clamped_map(f64::from(edge_distance), 0.0, EDGE_RAMP, EDGE_PENALTY, 0.0);
        if strength + ramp < VEIN_THRESHOLD {
            return None;
        }

        let mut random = self.random_deriver.at(pos.x(), pos.y(), pos.z());
        if random.next_f32() > VEIN_SOLIDNESS {
            return None;
        }
        if router.vein_ridged(pos, sample_options) >= 0.0 {
            return None;
        }

        let richness = clamped_map(
            strength,
            VEIN_THRESHOLD,
            MAX_RICHNESS_THRESHOLD,
            MIN_RICHNESS,
            MAX_RICHNESS,
        );
        if f64::from(random.next_f32()) < richness
            && router.vein_gap(pos, sample_options) > SKIP_ORE_IF_GAP_BELOW
        {
            return Some(if random.next_f32() < RAW_ORE_CHANCE {
                vein.raw_ore()
            } else {
                vein.ore()
            });
        }
        Some(vein.filler())
    }
}
