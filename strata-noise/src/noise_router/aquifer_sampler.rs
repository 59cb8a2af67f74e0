//! Underground water and lava placement.
//!
//! The world aquifer scatters one center per lattice cell of 16 by 12 by 16
//! blocks, jittered by a point-hashed random draw. Every center owns a
//! [`FluidLevel`] derived from the preliminary surface around it and from the
//! floodedness, spread and lava noises. A block in open space takes the fluid
//! of its nearest center. Where two or three centers are nearly equidistant a
//! barrier pressure is added to the density so that neighboring pockets with
//! different levels are separated by a stone wall instead of a cliff of water.
//!
//! [`SeaLevelAquiferSampler`] is the disabled variant: it fills open space
//! with the global fluid picker and nothing else.

#![allow(clippy::similar_names)]

use enum_dispatch::enum_dispatch;

use crate::BlockStateId;
use crate::math::{clamped_map, floor_div, map};
use crate::random::{PositionalRandom, Random, RandomSplitter};

use super::chunk_density_function::SampleOptions;
use super::component::chunk_noise_router::ChunkNoiseRouter;
use super::density_function::{NoisePos, UnblendedNoisePos};
use super::fluid_level::{FluidLevel, FluidPicker};
use super::surface_height_sampler::SurfaceHeightEstimator;

const X_RANGE: i32 = 10;
const Y_RANGE: i32 = 9;
const Z_RANGE: i32 = 10;
const X_SPACING: i32 = 16;
const Y_SPACING: i32 = 12;
const Z_SPACING: i32 = 16;
/// Upper bound on the distance from a block to its nearest center. Only
/// documents the lattice geometry.
#[allow(dead_code)]
const MAX_REASONABLE_DISTANCE_TO_AQUIFER_CENTER: i32 = 11;

/// Fluid level assigned to centers that are fully dry.
pub const WAY_BELOW_MIN_Y: i32 = -32_512;

/// Chunk offsets sampled around a center for the preliminary surface.
const SURFACE_SAMPLING_OFFSETS_IN_CHUNKS: [(i32, i32); 13] = [
    (-2, -1),
    (-1, -1),
    (0, -1),
    (1, -1),
    (-3, 0),
    (-2, 0),
    (-1, 0),
    (0, 0),
    (1, 0),
    (-2, 1),
    (-1, 1),
    (0, 1),
    (1, 1),
];

#[inline]
const fn grid_x(x: i32) -> i32 {
    floor_div(x, X_SPACING)
}

#[inline]
const fn grid_y(y: i32) -> i32 {
    floor_div(y, Y_SPACING)
}

#[inline]
const fn grid_z(z: i32) -> i32 {
    floor_div(z, Z_SPACING)
}

/// Similarity of two squared distances: 1 when equal, 0 when 25 apart.
#[inline]
fn similarity(first: i32, second: i32) -> f64 {
    1.0 - f64::from((second - first).abs()) / 25.0
}

/// Below this similarity a fluid block is not worth a fluid tick.
fn flowing_update_similarity() -> f64 {
    similarity(10 * 10, 12 * 12)
}

/// Borrowed state the aquifer needs from the session while resolving one block.
pub struct FluidSamplingContext<'a, 'r> {
    pub router: &'a mut ChunkNoiseRouter<'r>,
    pub estimator: &'a mut SurfaceHeightEstimator,
    pub sample_options: &'a SampleOptions,
}

#[enum_dispatch]
pub trait AquiferSamplerImpl {
    /// Substance at `pos` given its final density. `None` keeps the default
    /// solid block.
    fn compute_substance(
        &mut self,
        ctx: &mut FluidSamplingContext<'_, '_>,
        pos: &impl NoisePos,
        density: f64,
    ) -> Option<BlockStateId>;

    /// Whether the block returned by the last call needs a fluid tick.
    fn should_schedule_fluid_update(&self) -> bool;
}

#[enum_dispatch(AquiferSamplerImpl)]
pub enum AquiferSampler {
    SeaLevel(SeaLevelAquiferSampler),
    World(WorldAquiferSampler),
}

/// Aquifer used when aquifers are disabled.
pub struct SeaLevelAquiferSampler {
    picker: FluidPicker,
}

impl SeaLevelAquiferSampler {
    #[must_use]
    pub const fn new(picker: FluidPicker) -> Self {
        Self { picker }
    }
}

impl AquiferSamplerImpl for SeaLevelAquiferSampler {
    fn compute_substance(
        &mut self,
        _ctx: &mut FluidSamplingContext<'_, '_>,
        pos: &impl NoisePos,
        density: f64,
    ) -> Option<BlockStateId> {
        if density > 0.0 {
            return None;
        }
        let y = pos.y();
        Some(self.picker.compute_fluid(pos.x(), y, pos.z()).at(y))
    }

    fn should_schedule_fluid_update(&self) -> bool {
        false
    }
}

/// Noise-based aquifer of one chunk.
pub struct WorldAquiferSampler {
    picker: FluidPicker,
    random_deriver: RandomSplitter,
    min_grid_x: i32,
    min_grid_y: i32,
    min_grid_z: i32,
    grid_size_x: usize,
    grid_size_z: usize,
    status_cache: Box<[Option<FluidLevel>]>,
    /// Packed center positions, `i64::MAX` when not drawn yet.
    location_cache: Box<[i64]>,
    schedule_fluid_update: bool,
}

impl WorldAquiferSampler {
    /// Aquifer for chunk `(chunk_x, chunk_z)` over the noise range
    /// `min_y..min_y + height`.
    #[must_use]
    pub fn new(
        chunk_x: i32,
        chunk_z: i32,
        random_deriver: RandomSplitter,
        min_y: i32,
        height: i32,
        picker: FluidPicker,
    ) -> Self {
        let min_block_x = chunk_x * 16;
        let min_block_z = chunk_z * 16;

        let min_grid_x = grid_x(min_block_x) - 1;
        let max_grid_x = grid_x(min_block_x + 15) + 1;
        let min_grid_y = grid_y(min_y) - 1;
        let max_grid_y = grid_y(min_y + height) + 1;
        let min_grid_z = grid_z(min_block_z) - 1;
        let max_grid_z = grid_z(min_block_z + 15) + 1;

        let grid_size_x = (max_grid_x - min_grid_x + 1).unsigned_abs() as usize;
        let grid_size_y = (max_grid_y - min_grid_y + 1).unsigned_abs() as usize;
        let grid_size_z = (max_grid_z - min_grid_z + 1).unsigned_abs() as usize;
        let size = grid_size_x * grid_size_y * grid_size_z;

        log::trace!("aquifer for chunk {chunk_x},{chunk_z} spans {size} lattice cells");

        Self {
            picker,
            random_deriver,
            min_grid_x,
            min_grid_y,
            min_grid_z,
            grid_size_x,
            grid_size_z,
            status_cache: vec![None; size].into_boxed_slice(),
            location_cache: vec![i64::MAX; size].into_boxed_slice(),
            schedule_fluid_update: false,
        }
    }

    #[inline]
    #[allow(clippy::cast_sign_loss)]
    fn index(&self, grid_x: i32, grid_y: i32, grid_z: i32) -> usize {
        let x = (grid_x - self.min_grid_x) as usize;
        let y = (grid_y - self.min_grid_y) as usize;
        let z = (grid_z - self.min_grid_z) as usize;
        (y * self.grid_size_z + z) * self.grid_size_x + x
    }

    /// Jittered center of lattice cell `(grid_x, grid_y, grid_z)`, packed.
    fn center(&mut self, grid_x: i32, grid_y: i32, grid_z: i32) -> i64 {
        let index = self.index(grid_x, grid_y, grid_z);
        let cached = self.location_cache[index];
        if cached != i64::MAX {
            return cached;
        }

        let mut random = self.random_deriver.at(grid_x, grid_y, grid_z);
        let packed = block_pos::pack(
            grid_x * X_SPACING + random.next_i32_bounded(X_RANGE),
            grid_y * Y_SPACING + random.next_i32_bounded(Y_RANGE),
            grid_z * Z_SPACING + random.next_i32_bounded(Z_RANGE),
        );
        self.location_cache[index] = packed;
        packed
    }

    /// Fluid level owned by the center at `packed`, memoized per lattice cell.
    fn status(&mut self, ctx: &mut FluidSamplingContext<'_, '_>, packed: i64) -> FluidLevel {
        let (x, y, z) = block_pos::unpack(packed);
        let index = self.index(grid_x(x), grid_y(y), grid_z(z));
        if let Some(level) = self.status_cache[index] {
            return level;
        }
        let level = self.compute_fluid(ctx, x, y, z);
        self.status_cache[index] = Some(level);
        level
    }

    fn compute_fluid(
        &self,
        ctx: &mut FluidSamplingContext<'_, '_>,
        x: i32,
        y: i32,
        z: i32,
    ) -> FluidLevel {
        let global = self.picker.compute_fluid(x, y, z);
        let top_of_cell = y + 12;
        let bottom_of_cell = y - 12;
        let mut lowest_surface = i32::MAX;
        let mut center_under_global_fluid = false;

        for (chunk_dx, chunk_dz) in SURFACE_SAMPLING_OFFSETS_IN_CHUNKS {
            let sample_x = x + chunk_dx * 16;
            let sample_z = z + chunk_dz * 16;
            let surface = ctx
                .estimator
                .estimate_height(ctx.router, sample_x, sample_z);
            let fluid_check_y = surface.wrapping_add(8);
            let is_center = chunk_dx == 0 && chunk_dz == 0;

            if is_center && bottom_of_cell > fluid_check_y {
                return global;
            }

            let pokes_above_surface = top_of_cell > fluid_check_y;
            if pokes_above_surface || is_center {
                let surface_fluid = self.picker.compute_fluid(sample_x, fluid_check_y, sample_z);
                if !surface_fluid.at(fluid_check_y).is_air() {
                    if is_center {
                        center_under_global_fluid = true;
                    }
                    if pokes_above_surface {
                        return surface_fluid;
                    }
                }
            }

            lowest_surface = lowest_surface.min(surface);
        }

        let depth_below_surface = lowest_surface.wrapping_add(8).wrapping_sub(y);
        let flood_bias = if center_under_global_fluid {
            clamped_map(f64::from(depth_below_surface), 0.0, 64.0, 1.0, 0.0)
        } else {
            0.0
        };

        let floodedness = ctx
            .router
            .fluid_level_floodedness_noise(&UnblendedNoisePos::new(x, y, z), &SampleOptions::foreign())
            .clamp(-1.0, 1.0);
        if floodedness > map(flood_bias, 1.0, 0.0, -0.3, 0.8) {
            return global;
        }
        if floodedness <= map(flood_bias, 1.0, 0.0, -0.8, 0.4) {
            return FluidLevel::new(WAY_BELOW_MIN_Y, global.block());
        }

        let spread_y = floor_div(y, 40);
        let spread_pos = UnblendedNoisePos::new(floor_div(x, 16), spread_y, floor_div(z, 16));
        let spread = ctx
            .router
            .fluid_level_spread_noise(&spread_pos, &SampleOptions::foreign())
            * 10.0;
        let target = spread_y * 40 + 20 + quantize(spread, 3);
        let level = lowest_surface.min(target);

        if target <= -10 {
            let lava_pos =
                UnblendedNoisePos::new(floor_div(x, 64), floor_div(y, 40), floor_div(z, 64));
            let lava = ctx.router.lava_noise(&lava_pos, &SampleOptions::foreign());
            if lava.abs() > 0.3 {
                return FluidLevel::new(level, BlockStateId::LAVA);
            }
        }
        FluidLevel::new(level, global.block())
    }

    /// Barrier pressure between two fluid levels at `pos`. The barrier noise
    /// is read at most once per block through `barrier`.
    fn calculate_pressure(
        ctx: &mut FluidSamplingContext<'_, '_>,
        pos: &impl NoisePos,
        barrier: &mut Option<f64>,
        first: FluidLevel,
        second: FluidLevel,
    ) -> f64 {
        let y = pos.y();
        let first_block = first.at(y);
        let second_block = second.at(y);
        if (first_block == BlockStateId::LAVA && second_block == BlockStateId::WATER)
            || (first_block == BlockStateId::WATER && second_block == BlockStateId::LAVA)
        {
            return 2.0;
        }

        let level_gap = (first.level() - second.level()).abs();
        if level_gap == 0 {
            return 0.0;
        }

        let mid_level = 0.5 * f64::from(first.level() + second.level());
        let above_mid = f64::from(y) + 0.5 - mid_level;
        let half_gap = f64::from(level_gap) / 2.0;
        let to_edge = half_gap - above_mid.abs();

        let gradient = if above_mid > 0.0 {
            if to_edge > 0.0 { to_edge / 1.5 } else { to_edge / 2.5 }
        } else {
            let shifted = 3.0 + to_edge;
            if shifted > 0.0 { shifted / 3.0 } else { shifted / 10.0 }
        };

        let noise = if gradient < -2.0 || gradient > 2.0 {
            0.0
        } else {
            *barrier.get_or_insert_with(|| ctx.router.barrier_noise(pos, ctx.sample_options))
        };
        2.0 * (noise + gradient)
    }
}

impl AquiferSamplerImpl for WorldAquiferSampler {
    fn compute_substance(
        &mut self,
        ctx: &mut FluidSamplingContext<'_, '_>,
        pos: &impl NoisePos,
        density: f64,
    ) -> Option<BlockStateId> {
        let (x, y, z) = (pos.x(), pos.y(), pos.z());
        if density > 0.0 {
            self.schedule_fluid_update = false;
            return None;
        }
        if self.picker.compute_fluid(x, y, z).at(y) == BlockStateId::LAVA {
            self.schedule_fluid_update = false;
            return Some(BlockStateId::LAVA);
        }

        let anchor_x = floor_div(x - 5, X_SPACING);
        let anchor_y = floor_div(y + 1, Y_SPACING);
        let anchor_z = floor_div(z - 5, Z_SPACING);

        let mut nearest = [(i32::MAX, 0_i64); 3];
        for dx in 0..=1 {
            for dy in -1..=1 {
                for dz in 0..=1 {
                    let center = self.center(anchor_x + dx, anchor_y + dy, anchor_z + dz);
                    let (cx, cy, cz) = block_pos::unpack(center);
                    let (ox, oy, oz) = (cx - x, cy - y, cz - z);
                    let distance = ox * ox + oy * oy + oz * oz;
                    // Ties displace the earlier entry.
                    if nearest[0].0 >= distance {
                        nearest = [(distance, center), nearest[0], nearest[1]];
                    } else if nearest[1].0 >= distance {
                        nearest = [nearest[0], (distance, center), nearest[1]];
                    } else if nearest[2].0 >= distance {
                        nearest[2] = (distance, center);
                    }
                }
            }
        }
        let [(dist_1, center_1), (dist_2, center_2), (dist_3, center_3)] = nearest;

        let status_1 = self.status(ctx, center_1);
        let similarity_12 = similarity(dist_1, dist_2);
        let fluid = status_1.at(y);

        if similarity_12 <= 0.0 {
            self.schedule_fluid_update = similarity_12 >= flowing_update_similarity();
            return Some(fluid);
        }
        if fluid == BlockStateId::WATER
            && self.picker.compute_fluid(x, y - 1, z).at(y - 1) == BlockStateId::LAVA
        {
            self.schedule_fluid_update = true;
            return Some(fluid);
        }

        let mut barrier = None;
        let status_2 = self.status(ctx, center_2);
        let pressure_12 =
            similarity_12 * Self::calculate_pressure(ctx, pos, &mut barrier, status_1, status_2);
        if density + pressure_12 > 0.0 {
            self.schedule_fluid_update = false;
            return None;
        }

        let status_3 = self.status(ctx, center_3);
        let similarity_13 = similarity(dist_1, dist_3);
        if similarity_13 > 0.0 {
            let pressure_13 = similarity_12
                * similarity_13
                * Self::calculate_pressure(ctx, pos, &mut barrier, status_1, status_3);
            if density + pressure_13 > 0.0 {
                self.schedule_fluid_update = false;
                return None;
            }
        }

        let similarity_23 = similarity(dist_2, dist_3);
        if similarity_23 > 0.0 {
            let pressure_23 = similarity_12
                * similarity_23
                * Self::calculate_pressure(ctx, pos, &mut barrier, status_2, status_3);
            if density + pressure_23 > 0.0 {
                self.schedule_fluid_update = false;
                return None;
            }
        }

        self.schedule_fluid_update = true;
        Some(fluid)
    }

    fn should_schedule_fluid_update(&self) -> bool {
        self.schedule_fluid_update
    }
}

/// `floor(value / step) * step`.
#[inline]
#[allow(clippy::cast_possible_truncation)]
fn quantize(value: f64, step: i32) -> i32 {
    (value / f64::from(step)).floor() as i32 * step
}

/// Block positions packed into one `i64`: 26 bits of X, 26 of Z, 12 of Y.
mod block_pos {
    const X_BITS: u32 = 26;
    const Z_BITS: u32 = 26;
    const Y_BITS: u32 = 12;
    const X_OFFSET: u32 = Y_BITS + Z_BITS;
    const Z_OFFSET: u32 = Y_BITS;

    #[inline]
    pub fn pack(x: i32, y: i32, z: i32) -> i64 {
        ((i64::from(x) & ((1 << X_BITS) - 1)) << X_OFFSET)
            | ((i64::from(z) & ((1 << Z_BITS) - 1)) << Z_OFFSET)
            | (i64::from(y) & ((1 << Y_BITS) - 1))
    }

    #[inline]
    #[allow(clippy::cast_possible_truncation)]
    pub fn unpack(packed: i64) -> (i32, i32, i32) {
        let x = packed >> X_OFFSET;
        let y = (packed << (64 - Y_BITS)) >> (64 - Y_BITS);
        let z = (packed << (64 - Z_OFFSET - Z_BITS)) >> (64 - Z_BITS);
        (x as i32, y as i32, z as i32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::WorldgenRandomAlgorithm;

    #[test]
    fn test_block_pos_packing_keeps_signs() {
        for (x, y, z) in [(0, 0, 0), (-1, -64, -1), (1_000_000, 319, -29_999_984), (-33, 2047, 15)] {
            assert_eq!(block_pos::unpack(block_pos::pack(x, y, z)), (x, y, z));
        }
    }

    #[test]
    fn test_similarity() {
        assert!((similarity(10, 10) - 1.0).abs() < f64::EPSILON);
        assert!(similarity(0, 25).abs() < f64::EPSILON);
        assert!((flowing_update_similarity() + 0.76).abs() < 1e-12);
    }

    #[test]
    fn test_quantize_floors() {
        assert_eq!(quantize(7.9, 3), 6);
        assert_eq!(quantize(-0.1, 3), -3);
        assert_eq!(quantize(-3.0, 3), -3);
    }

    #[test]
    fn test_centers_stay_in_their_cell_and_repeat() {
        let splitter = WorldgenRandomAlgorithm::Xoroshiro
            .new_instance(42)
            .next_positional()
            .with_hash_of("minecraft:aquifer")
            .next_positional();
        let picker = FluidPicker::new(63, BlockStateId::WATER);
        let mut first = WorldAquiferSampler::new(3, -2, splitter.clone(), -64, 384, picker);
        let mut second = WorldAquiferSampler::new(3, -2, splitter, -64, 384, picker);

        for (gx, gy, gz) in [(2, -5, -3), (3, 0, -2), (4, 20, -1)] {
            let packed = first.center(gx, gy, gz);
            let (x, y, z) = block_pos::unpack(packed);
            assert_eq!(grid_x(x), gx);
            assert_eq!(grid_y(y), gy);
            assert_eq!(grid_z(z), gz);
            assert_eq!(first.center(gx, gy, gz), packed);
            assert_eq!(second.center(gx, gy, gz), packed);
        }
    }

    #[test]
    fn test_lattice_covers_chunk_and_neighbors() {
        let picker = FluidPicker::new(63, BlockStateId::WATER);
        let splitter = WorldgenRandomAlgorithm::Xoroshiro
            .new_instance(0)
            .next_positional();
        let sampler = WorldAquiferSampler::new(0, 0, splitter, -64, 384, picker);
        assert_eq!(sampler.min_grid_x, -1);
        assert_eq!(sampler.grid_size_x, 3);
        assert_eq!(sampler.min_grid_y, grid_y(-64) - 1);
        let last = sampler.index(1, grid_y(320) + 1, 1);
        assert_eq!(last + 1, sampler.location_cache.len());
    }
}
