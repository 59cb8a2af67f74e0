//! Drives a chunk session through its sweep.
//!
//! A sweep visits cells X-slab by X-slab. For each slab the next slice of
//! interpolator corners is sampled, then the cells of the slab are visited
//! top down in Y and ascending in Z, and inside each cell the blocks are
//! visited Y (top down), then X, then Z:
//!
//! ```text
//! initialize_first_cell_x()
//! for cell_x:
//!     advance_cell_x(cell_x)
//!     for cell_z, cell_y (descending):
//!         select_cell_yz(cell_y, cell_z)
//!         for y (descending): update_for_y
//!             for x: update_for_x
//!                 for z: update_for_z, sample_block_state
//!     swap_slices()
//! stop_interpolation()
//! ```
//!
//! Cell caches and the cache-once stamps rely on this exact nesting.

#![allow(clippy::similar_names)]

use crate::BlockStateId;
use crate::math::floor_div;

use super::aquifer_sampler::{
    AquiferSampler, FluidSamplingContext, SeaLevelAquiferSampler, WorldAquiferSampler,
};
use super::block_sampler::ChainedBlockStateSampler;
use super::chunk_density_function::{
    CellCursor, ChunkNoiseFunctionBuilderOptions, Generation, SampleContext, SampleOptions,
    biome_coords,
};
use super::component::chunk_noise_router::ChunkNoiseRouter;
use super::component::proto_noise_router::ProtoNoiseRouter;
use super::density_function::{IndexToNoisePos, NoisePos, UnblendedNoisePos};
use super::fluid_level::FluidPicker;
use super::ore_sampler::OreVeinSampler;
use super::settings::NoiseSettings;
use super::surface_height_sampler::SurfaceHeightEstimator;

/// Fluid and ore configuration of a session.
#[derive(Clone, Copy, Debug)]
pub struct NoiseFillConfig {
    pub picker: FluidPicker,
    pub aquifers_enabled: bool,
    pub ore_veins_enabled: bool,
}

/// Multi-noise climate parameters at one point.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ClimateSample {
    pub temperature: f64,
    pub humidity: f64,
    pub continentalness: f64,
    pub erosion: f64,
    pub depth: f64,
    pub weirdness: f64,
}

impl ClimateSample {
    /// Parameters as biome-lookup coordinates: narrowed to `f32`, scaled by
    /// 10000 and truncated.
    #[must_use]
    pub fn quantized(&self) -> [i64; 6] {
        let quantize = |value: f64| (value as f32 * 10_000.0) as i64;
        [
            quantize(self.temperature),
            quantize(self.humidity),
            quantize(self.continentalness),
            quantize(self.erosion),
            quantize(self.depth),
            quantize(self.weirdness),
        ]
    }
}

/// Positions of one corner column of a slice, bottom corner first.
struct SliceMapper {
    x: i32,
    z: i32,
    min_cell_y: i32,
    cell_height: i32,
}

impl IndexToNoisePos for SliceMapper {
    fn at(
        &self,
        index: usize,
        sample_options: Option<&mut SampleOptions>,
    ) -> impl NoisePos + 'static {
        if let Some(options) = sample_options {
            options.generation.advance_point();
            options.fill_index = index;
        }
        UnblendedNoisePos::new(
            self.x,
            (index as i32 + self.min_cell_y) * self.cell_height,
            self.z,
        )
    }
}

/// Positions of the blocks of one cell, top layer first.
struct CellMapper {
    start_x: i32,
    start_y: i32,
    start_z: i32,
    cursor: CellCursor,
}

impl IndexToNoisePos for CellMapper {
    fn at(
        &self,
        index: usize,
        sample_options: Option<&mut SampleOptions>,
    ) -> impl NoisePos + 'static {
        let width = self.cursor.cell_width();
        let in_cell_z = index % width;
        let layer = index / width;
        let in_cell_x = layer % width;
        let in_cell_y = self.cursor.cell_height() - 1 - layer / width;

        if let Some(options) = sample_options {
            let mut cursor = self.cursor;
            cursor.set(in_cell_x, in_cell_y, in_cell_z);
            options.context = SampleContext::Cursor(cursor);
            options.fill_index = index;
        }
        UnblendedNoisePos::new(
            self.start_x + in_cell_x as i32,
            self.start_y + in_cell_y as i32,
            self.start_z + in_cell_z as i32,
        )
    }
}

/// A chunk (or single column) session with its sweep state.
pub struct ChunkNoiseGenerator<'a> {
    router: ChunkNoiseRouter<'a>,
    state_sampler: ChainedBlockStateSampler,
    estimator: SurfaceHeightEstimator,
    generation: Generation,
    cursor: CellCursor,
    settings: NoiseSettings,
    cell_count_xz: usize,
    min_cell_y: i32,
    first_cell_x: i32,
    first_cell_z: i32,
    cell_start_block_x: i32,
    cell_start_block_y: i32,
    cell_start_block_z: i32,
    interpolating: bool,
}

impl<'a> ChunkNoiseGenerator<'a> {
    /// Session over the 16x16 columns of chunk `(chunk_x, chunk_z)`.
    #[must_use]
    pub fn for_chunk(
        proto: &'a ProtoNoiseRouter,
        chunk_x: i32,
        chunk_z: i32,
        config: &NoiseFillConfig,
    ) -> Self {
        let cell_count_xz = (16 / proto.settings.cell_width()) as usize;
        Self::new(proto, cell_count_xz, chunk_x * 16, chunk_z * 16, config)
    }

    /// Session over the single cell column whose corner is at block
    /// `(x, z)`, which must be cell aligned.
    #[must_use]
    pub fn for_column(proto: &'a ProtoNoiseRouter, x: i32, z: i32, config: &NoiseFillConfig) -> Self {
        Self::new(proto, 1, x, z, config)
    }

    fn new(
        proto: &'a ProtoNoiseRouter,
        cell_count_xz: usize,
        start_x: i32,
        start_z: i32,
        config: &NoiseFillConfig,
    ) -> Self {
        let settings = proto.settings;
        let cell_width = settings.cell_width();
        let cell_height = settings.cell_height();
        let min_cell_y = settings.min_cell_y();
        let cell_count_y = settings.cell_count_y();

        let builder_options = ChunkNoiseFunctionBuilderOptions::new(
            cell_width as usize,
            cell_height as usize,
            cell_count_y as usize,
            cell_count_xz,
            biome_coords::from_block(start_x),
            biome_coords::from_block(start_z),
            biome_coords::from_block(cell_count_xz as i32 * cell_width) as usize,
        );
        let router = ChunkNoiseRouter::generate(proto, &builder_options);

        let aquifer = if config.aquifers_enabled {
            AquiferSampler::World(WorldAquiferSampler::new(
                start_x >> 4,
                start_z >> 4,
                proto.aquifer_random.clone(),
                min_cell_y * cell_height,
                cell_count_y * cell_height,
                config.picker,
            ))
        } else {
            AquiferSampler::SeaLevel(SeaLevelAquiferSampler::new(config.picker))
        };
        let state_sampler = if config.ore_veins_enabled {
            ChainedBlockStateSampler::with_ores(aquifer, OreVeinSampler::new(proto.ore_random.clone()))
        } else {
            ChainedBlockStateSampler::aquifer_only(aquifer)
        };

        Self {
            router,
            state_sampler,
            estimator: SurfaceHeightEstimator::new(settings),
            generation: Generation::default(),
            cursor: CellCursor::new(cell_width as usize, cell_height as usize),
            settings,
            cell_count_xz,
            min_cell_y,
            first_cell_x: floor_div(start_x, cell_width),
            first_cell_z: floor_div(start_z, cell_width),
            cell_start_block_x: 0,
            cell_start_block_y: 0,
            cell_start_block_z: 0,
            interpolating: false,
        }
    }

    #[inline]
    #[must_use]
    pub const fn settings(&self) -> &NoiseSettings {
        &self.settings
    }

    #[inline]
    #[must_use]
    pub const fn cell_count_xz(&self) -> usize {
        self.cell_count_xz
    }

    #[inline]
    #[must_use]
    pub const fn generation(&self) -> Generation {
        self.generation
    }

    /// The session stack, for foreign queries.
    #[inline]
    pub fn router(&mut self) -> &mut ChunkNoiseRouter<'a> {
        &mut self.router
    }

    /// Block the cursor points at.
    #[inline]
    #[must_use]
    pub fn block_pos(&self) -> UnblendedNoisePos {
        UnblendedNoisePos::new(
            self.cell_start_block_x + self.cursor.in_cell_x as i32,
            self.cell_start_block_y + self.cursor.in_cell_y as i32,
            self.cell_start_block_z + self.cursor.in_cell_z as i32,
        )
    }

    #[inline]
    fn cursor_options(&self, populating_caches: bool) -> SampleOptions {
        SampleOptions::new(
            populating_caches,
            SampleContext::Cursor(self.cursor),
            self.generation,
            0,
        )
    }

    /// Samples every interpolator along the slice at `cell_x` into the start
    /// or end buffers.
    fn fill_slice(&mut self, start: bool, cell_x: i32) {
        let cell_width = self.settings.cell_width();
        self.cell_start_block_x = cell_x * cell_width;
        self.cursor.set(0, 0, 0);

        for cell_z in 0..=self.cell_count_xz {
            self.cell_start_block_z = (self.first_cell_z + cell_z as i32) * cell_width;
            self.generation.advance_array();

            let mapper = SliceMapper {
                x: self.cell_start_block_x,
                z: self.cell_start_block_z,
                min_cell_y: self.min_cell_y,
                cell_height: self.settings.cell_height(),
            };
            let mut options = self.cursor_options(false);
            self.router
                .fill_interpolator_buffers(start, cell_z, &mapper, &mut options);
            self.generation = options.generation;
        }
        self.generation.advance_array();
    }

    /// Starts the sweep by sampling the first slice.
    pub fn initialize_first_cell_x(&mut self) {
        debug_assert!(!self.interpolating, "interpolation started twice");
        self.interpolating = true;
        self.generation.point = 0;
        self.fill_slice(true, self.first_cell_x);
    }

    /// Samples the far slice of X cell `cell_x` and moves the cursor into it.
    pub fn advance_cell_x(&mut self, cell_x: usize) {
        let cell_x = cell_x as i32;
        self.fill_slice(false, self.first_cell_x + cell_x + 1);
        self.cell_start_block_x = (self.first_cell_x + cell_x) * self.settings.cell_width();
    }

    /// Loads the corners of cell `(cell_y, cell_z)` and fills the cell caches.
    pub fn select_cell_yz(&mut self, cell_y: usize, cell_z: usize) {
        self.router.on_sampled_cell_corners(cell_y, cell_z);
        self.cell_start_block_y = (cell_y as i32 + self.min_cell_y) * self.settings.cell_height();
        self.cell_start_block_z =
            (self.first_cell_z + cell_z as i32) * self.settings.cell_width();
        self.generation.advance_array();

        let mapper = CellMapper {
            start_x: self.cell_start_block_x,
            start_y: self.cell_start_block_y,
            start_z: self.cell_start_block_z,
            cursor: self.cursor,
        };
        let mut options = self.cursor_options(true);
        self.router.fill_cell_caches(&mapper, &mut options);

        self.generation.advance_array();
    }

    pub fn update_for_y(&mut self, block_y: i32, delta: f64) {
        self.cursor.in_cell_y = (block_y - self.cell_start_block_y) as usize;
        self.router.interpolate_y(delta);
    }

    pub fn update_for_x(&mut self, block_x: i32, delta: f64) {
        self.cursor.in_cell_x = (block_x - self.cell_start_block_x) as usize;
        self.router.interpolate_x(delta);
    }

    pub fn update_for_z(&mut self, block_z: i32, delta: f64) {
        self.cursor.in_cell_z = (block_z - self.cell_start_block_z) as usize;
        self.generation.advance_point();
        self.router.interpolate_z(delta);
    }

    /// Makes the far slice the near slice of the next X cell.
    pub fn swap_slices(&mut self) {
        self.router.swap_buffers();
    }

    pub fn stop_interpolation(&mut self) {
        debug_assert!(self.interpolating, "interpolation stopped twice");
        self.interpolating = false;
    }

    /// Block state at the cursor, or `None` for the default block.
    pub fn sample_block_state(&mut self) -> Option<BlockStateId> {
        let pos = self.block_pos();
        let options = self.cursor_options(false);
        let mut ctx = FluidSamplingContext {
            router: &mut self.router,
            estimator: &mut self.estimator,
            sample_options: &options,
        };
        self.state_sampler.sample(&mut ctx, &pos)
    }

    /// Whether the block returned by the last [`sample_block_state`] call
    /// needs a fluid tick.
    ///
    /// [`sample_block_state`]: Self::sample_block_state
    #[must_use]
    pub fn should_schedule_fluid_update(&self) -> bool {
        self.state_sampler.should_schedule_fluid_update()
    }

    /// Final density at the cursor.
    pub fn final_density(&mut self) -> f64 {
        let pos = self.block_pos();
        let options = self.cursor_options(false);
        self.router.final_density(&pos, &options)
    }

    /// Memoized preliminary surface level of the quart column at `(x, z)`.
    pub fn preliminary_surface_level(&mut self, x: i32, z: i32) -> i32 {
        self.estimator.estimate_height(&mut self.router, x, z)
    }

    /// Climate parameters at block `(x, y, z)`, sampled as a foreign point.
    pub fn sample_climate(&mut self, x: i32, y: i32, z: i32) -> ClimateSample {
        let pos = UnblendedNoisePos::new(x, y, z);
        let options = SampleOptions::foreign();
        ClimateSample {
            temperature: self.router.temperature(&pos, &options),
            humidity: self.router.vegetation(&pos, &options),
            continentalness: self.router.continents(&pos, &options),
            erosion: self.router.erosion(&pos, &options),
            depth: self.router.depth(&pos, &options),
            weirdness: self.router.ridges(&pos, &options),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::noise_router::component::proto_noise_router::SeedContext;
    use crate::noise_router::overworld::overworld_router;
    use crate::random::WorldgenRandomAlgorithm;

    fn proto(seed: u64) -> ProtoNoiseRouter {
        let context = SeedContext::new(
            seed,
            WorldgenRandomAlgorithm::Xoroshiro,
            NoiseSettings::overworld(),
        );
        ProtoNoiseRouter::generate(&overworld_router(), &context)
    }

    fn config() -> NoiseFillConfig {
        NoiseFillConfig {
            picker: FluidPicker::new(63, BlockStateId::WATER),
            aquifers_enabled: true,
            ore_veins_enabled: true,
        }
    }

    /// Runs the single-column sweep and returns the top-down states.
    fn column_states(proto: &ProtoNoiseRouter, x: i32, z: i32) -> Vec<Option<BlockStateId>> {
        let settings = proto.settings;
        let (width, height) = (settings.cell_width(), settings.cell_height());
        let (cell_x, cell_z) = (floor_div(x, width) * width, floor_div(z, width) * width);
        let (dx, dz) = (x - cell_x, z - cell_z);

        let mut generator = ChunkNoiseGenerator::for_column(proto, cell_x, cell_z, &config());
        generator.initialize_first_cell_x();
        generator.advance_cell_x(0);

        let mut states = Vec::new();
        for cell_y in (0..settings.cell_count_y()).rev() {
            generator.select_cell_yz(cell_y as usize, 0);
            for in_cell_y in (0..height).rev() {
                let y = (settings.min_cell_y() + cell_y) * height + in_cell_y;
                generator.update_for_y(y, f64::from(in_cell_y) / f64::from(height));
                generator.update_for_x(x, f64::from(dx) / f64::from(width));
                generator.update_for_z(z, f64::from(dz) / f64::from(width));
                states.push(generator.sample_block_state());
            }
        }
        generator.stop_interpolation();
        states
    }

    #[test]
    fn test_cell_mapper_walks_top_layer_first() {
        let mapper = CellMapper {
            start_x: 16,
            start_y: -64,
            start_z: 32,
            cursor: CellCursor::new(4, 8),
        };
        let mut options = SampleOptions::foreign();
        let first = mapper.at(0, Some(&mut options));
        assert_eq!((first.x(), first.y(), first.z()), (16, -57, 32));
        let next = mapper.at(5, Some(&mut options));
        assert_eq!((next.x(), next.y(), next.z()), (17, -57, 33));
        let last = mapper.at(127, Some(&mut options));
        assert_eq!((last.x(), last.y(), last.z()), (19, -64, 35));
        assert_eq!(options.fill_index, 127);
        assert_eq!(options.cursor().and_then(CellCursor::cell_index), Some(127));
    }

    #[test]
    fn test_slice_mapper_advances_point_stamp() {
        let mapper = SliceMapper {
            x: 4,
            z: 8,
            min_cell_y: -8,
            cell_height: 8,
        };
        let mut options = SampleOptions::foreign();
        let pos = mapper.at(3, Some(&mut options));
        assert_eq!((pos.x(), pos.y(), pos.z()), (4, -40, 8));
        assert_eq!(options.generation.point, 1);
        mapper.at(4, Some(&mut options));
        assert_eq!(options.generation.point, 2);
        mapper.at(5, None);
        assert_eq!(options.generation.point, 2);
    }

    #[test]
    fn test_quantized_climate_truncates_towards_zero() {
        let sample = ClimateSample {
            temperature: 0.123_456,
            humidity: -0.5,
            continentalness: 1.0,
            erosion: -0.000_01,
            depth: 0.0,
            weirdness: -1.25,
        };
        assert_eq!(sample.quantized(), [1234, -5000, 10_000, 0, 0, -12_500]);
    }

    #[test]
    fn test_sweep_counters_follow_fill_points() {
        let proto = proto(1);
        let mut generator = ChunkNoiseGenerator::for_column(&proto, 0, 0, &config());
        generator.initialize_first_cell_x();
        let after_first = generator.generation();
        // One array stamp per corner column plus one closing stamp.
        assert_eq!(after_first.array, 3);
        assert!(after_first.point > 0);

        generator.advance_cell_x(0);
        generator.select_cell_yz(10, 0);
        assert_eq!(generator.generation().array, 8);
        let before = generator.generation().point;
        generator.update_for_y(-64 + 10 * 8 + 7, 7.0 / 8.0);
        generator.update_for_x(0, 0.0);
        generator.update_for_z(0, 0.0);
        assert_eq!(generator.generation().point, before + 1);
        generator.stop_interpolation();
    }

    #[test]
    fn test_column_sweep_is_deterministic() {
        let proto = proto(12_345);
        let first = column_states(&proto, 37, -91);
        let second = column_states(&proto, 37, -91);
        assert_eq!(first.len(), 384);
        assert_eq!(first, second);
    }

    #[test]
    fn test_column_has_open_sky_and_solid_bottom() {
        let proto = proto(0);
        let states = column_states(&proto, 8, 8);
        assert_eq!(states.first().copied().flatten(), Some(BlockStateId::AIR));
        let bottom = states.last().copied().flatten();
        assert!(bottom.is_none_or(|state| !state.is_air()));
    }
}
