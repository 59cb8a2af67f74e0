//! Replaces the top layers of the noise terrain with biome materials.
//!
//! The surface pass runs once per column, top down. It tracks how deep the
//! current block is below the nearest air above (`stone_depth_above`), how
//! far the solid run continues below it (`stone_depth_below`) and the height
//! of the fluid surface over it, then asks a [`SurfaceRule`] for a
//! replacement of every default block. Eroded badlands pillars are raised
//! before the scan and frozen-ocean icebergs placed after it.

use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use strata_noise::BlockStateId;
use strata_noise::math::floor;
use strata_noise::noise::{NoiseParameters, NormalNoise};
use strata_noise::noise_router::ChunkNoiseGenerator;
use strata_noise::random::{PositionalRandom, Random, RandomSplitter, WorldgenRandomAlgorithm};

use crate::biome::Biome;
use crate::chunk::proto_chunk::ProtoChunk;
use crate::chunk::{BlockPos, HeightmapType};

use super::context::SurfaceContext;
use super::rule::SurfaceRule;

pub const CLAY_BAND_COUNT: usize = 192;
/// Icebergs read the biome temperature at this height whatever the sea level.
const ICEBERG_TEMPERATURE_Y: i32 = 63;

/// Seeded noises and tables of the surface pass.
pub struct SurfaceSystem {
    default_block: BlockStateId,
    sea_level: i32,
    random_factory: RandomSplitter,
    clay_bands: Box<[BlockStateId; CLAY_BAND_COUNT]>,
    clay_bands_offset_noise: NormalNoise,
    surface_noise: NormalNoise,
    surface_secondary_noise: NormalNoise,
    badlands_pillar_noise: NormalNoise,
    badlands_pillar_roof_noise: NormalNoise,
    badlands_surface_noise: NormalNoise,
    iceberg_pillar_noise: NormalNoise,
    iceberg_pillar_roof_noise: NormalNoise,
    iceberg_surface_noise: NormalNoise,
    positional_randoms: RwLock<FxHashMap<String, RandomSplitter>>,
}

/// A column of the chunk being dressed. Writes outside the chunk height are
/// dropped and placed fluids are queued for a tick.
struct BlockColumn<'a> {
    chunk: &'a ProtoChunk,
    x: i32,
    z: i32,
}

impl BlockColumn<'_> {
    fn get(&self, y: i32) -> BlockStateId {
        self.chunk.get_block_state(BlockPos::new(self.x, y, self.z))
    }

    fn set(&self, y: i32, state: BlockStateId) {
        if y < self.chunk.min_y() || y >= self.chunk.max_y() {
            return;
        }
        let pos = BlockPos::new(self.x, y, self.z);
        self.chunk.set_block_state(pos, state);
        if state.is_fluid() {
            self.chunk.mark_pos_for_postprocessing(pos);
        }
    }
}

/// Neither air nor a fluid.
fn is_stone(state: BlockStateId) -> bool {
    !state.is_air() && !state.is_fluid()
}

impl SurfaceSystem {
    #[must_use]
    pub fn new(
        seed: u64,
        algorithm: WorldgenRandomAlgorithm,
        default_block: BlockStateId,
        sea_level: i32,
    ) -> Self {
        let random_factory = algorithm.new_instance(seed).next_positional();
        let noise = |parameters: &NoiseParameters| NormalNoise::instantiate(&random_factory, parameters);

        let clay_bands_offset_noise = noise(&NoiseParameters::CLAY_BANDS_OFFSET);
        let clay_bands =
            Box::new(Self::generate_bands(&mut random_factory.with_hash_of("minecraft:clay_bands")));

        Self {
            default_block,
            sea_level,
            clay_bands,
            clay_bands_offset_noise,
            surface_noise: noise(&NoiseParameters::SURFACE),
            surface_secondary_noise: noise(&NoiseParameters::SURFACE_SECONDARY),
            badlands_pillar_noise: noise(&NoiseParameters::BADLANDS_PILLAR),
            badlands_pillar_roof_noise: noise(&NoiseParameters::BADLANDS_PILLAR_ROOF),
            badlands_surface_noise: noise(&NoiseParameters::BADLANDS_SURFACE),
            iceberg_pillar_noise: noise(&NoiseParameters::ICEBERG_PILLAR),
            iceberg_pillar_roof_noise: noise(&NoiseParameters::ICEBERG_PILLAR_ROOF),
            iceberg_surface_noise: noise(&NoiseParameters::ICEBERG_SURFACE),
            positional_randoms: RwLock::new(FxHashMap::default()),
            random_factory,
        }
    }

    #[must_use]
    pub const fn default_block(&self) -> BlockStateId {
        self.default_block
    }

    #[must_use]
    pub const fn sea_level(&self) -> i32 {
        self.sea_level
    }

    /// The 192-entry terracotta cycle of badlands strata.
    ///
    /// Orange bands are scattered first, then yellow, brown and red runs
    /// are painted over them, and finally a few white bands, each with a
    /// chance of a light gray fringe on either side.
    pub fn generate_bands(random: &mut impl Random) -> [BlockStateId; CLAY_BAND_COUNT] {
        let mut bands = [BlockStateId::TERRACOTTA; CLAY_BAND_COUNT];

        let mut i = 0;
        while i < CLAY_BAND_COUNT {
            i += random.next_i32_bounded(5) as usize + 1;
            if i < CLAY_BAND_COUNT {
                bands[i] = BlockStateId::ORANGE_TERRACOTTA;
            }
            i += 1;
        }

        Self::make_bands(random, &mut bands, 1, BlockStateId::YELLOW_TERRACOTTA);
        Self::make_bands(random, &mut bands, 2, BlockStateId::BROWN_TERRACOTTA);
        Self::make_bands(random, &mut bands, 1, BlockStateId::RED_TERRACOTTA);

        let white_bands = random.next_i32_between_inclusive(9, 15);
        let mut placed = 0;
        let mut at = 0;
        while placed < white_bands && at < CLAY_BAND_COUNT {
            bands[at] = BlockStateId::WHITE_TERRACOTTA;
            if at > 1 && random.next_bool() {
                bands[at - 1] = BlockStateId::LIGHT_GRAY_TERRACOTTA;
            }
            if at + 1 < CLAY_BAND_COUNT && random.next_bool() {
                bands[at + 1] = BlockStateId::LIGHT_GRAY_TERRACOTTA;
            }
            placed += 1;
            at += random.next_i32_bounded(16) as usize + 4;
        }

        bands
    }

    fn make_bands(
        random: &mut impl Random,
        bands: &mut [BlockStateId; CLAY_BAND_COUNT],
        min_size: i32,
        state: BlockStateId,
    ) {
        let count = random.next_i32_between_inclusive(6, 15);
        for _ in 0..count {
            let size = (min_size + random.next_i32_bounded(3)) as usize;
            let start = random.next_i32_bounded(CLAY_BAND_COUNT as i32) as usize;
            let end = (start + size).min(CLAY_BAND_COUNT);
            bands[start..end].fill(state);
        }
    }

    #[must_use]
    pub fn clay_bands(&self) -> &[BlockStateId; CLAY_BAND_COUNT] {
        &self.clay_bands
    }

    /// Terracotta band at `y`, shifted per column by the band offset noise.
    #[must_use]
    pub fn get_band(&self, x: i32, y: i32, z: i32) -> BlockStateId {
        let offset = (self.clay_bands_offset_noise.get_value(f64::from(x), 0.0, f64::from(z)) * 4.0
            + 0.5)
            .floor() as i32;
        self.clay_bands[(y + offset).rem_euclid(CLAY_BAND_COUNT as i32) as usize]
    }

    /// Thickness of the soil layer of column `(x, z)`, usually 0 to 6.
    #[must_use]
    pub fn surface_depth(&self, x: i32, z: i32) -> i32 {
        let noise = self.surface_noise.get_value(f64::from(x), 0.0, f64::from(z));
        let jitter = self.random_factory.at(x, 0, z).next_f64() * 0.25;
        (noise * 2.75 + 3.0 + jitter) as i32
    }

    #[must_use]
    pub fn surface_secondary(&self, x: i32, z: i32) -> f64 {
        self.surface_secondary_noise.get_value(f64::from(x), 0.0, f64::from(z))
    }

    /// Positional factory for the named random, created once per system.
    pub fn random_factory(&self, id: &str) -> RandomSplitter {
        if let Some(factory) = self.positional_randoms.read().get(id) {
            return factory.clone();
        }
        self.positional_randoms
            .write()
            .entry(id.to_owned())
            .or_insert_with(|| self.random_factory.with_hash_of(id).next_positional())
            .clone()
    }

    /// Dresses every column of `chunk` with `rule`.
    ///
    /// `noise` must be a session over the same chunk; it supplies the
    /// preliminary surface levels. With `use_legacy_biome_height` the
    /// column biome is read at `y = 0` instead of at the surface.
    pub fn build_surface(
        &self,
        chunk: &ProtoChunk,
        noise: &mut ChunkNoiseGenerator<'_>,
        rule: &dyn SurfaceRule,
        use_legacy_biome_height: bool,
    ) {
        let (base_x, base_z) = (chunk.pos().min_block_x(), chunk.pos().min_block_z());
        let min_y = chunk.min_y();
        let mut ctx = SurfaceContext::new(self, chunk, noise);

        for local_x in 0..16 {
            for local_z in 0..16 {
                let x = base_x + local_x;
                let z = base_z + local_z;
                let column = BlockColumn { chunk, x, z };

                let surface_y = chunk.first_available(HeightmapType::WorldSurfaceWg, x, z);
                let biome_y = if use_legacy_biome_height { 0 } else { surface_y };
                let biome = chunk.noise_biome(x >> 2, biome_y >> 2, z >> 2);
                if biome == Biome::ErodedBadlands {
                    self.eroded_badlands_extension(&column, x, z, surface_y);
                }

                let top = chunk.first_available(HeightmapType::WorldSurfaceWg, x, z);
                ctx.update_xz(x, z);

                let mut stone_depth_above = 0;
                let mut water_height = i32::MIN;
                let mut stone_run_bottom = i32::MAX;
                for y in (min_y..=top).rev() {
                    let state = column.get(y);
                    if state.is_air() {
                        stone_depth_above = 0;
                        water_height = i32::MIN;
                        continue;
                    }
                    if state.is_fluid() {
                        if water_height == i32::MIN {
                            water_height = y + 1;
                        }
                        continue;
                    }
                    if stone_run_bottom >= y {
                        stone_run_bottom = ((min_y - 1)..y)
                            .rev()
                            .find(|&below| !is_stone(column.get(below)))
                            .map_or(i32::MIN, |below| below + 1);
                    }
                    stone_depth_above += 1;
                    let stone_depth_below = y - stone_run_bottom + 1;
                    ctx.update_y(stone_depth_above, stone_depth_below, water_height, y);

                    if state == self.default_block {
                        if let Some(replacement) = rule.try_apply(&mut ctx) {
                            column.set(y, replacement);
                        }
                    }
                }

                if biome.is_frozen_ocean() {
                    let min_surface_level = ctx.min_surface_level();
                    self.frozen_ocean_extension(min_surface_level, biome, &column, x, z, surface_y);
                }
            }
        }
    }

    /// Raises a terracotta pillar of the default block over dry columns.
    fn eroded_badlands_extension(&self, column: &BlockColumn<'_>, x: i32, z: i32, surface_y: i32) {
        let (fx, fz) = (f64::from(x), f64::from(z));
        let pillar = (self.badlands_surface_noise.get_value(fx, 0.0, fz) * 8.25)
            .abs()
            .min(self.badlands_pillar_noise.get_value(fx * 0.2, 0.0, fz * 0.2) * 15.0);
        if pillar <= 0.0 {
            return;
        }

        let roof = (self.badlands_pillar_roof_noise.get_value(fx * 0.75, 0.0, fz * 0.75) * 1.5).abs();
        let height = 64.0 + (pillar * pillar * 2.5).min((roof * 50.0).ceil() + 24.0);
        let top = floor(height);
        if surface_y > top {
            return;
        }

        let min_y = column.chunk.min_y();
        for y in (min_y..=top).rev() {
            let state = column.get(y);
            if state == self.default_block {
                break;
            }
            if state == BlockStateId::WATER {
                return;
            }
        }
        for y in (min_y..=top).rev() {
            if !column.get(y).is_air() {
                break;
            }
            column.set(y, self.default_block);
        }
    }

    /// Grows packed ice, capped with snow, out of a frozen ocean.
    fn frozen_ocean_extension(
        &self,
        min_surface_level: i32,
        biome: Biome,
        column: &BlockColumn<'_>,
        x: i32,
        z: i32,
        surface_y: i32,
    ) {
        let (fx, fz) = (f64::from(x), f64::from(z));
        let pillar = (self.iceberg_surface_noise.get_value(fx, 0.0, fz) * 8.25)
            .abs()
            .min(self.iceberg_pillar_noise.get_value(fx * 1.28, 0.0, fz * 1.28) * 15.0);
        if pillar <= 1.8 {
            return;
        }

        let roof = (self.iceberg_pillar_roof_noise.get_value(fx * 1.17, 0.0, fz * 1.17) * 1.5).abs();
        let mut height = (pillar * pillar * 1.2).min((roof * 40.0).ceil() + 14.0);
        if biome.melts_icebergs_slightly(x, ICEBERG_TEMPERATURE_Y, z) {
            height -= 2.0;
        }

        let sea_level = f64::from(self.sea_level);
        let (top, bottom) = if height > 2.0 {
            (height + sea_level, sea_level - height - 7.0)
        } else {
            (0.0, 0.0)
        };
        let (top_y, bottom_y) = (top as i32, bottom as i32);

        let mut random = self.random_factory.at(x, 0, z);
        let max_snow = 2 + random.next_i32_bounded(4);
        let snow_from = self.sea_level + 18 + random.next_i32_bounded(10);
        let mut snow = 0;

        for y in (min_surface_level..=surface_y.max(top_y + 1)).rev() {
            let state = column.get(y);
            let in_ice = (state.is_air() && y < top_y && random.next_f64() > 0.01)
                || (state == BlockStateId::WATER
                    && y > bottom_y
                    && y < self.sea_level
                    && bottom != 0.0
                    && random.next_f64() > 0.15);
            if !in_ice {
                continue;
            }
            if snow <= max_snow && y > snow_from {
                column.set(y, BlockStateId::SNOW_BLOCK);
                snow += 1;
            } else {
                column.set(y, BlockStateId::PACKED_ICE);
            }
        }
    }
}
