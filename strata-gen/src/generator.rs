//! The noise chunk generator: the terrain stages of one overworld chunk.
//!
//! A generator is built once per world from the seed. It owns the seeded
//! noise routers and surface noises; every stage opens its own
//! [`ChunkNoiseGenerator`] session, so stages of different chunks can run on
//! different threads against the same generator.
//!
//! The fill sweep walks the interpolation cells of the chunk:
//! ```text
//! for cell_x:
//!     advance_cell_x()              // sample the far X slice
//!     for cell_z:
//!         for cell_y (top to bottom):
//!             select_cell_yz()      // load the 8 corners
//!             for block y, x, z in the cell:
//!                 update_for_y/x/z(delta)
//!                 sample_block_state()
//!     swap_slices()
//! ```

#![allow(clippy::similar_names)]

use std::ops::Deref;
use std::sync::Arc;

use anyhow::ensure;
use log::{debug, trace};
use strata_noise::BlockStateId;
use strata_noise::math::{floor_div, floor_mod};
use strata_noise::noise_router::overworld::overworld_router;
use strata_noise::noise_router::{
    ChunkNoiseGenerator, FluidPicker, NoiseFillConfig, ProtoNoiseRouter, SeedContext,
};

use crate::biome::{Biome, BiomeSource, TargetPoint};
use crate::chunk::missing_bedrock::MissingBedrockBitset;
use crate::chunk::proto_chunk::ProtoChunk;
use crate::chunk::section::ChunkSection;
use crate::chunk::{BlockPos, ChunkPos, ChunkStatus, HeightmapType};
use crate::settings::GeneratorSettings;
use crate::surface::{DefaultSurfaceRule, SurfaceRule, SurfaceSystem};

/// The blocks of one column as the noise fill would place them, before any
/// surface pass.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NoiseColumn {
    min_y: i32,
    states: Vec<BlockStateId>,
}

impl NoiseColumn {
    #[must_use]
    pub const fn min_y(&self) -> i32 {
        self.min_y
    }

    /// State at `y`; air outside the column.
    #[must_use]
    pub fn get_block(&self, y: i32) -> BlockStateId {
        usize::try_from(y - self.min_y)
            .ok()
            .and_then(|index| self.states.get(index))
            .copied()
            .unwrap_or(BlockStateId::AIR)
    }

    #[must_use]
    pub fn states(&self) -> &[BlockStateId] {
        &self.states
    }
}

/// Generates overworld terrain from noise.
pub struct NoiseChunkGenerator {
    seed: u64,
    settings: GeneratorSettings,
    fill_config: NoiseFillConfig,
    proto: ProtoNoiseRouter,
    surface: SurfaceSystem,
    biome_source: Arc<dyn BiomeSource>,
    surface_rule: Box<dyn SurfaceRule>,
}

impl NoiseChunkGenerator {
    /// Seeds the noise routers and surface noises for `seed`.
    ///
    /// # Errors
    ///
    /// Returns an error if `settings` are invalid.
    pub fn new(
        seed: u64,
        settings: GeneratorSettings,
        biome_source: Arc<dyn BiomeSource>,
    ) -> anyhow::Result<Self> {
        settings.validate()?;
        let algorithm = settings.random_algorithm();
        let proto = ProtoNoiseRouter::generate(
            &overworld_router(),
            &SeedContext::new(seed, algorithm, settings.noise),
        );
        let surface =
            SurfaceSystem::new(seed, algorithm, settings.default_block, settings.sea_level);
        debug!(
            "noise generator ready: seed {seed}, {algorithm:?} random, y {}..{}",
            settings.noise.min_y,
            settings.noise.min_y + settings.noise.height
        );

        Ok(Self {
            seed,
            fill_config: settings.fill_config(),
            settings,
            proto,
            surface,
            biome_source,
            surface_rule: Box::new(DefaultSurfaceRule),
        })
    }

    /// Replaces the rule the surface stage applies.
    #[must_use]
    pub fn with_surface_rule(mut self, rule: impl SurfaceRule + 'static) -> Self {
        self.surface_rule = Box::new(rule);
        self
    }

    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.seed
    }

    #[must_use]
    pub const fn settings(&self) -> &GeneratorSettings {
        &self.settings
    }

    #[must_use]
    pub const fn surface_system(&self) -> &SurfaceSystem {
        &self.surface
    }

    #[must_use]
    pub const fn sea_level(&self) -> i32 {
        self.settings.sea_level
    }

    #[must_use]
    pub const fn min_y(&self) -> i32 {
        self.settings.noise.min_y
    }

    #[must_use]
    pub const fn gen_depth(&self) -> i32 {
        self.settings.noise.height
    }

    /// Fluid levels used outside aquifers and wherever aquifers are off.
    #[must_use]
    pub fn global_fluid_picker(&self) -> FluidPicker {
        self.fill_config.picker
    }

    /// An empty chunk covering the generator's height.
    #[must_use]
    pub fn create_proto_chunk(&self, pos: ChunkPos) -> ProtoChunk {
        ProtoChunk::new(pos, self.min_y(), self.gen_depth())
    }

    /// Runs every stage on a new chunk at `pos`.
    ///
    /// # Errors
    ///
    /// Returns an error if a stage fails.
    pub fn generate(&self, pos: ChunkPos) -> anyhow::Result<ProtoChunk> {
        let chunk = self.create_proto_chunk(pos);
        self.create_biomes(&chunk)?;
        self.fill_from_noise(&chunk)?;
        self.build_surface(&chunk)?;
        self.apply_carvers(&chunk)?;
        Ok(chunk)
    }

    fn begin_stage(chunk: &ProtoChunk, stage: ChunkStatus) -> anyhow::Result<()> {
        let status = chunk.status();
        ensure!(
            stage.parent() == Some(status),
            "chunk {:?} is at {status:?} and cannot run {stage:?}",
            chunk.pos()
        );
        trace!("chunk {:?}: {stage:?}", chunk.pos());
        Ok(())
    }

    fn noise_session(&self, pos: ChunkPos) -> ChunkNoiseGenerator<'_> {
        ChunkNoiseGenerator::for_chunk(&self.proto, pos.x, pos.z, &self.fill_config)
    }

    /// Fills the quart biomes of `chunk` from the sampled climate.
    ///
    /// Chunks being upgraded from the old world height keep the biome they
    /// already had at `y = 0` in every quart.
    ///
    /// # Errors
    ///
    /// Returns an error unless the chunk is [`ChunkStatus::Empty`].
    pub fn create_biomes(&self, chunk: &ProtoChunk) -> anyhow::Result<()> {
        Self::begin_stage(chunk, ChunkStatus::Biomes)?;

        if chunk.is_upgrading() {
            let quart_x = chunk.pos().x << 2;
            let quart_z = chunk.pos().z << 2;
            let mut retained = [[Biome::Plains; 4]; 4];
            for (x, row) in retained.iter_mut().enumerate() {
                for (z, biome) in row.iter_mut().enumerate() {
                    *biome = chunk.noise_biome(quart_x + x as i32, 0, quart_z + z as i32);
                }
            }
            chunk.fill_biomes_from_noise(|x, _, z| retained[(x & 3) as usize][(z & 3) as usize]);
        } else {
            let mut noise = self.noise_session(chunk.pos());
            let mut last_result = None;
            chunk.fill_biomes_from_noise(|x, y, z| {
                let climate = noise.sample_climate(x << 2, y << 2, z << 2);
                self.biome_source
                    .noise_biome(&TargetPoint::from(&climate), &mut last_result)
            });
        }

        chunk.set_status(ChunkStatus::Biomes);
        Ok(())
    }

    /// Places the terrain of `chunk`: the default block where the density
    /// is positive, aquifer fluids and ore veins elsewhere.
    ///
    /// # Errors
    ///
    /// Returns an error unless the chunk is [`ChunkStatus::Biomes`].
    pub fn fill_from_noise(&self, chunk: &ProtoChunk) -> anyhow::Result<()> {
        Self::begin_stage(chunk, ChunkStatus::Noise)?;

        let pos = chunk.pos();
        let settings = self.settings.noise;
        let (width, height) = (settings.cell_width(), settings.cell_height());
        let (base_x, base_z) = (pos.min_block_x(), pos.min_block_z());
        let min_y = chunk.min_y();

        let mut noise = self.noise_session(pos);
        let cells_xz = noise.cell_count_xz();
        let cells_y = settings.cell_count_y() as usize;

        // Held for the whole sweep so the sections cannot be swapped out
        // while they are written.
        let mut sections = chunk.lock_sections();
        let mut heightmaps = chunk.heightmaps_mut();
        let mut placed = 0_usize;

        noise.initialize_first_cell_x();
        for cell_x in 0..cells_xz {
            noise.advance_cell_x(cell_x);
            for cell_z in 0..cells_xz {
                for cell_y in (0..cells_y).rev() {
                    noise.select_cell_yz(cell_y, cell_z);
                    let start_y = (cell_y as i32 + settings.min_cell_y()) * height;
                    for in_y in (0..height).rev() {
                        let y = start_y + in_y;
                        noise.update_for_y(y, f64::from(in_y) / f64::from(height));
                        let section_index = ((y - min_y) >> 4) as usize;
                        for in_x in 0..width {
                            let local_x = cell_x as i32 * width + in_x;
                            noise.update_for_x(base_x + local_x, f64::from(in_x) / f64::from(width));
                            for in_z in 0..width {
                                let local_z = cell_z as i32 * width + in_z;
                                noise.update_for_z(
                                    base_z + local_z,
                                    f64::from(in_z) / f64::from(width),
                                );

                                let state = noise
                                    .sample_block_state()
                                    .unwrap_or(self.settings.default_block);
                                if state.is_air() {
                                    continue;
                                }

                                sections[section_index].set_block_state(
                                    local_x as usize,
                                    (y & 15) as usize,
                                    local_z as usize,
                                    state,
                                );
                                heightmaps.update(local_x, y, local_z, state, |below| {
                                    section_block(&sections, min_y, local_x, below, local_z)
                                });
                                if noise.should_schedule_fluid_update() && state.is_fluid() {
                                    chunk.mark_pos_for_postprocessing(BlockPos::new(
                                        base_x + local_x,
                                        y,
                                        base_z + local_z,
                                    ));
                                }
                                placed += 1;
                            }
                        }
                    }
                }
            }
            noise.swap_slices();
        }
        noise.stop_interpolation();
        drop(heightmaps);
        drop(sections);

        if let Some(retrogen) = chunk.below_zero_retrogen() {
            MissingBedrockBitset::replace_old_bedrock(chunk);
            if retrogen.has_bedrock_holes() {
                retrogen.apply_bedrock_mask(chunk);
            }
        }

        trace!("chunk {pos:?}: placed {placed} blocks");
        chunk.set_status(ChunkStatus::Noise);
        Ok(())
    }

    /// Dresses the terrain of `chunk` with the surface rule.
    ///
    /// # Errors
    ///
    /// Returns an error unless the chunk is [`ChunkStatus::Noise`].
    pub fn build_surface(&self, chunk: &ProtoChunk) -> anyhow::Result<()> {
        Self::begin_stage(chunk, ChunkStatus::Surface)?;

        let mut noise = self.noise_session(chunk.pos());
        self.surface.build_surface(
            chunk,
            &mut noise,
            self.surface_rule.as_ref(),
            self.settings.legacy_random_source,
        );

        chunk.set_status(ChunkStatus::Surface);
        Ok(())
    }

    /// Carvers are not generated; the stage only advances the status.
    ///
    /// # Errors
    ///
    /// Returns an error unless the chunk is [`ChunkStatus::Surface`].
    pub fn apply_carvers(&self, chunk: &ProtoChunk) -> anyhow::Result<()> {
        Self::begin_stage(chunk, ChunkStatus::Carvers)?;
        chunk.set_status(ChunkStatus::Carvers);
        Ok(())
    }

    /// Height the noise fill would give column `(x, z)` in `kind`: one above
    /// the highest block counting for that heightmap, or the bottom of the
    /// world when there is none.
    #[must_use]
    pub fn base_height(&self, x: i32, z: i32, kind: HeightmapType) -> i32 {
        self.iterate_noise_column(x, z, None, |state| kind.is_opaque(state))
            .unwrap_or(self.min_y())
    }

    /// Every block the noise fill would place in column `(x, z)`.
    #[must_use]
    pub fn base_column(&self, x: i32, z: i32) -> NoiseColumn {
        let mut states = Vec::new();
        self.iterate_noise_column(x, z, Some(&mut states), |_| false);
        NoiseColumn { min_y: self.min_y(), states }
    }

    /// Samples column `(x, z)` top down through a single-column session.
    ///
    /// Stops at the first state accepted by `stop_at` and returns the
    /// height above it. Sampled states are written into `states`, indexed
    /// from the bottom of the world.
    fn iterate_noise_column(
        &self,
        x: i32,
        z: i32,
        mut states: Option<&mut Vec<BlockStateId>>,
        stop_at: impl Fn(BlockStateId) -> bool,
    ) -> Option<i32> {
        let settings = self.settings.noise;
        let (width, height) = (settings.cell_width(), settings.cell_height());
        let min_cell_y = settings.min_cell_y();
        let cells_y = settings.cell_count_y();
        if cells_y <= 0 {
            return None;
        }

        if let Some(states) = states.as_deref_mut() {
            states.clear();
            states.resize((cells_y * height) as usize, BlockStateId::AIR);
        }

        let cell_x = floor_div(x, width) * width;
        let cell_z = floor_div(z, width) * width;
        let delta_x = f64::from(floor_mod(x, width)) / f64::from(width);
        let delta_z = f64::from(floor_mod(z, width)) / f64::from(width);

        let mut noise =
            ChunkNoiseGenerator::for_column(&self.proto, cell_x, cell_z, &self.fill_config);
        noise.initialize_first_cell_x();
        noise.advance_cell_x(0);

        for cell_y in (0..cells_y).rev() {
            noise.select_cell_yz(cell_y as usize, 0);
            for in_y in (0..height).rev() {
                let y = (min_cell_y + cell_y) * height + in_y;
                noise.update_for_y(y, f64::from(in_y) / f64::from(height));
                noise.update_for_x(x, delta_x);
                noise.update_for_z(z, delta_z);

                let state = noise
                    .sample_block_state()
                    .unwrap_or(self.settings.default_block);
                if let Some(states) = states.as_deref_mut() {
                    states[(cell_y * height + in_y) as usize] = state;
                }
                if stop_at(state) {
                    noise.stop_interpolation();
                    return Some(y + 1);
                }
            }
        }

        noise.stop_interpolation();
        None
    }
}

/// Reads a block straight from write-locked sections.
fn section_block(
    sections: &[impl Deref<Target = ChunkSection>],
    min_y: i32,
    x: i32,
    y: i32,
    z: i32,
) -> BlockStateId {
    usize::try_from((y - min_y) >> 4)
        .ok()
        .and_then(|index| sections.get(index))
        .map_or(BlockStateId::AIR, |section| {
            section.get_block_state(x as usize, (y & 15) as usize, z as usize)
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::biome::FixedBiomeSource;

    fn generator() -> NoiseChunkGenerator {
        NoiseChunkGenerator::new(
            0,
            GeneratorSettings::overworld(),
            Arc::new(FixedBiomeSource(Biome::Plains)),
        )
        .unwrap()
    }

    #[test]
    fn test_invalid_settings_are_rejected() {
        let mut settings = GeneratorSettings::overworld();
        settings.noise.height = 100;
        let result =
            NoiseChunkGenerator::new(0, settings, Arc::new(FixedBiomeSource(Biome::Plains)));
        assert!(result.is_err());
    }

    #[test]
    fn test_stages_must_run_in_order() {
        let generator = generator();
        let chunk = generator.create_proto_chunk(ChunkPos::new(0, 0));
        assert!(generator.fill_from_noise(&chunk).is_err());
        assert!(generator.build_surface(&chunk).is_err());
        generator.create_biomes(&chunk).unwrap();
        assert!(generator.create_biomes(&chunk).is_err());
        assert_eq!(chunk.status(), ChunkStatus::Biomes);
    }

    #[test]
    fn test_base_column_agrees_with_base_height() {
        let generator = generator();
        let column = generator.base_column(5, -3);
        assert_eq!(column.states().len(), 384);
        let top = (column.min_y()..column.min_y() + 384)
            .rev()
            .find(|&y| !column.get_block(y).is_air())
            .map_or(column.min_y(), |y| y + 1);
        assert_eq!(generator.base_height(5, -3, HeightmapType::WorldSurfaceWg), top);
        assert_eq!(column.get_block(column.min_y() - 1), BlockStateId::AIR);
    }
}
