use strata_noise::math::{floor, lerp2};
use strata_noise::noise_router::ChunkNoiseGenerator;

use crate::biome::Biome;
use crate::chunk::proto_chunk::ProtoChunk;

use super::system::SurfaceSystem;

/// The block the surface pass is looking at, with the column values rules
/// read. Expensive values are computed on first use and reset when the
/// column or block changes.
pub struct SurfaceContext<'a, 'b> {
    pub system: &'a SurfaceSystem,
    pub chunk: &'a ProtoChunk,
    noise: &'a mut ChunkNoiseGenerator<'b>,

    pub block_x: i32,
    pub block_z: i32,
    pub surface_depth: i32,
    surface_secondary: Option<f64>,
    min_surface_level: Option<i32>,
    preliminary_cell: Option<(i32, i32)>,
    preliminary_levels: [i32; 4],

    pub block_y: i32,
    pub stone_depth_above: i32,
    pub stone_depth_below: i32,
    /// `i32::MIN` when no fluid sits above the block.
    pub water_height: i32,
    biome: Option<Biome>,
}

impl<'a, 'b> SurfaceContext<'a, 'b> {
    #[must_use]
    pub fn new(
        system: &'a SurfaceSystem,
        chunk: &'a ProtoChunk,
        noise: &'a mut ChunkNoiseGenerator<'b>,
    ) -> Self {
        Self {
            system,
            chunk,
            noise,
            block_x: 0,
            block_z: 0,
            surface_depth: 0,
            surface_secondary: None,
            min_surface_level: None,
            preliminary_cell: None,
            preliminary_levels: [0; 4],
            block_y: 0,
            stone_depth_above: 0,
            stone_depth_below: 0,
            water_height: i32::MIN,
            biome: None,
        }
    }

    /// Moves to column `(x, z)`.
    pub fn update_xz(&mut self, x: i32, z: i32) {
        self.block_x = x;
        self.block_z = z;
        self.surface_depth = self.system.surface_depth(x, z);
        self.surface_secondary = None;
        self.min_surface_level = None;
    }

    /// Moves to block `y` of the current column.
    pub fn update_y(
        &mut self,
        stone_depth_above: i32,
        stone_depth_below: i32,
        water_height: i32,
        y: i32,
    ) {
        self.block_y = y;
        self.stone_depth_above = stone_depth_above;
        self.stone_depth_below = stone_depth_below;
        self.water_height = water_height;
        self.biome = None;
    }

    pub fn surface_secondary(&mut self) -> f64 {
        *self
            .surface_secondary
            .get_or_insert_with(|| self.system.surface_secondary(self.block_x, self.block_z))
    }

    /// Biome of the quart holding the current block.
    pub fn biome(&mut self) -> Biome {
        *self.biome.get_or_insert_with(|| {
            self.chunk
                .noise_biome(self.block_x >> 2, self.block_y >> 2, self.block_z >> 2)
        })
    }

    /// Lowest height the surface layer may reach in this column: the
    /// preliminary surface of the four surrounding 16-block corners,
    /// blended bilinearly, lowered by 8 and raised by the surface depth.
    pub fn min_surface_level(&mut self) -> i32 {
        if let Some(level) = self.min_surface_level {
            return level;
        }

        let cell = (self.block_x >> 4, self.block_z >> 4);
        if self.preliminary_cell != Some(cell) {
            let (cell_x, cell_z) = cell;
            for (slot, (dx, dz)) in [(0, 0), (1, 0), (0, 1), (1, 1)].into_iter().enumerate() {
                self.preliminary_levels[slot] = self
                    .noise
                    .preliminary_surface_level((cell_x + dx) << 4, (cell_z + dz) << 4);
            }
            self.preliminary_cell = Some(cell);
        }

        let [c00, c10, c01, c11] = self.preliminary_levels.map(f64::from);
        let fx = f64::from((self.block_x & 15) as f32 / 16.0);
        let fz = f64::from((self.block_z & 15) as f32 / 16.0);
        let level = floor(lerp2(fx, fz, c00, c10, c01, c11))
            .wrapping_add(self.surface_depth)
            .wrapping_sub(8);
        self.min_surface_level = Some(level);
        level
    }
}
