//! A chunk while it is being generated.

use parking_lot::{Mutex, RwLock, RwLockReadGuard, RwLockWriteGuard};
use strata_noise::BlockStateId;

use crate::biome::Biome;

use super::heightmap::Heightmaps;
use super::missing_bedrock::MissingBedrockBitset;
use super::section::{ChunkSection, Sections};
use super::{BlockPos, ChunkPos, ChunkStatus, HeightmapType};

/// Blocks, biomes and generation bookkeeping of one chunk column.
///
/// All accessors take `&self`; each section and each bookkeeping table is
/// locked on its own, so several stages can read a chunk at once.
#[derive(Debug)]
pub struct ProtoChunk {
    pos: ChunkPos,
    min_y: i32,
    height: i32,
    sections: Sections,
    heightmaps: RwLock<Heightmaps>,
    post_processing: Mutex<Vec<BlockPos>>,
    status: RwLock<ChunkStatus>,
    below_zero_retrogen: Option<MissingBedrockBitset>,
}

impl ProtoChunk {
    /// An empty chunk spanning `height` blocks from `min_y`.
    #[must_use]
    pub fn new(pos: ChunkPos, min_y: i32, height: i32) -> Self {
        Self::with_sections(Sections::empty((height / 16) as usize), pos, min_y, height)
    }

    #[must_use]
    pub fn with_sections(sections: Sections, pos: ChunkPos, min_y: i32, height: i32) -> Self {
        debug_assert_eq!(sections.len() as i32 * 16, height, "sections do not cover the height");
        Self {
            pos,
            min_y,
            height,
            sections,
            heightmaps: RwLock::new(Heightmaps::new(min_y, height)),
            post_processing: Mutex::new(Vec::new()),
            status: RwLock::new(ChunkStatus::Empty),
            below_zero_retrogen: None,
        }
    }

    #[must_use]
    pub const fn pos(&self) -> ChunkPos {
        self.pos
    }

    #[must_use]
    pub const fn min_y(&self) -> i32 {
        self.min_y
    }

    /// One past the highest block.
    #[must_use]
    pub const fn max_y(&self) -> i32 {
        self.min_y + self.height
    }

    #[must_use]
    pub const fn height(&self) -> i32 {
        self.height
    }

    #[must_use]
    pub const fn sections(&self) -> &Sections {
        &self.sections
    }

    /// Section holding block `y`, if inside the chunk.
    #[must_use]
    pub fn section_index(&self, y: i32) -> Option<usize> {
        if y < self.min_y || y >= self.max_y() {
            return None;
        }
        Some(((y >> 4) - (self.min_y >> 4)) as usize)
    }

    /// State at `pos`; air outside the vertical range.
    #[must_use]
    pub fn get_block_state(&self, pos: BlockPos) -> BlockStateId {
        match self.section_index(pos.y).and_then(|index| self.sections.get(index)) {
            Some(section) => section.read().get_block_state(
                (pos.x & 15) as usize,
                (pos.y & 15) as usize,
                (pos.z & 15) as usize,
            ),
            None => BlockStateId::AIR,
        }
    }

    /// Places `state` and updates the heightmaps. Returns the previous
    /// state; positions outside the vertical range are ignored.
    pub fn set_block_state(&self, pos: BlockPos, state: BlockStateId) -> BlockStateId {
        let Some(section) = self.section_index(pos.y).and_then(|index| self.sections.get(index))
        else {
            return BlockStateId::AIR;
        };
        let old = section.write().set_block_state(
            (pos.x & 15) as usize,
            (pos.y & 15) as usize,
            (pos.z & 15) as usize,
            state,
        );
        if old != state {
            self.heightmaps.write().update(pos.x & 15, pos.y, pos.z & 15, state, |y| {
                self.get_block_state(BlockPos::new(pos.x, y, pos.z))
            });
        }
        old
    }

    /// Write locks on every section, bottom up, for a bulk fill.
    #[must_use]
    pub fn lock_sections(&self) -> Vec<RwLockWriteGuard<'_, ChunkSection>> {
        self.sections.sections.iter().map(|section| section.write()).collect()
    }

    #[must_use]
    pub fn heightmaps(&self) -> RwLockReadGuard<'_, Heightmaps> {
        self.heightmaps.read()
    }

    #[must_use]
    pub fn heightmaps_mut(&self) -> RwLockWriteGuard<'_, Heightmaps> {
        self.heightmaps.write()
    }

    /// First free Y above the top of column `(x, z)` in `kind`.
    #[must_use]
    pub fn first_available(&self, kind: HeightmapType, x: i32, z: i32) -> i32 {
        self.heightmaps.read().get(kind).first_available(x, z)
    }

    #[must_use]
    pub fn highest_taken(&self, kind: HeightmapType, x: i32, z: i32) -> i32 {
        self.heightmaps.read().get(kind).highest_taken(x, z)
    }

    #[must_use]
    pub fn heightmap_raw(&self, kind: HeightmapType) -> Vec<i64> {
        self.heightmaps.read().get(kind).raw_data()
    }

    /// Restores a stored heightmap, recomputing it when the data is malformed.
    pub fn set_heightmap_raw(&self, kind: HeightmapType, raw: &[i64]) {
        let top_y = self.highest_non_empty_section_top();
        let (base_x, base_z) = (self.pos.min_block_x(), self.pos.min_block_z());
        self.heightmaps
            .write()
            .get_mut(kind)
            .set_raw_data(self.pos, raw, top_y, |x, y, z| {
                self.get_block_state(BlockPos::new(base_x + x, y, base_z + z))
            });
    }

    /// One past the top of the highest section holding anything but air.
    #[must_use]
    pub fn highest_non_empty_section_top(&self) -> i32 {
        self.sections
            .sections
            .iter()
            .rposition(|section| !section.read().has_only_air())
            .map_or(self.min_y, |index| self.min_y + (index as i32 + 1) * 16)
    }

    /// Queues a fluid for a tick once the chunk is loaded.
    pub fn mark_pos_for_postprocessing(&self, pos: BlockPos) {
        self.post_processing.lock().push(pos);
    }

    #[must_use]
    pub fn post_processing(&self) -> Vec<BlockPos> {
        self.post_processing.lock().clone()
    }

    #[must_use]
    pub fn status(&self) -> ChunkStatus {
        *self.status.read()
    }

    pub fn set_status(&self, status: ChunkStatus) {
        *self.status.write() = status;
    }

    #[must_use]
    pub const fn below_zero_retrogen(&self) -> Option<&MissingBedrockBitset> {
        self.below_zero_retrogen.as_ref()
    }

    /// Marks the chunk as an upgrade of a chunk from the old world height.
    pub fn set_below_zero_retrogen(&mut self, retrogen: Option<MissingBedrockBitset>) {
        self.below_zero_retrogen = retrogen;
    }

    #[must_use]
    pub const fn is_upgrading(&self) -> bool {
        self.below_zero_retrogen.is_some()
    }

    /// Biome at quart `(x, y, z)`; `y` is clamped into the chunk.
    #[must_use]
    pub fn noise_biome(&self, quart_x: i32, quart_y: i32, quart_z: i32) -> Biome {
        let min_quart = self.min_y >> 2;
        let max_quart = min_quart + (self.height >> 2) - 1;
        let quart_y = quart_y.clamp(min_quart, max_quart);
        let index = ((quart_y << 2 >> 4) - (self.min_y >> 4)) as usize;
        self.sections.get(index).map_or(Biome::Plains, |section| {
            section.read().get_noise_biome(
                (quart_x & 3) as usize,
                (quart_y & 3) as usize,
                (quart_z & 3) as usize,
            )
        })
    }

    /// Fills every quart biome from `resolver`, called with absolute quart
    /// coordinates section by section, X then Y then Z.
    pub fn fill_biomes_from_noise(&self, mut resolver: impl FnMut(i32, i32, i32) -> Biome) {
        let quart_x = self.pos.x << 2;
        let quart_z = self.pos.z << 2;
        for (index, section) in self.sections.sections.iter().enumerate() {
            let quart_y = ((self.min_y >> 4) + index as i32) << 2;
            let mut section = section.write();
            for x in 0..4 {
                for y in 0..4 {
                    for z in 0..4 {
                        let biome = resolver(quart_x + x, quart_y + y, quart_z + z);
                        section.set_noise_biome(x as usize, y as usize, z as usize, biome);
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunk() -> ProtoChunk {
        ProtoChunk::new(ChunkPos::new(2, -1), -64, 384)
    }

    #[test]
    fn test_out_of_range_reads_air_and_ignores_writes() {
        let chunk = chunk();
        let above = BlockPos::new(32, 320, -16);
        assert_eq!(chunk.set_block_state(above, BlockStateId::STONE), BlockStateId::AIR);
        assert_eq!(chunk.get_block_state(above), BlockStateId::AIR);
        assert_eq!(chunk.get_block_state(BlockPos::new(32, -65, -16)), BlockStateId::AIR);
    }

    #[test]
    fn test_set_block_updates_heightmaps() {
        let chunk = chunk();
        chunk.set_block_state(BlockPos::new(33, 10, -15), BlockStateId::STONE);
        chunk.set_block_state(BlockPos::new(33, 11, -15), BlockStateId::WATER);
        assert_eq!(chunk.first_available(HeightmapType::WorldSurfaceWg, 1, 1), 12);
        assert_eq!(chunk.first_available(HeightmapType::OceanFloorWg, 1, 1), 11);

        chunk.set_block_state(BlockPos::new(33, 11, -15), BlockStateId::AIR);
        assert_eq!(chunk.first_available(HeightmapType::WorldSurfaceWg, 1, 1), 11);
    }

    #[test]
    fn test_malformed_heightmap_is_primed() {
        let chunk = chunk();
        chunk.set_block_state(BlockPos::new(40, 99, -8), BlockStateId::DIRT);
        chunk.heightmaps_mut().get_mut(HeightmapType::WorldSurfaceWg).set_height(8, 8, -64);
        chunk.set_heightmap_raw(HeightmapType::WorldSurfaceWg, &[0; 5]);
        assert_eq!(chunk.highest_taken(HeightmapType::WorldSurfaceWg, 8, 8), 99);
    }

    #[test]
    fn test_noise_biome_clamps_height() {
        let chunk = chunk();
        chunk.fill_biomes_from_noise(|_, y, _| if y < 0 { Biome::DeepOcean } else { Biome::Desert });
        assert_eq!(chunk.noise_biome(8, -100, -4), Biome::DeepOcean);
        assert_eq!(chunk.noise_biome(8, 1000, -4), Biome::Desert);
        assert_eq!(chunk.noise_biome(8, -1, -4), Biome::DeepOcean);
        assert_eq!(chunk.noise_biome(8, 0, -4), Biome::Desert);
    }

    #[test]
    fn test_section_index() {
        let chunk = chunk();
        assert_eq!(chunk.section_index(-64), Some(0));
        assert_eq!(chunk.section_index(-1), Some(3));
        assert_eq!(chunk.section_index(319), Some(23));
        assert_eq!(chunk.section_index(320), None);
        assert_eq!(chunk.highest_non_empty_section_top(), -64);
    }
}
