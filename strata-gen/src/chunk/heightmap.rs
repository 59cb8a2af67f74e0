//! Per-column top block tracking.

use log::warn;
use strata_noise::BlockStateId;

use super::bit_storage::SimpleBitStorage;
use super::{ChunkPos, HeightmapType};

const COLUMNS: usize = 256;

/// First free Y above the topmost block matching the heightmap's predicate,
/// for each of the 256 columns of a chunk. Columns without such a block
/// read as the bottom of the world.
#[derive(Clone, Debug)]
pub struct Heightmap {
    kind: HeightmapType,
    data: SimpleBitStorage,
    min_y: i32,
}

impl Heightmap {
    #[must_use]
    pub fn new(kind: HeightmapType, min_y: i32, height: i32) -> Self {
        Self {
            kind,
            data: SimpleBitStorage::new(Self::bits_for_height(height), COLUMNS),
            min_y,
        }
    }

    /// `ceil(log2(height + 1))`: enough bits for every value in
    /// `0..=height`.
    #[must_use]
    pub const fn bits_for_height(height: i32) -> u32 {
        u32::BITS - (height as u32).leading_zeros()
    }

    #[inline]
    const fn index(x: i32, z: i32) -> usize {
        ((x & 15) + (z & 15) * 16) as usize
    }

    #[must_use]
    pub const fn kind(&self) -> HeightmapType {
        self.kind
    }

    #[must_use]
    pub fn first_available(&self, x: i32, z: i32) -> i32 {
        self.data.get(Self::index(x, z)) as i32 + self.min_y
    }

    #[must_use]
    pub fn highest_taken(&self, x: i32, z: i32) -> i32 {
        self.first_available(x, z) - 1
    }

    pub fn set_height(&mut self, x: i32, z: i32, y: i32) {
        self.data.set(Self::index(x, z), (y - self.min_y) as u32);
    }

    /// Records that `state` was placed at `(x, y, z)`.
    ///
    /// Only placements at or next to the current top can change it. When
    /// the top block is replaced by one that does not count, the column is
    /// rescanned downwards through `block_at`. Returns whether the height
    /// changed.
    pub fn update(
        &mut self,
        x: i32,
        y: i32,
        z: i32,
        state: BlockStateId,
        block_at: impl Fn(i32) -> BlockStateId,
    ) -> bool {
        let first_available = self.first_available(x, z);
        if y <= first_available - 2 {
            return false;
        }
        if self.kind.is_opaque(state) {
            if y >= first_available {
                self.set_height(x, z, y + 1);
                return true;
            }
        } else if first_available - 1 == y {
            let top = (self.min_y..y)
                .rev()
                .find(|&below| self.kind.is_opaque(block_at(below)));
            self.set_height(x, z, top.map_or(self.min_y, |below| below + 1));
            return true;
        }
        false
    }

    /// Recomputes every column by scanning down from `top_y`.
    pub fn prime(&mut self, top_y: i32, block_at: impl Fn(i32, i32, i32) -> BlockStateId) {
        for z in 0..16 {
            for x in 0..16 {
                let top = (self.min_y..top_y)
                    .rev()
                    .find(|&y| self.kind.is_opaque(block_at(x, y, z)));
                self.set_height(x, z, top.map_or(self.min_y, |y| y + 1));
            }
        }
    }

    /// Packed heights as stored in chunk files.
    #[must_use]
    pub fn raw_data(&self) -> Vec<i64> {
        self.data.raw()
    }

    /// Restores packed heights. Data of the wrong length is dropped with a
    /// warning and the heights are recomputed from the blocks instead.
    pub fn set_raw_data(
        &mut self,
        pos: ChunkPos,
        raw: &[i64],
        top_y: i32,
        block_at: impl Fn(i32, i32, i32) -> BlockStateId,
    ) {
        match SimpleBitStorage::from_raw(self.data.bits(), COLUMNS, raw) {
            Ok(data) => self.data = data,
            Err(err) => {
                warn!(
                    "Ignoring {} heightmap data for chunk {pos:?}: {err}",
                    self.kind.serialization_key()
                );
                self.prime(top_y, block_at);
            }
        }
    }
}

/// The heightmaps a proto chunk keeps up to date while generating.
#[derive(Clone, Debug)]
pub struct Heightmaps {
    maps: [Heightmap; 2],
}

impl Heightmaps {
    #[must_use]
    pub fn new(min_y: i32, height: i32) -> Self {
        Self {
            maps: HeightmapType::ALL.map(|kind| Heightmap::new(kind, min_y, height)),
        }
    }

    #[must_use]
    pub fn get(&self, kind: HeightmapType) -> &Heightmap {
        &self.maps[kind as usize]
    }

    pub fn get_mut(&mut self, kind: HeightmapType) -> &mut Heightmap {
        &mut self.maps[kind as usize]
    }

    /// Feeds one placement to every heightmap.
    pub fn update(
        &mut self,
        x: i32,
        y: i32,
        z: i32,
        state: BlockStateId,
        block_at: impl Fn(i32) -> BlockStateId,
    ) {
        for map in &mut self.maps {
            map.update(x, y, z, state, &block_at);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn column(blocks: &[(i32, BlockStateId)]) -> impl Fn(i32) -> BlockStateId + '_ {
        move |y| {
            blocks
                .iter()
                .find(|(at, _)| *at == y)
                .map_or(BlockStateId::AIR, |(_, block)| *block)
        }
    }

    #[test]
    fn test_bits_for_height() {
        assert_eq!(Heightmap::bits_for_height(384), 9);
        assert_eq!(Heightmap::bits_for_height(511), 9);
        assert_eq!(Heightmap::bits_for_height(512), 10);
        assert_eq!(Heightmap::bits_for_height(256), 9);
    }

    #[test]
    fn test_empty_column_reads_world_bottom() {
        let map = Heightmap::new(HeightmapType::WorldSurfaceWg, -64, 384);
        assert_eq!(map.first_available(3, 9), -64);
        assert_eq!(map.highest_taken(3, 9), -65);
        assert_eq!(map.raw_data().len(), 37);
    }

    #[test]
    fn test_update_raises_top() {
        let mut map = Heightmap::new(HeightmapType::WorldSurfaceWg, -64, 384);
        let blocks = [(10, BlockStateId::STONE)];
        assert!(map.update(1, 10, 2, BlockStateId::STONE, column(&blocks)));
        assert_eq!(map.first_available(1, 2), 11);
        // Below the top: no change.
        assert!(!map.update(1, 5, 2, BlockStateId::STONE, column(&blocks)));
        assert_eq!(map.highest_taken(1, 2), 10);
    }

    #[test]
    fn test_removing_top_rescans() {
        let mut map = Heightmap::new(HeightmapType::WorldSurfaceWg, -64, 384);
        map.set_height(0, 0, 21);
        let blocks = [(12, BlockStateId::DIRT)];
        assert!(map.update(0, 20, 0, BlockStateId::AIR, column(&blocks)));
        assert_eq!(map.first_available(0, 0), 13);

        let mut map = Heightmap::new(HeightmapType::WorldSurfaceWg, -64, 384);
        map.set_height(0, 0, 21);
        assert!(map.update(0, 20, 0, BlockStateId::AIR, column(&[])));
        assert_eq!(map.first_available(0, 0), -64);
    }

    #[test]
    fn test_ocean_floor_ignores_water() {
        let mut map = Heightmap::new(HeightmapType::OceanFloorWg, -64, 384);
        let blocks = [(40, BlockStateId::GRAVEL), (50, BlockStateId::WATER)];
        map.update(0, 40, 0, BlockStateId::GRAVEL, column(&blocks));
        map.update(0, 50, 0, BlockStateId::WATER, column(&blocks));
        assert_eq!(map.highest_taken(0, 0), 40);
    }

    #[test]
    fn test_bad_raw_data_is_recomputed() {
        let mut map = Heightmap::new(HeightmapType::WorldSurfaceWg, -64, 384);
        map.set_raw_data(ChunkPos::new(0, 0), &[1, 2, 3], 320, |x, y, _| {
            if x == 4 && y <= 70 {
                BlockStateId::STONE
            } else {
                BlockStateId::AIR
            }
        });
        assert_eq!(map.first_available(4, 0), 71);
        assert_eq!(map.first_available(5, 0), -64);
    }

    #[test]
    fn test_heightmaps_update_together() {
        let mut maps = Heightmaps::new(-64, 384);
        maps.update(2, 70, 2, BlockStateId::WATER, |_| BlockStateId::AIR);
        assert_eq!(maps.get(HeightmapType::WorldSurfaceWg).first_available(2, 2), 71);
        assert_eq!(maps.get(HeightmapType::OceanFloorWg).first_available(2, 2), -64);
    }

    #[test]
    fn test_raw_data_round_trip() {
        let mut map = Heightmap::new(HeightmapType::OceanFloorWg, -64, 384);
        map.set_height(15, 15, 200);
        map.set_height(0, 7, -10);
        let raw = map.raw_data();

        let mut restored = Heightmap::new(HeightmapType::OceanFloorWg, -64, 384);
        restored.set_raw_data(ChunkPos::new(0, 0), &raw, 320, |_, _, _| BlockStateId::AIR);
        assert_eq!(restored.first_available(15, 15), 200);
        assert_eq!(restored.first_available(0, 7), -10);
    }
}
