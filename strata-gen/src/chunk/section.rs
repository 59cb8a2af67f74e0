//! 16x16x16 block sections and their biomes.

use std::sync::Arc;

use parking_lot::RwLock;
use strata_noise::BlockStateId;

use crate::biome::Biome;

pub const SECTION_SIZE: usize = 16 * 16 * 16;
/// Biomes are stored per 4x4x4 quart.
pub const SECTION_BIOMES: usize = 4 * 4 * 4;

#[derive(Clone, Debug)]
pub struct ChunkSection {
    states: Box<[BlockStateId]>,
    biomes: Box<[Biome]>,
    non_air_count: u16,
}

impl ChunkSection {
    #[must_use]
    pub fn new_empty() -> Self {
        Self {
            states: vec![BlockStateId::AIR; SECTION_SIZE].into_boxed_slice(),
            biomes: vec![Biome::Plains; SECTION_BIOMES].into_boxed_slice(),
            non_air_count: 0,
        }
    }

    #[inline]
    const fn index(x: usize, y: usize, z: usize) -> usize {
        (y << 8) | (z << 4) | x
    }

    /// State at section-relative `(x, y, z)`, each in `0..16`.
    #[inline]
    #[must_use]
    pub fn get_block_state(&self, x: usize, y: usize, z: usize) -> BlockStateId {
        self.states[Self::index(x, y, z)]
    }

    /// Replaces the state at `(x, y, z)` and returns the old one.
    pub fn set_block_state(&mut self, x: usize, y: usize, z: usize, state: BlockStateId) -> BlockStateId {
        let slot = &mut self.states[Self::index(x, y, z)];
        let old = std::mem::replace(slot, state);
        match (old.is_air(), state.is_air()) {
            (true, false) => self.non_air_count += 1,
            (false, true) => self.non_air_count -= 1,
            _ => {}
        }
        old
    }

    #[must_use]
    pub const fn has_only_air(&self) -> bool {
        self.non_air_count == 0
    }

    /// Biome of section-relative quart `(x, y, z)`, each in `0..4`.
    #[must_use]
    pub fn get_noise_biome(&self, x: usize, y: usize, z: usize) -> Biome {
        self.biomes[(y << 4) | (z << 2) | x]
    }

    pub fn set_noise_biome(&mut self, x: usize, y: usize, z: usize, biome: Biome) {
        self.biomes[(y << 4) | (z << 2) | x] = biome;
    }

    /// All states, indexed `y * 256 + z * 16 + x`.
    #[must_use]
    pub fn states(&self) -> &[BlockStateId] {
        &self.states
    }
}

/// The sections of a chunk, bottom up. Each section sits behind its own
/// lock so a stage can hold the sections it writes while other readers
/// use the rest.
#[derive(Debug)]
pub struct Sections {
    pub sections: Box<[Arc<RwLock<ChunkSection>>]>,
}

impl Sections {
    #[must_use]
    pub fn from_owned(sections: Box<[ChunkSection]>) -> Self {
        Self {
            sections: sections
                .into_vec()
                .into_iter()
                .map(|section| Arc::new(RwLock::new(section)))
                .collect(),
        }
    }

    #[must_use]
    pub fn empty(count: usize) -> Self {
        Self::from_owned((0..count).map(|_| ChunkSection::new_empty()).collect())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.sections.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Arc<RwLock<ChunkSection>>> {
        self.sections.get(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_air_count_tracks_writes() {
        let mut section = ChunkSection::new_empty();
        assert!(section.has_only_air());
        section.set_block_state(1, 2, 3, BlockStateId::STONE);
        section.set_block_state(1, 2, 3, BlockStateId::DIRT);
        assert!(!section.has_only_air());
        assert_eq!(section.get_block_state(1, 2, 3), BlockStateId::DIRT);
        let old = section.set_block_state(1, 2, 3, BlockStateId::AIR);
        assert_eq!(old, BlockStateId::DIRT);
        assert!(section.has_only_air());
    }

    #[test]
    fn test_biomes_are_per_quart() {
        let mut section = ChunkSection::new_empty();
        section.set_noise_biome(3, 0, 1, Biome::Desert);
        assert_eq!(section.get_noise_biome(3, 0, 1), Biome::Desert);
        assert_eq!(section.get_noise_biome(1, 0, 3), Biome::Plains);
    }
}
