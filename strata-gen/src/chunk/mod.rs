//! Chunk data written by the generation stages.

pub mod bit_storage;
pub mod heightmap;
pub mod missing_bedrock;
pub mod proto_chunk;
pub mod section;

use std::fmt;

use serde::{Deserialize, Serialize};
use strata_noise::BlockStateId;

/// Horizontal position of a chunk, in chunk units.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct ChunkPos {
    pub x: i32,
    pub z: i32,
}

impl ChunkPos {
    #[must_use]
    pub const fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }

    /// Chunk holding block `(x, z)`.
    #[must_use]
    pub const fn from_block(x: i32, z: i32) -> Self {
        Self::new(x >> 4, z >> 4)
    }

    #[must_use]
    pub const fn min_block_x(self) -> i32 {
        self.x << 4
    }

    #[must_use]
    pub const fn min_block_z(self) -> i32 {
        self.z << 4
    }
}

impl fmt::Debug for ChunkPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.x, self.z)
    }
}

/// Absolute block position.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BlockPos {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl BlockPos {
    #[must_use]
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }
}

/// Generation stages a proto chunk moves through, in order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChunkStatus {
    Empty,
    Biomes,
    Noise,
    Surface,
    Carvers,
}

impl ChunkStatus {
    /// The stage that must have completed before this one runs.
    #[must_use]
    pub const fn parent(self) -> Option<Self> {
        match self {
            Self::Empty => None,
            Self::Biomes => Some(Self::Empty),
            Self::Noise => Some(Self::Biomes),
            Self::Surface => Some(Self::Noise),
            Self::Carvers => Some(Self::Surface),
        }
    }
}

/// Heightmaps maintained during world generation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HeightmapType {
    /// Highest non-air block.
    #[serde(rename = "WORLD_SURFACE_WG")]
    WorldSurfaceWg,
    /// Highest block that blocks motion.
    #[serde(rename = "OCEAN_FLOOR_WG")]
    OceanFloorWg,
}

impl HeightmapType {
    pub const ALL: [Self; 2] = [Self::WorldSurfaceWg, Self::OceanFloorWg];

    /// Whether `state` counts as the top of the column.
    #[must_use]
    pub fn is_opaque(self, state: BlockStateId) -> bool {
        match self {
            Self::WorldSurfaceWg => !state.is_air(),
            Self::OceanFloorWg => state.blocks_motion(),
        }
    }

    #[must_use]
    pub const fn serialization_key(self) -> &'static str {
        match self {
            Self::WorldSurfaceWg => "WORLD_SURFACE_WG",
            Self::OceanFloorWg => "OCEAN_FLOOR_WG",
        }
    }
}
