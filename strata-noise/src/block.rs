//! Block states used by the generator.
//!
//! The generator never needs the full block registry, only a handful of
//! states it places itself and a few material queries. [`BlockStateId`] is a
//! small index into that fixed table.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A block state placed by the generator.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct BlockStateId(pub u16);

struct BlockInfo {
    name: &'static str,
    air: bool,
    fluid: bool,
    blocks_motion: bool,
}

const fn solid(name: &'static str) -> BlockInfo {
    BlockInfo {
        name,
        air: false,
        fluid: false,
        blocks_motion: true,
    }
}

const BLOCKS: &[BlockInfo] = &[
    BlockInfo {
        name: "minecraft:air",
        air: true,
        fluid: false,
        blocks_motion: false,
    },
    solid("minecraft:stone"),
    solid("minecraft:deepslate"),
    BlockInfo {
        name: "minecraft:water",
        air: false,
        fluid: true,
        blocks_motion: false,
    },
    BlockInfo {
        name: "minecraft:lava",
        air: false,
        fluid: true,
        blocks_motion: false,
    },
    solid("minecraft:bedrock"),
    solid("minecraft:copper_ore"),
    solid("minecraft:deepslate_copper_ore"),
    solid("minecraft:raw_copper_block"),
    solid("minecraft:granite"),
    solid("minecraft:iron_ore"),
    solid("minecraft:deepslate_iron_ore"),
    solid("minecraft:raw_iron_block"),
    solid("minecraft:tuff"),
    solid("minecraft:terracotta"),
    solid("minecraft:white_terracotta"),
    solid("minecraft:orange_terracotta"),
    solid("minecraft:yellow_terracotta"),
    solid("minecraft:brown_terracotta"),
    solid("minecraft:red_terracotta"),
    solid("minecraft:light_gray_terracotta"),
    solid("minecraft:ice"),
    solid("minecraft:packed_ice"),
    solid("minecraft:snow_block"),
    solid("minecraft:gravel"),
    solid("minecraft:sand"),
    solid("minecraft:red_sand"),
    solid("minecraft:sandstone"),
    solid("minecraft:grass_block"),
    solid("minecraft:dirt"),
];

impl BlockStateId {
    pub const AIR: Self = Self(0);
    pub const STONE: Self = Self(1);
    pub const DEEPSLATE: Self = Self(2);
    pub const WATER: Self = Self(3);
    pub const LAVA: Self = Self(4);
    pub const BEDROCK: Self = Self(5);
    pub const COPPER_ORE: Self = Self(6);
    pub const DEEPSLATE_COPPER_ORE: Self = Self(7);
    pub const RAW_COPPER_BLOCK: Self = Self(8);
    pub const GRANITE: Self = Self(9);
    pub const IRON_ORE: Self = Self(10);
    pub const DEEPSLATE_IRON_ORE: Self = Self(11);
    pub const RAW_IRON_BLOCK: Self = Self(12);
    pub const TUFF: Self = Self(13);
    pub const TERRACOTTA: Self = Self(14);
    pub const WHITE_TERRACOTTA: Self = Self(15);
    pub const ORANGE_TERRACOTTA: Self = Self(16);
    pub const YELLOW_TERRACOTTA: Self = Self(17);
    pub const BROWN_TERRACOTTA: Self = Self(18);
    pub const RED_TERRACOTTA: Self = Self(19);
    pub const LIGHT_GRAY_TERRACOTTA: Self = Self(20);
    pub const ICE: Self = Self(21);
    pub const PACKED_ICE: Self = Self(22);
    pub const SNOW_BLOCK: Self = Self(23);
    pub const GRAVEL: Self = Self(24);
    pub const SAND: Self = Self(25);
    pub const RED_SAND: Self = Self(26);
    pub const SANDSTONE: Self = Self(27);
    pub const GRASS_BLOCK: Self = Self(28);
    pub const DIRT: Self = Self(29);

    fn info(self) -> &'static BlockInfo {
        // Ids are only minted from the table, so this always hits.
        BLOCKS.get(usize::from(self.0)).unwrap_or(&BLOCKS[0])
    }

    #[must_use]
    pub fn name(self) -> &'static str {
        self.info().name
    }

    /// Looks a state up by its registry name, with or without the namespace.
    #[must_use]
    pub fn by_name(name: &str) -> Option<Self> {
        let path = name.strip_prefix("minecraft:").unwrap_or(name);
        BLOCKS
            .iter()
            .position(|info| info.name.strip_prefix("minecraft:") == Some(path))
            .map(|index| Self(index as u16))
    }

    #[inline]
    #[must_use]
    pub fn is_air(self) -> bool {
        self.info().air
    }

    /// Water or lava.
    #[inline]
    #[must_use]
    pub fn is_fluid(self) -> bool {
        self.info().fluid
    }

    /// Whether entities collide with the block. Drives `OCEAN_FLOOR_WG`.
    #[inline]
    #[must_use]
    pub fn blocks_motion(self) -> bool {
        self.info().blocks_motion
    }
}

impl fmt::Debug for BlockStateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BlockStateId({})", self.name())
    }
}

impl TryFrom<String> for BlockStateId {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::by_name(&value).ok_or_else(|| format!("unknown block state {value}"))
    }
}

impl From<BlockStateId> for String {
    fn from(value: BlockStateId) -> Self {
        value.name().to_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constants_match_table() {
        assert_eq!(BlockStateId::AIR.name(), "minecraft:air");
        assert_eq!(BlockStateId::DIRT.name(), "minecraft:dirt");
        assert_eq!(BLOCKS.len(), usize::from(BlockStateId::DIRT.0) + 1);
    }

    #[test]
    fn test_material_queries() {
        assert!(BlockStateId::AIR.is_air());
        assert!(!BlockStateId::WATER.is_air());
        assert!(BlockStateId::WATER.is_fluid());
        assert!(!BlockStateId::WATER.blocks_motion());
        assert!(BlockStateId::STONE.blocks_motion());
    }

    #[test]
    fn test_by_name_accepts_both_forms() {
        assert_eq!(BlockStateId::by_name("stone"), Some(BlockStateId::STONE));
        assert_eq!(
            BlockStateId::by_name("minecraft:water"),
            Some(BlockStateId::WATER)
        );
        assert_eq!(BlockStateId::by_name("minecraft:nope"), None);
    }
}
