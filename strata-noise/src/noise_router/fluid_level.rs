//! Fluid levels and the world's fallback fluid picker.

use crate::BlockStateId;

/// A fluid surface: `block` fills everything strictly below `level`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FluidLevel {
    level: i32,
    block: BlockStateId,
}

impl FluidLevel {
    #[must_use]
    pub const fn new(level: i32, block: BlockStateId) -> Self {
        Self { level, block }
    }

    /// The first Y that is no longer filled.
    #[inline]
    #[must_use]
    pub const fn level(&self) -> i32 {
        self.level
    }

    #[inline]
    #[must_use]
    pub const fn block(&self) -> BlockStateId {
        self.block
    }

    #[inline]
    #[must_use]
    pub fn at(&self, y: i32) -> BlockStateId {
        if y < self.level {
            self.block
        } else {
            BlockStateId::AIR
        }
    }
}

/// Fallback fluid for any position: a lava sea at the bottom of the world
/// and the default fluid up to sea level.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FluidPicker {
    lava: FluidLevel,
    sea: FluidLevel,
    lava_below: i32,
}

impl FluidPicker {
    /// Top of the bottom lava sea.
    pub const LAVA_LEVEL: i32 = -54;

    #[must_use]
    pub fn new(sea_level: i32, default_fluid: BlockStateId) -> Self {
        Self {
            lava: FluidLevel::new(Self::LAVA_LEVEL, BlockStateId::LAVA),
            sea: FluidLevel::new(sea_level, default_fluid),
            lava_below: Self::LAVA_LEVEL.min(sea_level),
        }
    }

    /// Picker that never fills anything, for worlds without fluids.
    #[must_use]
    pub const fn empty() -> Self {
        let dry = FluidLevel::new(i32::MIN, BlockStateId::AIR);
        Self {
            lava: dry,
            sea: dry,
            lava_below: i32::MIN,
        }
    }

    #[inline]
    #[must_use]
    pub const fn compute_fluid(&self, _x: i32, y: i32, _z: i32) -> FluidLevel {
        if y < self.lava_below { self.lava } else { self.sea }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fluid_level_fills_strictly_below() {
        let level = FluidLevel::new(63, BlockStateId::WATER);
        assert_eq!(level.at(62), BlockStateId::WATER);
        assert_eq!(level.at(63), BlockStateId::AIR);
    }

    #[test]
    fn test_picker_layers() {
        let picker = FluidPicker::new(63, BlockStateId::WATER);
        assert_eq!(picker.compute_fluid(0, -55, 0).at(-55), BlockStateId::LAVA);
        assert_eq!(picker.compute_fluid(0, -54, 0).at(-54), BlockStateId::WATER);
        assert_eq!(picker.compute_fluid(0, 80, 0).at(80), BlockStateId::AIR);
    }

    #[test]
    fn test_low_sea_level_moves_the_lava_boundary() {
        let picker = FluidPicker::new(-60, BlockStateId::WATER);
        assert_eq!(picker.compute_fluid(0, -61, 0).block(), BlockStateId::LAVA);
        assert_eq!(picker.compute_fluid(0, -60, 0).at(-60), BlockStateId::AIR);
    }

    #[test]
    fn test_empty_picker_is_dry() {
        let picker = FluidPicker::empty();
        assert!(picker.compute_fluid(0, -100, 0).at(-100).is_air());
    }
}
