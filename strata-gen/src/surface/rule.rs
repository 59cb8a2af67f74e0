//! Rules choosing the block that replaces the default block near the surface.

use strata_noise::BlockStateId;
use strata_noise::math::map;
use strata_noise::random::{PositionalRandom, Random};

use crate::biome::Biome;

use super::context::SurfaceContext;

/// Picks a replacement for the default block at the context's position.
///
/// `None` keeps the block as it is.
pub trait SurfaceRule: Send + Sync {
    fn try_apply(&self, ctx: &mut SurfaceContext<'_, '_>) -> Option<BlockStateId>;
}

impl<F> SurfaceRule for F
where
    F: Fn(&mut SurfaceContext<'_, '_>) -> Option<BlockStateId> + Send + Sync,
{
    fn try_apply(&self, ctx: &mut SurfaceContext<'_, '_>) -> Option<BlockStateId> {
        self(ctx)
    }
}

/// The block is within `1 + offset` blocks of the air above it, plus the
/// column surface depth when `add_surface_depth` is set and a share of
/// `secondary_range` taken from the secondary surface noise.
pub fn stone_depth_check(
    ctx: &mut SurfaceContext<'_, '_>,
    offset: i32,
    add_surface_depth: bool,
    secondary_range: i32,
) -> bool {
    let surface_depth = if add_surface_depth { ctx.surface_depth } else { 0 };
    let secondary = if secondary_range == 0 {
        0
    } else {
        map(ctx.surface_secondary(), -1.0, 1.0, 0.0, f64::from(secondary_range)) as i32
    };
    ctx.stone_depth_above <= 1 + offset + surface_depth + secondary
}

/// No fluid above the block, or the block is at most one below its surface.
#[must_use]
pub fn is_at_or_above_water_level(ctx: &SurfaceContext<'_, '_>) -> bool {
    ctx.water_height == i32::MIN || ctx.block_y >= ctx.water_height - 1
}

/// Always true at or below `true_at`, never at or above `false_at`, and a
/// linearly fading chance in between, rolled per block from the named random.
pub fn vertical_gradient(
    ctx: &SurfaceContext<'_, '_>,
    random_id: &str,
    true_at: i32,
    false_at: i32,
) -> bool {
    let y = ctx.block_y;
    if y <= true_at {
        return true;
    }
    if y >= false_at {
        return false;
    }
    let chance = map(f64::from(y), f64::from(true_at), f64::from(false_at), 1.0, 0.0);
    let mut random = ctx
        .system
        .random_factory(random_id)
        .at(ctx.block_x, y, ctx.block_z);
    f64::from(random.next_f32()) < chance
}

/// A compact overworld rule: a bedrock floor, biome topsoil down to the
/// preliminary surface, and deepslate fading in below `y = 8`.
#[derive(Clone, Copy, Debug, Default)]
pub struct DefaultSurfaceRule;

impl DefaultSurfaceRule {
    fn topsoil(ctx: &mut SurfaceContext<'_, '_>) -> Option<BlockStateId> {
        let on_floor = stone_depth_check(ctx, 0, false, 0);
        let under_floor = stone_depth_check(ctx, 0, true, 0);
        let dry = is_at_or_above_water_level(ctx);

        match ctx.biome() {
            Biome::Desert | Biome::Beach => {
                if under_floor {
                    Some(BlockStateId::SAND)
                } else if stone_depth_check(ctx, 0, true, 6) {
                    Some(BlockStateId::SANDSTONE)
                } else {
                    None
                }
            }
            Biome::Badlands | Biome::ErodedBadlands => {
                if on_floor && dry && ctx.block_y < 74 {
                    Some(BlockStateId::RED_SAND)
                } else if ctx.block_y >= 63 {
                    Some(ctx.system.get_band(ctx.block_x, ctx.block_y, ctx.block_z))
                } else if under_floor {
                    Some(BlockStateId::ORANGE_TERRACOTTA)
                } else {
                    None
                }
            }
            Biome::Ocean | Biome::DeepOcean | Biome::FrozenOcean | Biome::DeepFrozenOcean => {
                under_floor.then_some(BlockStateId::GRAVEL)
            }
            Biome::River if !dry => under_floor.then_some(BlockStateId::SAND),
            Biome::SnowyPlains => {
                if on_floor && dry {
                    Some(BlockStateId::SNOW_BLOCK)
                } else {
                    under_floor.then_some(BlockStateId::DIRT)
                }
            }
            Biome::Plains | Biome::Forest | Biome::River => {
                if on_floor && dry {
                    Some(BlockStateId::GRASS_BLOCK)
                } else {
                    under_floor.then_some(BlockStateId::DIRT)
                }
            }
        }
    }
}

impl SurfaceRule for DefaultSurfaceRule {
    fn try_apply(&self, ctx: &mut SurfaceContext<'_, '_>) -> Option<BlockStateId> {
        let min_y = ctx.chunk.min_y();
        if vertical_gradient(ctx, "minecraft:bedrock_floor", min_y, min_y + 5) {
            return Some(BlockStateId::BEDROCK);
        }

        if ctx.block_y >= ctx.min_surface_level() {
            if let Some(state) = Self::topsoil(ctx) {
                return Some(state);
            }
        }

        vertical_gradient(ctx, "minecraft:deepslate", 0, 8).then_some(BlockStateId::DEEPSLATE)
    }
}
