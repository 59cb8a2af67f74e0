//! Wiring of the overworld density graph.
//!
//! Shared sub-graphs are registered by name on the builder, so every output
//! that reuses one (the shift fields, the climate fields, the cave networks)
//! points at the same stack entry and therefore at the same session cache.

use super::component::base_noise_router::{
    BaseNoiseRouter, DensityFunctionBuilder, DensityHandle, RarityValueMapper, TerrainSplineType,
};
use super::ore_sampler::VeinType;
use crate::noise::NoiseParameters;

pub const ZERO: &str = "minecraft:zero";
pub const Y: &str = "minecraft:y";
pub const SHIFT_X: &str = "minecraft:shift_x";
pub const SHIFT_Z: &str = "minecraft:shift_z";
pub const BASE_3D_NOISE: &str = "minecraft:overworld/base_3d_noise";
pub const CONTINENTS: &str = "minecraft:overworld/continents";
pub const EROSION: &str = "minecraft:overworld/erosion";
pub const RIDGES: &str = "minecraft:overworld/ridges";
pub const FACTOR: &str = "minecraft:overworld/factor";
pub const DEPTH: &str = "minecraft:overworld/depth";
pub const SLOPED_CHEESE: &str = "minecraft:overworld/sloped_cheese";
pub const SPAGHETTI_ROUGHNESS_FUNCTION: &str = "minecraft:overworld/caves/spaghetti_roughness_function";
pub const SPAGHETTI_2D_THICKNESS_MODULATOR: &str =
    "minecraft:overworld/caves/spaghetti_2d_thickness_modulator";
pub const SPAGHETTI_2D: &str = "minecraft:overworld/caves/spaghetti_2d";
pub const ENTRANCES: &str = "minecraft:overworld/caves/entrances";
pub const NOODLE: &str = "minecraft:overworld/caves/noodle";
pub const PILLARS: &str = "minecraft:overworld/caves/pillars";

/// Below this sloped-cheese value the surface variant of the terrain is used.
const SURFACE_DENSITY_THRESHOLD: f64 = 1.5625;
/// Gradient limits wide enough that `Y` is the plain block Y everywhere.
const Y_GRADIENT_MIN: i32 = -4064;
const Y_GRADIENT_MAX: i32 = 4062;
const WORLD_MIN_Y: i32 = -64;
const WORLD_MAX_Y: i32 = 320;

/// Looks up a registered holder. Every name used below is registered by
/// [`bootstrap`] before it is read.
fn holder(builder: &DensityFunctionBuilder, name: &'static str) -> DensityHandle {
    match builder.get(name) {
        Some(handle) => handle,
        None => unreachable!("density holder {name} read before registration"),
    }
}

fn noise(
    builder: &mut DensityFunctionBuilder,
    parameters: &'static NoiseParameters,
    xz_scale: f64,
    y_scale: f64,
) -> DensityHandle {
    builder.noise(parameters, xz_scale, y_scale)
}

fn mapped_noise(
    builder: &mut DensityFunctionBuilder,
    parameters: &'static NoiseParameters,
    xz_scale: f64,
    y_scale: f64,
    from: f64,
    to: f64,
) -> DensityHandle {
    let noise = builder.noise(parameters, xz_scale, y_scale);
    builder.map_from_unit_to(noise, from, to)
}

/// A terrain spline blended towards `blending_target` by the blend alpha,
/// cached per column.
#[allow(clippy::too_many_arguments)]
fn spline_with_blending(
    builder: &mut DensityFunctionBuilder,
    continents: DensityHandle,
    erosion: DensityHandle,
    ridges: DensityHandle,
    spline: TerrainSplineType,
    min_value: f64,
    max_value: f64,
    blending_target: DensityHandle,
) -> DensityHandle {
    let spline =
        builder.terrain_shaper_spline(continents, erosion, ridges, spline, min_value, max_value);
    let alpha = builder.blend_alpha();
    let blended = builder.lerp(alpha, blending_target, spline);
    let cached = builder.cache_2d(blended);
    builder.flat_cache(cached)
}

fn noise_gradient_density(
    builder: &mut DensityFunctionBuilder,
    factor: DensityHandle,
    depth: DensityHandle,
) -> DensityHandle {
    let scaled = builder.mul(depth, factor);
    let four = builder.constant(4.0);
    let quartered = builder.quarter_negative(scaled);
    builder.mul(four, quartered)
}

/// Interpolated `input` between `min_y` and `max_y`, `fallback` elsewhere.
fn y_limited_interpolatable(
    builder: &mut DensityFunctionBuilder,
    y: DensityHandle,
    input: DensityHandle,
    min_y: i32,
    max_y: i32,
    fallback: f64,
) -> DensityHandle {
    let fallback = builder.constant(fallback);
    let limited = builder.range_choice(
        y,
        f64::from(min_y),
        f64::from(max_y + 1),
        input,
        fallback,
    );
    builder.interpolated(limited)
}

fn sloped_cheese(
    builder: &mut DensityFunctionBuilder,
    continents: DensityHandle,
    erosion: DensityHandle,
    ridges: DensityHandle,
    factor: DensityHandle,
    depth: DensityHandle,
    jagged_noise: DensityHandle,
) -> DensityHandle {
    let blending_jaggedness = builder.zero();
    let jaggedness = spline_with_blending(
        builder,
        continents,
        erosion,
        ridges,
        TerrainSplineType::Jaggedness,
        0.0,
        1.28,
        blending_jaggedness,
    );
    let half_negative = builder.half_negative(jagged_noise);
    let jagged = builder.mul(jaggedness, half_negative);
    let jagged_depth = builder.add(depth, jagged);
    let density = noise_gradient_density(builder, factor, jagged_depth);
    let base = holder(builder, BASE_3D_NOISE);
    builder.add(density, base)
}

fn spaghetti_roughness_function(builder: &mut DensityFunctionBuilder) -> DensityHandle {
    let roughness = noise(builder, &NoiseParameters::SPAGHETTI_ROUGHNESS, 1.0, 1.0);
    let modulator = mapped_noise(
        builder,
        &NoiseParameters::SPAGHETTI_ROUGHNESS_MODULATOR,
        1.0,
        1.0,
        0.0,
        -0.1,
    );
    let abs = builder.abs(roughness);
    let offset = builder.constant(-0.4);
    let shifted = builder.add(abs, offset);
    let product = builder.mul(modulator, shifted);
    builder.cache_once(product)
}

fn spaghetti_2d(builder: &mut DensityFunctionBuilder) -> DensityHandle {
    let modulator = noise(builder, &NoiseParameters::SPAGHETTI_2D_MODULATOR, 2.0, 1.0);
    let sampler = builder.weird_scaled(
        modulator,
        &NoiseParameters::SPAGHETTI_2D,
        RarityValueMapper::Type2,
    );
    let elevation = mapped_noise(
        builder,
        &NoiseParameters::SPAGHETTI_2D_ELEVATION,
        1.0,
        0.0,
        f64::from(WORLD_MIN_Y.div_euclid(8)),
        8.0,
    );
    let thickness_modulator = holder(builder, SPAGHETTI_2D_THICKNESS_MODULATOR);
    let gradient = builder.y_clamped_gradient(WORLD_MIN_Y, WORLD_MAX_Y, 8.0, -40.0);
    let elevated = builder.add(elevation, gradient);
    let elevated = builder.abs(elevated);
    let thickened = builder.add(elevated, thickness_modulator);
    let ridge = builder.cube(thickened);
    let weight = builder.constant(0.083);
    let weighted = builder.mul(weight, thickness_modulator);
    let tunnel = builder.add(sampler, weighted);
    let combined = builder.max(tunnel, ridge);
    builder.clamp(combined, -1.0, 1.0)
}

fn entrances(builder: &mut DensityFunctionBuilder) -> DensityHandle {
    let rarity = noise(builder, &NoiseParameters::SPAGHETTI_3D_RARITY, 2.0, 1.0);
    let rarity = builder.cache_once(rarity);
    let thickness = mapped_noise(
        builder,
        &NoiseParameters::SPAGHETTI_3D_THICKNESS,
        1.0,
        1.0,
        -0.065,
        -0.088,
    );
    let first = builder.weird_scaled(
        rarity,
        &NoiseParameters::SPAGHETTI_3D_1,
        RarityValueMapper::Type1,
    );
    let second = builder.weird_scaled(
        rarity,
        &NoiseParameters::SPAGHETTI_3D_2,
        RarityValueMapper::Type1,
    );
    let tunnels = builder.max(first, second);
    let tunnels = builder.add(tunnels, thickness);
    let spaghetti_3d = builder.clamp(tunnels, -1.0, 1.0);
    let roughness = holder(builder, SPAGHETTI_ROUGHNESS_FUNCTION);
    let cave_entrance = noise(builder, &NoiseParameters::CAVE_ENTRANCE, 0.75, 0.5);
    let bias = builder.constant(0.37);
    let entrance = builder.add(cave_entrance, bias);
    let gradient = builder.y_clamped_gradient(-10, 30, 0.3, 0.0);
    let entrance = builder.add(entrance, gradient);
    let rough_tunnels = builder.add(roughness, spaghetti_3d);
    let combined = builder.min(entrance, rough_tunnels);
    builder.cache_once(combined)
}

fn noodle(builder: &mut DensityFunctionBuilder) -> DensityHandle {
    const MIN_Y: i32 = -60;
    const MAX_Y: i32 = 320;
    const RIDGE_SCALE: f64 = 2.666_666_666_666_666_5;

    let y = holder(builder, Y);
    let toggle_noise = noise(builder, &NoiseParameters::NOODLE, 1.0, 1.0);
    let toggle = y_limited_interpolatable(builder, y, toggle_noise, MIN_Y, MAX_Y, -1.0);
    let thickness_noise = mapped_noise(
        builder,
        &NoiseParameters::NOODLE_THICKNESS,
        1.0,
        1.0,
        -0.05,
        -0.1,
    );
    let thickness = y_limited_interpolatable(builder, y, thickness_noise, MIN_Y, MAX_Y, 0.0);
    let ridge_a_noise = noise(builder, &NoiseParameters::NOODLE_RIDGE_A, RIDGE_SCALE, RIDGE_SCALE);
    let ridge_a = y_limited_interpolatable(builder, y, ridge_a_noise, MIN_Y, MAX_Y, 0.0);
    let ridge_b_noise = noise(builder, &NoiseParameters::NOODLE_RIDGE_B, RIDGE_SCALE, RIDGE_SCALE);
    let ridge_b = y_limited_interpolatable(builder, y, ridge_b_noise, MIN_Y, MAX_Y, 0.0);

    let ridge_a = builder.abs(ridge_a);
    let ridge_b = builder.abs(ridge_b);
    let ridges = builder.max(ridge_a, ridge_b);
    let scale = builder.constant(1.5);
    let ridged = builder.mul(scale, ridges);
    let solid = builder.constant(64.0);
    let tunnel = builder.add(thickness, ridged);
    builder.range_choice(toggle, -1_000_000.0, 0.0, solid, tunnel)
}

fn pillars(builder: &mut DensityFunctionBuilder) -> DensityHandle {
    let pillar = noise(builder, &NoiseParameters::PILLAR, 25.0, 0.3);
    let rareness = mapped_noise(builder, &NoiseParameters::PILLAR_RARENESS, 1.0, 1.0, 0.0, -2.0);
    let thickness = mapped_noise(builder, &NoiseParameters::PILLAR_THICKNESS, 1.0, 1.0, 0.0, 1.1);
    let two = builder.constant(2.0);
    let doubled = builder.mul(pillar, two);
    let shaped = builder.add(doubled, rareness);
    let thickness = builder.cube(thickness);
    let product = builder.mul(shaped, thickness);
    builder.cache_once(product)
}

fn underground(builder: &mut DensityFunctionBuilder, sloped_cheese: DensityHandle) -> DensityHandle {
    let roughness = holder(builder, SPAGHETTI_ROUGHNESS_FUNCTION);
    let cave_layer = noise(builder, &NoiseParameters::CAVE_LAYER, 1.0, 8.0);
    let four = builder.constant(4.0);
    let layer_squared = builder.square(cave_layer);
    let layer = builder.mul(four, layer_squared);

    let cave_cheese = noise(
        builder,
        &NoiseParameters::CAVE_CHEESE,
        1.0,
        0.666_666_666_666_666_6,
    );
    let cheese_bias = builder.constant(0.27);
    let cheese = builder.add(cheese_bias, cave_cheese);
    let cheese = builder.clamp(cheese, -1.0, 1.0);
    let depth_bias = builder.constant(1.5);
    let depth_scale = builder.constant(-0.64);
    let scaled_cheese = builder.mul(depth_scale, sloped_cheese);
    let depth_term = builder.add(depth_bias, scaled_cheese);
    let depth_term = builder.clamp(depth_term, 0.0, 0.5);
    let cheese = builder.add(cheese, depth_term);
    let caverns = builder.add(layer, cheese);

    let entrances = holder(builder, ENTRANCES);
    let spaghetti = holder(builder, SPAGHETTI_2D);
    let caves = builder.min(caverns, entrances);
    let rough_spaghetti = builder.add(spaghetti, roughness);
    let caves = builder.min(caves, rough_spaghetti);

    let pillars = holder(builder, PILLARS);
    let no_pillar = builder.constant(-1_000_000.0);
    let pillars = builder.range_choice(pillars, -1_000_000.0, 0.03, no_pillar, pillars);
    builder.max(caves, pillars)
}

/// Slides the density towards the world limits, then interpolates and
/// squeezes it.
fn post_process(builder: &mut DensityFunctionBuilder, density: DensityHandle) -> DensityHandle {
    let slid = builder.slide(density);
    let blended = builder.blend_density(slid);
    let interpolated = builder.interpolated(blended);
    let factor = builder.constant(0.64);
    let scaled = builder.mul(interpolated, factor);
    builder.squeeze(scaled)
}

/// Registers the shared overworld holders.
pub fn bootstrap(builder: &mut DensityFunctionBuilder) {
    let zero = builder.zero();
    builder.register(ZERO, zero);
    let y = builder.y_clamped_gradient(
        Y_GRADIENT_MIN,
        Y_GRADIENT_MAX,
        f64::from(Y_GRADIENT_MIN),
        f64::from(Y_GRADIENT_MAX),
    );
    builder.register(Y, y);

    let shift_x = builder.shift_a(&NoiseParameters::SHIFT);
    let shift_x = builder.cache_2d(shift_x);
    let shift_x = builder.flat_cache(shift_x);
    builder.register(SHIFT_X, shift_x);
    let shift_z = builder.shift_b(&NoiseParameters::SHIFT);
    let shift_z = builder.cache_2d(shift_z);
    let shift_z = builder.flat_cache(shift_z);
    builder.register(SHIFT_Z, shift_z);

    let base_3d_noise = builder.blended_noise();
    builder.register(BASE_3D_NOISE, base_3d_noise);

    let continents =
        builder.shifted_noise_2d(shift_x, shift_z, 0.25, &NoiseParameters::CONTINENTALNESS);
    let continents = builder.flat_cache(continents);
    builder.register(CONTINENTS, continents);
    let erosion = builder.shifted_noise_2d(shift_x, shift_z, 0.25, &NoiseParameters::EROSION);
    let erosion = builder.flat_cache(erosion);
    builder.register(EROSION, erosion);
    let ridges = builder.shifted_noise_2d(shift_x, shift_z, 0.25, &NoiseParameters::RIDGE);
    let ridges = builder.flat_cache(ridges);
    builder.register(RIDGES, ridges);

    let jagged_noise = noise(builder, &NoiseParameters::JAGGED, 1500.0, 0.0);
    let blend_offset = builder.blend_offset();
    let offset = spline_with_blending(
        builder,
        continents,
        erosion,
        ridges,
        TerrainSplineType::Offset,
        -0.81,
        2.5,
        blend_offset,
    );
    let blending_factor = builder.constant(10.0);
    let factor = spline_with_blending(
        builder,
        continents,
        erosion,
        ridges,
        TerrainSplineType::Factor,
        0.0,
        8.0,
        blending_factor,
    );
    builder.register(FACTOR, factor);
    let gradient = builder.y_clamped_gradient(WORLD_MIN_Y, WORLD_MAX_Y, 1.5, -1.5);
    let depth = builder.add(gradient, offset);
    builder.register(DEPTH, depth);

    let cheese = sloped_cheese(builder, continents, erosion, ridges, factor, depth, jagged_noise);
    builder.register(SLOPED_CHEESE, cheese);

    let roughness = spaghetti_roughness_function(builder);
    builder.register(SPAGHETTI_ROUGHNESS_FUNCTION, roughness);
    let thickness_modulator = mapped_noise(
        builder,
        &NoiseParameters::SPAGHETTI_2D_THICKNESS,
        2.0,
        1.0,
        -0.6,
        -1.3,
    );
    let thickness_modulator = builder.cache_once(thickness_modulator);
    builder.register(SPAGHETTI_2D_THICKNESS_MODULATOR, thickness_modulator);
    let spaghetti = spaghetti_2d(builder);
    builder.register(SPAGHETTI_2D, spaghetti);
    let entrances = entrances(builder);
    builder.register(ENTRANCES, entrances);
    let noodle = noodle(builder);
    builder.register(NOODLE, noodle);
    let pillars = pillars(builder);
    builder.register(PILLARS, pillars);
}

/// The full overworld router.
///
/// The final density is additionally wrapped the way a chunk session reads
/// it: the beardifier is added and the sum is cached for the whole cell.
#[must_use]
pub fn overworld_router() -> BaseNoiseRouter {
    let mut builder = DensityFunctionBuilder::new();
    bootstrap(&mut builder);

    let barrier_noise = noise(&mut builder, &NoiseParameters::AQUIFER_BARRIER, 1.0, 0.5);
    let floodedness = noise(
        &mut builder,
        &NoiseParameters::AQUIFER_FLUID_LEVEL_FLOODEDNESS,
        1.0,
        0.67,
    );
    let spread = noise(
        &mut builder,
        &NoiseParameters::AQUIFER_FLUID_LEVEL_SPREAD,
        1.0,
        0.714_285_714_285_714_3,
    );
    let lava = noise(&mut builder, &NoiseParameters::AQUIFER_LAVA, 1.0, 1.0);

    let shift_x = holder(&builder, SHIFT_X);
    let shift_z = holder(&builder, SHIFT_Z);
    let temperature =
        builder.shifted_noise_2d(shift_x, shift_z, 0.25, &NoiseParameters::TEMPERATURE);
    let vegetation = builder.shifted_noise_2d(shift_x, shift_z, 0.25, &NoiseParameters::VEGETATION);

    let factor = holder(&builder, FACTOR);
    let depth = holder(&builder, DEPTH);
    let cached_factor = builder.cache_2d(factor);
    let initial_density = noise_gradient_density(&mut builder, cached_factor, depth);

    let sloped_cheese = holder(&builder, SLOPED_CHEESE);
    let entrances = holder(&builder, ENTRANCES);
    let five = builder.constant(5.0);
    let scaled_entrances = builder.mul(five, entrances);
    let surface_cheese = builder.min(sloped_cheese, scaled_entrances);
    let underground = underground(&mut builder, sloped_cheese);
    let terrain = builder.range_choice(
        sloped_cheese,
        -1_000_000.0,
        SURFACE_DENSITY_THRESHOLD,
        surface_cheese,
        underground,
    );
    let processed = post_process(&mut builder, terrain);
    let noodle = holder(&builder, NOODLE);
    let final_density = builder.min(processed, noodle);
    let beardifier = builder.beardifier();
    let final_density = builder.add(final_density, beardifier);
    let final_density = builder.cache_all_in_cell(final_density);

    let y = holder(&builder, Y);
    let vein_min_y = VeinType::ALL
        .iter()
        .map(|vein| vein.min_y())
        .min()
        .unwrap_or(WORLD_MIN_Y);
    let vein_max_y = VeinType::ALL
        .iter()
        .map(|vein| vein.max_y())
        .max()
        .unwrap_or(WORLD_MIN_Y);
    let veininess = noise(&mut builder, &NoiseParameters::ORE_VEININESS, 1.5, 1.5);
    let vein_toggle =
        y_limited_interpolatable(&mut builder, y, veininess, vein_min_y, vein_max_y, 0.0);
    let vein_a = noise(&mut builder, &NoiseParameters::ORE_VEIN_A, 4.0, 4.0);
    let vein_a = y_limited_interpolatable(&mut builder, y, vein_a, vein_min_y, vein_max_y, 0.0);
    let vein_a = builder.abs(vein_a);
    let vein_b = noise(&mut builder, &NoiseParameters::ORE_VEIN_B, 4.0, 4.0);
    let vein_b = y_limited_interpolatable(&mut builder, y, vein_b, vein_min_y, vein_max_y, 0.0);
    let vein_b = builder.abs(vein_b);
    let ridge_offset = builder.constant(-0.079_999_998_211_860_66);
    let vein_max = builder.max(vein_a, vein_b);
    let vein_ridged = builder.add(ridge_offset, vein_max);
    let vein_gap = noise(&mut builder, &NoiseParameters::ORE_GAP, 1.0, 1.0);

    let continents = holder(&builder, CONTINENTS);
    let erosion = holder(&builder, EROSION);
    let ridges = holder(&builder, RIDGES);

    log::debug!("overworld density graph has {} components", builder.len());

    BaseNoiseRouter {
        barrier_noise: barrier_noise.index(),
        fluid_level_floodedness_noise: floodedness.index(),
        fluid_level_spread_noise: spread.index(),
        lava_noise: lava.index(),
        temperature: temperature.index(),
        vegetation: vegetation.index(),
        continents: continents.index(),
        erosion: erosion.index(),
        depth: depth.index(),
        ridges: ridges.index(),
        initial_density_without_jaggedness: initial_density.index(),
        final_density: final_density.index(),
        vein_toggle: vein_toggle.index(),
        vein_ridged: vein_ridged.index(),
        vein_gap: vein_gap.index(),
        full_component_stack: builder.build(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::noise_router::component::base_noise_router::{
        BaseNoiseFunctionComponent, WrapperType,
    };

    fn references(component: &BaseNoiseFunctionComponent) -> Vec<usize> {
        match *component {
            BaseNoiseFunctionComponent::BlendDensity { input_index }
            | BaseNoiseFunctionComponent::Slide { input_index }
            | BaseNoiseFunctionComponent::WeirdScaled { input_index, .. }
            | BaseNoiseFunctionComponent::Wrapper { input_index, .. }
            | BaseNoiseFunctionComponent::Linear { input_index, .. }
            | BaseNoiseFunctionComponent::Unary { input_index, .. }
            | BaseNoiseFunctionComponent::Clamp { input_index, .. } => vec![input_index],
            BaseNoiseFunctionComponent::ShiftedNoise {
                shift_x_index,
                shift_y_index,
                shift_z_index,
                ..
            } => vec![shift_x_index, shift_y_index, shift_z_index],
            BaseNoiseFunctionComponent::TerrainShaperSpline {
                continents_index,
                erosion_index,
                weirdness_index,
                ..
            } => vec![continents_index, erosion_index, weirdness_index],
            BaseNoiseFunctionComponent::Binary {
                argument1_index,
                argument2_index,
                ..
            } => vec![argument1_index, argument2_index],
            BaseNoiseFunctionComponent::RangeChoice {
                input_index,
                when_in_range_index,
                when_out_range_index,
                ..
            } => vec![input_index, when_in_range_index, when_out_range_index],
            _ => Vec::new(),
        }
    }

    #[test]
    fn test_stack_only_references_earlier_entries() {
        let router = overworld_router();
        for (index, component) in router.full_component_stack.iter().enumerate() {
            for reference in references(component) {
                assert!(reference < index, "entry {index} reads {reference}");
            }
        }
    }

    #[test]
    fn test_final_density_is_cell_cached() {
        let router = overworld_router();
        assert!(matches!(
            router.full_component_stack[router.final_density],
            BaseNoiseFunctionComponent::Wrapper {
                wrapper: WrapperType::CellCache,
                ..
            }
        ));
    }

    #[test]
    fn test_climate_fields_are_flat_cached() {
        let router = overworld_router();
        for index in [router.continents, router.erosion, router.ridges] {
            assert!(matches!(
                router.full_component_stack[index],
                BaseNoiseFunctionComponent::Wrapper {
                    wrapper: WrapperType::CacheFlat,
                    ..
                }
            ));
        }
    }

    #[test]
    fn test_shared_holders_are_single_entries() {
        let mut builder = DensityFunctionBuilder::new();
        bootstrap(&mut builder);
        let before = builder.len();
        let again = builder.shift_a(&NoiseParameters::SHIFT);
        assert_eq!(builder.len(), before);
        assert!(again.index() < before);
    }

    #[test]
    fn test_vein_band_spans_both_types() {
        let min = VeinType::ALL.iter().map(|vein| vein.min_y()).min();
        let max = VeinType::ALL.iter().map(|vein| vein.max_y()).max();
        assert_eq!(min, Some(-60));
        assert_eq!(max, Some(50));
    }
}
