//! Math helpers shared by the noise and generation code.
pub mod noise_math;

pub use noise_math::{
    clamp, clamped_lerp, clamped_map, cube, floor, floor_div, floor_mod, lerp, lerp_f32, lerp2,
    lerp3, lfloor, map, positional_seed, smoothstep, square,
};
